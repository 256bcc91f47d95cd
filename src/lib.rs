#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod auth;
pub mod client;
pub mod embed;
pub mod error;
pub mod leaderboard;
pub mod pagination;
pub(crate) mod serde_helpers;
pub mod transport;
pub mod types;

use std::fmt::Write as _;

use serde::Serialize;

pub use crate::client::Client;
use crate::error::Error;
pub use crate::transport::{Config, Transport};

pub type Result<T> = std::result::Result<T, Error>;

/// Base URL of the speedrun.com REST API (v1).
pub const API_URL: &str = "https://www.speedrun.com/api/v1/";

/// Environment variable read by [`Config::from_env`] for the API key.
pub const API_KEY_VAR: &str = "SRCOM_API_KEY";

/// Page size requested for paginated collections.
pub const PAGE_SIZE: u32 = 200;

/// Page size requested in bulk mode.
pub const BULK_PAGE_SIZE: u32 = 1000;

/// Trait for converting request types to URL query parameters.
///
/// This trait is automatically implemented for all types that implement [`Serialize`].
/// It uses [`serde_html_form`] to serialize the struct fields into a query string.
pub trait ToQueryParams: Serialize {
    /// Converts the request to a URL query string.
    ///
    /// Returns an empty string if no parameters are set, otherwise returns
    /// a string starting with `?` followed by URL-encoded key-value pairs.
    /// Whenever at least one parameter is present the page size (`max`) is
    /// forced to [`PAGE_SIZE`], or [`BULK_PAGE_SIZE`] when `bulk` is set.
    fn query_params(&self, bulk: bool) -> String {
        let mut params = serde_html_form::to_string(self)
            .inspect_err(|e| {
                #[cfg(feature = "tracing")]
                tracing::error!("Unable to convert to URL-encoded string {e:?}");
                #[cfg(not(feature = "tracing"))]
                let _: &serde_html_form::ser::Error = e;
            })
            .unwrap_or_default();

        if params.is_empty() {
            return String::new();
        }

        let max = if bulk { BULK_PAGE_SIZE } else { PAGE_SIZE };
        let _ = write!(params, "&max={max}");

        format!("?{params}")
    }
}

impl<T: Serialize + ?Sized> ToQueryParams for T {}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn unit_produces_no_query() {
        assert_eq!(().query_params(false), "");
        assert_eq!(().query_params(true), "");
    }

    #[test]
    fn empty_map_produces_no_query() {
        let params: BTreeMap<String, String> = BTreeMap::new();
        assert_eq!(params.query_params(false), "");
    }

    #[test]
    fn page_size_is_appended_to_non_empty_query() {
        let params = BTreeMap::from([("orderby", "name")]);
        assert_eq!(params.query_params(false), "?orderby=name&max=200");
        assert_eq!(params.query_params(true), "?orderby=name&max=1000");
    }

    #[test]
    fn values_are_url_encoded() {
        let params = BTreeMap::from([("embed", "categories.variables,levels.variables")]);
        assert_eq!(
            params.query_params(false),
            "?embed=categories.variables%2Clevels.variables&max=200"
        );
    }
}
