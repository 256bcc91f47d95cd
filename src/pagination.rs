//! Cursor-based pagination of collection responses.
//!
//! Collection endpoints answer with an envelope whose `pagination.links`
//! holds absolute `prev`/`next` URIs. [`drain`] follows them until the
//! service stops handing out a `next` link and concatenates every page into a
//! single JSON array. [`stream`] does the same lazily, yielding one item at a
//! time.
//!
//! There is no client-side page cap. A service that kept returning a cyclic
//! `next` link would keep the caller paging forever.

use async_stream::try_stream;
use futures::Stream;
use reqwest::Request;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;
use crate::error::Error;
use crate::transport::{Envelope, Transport};

/// Relation of a pagination [`Link`] to the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum Rel {
    Next,
    Prev,
    /// Unknown relation from the API (captures the raw value for debugging).
    #[serde(untagged)]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Link {
    pub rel: Rel,
    pub uri: String,
}

/// The `pagination` block of a response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Pagination {
    pub offset: Option<u64>,
    pub max: Option<u64>,
    pub size: Option<u64>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Pagination {
    /// Returns the link to the following page, if any. See [`next_link`].
    #[must_use]
    pub fn next(&self) -> Option<&str> {
        next_link(&self.links)
    }
}

/// Selects the URI of the following page.
///
/// - no links: last page
/// - a single `prev` link: last page
/// - a single link of any other relation: follow it
/// - two or more links: follow the one at index 1 (the service orders them `[prev, next]`)
#[must_use]
pub fn next_link(links: &[Link]) -> Option<&str> {
    match links {
        [] => None,
        [only] if only.rel == Rel::Prev => None,
        [only] => Some(only.uri.as_str()),
        [_, next, ..] => Some(next.uri.as_str()),
    }
}

/// Follows every `next` link starting from `first` and returns all pages' `data`
/// concatenated in order.
///
/// An envelope without a `pagination` block is returned as-is. Any failed page
/// aborts the whole call and discards what was accumulated so far.
pub(crate) async fn drain(transport: &Transport, first: Envelope) -> Result<Value> {
    let Envelope {
        mut data,
        pagination,
    } = first;
    let Some(mut pagination) = pagination else {
        return Ok(data);
    };

    #[cfg(feature = "tracing")]
    let mut pages: usize = 1;

    while let Some(link) = pagination.next() {
        let items = data
            .as_array_mut()
            .ok_or_else(|| Error::domain("cannot paginate a response whose data is not a list"))?;

        let request = transport.follow_request(link)?;
        let Envelope {
            data: page,
            pagination: page_pagination,
        } = transport.execute(request).await?;

        let Value::Array(page) = page else {
            return Err(Error::domain(format!(
                "page fetched from {link} does not contain a list"
            )));
        };

        #[cfg(feature = "tracing")]
        {
            pages += 1;
            tracing::debug!(page = pages, items = page.len(), "followed pagination link");
        }

        items.extend(page);
        pagination = page_pagination.unwrap_or_default();
    }

    Ok(data)
}

/// Lazily walks the pages of `request`, yielding each item of each page's `data`.
///
/// Items of earlier pages are handed out before later pages are requested, so a
/// failure on page N still leaves the caller with pages 1..N-1.
pub(crate) fn stream(
    transport: &Transport,
    request: Request,
) -> impl Stream<Item = Result<Value>> + '_ {
    try_stream! {
        let mut envelope = transport.execute(request).await?;

        loop {
            let Envelope { data, pagination } = envelope;

            let items = match data {
                Value::Array(items) => items,
                _ => Err(Error::domain("cannot stream a response whose data is not a list"))?,
            };

            for item in items {
                yield item;
            }

            let Some(link) = pagination.as_ref().and_then(Pagination::next) else {
                break;
            };

            let request = transport.follow_request(link)?;
            envelope = transport.execute(request).await?;
        }
    }
}
