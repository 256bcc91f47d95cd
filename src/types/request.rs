//! Request types for the speedrun.com API.
//!
//! Query structs serialize into URL parameters through
//! [`ToQueryParams`](crate::ToQueryParams); unset fields are omitted. Embed
//! lists are kept out of the serialized fields because the client merges them
//! with the embeds each endpoint always requests.

#![allow(
    clippy::module_name_repetitions,
    reason = "Request suffix is intentional for clarity"
)]

use std::collections::BTreeMap;

use bon::Builder;
use serde::ser::SerializeMap as _;
use serde::{Serialize, Serializer};
use serde_with::skip_serializing_none;
use urlencoding::encode;

use super::{
    Direction, GameOrderBy, NaiveDate, Player, RunOrderBy, RunStatus, SeriesOrderBy, Timing,
    UserOrderBy, VariableValue,
};

/// Parameters for the `/games` search.
///
/// # Example
///
/// ```
/// use srcom_client_sdk::types::request::GamesRequest;
///
/// let request = GamesRequest::builder()
///     .name("celeste")
///     .platform("nzelkr6q")
///     .bulk(true)
///     .build();
/// ```
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Builder, Serialize)]
#[non_exhaustive]
pub struct GamesRequest {
    #[builder(into)]
    pub name: Option<String>,
    #[builder(into)]
    pub abbreviation: Option<String>,
    pub released: Option<u32>,
    #[builder(into)]
    pub moderator: Option<String>,
    #[builder(into)]
    pub gametype: Option<String>,
    #[builder(into)]
    pub platform: Option<String>,
    #[builder(into)]
    pub region: Option<String>,
    #[builder(into)]
    pub genre: Option<String>,
    #[builder(into)]
    pub engine: Option<String>,
    #[builder(into)]
    pub developer: Option<String>,
    #[builder(into)]
    pub publisher: Option<String>,
    /// Defaults to [`GameOrderBy::Similarity`] when `name` is set.
    pub orderby: Option<GameOrderBy>,
    #[builder(default)]
    pub direction: Direction,
    /// Extra embeds; categories and levels with their variables are always embedded.
    #[serde(skip)]
    #[builder(default)]
    pub embeds: Vec<String>,
    /// Bulk mode: reduced per-game payload and 1000 games per page.
    #[serde(rename = "_bulk", skip_serializing_if = "std::ops::Not::not")]
    #[builder(default)]
    pub bulk: bool,
}

/// Parameters for the `/series` listing.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Builder, Serialize)]
#[non_exhaustive]
pub struct SeriesRequest {
    #[builder(into)]
    pub name: Option<String>,
    #[builder(into)]
    pub abbreviation: Option<String>,
    #[builder(into)]
    pub moderator: Option<String>,
    #[builder(default)]
    pub orderby: SeriesOrderBy,
    #[builder(default)]
    pub direction: Direction,
}

/// Parameters for the `/users` listing.
///
/// `lookup` performs a case-insensitive exact match across names and linked
/// accounts; when it is set every other filter is dropped.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Builder, Serialize)]
#[non_exhaustive]
pub struct UsersRequest {
    #[builder(into)]
    pub lookup: Option<String>,
    #[builder(into)]
    pub name: Option<String>,
    #[builder(into)]
    pub twitch: Option<String>,
    #[builder(into)]
    pub hitbox: Option<String>,
    #[builder(into)]
    pub twitter: Option<String>,
    #[builder(into)]
    pub speedrunslive: Option<String>,
    #[builder(default)]
    pub orderby: UserOrderBy,
    #[builder(default)]
    pub direction: Direction,
}

impl UsersRequest {
    /// The parameters actually sent: a `lookup` search keeps only the ordering.
    #[must_use]
    pub fn effective(&self) -> UsersRequest {
        match &self.lookup {
            Some(lookup) => UsersRequest {
                lookup: Some(lookup.clone()),
                orderby: self.orderby,
                direction: self.direction,
                ..UsersRequest::default()
            },
            None => self.clone(),
        }
    }
}

/// Variable filters of a leaderboard, keyed by variable ID and sent as `var-{id}={value}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct VariableFilters(BTreeMap<String, String>);

impl VariableFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the leaderboard to runs with `value_id` for `variable_id`.
    #[must_use]
    pub fn with<K: Into<String>, V: Into<String>>(mut self, variable_id: K, value_id: V) -> Self {
        self.0.insert(variable_id.into(), value_id.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableFilters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Serialize for VariableFilters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (variable, value) in &self.0 {
            map.serialize_entry(&format!("var-{variable}"), value)?;
        }
        map.end()
    }
}

/// Parameters for a category or level leaderboard.
///
/// # Example
///
/// ```
/// use srcom_client_sdk::types::request::{LeaderboardRequest, VariableFilters};
///
/// let request = LeaderboardRequest::builder()
///     .game("o1y9wo6q")
///     .category("wkpoo02r")
///     .top(10)
///     .variables(VariableFilters::new().with("e8m7em86", "9qj7z0oq"))
///     .build();
/// ```
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Serialize)]
#[non_exhaustive]
pub struct LeaderboardRequest {
    #[serde(skip)]
    #[builder(into)]
    pub game: String,
    #[serde(skip)]
    #[builder(into)]
    pub category: String,
    /// Individual-level leaderboard when set; full-game otherwise.
    #[serde(skip)]
    #[builder(into)]
    pub level: Option<String>,
    /// Only runs placed within the top N.
    #[builder(default = 3)]
    pub top: u32,
    #[serde(rename = "video-only", skip_serializing_if = "std::ops::Not::not")]
    #[builder(default)]
    pub video_only: bool,
    /// Leaderboard as of this date. The client fills in today's date when unset.
    pub date: Option<NaiveDate>,
    pub emulators: Option<bool>,
    pub timing: Option<Timing>,
    #[builder(into)]
    pub platform: Option<String>,
    #[builder(into)]
    pub region: Option<String>,
    #[serde(flatten)]
    #[builder(default)]
    pub variables: VariableFilters,
    /// Extra embeds; `players` is always embedded.
    #[serde(skip)]
    #[builder(default)]
    pub embeds: Vec<String>,
}

impl LeaderboardRequest {
    /// Path of this leaderboard relative to the API base.
    #[must_use]
    pub fn path(&self) -> String {
        let game = encode(&self.game);
        let category = encode(&self.category);
        match &self.level {
            Some(level) => format!("leaderboards/{game}/level/{}/{category}", encode(level)),
            None => format!("leaderboards/{game}/category/{category}"),
        }
    }
}

/// Parameters for the `/runs` listing.
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Serialize)]
#[non_exhaustive]
pub struct RunsRequest {
    #[builder(default = RunStatus::Verified)]
    pub status: RunStatus,
    #[builder(into)]
    pub game: Option<String>,
    #[builder(into)]
    pub category: Option<String>,
    #[builder(into)]
    pub level: Option<String>,
    #[builder(into)]
    pub examiner: Option<String>,
    #[builder(into)]
    pub user: Option<String>,
    #[builder(into)]
    pub guest: Option<String>,
    #[builder(into)]
    pub platform: Option<String>,
    #[builder(into)]
    pub region: Option<String>,
    pub emulated: Option<bool>,
    #[builder(default)]
    pub orderby: RunOrderBy,
    #[builder(default)]
    pub direction: Direction,
}

impl Default for RunsRequest {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Timings of a submitted run, in seconds.
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, Default, PartialEq, Builder, Serialize)]
#[non_exhaustive]
pub struct RunTimes {
    pub realtime: Option<f64>,
    pub realtime_noloads: Option<f64>,
    pub ingame: Option<f64>,
}

/// Body of a run submission (`POST /runs`).
///
/// # Example
///
/// ```
/// use srcom_client_sdk::types::Player;
/// use srcom_client_sdk::types::request::{RunSubmission, RunTimes};
///
/// let submission = RunSubmission::builder()
///     .category("wkpoo02r")
///     .platform("w89rwelk")
///     .times(RunTimes::builder().realtime(4712.5).build())
///     .players(vec![Player::user("x7q9ej8j")])
///     .video("https://youtu.be/xyz")
///     .build();
/// ```
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Serialize)]
#[non_exhaustive]
pub struct RunSubmission {
    #[builder(into)]
    pub category: String,
    #[builder(into)]
    pub level: Option<String>,
    /// Defaults to today's date (UTC).
    #[builder(default = chrono::Utc::now().date_naive())]
    pub date: NaiveDate,
    #[builder(into)]
    pub region: Option<String>,
    #[builder(into)]
    pub platform: String,
    /// Submit as already verified. Only honoured for moderators.
    #[builder(default)]
    pub verified: bool,
    pub times: RunTimes,
    #[builder(default)]
    pub players: Vec<Player>,
    #[builder(default)]
    pub emulated: bool,
    #[builder(into)]
    pub video: Option<String>,
    #[builder(into)]
    pub comment: Option<String>,
    #[builder(into)]
    pub splitsio: Option<String>,
    /// Variable values keyed by variable ID.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[builder(default)]
    pub variables: BTreeMap<String, VariableValue>,
}

/// Wraps a query with the merged `embed` parameter.
#[derive(Debug, Serialize)]
pub(crate) struct Embedded<'req, R> {
    #[serde(flatten)]
    pub(crate) request: &'req R,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) embed: String,
}

/// Body of `PUT /runs/{id}/status`, nested under a top-level `status` key.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub(crate) struct StatusUpdate<'req> {
    pub(crate) status: RunStatus,
    pub(crate) reason: Option<&'req str>,
}
