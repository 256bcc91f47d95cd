//! Types for the speedrun.com API.
//!
//! - **Common types**: enums for ordering, filtering and run state, and the
//!   player/variable shapes used in run mutations.
//!
//! - **Request types**: builder-pattern structs for each endpoint
//!   (e.g. [`request::GamesRequest`], [`request::LeaderboardRequest`]).
//!
//! Responses are returned as raw [`serde_json::Value`]s; building domain
//! objects from them is left to the caller.
//!
//! # Request Building
//!
//! All request types use the builder pattern via the [`bon`](https://docs.rs/bon) crate:
//!
//! ```
//! use srcom_client_sdk::types::{GameOrderBy, request::GamesRequest};
//!
//! let request = GamesRequest::builder()
//!     .name("super mario 64")
//!     .orderby(GameOrderBy::Released)
//!     .embeds(vec!["platforms".to_owned()])
//!     .build();
//! ```

use serde::{Deserialize, Serialize};

/// Date type used by run submissions and leaderboard snapshots.
pub use chrono::NaiveDate;

pub mod request;

/// Sort direction shared by every collection endpoint. The API defaults to [`Desc`](Self::Desc).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

/// Moderation state of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum RunStatus {
    New,
    Verified,
    Rejected,
    /// Unknown status from the API (captures the raw value for debugging).
    #[serde(untagged)]
    Unknown(String),
}

/// Timing method a leaderboard is ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum Timing {
    Realtime,
    RealtimeNoloads,
    Ingame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[non_exhaustive]
pub enum GameOrderBy {
    /// International name (the API default without a name filter).
    #[serde(rename = "name.int")]
    #[strum(serialize = "name.int")]
    NameInt,
    #[serde(rename = "name.jap")]
    #[strum(serialize = "name.jap")]
    NameJap,
    #[serde(rename = "abbreviation")]
    #[strum(serialize = "abbreviation")]
    Abbreviation,
    #[serde(rename = "released")]
    #[strum(serialize = "released")]
    Released,
    #[serde(rename = "created")]
    #[strum(serialize = "created")]
    Created,
    /// Closeness to the `name` filter. Used when a name is given and no order is set.
    #[serde(rename = "similarity")]
    #[strum(serialize = "similarity")]
    Similarity,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[non_exhaustive]
pub enum SeriesOrderBy {
    #[default]
    #[serde(rename = "name.int")]
    #[strum(serialize = "name.int")]
    NameInt,
    #[serde(rename = "name.jap")]
    #[strum(serialize = "name.jap")]
    NameJap,
    #[serde(rename = "abbreviation")]
    #[strum(serialize = "abbreviation")]
    Abbreviation,
    #[serde(rename = "created")]
    #[strum(serialize = "created")]
    Created,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[non_exhaustive]
pub enum UserOrderBy {
    #[default]
    #[serde(rename = "name.int")]
    #[strum(serialize = "name.int")]
    NameInt,
    #[serde(rename = "name.jap")]
    #[strum(serialize = "name.jap")]
    NameJap,
    #[serde(rename = "signup")]
    #[strum(serialize = "signup")]
    Signup,
    #[serde(rename = "role")]
    #[strum(serialize = "role")]
    Role,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
#[non_exhaustive]
pub enum RunOrderBy {
    #[default]
    Game,
    Category,
    Level,
    Platform,
    Region,
    Emulated,
    Date,
    Submitted,
    Status,
    VerifyDate,
}

/// Ordering for the simple resource collections. `Released` only applies to platforms.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum ResourceOrderBy {
    #[default]
    Name,
    Released,
}

/// The simple lookup collections, each served at `/{resource}` and `/{resource}/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum Resource {
    Developers,
    Publishers,
    Genres,
    Gametypes,
    Engines,
    Platforms,
    Regions,
}

/// A runner as referenced in run mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rel", rename_all = "lowercase")]
#[non_exhaustive]
pub enum Player {
    /// A registered user, by user ID.
    User { id: String },
    /// An unregistered runner, by display name.
    Guest { name: String },
}

impl Player {
    #[must_use]
    pub fn user<S: Into<String>>(id: S) -> Self {
        Player::User { id: id.into() }
    }

    #[must_use]
    pub fn guest<S: Into<String>>(name: S) -> Self {
        Player::Guest { name: name.into() }
    }
}

/// Value of a run variable in a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
#[non_exhaustive]
pub enum VariableValue {
    /// Free-form value for a user-defined variable.
    UserDefined(String),
    /// ID of one of the variable's predefined values.
    PreDefined(String),
}
