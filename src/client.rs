//! Client for the speedrun.com REST API.
//!
//! Each method maps to one endpoint, builds its parameters from a typed request
//! and hands back the decoded `data` as raw JSON. Collections are fully
//! paginated before they are returned.
//!
//! # Example
//!
//! ```no_run
//! use srcom_client_sdk::Client;
//! use srcom_client_sdk::types::request::{GamesRequest, LeaderboardRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::default();
//!
//! let games = client
//!     .search_games(&GamesRequest::builder().name("super mario 64").build())
//!     .await?;
//! let game_id = games[0]["id"].as_str().unwrap_or_default();
//! let category_id = games[0]["categories"]["data"][0]["id"]
//!     .as_str()
//!     .unwrap_or_default();
//!
//! let leaderboard = client
//!     .leaderboard(
//!         &LeaderboardRequest::builder()
//!             .game(game_id)
//!             .category(category_id)
//!             .build(),
//!     )
//!     .await?;
//! for entry in leaderboard["runs"].as_array().into_iter().flatten() {
//!     println!("{}: {}", entry["place"], entry["run"]["times"]["primary"]);
//! }
//! # Ok(())
//! # }
//! ```

use serde_json::{Map, Value, json};
use urlencoding::encode;

use crate::auth::ApiKey;
use crate::embed::{self, merge_embeds};
use crate::error::Error;
use crate::leaderboard::reshape_leaderboard;
use crate::transport::{Config, Transport};
use crate::types::request::{
    Embedded, GamesRequest, LeaderboardRequest, RunSubmission, RunsRequest, SeriesRequest,
    StatusUpdate, UsersRequest,
};
use crate::types::{Direction, GameOrderBy, Player, Resource, ResourceOrderBy, RunStatus};
use crate::{API_URL, Result};

/// Embeds every game lookup requests.
const GAME_EMBEDS: [&str; 2] = ["categories.variables", "levels.variables"];
/// Embeds kept in a game's own payload rather than unpacked.
const GAME_INLINE_EMBEDS: [&str; 2] = ["categories", "levels"];
const SERIES_EMBEDS: &str = "moderators";
const LEADERBOARD_EMBEDS: [&str; 1] = ["players"];
const RUN_EMBEDS: &str = "players,category.variables,level.variables";

/// A game together with the embeds requested alongside it.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct GameDetail {
    /// The game payload; categories and levels stay embedded here.
    pub game: Value,
    /// Every other requested embed, unwrapped from its `data` envelope, by name.
    pub embeds: Map<String, Value>,
    /// Games derived from this one (romhacks, category extensions), if any.
    pub derived_games: Option<Vec<Value>>,
}

/// HTTP client for the speedrun.com API.
///
/// # Example
///
/// ```no_run
/// use srcom_client_sdk::{Client, Config};
///
/// // Anonymous client against the public API
/// let client = Client::default();
///
/// // Authenticated client, key taken from `SRCOM_API_KEY`
/// let client = Client::new(srcom_client_sdk::API_URL, Config::from_env()).unwrap();
/// ```
#[derive(Clone, Debug, Default)]
pub struct Client {
    transport: Transport,
}

impl Client {
    /// Creates a client against `host` with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be created.
    pub fn new(host: &str, config: Config) -> Result<Client> {
        Ok(Self {
            transport: Transport::new(host, config)?,
        })
    }

    /// Creates a client against the public API authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid header value.
    pub fn with_api_key<S: Into<String>>(api_key: S) -> Result<Client> {
        Self::new(API_URL, Config::builder().api_key(ApiKey::new(api_key)).build())
    }

    /// The underlying transport, for endpoints this client does not wrap.
    #[must_use]
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// The profile of the user owning the API key, or `None` for an anonymous client.
    pub async fn profile(&self) -> Result<Option<Value>> {
        if !self.transport.is_authenticated() {
            return Ok(None);
        }
        self.transport.get("profile", &(), false).await.map(Some)
    }

    /// Notifications of the user owning the API key, ordered by creation date,
    /// or `None` for an anonymous client.
    pub async fn notifications(&self, direction: Direction) -> Result<Option<Vec<Value>>> {
        if !self.transport.is_authenticated() {
            return Ok(None);
        }
        let query = [("orderby", "created".to_owned()), ("direction", direction.to_string())];
        self.transport
            .get_as("notifications", &query, false)
            .await
            .map(Some)
    }

    pub async fn variable(&self, id: &str) -> Result<Value> {
        self.transport
            .get(&item_path("variables", id), &(), false)
            .await
    }

    pub async fn guest(&self, name: &str) -> Result<Value> {
        self.transport
            .get(&item_path("guests", name), &(), false)
            .await
    }

    /// A single developer, publisher, genre, game type, engine, platform or region.
    pub async fn resource(&self, resource: Resource, id: &str) -> Result<Value> {
        self.transport
            .get(&item_path(&resource.to_string(), id), &(), false)
            .await
    }

    /// Every entry of a simple resource collection.
    pub async fn resources(
        &self,
        resource: Resource,
        orderby: ResourceOrderBy,
    ) -> Result<Vec<Value>> {
        let query = [("orderby", orderby.to_string())];
        self.transport
            .get_as(&resource.to_string(), &query, false)
            .await
    }

    /// Searches games. Categories and levels, with their variables, are always embedded.
    pub async fn search_games(&self, request: &GamesRequest) -> Result<Vec<Value>> {
        let mut request = request.clone();
        if request.name.is_some() && request.orderby.is_none() {
            request.orderby = Some(GameOrderBy::Similarity);
        }

        let query = Embedded {
            embed: merge_embeds(&request.embeds, &GAME_EMBEDS),
            request: &request,
        };
        self.transport
            .get_as("games", &query, request.bulk)
            .await
    }

    /// A game by ID or abbreviation, with `embeds` in addition to its categories
    /// and levels, and its derived games.
    pub async fn game<S: AsRef<str>>(&self, id: &str, embeds: &[S]) -> Result<GameDetail> {
        let embed = merge_embeds(embeds, &GAME_EMBEDS);
        let mut game = self
            .transport
            .get(&item_path("games", id), &[("embed", embed.as_str())], false)
            .await?;

        let unpacked = embed::unpack_value_embeds(&mut game, &embed, &GAME_INLINE_EMBEDS)?;
        let embeds = unpacked
            .into_iter()
            .map(|(name, payload)| (name, embed::embed_data(payload)))
            .collect();

        let game_id = game.get("id").and_then(Value::as_str).unwrap_or(id).to_owned();
        let derived_games = Some(self.derived_games(&game_id).await?).filter(|d| !d.is_empty());

        Ok(GameDetail {
            game,
            embeds,
            derived_games,
        })
    }

    pub async fn derived_games(&self, game_id: &str) -> Result<Vec<Value>> {
        self.transport
            .get_as(&format!("{}/derived-games", item_path("games", game_id)), &(), false)
            .await
    }

    /// A series with its moderators embedded.
    pub async fn series(&self, id: &str) -> Result<Value> {
        self.transport
            .get(&item_path("series", id), &[("embed", SERIES_EMBEDS)], false)
            .await
    }

    /// Lists series with their moderators embedded.
    pub async fn series_list(&self, request: &SeriesRequest) -> Result<Vec<Value>> {
        let query = Embedded {
            request,
            embed: SERIES_EMBEDS.to_owned(),
        };
        self.transport.get_as("series", &query, false).await
    }

    pub async fn user(&self, id: &str) -> Result<Value> {
        self.transport
            .get(&item_path("users", id), &(), false)
            .await
    }

    pub async fn users(&self, request: &UsersRequest) -> Result<Vec<Value>> {
        self.transport
            .get_as("users", &request.effective(), false)
            .await
    }

    /// A leaderboard with each run carrying its own resolved `players`.
    ///
    /// # Errors
    ///
    /// Besides request failures, returns a [`Kind::Domain`](crate::error::Kind::Domain)
    /// error if the embedded players do not line up with the runs.
    pub async fn leaderboard(&self, request: &LeaderboardRequest) -> Result<Value> {
        let mut request = request.clone();
        if request.date.is_none() {
            request.date = Some(chrono::Utc::now().date_naive());
        }

        let query = Embedded {
            embed: merge_embeds(&request.embeds, &LEADERBOARD_EMBEDS),
            request: &request,
        };
        let mut data = self.transport.get(&request.path(), &query, false).await?;
        reshape_leaderboard(&mut data)?;
        Ok(data)
    }

    /// A run with its players, category and level embedded.
    pub async fn run(&self, id: &str) -> Result<Value> {
        self.transport
            .get(&item_path("runs", id), &[("embed", RUN_EMBEDS)], false)
            .await
    }

    /// Lists runs, fastest primary time first.
    pub async fn runs(&self, request: &RunsRequest) -> Result<Vec<Value>> {
        let query = Embedded {
            request,
            embed: RUN_EMBEDS.to_owned(),
        };
        let mut runs: Vec<Value> = self.transport.get_as("runs", &query, false).await?;
        runs.sort_by(|a, b| primary_time(a).total_cmp(&primary_time(b)));
        Ok(runs)
    }

    /// Verifies or rejects a run. `reason` is only sent with rejections.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Domain`](crate::error::Kind::Domain) error without
    /// calling the API when `current` already equals `status`.
    pub async fn change_run_status(
        &self,
        run_id: &str,
        current: &RunStatus,
        status: RunStatus,
        reason: Option<&str>,
    ) -> Result<Value> {
        if *current == status {
            return Err(Error::domain(format!("run {run_id} is already {status}")));
        }

        let reason = reason.filter(|_| status == RunStatus::Rejected);
        let update = StatusUpdate { status, reason };
        let body = json!({ "status": update });
        self.transport
            .put(&format!("{}/status", item_path("runs", run_id)), &body)
            .await
    }

    /// Replaces the runners credited on a run.
    pub async fn change_run_players(&self, run_id: &str, players: &[Player]) -> Result<Value> {
        let body = json!({ "players": players });
        self.transport
            .put(&format!("{}/players", item_path("runs", run_id)), &body)
            .await
    }

    /// Submits a new run.
    ///
    /// # Errors
    ///
    /// A rejected submission is reported as
    /// [`Kind::RunSubmission`](crate::error::Kind::RunSubmission) carrying the
    /// service's validation payload.
    pub async fn submit_run(&self, submission: &RunSubmission) -> Result<Value> {
        let body = json!({ "run": submission });
        self.transport
            .post("runs", &body)
            .await
            .map_err(Error::into_run_submission)
    }

    pub async fn delete_run(&self, run_id: &str) -> Result<Value> {
        self.transport.delete(&item_path("runs", run_id)).await
    }
}

/// `{collection}/{id}` with `id` percent-encoded as a single path segment.
fn item_path(collection: &str, id: &str) -> String {
    format!("{collection}/{}", encode(id))
}

/// Primary time of a run in seconds; runs without one sort last.
fn primary_time(run: &Value) -> f64 {
    run.pointer("/times/primary_t")
        .and_then(Value::as_f64)
        .unwrap_or(f64::INFINITY)
}
