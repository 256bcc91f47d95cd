//! Reassembly of leaderboard payloads embedded with `players`.
//!
//! When a leaderboard is requested with `embed=players`, the service does not
//! inline players per run. It returns every run with a placeholder `players`
//! list (one entry per runner) and appends a single flat `players.data` list
//! covering all runs in order. Reshaping hands each run its own slice of that
//! flat list, sized by its placeholder count:
//!
//! ```text
//! before: { "runs": [ { "run": { "players": [_, _] } }, { "run": { "players": [_] } } ],
//!           "players": { "data": [P1, P2, P3] } }
//! after:  { "runs": [ { "run": { "players": { "data": [P1, P2] } } },
//!                     { "run": { "players": { "data": [P3] } } } ] }
//! ```

use serde_json::{Map, Value};

use crate::Result;
use crate::error::Error;

/// Reshapes a leaderboard payload in place, requiring the placeholder counts to
/// add up to exactly the number of embedded players.
///
/// # Errors
///
/// Returns a [`Kind::Domain`](crate::error::Kind::Domain) error, leaving `data`
/// untouched, if the payload does not have the expected shape or the counts do
/// not match.
pub fn reshape_leaderboard(data: &mut Value) -> Result<()> {
    let (counts, available) = player_counts(data)?;
    let required: usize = counts.iter().sum();

    if required != available {
        return Err(Error::domain(format!(
            "leaderboard runs reference {required} players but {available} were embedded"
        )));
    }

    reassign(data, &counts)
}

/// Reshapes a leaderboard payload in place without checking that the
/// placeholder counts match the embedded player list.
///
/// If the flat list runs short, later runs receive truncated or empty player
/// lists; surplus players are dropped. Prefer [`reshape_leaderboard`].
///
/// # Errors
///
/// Returns a [`Kind::Domain`](crate::error::Kind::Domain) error if the payload
/// does not have the expected shape.
pub fn reshape_leaderboard_unchecked(data: &mut Value) -> Result<()> {
    let (counts, _) = player_counts(data)?;
    reassign(data, &counts)
}

/// Placeholder player count of every run, and the length of the flat list.
fn player_counts(data: &Value) -> Result<(Vec<usize>, usize)> {
    let root = as_object(data)?;

    let counts = runs(root)?
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            entry
                .pointer("/run/players")
                .and_then(Value::as_array)
                .map(Vec::len)
                .ok_or_else(|| {
                    Error::domain(format!("leaderboard run {index} has no players list"))
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let available = root
        .get("players")
        .and_then(|players| players.get("data"))
        .and_then(Value::as_array)
        .map(Vec::len)
        .ok_or_else(|| Error::domain("leaderboard has no embedded players list"))?;

    Ok((counts, available))
}

fn reassign(data: &mut Value, counts: &[usize]) -> Result<()> {
    let root = data
        .as_object_mut()
        .ok_or_else(|| Error::domain("leaderboard payload is not an object"))?;

    let flat = match root.remove("players") {
        Some(Value::Object(mut players)) => match players.remove("data") {
            Some(Value::Array(flat)) => flat,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    let mut flat = flat.into_iter();

    let runs = root
        .get_mut("runs")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| Error::domain("leaderboard has no runs list"))?;

    for (entry, &count) in runs.iter_mut().zip(counts) {
        let players: Vec<Value> = flat.by_ref().take(count).collect();
        if let Some(run) = entry.get_mut("run").and_then(Value::as_object_mut) {
            let mut wrapper = Map::new();
            wrapper.insert("data".to_owned(), Value::Array(players));
            run.insert("players".to_owned(), Value::Object(wrapper));
        }
    }

    Ok(())
}

fn as_object(data: &Value) -> Result<&Map<String, Value>> {
    data.as_object()
        .ok_or_else(|| Error::domain("leaderboard payload is not an object"))
}

fn runs(root: &Map<String, Value>) -> Result<&Vec<Value>> {
    root.get("runs")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::domain("leaderboard has no runs list"))
}
