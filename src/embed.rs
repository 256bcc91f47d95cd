//! Embedded sub-resources.
//!
//! The `embed` query parameter asks the service to inline related resources
//! into a response. It is a comma-separated list of dotted paths, e.g.
//! `categories.variables,moderators`. The service merges every embed into the
//! top level of the returned object under its first path segment, each wrapped
//! in its own `{ "data": ... }`.

use serde_json::{Map, Value};

use crate::Result;
use crate::error::Error;

/// Top-level names of an embed list: the first dot-segment of every non-empty
/// entry, in order and without duplicates.
#[must_use]
pub fn embed_names(embeds: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for entry in embeds.split(',') {
        let name = entry.split('.').next().unwrap_or_default().trim();
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Joins `requested` and `defaults` into one embed parameter, keeping the
/// caller's order and dropping duplicates.
#[must_use]
pub fn merge_embeds<S: AsRef<str>>(requested: &[S], defaults: &[&str]) -> String {
    let mut merged: Vec<&str> = Vec::with_capacity(requested.len() + defaults.len());
    for embed in requested.iter().map(AsRef::<str>::as_ref).chain(defaults.iter().copied()) {
        let embed = embed.trim();
        if !embed.is_empty() && !merged.contains(&embed) {
            merged.push(embed);
        }
    }
    merged.join(",")
}

/// Moves the embedded payloads named in `embeds` out of `data`.
///
/// Only the first dot-segment of each entry is used; nested embeds stay inside
/// the extracted payload. Names listed in `ignore` are left in `data`. On
/// success `data` no longer holds any extracted key, so callers needing both
/// views must keep the returned map and the trimmed `data`.
///
/// # Errors
///
/// Returns a [`Kind::Domain`](crate::error::Kind::Domain) error, leaving `data`
/// untouched, when a requested and non-ignored embed is absent.
pub fn unpack_embeds(
    data: &mut Map<String, Value>,
    embeds: &str,
    ignore: &[&str],
) -> Result<Map<String, Value>> {
    let names: Vec<&str> = embed_names(embeds)
        .into_iter()
        .filter(|name| !ignore.contains(name))
        .collect();

    if let Some(missing) = names.iter().find(|name| !data.contains_key(**name)) {
        return Err(Error::domain(format!(
            "embed `{missing}` was requested but is missing from the response"
        )));
    }

    let mut unpacked = Map::new();
    for name in names {
        if let Some(payload) = data.remove(name) {
            unpacked.insert(name.to_owned(), payload);
        }
    }

    Ok(unpacked)
}

/// Like [`unpack_embeds`] for a response whose `data` must be a JSON object.
pub fn unpack_value_embeds(
    data: &mut Value,
    embeds: &str,
    ignore: &[&str],
) -> Result<Map<String, Value>> {
    let object = data
        .as_object_mut()
        .ok_or_else(|| Error::domain("cannot unpack embeds from a response that is not an object"))?;
    unpack_embeds(object, embeds, ignore)
}

/// Strips the `{ "data": ... }` wrapper the service puts around each embed.
/// Payloads without the wrapper are returned unchanged.
#[must_use]
pub fn embed_data(payload: Value) -> Value {
    match payload {
        Value::Object(mut wrapper) if wrapper.len() == 1 && wrapper.contains_key("data") => {
            wrapper.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
