//! Field decoders for the rules file that drop a wrong-typed value instead
//! of rejecting the whole document.
//!
//! Every decoder first reads a `serde_json::Value`, so the only hard
//! failures left are syntax errors and a non-object document.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// A string leaf. `null` is absent; any other non-string is dropped.
pub(crate) fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => {
            warn!(value = %other, "ignoring non-string value in rules file");
            None
        }
    })
}

/// A list of strings. Non-string items are skipped one by one.
pub(crate) fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(array(Value::deserialize(deserializer)?)
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            other => {
                warn!(value = %other, "ignoring non-string rule");
                None
            }
        })
        .collect())
}

/// A keyed map. Entries that fail to decode are dropped; the rest survive.
pub(crate) fn entries<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let map = match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        Value::Null => return Ok(BTreeMap::new()),
        other => {
            warn!(value = %other, "ignoring non-object map in rules file");
            return Ok(BTreeMap::new());
        }
    };
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(entry) => Some((key, entry)),
            Err(e) => {
                warn!(key = %key, error = %e, "dropping invalid rules entry");
                None
            }
        })
        .collect())
}

/// A list of records. Items that fail to decode are dropped.
pub(crate) fn items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(array(Value::deserialize(deserializer)?)
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(error = %e, "dropping invalid rules item");
                None
            }
        })
        .collect())
}

/// A nested record. One that fails to decode becomes its default.
pub(crate) fn record<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(T::default()),
        value => Ok(serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(error = %e, "ignoring invalid block in rules file");
            T::default()
        })),
    }
}

fn array(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            warn!(value = %other, "ignoring non-array list in rules file");
            Vec::new()
        }
    }
}
