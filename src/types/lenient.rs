//! Per-key tolerant deserializers for the settings file.
//!
//! A hand-edited file with one mistyped value must not cost the user the
//! rest of their settings or today's stats. Each helper here handles a
//! single key: the value is read as raw JSON first, then converted, and a
//! value of the wrong shape only affects its own key.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{default_meal_times, parse_toggle};

/// Reads an on/off setting.
///
/// Booleans are taken as-is and toggle words (`"yes"`, `"off"`, `"1"`)
/// are understood. Anything else falls back to on, the default of every
/// toggle in the file.
pub fn toggle<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => parse_toggle(s),
        Value::Number(n) => n.as_u64().and_then(|n| parse_toggle(&n.to_string())),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(|| {
        tracing::warn!(%value, "Ignoring mistyped on/off setting, using its default");
        true
    }))
}

/// Reads the meal table.
///
/// Entries that are not strings keep their JSON text so the meal check
/// reports them as invalid times. A value that is not an object at all
/// falls back to the default meals.
pub fn meal_times<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(entries) => Ok(entries
            .into_iter()
            .map(|(meal, time)| {
                let time = match time {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (meal, time)
            })
            .collect()),
        other => {
            tracing::warn!(value = %other, "Ignoring mistyped mealTimes, using the defaults");
            Ok(default_meal_times())
        }
    }
}

/// Reads any value, falling back to `T::default()` when it has the wrong
/// shape.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        tracing::warn!(%value, error = %e, "Ignoring mistyped setting, using its default");
        T::default()
    }))
}
