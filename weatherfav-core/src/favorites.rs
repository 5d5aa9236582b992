//! Persisted list of favorite city names.
//!
//! Storage problems are logged and never reach the user: a read failure looks
//! like an empty list and a write failure leaves the previous value in place.

use serde_json::Value;
use std::sync::Arc;

use crate::storage::KeyValueStore;

/// Storage key holding the JSON-encoded favorites list.
pub const FAVORITES_KEY: &str = "favorites";

#[derive(Debug, Clone)]
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Read the stored list, or an empty one if nothing usable is stored.
    pub fn load(&self) -> Vec<String> {
        let raw = match self.storage.get_item(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read favorites: {e:#}");
                return Vec::new();
            }
        };

        match decode(&raw) {
            Some(list) => list,
            None => {
                tracing::warn!("Ignoring unreadable favorites payload: {}", excerpt(&raw));
                Vec::new()
            }
        }
    }

    /// Overwrite the stored list. Returns `false` if the write failed.
    pub fn save(&self, list: &[String]) -> bool {
        let json = match serde_json::to_string(list) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to encode favorites: {e}");
                return false;
            }
        };

        match self.storage.set_item(FAVORITES_KEY, &json) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to save favorites: {e:#}");
                false
            }
        }
    }

    /// Append `name` unless it is already present (exact match) and persist.
    pub fn add(&self, name: &str) -> Vec<String> {
        let mut list = self.load();
        if list.iter().any(|existing| existing == name) {
            return list;
        }

        list.push(name.to_string());
        if self.save(&list) {
            tracing::info!("Added {name} to favorites");
        }
        list
    }
}

/// Accepts a JSON array of strings, or a JSON string that itself holds one
/// (payloads written by older versions were encoded twice).
fn decode(raw: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Value>(raw).ok()? {
        Value::Array(items) => serde_json::from_value(Value::Array(items)).ok(),
        Value::String(inner) => serde_json::from_str(&inner).ok(),
        _ => None,
    }
}

fn excerpt(raw: &str) -> String {
    raw.chars().take(80).collect()
}
