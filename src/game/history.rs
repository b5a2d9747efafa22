//! Bounded score history persisted through a key-value store.

use std::collections::HashMap;

/// Storage key for the serialized score list.
pub const HISTORY_KEY: &str = "balloon-math.scores";

/// How many past scores are retained.
pub const HISTORY_CAP: usize = 10;

/// Minimal key-value storage boundary. The browser implements it with
/// `localStorage`; native tests use `MemoryStore`. Writes are best-effort:
/// a store that cannot persist simply drops the value.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store for native tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }
}

/// Most-recent-first list of past final scores, capped at `HISTORY_CAP`
/// entries. Every `record` rewrites the whole serialized list; there is no
/// incremental log.
pub struct ScoreHistory<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ScoreHistory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Previously persisted scores. Absent or corrupt data reads as an empty
    /// history, never an error.
    pub fn load(&self) -> Vec<u32> {
        self.store
            .get(HISTORY_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Prepend a final score, truncate to the cap, persist, and return the
    /// updated list.
    pub fn record(&mut self, final_score: u32) -> Vec<u32> {
        let mut scores = self.load();
        scores.insert(0, final_score);
        scores.truncate(HISTORY_CAP);
        if let Ok(raw) = serde_json::to_string(&scores) {
            self.store.set(HISTORY_KEY, &raw);
        }
        scores
    }
}
