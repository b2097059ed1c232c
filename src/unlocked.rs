//! Persisted set of theme ids the user has unlocked.
//!
//! Stored under `unlockedThemes` as a JSON array of ids. The backend is
//! supplied by the caller through [`Storage`].

use std::collections::HashMap;

use anyhow::{Context, Result};
use log::{debug, warn};

pub const UNLOCKED_THEMES_KEY: &str = "unlockedThemes";

/// Durable key/value store.
pub trait Storage {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn store(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process storage, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Ordered set of unlocked theme ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnlockedThemes {
    ids: Vec<String>,
}

impl UnlockedThemes {
    /// Read the persisted set. A missing or malformed value yields an
    /// empty set.
    pub fn restore(storage: &dyn Storage) -> Result<Self> {
        let Some(raw) = storage
            .load(UNLOCKED_THEMES_KEY)
            .context("failed to read unlocked themes")?
        else {
            debug!("unlocked: nothing stored");
            return Ok(Self::default());
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(stored) => {
                let mut unlocked = Self::default();
                for id in stored {
                    unlocked.insert_transient(&id);
                }
                debug!("unlocked: restored {} theme(s)", unlocked.len());
                Ok(unlocked)
            }
            Err(e) => {
                warn!("unlocked: ignoring malformed stored value: {e}");
                Ok(Self::default())
            }
        }
    }

    /// Add `id` and write the set back. Returns false (and writes nothing)
    /// when it was already unlocked.
    pub fn unlock(&mut self, id: &str, storage: &mut dyn Storage) -> Result<bool> {
        if !self.insert_transient(id) {
            return Ok(false);
        }
        let json = serde_json::to_string(&self.ids)?;
        if let Err(e) = storage.store(UNLOCKED_THEMES_KEY, &json) {
            // Keep memory in step with what is stored
            self.ids.pop();
            return Err(e).with_context(|| format!("failed to persist unlocked theme '{id}'"));
        }
        debug!("unlocked: {id}");
        Ok(true)
    }

    /// In-memory add that is never written to storage. Returns whether
    /// `id` was new. Use [`UnlockedThemes::unlock`] for a persisted add.
    pub fn insert_transient(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
