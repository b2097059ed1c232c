//! Theme registry: ordered, validated, immutable after construction.
//!
//! Theme tables are TOML documents with a `default` id and a `[[theme]]`
//! array; array order is the display order. Validation runs once at load
//! so that lookups never have to deal with duplicate keys.

use std::collections::HashMap;
use std::sync::LazyLock;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::theme::{BUILTIN_TABLE, Theme};
use crate::unlocked::UnlockedThemes;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("theme table contains no themes")]
    Empty,
    #[error("theme #{index} has an empty id")]
    EmptyId { index: usize },
    #[error("duplicate theme id '{id}'")]
    DuplicateId { id: String },
    #[error("theme '{id}' reuses the name '{name}' of theme '{other}'")]
    DuplicateName {
        id: String,
        name: String,
        other: String,
    },
    #[error("default theme '{id}' is not in the table")]
    UnknownDefault { id: String },
    #[error("failed to parse theme table")]
    Parse(#[from] toml::de::Error),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ThemeTable {
    default: Option<String>,
    #[serde(default, rename = "theme")]
    themes: Vec<Theme>,
}

static BUILTIN: LazyLock<Registry> = LazyLock::new(|| {
    Registry::from_toml(BUILTIN_TABLE)
        .unwrap_or_else(|e| panic!("[BUG] built-in theme table is invalid: {e}"))
});

#[derive(Debug, Clone)]
pub struct Registry {
    themes: Vec<Theme>,
    /// id → index into `themes`
    by_id: HashMap<String, usize>,
    default_index: usize,
}

impl Registry {
    /// Build a registry, rejecting duplicate ids, case-insensitive name
    /// collisions and an unknown default.
    pub fn new(themes: Vec<Theme>, default_id: &str) -> Result<Self, RegistryError> {
        if themes.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut by_id = HashMap::with_capacity(themes.len());
        // lowercased name → id of the first theme using it
        let mut names: HashMap<String, &str> = HashMap::with_capacity(themes.len());
        for (index, theme) in themes.iter().enumerate() {
            if theme.id.is_empty() {
                return Err(RegistryError::EmptyId { index });
            }
            if by_id.insert(theme.id.clone(), index).is_some() {
                return Err(RegistryError::DuplicateId {
                    id: theme.id.clone(),
                });
            }
            if let Some(other) = names.insert(theme.name.to_lowercase(), &theme.id) {
                return Err(RegistryError::DuplicateName {
                    id: theme.id.clone(),
                    name: theme.name.clone(),
                    other: other.to_string(),
                });
            }
        }

        let default_index = *by_id
            .get(default_id)
            .ok_or_else(|| RegistryError::UnknownDefault {
                id: default_id.to_string(),
            })?;

        debug!(
            "registry: {} themes, default={default_id}",
            themes.len()
        );
        Ok(Self {
            themes,
            by_id,
            default_index,
        })
    }

    /// Parse and validate a TOML theme table.
    ///
    /// A table without `default` uses its first theme as the default.
    pub fn from_toml(text: &str) -> Result<Self, RegistryError> {
        let table: ThemeTable = toml::from_str(text)?;
        let default_id = match table.default {
            Some(id) => id,
            None => table
                .themes
                .first()
                .map(|t| t.id.clone())
                .ok_or(RegistryError::Empty)?,
        };
        Self::new(table.themes, &default_id)
    }

    /// The built-in registry, parsed on first access.
    pub fn builtin() -> &'static Registry {
        &BUILTIN
    }

    /// A new registry with the themes of `text` appended after this one's.
    ///
    /// The extra table may not redefine `default`; the current default is
    /// kept. The combined set is validated as a whole.
    pub fn with_extra(&self, text: &str) -> Result<Registry, RegistryError> {
        let table: ThemeTable = toml::from_str(text)?;
        if let Some(id) = table.default {
            debug!("registry: ignoring default={id} in extra theme table");
        }
        let mut themes = self.themes.clone();
        themes.extend(table.themes);
        Self::new(themes, &self.default_theme().id.clone())
    }

    pub fn lookup(&self, id: &str) -> Option<&Theme> {
        self.by_id.get(id).map(|&i| &self.themes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// First theme whose name matches case-insensitively.
    pub fn find_by_name(&self, name: &str) -> Option<&Theme> {
        let needle = name.to_lowercase();
        self.themes.iter().find(|t| t.name.to_lowercase() == needle)
    }

    pub fn default_theme(&self) -> &Theme {
        &self.themes[self.default_index]
    }

    /// Theme ids in display order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(|t| t.id.as_str())
    }

    /// Themes in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter()
    }

    /// Themes offered for selection: every visible theme plus the hidden
    /// ones the user has unlocked.
    pub fn selectable<'a>(
        &'a self,
        unlocked: &'a UnlockedThemes,
    ) -> impl Iterator<Item = &'a Theme> + 'a {
        self.themes
            .iter()
            .filter(move |t| !t.hidden || unlocked.contains(&t.id))
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}
