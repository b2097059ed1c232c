//! Theme records: background stops, font choice, branding flags and the
//! per-mode syntax color roles.

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};
use url::Url;

/// Built-in theme table, embedded at compile time.
pub const BUILTIN_TABLE: &str = include_str!("../themes/builtin.toml");

/// One named visual style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub background: Background,
    /// Branding asset reference, resolved by the asset pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontId>,
    /// Branded/sponsored theme.
    #[serde(default)]
    pub partner: bool,
    /// Left out of default selection lists; still resolvable by id.
    #[serde(default)]
    pub hidden: bool,
    pub syntax: Syntax,
}

impl Theme {
    /// Role set for the given display mode.
    pub fn colors(&self, mode: Mode) -> &SyntaxColors {
        match mode {
            Mode::Light => &self.syntax.light,
            Mode::Dark => &self.syntax.dark,
        }
    }

    /// Absolute icon URL: `icon` resolved against `base_url`.
    ///
    /// `None` when the theme has no icon or the URLs cannot be joined.
    pub fn icon_url(&self, base_url: &str) -> Option<String> {
        let icon = self.icon.as_deref()?;
        match Url::parse(base_url).and_then(|base| base.join(icon)) {
            Ok(url) => Some(url.into()),
            Err(e) => {
                warn!(
                    "theme: cannot resolve icon '{icon}' of '{}' against '{base_url}': {e}",
                    self.id
                );
                None
            }
        }
    }
}

/// Color stops of the background gradient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Background {
    pub from: String,
    pub to: String,
}

/// Light and dark role sets. Both are mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syntax {
    pub light: SyntaxColors,
    pub dark: SyntaxColors,
}

/// Semantic syntax roles supplied by a theme author for one mode.
///
/// Every role is optional: an unset role stays unset all the way to the
/// style map, so the renderer can apply its own default. Values are opaque
/// CSS color strings and are never parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyntaxColors {
    pub foreground: Option<String>,
    pub constant: Option<String>,
    pub string: Option<String>,
    pub comment: Option<String>,
    pub keyword: Option<String>,
    pub parameter: Option<String>,
    pub function: Option<String>,
    pub string_expression: Option<String>,
    pub punctuation: Option<String>,
    pub link: Option<String>,
    pub number: Option<String>,
    pub property: Option<String>,
    pub highlight: Option<String>,
    pub highlight_border: Option<String>,
    pub highlight_hover: Option<String>,
}

/// Identifier into the external font registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontId(String);

impl FontId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display mode selecting one of a theme's two role sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Light,
    Dark,
}

impl Mode {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode { Mode::Dark } else { Mode::Light }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Light => "light",
            Mode::Dark => "dark",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
