//! Shareable-link tokens for the selection state.
//!
//! A link carries two keys in its URL fragment: `theme` (a theme id) and
//! `darkMode` (a JSON boolean), e.g. `#theme=candy&darkMode=false`.
//!
//! Serialization matches the theme by name (case-insensitive) and emits the
//! id of the first match, while deserialization looks the token up by id.
//! Existing links depend on this pairing, so the two directions are kept as
//! they are even though they key on different fields.

use std::fmt;

use log::debug;
use serde_json::Value;
use url::{Url, form_urlencoded};

use crate::registry::Registry;
use crate::theme::Theme;

pub const THEME_KEY: &str = "theme";
pub const DARK_MODE_KEY: &str = "darkMode";

/// Dark mode is on unless a link says otherwise.
pub const DEFAULT_DARK_MODE: bool = true;

/// Theme → link token. Empty when no registry theme carries the same name.
pub fn serialize_theme(registry: &Registry, theme: &Theme) -> String {
    registry
        .find_by_name(&theme.name)
        .map(|t| t.id.clone())
        .unwrap_or_default()
}

/// Link token → theme. Empty or unknown tokens resolve to the default theme.
pub fn deserialize_theme<'r>(registry: &'r Registry, token: &str) -> &'r Theme {
    if token.is_empty() {
        return registry.default_theme();
    }
    match registry.lookup(token) {
        Some(theme) => theme,
        None => {
            debug!("link: unknown theme token '{token}', using default");
            registry.default_theme()
        }
    }
}

pub fn serialize_dark_mode(dark_mode: bool) -> String {
    // Same text as the JSON literal
    dark_mode.to_string()
}

/// Parse a `darkMode` token.
///
/// Tokens are JSON values read with JavaScript truthiness, so older links
/// carrying `0`, `null` or `""` select light mode. Text that is not JSON
/// yields the default.
pub fn deserialize_dark_mode(token: &str) -> bool {
    match serde_json::from_str::<Value>(token) {
        Ok(value) => is_truthy(&value),
        Err(_) => {
            debug!("link: invalid darkMode token '{token}', using default");
            DEFAULT_DARK_MODE
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Key/value store behind a shareable link.
pub trait LinkState {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// URL fragment holding `application/x-www-form-urlencoded` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pairs: Vec<(String, String)>,
}

impl Fragment {
    /// Parse a fragment, with or without the leading `#`.
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let pairs = form_urlencoded::parse(fragment.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Accept either a full URL (its fragment is used) or a bare fragment.
    pub fn from_link(link: &str) -> Self {
        match Url::parse(link) {
            Ok(url) => Self::parse(url.fragment().unwrap_or("")),
            Err(_) => Self::parse(link),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl LinkState for Fragment {
    fn get(&self, key: &str) -> Option<String> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn set(&mut self, key: &str, value: &str) {
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.pairs.push((key.to_string(), value.to_string())),
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish();
        write!(f, "#{encoded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_round_trip() {
        let registry = Registry::builtin();
        for theme in registry.iter() {
            let token = serialize_theme(registry, theme);
            assert_eq!(token, theme.id);
            assert_eq!(deserialize_theme(registry, &token), theme);
        }
    }

    #[test]
    fn deserialize_by_id() {
        let registry = Registry::builtin();
        assert_eq!(deserialize_theme(registry, "ice").name, "Ice");
        assert_eq!(deserialize_theme(registry, "rabbit").name, "Evil Rabbit");
    }

    #[test]
    fn empty_and_unknown_tokens_fall_back() {
        let registry = Registry::builtin();
        assert_eq!(deserialize_theme(registry, "").id, "candy");
        assert_eq!(deserialize_theme(registry, "nonexistent").id, "candy");
        // Tokens are ids, not names
        assert_eq!(deserialize_theme(registry, "Ice").id, "candy");
    }

    #[test]
    fn serialize_matches_name_not_id() {
        let registry = Registry::builtin();
        let mut theme = registry.lookup("ice").unwrap().clone();
        theme.id = "renamed".into();
        theme.name = "ICE".into();
        assert_eq!(serialize_theme(registry, &theme), "ice");

        theme.name = "Glacier".into();
        assert_eq!(serialize_theme(registry, &theme), "");
    }

    #[test]
    fn dark_mode_tokens() {
        assert_eq!(serialize_dark_mode(true), "true");
        assert_eq!(serialize_dark_mode(false), "false");
        assert!(deserialize_dark_mode("true"));
        assert!(!deserialize_dark_mode("false"));
        assert!(deserialize_dark_mode(""));
        assert!(deserialize_dark_mode("nope"));
    }

    #[test]
    fn dark_mode_tokens_use_json_truthiness() {
        assert!(!deserialize_dark_mode("0"));
        assert!(!deserialize_dark_mode("null"));
        assert!(!deserialize_dark_mode(r#""""#));
        assert!(deserialize_dark_mode("1"));
        assert!(deserialize_dark_mode(r#""false""#));
        assert!(deserialize_dark_mode("[]"));
    }

    #[test]
    fn fragment_parse() {
        let fragment = Fragment::parse("#theme=candy&darkMode=false&padding=64");
        assert_eq!(fragment.get(THEME_KEY).as_deref(), Some("candy"));
        assert_eq!(fragment.get(DARK_MODE_KEY).as_deref(), Some("false"));
        assert_eq!(fragment.get("padding").as_deref(), Some("64"));
        assert_eq!(fragment.get("language"), None);

        // Leading '#' is optional
        assert_eq!(Fragment::parse("theme=ice").get(THEME_KEY).as_deref(), Some("ice"));
        assert!(Fragment::parse("").is_empty());
        assert!(Fragment::parse("#").is_empty());
    }

    #[test]
    fn fragment_set_replaces_in_place() {
        let mut fragment = Fragment::parse("theme=candy&padding=64");
        fragment.set(THEME_KEY, "ice");
        fragment.set(DARK_MODE_KEY, "true");
        assert_eq!(fragment.to_string(), "#theme=ice&padding=64&darkMode=true");
    }

    #[test]
    fn fragment_encoding() {
        let mut fragment = Fragment::default();
        fragment.set("title", "a b&c");
        assert_eq!(fragment.to_string(), "#title=a+b%26c");
        assert_eq!(
            Fragment::parse(&fragment.to_string()).get("title").as_deref(),
            Some("a b&c")
        );
    }

    #[test]
    fn from_full_url() {
        let fragment = Fragment::from_link("https://www.ray.so/#theme=sunset&darkMode=true");
        assert_eq!(fragment.get(THEME_KEY).as_deref(), Some("sunset"));
        assert!(Fragment::from_link("https://www.ray.so/").is_empty());
        assert_eq!(
            Fragment::from_link("#theme=mono").get(THEME_KEY).as_deref(),
            Some("mono")
        );
    }
}
