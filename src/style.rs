//! Syntax role set → flat `--ray-*` style variable map.
//!
//! The mapping is fixed: one variable per role, values copied verbatim.
//! Unset roles produce no entry, leaving the renderer free to fall back to
//! its own default.

use std::fmt::Write as _;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::theme::SyntaxColors;

/// Prefix shared by every style variable.
pub const VARIABLE_PREFIX: &str = "--ray-";

/// The fixed set of style variables, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleVar {
    Foreground,
    Constant,
    String,
    Comment,
    Keyword,
    Parameter,
    Function,
    StringExpression,
    Punctuation,
    Link,
    Number,
    Property,
    Highlight,
    HighlightBorder,
    HighlightHover,
}

impl StyleVar {
    pub const ALL: [StyleVar; 15] = [
        StyleVar::Foreground,
        StyleVar::Constant,
        StyleVar::String,
        StyleVar::Comment,
        StyleVar::Keyword,
        StyleVar::Parameter,
        StyleVar::Function,
        StyleVar::StringExpression,
        StyleVar::Punctuation,
        StyleVar::Link,
        StyleVar::Number,
        StyleVar::Property,
        StyleVar::Highlight,
        StyleVar::HighlightBorder,
        StyleVar::HighlightHover,
    ];

    /// CSS custom property name, including the `--ray-` prefix.
    pub fn name(self) -> &'static str {
        match self {
            StyleVar::Foreground => "--ray-foreground",
            StyleVar::Constant => "--ray-token-constant",
            StyleVar::String => "--ray-token-string",
            StyleVar::Comment => "--ray-token-comment",
            StyleVar::Keyword => "--ray-token-keyword",
            StyleVar::Parameter => "--ray-token-parameter",
            StyleVar::Function => "--ray-token-function",
            StyleVar::StringExpression => "--ray-token-string-expression",
            StyleVar::Punctuation => "--ray-token-punctuation",
            StyleVar::Link => "--ray-token-link",
            StyleVar::Number => "--ray-token-number",
            StyleVar::Property => "--ray-token-property",
            StyleVar::Highlight => "--ray-highlight",
            StyleVar::HighlightBorder => "--ray-highlight-border",
            StyleVar::HighlightHover => "--ray-highlight-hover",
        }
    }

    pub fn from_name(name: &str) -> Option<StyleVar> {
        StyleVar::ALL.into_iter().find(|v| v.name() == name)
    }

    fn role(self, roles: &SyntaxColors) -> Option<&str> {
        let value = match self {
            StyleVar::Foreground => &roles.foreground,
            StyleVar::Constant => &roles.constant,
            StyleVar::String => &roles.string,
            StyleVar::Comment => &roles.comment,
            StyleVar::Keyword => &roles.keyword,
            StyleVar::Parameter => &roles.parameter,
            StyleVar::Function => &roles.function,
            StyleVar::StringExpression => &roles.string_expression,
            StyleVar::Punctuation => &roles.punctuation,
            StyleVar::Link => &roles.link,
            StyleVar::Number => &roles.number,
            StyleVar::Property => &roles.property,
            StyleVar::Highlight => &roles.highlight,
            StyleVar::HighlightBorder => &roles.highlight_border,
            StyleVar::HighlightHover => &roles.highlight_hover,
        };
        value.as_deref()
    }
}

/// Render-ready variable map. Only set variables are stored, always in
/// `StyleVar::ALL` order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: Vec<(StyleVar, String)>,
}

/// Map a role set to its style variables. `None` maps to an empty map.
pub fn to_style_map(roles: Option<&SyntaxColors>) -> StyleMap {
    let Some(roles) = roles else {
        return StyleMap::default();
    };
    let entries = StyleVar::ALL
        .into_iter()
        .filter_map(|var| var.role(roles).map(|value| (var, value.to_string())))
        .collect();
    StyleMap { entries }
}

impl StyleMap {
    pub fn get(&self, var: StyleVar) -> Option<&str> {
        self.entries
            .iter()
            .find(|(v, _)| *v == var)
            .map(|(_, value)| value.as_str())
    }

    /// Look up by full variable name (`--ray-token-string`).
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        StyleVar::from_name(name).and_then(|var| self.get(var))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries
            .iter()
            .map(|(var, value)| (var.name(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// CSS declarations, one `name: value;` per line.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (name, value) in self.iter() {
            let _ = writeln!(css, "{name}: {value};");
        }
        css
    }
}

impl Serialize for StyleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
