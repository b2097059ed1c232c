//! Values derived from the selection: style variables, background
//! gradient and font. Recomputed on demand.

use std::fmt;

use serde::Serialize;

use crate::state::Selection;
use crate::style::{StyleMap, to_style_map};
use crate::theme::{FontId, Mode, Theme};

/// Font used when a theme does not name one.
pub const FALLBACK_FONT: &str = "jetbrains-mono";

/// Gradient direction in degrees.
pub const GRADIENT_ANGLE: u16 = 140;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gradient {
    pub angle: u16,
    pub from: String,
    pub to: String,
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "linear-gradient({}deg, {}, {})",
            self.angle, self.from, self.to
        )
    }
}

pub fn style_map(theme: &Theme, dark_mode: bool) -> StyleMap {
    to_style_map(Some(theme.colors(Mode::from_dark_mode(dark_mode))))
}

pub fn background(theme: &Theme) -> Gradient {
    Gradient {
        angle: GRADIENT_ANGLE,
        from: theme.background.from.clone(),
        to: theme.background.to.clone(),
    }
}

pub fn font(theme: &Theme) -> FontId {
    theme
        .font
        .clone()
        .unwrap_or_else(|| FontId::new(FALLBACK_FONT))
}

/// Everything the renderer needs for the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub style: StyleMap,
    #[serde(serialize_with = "serialize_display")]
    pub background: Gradient,
    pub font: FontId,
}

impl View {
    pub fn derive(selection: &Selection<'_>) -> Self {
        let theme = selection.theme();
        Self {
            style: style_map(theme, selection.dark_mode()),
            background: background(theme),
            font: font(theme),
        }
    }
}

fn serialize_display<T: fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
