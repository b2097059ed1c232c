//! Selection state: the current theme and the dark-mode flag.
//!
//! A fresh `Selection` holds the defaults and never touches link state on
//! its own. Callers pull link values in with [`Selection::hydrate`] once
//! they are ready, and push changes back with [`Selection::write_link`].

use log::debug;

use crate::link::{self, DARK_MODE_KEY, DEFAULT_DARK_MODE, LinkState, THEME_KEY};
use crate::registry::Registry;
use crate::theme::{Mode, Theme};

#[derive(Debug, Clone)]
pub struct Selection<'r> {
    registry: &'r Registry,
    theme: Theme,
    dark_mode: bool,
    hydrated: bool,
}

impl<'r> Selection<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            theme: registry.default_theme().clone(),
            dark_mode: DEFAULT_DARK_MODE,
            hydrated: false,
        }
    }

    /// Initialize from link state. Keys missing from the link keep their
    /// current value.
    pub fn hydrate(&mut self, link: &impl LinkState) {
        if let Some(token) = link.get(THEME_KEY) {
            self.theme = link::deserialize_theme(self.registry, &token).clone();
        }
        if let Some(token) = link.get(DARK_MODE_KEY) {
            self.dark_mode = link::deserialize_dark_mode(&token);
        }
        self.hydrated = true;
        debug!(
            "selection: hydrated theme={}, dark_mode={}",
            self.theme.id, self.dark_mode
        );
    }

    /// Write both keys to the link.
    pub fn write_link(&self, link: &mut impl LinkState) {
        link.set(THEME_KEY, &link::serialize_theme(self.registry, &self.theme));
        link.set(DARK_MODE_KEY, &link::serialize_dark_mode(self.dark_mode));
    }

    pub fn set_theme(&mut self, theme: &Theme) {
        self.theme = theme.clone();
    }

    /// Select a registry theme by id. Unknown ids leave the selection as is.
    pub fn select(&mut self, id: &str) -> bool {
        match self.registry.lookup(id) {
            Some(theme) => {
                self.theme = theme.clone();
                true
            }
            None => false,
        }
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.dark_mode = dark_mode;
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn mode(&self) -> Mode {
        Mode::from_dark_mode(self.dark_mode)
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Fragment;

    #[test]
    fn defaults() {
        let selection = Selection::new(Registry::builtin());
        assert_eq!(selection.theme().id, "candy");
        assert!(selection.dark_mode());
        assert_eq!(selection.mode(), Mode::Dark);
        assert!(!selection.is_hydrated());
    }

    #[test]
    fn hydrate_from_fragment() {
        let mut selection = Selection::new(Registry::builtin());
        selection.hydrate(&Fragment::parse("#theme=ice&darkMode=false"));
        assert!(selection.is_hydrated());
        assert_eq!(selection.theme().id, "ice");
        assert!(!selection.dark_mode());
        assert_eq!(selection.mode(), Mode::Light);
    }

    #[test]
    fn hydrate_keeps_values_for_missing_keys() {
        let mut selection = Selection::new(Registry::builtin());
        selection.select("sunset");
        selection.set_dark_mode(false);
        selection.hydrate(&Fragment::parse(""));
        assert_eq!(selection.theme().id, "sunset");
        assert!(!selection.dark_mode());
        assert!(selection.is_hydrated());
    }

    #[test]
    fn hydrate_unknown_theme_falls_back_to_default() {
        let mut selection = Selection::new(Registry::builtin());
        selection.select("sunset");
        selection.hydrate(&Fragment::parse("theme=nonexistent"));
        assert_eq!(selection.theme().id, "candy");

        selection.select("sunset");
        selection.hydrate(&Fragment::parse("theme="));
        assert_eq!(selection.theme().id, "candy");
    }

    #[test]
    fn hidden_theme_resolves_from_link() {
        let mut selection = Selection::new(Registry::builtin());
        selection.hydrate(&Fragment::parse("theme=supabase"));
        assert_eq!(selection.theme().id, "supabase");
    }

    #[test]
    fn select_unknown_id_is_noop() {
        let mut selection = Selection::new(Registry::builtin());
        assert!(selection.select("meadow"));
        assert!(!selection.select("nonexistent"));
        assert_eq!(selection.theme().id, "meadow");
    }

    #[test]
    fn toggle() {
        let mut selection = Selection::new(Registry::builtin());
        selection.toggle_dark_mode();
        assert!(!selection.dark_mode());
        selection.toggle_dark_mode();
        assert!(selection.dark_mode());
    }

    #[test]
    fn write_then_hydrate_round_trip() {
        let registry = Registry::builtin();
        let mut selection = Selection::new(registry);
        selection.select("midnight");
        selection.set_dark_mode(false);

        let mut fragment = Fragment::default();
        selection.write_link(&mut fragment);
        assert_eq!(fragment.to_string(), "#theme=midnight&darkMode=false");

        let mut restored = Selection::new(registry);
        restored.hydrate(&fragment);
        assert_eq!(restored.theme(), selection.theme());
        assert_eq!(restored.dark_mode(), selection.dark_mode());
    }

    #[test]
    fn foreign_theme_writes_empty_token() {
        let registry = Registry::builtin();
        let mut theme = registry.lookup("ice").unwrap().clone();
        theme.name = "Glacier".into();

        let mut selection = Selection::new(registry);
        selection.set_theme(&theme);
        let mut fragment = Fragment::default();
        selection.write_link(&mut fragment);
        assert_eq!(fragment.get(THEME_KEY).as_deref(), Some(""));

        // An empty token reads back as the default theme
        let mut restored = Selection::new(registry);
        restored.hydrate(&fragment);
        assert_eq!(restored.theme().id, "candy");
    }
}
