pub mod config;
pub mod link;
pub mod registry;
pub mod state;
pub mod style;
pub mod theme;
pub mod unlocked;
pub mod view;
