use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::link::DEFAULT_DARK_MODE;
use crate::registry::Registry;

/// Environment variable naming the deployment environment.
pub const ENV_VAR: &str = "RAYSHOT_ENV";
/// Environment variable holding the host of a preview deployment.
pub const PREVIEW_HOST_VAR: &str = "RAYSHOT_PREVIEW_HOST";

const DEVELOPMENT_URL: &str = "http://localhost:3000";
const PRODUCTION_URL: &str = "https://www.ray.so";

// ---------------------------------------------------------------------------
// Environment: selects the public base URL
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Preview,
    Production,
}

impl Environment {
    /// Public base URL used to build absolute asset URLs.
    ///
    /// A preview deployment without a known host falls back to production.
    pub fn base_url(self, preview_host: Option<&str>) -> String {
        match self {
            Environment::Development => DEVELOPMENT_URL.to_string(),
            Environment::Production => PRODUCTION_URL.to_string(),
            Environment::Preview => match preview_host.filter(|h| !h.is_empty()) {
                Some(host) => format!("https://{host}"),
                None => {
                    warn!("config: preview environment without a host, using {PRODUCTION_URL}");
                    PRODUCTION_URL.to_string()
                }
            },
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "development" => Ok(Environment::Development),
            "preview" => Ok(Environment::Preview),
            "production" => Ok(Environment::Production),
            other => anyhow::bail!(
                "unknown environment '{other}' (expected development, preview or production)"
            ),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Preview => "preview",
            Environment::Production => "production",
        })
    }
}

// ---------------------------------------------------------------------------
// ConfigFile: deserialized from TOML (all fields optional)
// ---------------------------------------------------------------------------

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub theme: Option<String>,
    pub dark_mode: Option<bool>,
    pub environment: Option<Environment>,
    pub preview_host: Option<String>,
    /// Extra `[[theme]]` table appended to the built-in themes.
    pub themes_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Config: resolved (all fields concrete)
// ---------------------------------------------------------------------------

pub struct Config {
    /// Theme id selected when no link overrides it.
    pub theme: String,
    pub dark_mode: bool,
    pub environment: Environment,
    pub base_url: String,
    pub themes_file: Option<PathBuf>,
}

impl ConfigFile {
    /// Merge deployment settings from environment variables (`RAYSHOT_ENV`,
    /// `RAYSHOT_PREVIEW_HOST`). Unset variables leave the file values.
    pub fn merge_env(&mut self) -> anyhow::Result<()> {
        self.merge_env_with(|key| std::env::var(key).ok())
    }

    fn merge_env_with(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(v) = var(ENV_VAR) {
            debug!("config: env override environment={v}");
            let environment = v
                .parse::<Environment>()
                .with_context(|| format!("invalid {ENV_VAR}"))?;
            self.environment = Some(environment);
        }
        if let Some(v) = var(PREVIEW_HOST_VAR) {
            debug!("config: env override preview_host={v}");
            self.preview_host = Some(v);
        }
        Ok(())
    }

    /// Merge CLI values (overwrites non-None fields).
    pub fn merge_cli(&mut self, theme: Option<String>, dark_mode: Option<bool>) {
        if let Some(ref v) = theme {
            debug!("config: CLI override theme={v}");
            self.theme = theme;
        }
        if let Some(v) = dark_mode {
            debug!("config: CLI override dark_mode={v}");
            self.dark_mode = dark_mode;
        }
    }

    /// Resolve to a Config by applying defaults to missing fields.
    pub fn resolve(self) -> Config {
        let environment = self.environment.unwrap_or_default();
        let config = Config {
            theme: self
                .theme
                .unwrap_or_else(|| Registry::builtin().default_theme().id.clone()),
            dark_mode: self.dark_mode.unwrap_or(DEFAULT_DARK_MODE),
            environment,
            base_url: environment.base_url(self.preview_host.as_deref()),
            themes_file: self.themes_file,
        };
        info!(
            "config: resolved theme={}, dark_mode={}, environment={}, base_url={}, themes_file={:?}",
            config.theme, config.dark_mode, config.environment, config.base_url, config.themes_file,
        );
        config
    }
}

impl Config {
    /// Built-in registry, extended with `themes_file` when configured.
    pub fn registry(&self) -> anyhow::Result<Registry> {
        let builtin = Registry::builtin();
        let Some(path) = &self.themes_file else {
            return Ok(builtin.clone());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let registry = builtin
            .with_extra(&text)
            .with_context(|| format!("invalid theme table {}", path.display()))?;
        info!(
            "config: loaded {} extra theme(s) from {}",
            registry.len() - builtin.len(),
            path.display()
        );
        Ok(registry)
    }
}

/// Resolve the XDG config path for rayshot.
fn config_path() -> Option<PathBuf> {
    let config_dir = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config"))
        })?;
    Some(config_dir.join("rayshot").join("config.toml"))
}

/// Load config file. Returns `ConfigFile::default()` if no file exists.
/// Returns an error if the file exists but cannot be parsed.
pub fn load_config() -> anyhow::Result<ConfigFile> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            info!("config: no HOME or XDG_CONFIG_HOME set, using defaults");
            return Ok(ConfigFile::default());
        }
    };
    debug!("config: looking for {}", path.display());
    match std::fs::read_to_string(&path) {
        Ok(text) => {
            info!("config: loaded from {}", path.display());
            let cfg: ConfigFile = toml::from_str(&text)
                .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("config: {} not found, using defaults", path.display());
            Ok(ConfigFile::default())
        }
        Err(e) => Err(anyhow::anyhow!("failed to read {}: {e}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml() {
        let cfg: ConfigFile = toml::from_str("").unwrap();
        let resolved = cfg.resolve();
        assert_eq!(resolved.theme, "candy");
        assert!(resolved.dark_mode);
        assert_eq!(resolved.environment, Environment::Development);
        assert_eq!(resolved.base_url, "http://localhost:3000");
        assert!(resolved.themes_file.is_none());
    }

    #[test]
    fn partial_toml() {
        let text = r#"
            dark_mode = false
            environment = "production"
        "#;
        let cfg: ConfigFile = toml::from_str(text).unwrap();
        let resolved = cfg.resolve();
        assert!(!resolved.dark_mode);
        assert_eq!(resolved.base_url, "https://www.ray.so");
        // Defaults for unspecified fields
        assert_eq!(resolved.theme, "candy");
    }

    #[test]
    fn invalid_toml() {
        let text = "this is not valid toml [[[";
        let result = toml::from_str::<ConfigFile>(text);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_environment_in_toml() {
        let result = toml::from_str::<ConfigFile>(r#"environment = "staging""#);
        assert!(result.is_err());
    }

    #[test]
    fn cli_overrides() {
        let mut cfg: ConfigFile = toml::from_str("theme = \"ice\"\ndark_mode = true").unwrap();
        cfg.merge_cli(Some("sunset".into()), Some(false));
        let resolved = cfg.resolve();
        assert_eq!(resolved.theme, "sunset"); // CLI wins
        assert!(!resolved.dark_mode);
    }

    #[test]
    fn cli_none_keeps_file_values() {
        let mut cfg: ConfigFile = toml::from_str("theme = \"ice\"").unwrap();
        cfg.merge_cli(None, None);
        let resolved = cfg.resolve();
        assert_eq!(resolved.theme, "ice");
        assert!(resolved.dark_mode);
    }

    #[test]
    fn env_overrides() {
        let mut cfg: ConfigFile = toml::from_str(r#"environment = "production""#).unwrap();
        cfg.merge_env_with(|key| match key {
            ENV_VAR => Some("preview".into()),
            PREVIEW_HOST_VAR => Some("rayshot-git-main.example.invalid".into()),
            _ => None,
        })
        .unwrap();
        let resolved = cfg.resolve();
        assert_eq!(resolved.environment, Environment::Preview);
        assert_eq!(resolved.base_url, "https://rayshot-git-main.example.invalid");
    }

    #[test]
    fn invalid_env_value() {
        let mut cfg = ConfigFile::default();
        let err = cfg
            .merge_env_with(|key| (key == ENV_VAR).then(|| "staging".into()))
            .unwrap_err();
        assert!(format!("{err:#}").contains("unknown environment 'staging'"));
    }

    #[test]
    fn base_urls() {
        assert_eq!(Environment::Development.base_url(None), "http://localhost:3000");
        assert_eq!(Environment::Production.base_url(Some("x")), "https://www.ray.so");
        assert_eq!(
            Environment::Preview.base_url(Some("pr-12.example.invalid")),
            "https://pr-12.example.invalid"
        );
        assert_eq!(Environment::Preview.base_url(None), "https://www.ray.so");
        assert_eq!(Environment::Preview.base_url(Some("")), "https://www.ray.so");
    }

    #[test]
    fn registry_without_themes_file() {
        let cfg = ConfigFile::default().resolve();
        assert_eq!(cfg.registry().unwrap().len(), 15);
    }

    #[test]
    fn registry_missing_themes_file() {
        let mut cfg = ConfigFile::default().resolve();
        cfg.themes_file = Some(PathBuf::from("/nonexistent/rayshot/themes.toml"));
        let err = cfg.registry().unwrap_err();
        assert!(format!("{err:#}").contains("failed to read"));
    }
}
