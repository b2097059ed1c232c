use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;

use rayshot::config::{self, Config};
use rayshot::link::{Fragment, LinkState};
use rayshot::registry::Registry;
use rayshot::state::Selection;
use rayshot::theme::{BUILTIN_TABLE, Mode};
use rayshot::unlocked::UnlockedThemes;
use rayshot::view::View;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("RAYSHOT_BUILD_GIT_HASH"),
    " ",
    env!("RAYSHOT_BUILD_PROFILE"),
    ")"
);

#[derive(Parser)]
#[command(
    name = "rayshot",
    about = "Theme catalog for code screenshots",
    version,
    long_version = LONG_VERSION
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Theme id (overrides the config file)
    #[arg(long, global = true)]
    theme: Option<String>,

    /// Use the light variant of the theme
    #[arg(long, global = true)]
    light: bool,

    /// Log output file path (logs go to stderr otherwise, filtered by RUST_LOG)
    #[arg(long, global = true)]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// List themes in display order
    List {
        /// Include hidden themes
        #[arg(long)]
        all: bool,

        /// Treat these hidden theme ids as unlocked
        #[arg(long, value_delimiter = ',')]
        unlocked: Vec<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the derived style of the selected theme
    Show {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the shareable link fragment for the selection
    Link,
    /// Resolve a link (full URL or `#fragment`) to a selection
    Resolve {
        link: String,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Validate a theme table (the built-in table when no file is given)
    Validate { file: Option<PathBuf> },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Css,
    Json,
}

fn main() {
    let cli = Cli::parse();

    if let Some(log_path) = &cli.log {
        let file = std::fs::File::create(log_path).expect("failed to open log file");
        env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    } else {
        env_logger::init();
    }

    // Load config file, then environment, then CLI overrides
    let mut cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };
    if let Err(e) = cfg.merge_env() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    let dark_mode = if cli.light { Some(false) } else { None };
    cfg.merge_cli(cli.theme, dark_mode);

    let config = cfg.resolve();

    let result = match cli.command {
        Command::List {
            all,
            unlocked,
            json,
        } => cmd_list(&config, all, &unlocked, json),
        Command::Show { format } => cmd_show(&config, None, format),
        Command::Link => cmd_link(&config),
        Command::Resolve { link, format } => cmd_show(&config, Some(&link), format),
        Command::Validate { file } => cmd_validate(file),
    };

    if let Err(e) = result {
        let msg = format!("{e:#}");
        if msg.contains("[BUG]") {
            eprintln!("\x1b[1;31m{msg}\x1b[0m");
        } else {
            eprintln!("Error: {msg}");
        }
        std::process::exit(1);
    }
}

/// Selection seeded from the resolved config.
fn configured_selection<'r>(config: &Config, registry: &'r Registry) -> Result<Selection<'r>> {
    let mut selection = Selection::new(registry);
    if !selection.select(&config.theme) {
        anyhow::bail!("unknown theme '{}'", config.theme);
    }
    selection.set_dark_mode(config.dark_mode);
    Ok(selection)
}

#[derive(Serialize)]
struct ThemeEntry<'a> {
    id: &'a str,
    name: &'a str,
    partner: bool,
    hidden: bool,
    icon_url: Option<String>,
}

fn cmd_list(config: &Config, all: bool, unlocked_ids: &[String], json: bool) -> Result<()> {
    let registry = config.registry()?;

    let mut unlocked = UnlockedThemes::default();
    for id in unlocked_ids {
        if !registry.contains(id) {
            anyhow::bail!("unknown theme '{id}'");
        }
        unlocked.insert_transient(id);
    }

    let themes: Vec<_> = if all {
        registry.iter().collect()
    } else {
        registry.selectable(&unlocked).collect()
    };
    info!("cmd_list: {} of {} theme(s)", themes.len(), registry.len());

    if json {
        let entries: Vec<ThemeEntry> = themes
            .iter()
            .map(|t| ThemeEntry {
                id: &t.id,
                name: &t.name,
                partner: t.partner,
                hidden: t.hidden,
                icon_url: t.icon_url(&config.base_url),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let default_id = &registry.default_theme().id;
    for theme in themes {
        let mut flags = Vec::new();
        if theme.id == *default_id {
            flags.push("default");
        }
        if theme.partner {
            flags.push("partner");
        }
        if theme.hidden {
            flags.push(if unlocked.contains(&theme.id) { "unlocked" } else { "hidden" });
        }
        println!("{:<12} {:<14} {}", theme.id, theme.name, flags.join(","));
    }
    Ok(())
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    id: &'a str,
    name: &'a str,
    mode: Mode,
    icon_url: Option<String>,
    #[serde(flatten)]
    view: View,
}

fn cmd_show(config: &Config, link: Option<&str>, format: Format) -> Result<()> {
    let registry = config.registry()?;
    let mut selection = configured_selection(config, &registry)?;
    if let Some(link) = link {
        selection.hydrate(&Fragment::from_link(link));
    }

    let theme = selection.theme();
    let view = View::derive(&selection);
    match format {
        Format::Text => {
            println!("theme:      {} ({})", theme.name, theme.id);
            println!("mode:       {}", selection.mode());
            println!("font:       {}", view.font);
            println!("background: {}", view.background);
            if let Some(url) = theme.icon_url(&config.base_url) {
                println!("icon:       {url}");
            }
            print!("{}", view.style.to_css());
        }
        Format::Css => {
            println!(":root {{");
            for line in view.style.to_css().lines() {
                println!("  {line}");
            }
            println!("}}");
        }
        Format::Json => {
            let output = ShowOutput {
                id: &theme.id,
                name: &theme.name,
                mode: selection.mode(),
                icon_url: theme.icon_url(&config.base_url),
                view,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn cmd_link(config: &Config) -> Result<()> {
    let registry = config.registry()?;
    let selection = configured_selection(config, &registry)?;
    let mut fragment = Fragment::default();
    selection.write_link(&mut fragment);
    info!("cmd_link: theme={:?}", fragment.get(rayshot::link::THEME_KEY));
    println!("{}/{fragment}", config.base_url);
    Ok(())
}

fn cmd_validate(file: Option<PathBuf>) -> Result<()> {
    let (label, text) = match file {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            (path.display().to_string(), text)
        }
        None => ("<built-in>".to_string(), BUILTIN_TABLE.to_string()),
    };
    let registry =
        Registry::from_toml(&text).with_context(|| format!("invalid theme table {label}"))?;
    println!(
        "{label}: {} theme(s), default '{}'",
        registry.len(),
        registry.default_theme().id
    );
    Ok(())
}
