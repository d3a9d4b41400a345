//! Command-line interface for startup-layers.
//!
//! Manages the layout catalog outside the editor. The commands drive the
//! same [`StartupLayers`] orchestration as the editor binding, through a
//! terminal implementation of [`EditorHost`].

use crate::error::LayoutError;
use crate::host::EditorHost;
use crate::host::memory::MemoryMap;
use crate::layer::codec::decode_layout;
use crate::layer::{LayerKind, LayerSnapshot};
use crate::menu::{ActionId, ActionSpec, MenuItem};
use crate::plugin::StartupLayers;
use crate::store::LayoutStore;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use startup_layers_config::{Config, is_reserved_layout_name};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

/// startup-layers - named layer layouts for new tile maps
#[derive(Parser)]
#[command(name = "startup-layers")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root directory containing `storage/startup_layers` (overrides config)
    #[arg(long, value_name = "DIR", global = true)]
    pub storage: Option<PathBuf>,

    /// Set debug log level (overrides config and RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the storage directory and seed the starter layouts
    Init,

    /// List known layouts, marking the selected one
    List,

    /// Print the layers of a layout
    Show {
        /// Layout name
        name: String,
    },

    /// Select the layout applied to new maps
    Select {
        /// Layout name
        name: String,
    },

    /// Delete a user layout
    Delete {
        /// Layout name
        name: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show where layouts are stored
    About,

    /// Show the saved settings, or change them with the options below
    Settings {
        /// Root directory containing `storage/startup_layers`
        #[arg(long, value_name = "DIR")]
        storage_root: Option<PathBuf>,

        /// Menu that receives the layout actions
        #[arg(long, value_name = "MENU")]
        menu: Option<String>,

        /// Menu action the layout block is inserted before
        #[arg(long, value_name = "ACTION")]
        before: Option<String>,
    },
}

/// Requested changes to the settings file.
#[derive(Debug, Default)]
pub struct SettingsUpdate {
    pub storage_root: Option<PathBuf>,
    pub menu: Option<String>,
    pub before: Option<String>,
}

impl SettingsUpdate {
    /// Apply to `config`. Returns `true` if anything was given.
    pub fn apply(self, config: &mut Config) -> bool {
        let mut changed = false;
        if let Some(root) = self.storage_root {
            config.storage_root = Some(root);
            changed = true;
        }
        if let Some(menu) = self.menu {
            config.menu.menu = menu;
            changed = true;
        }
        if let Some(before) = self.before {
            config.menu.before = before;
            changed = true;
        }
        changed
    }
}

/// [`EditorHost`] on a terminal: dialogs on stdin/stderr, no menus.
pub struct TerminalHost {
    assume_yes: bool,
}

impl TerminalHost {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    fn read_answer(question: &str) -> Option<String> {
        eprint!("{question}");
        let _ = io::stderr().flush();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl EditorHost for TerminalHost {
    fn confirm(&mut self, text: &str, title: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        Self::read_answer(&format!("{title} {text} [y/N] "))
            .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }

    fn prompt(&mut self, label: &str, initial: &str, _title: &str) -> Option<String> {
        let answer = Self::read_answer(&format!("{label} [{initial}]: "))?;
        if answer.is_empty() {
            Some(initial.to_string())
        } else {
            Some(answer)
        }
    }

    fn alert(&mut self, text: &str, _title: &str) {
        println!("{text}");
    }

    fn log(&mut self, message: &str) {
        crate::debug_info!("CONSOLE", "{}", message);
    }

    fn warn(&mut self, message: &str) {
        eprintln!("warning: {message}");
    }

    fn register_action(&mut self, action: &ActionSpec) {
        crate::debug_trace!("CONSOLE", "register action {}", action.id);
    }

    fn set_action_enabled(&mut self, _id: &ActionId, _enabled: bool) {}

    fn set_action_checked(&mut self, _id: &ActionId, _checked: bool) {}

    fn retire_action(&mut self, id: &ActionId) {
        crate::debug_trace!("CONSOLE", "retire action {}", id);
    }

    fn extend_menu(&mut self, _menu: &str, _before: &str, _items: &[MenuItem]) {}
}

/// Load settings and apply the `--storage` override.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load().context("Failed to load startup-layers settings")?;
    if let Some(root) = &cli.storage {
        config.storage_root = Some(root.clone());
    }
    Ok(config)
}

/// Run a parsed command.
pub fn run(cli: Cli, config: &Config) -> Result<()> {
    match cli.command {
        Commands::Init => {
            let store = LayoutStore::from_config(config);
            let seeded = store
                .ensure_builtins()
                .with_context(|| format!("Failed to initialize {:?}", store.dir()))?;
            if seeded {
                println!("Seeded starter layouts in {}", store.dir().display());
            } else {
                println!("Storage already initialized at {}", store.dir().display());
            }
        }
        Commands::List => {
            let plugin = start(config, &mut TerminalHost::new(false))?;
            for (name, checked) in plugin.registry().list_all() {
                println!("{} {}", if checked { "*" } else { " " }, name);
            }
        }
        Commands::Show { name } => {
            let store = LayoutStore::from_config(config);
            let text = store
                .read_layout(&name)
                .with_context(|| format!("Failed to read layout {name:?}"))?;
            let mut map = MemoryMap::new();
            let snapshots = decode_layout(&mut map, &text, 0)
                .with_context(|| format!("Failed to decode layout {name:?}"))?;
            print_layers(&snapshots);
        }
        Commands::Select { name } => {
            let mut host = TerminalHost::new(false);
            let mut plugin = start(config, &mut host)?;
            if let Err(err) = plugin.switch_layout(&name, &mut host) {
                plugin.report(err, &mut host);
            }
            if let Some(selected) = plugin.selected_layout() {
                println!("Selected layout: {selected}");
            }
        }
        Commands::Delete { name, yes } => {
            let mut host = TerminalHost::new(yes);
            let mut plugin = start(config, &mut host)?;
            ensure_deletable(&plugin, &name)
                .with_context(|| format!("Cannot delete layout {name:?}"))?;
            let question = format!(
                "This will permanently delete {:?}.",
                plugin.store().config_path(&name)
            );
            if !host.confirm(&question, "Are you sure ?") {
                println!("Deletion cancelled.");
                return Ok(());
            }
            plugin
                .delete_layout(&name, &mut host)
                .with_context(|| format!("Failed to delete layout {name:?}"))?;
            println!("Deleted layout {name:?}");
        }
        Commands::About => {
            let mut host = TerminalHost::new(false);
            start(config, &mut host)?.about(&mut host);
        }
        Commands::Settings {
            storage_root,
            menu,
            before,
        } => {
            // Reload so the `--storage` override is not persisted.
            let path = Config::config_path();
            let mut settings = Config::load()?;
            let update = SettingsUpdate {
                storage_root,
                menu,
                before,
            };
            if update.apply(&mut settings) {
                settings.save()?;
                println!("Saved settings to {}", path.display());
            }
            println!("Storage:   {}", settings.storage_dir().display());
            println!(
                "Menu:      {} (before \"{}\")",
                settings.menu.menu, settings.menu.before
            );
            println!("Log level: {:?}", settings.log_level);
        }
    }
    Ok(())
}

/// Refuse names `delete` can never remove before asking for confirmation.
fn ensure_deletable(plugin: &StartupLayers, name: &str) -> crate::error::Result<()> {
    if is_reserved_layout_name(name) {
        return Err(LayoutError::ReservedName(name.to_string()));
    }
    if !plugin.registry().contains(name) {
        return Err(LayoutError::NotFound(name.to_string()));
    }
    Ok(())
}

fn start(config: &Config, host: &mut TerminalHost) -> Result<StartupLayers> {
    StartupLayers::from_config(config, host).context("Failed to open the layout storage")
}

fn print_layers(snapshots: &[LayerSnapshot]) {
    let mut position = 0;
    for snapshot in snapshots {
        let flags = format!(
            "{}{}{}",
            if snapshot.visible { 'v' } else { '-' },
            if snapshot.locked { 'l' } else { '-' },
            if snapshot.selected { 's' } else { '-' },
        );
        if snapshot.kind == LayerKind::GroupLayer {
            println!(
                "  -  {:<12} {:?} (skipped, group layers are not supported)",
                snapshot.kind.as_str(),
                snapshot.name
            );
            continue;
        }
        println!(
            "{position:>3}  {:<12} {:<24} opacity {:.2}  tint {}  {flags}  depth {}",
            snapshot.kind.as_str(),
            format!("{:?}", snapshot.name),
            snapshot.opacity,
            snapshot.tint_color,
            snapshot.depth
        );
        position += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryHost;
    use startup_layers_config::MenuPlacement;
    use tempfile::tempdir;

    fn started(dir: &std::path::Path) -> StartupLayers {
        let store = LayoutStore::new(dir);
        store.write_layout("combat", "").unwrap();
        StartupLayers::start(store, MenuPlacement::default(), &mut MemoryHost::new()).unwrap()
    }

    #[test]
    fn test_delete_rejects_before_confirming() {
        let temp = tempdir().unwrap();
        let plugin = started(temp.path());

        assert!(matches!(
            ensure_deletable(&plugin, "default images"),
            Err(LayoutError::ReservedName(name)) if name == "default images"
        ));
        assert!(matches!(
            ensure_deletable(&plugin, "ghost"),
            Err(LayoutError::NotFound(name)) if name == "ghost"
        ));
        assert!(ensure_deletable(&plugin, "combat").is_ok());
        assert!(ensure_deletable(&plugin, "blank").is_ok());
    }

    #[test]
    fn test_settings_update_round_trips_through_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");

        let mut settings = Config::load_from(&path).unwrap();
        assert!(!SettingsUpdate::default().apply(&mut settings));

        let update = SettingsUpdate {
            storage_root: Some(temp.path().join("tiled")),
            before: Some("Export".to_string()),
            ..SettingsUpdate::default()
        };
        assert!(update.apply(&mut settings));
        settings.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.menu.menu, "File");
        assert_eq!(loaded.menu.before, "Export");
        assert_eq!(
            loaded.storage_dir(),
            temp.path().join("tiled").join("storage").join("startup_layers")
        );
    }
}
