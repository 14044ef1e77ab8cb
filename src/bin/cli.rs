//! homedash CLI
//!
//! Offline maintenance over the dashboard's SQLite store:
//! - Inspect stored keys and values
//! - Clear a widget's data or everything
//! - Edit the shopping list
//! - Generate a default config file
//!
//! Stop the server first; both processes would otherwise write the same file.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use homedash::config::{generate_default_config, Config};
use homedash::storage::{KeyValueStore, Namespace, SqliteStore};
use homedash::widgets::shopping::ShoppingList;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "homedash-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and maintain homedash data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database file (default: from config)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file used to locate the database
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List stored keys
    Keys {
        /// Only keys starting with this prefix (e.g. "mood:")
        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Print a stored value as pretty JSON
    Show {
        /// Full key, e.g. "shopping:items"
        key: String,
    },

    /// Delete stored data
    Clear {
        /// Only this widget's namespace (default: everything)
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Edit the shopping list
    Shopping {
        #[command(subcommand)]
        action: ShoppingAction,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ShoppingAction {
    /// Show items in priority order
    List,
    /// Add an item at the lowest priority
    Add { name: String },
    /// Remove an item by id
    Remove { id: String },
    /// Raise an item one place
    Up { id: String },
    /// Lower an item one place
    Down { id: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config { output } => write_config(output),
        command => {
            let store = open_store(cli.db, cli.config)?;
            run(command, store)
        }
    }
}

fn run(command: Commands, store: Arc<dyn KeyValueStore>) -> anyhow::Result<()> {
    match command {
        Commands::Keys { prefix } => {
            let keys = store.keys_with_prefix(prefix.as_deref().unwrap_or(""))?;
            if keys.is_empty() {
                println!("No keys found.");
            }
            for key in keys {
                println!("{}", key);
            }
        }

        Commands::Show { key } => match store.get(&key)? {
            Some(raw) => match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                Err(_) => println!("{}", raw),
            },
            None => bail!("Key not found: {}", key),
        },

        Commands::Clear { namespace } => match namespace {
            Some(name) => {
                let removed = Namespace::new(Arc::clone(&store), &name).clear()?;
                println!("Removed {} keys from '{}'", removed, name);
            }
            None => {
                store.clear()?;
                println!("All data cleared");
            }
        },

        Commands::Shopping { action } => {
            let mut list = ShoppingList::mount(store);
            match action {
                ShoppingAction::List => {}
                ShoppingAction::Add { name } => {
                    let item = list.add(&name)?;
                    println!("Added '{}' ({})", item.name, item.id);
                }
                ShoppingAction::Remove { id } => {
                    let item = list.remove(&id)?;
                    println!("Removed '{}'", item.name);
                }
                ShoppingAction::Up { id } => {
                    if !list.move_up(&id)? {
                        println!("Already at the top");
                    }
                }
                ShoppingAction::Down { id } => {
                    if !list.move_down(&id)? {
                        println!("Already at the bottom");
                    }
                }
            }
            print_shopping(&list);
        }

        Commands::Config { output } => write_config(output)?,
    }

    Ok(())
}

fn write_config(output: Option<PathBuf>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Config written to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn open_store(db: Option<PathBuf>, config: Option<PathBuf>) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let path = match db {
        Some(path) => path,
        None => {
            let config = match config {
                Some(path) => Config::load_with_env(&path)?,
                None => Config::load_default(),
            };
            config.storage.db_path()
        }
    };

    let store = SqliteStore::open(&path)
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    Ok(Arc::new(store))
}

fn print_shopping(list: &ShoppingList) {
    if list.is_empty() {
        println!("Shopping list is empty.");
        return;
    }

    println!("{:<4} {:<8} {:<30} {}", "#", "BAND", "ITEM", "ID");
    println!("{}", "-".repeat(80));
    for item in list.items() {
        println!(
            "{:<4} {:<8} {:<30} {}",
            item.priority,
            format!("{:?}", item.band()).to_lowercase(),
            item.name,
            item.id
        );
    }
}
