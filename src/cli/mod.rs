//! CLI commands for memopad using clap.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{load_settings_or_default, Settings};
use crate::memo::{sort_for_listing, validate_title, Memo, MemoStore};

/// memopad - keep short text memos in a local SQLite file.
#[derive(Parser)]
#[command(name = "memopad")]
#[command(version)]
#[command(about = "memopad - a single-table memo pad", long_about = None)]
pub struct Commands {
    /// Database file (overrides settings.json)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the database schema if needed
    Init,

    /// List memos, most recently created first
    #[command(alias = "ls")]
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show one memo
    Show {
        /// Memo ID
        id: i64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Add a memo
    Add {
        /// Title
        title: String,

        /// Content
        #[arg(default_value = "")]
        content: String,
    },

    /// Edit a memo (ID 0 creates a new one)
    Edit {
        /// Memo ID
        id: i64,

        /// New title
        title: String,

        /// New content
        #[arg(default_value = "")]
        content: String,
    },

    /// Delete a memo
    #[command(alias = "rm")]
    Delete {
        /// Memo ID
        id: i64,

        /// Skip the confirmation step
        #[arg(long)]
        yes: bool,
    },

    /// Start the JSON web API
    Web {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Commands {
    /// Run the command.
    pub async fn run(&self) -> Result<()> {
        let settings = load_settings_or_default().context("failed to load settings")?;
        let store = open_store(&settings, self.db.as_deref())?;

        match &self.command {
            Command::Init => cmd_init(&store),
            Command::List { json } => cmd_list(&store, *json),
            Command::Show { id, json } => cmd_show(&store, *id, *json),
            Command::Add { title, content } => cmd_add(&store, title, content),
            Command::Edit { id, title, content } => cmd_edit(&store, *id, title, content),
            Command::Delete { id, yes } => cmd_delete(&store, *id, *yes),
            Command::Web { host, port } => {
                cmd_web(store, &settings, host.clone(), *port).await
            }
        }
    }
}

/// Open the configured database and make sure the schema exists.
fn open_store(settings: &Settings, override_path: Option<&Path>) -> Result<MemoStore> {
    let path = settings.database_path(override_path)?;
    tracing::info!("Using memo database {}", path.display());
    let store = MemoStore::open(&path)
        .with_context(|| format!("failed to open memo database {}", path.display()))?;
    store
        .initialize()
        .with_context(|| format!("failed to initialize memo database {}", path.display()))?;
    Ok(store)
}

// Command implementations

fn cmd_init(store: &MemoStore) -> Result<()> {
    let location = store
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ":memory:".to_string());
    println!("Database: {}", location);
    println!("Memos:    {}", store.count()?);
    Ok(())
}

/// Memos in list-screen order.
fn list_view(store: &MemoStore) -> Result<Vec<Memo>> {
    let mut memos = store.list()?;
    sort_for_listing(&mut memos);
    Ok(memos)
}

fn cmd_list(store: &MemoStore, json: bool) -> Result<()> {
    let memos = list_view(store)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&memos)?);
        return Ok(());
    }
    if memos.is_empty() {
        println!("No memos yet.");
        return Ok(());
    }
    for memo in &memos {
        println!("{}", format_list_line(memo));
    }
    Ok(())
}

fn cmd_show(store: &MemoStore, id: i64, json: bool) -> Result<()> {
    match store.get_by_id(id)? {
        Some(memo) if json => println!("{}", serde_json::to_string_pretty(&memo)?),
        Some(memo) => println!("{}", format_detail(&memo)),
        None => println!("Memo not found: {}", id),
    }
    Ok(())
}

fn cmd_add(store: &MemoStore, title: &str, content: &str) -> Result<()> {
    validate_title(title)?;
    let id = store.add(title, content)?;
    println!("Added memo #{}", id);
    Ok(())
}

fn cmd_edit(store: &MemoStore, id: i64, title: &str, content: &str) -> Result<()> {
    validate_title(title)?;
    let saved = store.update(Some(id), title, content)?;
    if saved == id {
        println!("Updated memo #{}", saved);
    } else {
        println!("Added memo #{}", saved);
    }
    Ok(())
}

fn cmd_delete(store: &MemoStore, id: i64, yes: bool) -> Result<()> {
    if !yes {
        match store.get_by_id(id)? {
            Some(memo) => {
                println!("This will delete memo #{}: {}", memo.id, memo.display_title());
                println!("Run with --yes to confirm.");
            }
            None => println!("Memo not found: {}", id),
        }
        return Ok(());
    }

    if store.delete_by_id(id)? {
        println!("Deleted memo #{}", id);
    } else {
        println!("Memo not found: {}", id);
    }
    Ok(())
}

async fn cmd_web(
    store: MemoStore,
    settings: &Settings,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    use crate::web::{run_server, WebServerConfig};

    let config = WebServerConfig {
        host: host.unwrap_or_else(|| settings.web.host.clone()),
        port: port.unwrap_or(settings.web.port),
    };

    println!("Starting web server on {}:{}...", config.host, config.port);
    println!("API endpoints:");
    println!("  http://{}:{}/api/memos", config.host, config.port);
    println!("  http://{}:{}/health", config.host, config.port);
    println!();
    println!("Press Ctrl+C to stop");

    run_server(config, Arc::new(store))
        .await
        .context("web server error")?;
    Ok(())
}

/// One line of the list screen.
fn format_list_line(memo: &Memo) -> String {
    format!(
        "#{:<4} {:<24}  {}",
        memo.id,
        memo.display_date(),
        memo.display_title()
    )
}

/// The detail screen.
fn format_detail(memo: &Memo) -> String {
    let mut out = format!(
        "#{} {}\n{}\n",
        memo.id,
        memo.display_title(),
        memo.display_date()
    );
    if let Some(content) = memo.content.as_deref().filter(|c| !c.is_empty()) {
        out.push('\n');
        out.push_str(content);
    }
    out
}
