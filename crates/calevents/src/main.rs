use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use calevents::config::Config;
use calevents::service::EventService;
use calevents_core::cache::Cache;
use calevents_core::calendar::EventInput;
use calevents_core::storage::EventStore;

/// calevents - Recurring calendar events behind a write-through cache
#[derive(Parser, Debug)]
#[command(name = "calevents")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database (overrides SQLITE_PATH)
    #[arg(long, global = true)]
    sqlite_path: Option<String>,

    /// Cache TTL in minutes (overrides CACHE_TTL_MINUTES)
    #[arg(long, global = true)]
    cache_ttl_minutes: Option<u64>,

    /// Redis connection URL (overrides REDIS_URL)
    #[arg(long, global = true)]
    redis_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an event from JSON input
    Create {
        /// JSON file with the event input; stdin when omitted
        #[arg(long, short)]
        file: Option<PathBuf>,
    },
    /// Show one event with its occurrences
    Get {
        /// Event ID
        id: Uuid,
    },
    /// List every event keyed by ID
    List,
    /// Replace an event from JSON input
    Update {
        /// Event ID
        id: Uuid,

        /// JSON file with the event input; stdin when omitted
        #[arg(long, short)]
        file: Option<PathBuf>,
    },
    /// Delete an event and its occurrences
    Delete {
        /// Event ID
        id: Uuid,
    },
}

#[derive(Serialize)]
struct Deleted {
    deleted: Uuid,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(path) = &self.sqlite_path {
            config.sqlite_path = path.clone();
        }
        if let Some(minutes) = self.cache_ttl_minutes {
            config.cache_ttl_minutes = minutes;
        }
        if let Some(url) = &self.redis_url {
            config.redis_url = url.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calevents=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.config();
    tracing::debug!(?config, "Loaded configuration");

    let store = Arc::new(open_store(&config).await?);
    let cache = Arc::new(open_cache(&config).await?);
    let service = EventService::new(store, cache, config.cache_ttl());

    run(cli.command, &service).await
}

async fn run<R, C>(command: Command, service: &EventService<R, C>) -> Result<()>
where
    R: EventStore,
    C: Cache,
{
    match command {
        Command::Create { file } => {
            let input = read_input(file)?;
            let event = service.create_event(&input).await?;
            tracing::info!(
                event_id = %event.id,
                occurrences = event.occurrences.len(),
                "Event created"
            );
            print_json(&event)
        }
        Command::Get { id } => print_json(&service.get_event(id).await?),
        Command::List => print_json(&service.get_all_events().await?),
        Command::Update { id, file } => {
            let input = read_input(file)?;
            let event = service.update_event(id, &input).await?;
            tracing::info!(
                event_id = %id,
                occurrences = event.occurrences.len(),
                "Event updated"
            );
            print_json(&event)
        }
        Command::Delete { id } => {
            service.delete_event(id).await?;
            tracing::info!(event_id = %id, "Event deleted");
            print_json(&Deleted { deleted: id })
        }
    }
}

fn read_input(file: Option<PathBuf>) -> Result<EventInput> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read event input from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("Invalid event input JSON")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(feature = "sqlite")]
async fn open_store(config: &Config) -> Result<calevents::storage::SqliteRepository> {
    tracing::debug!(path = %config.sqlite_path, "Opening SQLite store");
    calevents::storage::SqliteRepository::new(&config.sqlite_path)
        .await
        .with_context(|| format!("Failed to open {}", config.sqlite_path))
}

#[cfg(not(feature = "sqlite"))]
async fn open_store(_config: &Config) -> Result<calevents::storage::InMemoryRepository> {
    tracing::warn!("Built without SQLite; events are kept in memory for this run only");
    Ok(calevents::storage::InMemoryRepository::new())
}

#[cfg(feature = "redis")]
async fn open_cache(config: &Config) -> Result<calevents::cache::FallbackCache> {
    calevents::cache::FallbackCache::connect(
        &config.redis_url,
        std::time::Duration::from_secs(5),
        config.cache_max_entries,
    )
    .await
    .context("Failed to build cache")
}

#[cfg(not(feature = "redis"))]
async fn open_cache(config: &Config) -> Result<calevents::cache::MemoryCache> {
    Ok(calevents::cache::MemoryCache::new(config.cache_max_entries)?)
}
