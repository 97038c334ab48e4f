//! Skyrecords CLI - drive the reference-data engine from a terminal

use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use skyrecords::config::{self, SkyrecordsConfig};
use skyrecords::storage::Database;
use skyrecords::ui;
use skyrecords::{Engine, EntityKind, Event, Response};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "skyrecords")]
#[command(version)]
#[command(about = "Event-driven engine for continent, country and region reference data")]
#[command(long_about = r#"
Skyrecords keeps aviation reference data (continents, countries, regions)
in a single SQLite file and answers UI events against it.

Example usage:
  skyrecords init --database airport.db --write-config
  skyrecords search country --name Nepal
  skyrecords load region 12
  echo '{"event": "load_continent", "id": 1}' | skyrecords serve --database airport.db
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the continent, country and region tables
    Init {
        /// Path to the database file
        #[arg(short, long)]
        database: PathBuf,

        /// Record the database path in skyrecords.toml
        #[arg(long)]
        write_config: bool,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Read JSON events from stdin and write JSON responses to stdout
    Serve {
        /// Database to open before reading events
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Exact-match search for records
    Search {
        /// continent, country or region
        entity: String,

        #[arg(short, long)]
        name: Option<String>,

        /// Continent/country code, or region code for regions
        #[arg(short, long)]
        code: Option<String>,

        /// Local code (regions only)
        #[arg(short, long)]
        local_code: Option<String>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Load one record by id
    Load {
        /// continent, country or region
        entity: String,

        id: i64,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    // Initialize logging; stdout is reserved for command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        let level = config.as_ref().and_then(|c| c.log_level.as_deref()).unwrap_or("info");
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Init { database, write_config, force } => {
            config::ensure_db_dir(&database)?;
            Database::create(&database)?.close()?;
            ui::success(&format!("Initialized {}", database.display()));

            if write_config {
                let path = cli.config.clone().unwrap_or_else(config::default_config_path);
                let new_config = SkyrecordsConfig {
                    database: Some(database),
                    ..config.unwrap_or_default()
                };
                config::write_config(&path, &new_config, force)?;
                ui::info("Config written", &path.display().to_string());
            }
        }

        Commands::Serve { database } => {
            let database = database.or_else(|| config.as_ref().and_then(|c| c.database.clone()));
            serve(database)?;
        }

        Commands::Search { entity, name, code, local_code, database } => {
            let kind: EntityKind = entity.parse()?;
            let event = match kind {
                EntityKind::Continent => Event::StartContinentSearch { name, code },
                EntityKind::Country => Event::StartCountrySearch { name, code },
                EntityKind::Region => Event::StartRegionSearch { name, region_code: code, local_code },
            };
            if !cli.json {
                ui::header(&format!("Searching {} records", kind));
            }
            let database = config::resolve_database(database, config.as_ref())?;
            run_once(&database, event, cli.json)?;
        }

        Commands::Load { entity, id, database } => {
            let kind: EntityKind = entity.parse()?;
            let event = match kind {
                EntityKind::Continent => Event::LoadContinent { id },
                EntityKind::Country => Event::LoadCountry { id },
                EntityKind::Region => Event::LoadRegion { id },
            };
            let database = config::resolve_database(database, config.as_ref())?;
            run_once(&database, event, cli.json)?;
        }
    }

    Ok(())
}

/// Open `database`, process a single event and render what comes back.
fn run_once(database: &std::path::Path, event: Event, json: bool) -> anyhow::Result<()> {
    let mut engine = Engine::new();
    let opened = engine.process(Event::OpenDatabase { path: database.to_path_buf() });
    if let Some(Response::DatabaseOpenFailed { message }) = opened.first() {
        anyhow::bail!("{}", message);
    }

    let responses = engine.process(event);
    let failed = responses.iter().any(Response::is_failure);

    if json {
        println!("{}", serde_json::to_string_pretty(&responses)?);
    } else if responses.is_empty() {
        ui::warn("No records found.");
    } else {
        for response in &responses {
            ui::response(response);
        }
    }

    engine.process(Event::CloseDatabase);
    if failed {
        std::process::exit(1);
    }
    Ok(())
}

/// JSON-lines loop: one `Event` per input line, one `Response` per output line.
fn serve(database: Option<PathBuf>) -> anyhow::Result<()> {
    let mut engine = Engine::new();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Some(path) = database {
        for response in engine.process(Event::OpenDatabase { path }) {
            writeln!(out, "{}", serde_json::to_string(&response)?)?;
        }
        out.flush()?;
    }

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let responses = match serde_json::from_str::<Event>(&line) {
            Ok(event) => engine.process(event),
            Err(e) => {
                tracing::warn!("Ignoring malformed event: {}", e);
                vec![Response::Error { message: format!("malformed event: {}", e) }]
            }
        };

        let quit = responses.contains(&Response::EndApplication);
        for response in &responses {
            writeln!(out, "{}", serde_json::to_string(response)?)?;
        }
        out.flush()?;

        if quit {
            break;
        }
    }

    if engine.is_open() {
        engine.process(Event::CloseDatabase);
    }
    tracing::debug!("Serve loop finished");
    Ok(())
}
