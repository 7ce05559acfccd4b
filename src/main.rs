//! comic-rs server entry point.

use clap::Parser;
use comic_rs::{
    config::{Cli, Command, Config, LibraryCommand},
    db::Database,
    library::scanner,
    server,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Find or load config
    let config_path = cli.config.clone().or_else(Config::find_config_file);

    let config = if let Some(ref path) = config_path {
        Config::load(path)?
    } else {
        Config::default()
    };

    // Handle command
    match cli.command {
        Some(Command::Init { force }) => cmd_init(force).await,
        Some(Command::Library { action }) => cmd_library(action, &config).await,
        Some(Command::Serve { bind }) => cmd_serve(config, bind).await,
        None => {
            // Default: start server
            cmd_serve(config, None).await
        }
    }
}

/// Initialize config and database.
async fn cmd_init(force: bool) -> anyhow::Result<()> {
    let config_path = PathBuf::from("config.toml");

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    // Write default config
    std::fs::write(&config_path, Config::generate_default())?;
    println!("Created config file: {}", config_path.display());

    // Initialize database
    let config = Config::default();
    let _db = Database::open(&config.database.path)?;
    println!("Initialized database: {}", config.database.path.display());

    println!("\nEdit config.toml to configure your server.");
    println!("Then run: comic-rs library add <name> --path /path/to/comics");

    Ok(())
}

/// Library management commands.
async fn cmd_library(action: LibraryCommand, config: &Config) -> anyhow::Result<()> {
    let db = Database::open(&config.database.path)?;

    match action {
        LibraryCommand::Add { name, path } => {
            // Validate path
            if !path.exists() {
                anyhow::bail!("Path does not exist: {}", path.display());
            }
            if !path.is_dir() {
                anyhow::bail!("Path is not a directory: {}", path.display());
            }

            let path = path.canonicalize()?;
            let library = db.create_library(&name, &path.to_string_lossy())?;
            let summary = scanner::sync(&db, &library)?;

            println!(
                "Added library: {} -> {} ({} titles indexed)",
                name,
                path.display(),
                summary.created
            );
        }

        LibraryCommand::Del { name } => match db.get_library_by_name(&name)? {
            Some(library) => {
                db.delete_library(library.id)?;
                println!("Deleted library: {}", name);
            }
            None => println!("Library not found: {}", name),
        },

        LibraryCommand::List => {
            let libraries = db.list_libraries()?;
            if libraries.is_empty() {
                println!("No libraries found.");
            } else {
                println!("{:<6} {:<20} PATH", "ID", "NAME");
                println!("{}", "-".repeat(80));
                for lib in libraries {
                    println!("{:<6} {:<20} {}", lib.id, lib.name, lib.path);
                }
            }
        }

        LibraryCommand::Scan { all, name } => {
            let libraries = if all {
                db.list_libraries()?
            } else if let Some(name) = name {
                db.get_library_by_name(&name)?
                    .map(|l| vec![l])
                    .unwrap_or_default()
            } else {
                db.list_libraries()?
            };

            if libraries.is_empty() {
                println!("No libraries to scan.");
                return Ok(());
            }

            for lib in libraries {
                match scanner::sync(&db, &lib) {
                    Ok(summary) => println!(
                        "Scanned {}: {} created, {} updated",
                        lib.name, summary.created, summary.updated
                    ),
                    Err(e) => println!("Scan failed for {}: {}", lib.name, e),
                }
            }
        }
    }

    Ok(())
}

/// Start the server.
async fn cmd_serve(mut config: Config, bind: Option<std::net::SocketAddr>) -> anyhow::Result<()> {
    // Override bind address if specified
    if let Some(addr) = bind {
        config.server.bind = addr;
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comic_rs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // The library root holds HTTP-created libraries; create it up front.
    std::fs::create_dir_all(&config.library.root)?;

    // Open database
    let db = Database::open(&config.database.path)?;

    let removed = db.remove_invalid_libraries()?;
    if removed > 0 {
        tracing::warn!(removed = removed, "Removed libraries with empty paths");
    }

    tracing::info!(
        bind = %config.server.bind,
        database = %config.database.path.display(),
        "Starting comic-rs server"
    );

    if db.list_libraries()?.is_empty() {
        tracing::warn!(
            "No libraries configured. Add one with: comic-rs library add <name> --path /path/to/comics"
        );
    }

    // Create application state
    let state = server::AppState::new_with_db(config.clone(), db);

    // Index existing libraries without blocking startup
    state.start_background_scan();

    // Start background rescan task if enabled
    if config.scan.interval_seconds > 0 {
        let state_clone = state.clone();
        let interval = Duration::from_secs(config.scan.interval_seconds);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // Skip first immediate tick

            loop {
                ticker.tick().await;
                tracing::debug!("Running scheduled library rescan");

                if let Err(e) = state_clone.scan_all_libraries() {
                    tracing::warn!(error = %e, "Scheduled rescan failed");
                }
            }
        });
    }

    // Create router
    let app = server::create_router(state);

    let listener = TcpListener::bind(config.server.bind).await?;
    tracing::info!(address = %config.server.bind, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
