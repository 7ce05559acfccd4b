use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Comic and manga server with folder and archive libraries.
#[derive(Parser, Debug, Clone)]
#[command(name = "comic-rs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file.
    #[arg(short, long, env = "COMIC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the server (default if no command given).
    Serve {
        /// Address to bind the server to.
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },

    /// Library management commands.
    Library {
        /// Library subcommand action.
        #[command(subcommand)]
        action: LibraryCommand,
    },

    /// Initialize database and create default config.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// Library management subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum LibraryCommand {
    /// Add a new library and index it.
    Add {
        /// Library name.
        name: String,
        /// Path to the library directory.
        #[arg(short, long)]
        path: PathBuf,
    },

    /// Remove a library and its catalog entries.
    Del {
        /// Library name.
        name: String,
    },

    /// List all libraries.
    List,

    /// Re-scan libraries.
    Scan {
        /// Scan all libraries.
        #[arg(long)]
        all: bool,
        /// Specific library name.
        name: Option<String>,
    },
}

/// Main configuration from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Library root configuration.
    #[serde(default)]
    pub library: LibraryConfig,

    /// Scan configuration.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Archive tooling configuration.
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Catalog title.
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            title: default_title(),
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::new(
        std::net::IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        18081,
    )
}

fn default_title() -> String {
    "My Comics".to_string()
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("data/comics.db")
}

/// Library root configuration.
///
/// Libraries created over HTTP live under `root`; the request only names
/// a subfolder of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Base directory for HTTP-created libraries.
    #[serde(default = "default_library_root")]
    pub root: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: default_library_root(),
        }
    }
}

fn default_library_root() -> PathBuf {
    PathBuf::from("comics")
}

/// Scan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Rescan interval in seconds (0 to disable).
    #[serde(default = "default_scan_interval")]
    pub interval_seconds: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_scan_interval(),
        }
    }
}

fn default_scan_interval() -> u64 {
    0
}

/// Archive tooling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Path to the external unrar executable used for RAR archives.
    #[serde(default = "default_unrar_path")]
    pub unrar_path: PathBuf,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            unrar_path: default_unrar_path(),
        }
    }
}

fn default_unrar_path() -> PathBuf {
    PathBuf::from("unrar")
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &PathBuf) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::AppError::Config(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content).map_err(|e| {
            crate::error::AppError::Config(format!("Failed to parse config file: {}", e))
        })
    }

    /// Find config file in default locations.
    pub fn find_config_file() -> Option<PathBuf> {
        let candidates = [
            PathBuf::from("config.toml"),
            PathBuf::from("comic-rs.toml"),
            dirs::config_dir()
                .map(|p| p.join("comic-rs").join("config.toml"))
                .unwrap_or_default(),
            PathBuf::from("/etc/comic-rs/config.toml"),
        ];

        candidates.into_iter().find(|p| p.exists())
    }

    /// Generate default config file content.
    pub fn generate_default() -> String {
        r#"# comic-rs configuration

[server]
bind = "0.0.0.0:18081"
title = "My Comics"

[database]
# path = "/var/lib/comic-rs/comics.db"

[library]
# Base directory for libraries added over the HTTP API
root = "comics"

[scan]
# Rescan interval in seconds (0 to disable)
interval_seconds = 0

[archive]
# Path to the unrar executable (needed for .rar archives)
unrar_path = "unrar"
"#
        .to_string()
    }
}
