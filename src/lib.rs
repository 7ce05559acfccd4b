//! comic-rs: A lightweight comic and manga server.
//!
//! This crate indexes filesystem trees of comic titles (plain folders of
//! images, or ZIP/RAR archives), keeps a browsable catalog in SQLite, and
//! serves reader content (listings, page images, prev/next navigation)
//! over HTTP.
//!
//! # Features
//!
//! - Multiple libraries, each rooted at a filesystem directory
//! - Idempotent library scans (re-scan never duplicates catalog entries)
//! - ZIP archives read natively, RAR via an external unrar tool
//! - Archives served as flat page sequences regardless of inner folders
//! - Lazy catalog entries for subfolders discovered while browsing
//! - Previous/next sibling navigation for the reader
//! - First-image thumbnails with a built-in fallback

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Archive container access (ZIP/RAR).
pub mod archive;
/// Configuration and CLI.
pub mod config;
/// Catalog database.
pub mod db;
/// Error types.
pub mod error;
/// Scanner, content resolution and navigation.
pub mod library;
/// HTTP server.
pub mod server;

#[cfg(test)]
mod tests;

pub use config::{Cli, Command, Config};
pub use db::Database;
pub use error::{AppError, Result};
pub use server::AppState;
