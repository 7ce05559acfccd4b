//! Filesystem to catalog synchronization.

use crate::archive;
use crate::db::{Database, Library, ScanEntry};
use crate::error::{AppError, Result};
use serde::Serialize;
use std::path::Path;
use walkdir::WalkDir;

/// Counts of catalog changes made by one scan.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct ScanSummary {
    /// Nodes created.
    pub created: usize,
    /// Existing nodes refreshed.
    pub updated: usize,
}

/// Synchronize a library's catalog with its filesystem tree.
///
/// Idempotent: re-running on an unchanged tree creates nothing and
/// leaves every node's ID as it was. Directories and recognized
/// archives become nodes; loose files are skipped. Archives are never
/// descended into, their contents are resolved lazily when browsed.
/// Each directory's entries commit as one transaction, so a crash
/// mid-scan leaves visited subtrees durable and the rest absent.
pub fn sync(db: &Database, library: &Library) -> Result<ScanSummary> {
    let root = Path::new(&library.path);
    if !root.is_dir() {
        return Err(AppError::InvalidInput(format!(
            "Library path is not a directory: {}",
            library.path
        )));
    }

    tracing::info!(library = %library.name, path = %library.path, "Scanning library");

    let mut summary = ScanSummary::default();
    scan_directory(db, library, root, None, root, &mut summary)?;

    tracing::info!(
        library = %library.name,
        created = summary.created,
        updated = summary.updated,
        "Library scan complete"
    );

    Ok(summary)
}

fn scan_directory(
    db: &Database,
    library: &Library,
    root: &Path,
    parent_id: Option<i64>,
    dir: &Path,
    summary: &mut ScanSummary,
) -> Result<()> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // One unreadable entry must not abort its siblings.
                tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        let is_dir = entry.file_type().is_dir();
        let is_archive = !is_dir && archive::is_archive_path(path);
        if !is_dir && !is_archive {
            continue;
        }

        let title = match path.strip_prefix(root) {
            Ok(rel) => rel.to_string_lossy().to_string(),
            Err(_) => continue,
        };

        entries.push(ScanEntry {
            title,
            path: path.to_string_lossy().to_string(),
            is_dir,
            is_archive,
        });
    }

    let outcomes = db.apply_scan(library.id, parent_id, &entries)?;

    for outcome in &outcomes {
        if outcome.created {
            summary.created += 1;
            tracing::debug!(title = %outcome.node.title, id = outcome.node.id, "Indexed node");
        } else {
            summary.updated += 1;
        }
    }

    for (entry, outcome) in entries.iter().zip(&outcomes) {
        if entry.is_dir {
            scan_directory(
                db,
                library,
                root,
                Some(outcome.node.id),
                Path::new(&entry.path),
                summary,
            )?;
        }
    }

    Ok(())
}
