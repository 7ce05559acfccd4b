//! RAR container reader backed by an external unrar executable.

use crate::archive::ArchiveReader;
use crate::error::{AppError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Reader for RAR containers.
///
/// RAR decompression is delegated to an operator-configured unrar
/// binary; a missing tool is reported as [`AppError::ArchiveUnavailable`],
/// distinct from a missing entry.
pub struct RarReader {
    tool: PathBuf,
}

impl RarReader {
    /// Create a reader using the given unrar executable.
    pub fn new(tool: &Path) -> Self {
        Self {
            tool: tool.to_path_buf(),
        }
    }

    fn spawn_error(&self, e: std::io::Error) -> AppError {
        if e.kind() == ErrorKind::NotFound {
            AppError::ArchiveUnavailable(format!(
                "unrar tool not found at {}",
                self.tool.display()
            ))
        } else {
            AppError::ArchiveUnavailable(format!("Failed to run unrar: {}", e))
        }
    }
}

impl ArchiveReader for RarReader {
    fn list_entries(&self, path: &Path) -> Result<Vec<String>> {
        let output = Command::new(&self.tool)
            .arg("lb")
            .arg(path)
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::ArchiveUnavailable(format!(
                "unrar failed on {}: {}",
                path.display(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    fn read_entry(&self, path: &Path, entry: &str) -> Result<Vec<u8>> {
        let output = Command::new(&self.tool)
            .args(["p", "-inul"])
            .arg(path)
            .arg(entry)
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::ArchiveEntry(format!(
                "Failed to extract {} from {}: {}",
                entry,
                path.display(),
                stderr.trim()
            )));
        }

        if output.stdout.is_empty() {
            return Err(AppError::ArchiveEntry(format!("Entry not found: {}", entry)));
        }

        Ok(output.stdout)
    }
}
