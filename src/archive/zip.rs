//! Native ZIP container reader.

use crate::archive::ArchiveReader;
use crate::error::{AppError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Reader for ZIP containers.
pub struct ZipReader;

impl ZipReader {
    fn open(path: &Path) -> Result<ZipArchive<File>> {
        let file = File::open(path)?;
        ZipArchive::new(file).map_err(|e| {
            AppError::ArchiveUnavailable(format!("Failed to open {}: {}", path.display(), e))
        })
    }
}

impl ArchiveReader for ZipReader {
    fn list_entries(&self, path: &Path) -> Result<Vec<String>> {
        let archive = Self::open(path)?;
        Ok(archive.file_names().map(String::from).collect())
    }

    fn read_entry(&self, path: &Path, entry: &str) -> Result<Vec<u8>> {
        let mut archive = Self::open(path)?;

        // Entries may have been stored with either separator; fall back
        // to a normalized match before giving up.
        let name = if archive.file_names().any(|n| n == entry) {
            entry.to_string()
        } else {
            let wanted = entry.replace('\\', "/");
            archive
                .file_names()
                .find(|n| n.replace('\\', "/") == wanted)
                .map(String::from)
                .ok_or_else(|| AppError::ArchiveEntry(format!("Entry not found: {}", entry)))?
        };

        let mut data = Vec::new();
        archive
            .by_name(&name)
            .map_err(|e| AppError::ArchiveEntry(format!("Failed to read {}: {}", name, e)))?
            .read_to_end(&mut data)?;

        Ok(data)
    }
}
