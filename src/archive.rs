mod rar;
mod zip;

pub use self::rar::RarReader;
pub use self::zip::ZipReader;

use crate::error::{AppError, Result};
use std::path::Path;

/// Supported container formats, detected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// ZIP container, read natively.
    Zip,
    /// RAR container, read through an external unrar tool.
    Rar,
}

impl ArchiveFormat {
    /// Detect format from a path's extension, case-insensitive.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "zip" => Some(ArchiveFormat::Zip),
            "rar" => Some(ArchiveFormat::Rar),
            _ => None,
        }
    }
}

/// Check whether a path carries a recognized archive extension.
pub fn is_archive_path(path: &Path) -> bool {
    ArchiveFormat::from_path(path).is_some()
}

/// Read-only access to a container's entry list and entry bytes.
///
/// The container file is opened fresh on every call; nothing is cached
/// between requests.
pub trait ArchiveReader: Send + Sync {
    /// List entry names in stored order.
    fn list_entries(&self, path: &Path) -> Result<Vec<String>>;

    /// Read one entry's raw bytes.
    fn read_entry(&self, path: &Path, entry: &str) -> Result<Vec<u8>>;
}

/// Get the reader for a container path, if its format is recognized.
pub fn get_reader(path: &Path, unrar_tool: &Path) -> Option<Box<dyn ArchiveReader>> {
    match ArchiveFormat::from_path(path)? {
        ArchiveFormat::Zip => Some(Box::new(ZipReader)),
        ArchiveFormat::Rar => Some(Box::new(RarReader::new(unrar_tool))),
    }
}

/// List a container's entries. Unrecognized extensions list as empty.
pub fn list_entries(path: &Path, unrar_tool: &Path) -> Result<Vec<String>> {
    match get_reader(path, unrar_tool) {
        Some(reader) => reader.list_entries(path),
        None => Ok(Vec::new()),
    }
}

/// Read one entry from a container.
pub fn read_entry(path: &Path, entry: &str, unrar_tool: &Path) -> Result<Vec<u8>> {
    match get_reader(path, unrar_tool) {
        Some(reader) => reader.read_entry(path, entry),
        None => Err(AppError::ArchiveUnavailable(format!(
            "Unsupported archive format: {}",
            path.display()
        ))),
    }
}
