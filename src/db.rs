mod schema;

pub use schema::Database;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// An indexed filesystem root with a display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Library {
    /// Unique library ID.
    pub id: i64,
    /// Library name (unique).
    pub name: String,
    /// Absolute path on filesystem (unique).
    pub path: String,
    /// Creation timestamp.
    pub created_at: i64,
}

/// A catalog entry for a folder or archive inside a library's tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique node ID. Sibling navigation orders by this.
    pub id: i64,
    /// Display label. Scanned nodes use the path relative to the library
    /// root; lazily-created nodes use the directory base name.
    pub title: String,
    /// Absolute path on filesystem.
    pub path: String,
    /// Owning library ID.
    pub library_id: i64,
    /// Parent node ID; None for direct children of the library root.
    pub parent_id: Option<i64>,
    /// Whether the path is a recognized archive file. Refreshed on every
    /// re-scan.
    pub is_archive: bool,
}

/// One classified directory entry handed to the store by the scanner.
#[derive(Debug, Clone)]
pub struct ScanEntry {
    /// Path relative to the library root (doubles as the lookup title).
    pub title: String,
    /// Absolute path.
    pub path: String,
    /// Whether the entry is a directory (scanner recurses into these).
    pub is_dir: bool,
    /// Whether the entry is a recognized archive file.
    pub is_archive: bool,
}

/// Result of upserting one [`ScanEntry`].
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// The matched or freshly created node.
    pub node: Node,
    /// True if the node was created by this scan pass.
    pub created: bool,
}

/// Timestamp helper.
pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}
