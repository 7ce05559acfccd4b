//! Content resolution: what a catalog node contains.
//!
//! Archives and directories resolve through the same listing and byte
//! calls; callers never branch on the node kind themselves.

use crate::archive;
use crate::db::{Database, Library, Node};
use crate::error::{AppError, Result};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Check if a file or entry name has a recognized image extension.
pub fn is_image_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".jpg")
        || lower.ends_with(".jpeg")
        || lower.ends_with(".png")
        || lower.ends_with(".gif")
        || lower.ends_with(".webp")
}

/// Where an image's bytes live, relative to its node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Entry name inside the node's archive.
    Entry(String),
    /// File name directly under the node's directory.
    File(String),
}

/// One listing entry returned for a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    /// A page image.
    Image {
        /// Where the image bytes live.
        source: ImageSource,
    },
    /// A browsable subfolder.
    Folder {
        /// Catalog node ID (matched or lazily created).
        node_id: i64,
        /// Directory base name.
        name: String,
        /// Library-root-relative path of the subfolder's first image,
        /// if it has one. `None` means the transport layer substitutes
        /// its default thumbnail.
        thumbnail: Option<String>,
    },
}

/// List a node's visible children in reader order.
///
/// Archive nodes list their image entries as a flat page sequence,
/// sorted lexicographically by full entry name; inner archive folders
/// never become folder items. Directory nodes list subfolders and
/// image files in lexicographic name order.
///
/// Listing a directory lazily creates catalog nodes for its
/// subfolders, keyed by (path, parent), so this read also writes.
pub fn list_children(
    db: &Database,
    unrar_tool: &Path,
    library: &Library,
    node: &Node,
) -> Result<Vec<ContentItem>> {
    if node.is_archive {
        let mut names: Vec<String> = archive::list_entries(Path::new(&node.path), unrar_tool)?
            .into_iter()
            .filter(|name| is_image_name(name))
            .collect();
        names.sort();

        return Ok(names
            .into_iter()
            .map(|name| ContentItem::Image {
                source: ImageSource::Entry(name),
            })
            .collect());
    }

    let dir = Path::new(&node.path);
    if !dir.is_dir() {
        return Err(AppError::NotFound(format!(
            "Node path not found: {}",
            node.path
        )));
    }

    let mut items = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %node.path, error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().to_string();

        if entry.file_type().is_dir() {
            let child = db.find_or_create_child(
                &name,
                &entry.path().to_string_lossy(),
                node.library_id,
                node.id,
            )?;

            let thumbnail = first_image_in(entry.path())
                .and_then(|file| relative_to(library, &entry.path().join(file)));

            items.push(ContentItem::Folder {
                node_id: child.id,
                name,
                thumbnail,
            });
        } else if is_image_name(&name) {
            items.push(ContentItem::Image {
                source: ImageSource::File(name),
            });
        }
    }

    Ok(items)
}

/// The node's first image, used as its thumbnail: the lexicographically
/// first image entry of an archive, or the first image file directly
/// under a directory node.
pub fn cover_ref(unrar_tool: &Path, node: &Node) -> Option<ImageSource> {
    if node.is_archive {
        let mut names: Vec<String> = archive::list_entries(Path::new(&node.path), unrar_tool)
            .ok()?
            .into_iter()
            .filter(|name| is_image_name(name))
            .collect();
        names.sort();
        names.into_iter().next().map(ImageSource::Entry)
    } else {
        first_image_in(Path::new(&node.path)).map(ImageSource::File)
    }
}

/// Resolve an image reference to bytes.
///
/// Archive nodes read the named container entry; directory nodes read
/// the named file under the node's directory. Both kinds resolve
/// through this one call so the transport layer has a single bytes
/// contract (loose images are additionally served by the per-library
/// file route).
pub fn resolve_image_bytes(unrar_tool: &Path, node: &Node, name: &str) -> Result<Vec<u8>> {
    if node.is_archive {
        return archive::read_entry(Path::new(&node.path), name, unrar_tool);
    }

    let path = safe_join(Path::new(&node.path), name)?;
    if !path.is_file() {
        return Err(AppError::NotFound(format!("Image not found: {}", name)));
    }

    Ok(std::fs::read(path)?)
}

/// Join a relative name onto a base directory, rejecting absolute paths
/// and traversal components.
pub fn safe_join(base: &Path, name: &str) -> Result<PathBuf> {
    let rel = Path::new(name);
    if rel.is_absolute()
        || rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(AppError::InvalidInput(format!("Invalid path: {}", name)));
    }

    Ok(base.join(rel))
}

/// First image file in a directory, in lexicographic name order.
fn first_image_in(dir: &Path) -> Option<String> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .find(|name| is_image_name(name))
}

fn relative_to(library: &Library, path: &Path) -> Option<String> {
    path.strip_prefix(&library.path)
        .ok()
        .map(|p| p.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_name() {
        assert!(is_image_name("page1.jpg"));
        assert!(is_image_name("COVER.PNG"));
        assert!(is_image_name("chapter1/01.WebP"));
        assert!(!is_image_name("notes.txt"));
        assert!(!is_image_name("archive.zip"));
        assert!(!is_image_name("jpg"));
    }

    #[test]
    fn test_safe_join() {
        let base = Path::new("/lib");
        assert_eq!(safe_join(base, "a/b.jpg").unwrap(), Path::new("/lib/a/b.jpg"));
        assert!(safe_join(base, "../etc/passwd").is_err());
        assert!(safe_join(base, "/etc/passwd").is_err());
        assert!(safe_join(base, "a/../../b").is_err());
    }
}
