//! HTTP request handlers.
//!
//! Thin wrappers over the catalog, scanner, content and navigation
//! modules; URL construction for image references happens here.

use crate::db::{Library, Node};
use crate::error::{AppError, Result};
use crate::library::content::{self, ContentItem, ImageSource};
use crate::library::navigation;
use crate::library::scanner::{self, ScanSummary};
use crate::server::AppState;
use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio_util::io::ReaderStream;

/// 1x1 transparent PNG served when a folder has no image of its own.
const DEFAULT_THUMBNAIL: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0B, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// URL of the fallback thumbnail.
const DEFAULT_THUMBNAIL_URL: &str = "/static/default-thumbnail.png";

/// Build a response, returning 500 on error (which shouldn't happen).
fn build_response(status: StatusCode, content_type: &str, body: impl Into<Body>) -> Response<Body> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(body.into())
        .unwrap_or_else(|_| {
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::from("Internal error"))
                .unwrap_or_default()
        })
}

/// Percent-encode a slash-separated path, keeping the separators.
fn encode_path(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// URL of a loose file within a library, by library-root-relative path.
fn file_url(library: &Library, rel: &str) -> String {
    format!(
        "/files/{}/{}",
        urlencoding::encode(&library.name),
        encode_path(rel)
    )
}

/// Guess an image content type from a file or entry name.
fn image_mime(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".gif") {
        "image/gif"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}

/// A node's path relative to its library root, slash-separated.
fn node_relative_path(library: &Library, node: &Node) -> String {
    std::path::Path::new(&node.path)
        .strip_prefix(&library.path)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| node.title.clone())
}

/// Look up a node by numeric ID, falling back to exact title.
fn lookup_node(state: &AppState, key: &str) -> Result<Node> {
    let node = match key.parse::<i64>() {
        Ok(id) => state.db.get_node(id)?,
        Err(_) => state.db.get_node_by_title(key)?,
    };

    node.ok_or_else(|| AppError::NotFound(format!("Node not found: {}", key)))
}

/// Run a library scan on a blocking thread.
async fn run_scan(state: &AppState, library: Library) -> Result<ScanSummary> {
    let db = state.db.clone();
    tokio::task::spawn_blocking(move || scanner::sync(&db, &library))
        .await
        .map_err(|e| AppError::Internal(format!("Scan task failed: {}", e)))?
}

// ============================================================================
// WEB PAGES
// ============================================================================

/// Index page (simple HTML).
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let node_count = state.db.node_count().unwrap_or(0);
    let library_count = state.db.list_libraries().map(|l| l.len()).unwrap_or(0);

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>
        body {{ font-family: system-ui, sans-serif; max-width: 600px; margin: 2rem auto; padding: 0 1rem; }}
        h1 {{ color: #333; }}
        a {{ color: #0066cc; }}
        .stats {{ background: #f5f5f5; padding: 1rem; border-radius: 8px; margin: 1rem 0; }}
        code {{ background: #e8e8e8; padding: 0.2rem 0.4rem; border-radius: 4px; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <div class="stats">
        <p><strong>{node_count}</strong> titles in <strong>{library_count}</strong> libraries</p>
    </div>
    <h2>Links</h2>
    <ul>
        <li><a href="/api/nodes">Catalog (JSON)</a></li>
        <li><a href="/api/libraries">Libraries (JSON)</a></li>
        <li><a href="/api/stats">Stats (JSON)</a></li>
    </ul>
</body>
</html>"#,
        title = state.config.server.title,
        node_count = node_count,
        library_count = library_count,
    );

    Html(html)
}

/// Fallback thumbnail image.
pub async fn default_thumbnail() -> impl IntoResponse {
    build_response(StatusCode::OK, "image/png", DEFAULT_THUMBNAIL)
}

// ============================================================================
// LIBRARIES
// ============================================================================

/// List all libraries.
pub async fn list_libraries(State(state): State<AppState>) -> Result<Json<Vec<Library>>> {
    Ok(Json(state.db.list_libraries()?))
}

/// Request body for creating a library.
#[derive(Debug, Deserialize)]
pub struct CreateLibrary {
    /// Display name (unique).
    pub name: String,
    /// Subfolder of the configured library root.
    pub folder: String,
}

/// Create a library and run its initial scan.
///
/// Rejects before any catalog mutation if the target is missing, not a
/// directory, or collides with an existing name or path.
pub async fn create_library(
    State(state): State<AppState>,
    Json(req): Json<CreateLibrary>,
) -> Result<Json<Library>> {
    let root = &state.config.library.root;
    let path = content::safe_join(root, &req.folder)?;
    let path = path.canonicalize().map_err(|_| {
        AppError::InvalidInput(format!("Path does not exist: {}", path.display()))
    })?;

    if !path.is_dir() {
        return Err(AppError::InvalidInput(format!(
            "Path is not a directory: {}",
            path.display()
        )));
    }

    let library = state
        .db
        .create_library(&req.name, &path.to_string_lossy())?;

    tracing::info!(library = %library.name, path = %library.path, "Added library");

    run_scan(&state, library.clone()).await?;

    Ok(Json(library))
}

/// Delete a library, cascading its nodes.
pub async fn delete_library(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let library = state
        .db
        .get_library(id)?
        .ok_or_else(|| AppError::NotFound(format!("Library not found: {}", id)))?;

    state.db.delete_library(id)?;
    tracing::info!(library = %library.name, "Deleted library");

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Library deleted successfully"
    })))
}

/// Re-scan one library.
pub async fn scan_library(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ScanSummary>> {
    let library = state
        .db
        .get_library(id)?
        .ok_or_else(|| AppError::NotFound(format!("Library not found: {}", id)))?;

    let summary = run_scan(&state, library).await?;
    Ok(Json(summary))
}

/// Library diagnostic: filesystem listing next to catalog rows.
#[derive(Debug, Serialize)]
pub struct LibraryCheck {
    /// The library being checked.
    pub library: Library,
    /// Directory names directly under the library path.
    pub folders_in_path: Vec<String>,
    /// Titles of the library's catalog nodes.
    pub nodes_in_db: Vec<String>,
}

/// Compare a library's directory with its catalog entries.
pub async fn check_library(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LibraryCheck>> {
    let library = state
        .db
        .get_library(id)?
        .ok_or_else(|| AppError::NotFound(format!("Library not found: {}", id)))?;

    let mut folders_in_path = Vec::new();
    for entry in std::fs::read_dir(&library.path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            folders_in_path.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    folders_in_path.sort();

    let nodes_in_db = state
        .db
        .list_library_nodes(library.id)?
        .into_iter()
        .map(|n| n.title)
        .collect();

    Ok(Json(LibraryCheck {
        library,
        folders_in_path,
        nodes_in_db,
    }))
}

// ============================================================================
// CATALOG
// ============================================================================

/// One node in the catalog overview.
#[derive(Debug, Serialize)]
pub struct NodeSummary {
    /// Node ID.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Owning library ID.
    pub library_id: i64,
    /// Thumbnail URL, if the node has a first image.
    pub thumbnail: Option<String>,
    /// Whether the node is an archive file.
    pub is_archive: bool,
}

/// Catalog overview payload.
#[derive(Debug, Serialize)]
pub struct CatalogOverview {
    /// All catalog nodes.
    pub nodes: Vec<NodeSummary>,
    /// All libraries.
    pub libraries: Vec<Library>,
}

/// Every node with a computed thumbnail, plus the library list.
pub async fn nodes_overview(State(state): State<AppState>) -> Result<Json<CatalogOverview>> {
    let libraries = state.db.list_libraries()?;
    let by_id: HashMap<i64, &Library> = libraries.iter().map(|l| (l.id, l)).collect();
    let unrar = &state.config.archive.unrar_path;

    let mut nodes = Vec::new();
    for node in state.db.list_nodes()? {
        let thumbnail = by_id.get(&node.library_id).and_then(|library| {
            content::cover_ref(unrar, &node).map(|source| match source {
                ImageSource::Entry(entry) => {
                    format!("/api/nodes/{}/image/{}", node.id, encode_path(&entry))
                }
                ImageSource::File(file) => {
                    let rel = node_relative_path(library, &node);
                    file_url(library, &format!("{}/{}", rel, file))
                }
            })
        });

        nodes.push(NodeSummary {
            id: node.id,
            title: node.title,
            library_id: node.library_id,
            thumbnail,
            is_archive: node.is_archive,
        });
    }

    tracing::debug!(nodes = nodes.len(), libraries = libraries.len(), "Catalog overview");

    Ok(Json(CatalogOverview { nodes, libraries }))
}

// ============================================================================
// READER
// ============================================================================

/// One entry in a reader listing.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentEntry {
    /// A page image.
    Image {
        /// URL of the image bytes.
        path: String,
    },
    /// A browsable subfolder.
    Folder {
        /// Node ID of the subfolder.
        id: i64,
        /// Directory base name.
        name: String,
        /// Thumbnail URL (fallback when the folder has no image).
        thumbnail: String,
    },
}

/// Reader payload for one node.
#[derive(Debug, Serialize)]
pub struct NodePayload {
    /// Node ID.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Ordered contents.
    pub contents: Vec<ContentEntry>,
    /// Previous sibling ID, if any.
    pub previous: Option<i64>,
    /// Next sibling ID, if any.
    pub next: Option<i64>,
    /// Whether the node is first among its siblings.
    pub is_first: bool,
    /// Whether the node is last among its siblings.
    pub is_last: bool,
    /// Parent node ID, if any.
    pub parent_id: Option<i64>,
}

/// A node's ordered contents plus sibling navigation.
///
/// `{id}` accepts a numeric node ID or an exact title.
pub async fn node_contents(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<NodePayload>> {
    let node = lookup_node(&state, &key)?;

    if !std::path::Path::new(&node.path).exists() {
        return Err(AppError::NotFound(format!("Item not found: {}", node.path)));
    }

    let library = state
        .db
        .get_library(node.library_id)?
        .ok_or_else(|| AppError::NotFound(format!("Library not found: {}", node.library_id)))?;

    let unrar = &state.config.archive.unrar_path;
    let items = content::list_children(&state.db, unrar, &library, &node)?;
    let siblings = navigation::siblings(&state.db, &node)?;

    let node_rel = node_relative_path(&library, &node);
    let contents = items
        .into_iter()
        .map(|item| match item {
            ContentItem::Image { source } => ContentEntry::Image {
                path: match source {
                    ImageSource::Entry(entry) => {
                        format!("/api/nodes/{}/image/{}", node.id, encode_path(&entry))
                    }
                    ImageSource::File(file) => {
                        file_url(&library, &format!("{}/{}", node_rel, file))
                    }
                },
            },
            ContentItem::Folder {
                node_id,
                name,
                thumbnail,
            } => ContentEntry::Folder {
                id: node_id,
                name,
                thumbnail: thumbnail
                    .map(|rel| file_url(&library, &rel))
                    .unwrap_or_else(|| DEFAULT_THUMBNAIL_URL.to_string()),
            },
        })
        .collect();

    Ok(Json(NodePayload {
        id: node.id,
        title: node.title.clone(),
        contents,
        previous: siblings.previous,
        next: siblings.next,
        is_first: siblings.is_first(),
        is_last: siblings.is_last(),
        parent_id: node.parent_id,
    }))
}

/// Image bytes by node ID and internal name (archive entry or loose
/// child file).
pub async fn node_image(
    State(state): State<AppState>,
    Path((id, entry)): Path<(i64, String)>,
) -> Result<Response<Body>> {
    let node = state
        .db
        .get_node(id)?
        .ok_or_else(|| AppError::NotFound(format!("Node not found: {}", id)))?;

    let unrar = state.config.archive.unrar_path.clone();
    let mime = image_mime(&entry);
    let data = tokio::task::spawn_blocking(move || {
        content::resolve_image_bytes(&unrar, &node, &entry)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Read task failed: {}", e)))??;

    Ok(build_response(StatusCode::OK, mime, data))
}

/// Resolve (and lazily create) the node for a subfolder of a directory
/// node, for reader deep links.
pub async fn resolve_subfolder(
    State(state): State<AppState>,
    Path((id, sub)): Path<(i64, String)>,
) -> Result<Json<Node>> {
    let node = state
        .db
        .get_node(id)?
        .ok_or_else(|| AppError::NotFound(format!("Node not found: {}", id)))?;

    let dir = content::safe_join(std::path::Path::new(&node.path), &sub)?;
    if !dir.is_dir() {
        return Err(AppError::NotFound(format!(
            "Subfolder not found: {}",
            dir.display()
        )));
    }

    let title = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| sub.clone());

    let child = state.db.find_or_create_at_path(
        &title,
        &dir.to_string_lossy(),
        node.library_id,
        node.id,
    )?;

    Ok(Json(child))
}

// ============================================================================
// FILES
// ============================================================================

/// Stream a loose file from a library's tree.
pub async fn library_file(
    State(state): State<AppState>,
    Path((library, file_path)): Path<(String, String)>,
) -> Result<Response<Body>> {
    let library = state
        .db
        .get_library_by_name(&library)?
        .ok_or_else(|| AppError::NotFound(format!("Library not found: {}", library)))?;

    let full = content::safe_join(std::path::Path::new(&library.path), &file_path)?;

    let metadata = tokio::fs::metadata(&full)
        .await
        .map_err(|_| AppError::NotFound(format!("File not found: {}", file_path)))?;
    if !metadata.is_file() {
        return Err(AppError::NotFound(format!("File not found: {}", file_path)));
    }

    let file = tokio::fs::File::open(&full).await?;
    let stream = ReaderStream::new(file);

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, image_mime(&file_path))
        .header(header::CONTENT_LENGTH, metadata.len())
        .body(Body::from_stream(stream))
        .unwrap_or_else(|_| Response::default()))
}

// ============================================================================
// STATS
// ============================================================================

/// Server statistics.
#[derive(Debug, Serialize)]
pub struct Stats {
    /// Number of libraries.
    pub libraries: usize,
    /// Number of catalog nodes.
    pub nodes: i64,
}

/// Library and node counts.
pub async fn api_stats(State(state): State<AppState>) -> Result<Json<Stats>> {
    Ok(Json(Stats {
        libraries: state.db.list_libraries()?.len(),
        nodes: state.db.node_count()?,
    }))
}
