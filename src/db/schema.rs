use crate::db::*;
use crate::error::{AppError, Result};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Arc;

/// Database wrapper for thread-safe access.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

const NODE_COLUMNS: &str = "id, title, path, library_id, parent_id, is_archive";

fn row_to_library(row: &rusqlite::Row<'_>) -> rusqlite::Result<Library> {
    Ok(Library {
        id: row.get(0)?,
        name: row.get(1)?,
        path: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn row_to_node(row: &rusqlite::Row<'_>) -> rusqlite::Result<Node> {
    Ok(Node {
        id: row.get(0)?,
        title: row.get(1)?,
        path: row.get(2)?,
        library_id: row.get(3)?,
        parent_id: row.get(4)?,
        is_archive: row.get(5)?,
    })
}

impl Database {
    /// Open or create database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| AppError::Internal(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.initialize_schema()?;
        db.run_migration()?;
        Ok(db)
    }

    /// Open in-memory database (for testing).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Internal(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.initialize_schema()?;
        db.run_migration()?;
        Ok(db)
    }

    /// Initialize database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            -- Libraries table
            CREATE TABLE IF NOT EXISTS libraries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                path TEXT NOT NULL UNIQUE,
                created_at INTEGER NOT NULL
            );

            -- Nodes table (folders and archives inside a library tree)
            CREATE TABLE IF NOT EXISTS nodes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                path TEXT NOT NULL,
                library_id INTEGER NOT NULL,
                parent_id INTEGER,
                is_archive INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (library_id) REFERENCES libraries(id),
                FOREIGN KEY (parent_id) REFERENCES nodes(id)
            );

            -- Indexes
            CREATE INDEX IF NOT EXISTS idx_nodes_library ON nodes(library_id);
            CREATE INDEX IF NOT EXISTS idx_nodes_title ON nodes(title);
            CREATE INDEX IF NOT EXISTS idx_nodes_parent ON nodes(parent_id);
            CREATE INDEX IF NOT EXISTS idx_nodes_path ON nodes(path);
            "#,
        )
        .map_err(|e| AppError::Internal(format!("Failed to initialize schema: {}", e)))?;

        Ok(())
    }

    /// Add the `is_archive` column to a nodes table created before it
    /// existed. Guarded by a column-existence check so it runs at most once.
    fn run_migration(&self) -> Result<()> {
        let conn = self.conn.lock();

        let mut stmt = conn
            .prepare("PRAGMA table_info(nodes)")
            .map_err(|e| AppError::Internal(format!("Failed to inspect schema: {}", e)))?;

        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .map_err(|e| AppError::Internal(format!("Failed to inspect schema: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AppError::Internal(format!("Failed to inspect schema: {}", e)))?;

        if !columns.iter().any(|c| c == "is_archive") {
            tracing::info!("Adding is_archive column to nodes table");
            conn.execute(
                "ALTER TABLE nodes ADD COLUMN is_archive INTEGER NOT NULL DEFAULT 0",
                [],
            )
            .map_err(|e| AppError::Internal(format!("Failed to run migration: {}", e)))?;
        }

        Ok(())
    }

    // ========== LIBRARY OPERATIONS ==========

    /// Create a library. Duplicate name or path is rejected before any
    /// catalog mutation.
    pub fn create_library(&self, name: &str, path: &str) -> Result<Library> {
        let conn = self.conn.lock();

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM libraries WHERE name = ?1 OR path = ?2",
                params![name, path],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| AppError::Internal(format!("Failed to check library: {}", e)))?;

        if existing.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Library with name '{}' or path '{}' already exists",
                name, path
            )));
        }

        let created_at = now_timestamp();
        conn.execute(
            "INSERT INTO libraries (name, path, created_at) VALUES (?1, ?2, ?3)",
            params![name, path, created_at],
        )
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint") {
                AppError::InvalidInput(format!("Library '{}' already exists", name))
            } else {
                AppError::Internal(format!("Failed to create library: {}", e))
            }
        })?;

        Ok(Library {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            path: path.to_string(),
            created_at,
        })
    }

    /// Get library by ID.
    pub fn get_library(&self, id: i64) -> Result<Option<Library>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, name, path, created_at FROM libraries WHERE id = ?1",
            params![id],
            row_to_library,
        )
        .optional()
        .map_err(|e| AppError::Internal(format!("Failed to get library: {}", e)))
    }

    /// Get library by name.
    pub fn get_library_by_name(&self, name: &str) -> Result<Option<Library>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, name, path, created_at FROM libraries WHERE name = ?1",
            params![name],
            row_to_library,
        )
        .optional()
        .map_err(|e| AppError::Internal(format!("Failed to get library: {}", e)))
    }

    /// List all libraries.
    pub fn list_libraries(&self) -> Result<Vec<Library>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT id, name, path, created_at FROM libraries ORDER BY name")
            .map_err(|e| AppError::Internal(format!("Failed to prepare query: {}", e)))?;

        let libraries = stmt
            .query_map([], row_to_library)
            .map_err(|e| AppError::Internal(format!("Failed to list libraries: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AppError::Internal(format!("Failed to collect libraries: {}", e)))?;

        Ok(libraries)
    }

    /// Delete a library and every node it owns, in one transaction.
    pub fn delete_library(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))?;

        tx.execute("DELETE FROM nodes WHERE library_id = ?1", params![id])
            .map_err(|e| AppError::Internal(format!("Failed to delete nodes: {}", e)))?;

        let rows = tx
            .execute("DELETE FROM libraries WHERE id = ?1", params![id])
            .map_err(|e| AppError::Internal(format!("Failed to delete library: {}", e)))?;

        tx.commit()
            .map_err(|e| AppError::Internal(format!("Failed to commit: {}", e)))?;

        Ok(rows > 0)
    }

    /// Remove libraries whose stored path is empty (bad rows from old
    /// versions), cascading their nodes. Returns the number removed.
    pub fn remove_invalid_libraries(&self) -> Result<usize> {
        let ids: Vec<i64> = {
            let conn = self.conn.lock();
            let mut stmt = conn
                .prepare("SELECT id FROM libraries WHERE path = ''")
                .map_err(|e| AppError::Internal(format!("Failed to prepare query: {}", e)))?;

            stmt.query_map([], |row| row.get(0))
                .map_err(|e| AppError::Internal(format!("Failed to list libraries: {}", e)))?
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| AppError::Internal(format!("Failed to collect libraries: {}", e)))?
        };

        for id in &ids {
            self.delete_library(*id)?;
        }

        Ok(ids.len())
    }

    // ========== NODE OPERATIONS ==========

    /// Insert a node and return it with its assigned ID.
    pub fn insert_node(
        &self,
        title: &str,
        path: &str,
        library_id: i64,
        parent_id: Option<i64>,
        is_archive: bool,
    ) -> Result<Node> {
        let conn = self.conn.lock();
        Self::insert_node_on(&conn, title, path, library_id, parent_id, is_archive)
    }

    fn insert_node_on(
        conn: &Connection,
        title: &str,
        path: &str,
        library_id: i64,
        parent_id: Option<i64>,
        is_archive: bool,
    ) -> Result<Node> {
        conn.execute(
            "INSERT INTO nodes (title, path, library_id, parent_id, is_archive)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![title, path, library_id, parent_id, is_archive],
        )
        .map_err(|e| AppError::Internal(format!("Failed to insert node: {}", e)))?;

        Ok(Node {
            id: conn.last_insert_rowid(),
            title: title.to_string(),
            path: path.to_string(),
            library_id,
            parent_id,
            is_archive,
        })
    }

    /// Get node by ID.
    pub fn get_node(&self, id: i64) -> Result<Option<Node>> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!("SELECT {} FROM nodes WHERE id = ?1", NODE_COLUMNS),
            params![id],
            row_to_node,
        )
        .optional()
        .map_err(|e| AppError::Internal(format!("Failed to get node: {}", e)))
    }

    /// Get node by exact title (first match across libraries).
    pub fn get_node_by_title(&self, title: &str) -> Result<Option<Node>> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!(
                "SELECT {} FROM nodes WHERE title = ?1 ORDER BY id LIMIT 1",
                NODE_COLUMNS
            ),
            params![title],
            row_to_node,
        )
        .optional()
        .map_err(|e| AppError::Internal(format!("Failed to get node: {}", e)))
    }

    /// Get node by exact path (first match).
    pub fn get_node_by_path(&self, path: &str) -> Result<Option<Node>> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!(
                "SELECT {} FROM nodes WHERE path = ?1 ORDER BY id LIMIT 1",
                NODE_COLUMNS
            ),
            params![path],
            row_to_node,
        )
        .optional()
        .map_err(|e| AppError::Internal(format!("Failed to get node: {}", e)))
    }

    /// List the children of a parent, ordered by ID ascending.
    /// `None` lists top-level nodes (direct children of library roots).
    pub fn list_children(&self, parent_id: Option<i64>) -> Result<Vec<Node>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM nodes WHERE parent_id IS ?1 ORDER BY id",
                NODE_COLUMNS
            ))
            .map_err(|e| AppError::Internal(format!("Failed to prepare query: {}", e)))?;

        let nodes = stmt
            .query_map(params![parent_id], row_to_node)
            .map_err(|e| AppError::Internal(format!("Failed to list children: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AppError::Internal(format!("Failed to collect children: {}", e)))?;

        Ok(nodes)
    }

    /// List every node in a library, ordered by ID ascending.
    pub fn list_library_nodes(&self, library_id: i64) -> Result<Vec<Node>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM nodes WHERE library_id = ?1 ORDER BY id",
                NODE_COLUMNS
            ))
            .map_err(|e| AppError::Internal(format!("Failed to prepare query: {}", e)))?;

        let nodes = stmt
            .query_map(params![library_id], row_to_node)
            .map_err(|e| AppError::Internal(format!("Failed to list nodes: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AppError::Internal(format!("Failed to collect nodes: {}", e)))?;

        Ok(nodes)
    }

    /// List all nodes across libraries, ordered by ID ascending.
    pub fn list_nodes(&self) -> Result<Vec<Node>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM nodes ORDER BY id", NODE_COLUMNS))
            .map_err(|e| AppError::Internal(format!("Failed to prepare query: {}", e)))?;

        let nodes = stmt
            .query_map([], row_to_node)
            .map_err(|e| AppError::Internal(format!("Failed to list nodes: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AppError::Internal(format!("Failed to collect nodes: {}", e)))?;

        Ok(nodes)
    }

    /// Total node count.
    pub fn node_count(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get(0))
            .map_err(|e| AppError::Internal(format!("Failed to count nodes: {}", e)))
    }

    /// Refresh a node's archive flag.
    pub fn set_node_archive(&self, id: i64, is_archive: bool) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE nodes SET is_archive = ?1 WHERE id = ?2",
            params![is_archive, id],
        )
        .map_err(|e| AppError::Internal(format!("Failed to update node: {}", e)))?;
        Ok(())
    }

    // ========== SIBLING NAVIGATION ==========

    /// The sibling with the greatest ID strictly below `node.id`, among
    /// nodes sharing its parent. Grouping is by parent alone: top-level
    /// nodes of every library are siblings of one another.
    pub fn sibling_before(&self, node: &Node) -> Result<Option<Node>> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!(
                "SELECT {} FROM nodes WHERE id < ?1 AND parent_id IS ?2
                 ORDER BY id DESC LIMIT 1",
                NODE_COLUMNS
            ),
            params![node.id, node.parent_id],
            row_to_node,
        )
        .optional()
        .map_err(|e| AppError::Internal(format!("Failed to get sibling: {}", e)))
    }

    /// The sibling with the smallest ID strictly above `node.id`.
    pub fn sibling_after(&self, node: &Node) -> Result<Option<Node>> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!(
                "SELECT {} FROM nodes WHERE id > ?1 AND parent_id IS ?2
                 ORDER BY id ASC LIMIT 1",
                NODE_COLUMNS
            ),
            params![node.id, node.parent_id],
            row_to_node,
        )
        .optional()
        .map_err(|e| AppError::Internal(format!("Failed to get sibling: {}", e)))
    }

    // ========== SCAN SUPPORT ==========

    /// Upsert one scanned directory's classified entries in a single
    /// transaction. Existing nodes are matched by (title, library) first,
    /// then by (path, library) so a lazily-created node for the same path
    /// is refreshed rather than duplicated. Matched nodes get their
    /// archive flag refreshed; absent ones are inserted under `parent_id`.
    pub fn apply_scan(
        &self,
        library_id: i64,
        parent_id: Option<i64>,
        entries: &[ScanEntry],
    ) -> Result<Vec<ScanOutcome>> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))?;

        let mut outcomes = Vec::with_capacity(entries.len());

        for entry in entries {
            let existing = tx
                .query_row(
                    &format!(
                        "SELECT {} FROM nodes WHERE title = ?1 AND library_id = ?2",
                        NODE_COLUMNS
                    ),
                    params![entry.title, library_id],
                    row_to_node,
                )
                .optional()
                .map_err(|e| AppError::Internal(format!("Failed to look up node: {}", e)))?;

            let existing = match existing {
                Some(node) => Some(node),
                None => tx
                    .query_row(
                        &format!(
                            "SELECT {} FROM nodes WHERE path = ?1 AND library_id = ?2",
                            NODE_COLUMNS
                        ),
                        params![entry.path, library_id],
                        row_to_node,
                    )
                    .optional()
                    .map_err(|e| AppError::Internal(format!("Failed to look up node: {}", e)))?,
            };

            match existing {
                Some(mut node) => {
                    tx.execute(
                        "UPDATE nodes SET is_archive = ?1 WHERE id = ?2",
                        params![entry.is_archive, node.id],
                    )
                    .map_err(|e| AppError::Internal(format!("Failed to update node: {}", e)))?;
                    node.is_archive = entry.is_archive;
                    outcomes.push(ScanOutcome {
                        node,
                        created: false,
                    });
                }
                None => {
                    let node = Self::insert_node_on(
                        &tx,
                        &entry.title,
                        &entry.path,
                        library_id,
                        parent_id,
                        entry.is_archive,
                    )?;
                    outcomes.push(ScanOutcome {
                        node,
                        created: true,
                    });
                }
            }
        }

        tx.commit()
            .map_err(|e| AppError::Internal(format!("Failed to commit: {}", e)))?;

        Ok(outcomes)
    }

    // ========== LAZY CREATION ==========

    /// Find the node at `path` under `parent_id`, creating it if absent.
    /// The lookup and insert run in one transaction, so two concurrent
    /// browses of the same subfolder produce exactly one node.
    pub fn find_or_create_child(
        &self,
        title: &str,
        path: &str,
        library_id: i64,
        parent_id: i64,
    ) -> Result<Node> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))?;

        let existing = tx
            .query_row(
                &format!(
                    "SELECT {} FROM nodes WHERE path = ?1 AND parent_id = ?2",
                    NODE_COLUMNS
                ),
                params![path, parent_id],
                row_to_node,
            )
            .optional()
            .map_err(|e| AppError::Internal(format!("Failed to look up node: {}", e)))?;

        let node = match existing {
            Some(node) => node,
            None => Self::insert_node_on(&tx, title, path, library_id, Some(parent_id), false)?,
        };

        tx.commit()
            .map_err(|e| AppError::Internal(format!("Failed to commit: {}", e)))?;

        Ok(node)
    }

    /// Find the node at `path` by path alone, creating it under
    /// `parent_id` if absent. Used when resolving a reader deep link to a
    /// subfolder that may not have been browsed yet.
    pub fn find_or_create_at_path(
        &self,
        title: &str,
        path: &str,
        library_id: i64,
        parent_id: i64,
    ) -> Result<Node> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))?;

        let existing = tx
            .query_row(
                &format!(
                    "SELECT {} FROM nodes WHERE path = ?1 ORDER BY id LIMIT 1",
                    NODE_COLUMNS
                ),
                params![path],
                row_to_node,
            )
            .optional()
            .map_err(|e| AppError::Internal(format!("Failed to look up node: {}", e)))?;

        let node = match existing {
            Some(node) => node,
            None => Self::insert_node_on(&tx, title, path, library_id, Some(parent_id), false)?,
        };

        tx.commit()
            .map_err(|e| AppError::Internal(format!("Failed to commit: {}", e)))?;

        Ok(node)
    }
}
