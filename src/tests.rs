use crate::archive::{self, ArchiveFormat, ArchiveReader, RarReader, ZipReader};
use crate::config::Config;
use crate::db::{Database, Library};
use crate::error::AppError;
use crate::library::content::{self, ContentItem, ImageSource};
use crate::library::{navigation, scanner};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

const UNRAR: &str = "unrar";

fn test_db() -> Database {
    Database::open_memory().unwrap()
}

fn make_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    for (name, data) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }

    writer.finish().unwrap();
}

fn make_library(db: &Database, name: &str, root: &Path) -> Library {
    db.create_library(name, root.to_str().unwrap()).unwrap()
}

/// A library tree with a title folder (nested subfolder inside), a ZIP
/// archive, and loose files that must stay unindexed.
fn sample_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    fs::create_dir(root.join("Title A")).unwrap();
    fs::write(root.join("Title A/01.jpg"), b"jpg1").unwrap();
    fs::write(root.join("Title A/02.png"), b"png1").unwrap();
    fs::create_dir(root.join("Title A/Extras")).unwrap();
    fs::write(root.join("Title A/Extras/art.webp"), b"webp1").unwrap();

    make_zip(
        &root.join("Title B.zip"),
        &[
            ("cover.png", b"cover"),
            ("chapter1/01.jpg", b"page1"),
            ("chapter1/02.jpg", b"page2"),
        ],
    );

    fs::write(root.join("notes.txt"), b"ignored").unwrap();
    fs::write(root.join("loose.jpg"), b"ignored").unwrap();

    dir
}

fn image_names(items: &[ContentItem]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            ContentItem::Image {
                source: ImageSource::File(name),
            } => Some(name.clone()),
            ContentItem::Image {
                source: ImageSource::Entry(name),
            } => Some(name.clone()),
            _ => None,
        })
        .collect()
}

// ========== CATALOG STORE ==========

#[test]
fn db_create_and_get_library() {
    let db = test_db();
    let lib = db.create_library("Manga", "/data/manga").unwrap();

    let found = db.get_library(lib.id).unwrap().unwrap();
    assert_eq!(found.name, "Manga");
    assert_eq!(found.path, "/data/manga");

    let by_name = db.get_library_by_name("Manga").unwrap().unwrap();
    assert_eq!(by_name.id, lib.id);
}

#[test]
fn db_duplicate_library_rejected() {
    let db = test_db();
    db.create_library("Manga", "/data/manga").unwrap();

    let same_name = db.create_library("Manga", "/data/other");
    assert!(matches!(same_name, Err(AppError::InvalidInput(_))));

    let same_path = db.create_library("Other", "/data/manga");
    assert!(matches!(same_path, Err(AppError::InvalidInput(_))));
}

#[test]
fn db_insert_and_get_node() {
    let db = test_db();
    let lib = db.create_library("Manga", "/data/manga").unwrap();

    let node = db
        .insert_node("One Piece", "/data/manga/One Piece", lib.id, None, false)
        .unwrap();

    let found = db.get_node(node.id).unwrap().unwrap();
    assert_eq!(found.title, "One Piece");
    assert_eq!(found.library_id, lib.id);
    assert_eq!(found.parent_id, None);
    assert!(!found.is_archive);

    let by_title = db.get_node_by_title("One Piece").unwrap().unwrap();
    assert_eq!(by_title.id, node.id);

    let by_path = db.get_node_by_path("/data/manga/One Piece").unwrap().unwrap();
    assert_eq!(by_path.id, node.id);
}

#[test]
fn db_children_ordered_by_id() {
    let db = test_db();
    let lib = db.create_library("Manga", "/data/manga").unwrap();

    let parent = db
        .insert_node("Series", "/data/manga/Series", lib.id, None, false)
        .unwrap();
    for n in ["Vol 3", "Vol 1", "Vol 2"] {
        db.insert_node(
            n,
            &format!("/data/manga/Series/{}", n),
            lib.id,
            Some(parent.id),
            false,
        )
        .unwrap();
    }

    let children = db.list_children(Some(parent.id)).unwrap();
    let ids: Vec<i64> = children.iter().map(|n| n.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert_eq!(children.len(), 3);
    // insertion order, not title order
    assert_eq!(children[0].title, "Vol 3");
}

#[test]
fn db_cascade_delete_scoped_to_library() {
    let db = test_db();
    let lib1 = db.create_library("One", "/data/one").unwrap();
    let lib2 = db.create_library("Two", "/data/two").unwrap();

    db.insert_node("A", "/data/one/A", lib1.id, None, false)
        .unwrap();
    db.insert_node("B", "/data/one/B", lib1.id, None, true)
        .unwrap();
    let kept = db
        .insert_node("C", "/data/two/C", lib2.id, None, false)
        .unwrap();

    assert!(db.delete_library(lib1.id).unwrap());

    assert!(db.get_library(lib1.id).unwrap().is_none());
    assert!(db.list_library_nodes(lib1.id).unwrap().is_empty());
    assert_eq!(db.get_node(kept.id).unwrap().unwrap().title, "C");
    assert_eq!(db.node_count().unwrap(), 1);
}

#[test]
fn db_delete_missing_library_returns_false() {
    let db = test_db();
    assert!(!db.delete_library(42).unwrap());
}

#[test]
fn db_remove_invalid_libraries() {
    let db = test_db();
    let bad = db.create_library("Broken", "").unwrap();
    db.insert_node("Orphan", "/nowhere", bad.id, None, false)
        .unwrap();
    db.create_library("Good", "/data/good").unwrap();

    assert_eq!(db.remove_invalid_libraries().unwrap(), 1);
    assert!(db.get_library(bad.id).unwrap().is_none());
    assert_eq!(db.node_count().unwrap(), 0);
    assert!(db.get_library_by_name("Good").unwrap().is_some());
}

#[test]
fn db_find_or_create_child_is_idempotent() {
    let db = test_db();
    let lib = db.create_library("Manga", "/data/manga").unwrap();
    let parent = db
        .insert_node("Series", "/data/manga/Series", lib.id, None, false)
        .unwrap();

    let first = db
        .find_or_create_child("Sub", "/data/manga/Series/Sub", lib.id, parent.id)
        .unwrap();
    let second = db
        .find_or_create_child("Sub", "/data/manga/Series/Sub", lib.id, parent.id)
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(db.list_children(Some(parent.id)).unwrap().len(), 1);
}

#[test]
fn db_migration_adds_is_archive_column() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("legacy.db");

    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute_batch(
            "CREATE TABLE libraries (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 name TEXT NOT NULL UNIQUE,
                 path TEXT NOT NULL UNIQUE,
                 created_at INTEGER NOT NULL
             );
             CREATE TABLE nodes (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 title TEXT NOT NULL,
                 path TEXT NOT NULL,
                 library_id INTEGER NOT NULL,
                 parent_id INTEGER
             );
             INSERT INTO libraries (name, path, created_at) VALUES ('Legacy', '/legacy', 0);
             INSERT INTO nodes (title, path, library_id, parent_id)
                 VALUES ('Old', '/legacy/Old', 1, NULL);",
        )
        .unwrap();
    }

    let db = Database::open(&db_path).unwrap();
    let node = db.get_node(1).unwrap().unwrap();
    assert!(!node.is_archive);

    db.set_node_archive(1, true).unwrap();
    drop(db);

    // Re-opening must not run the migration a second time
    let db = Database::open(&db_path).unwrap();
    assert!(db.get_node(1).unwrap().unwrap().is_archive);
}

// ========== SCANNER ==========

#[test]
fn scan_indexes_directories_and_archives() {
    let tree = sample_tree();
    let db = test_db();
    let lib = make_library(&db, "Test", tree.path());

    let summary = scanner::sync(&db, &lib).unwrap();
    assert_eq!(summary.created, 3);

    let nodes = db.list_library_nodes(lib.id).unwrap();
    let titles: Vec<&str> = nodes.iter().map(|n| n.title.as_str()).collect();
    assert!(titles.contains(&"Title A"));
    assert!(titles.contains(&"Title A/Extras"));
    assert!(titles.contains(&"Title B.zip"));
    assert_eq!(nodes.len(), 3);

    let title_a = db.get_node_by_title("Title A").unwrap().unwrap();
    assert!(!title_a.is_archive);
    assert_eq!(title_a.parent_id, None);

    let extras = db.get_node_by_title("Title A/Extras").unwrap().unwrap();
    assert_eq!(extras.parent_id, Some(title_a.id));

    let title_b = db.get_node_by_title("Title B.zip").unwrap().unwrap();
    assert!(title_b.is_archive);
    assert_eq!(title_b.parent_id, None);
}

#[test]
fn scan_is_idempotent() {
    let tree = sample_tree();
    let db = test_db();
    let lib = make_library(&db, "Test", tree.path());

    scanner::sync(&db, &lib).unwrap();
    let before: Vec<(i64, String)> = db
        .list_library_nodes(lib.id)
        .unwrap()
        .into_iter()
        .map(|n| (n.id, n.title))
        .collect();

    let summary = scanner::sync(&db, &lib).unwrap();
    assert_eq!(summary.created, 0);
    assert_eq!(summary.updated, before.len());

    let after: Vec<(i64, String)> = db
        .list_library_nodes(lib.id)
        .unwrap()
        .into_iter()
        .map(|n| (n.id, n.title))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn scan_refreshes_archive_flag_on_existing_node() {
    let tree = sample_tree();
    let db = test_db();
    let lib = make_library(&db, "Test", tree.path());

    // Pre-existing row for the same title with a stale flag (as left by
    // a database from before archive detection).
    let zip_path = tree.path().join("Title B.zip");
    let stale = db
        .insert_node("Title B.zip", zip_path.to_str().unwrap(), lib.id, None, false)
        .unwrap();

    scanner::sync(&db, &lib).unwrap();

    let refreshed = db.get_node(stale.id).unwrap().unwrap();
    assert!(refreshed.is_archive);

    // Still one node for that title
    let count = db
        .list_library_nodes(lib.id)
        .unwrap()
        .into_iter()
        .filter(|n| n.title == "Title B.zip")
        .count();
    assert_eq!(count, 1);
}

#[test]
fn scan_does_not_duplicate_lazily_created_node() {
    let tree = sample_tree();
    let db = test_db();
    let lib = make_library(&db, "Test", tree.path());

    scanner::sync(&db, &lib).unwrap();
    let title_a = db.get_node_by_title("Title A").unwrap().unwrap();

    // Browse-created node carries the base name as title, not the
    // relative path; a re-scan must match it by path.
    fs::create_dir(tree.path().join("Title A/New Chapter")).unwrap();
    let lazy = db
        .find_or_create_child(
            "New Chapter",
            tree.path().join("Title A/New Chapter").to_str().unwrap(),
            lib.id,
            title_a.id,
        )
        .unwrap();

    scanner::sync(&db, &lib).unwrap();

    let matching: Vec<_> = db
        .list_library_nodes(lib.id)
        .unwrap()
        .into_iter()
        .filter(|n| n.path == lazy.path)
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].id, lazy.id);
}

#[test]
fn scan_ignores_loose_files() {
    let tree = sample_tree();
    let db = test_db();
    let lib = make_library(&db, "Test", tree.path());

    scanner::sync(&db, &lib).unwrap();

    for node in db.list_library_nodes(lib.id).unwrap() {
        assert!(!node.title.ends_with(".txt"));
        assert!(!node.title.ends_with(".jpg"));
    }
}

#[test]
fn scan_missing_root_rejected() {
    let db = test_db();
    let lib = db.create_library("Gone", "/no/such/directory").unwrap();

    let result = scanner::sync(&db, &lib);
    assert!(matches!(result, Err(AppError::InvalidInput(_))));
    assert_eq!(db.node_count().unwrap(), 0);
}

// ========== CONTENT RESOLVER ==========

#[test]
fn content_directory_listing_is_lexicographic() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("Title")).unwrap();
    fs::write(root.join("Title/b.png"), b"b").unwrap();
    fs::write(root.join("Title/a.jpg"), b"a").unwrap();
    fs::write(root.join("Title/c.jpg"), b"c").unwrap();

    let db = test_db();
    let lib = make_library(&db, "Test", root);
    scanner::sync(&db, &lib).unwrap();
    let node = db.get_node_by_title("Title").unwrap().unwrap();

    let items = content::list_children(&db, Path::new(UNRAR), &lib, &node).unwrap();
    assert_eq!(image_names(&items), vec!["a.jpg", "b.png", "c.jpg"]);
}

#[test]
fn content_archive_is_flat_and_ordered() {
    let dir = TempDir::new().unwrap();
    let zip_path = dir.path().join("book.zip");
    make_zip(
        &zip_path,
        &[
            ("cover.png", b"cover"),
            ("chapter1/02.jpg", b"p2"),
            ("chapter1/01.jpg", b"p1"),
            ("info.txt", b"skip"),
        ],
    );

    let db = test_db();
    let lib = make_library(&db, "Test", dir.path());
    scanner::sync(&db, &lib).unwrap();
    let node = db.get_node_by_title("book.zip").unwrap().unwrap();

    let items = content::list_children(&db, Path::new(UNRAR), &lib, &node).unwrap();

    assert!(items.iter().all(|i| matches!(i, ContentItem::Image { .. })));
    assert_eq!(
        image_names(&items),
        vec!["chapter1/01.jpg", "chapter1/02.jpg", "cover.png"]
    );
}

#[test]
fn content_listing_lazily_creates_subfolder_nodes_once() {
    let tree = sample_tree();
    let db = test_db();
    let lib = make_library(&db, "Test", tree.path());
    scanner::sync(&db, &lib).unwrap();

    let title_a = db.get_node_by_title("Title A").unwrap().unwrap();
    fs::create_dir(tree.path().join("Title A/Unscanned")).unwrap();

    let count_before = db.node_count().unwrap();
    content::list_children(&db, Path::new(UNRAR), &lib, &title_a).unwrap();
    content::list_children(&db, Path::new(UNRAR), &lib, &title_a).unwrap();
    let count_after = db.node_count().unwrap();

    // Exactly one node for the new subfolder, browsed twice
    assert_eq!(count_after, count_before + 1);

    let unscanned = db
        .get_node_by_path(tree.path().join("Title A/Unscanned").to_str().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(unscanned.parent_id, Some(title_a.id));
    assert_eq!(unscanned.title, "Unscanned");
}

#[test]
fn content_folder_items_carry_thumbnails() {
    let tree = sample_tree();
    let db = test_db();
    let lib = make_library(&db, "Test", tree.path());
    scanner::sync(&db, &lib).unwrap();

    let title_a = db.get_node_by_title("Title A").unwrap().unwrap();
    fs::create_dir(tree.path().join("Title A/Empty")).unwrap();

    let items = content::list_children(&db, Path::new(UNRAR), &lib, &title_a).unwrap();

    let folders: Vec<(&str, &Option<String>)> = items
        .iter()
        .filter_map(|item| match item {
            ContentItem::Folder {
                name, thumbnail, ..
            } => Some((name.as_str(), thumbnail)),
            _ => None,
        })
        .collect();

    assert_eq!(folders.len(), 2);
    let extras = folders.iter().find(|(n, _)| *n == "Extras").unwrap();
    assert_eq!(extras.1.as_deref(), Some("Title A/Extras/art.webp"));
    let empty = folders.iter().find(|(n, _)| *n == "Empty").unwrap();
    assert_eq!(*empty.1, None);
}

#[test]
fn content_resolves_archive_entry_bytes() {
    let dir = TempDir::new().unwrap();
    let zip_path = dir.path().join("book.zip");
    make_zip(&zip_path, &[("cover.png", b"coverdata")]);

    let db = test_db();
    let lib = make_library(&db, "Test", dir.path());
    scanner::sync(&db, &lib).unwrap();
    let node = db.get_node_by_title("book.zip").unwrap().unwrap();

    let data = content::resolve_image_bytes(Path::new(UNRAR), &node, "cover.png").unwrap();
    assert_eq!(data, b"coverdata");

    let missing = content::resolve_image_bytes(Path::new(UNRAR), &node, "nope.png");
    assert!(matches!(missing, Err(AppError::ArchiveEntry(_))));
}

#[test]
fn content_resolves_loose_file_bytes() {
    let tree = sample_tree();
    let db = test_db();
    let lib = make_library(&db, "Test", tree.path());
    scanner::sync(&db, &lib).unwrap();
    let node = db.get_node_by_title("Title A").unwrap().unwrap();

    let data = content::resolve_image_bytes(Path::new(UNRAR), &node, "01.jpg").unwrap();
    assert_eq!(data, b"jpg1");

    let missing = content::resolve_image_bytes(Path::new(UNRAR), &node, "99.jpg");
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let traversal = content::resolve_image_bytes(Path::new(UNRAR), &node, "../notes.txt");
    assert!(matches!(traversal, Err(AppError::InvalidInput(_))));
}

#[test]
fn content_cover_ref_picks_first_image() {
    let tree = sample_tree();
    let db = test_db();
    let lib = make_library(&db, "Test", tree.path());
    scanner::sync(&db, &lib).unwrap();

    let title_a = db.get_node_by_title("Title A").unwrap().unwrap();
    assert_eq!(
        content::cover_ref(Path::new(UNRAR), &title_a),
        Some(ImageSource::File("01.jpg".to_string()))
    );

    let title_b = db.get_node_by_title("Title B.zip").unwrap().unwrap();
    assert_eq!(
        content::cover_ref(Path::new(UNRAR), &title_b),
        Some(ImageSource::Entry("chapter1/01.jpg".to_string()))
    );
}

// ========== NAVIGATION ==========

#[test]
fn navigation_siblings_by_id_within_parent() {
    let db = test_db();
    let lib = db.create_library("Manga", "/data/manga").unwrap();

    let parent = db
        .insert_node("Series", "/data/manga/Series", lib.id, None, false)
        .unwrap();
    let a = db
        .insert_node("a", "/data/manga/Series/a", lib.id, Some(parent.id), false)
        .unwrap();
    // interleave a node under a different parent so sibling IDs are not contiguous
    let other = db
        .insert_node("x", "/data/manga/x", lib.id, None, false)
        .unwrap();
    let b = db
        .insert_node("b", "/data/manga/Series/b", lib.id, Some(parent.id), false)
        .unwrap();
    let c = db
        .insert_node("c", "/data/manga/Series/c", lib.id, Some(parent.id), false)
        .unwrap();

    let mid = navigation::siblings(&db, &b).unwrap();
    assert_eq!(mid.previous, Some(a.id));
    assert_eq!(mid.next, Some(c.id));
    assert!(!mid.is_first());
    assert!(!mid.is_last());

    let first = navigation::siblings(&db, &a).unwrap();
    assert_eq!(first.previous, None);
    assert_eq!(first.next, Some(b.id));
    assert!(first.is_first());

    let last = navigation::siblings(&db, &c).unwrap();
    assert_eq!(last.previous, Some(b.id));
    assert_eq!(last.next, None);
    assert!(last.is_last());

    // the interleaved node never appears among the Series children
    assert_ne!(mid.previous, Some(other.id));
    assert_ne!(mid.next, Some(other.id));
}

#[test]
fn navigation_top_level_crosses_libraries() {
    let db = test_db();
    let lib1 = db.create_library("One", "/data/one").unwrap();
    let lib2 = db.create_library("Two", "/data/two").unwrap();

    let r1 = db
        .insert_node("A", "/data/one/A", lib1.id, None, false)
        .unwrap();
    let r2 = db
        .insert_node("B", "/data/two/B", lib2.id, None, false)
        .unwrap();

    // Top-level nodes share the null parent and are siblings across
    // libraries.
    let nav = navigation::siblings(&db, &r1).unwrap();
    assert_eq!(nav.next, Some(r2.id));

    let nav = navigation::siblings(&db, &r2).unwrap();
    assert_eq!(nav.previous, Some(r1.id));
}

// ========== ARCHIVE ACCESSOR ==========

#[test]
fn archive_format_detection_is_case_insensitive() {
    assert_eq!(
        ArchiveFormat::from_path(Path::new("a.ZIP")),
        Some(ArchiveFormat::Zip)
    );
    assert_eq!(
        ArchiveFormat::from_path(Path::new("b.Rar")),
        Some(ArchiveFormat::Rar)
    );
    assert_eq!(ArchiveFormat::from_path(Path::new("c.cbz")), None);
    assert_eq!(ArchiveFormat::from_path(Path::new("noext")), None);

    assert!(archive::is_archive_path(Path::new("x/y/z.zip")));
    assert!(!archive::is_archive_path(Path::new("x/y/z.txt")));
}

#[test]
fn archive_zip_lists_and_reads_entries() {
    let dir = TempDir::new().unwrap();
    let zip_path = dir.path().join("a.zip");
    make_zip(&zip_path, &[("one.jpg", b"1"), ("sub/two.png", b"2")]);

    let entries = archive::list_entries(&zip_path, Path::new(UNRAR)).unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.contains(&"sub/two.png".to_string()));

    let data = archive::read_entry(&zip_path, "sub/two.png", Path::new(UNRAR)).unwrap();
    assert_eq!(data, b"2");
}

#[test]
fn archive_zip_read_normalizes_separators() {
    let dir = TempDir::new().unwrap();
    let zip_path = dir.path().join("a.zip");
    make_zip(&zip_path, &[("sub\\01.jpg", b"page")]);

    let reader = ZipReader;
    let data = reader.read_entry(&zip_path, "sub/01.jpg").unwrap();
    assert_eq!(data, b"page");
}

#[test]
fn archive_unsupported_extension_lists_empty() {
    let entries = archive::list_entries(Path::new("/tmp/whatever.7z"), Path::new(UNRAR)).unwrap();
    assert!(entries.is_empty());

    let read = archive::read_entry(Path::new("/tmp/whatever.7z"), "a.jpg", Path::new(UNRAR));
    assert!(matches!(read, Err(AppError::ArchiveUnavailable(_))));
}

#[test]
fn archive_rar_missing_tool_is_distinguishable() {
    let reader = RarReader::new(Path::new("/nonexistent/unrar-tool"));

    let listed = reader.list_entries(Path::new("/tmp/book.rar"));
    assert!(matches!(listed, Err(AppError::ArchiveUnavailable(_))));

    let read = reader.read_entry(Path::new("/tmp/book.rar"), "page.jpg");
    assert!(matches!(read, Err(AppError::ArchiveUnavailable(_))));
}

#[test]
fn archive_zip_unreadable_container() {
    let dir = TempDir::new().unwrap();
    let bogus = dir.path().join("broken.zip");
    fs::write(&bogus, b"this is not a zip").unwrap();

    let result = archive::list_entries(&bogus, Path::new(UNRAR));
    assert!(matches!(result, Err(AppError::ArchiveUnavailable(_))));
}

// ========== CONFIG ==========

#[test]
fn config_parse_toml() {
    let toml = r#"
[server]
bind = "127.0.0.1:9090"
title = "Test Comics"

[database]
path = "/tmp/test.db"

[library]
root = "/mnt/comics"

[scan]
interval_seconds = 600

[archive]
unrar_path = "/usr/bin/unrar"
"#;
    let config: Config = toml::from_str(toml).unwrap();
    assert_eq!(config.server.bind.port(), 9090);
    assert_eq!(config.server.title, "Test Comics");
    assert_eq!(config.library.root, Path::new("/mnt/comics"));
    assert_eq!(config.scan.interval_seconds, 600);
    assert_eq!(config.archive.unrar_path, Path::new("/usr/bin/unrar"));
}

#[test]
fn config_default_values() {
    let config = Config::default();
    assert_eq!(config.server.bind.port(), 18081);
    assert_eq!(config.scan.interval_seconds, 0);
    assert_eq!(config.archive.unrar_path, Path::new("unrar"));
    assert_eq!(config.library.root, Path::new("comics"));
}
