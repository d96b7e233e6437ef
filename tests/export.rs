//! End-to-end export runs against a real SQLite file.

use shapex_decode::JsonSource;
use shapex_export::{ExportOptions, export_document};
use shapex_store::{Database, SqliteSink};

/// Two pages sharing one inherited dictionary, plus a page without
/// inheritance. Bitmaps are drawn top-to-bottom, `#` is ink.
const DOCUMENT: &str = r####"{
    "pages": [
        {
            "name": "p0001.djvu",
            "inherited": {"name": "shared.djbz", "shape_count": 2},
            "shapes": [
                {"bitmap": ["###", "#.#", "###"]},
                {"parent": 0, "bitmap": ["#.#", ".#.", "#.#"]},
                {"parent": 1, "bitmap": ["..#", ".#.", "#.."]}
            ],
            "blits": [
                {"shape": 0, "left": 10, "bottom": 20},
                {"shape": 2, "left": 30, "bottom": 40}
            ]
        },
        {
            "name": "p0002.djvu",
            "inherited": {"name": "shared.djbz", "shape_count": 2},
            "shapes": [
                {"bitmap": ["###", "#.#", "###"]},
                {"parent": 0, "bitmap": ["#.#", ".#.", "#.#"]}
            ],
            "blits": [{"shape": 1, "left": 5, "bottom": 6}]
        },
        {
            "name": "p0003.djvu",
            "shapes": [{"bitmap": ["##", "##"]}],
            "blits": [{"shape": 0, "left": 1, "bottom": 2}]
        }
    ]
}"####;

fn options() -> ExportOptions {
    ExportOptions::new("book.djvu", "/library/book.djvu")
}

async fn count(db: &Database, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_full_export() {
    let source = JsonSource::from_str(DOCUMENT).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let db = Database::connect(dir.path().join("shapes.db")).await.unwrap();
    let sink = SqliteSink::from(&db);

    let summary = export_document(&sink, &source, &options()).await.unwrap();
    assert_eq!(summary.pages_processed, 3);
    assert_eq!(summary.pages_skipped, 0);
    // 2 inherited (persisted once) + 1 + 0 + 1 page-local shapes.
    assert_eq!(summary.shapes_stored, 4);
    assert_eq!(summary.blits_stored, 4);
    // shared.djbz + one dictionary per page.
    assert_eq!(summary.dictionaries_created, 4);

    assert_eq!(count(&db, "documents").await, 1);
    assert_eq!(count(&db, "dictionaries").await, 4);
    assert_eq!(count(&db, "shapes").await, 4);
    assert_eq!(count(&db, "blits").await, 4);
    assert_eq!(count(&db, "pages").await, 3);

    // The shared dictionary is document-independent.
    let shared: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM dictionaries WHERE page_number = -1")
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(shared, 1);

    // Parent chain inside the shared dictionary survives the id rewrite.
    let orphans: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM shapes s WHERE s.parent_id IS NOT NULL
         AND NOT EXISTS (SELECT 1 FROM shapes p WHERE p.id = s.parent_id)",
    )
    .fetch_one(db.pool())
    .await
    .unwrap();
    assert_eq!(orphans, 0);

    // Page without inheritance still gets a link row, with a NULL
    // dictionary.
    let unlinked: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM pages WHERE inh_dict_id IS NULL")
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(unlinked, 1);

    db.close().await;
}

#[tokio::test]
async fn test_links_only_rerun() {
    let source = JsonSource::from_str(DOCUMENT).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let db = Database::connect(dir.path().join("shapes.db")).await.unwrap();
    let sink = SqliteSink::from(&db);

    export_document(&sink, &source, &options()).await.unwrap();
    let shapes_before = count(&db, "shapes").await;
    let blits_before = count(&db, "blits").await;

    // Re-linking the same document touches only the pages table.
    let mut opts = options();
    opts.links_only = true;
    let summary = export_document(&sink, &source, &opts).await.unwrap();
    assert_eq!(summary.pages_processed, 3);
    assert_eq!(summary.shapes_stored, 0);
    assert_eq!(count(&db, "shapes").await, shapes_before);
    assert_eq!(count(&db, "blits").await, blits_before);
    assert_eq!(count(&db, "pages").await, 3);
    assert_eq!(count(&db, "documents").await, 1);

    db.close().await;
}

#[tokio::test]
async fn test_links_only_requires_persisted_dictionaries() {
    let source = JsonSource::from_str(DOCUMENT).unwrap();
    let db = Database::connect_in_memory().await.unwrap();
    let sink = SqliteSink::from(&db);

    let mut opts = options();
    opts.links_only = true;
    assert!(export_document(&sink, &source, &opts).await.is_err());
    assert_eq!(count(&db, "shapes").await, 0);

    db.close().await;
}

#[tokio::test]
async fn test_page_range_selects_subset() {
    let source = JsonSource::from_str(DOCUMENT).unwrap();
    let db = Database::connect_in_memory().await.unwrap();
    let sink = SqliteSink::from(&db);

    let mut opts = options();
    opts.from = Some(3);
    opts.to = Some(3);
    let summary = export_document(&sink, &source, &opts).await.unwrap();
    assert_eq!(summary.pages_processed, 1);
    assert_eq!(summary.shapes_stored, 1);
    let pages: Vec<i64> = sqlx::query_scalar("SELECT page_number FROM pages")
        .fetch_all(db.pool())
        .await
        .unwrap();
    assert_eq!(pages, vec![2]);

    db.close().await;
}

#[tokio::test]
async fn test_payload_roundtrip_is_pbm() {
    let source = JsonSource::from_str(DOCUMENT).unwrap();
    let db = Database::connect_in_memory().await.unwrap();
    let sink = SqliteSink::from(&db);

    let mut opts = options();
    opts.from = Some(3);
    export_document(&sink, &source, &opts).await.unwrap();
    let bits: Vec<u8> = sqlx::query_scalar("SELECT bits FROM shapes")
        .fetch_one(db.pool())
        .await
        .unwrap();
    // 2x2 all-ink bitmap: one padded raster byte per row.
    assert_eq!(bits, b"P4\n2 2\n\xc0\xc0");

    db.close().await;
}
