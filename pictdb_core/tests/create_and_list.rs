use pictdb_core::catalog::OpenMode;
use pictdb_core::PictDb;

#[test]
fn fresh_database_lists_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pics.db");

    let db = PictDb::create(&path, 10, (64, 64), (256, 256)).unwrap();
    assert_eq!(db.num_files(), 0);
    assert_eq!(db.max_files(), 10);
    assert!(db.list_human().contains("<< empty database >>"));
    assert_eq!(db.list_json().unwrap(), r#"{"Pictures":[]}"#);
    drop(db);

    // Reopening sees the same, still-empty catalog.
    let reopened = PictDb::open(&path, OpenMode::ReadOnly).unwrap();
    assert_eq!(reopened.num_files(), 0);
    assert_eq!(reopened.header().db_name, "EPFL PictDB binary");
}
