use lendshelf_core::db::migrations::latest_version;
use lendshelf_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "holders");
    assert_table_exists(&conn, "items");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lendshelf.sqlite3");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "items");
}

#[test]
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("data").join("shelf.sqlite3");

    open_db(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn holder_tokens_cannot_be_rewritten() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO holders (uuid, name, token) VALUES ('h1', 'Ola', 'ola-token-0001');",
        [],
    )
    .unwrap();

    let result = conn.execute(
        "UPDATE holders SET token = 'stolen-token-01' WHERE uuid = 'h1';",
        [],
    );
    assert!(result.is_err());

    conn.execute("UPDATE holders SET name = 'Ola K.' WHERE uuid = 'h1';", [])
        .unwrap();
}

#[test]
fn items_reject_dangling_holder_reference() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO items (uuid, name, taken_by, created_at)
         VALUES ('i1', 'Book', 'no-such-holder', 0);",
        [],
    );
    assert!(result.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
