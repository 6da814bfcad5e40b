use pressroom_core::db::{ensure_tables, table_exists};
use pressroom_core::{Article, Author, ConnectionProvider, Magazine, StorageLocation, Table};
use rusqlite::Connection;

#[test]
fn create_table_builds_the_whole_schema() {
    let provider = ConnectionProvider::in_memory().unwrap();
    Author::create_table(&provider).unwrap();

    let conn = provider.acquire().unwrap();
    for table in Table::ALL {
        assert_table_exists(&conn, table);
    }
    assert_eq!(
        column_names(&conn, Table::Articles),
        vec!["id", "title", "content", "author_id", "magazine_id"]
    );
}

#[test]
fn entity_drop_table_removes_only_its_table() {
    let provider = ConnectionProvider::in_memory().unwrap();
    Magazine::create_table(&provider).unwrap();

    Article::drop_table(&provider).unwrap();
    Article::drop_table(&provider).unwrap();

    let conn = provider.acquire().unwrap();
    assert!(!table_exists(&conn, Table::Articles).unwrap());
    assert_table_exists(&conn, Table::Authors);
    assert_table_exists(&conn, Table::Magazines);

    drop(conn);
    Article::create_table(&provider).unwrap();
    assert_table_exists(&provider.acquire().unwrap(), Table::Articles);
}

#[test]
fn file_database_persists_across_providers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pressroom.sqlite3");

    let author_id = {
        let provider = ConnectionProvider::file(&path).unwrap();
        Author::create_table(&provider).unwrap();
        Author::create(&provider, "Grace Hopper").unwrap().id().unwrap()
    };

    let provider = ConnectionProvider::file(&path).unwrap();
    assert_eq!(
        provider.location(),
        &StorageLocation::File(path.clone())
    );
    ensure_tables(&provider.acquire().unwrap()).unwrap();
    let author = Author::get_by_id(&provider, author_id).unwrap().unwrap();
    assert_eq!(author.name(), "Grace Hopper");
}

#[test]
fn foreign_keys_are_not_enforced() {
    let provider = ConnectionProvider::in_memory().unwrap();
    Article::create_table(&provider).unwrap();

    let conn = provider.acquire().unwrap();
    conn.execute(
        "INSERT INTO articles (title, content, author_id, magazine_id) VALUES (?1, ?2, ?3, ?4);",
        rusqlite::params!["Orphaned piece", "body", 404_i64, 405_i64],
    )
    .unwrap();
}

fn assert_table_exists(conn: &Connection, table: Table) {
    assert!(
        table_exists(conn, table).unwrap(),
        "table {} does not exist",
        table.name()
    );
}

fn column_names(conn: &Connection, table: Table) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({});", table.name()))
        .unwrap();
    let mut rows = stmt.query([]).unwrap();
    let mut columns = Vec::new();
    while let Some(row) = rows.next().unwrap() {
        let column_name: String = row.get(1).unwrap();
        columns.push(column_name);
    }
    columns
}
