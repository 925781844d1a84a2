use rusqlite::Connection;
use rusqlite_migration::{M, Migrations};

const FILES_SQL: &str = include_str!("migrations/0001_files.sql");

pub const FILES_TABLE: &str = "files";

pub const FILES_COLUMNS: [&str; 5] = ["id", "file_name", "uploaded_at", "row_count", "data"];

pub fn run_pending(conn: &mut Connection) -> rusqlite_migration::Result<()> {
    migrations().to_latest(conn)
}

fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(FILES_SQL)])
}
