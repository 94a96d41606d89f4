use super::migrations::init_with_migrations;
use crate::libs::error::PieceResult;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

pub const DB_FILE_NAME: &str = "ocp_pieces.db";

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens (creating if needed) the store file and brings its schema up to date.
    pub fn open(path: &Path) -> PieceResult<Db> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut conn = Connection::open(path)?;
        init_with_migrations(&mut conn)?;

        Ok(Db { conn })
    }

    /// Opens the store file without touching its schema.
    pub fn open_without_migrations(path: &Path) -> PieceResult<Connection> {
        Ok(Connection::open(path)?)
    }

    pub fn open_in_memory() -> PieceResult<Db> {
        let mut conn = Connection::open_in_memory()?;
        init_with_migrations(&mut conn)?;

        Ok(Db { conn })
    }
}
