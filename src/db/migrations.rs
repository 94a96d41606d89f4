//! Versioned, additive schema evolution for the piece store.
//!
//! Each migration runs once and is recorded in the `migrations` table. All
//! pending migrations are applied in a single transaction.
//!
//! The store file predates this table: older files already contain a
//! `pieces` table, sometimes without the `quantite_installee` or `situation`
//! columns, and newer builds may add columns an older build does not know
//! about. Column migrations therefore inspect the live table first and only
//! add what is missing, and nothing ever drops or rewrites a column.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use piecekeeper::db::migrations::{init_with_migrations, get_db_version};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open("ocp_pieces.db")?;
//! init_with_migrations(&mut conn)?;
//! let version = get_db_version(&conn)?;
//! # Ok::<(), rusqlite::Error>(())
//! ```

use rusqlite::{params, Connection, Result, Transaction};
use tracing::{debug, info};

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of every schema migration, in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: the pieces table as the first release created it
        self.add_migration(1, "create_pieces", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS pieces (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        article TEXT NOT NULL,
        code_sap TEXT,
        description TEXT,
        description_longue TEXT,
        unite_mesure TEXT,
        statut_article TEXT,
        image_path TEXT,
        date_creation TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        date_modification TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
                [],
            )?;
            Ok(())
        });

        // Version 2: installed quantity, free text
        self.add_migration(2, "add_quantite_installee", |tx| add_column_if_missing(tx, "pieces", "quantite_installee", "TEXT"));

        // Version 3: physical location of the piece
        self.add_migration(3, "add_situation", |tx| add_column_if_missing(tx, "pieces", "situation", "TEXT"));

        // Version 4: indexes backing the search panel
        self.add_migration(4, "add_search_indexes", |tx| {
            tx.execute("CREATE INDEX IF NOT EXISTS idx_article ON pieces(article)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_code_sap ON pieces(code_sap)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_description ON pieces(description)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_statut ON pieces(statut_article)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the recorded schema version.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            debug!("Database is up to date (version {})", current_version);
            return Ok(());
        }

        info!("Applying {} pending migration(s)", pending.len());
        let tx = conn.transaction()?;

        for migration in pending {
            debug!("Running migration v{}: {}", migration.version, migration.name);
            (migration.up)(&tx)?;
            tx.execute(
                "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                params![migration.version, migration.name],
            )?;
        }

        tx.commit()?;
        info!("Database schema is at version {}", self.latest_version());

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        if !has_migrations_table(conn)? {
            return Ok(0);
        }
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;

        Ok(version.unwrap_or(0))
    }

    fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;

        Ok(count > 0)
    }

    /// Applied migrations as `(version, name, applied_at)`, oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        if !has_migrations_table(conn)? {
            return Ok(Vec::new());
        }
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }
}

fn has_migrations_table(conn: &Connection) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'migrations'",
        [],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Names of the columns currently present on `table`.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let columns = stmt.query_map([], |row| row.get::<_, String>(1))?.collect::<Result<Vec<_>, _>>()?;

    Ok(columns)
}

fn add_column_if_missing(tx: &Transaction, table: &str, column: &str, definition: &str) -> Result<()> {
    if table_columns(tx, table)?.iter().any(|c| c.eq_ignore_ascii_case(column)) {
        debug!("Column {}.{} already present", table, column);
        return Ok(());
    }
    tx.execute(&format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, definition), [])?;
    Ok(())
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    Ok(manager.get_current_version(conn)? < manager.latest_version())
}
