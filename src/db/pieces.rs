//! Record store for pieces.
//!
//! Every public write is a single SQL statement, or one transaction for
//! `insert_all`, so a reader never sees a half-applied update. Input is
//! normalized (see [`PieceData::normalized`]) before it reaches the database.
//!
//! Search results are ordered by `article` using SQLite's default `BINARY`
//! collation (byte order, so case-sensitive: `"B"` sorts before `"a"`), with
//! `id` as tie-breaker. The order is total, which keeps consecutive pages
//! free of gaps and duplicates.

use super::db::Db;
use crate::libs::error::{PieceError, PieceResult};
use crate::libs::filter::{PageWindow, PieceFilter, SearchResult};
use crate::libs::piece::{Piece, PieceData, PieceField};
use chrono::{Local, NaiveDateTime};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::debug;

const SELECT_PIECES: &str = "SELECT id, article, code_sap, description, description_longue, unite_mesure, statut_article, \
     quantite_installee, situation, image_path, date_creation, date_modification FROM pieces";
const COUNT_PIECES: &str = "SELECT COUNT(*) FROM pieces";
const ORDER_BY_ARTICLE: &str = " ORDER BY article, id";
const INSERT_PIECE: &str = "INSERT INTO pieces (article, code_sap, description, description_longue, unite_mesure, statut_article, \
     quantite_installee, situation, image_path, date_creation, date_modification) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)";
const UPDATE_PIECE: &str = "UPDATE pieces SET article = ?2, code_sap = ?3, description = ?4, description_longue = ?5, \
     unite_mesure = ?6, statut_article = ?7, quantite_installee = ?8, situation = ?9, image_path = ?10, \
     date_modification = MAX(?11, COALESCE(date_creation, ?11)) WHERE id = ?1";
const UPDATE_IMAGE_PATH: &str = "UPDATE pieces SET image_path = ?2 WHERE id = ?1";
const DELETE_PIECE: &str = "DELETE FROM pieces WHERE id = ?1";
const WHERE_ID: &str = " WHERE id = ?1";
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Export projection: user-facing headers and one row of values per piece.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportProjection {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl ExportProjection {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct Pieces {
    pub conn: Connection,
}

impl Pieces {
    pub fn new(db: Db) -> Self {
        Pieces { conn: db.conn }
    }

    /// Opens the store file, creating it and its schema when absent.
    pub fn open(path: &Path) -> PieceResult<Self> {
        Ok(Self::new(Db::open(path)?))
    }

    pub fn open_in_memory() -> PieceResult<Self> {
        Ok(Self::new(Db::open_in_memory()?))
    }

    /// Inserts a new piece and returns its identity.
    ///
    /// Both timestamps are set to the same "now".
    pub fn insert(&mut self, data: &PieceData) -> PieceResult<i64> {
        insert_row(&self.conn, data)
    }

    /// Inserts every piece in one transaction: either all rows are stored or none.
    pub fn insert_all(&mut self, rows: &[PieceData]) -> PieceResult<usize> {
        let tx = self.conn.transaction()?;
        for data in rows {
            insert_row(&tx, data)?;
        }
        tx.commit()?;
        debug!("Inserted {} pieces", rows.len());

        Ok(rows.len())
    }

    /// Overwrites every editable field and refreshes `date_modification`.
    pub fn update(&mut self, id: i64, data: &PieceData) -> PieceResult<()> {
        let data = validated(data)?;
        let affected = self.conn.execute(
            UPDATE_PIECE,
            params![
                id,
                data.article,
                data.code_sap,
                data.description,
                data.description_longue,
                data.unite_mesure,
                data.statut_article,
                data.quantite_installee,
                data.situation,
                data.image_path,
                now(),
            ],
        )?;
        if affected == 0 {
            return Err(PieceError::NotFound(id));
        }
        debug!("Updated piece {}", id);

        Ok(())
    }

    /// Re-points the image of a piece without counting as a modification.
    /// Used to finish a create once the asset has been renamed to the real id.
    pub fn set_image_path(&mut self, id: i64, image_path: &str) -> PieceResult<()> {
        let affected = self.conn.execute(UPDATE_IMAGE_PATH, params![id, image_path])?;
        if affected == 0 {
            return Err(PieceError::NotFound(id));
        }
        Ok(())
    }

    pub fn delete(&mut self, id: i64) -> PieceResult<()> {
        let affected = self.conn.execute(DELETE_PIECE, params![id])?;
        if affected == 0 {
            return Err(PieceError::NotFound(id));
        }
        debug!("Deleted piece {}", id);

        Ok(())
    }

    /// Returns the piece, or `None` when no row has this id.
    pub fn get_by_id(&self, id: i64) -> PieceResult<Option<Piece>> {
        self.conn
            .query_row(&format!("{}{}", SELECT_PIECES, WHERE_ID), params![id], row_to_piece)
            .optional()
            .map_err(Into::into)
    }

    /// One page of matching pieces plus the total number of matches.
    pub fn search(&self, filter: &PieceFilter, window: PageWindow) -> PieceResult<SearchResult> {
        let predicate = filter.predicate();
        let where_clause = predicate.where_clause();

        let total_count: i64 = self.conn.query_row(
            &format!("{}{}", COUNT_PIECES, where_clause),
            params_from_iter(predicate.params().iter()),
            |row| row.get(0),
        )?;

        let mut values: Vec<Value> = predicate.params().iter().cloned().map(Value::Text).collect();
        values.push(Value::Integer(window.limit.into()));
        values.push(Value::Integer(window.offset.into()));

        let sql = format!("{}{}{} LIMIT ? OFFSET ?", SELECT_PIECES, where_clause, ORDER_BY_ARTICLE);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), row_to_piece)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SearchResult {
            rows,
            total_count: total_count.max(0) as u64,
        })
    }

    /// All matching pieces, unpaginated, as labelled export rows.
    /// `id` and the timestamps are not part of the projection.
    pub fn export_projection(&self, filter: &PieceFilter) -> PieceResult<ExportProjection> {
        let predicate = filter.predicate();
        let columns = PieceField::ALL
            .iter()
            .map(|f| format!("CAST(COALESCE({}, '') AS TEXT)", f.column()))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("SELECT {} FROM pieces{}{}", columns, predicate.where_clause(), ORDER_BY_ARTICLE);

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(predicate.params().iter()), |row| {
                (0..PieceField::ALL.len()).map(|i| row.get::<_, String>(i)).collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ExportProjection {
            headers: PieceField::ALL.iter().map(|f| f.export_label()).collect(),
            rows,
        })
    }

    pub fn count(&self) -> PieceResult<u64> {
        let count: i64 = self.conn.query_row(COUNT_PIECES, [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    pub fn is_empty(&self) -> PieceResult<bool> {
        Ok(self.count()? == 0)
    }
}

fn insert_row(conn: &Connection, data: &PieceData) -> PieceResult<i64> {
    let data = validated(data)?;
    conn.execute(
        INSERT_PIECE,
        params![
            data.article,
            data.code_sap,
            data.description,
            data.description_longue,
            data.unite_mesure,
            data.statut_article,
            data.quantite_installee,
            data.situation,
            data.image_path,
            now(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!("Inserted piece {} ({})", id, data.article);

    Ok(id)
}

fn validated(data: &PieceData) -> PieceResult<PieceData> {
    data.validate()?;
    Ok(data.normalized())
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Column value as text. Older files may hold numbers in text columns.
fn text(row: &Row, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    })
}

/// Timestamp column; values in an unknown format read as absent.
fn timestamp(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDateTime>> {
    let raw = text(row, idx)?;
    Ok(TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok()))
}

fn row_to_piece(row: &Row) -> rusqlite::Result<Piece> {
    Ok(Piece {
        id: row.get(0)?,
        data: PieceData {
            article: text(row, 1)?,
            code_sap: text(row, 2)?,
            description: text(row, 3)?,
            description_longue: text(row, 4)?,
            unite_mesure: text(row, 5)?,
            statut_article: text(row, 6)?,
            quantite_installee: text(row, 7)?,
            situation: text(row, 8)?,
            image_path: text(row, 9)?,
        },
        date_creation: timestamp(row, 10)?,
        date_modification: timestamp(row, 11)?,
    })
}
