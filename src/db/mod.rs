//! SQLite persistence for the piece catalog.
//!
//! [`db::Db`] opens the store file and brings its schema up to date through
//! the versioned [`migrations`]. [`pieces::Pieces`] is the record store
//! itself: create, read, update, delete, filtered search with pagination and
//! the export projection.
//!
//! ```rust,no_run
//! use piecekeeper::db::pieces::Pieces;
//! use piecekeeper::libs::filter::{PageWindow, PieceFilter};
//! use piecekeeper::libs::piece::PieceData;
//!
//! let mut pieces = Pieces::open_in_memory()?;
//! pieces.insert(&PieceData::new("VALVE-100"))?;
//! let page = pieces.search(&PieceFilter::new().article("valve"), PageWindow::default())?;
//! assert_eq!(page.total_count, 1);
//! # Ok::<(), piecekeeper::libs::error::PieceError>(())
//! ```

pub mod db;

/// Versioned schema changes and their tracking table.
pub mod migrations;

pub mod pieces;
