//! # Piecekeeper - inventory catalog of physical pieces
//!
//! Keeps a searchable catalog of inventory pieces in a local SQLite file,
//! each with descriptive fields and an optional photo, and records every
//! change in a human-readable history file.
//!
//! ## Features
//!
//! - **Record Store**: create, update, delete and paginated filtered search
//! - **Managed Images**: picked photos are copied, renamed and downsized
//! - **Audit Log**: field-level before/after history of every modification
//! - **Export**: filtered catalog to Excel, CSV or JSON
//! - **Legacy Import**: one-time load of the old spreadsheet
//!
//! ## Usage
//!
//! ```rust,no_run
//! use piecekeeper::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
