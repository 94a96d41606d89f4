//! Text of every [`Message`].

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === PIECE MESSAGES ===
            Message::PieceCreated(id, article) => format!("Piece '{}' created with ID {}", article, id),
            Message::PieceUpdated(id) => format!("Piece {} updated", id),
            Message::PieceDeleted(id) => format!("Piece {} deleted", id),
            Message::PieceNotFound(id) => format!("Piece with ID {} not found", id),
            Message::PieceDetailsHeader(id) => format!("Piece {}", id),
            Message::NoPiecesFound => "No pieces match the search.".to_string(),
            Message::NoFieldsToUpdate => "Nothing to change: no field was given.".to_string(),
            Message::ConfirmDeletePiece(id, article) => format!("Delete piece {} '{}'? This cannot be undone", id, article),
            Message::OperationCancelled => "Operation cancelled.".to_string(),
            Message::PromptArticle => "Article".to_string(),
            Message::PromptField(label) => label.clone(),

            // === SEARCH MESSAGES ===
            Message::SearchPage { page, pages, shown, total } => {
                format!("Page {}/{} ({} shown, {} matching pieces)", page, pages, shown, total)
            }

            // === IMAGE MESSAGES ===
            Message::ImageAttached(id) => format!("Image attached to piece {}", id),
            Message::ImageRemoved(id) => format!("Image removed from piece {}", id),
            Message::ImageWarning(warning) => format!("Image: {}", warning),
            Message::PreviewReady(width, height) => format!("Preview ready: {}x{}", width, height),
            Message::PreviewUnavailable(reason) => format!("No preview available: {}", reason),
            Message::PreviewTimedOut => "Preview did not finish in time.".to_string(),
            Message::PieceHasNoImage(id) => format!("Piece {} has no image", id),

            // === EXPORT / IMPORT MESSAGES ===
            Message::ExportCompleted(rows, path) => format!("Exported {} pieces to {}", rows, path),
            Message::ExportEmpty => "No pieces match the filter; an empty file was written.".to_string(),
            Message::ImportCompleted(imported, skipped) => {
                format!("Import finished: {} pieces imported, {} rows without Article skipped", imported, skipped)
            }
            Message::ImportAlreadyDone => "The legacy import has already been done.".to_string(),
            Message::ImportStoreNotEmpty => "The catalog already holds pieces; nothing was imported.".to_string(),

            // === HISTORY MESSAGES ===
            Message::HistoryEmpty => "No modifications recorded yet.".to_string(),
            Message::HistoryUnavailable(error) => format!("Cannot read the history file: {}", error),

            // === CONFIG MESSAGES ===
            Message::DataDirectory(path) => format!("Data directory: {}", path),
            Message::ConfigSaved(path) => format!("Configuration saved to {}", path),
            Message::ConfigRemoved(path) => format!("Configuration removed: {}", path),

            // === MIGRATION MESSAGES ===
            Message::DatabaseVersion(version) => format!("Current database version: {}", version),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
            Message::DatabaseNeedsUpdate => "Database schema needs to be updated".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),
            Message::MigrationHistoryEntry(version, name, applied_at) => {
                format!("  v{}: {} (applied: {})", version, name, applied_at)
            }
        };

        write!(f, "{}", text)
    }
}
