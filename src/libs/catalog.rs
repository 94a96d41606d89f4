//! Save and delete flows tying the store, the images and the history together.
//!
//! [`Catalog`] is what a front end talks to. A save reconciles the image
//! first, then writes the record, then appends the audit entry. Image and
//! history problems never fail the save; they come back as warnings in the
//! [`SaveOutcome`]. Validation, not-found and storage errors are returned.
//!
//! The read helpers [`Catalog::browse`] and [`Catalog::get`] swallow storage
//! errors (logged) into empty results so a broken store file cannot take
//! the front end down.

use crate::db::pieces::Pieces;
use crate::libs::assets::{AssetManager, AssetOwner};
use crate::libs::audit::{AuditEntry, AuditLog};
use crate::libs::config::Config;
use crate::libs::error::{PieceError, PieceResult};
use crate::libs::filter::{PageWindow, PieceFilter, SearchResult};
use crate::libs::piece::{Piece, PieceData};
use std::path::Path;
use tracing::{error, warn};

/// Result of a successful create or update.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub id: i64,
    pub piece: Piece,
    /// Non-fatal problems (image copy, resize, history) met during the save.
    pub warnings: Vec<String>,
}

pub struct Catalog {
    pieces: Pieces,
    assets: AssetManager,
    audit: AuditLog,
}

impl Catalog {
    pub fn new(pieces: Pieces, assets: AssetManager, audit: AuditLog) -> Self {
        Self { pieces, assets, audit }
    }

    /// Opens the store, image directory and history file named by `config`,
    /// creating whichever are missing. A history file that cannot be created
    /// does not stop the catalog from opening; every save then warns.
    pub fn open(config: &Config) -> PieceResult<Self> {
        let pieces = Pieces::open(&config.database_path())?;
        let assets = AssetManager::new(config.images_path())?.with_bounds(config.image_bounds());
        let history_path = config.history_path();
        let audit = AuditLog::open(&history_path).unwrap_or_else(|e| {
            warn!("History file {} unavailable: {}", history_path.display(), e);
            AuditLog::at(&history_path)
        });

        Ok(Self::new(pieces, assets, audit))
    }

    pub fn pieces(&self) -> &Pieces {
        &self.pieces
    }

    pub fn pieces_mut(&mut self) -> &mut Pieces {
        &mut self.pieces
    }

    pub fn assets(&self) -> &AssetManager {
        &self.assets
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// One page of results; an unreadable store yields an empty page.
    pub fn browse(&self, filter: &PieceFilter, window: PageWindow) -> SearchResult {
        match self.pieces.search(filter, window) {
            Ok(result) => result,
            Err(e) => {
                error!("Search failed: {}", e);
                SearchResult::default()
            }
        }
    }

    /// The piece with this id; an unreadable store reads as absent.
    pub fn get(&self, id: i64) -> Option<Piece> {
        match self.pieces.get_by_id(id) {
            Ok(piece) => piece,
            Err(e) => {
                error!("Could not load piece {}: {}", id, e);
                None
            }
        }
    }

    /// The piece with this id, for callers about to write. Unlike [`Catalog::get`],
    /// storage errors are returned rather than read as absent.
    pub fn find(&self, id: i64) -> PieceResult<Piece> {
        self.pieces.get_by_id(id)?.ok_or(PieceError::NotFound(id))
    }

    /// Creates a piece. `data.image_path` is the file the user picked, if any.
    pub fn create(&mut self, data: &PieceData) -> PieceResult<SaveOutcome> {
        data.validate()?;

        let reconciled = self.assets.reconcile(&data.image_path, "", AssetOwner::Pending);
        let mut warnings: Vec<String> = reconciled.warnings.iter().map(ToString::to_string).collect();

        let mut stored = data.normalized();
        stored.image_path = reconciled.path.clone();

        let id = match self.pieces.insert(&stored) {
            Ok(id) => id,
            Err(e) => {
                if reconciled.copied {
                    self.assets.delete(&reconciled.path);
                }
                return Err(e);
            }
        };

        if !stored.image_path.is_empty() {
            match self.assets.adopt(&stored.image_path, id) {
                Ok(path) if path != stored.image_path => match self.pieces.set_image_path(id, &path) {
                    Ok(()) => stored.image_path = path,
                    Err(e) => {
                        warn!("Piece {} keeps image path {}: {}", id, stored.image_path, e);
                        warnings.push(e.to_string());
                    }
                },
                Ok(_) => {}
                Err(e) => {
                    warn!("{}", e);
                    warnings.push(e.to_string());
                }
            }
        }

        self.record(&AuditEntry::created(Some(id), &stored), &mut warnings);
        let piece = self.find(id)?;

        Ok(SaveOutcome { id, piece, warnings })
    }

    /// Replaces the content of piece `id`. `data.image_path` is either the
    /// current managed path, a newly picked file, or empty to drop the image.
    pub fn update(&mut self, id: i64, data: &PieceData) -> PieceResult<SaveOutcome> {
        data.validate()?;
        let old = self.find(id)?;

        let reconciled = self.assets.reconcile(&data.image_path, &old.data.image_path, AssetOwner::Piece(id));
        let mut warnings: Vec<String> = reconciled.warnings.iter().map(ToString::to_string).collect();

        let mut stored = data.normalized();
        stored.image_path = reconciled.path.clone();

        if let Err(e) = self.pieces.update(id, &stored) {
            if reconciled.copied {
                self.assets.delete(&reconciled.path);
            }
            return Err(e);
        }

        self.record(&AuditEntry::updated(id, &old.data, &stored), &mut warnings);
        let piece = self.find(id)?;

        Ok(SaveOutcome { id, piece, warnings })
    }

    /// Deletes piece `id` and its managed image. Returns the removed record.
    pub fn delete(&mut self, id: i64) -> PieceResult<Piece> {
        let old = self.find(id)?;
        self.pieces.delete(id)?;

        if self.assets.is_managed(&old.data.image_path) {
            self.assets.delete(&old.data.image_path);
        }

        let mut warnings = Vec::new();
        self.record(&AuditEntry::deleted(id, &old.data), &mut warnings);

        Ok(old)
    }

    /// Gives piece `id` the image at `file`.
    pub fn attach_image(&mut self, id: i64, file: &Path) -> PieceResult<SaveOutcome> {
        let current = self.find(id)?;
        let mut data = current.data;
        data.image_path = file.to_string_lossy().into_owned();

        let mut outcome = self.update(id, &data)?;
        self.record(&AuditEntry::image_added(id, file), &mut outcome.warnings);

        Ok(outcome)
    }

    /// Removes the image of piece `id`.
    pub fn detach_image(&mut self, id: i64) -> PieceResult<SaveOutcome> {
        let current = self.find(id)?;
        let mut data = current.data;
        data.image_path.clear();

        let mut outcome = self.update(id, &data)?;
        self.record(&AuditEntry::image_removed(id), &mut outcome.warnings);

        Ok(outcome)
    }

    fn record(&self, entry: &AuditEntry, warnings: &mut Vec<String>) {
        if let Err(e) = self.audit.append(entry) {
            error!("Could not write history entry ({} on {:?}): {}", entry.action, entry.piece_id, e);
            warnings.push(format!("History not written: {}", e));
        }
    }
}
