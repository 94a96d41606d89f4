//! Append-only modification history.
//!
//! Every create, update and delete appends one human-readable entry to a
//! text file, with a line per field:
//!
//! ```text
//! [2025-03-02 14:05:11] Action: update | ID: 12 | Article: VALVE-100
//!     Situation : 'A' -> 'B'
//! ```
//!
//! Creates list every field's new value, deletes list every field's last
//! value, updates list only the fields whose text changed. Writing the log
//! never decides whether a store mutation succeeded: [`AuditLog::append`]
//! reports failures and callers log them and carry on.

use crate::libs::piece::{PieceData, PieceField};
use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const HISTORY_FILE_NAME: &str = "historique.txt";

const HEADER: &str = "Historique des modifications\n===========================\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    ImageAdd,
    ImageRemove,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::ImageAdd => "image-add",
            AuditAction::ImageRemove => "image-remove",
        };
        write!(f, "{}", kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Value { field: PieceField, value: String },
    Changed { field: PieceField, old: String, new: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub timestamp: NaiveDateTime,
    pub action: AuditAction,
    /// `None` while the piece has no identity yet.
    pub piece_id: Option<i64>,
    pub details: Option<String>,
    pub changes: Vec<FieldChange>,
}

impl AuditEntry {
    pub fn new(action: AuditAction, piece_id: Option<i64>) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            action,
            piece_id,
            details: None,
            changes: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn created(piece_id: Option<i64>, data: &PieceData) -> Self {
        let mut entry = Self::new(AuditAction::Create, piece_id).with_details(format!("Article: {}", data.article));
        entry.changes = all_values(data);
        entry
    }

    pub fn updated(piece_id: i64, old: &PieceData, new: &PieceData) -> Self {
        let mut entry = Self::new(AuditAction::Update, Some(piece_id)).with_details(format!("Article: {}", new.article));
        entry.changes = diff(old, new);
        entry
    }

    pub fn deleted(piece_id: i64, last: &PieceData) -> Self {
        let mut entry = Self::new(AuditAction::Delete, Some(piece_id)).with_details(format!("Article: {}", last.article));
        entry.changes = all_values(last);
        entry
    }

    pub fn image_added(piece_id: i64, file: &Path) -> Self {
        let name = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        Self::new(AuditAction::ImageAdd, Some(piece_id)).with_details(format!("Fichier: {}", name))
    }

    pub fn image_removed(piece_id: i64) -> Self {
        Self::new(AuditAction::ImageRemove, Some(piece_id))
    }
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] Action: {}", self.timestamp.format("%Y-%m-%d %H:%M:%S"), self.action)?;
        match self.piece_id {
            Some(id) => write!(f, " | ID: {}", id)?,
            None => write!(f, " | ID: not yet assigned")?,
        }
        if let Some(details) = &self.details {
            write!(f, " | {}", details)?;
        }
        writeln!(f)?;
        for change in &self.changes {
            match change {
                FieldChange::Value { field, value } => writeln!(f, "    {} : '{}'", field.audit_label(), value)?,
                FieldChange::Changed { field, old, new } => writeln!(f, "    {} : '{}' -> '{}'", field.audit_label(), old, new)?,
            }
        }
        Ok(())
    }
}

fn all_values(data: &PieceData) -> Vec<FieldChange> {
    data.fields()
        .map(|(field, value)| FieldChange::Value {
            field,
            value: value.to_string(),
        })
        .collect()
}

/// Fields whose text differs between `old` and `new`, in display order.
pub fn diff(old: &PieceData, new: &PieceData) -> Vec<FieldChange> {
    PieceField::ALL
        .into_iter()
        .filter(|f| f.value(old) != f.value(new))
        .map(|field| FieldChange::Changed {
            field,
            old: field.value(old).to_string(),
            new: field.value(new).to_string(),
        })
        .collect()
}

pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    /// Opens the log at `path`, creating it with its header when absent.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        if !path.exists() {
            fs::write(&path, HEADER)?;
        }
        Ok(Self { path })
    }

    /// A log at `path` that touches the disk only when appending.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry followed by a blank line. A log file that is still
    /// empty gets its header first.
    pub fn append(&self, entry: &AuditEntry) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        if file.metadata()?.len() == 0 {
            file.write_all(HEADER.as_bytes())?;
        }
        writeln!(file, "{}", entry)?;
        debug!("Audit: {} on {:?}", entry.action, entry.piece_id);
        Ok(())
    }

    /// Whole history as written, header included.
    pub fn read_all(&self) -> io::Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e),
        }
    }
}
