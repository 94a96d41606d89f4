//! Managed image files for pieces.
//!
//! Images the user picks anywhere on disk are copied into the managed asset
//! directory, named after the owning piece (`piece_<id>_<timestamp>.<ext>`)
//! and downsized to a bounding box. The user's original file is never
//! touched. Files in the managed directory belong to the catalog: they are
//! renamed, replaced and removed as the owning piece changes.
//!
//! Nothing here fails a save. Problems are returned as [`AssetError`]
//! warnings next to the path the record should store, and the caller
//! decides how to surface them.
//!
//! ## Two-phase create
//!
//! A new piece has no id until the store insert returns. Its image is first
//! copied under the [`PLACEHOLDER_TOKEN`] (`piece_new_...`) and
//! [`AssetManager::adopt`] renames it once the id is known. This assumes
//! saves happen one at a time: two concurrent creates could both hold
//! `piece_new_` files, and only the timestamp suffix tells them apart.

use crate::libs::error::AssetError;
use chrono::Local;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

pub const IMAGES_DIR_NAME: &str = "images_pieces";

/// Stands in for the piece id in file names until the insert assigns one.
pub const PLACEHOLDER_TOKEN: &str = "new";

const FILE_PREFIX: &str = "piece_";

/// Maximum image dimensions; larger images are scaled down to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBounds {
    pub width: u32,
    pub height: u32,
}

impl ImageBounds {
    /// Bounding box for stored images.
    pub const STORAGE: ImageBounds = ImageBounds { width: 800, height: 600 };
    /// Bounding box for the details view preview.
    pub const PREVIEW: ImageBounds = ImageBounds { width: 550, height: 450 };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, width: u32, height: u32) -> bool {
        width <= self.width && height <= self.height
    }
}

impl Default for ImageBounds {
    fn default() -> Self {
        Self::STORAGE
    }
}

/// Whose image a managed file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOwner {
    /// A piece that has not been inserted yet.
    Pending,
    Piece(i64),
}

impl AssetOwner {
    fn token(self) -> String {
        match self {
            AssetOwner::Pending => PLACEHOLDER_TOKEN.to_string(),
            AssetOwner::Piece(id) => id.to_string(),
        }
    }
}

/// Outcome of [`AssetManager::reconcile`].
#[derive(Debug, Default)]
pub struct Reconciled {
    /// Path the record should store; empty for "no image".
    pub path: String,
    /// Whether a new file was copied into the managed directory.
    pub copied: bool,
    pub warnings: Vec<AssetError>,
}

pub struct AssetManager {
    root: PathBuf,
    bounds: ImageBounds,
}

impl AssetManager {
    /// Uses `root` as the managed directory, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AssetError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| AssetError::Directory { path: root.clone(), source })?;

        Ok(Self {
            root,
            bounds: ImageBounds::STORAGE,
        })
    }

    pub fn with_bounds(mut self, bounds: ImageBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `path` lives inside the managed directory. A path that climbs
    /// out with `..` only counts if it resolves back inside the directory.
    pub fn is_managed(&self, path: &str) -> bool {
        if path.trim().is_empty() {
            return false;
        }
        let path = Path::new(path);
        let climbs = path.components().any(|c| matches!(c, Component::ParentDir));
        if !climbs && path.starts_with(&self.root) {
            return true;
        }
        match (path.canonicalize(), self.root.canonicalize()) {
            (Ok(path), Ok(root)) => path.starts_with(root),
            _ => false,
        }
    }

    /// Brings the image of a piece in line with what the user selected.
    ///
    /// - an empty `candidate` means "no image";
    /// - a `candidate` already in the managed directory is kept as is;
    /// - an existing external file is copied in and downsized;
    /// - a `candidate` that vanished from disk degrades to "no image".
    ///
    /// Once the new path is settled, a managed `existing` file that is no
    /// longer referenced is deleted. If the copy itself fails, the record
    /// keeps `existing`.
    pub fn reconcile(&self, candidate: &str, existing: &str, owner: AssetOwner) -> Reconciled {
        let candidate = candidate.trim();
        let existing = existing.trim();
        let mut result = Reconciled::default();

        if candidate.is_empty() {
            result.path = String::new();
        } else if self.is_managed(candidate) {
            result.path = candidate.to_string();
        } else if Path::new(candidate).is_file() {
            match self.copy_in(Path::new(candidate), owner) {
                Ok(target) => {
                    if let Err(e) = self.downsize(&target) {
                        warn!("{}", e);
                        result.warnings.push(e);
                    }
                    result.path = target.to_string_lossy().into_owned();
                    result.copied = true;
                }
                Err(e) => {
                    warn!("{}", e);
                    result.warnings.push(e);
                    result.path = existing.to_string();
                }
            }
        } else {
            let e = AssetError::MissingSource(PathBuf::from(candidate));
            warn!("{}", e);
            result.warnings.push(e);
            result.path = String::new();
        }

        if !existing.is_empty() && existing != result.path && self.is_managed(existing) {
            self.delete(existing);
        }

        result
    }

    /// Renames a placeholder-named file to carry the real piece id and
    /// returns the new path. Paths that are not placeholders come back unchanged.
    pub fn adopt(&self, managed: &str, id: i64) -> Result<String, AssetError> {
        let from = PathBuf::from(managed);
        let Some(rest) = from
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(&format!("{}{}_", FILE_PREFIX, PLACEHOLDER_TOKEN)))
        else {
            return Ok(managed.to_string());
        };

        let to = from.with_file_name(format!("{}{}_{}", FILE_PREFIX, id, rest));
        fs::rename(&from, &to).map_err(|source| AssetError::Rename {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;
        debug!("Adopted image {} as {}", from.display(), to.display());

        Ok(to.to_string_lossy().into_owned())
    }

    /// Removes a managed file. A missing file is not an error and failures are only logged.
    pub fn delete(&self, managed: &str) {
        if managed.trim().is_empty() {
            return;
        }
        match fs::remove_file(managed) {
            Ok(()) => debug!("Removed image {}", managed),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Could not remove image {}: {}", managed, e),
        }
    }

    /// Scales the image at `path` down in place so it fits the bounds.
    /// Returns whether the file was rewritten.
    pub fn downsize(&self, path: &Path) -> Result<bool, AssetError> {
        let resize_error = |source| AssetError::Resize {
            path: path.to_path_buf(),
            source,
        };
        let img = image::open(path).map_err(resize_error)?;
        if self.bounds.contains(img.width(), img.height()) {
            return Ok(false);
        }

        let resized = img.resize(self.bounds.width, self.bounds.height, FilterType::Lanczos3);
        resized.save(path).map_err(resize_error)?;
        debug!(
            "Downsized {} from {}x{} to {}x{}",
            path.display(),
            img.width(),
            img.height(),
            resized.width(),
            resized.height()
        );

        Ok(true)
    }

    fn copy_in(&self, source: &Path, owner: AssetOwner) -> Result<PathBuf, AssetError> {
        let target = self.target_path(source, owner);
        fs::copy(source, &target).map_err(|e| AssetError::Copy {
            from: source.to_path_buf(),
            to: target.clone(),
            source: e,
        })?;
        debug!("Copied {} to {}", source.display(), target.display());

        Ok(target)
    }

    fn target_path(&self, source: &Path, owner: AssetOwner) -> PathBuf {
        let extension = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        let stem = format!("{}{}_{}", FILE_PREFIX, owner.token(), Local::now().format("%Y%m%d_%H%M%S_%3f"));

        let mut target = self.root.join(format!("{}{}", stem, extension));
        let mut n = 1;
        while target.exists() {
            target = self.root.join(format!("{}-{}{}", stem, n, extension));
            n += 1;
        }
        target
    }
}
