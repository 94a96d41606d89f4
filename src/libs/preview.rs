//! Background image previews.
//!
//! Decoding a large photo takes long enough to stall an interactive front
//! end, so previews are produced on a small dedicated pool and handed back
//! through a callback. At most [`PreviewPool::WORKERS`] images are decoded
//! at once. The pool only reads image files; it never touches the store or
//! the history.
//!
//! A missing file, a decode error or a panic inside the decoder all come
//! back as [`Preview::Unavailable`]. Nothing is ever raised to the caller.

use crate::libs::assets::ImageBounds;
use image::imageops::FilterType;
use image::RgbaImage;
use parking_lot::Mutex;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, error};

#[derive(Debug, Clone)]
pub enum Preview {
    /// Decoded image, already scaled to fit the requested bounds.
    Ready(RgbaImage),
    Unavailable(String),
}

impl Preview {
    pub fn is_ready(&self) -> bool {
        matches!(self, Preview::Ready(_))
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Preview::Ready(img) => Some(img.dimensions()),
            Preview::Unavailable(_) => None,
        }
    }
}

pub struct PreviewPool {
    runtime: Option<Runtime>,
    in_flight: Arc<Mutex<usize>>,
}

impl PreviewPool {
    pub const WORKERS: usize = 2;

    pub fn new() -> io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(Self::WORKERS)
            .thread_name("piece-preview")
            .build()?;

        Ok(Self {
            runtime: Some(runtime),
            in_flight: Arc::new(Mutex::new(0)),
        })
    }

    /// Number of requests whose callback has not run yet.
    pub fn pending(&self) -> usize {
        *self.in_flight.lock()
    }

    /// Schedules a preview of `path` scaled to `bounds`. `callback` runs on a
    /// pool thread once the image is decoded or found unusable.
    pub fn request<F>(&self, path: impl Into<PathBuf>, bounds: ImageBounds, callback: F)
    where
        F: FnOnce(Preview) + Send + 'static,
    {
        let Some(runtime) = &self.runtime else {
            callback(Preview::Unavailable("preview pool is shut down".to_string()));
            return;
        };

        let path = path.into();
        let in_flight = Arc::clone(&self.in_flight);
        *in_flight.lock() += 1;

        runtime.spawn_blocking(move || {
            let preview = panic::catch_unwind(AssertUnwindSafe(|| load(&path, bounds)))
                .unwrap_or_else(|_| Preview::Unavailable(format!("decoder panicked on {}", path.display())));

            if panic::catch_unwind(AssertUnwindSafe(|| callback(preview))).is_err() {
                error!("Preview callback panicked for {}", path.display());
            }
            *in_flight.lock() -= 1;
        });
    }
}

impl Drop for PreviewPool {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

/// Decodes `path` and scales it down to fit `bounds`. Smaller images are
/// returned at their own size.
pub fn load(path: &Path, bounds: ImageBounds) -> Preview {
    if !path.is_file() {
        return Preview::Unavailable(format!("image not found: {}", path.display()));
    }

    let img = match image::open(path) {
        Ok(img) => img,
        Err(e) => {
            debug!("Cannot preview {}: {}", path.display(), e);
            return Preview::Unavailable(e.to_string());
        }
    };

    let img = if bounds.contains(img.width(), img.height()) {
        img
    } else {
        img.resize(bounds.width, bounds.height, FilterType::Lanczos3)
    };

    Preview::Ready(img.to_rgba8())
}
