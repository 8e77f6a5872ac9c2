//! Progress-callback trait for per-file thumbnail events.
//!
//! Inject an [`Arc<dyn ThumbnailProgressCallback>`] via
//! [`crate::config::ThumbnailConfigBuilder::progress_callback`] to receive
//! events as [`crate::run`] works through the input folder. The CLI uses it
//! to drive a terminal progress bar; the library itself only logs.
//!
//! # Example
//!
//! ```rust
//! use pdf2thumb::{ThumbnailConfig, ThumbnailProgressCallback};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     written: AtomicUsize,
//! }
//!
//! impl ThumbnailProgressCallback for CountingCallback {
//!     fn on_file_written(&self, index: usize, total: usize, output: &Path) {
//!         self.written.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{index}/{total} → {}", output.display());
//!     }
//! }
//!
//! let config = ThumbnailConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { written: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the driver as it processes each PDF.
///
/// All methods have no-op defaults so implementors only override what they
/// care about. `index` is the 1-based position of the file in sorted order.
pub trait ThumbnailProgressCallback: Send + Sync {
    /// Called once after discovery, before the first file is rendered.
    fn on_run_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a PDF is handed to the renderer.
    fn on_file_start(&self, index: usize, total_files: usize, input: &Path) {
        let _ = (index, total_files, input);
    }

    /// Called when a thumbnail has been written.
    fn on_file_written(&self, index: usize, total_files: usize, output: &Path) {
        let _ = (index, total_files, output);
    }

    /// Called when the renderer produced no pages for a PDF.
    fn on_file_without_pages(&self, index: usize, total_files: usize, input: &Path) {
        let _ = (index, total_files, input);
    }

    /// Called when a PDF failed to convert.
    fn on_file_error(&self, index: usize, total_files: usize, input: &Path, error: &str) {
        let _ = (index, total_files, input, error);
    }

    /// Called once after every file has been attempted.
    fn on_run_finished(&self, total_files: usize) {
        let _ = total_files;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ThumbnailProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ThumbnailConfig`].
pub type ProgressCallback = Arc<dyn ThumbnailProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_run_start(2);
        cb.on_file_start(1, 2, Path::new("a.pdf"));
        cb.on_file_written(1, 2, Path::new("pagina_01.jpg"));
        cb.on_file_error(2, 2, Path::new("b.pdf"), "boom");
        cb.on_run_finished(2);
    }
}
