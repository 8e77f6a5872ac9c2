//! Error types for the pdf2thumb library.
//!
//! Two error types mirror the two tiers of failure:
//!
//! * [`ThumbError`] — **Fatal**: the run cannot start at all (input folder
//!   missing, renderer not installed, output folder not creatable). Returned
//!   as `Err(ThumbError)` from [`crate::run`] before any file is touched.
//!
//! * [`FileError`] — **Non-fatal**: one PDF failed to render or its
//!   thumbnail could not be written. Stored in [`crate::FileReport`] and
//!   logged; the run moves on to the next file.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort a run before any conversion happens.
#[derive(Debug, Error)]
pub enum ThumbError {
    // ── Pre-flight errors ─────────────────────────────────────────────────
    /// The configured input folder does not exist.
    #[error("PDF folder not found: '{path}'")]
    InputDirNotFound { path: PathBuf },

    /// The configured renderer tool path does not exist.
    #[error("Renderer tool path not found: '{path}'\nInstall poppler (pdftoppm) or point --renderer-path at it.")]
    RendererNotFound { path: PathBuf },

    /// The output folder could not be created.
    #[error("Failed to create output folder '{path}': {source}")]
    OutputDirCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input folder exists but could not be listed.
    #[error("Failed to list '{path}': {source}")]
    ListFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The glob pattern is empty or contains a path separator.
    #[error("Invalid file pattern '{pattern}': must be a non-empty file name pattern")]
    InvalidPattern { pattern: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal error for a single PDF.
#[derive(Debug, Error)]
pub enum FileError {
    /// The rendering library could not be loaded from the renderer path.
    #[error(
        "renderer unavailable: cannot load '{library}': {detail}\n\
Point --renderer-path at the directory that holds libpdfium."
    )]
    RendererUnavailable { library: PathBuf, detail: String },

    /// The rendering backend rejected the document or a page.
    #[error("rendering failed: {detail}")]
    RenderFailed { detail: String },

    /// The external renderer could not be started or exited unsuccessfully.
    #[error("'{tool}' failed: {detail}")]
    ToolFailed { tool: PathBuf, detail: String },

    /// A rendered page bitmap could not be decoded.
    #[error("could not decode rendered page '{path}': {source}")]
    DecodeFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// JPEG encoding failed.
    #[error("JPEG encoding failed: {0}")]
    EncodeFailed(#[source] image::ImageError),

    /// The thumbnail file could not be created or written.
    #[error("failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_dir_not_found_names_path() {
        let e = ThumbError::InputDirNotFound {
            path: PathBuf::from("public/pdfs"),
        };
        assert!(e.to_string().contains("public/pdfs"), "got: {e}");
    }

    #[test]
    fn tool_failed_display() {
        let e = FileError::ToolFailed {
            tool: PathBuf::from("/usr/bin/pdftoppm"),
            detail: "exit status: 1".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("pdftoppm"), "got: {msg}");
        assert!(msg.contains("exit status: 1"), "got: {msg}");
    }

    #[test]
    fn renderer_unavailable_names_library() {
        let e = FileError::RendererUnavailable {
            library: PathBuf::from("bin/libpdfium.so"),
            detail: "cannot open shared object file".into(),
        };
        assert!(e.to_string().contains("bin/libpdfium.so"), "got: {e}");
    }

    #[test]
    fn write_failed_keeps_source() {
        use std::error::Error as _;
        let e = FileError::WriteFailed {
            path: PathBuf::from("out/pagina_01.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("pagina_01.jpg"));
    }
}
