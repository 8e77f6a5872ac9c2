//! # pdf2thumb
//!
//! Render the first page of every PDF in a folder to a JPEG thumbnail.
//!
//! ## Pipeline Overview
//!
//! ```text
//! public/pdfs/*.pdf
//!  │
//!  ├─ 1. Validate  input folder + renderer path exist, create output folder
//!  ├─ 2. Discover  sorted, non-recursive glob → pagina_01.jpg, pagina_02.jpg, …
//!  ├─ 3. Render    page bitmaps via poppler (pdftoppm) or pdfium at 200 DPI
//!  ├─ 4. Shrink    first page only, fit 1200 × 1754, Lanczos3
//!  └─ 5. Encode    JPEG quality 95, overwriting the previous thumbnail
//! ```
//!
//! A failure on one PDF is logged and the run continues with the next one;
//! only a missing input folder or renderer aborts the run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2thumb::{run, ThumbnailConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ThumbnailConfig::builder()
//!         .input_dir("public/pdfs")
//!         .output_dir("public/images")
//!         .renderer_path("/usr/bin")
//!         .build()?;
//!     for report in run(&config)? {
//!         if let Err(e) = &report.result {
//!             eprintln!("{}: {e}", report.job.input.display());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2thumb` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod validate;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RendererBackend, ThumbnailConfig, ThumbnailConfigBuilder};
pub use convert::{convert_file, plan, run, run_with_renderer, FileOutcome, FileReport};
pub use error::{FileError, ThumbError};
pub use pipeline::discover::{output_file_name, ThumbnailJob};
pub use pipeline::render::{PageRenderer, PdfiumRenderer, PopplerRenderer};
pub use progress::{NoopProgressCallback, ProgressCallback, ThumbnailProgressCallback};
pub use validate::validate_environment;
