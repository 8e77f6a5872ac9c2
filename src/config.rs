//! Configuration types for PDF thumbnail generation.
//!
//! Every knob lives in [`ThumbnailConfig`], built via its
//! [`ThumbnailConfigBuilder`]. The defaults are the fixed values the tool
//! has always used: `public/pdfs` → `public/images`, 200 DPI, a
//! 1200 × 1754 bounding box and JPEG quality 95.

use crate::error::ThumbError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default folder scanned for PDFs.
pub const DEFAULT_INPUT_DIR: &str = "public/pdfs";
/// Default folder that receives the thumbnails.
pub const DEFAULT_OUTPUT_DIR: &str = "public/images";

/// Default location of the poppler binaries.
#[cfg(windows)]
pub const DEFAULT_RENDERER_PATH: &str = r"C:\poppler-25.12.0\Library\bin";
/// Default location of the poppler binaries.
#[cfg(not(windows))]
pub const DEFAULT_RENDERER_PATH: &str = "/usr/bin";

pub const DEFAULT_DPI: u32 = 200;
pub const DEFAULT_MAX_WIDTH: u32 = 1200;
pub const DEFAULT_MAX_HEIGHT: u32 = 1754;
pub const DEFAULT_JPEG_QUALITY: u8 = 95;
pub const DEFAULT_PATTERN: &str = "*.pdf";
pub const DEFAULT_OUTPUT_PREFIX: &str = "pagina_";

/// Configuration for one thumbnail run.
///
/// Built via [`ThumbnailConfig::builder()`] or [`ThumbnailConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2thumb::{RendererBackend, ThumbnailConfig};
///
/// let config = ThumbnailConfig::builder()
///     .input_dir("docs/pdfs")
///     .output_dir("docs/thumbs")
///     .backend(RendererBackend::Pdfium)
///     .renderer_path("/opt/pdfium/lib")
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 200);
/// ```
#[derive(Clone)]
pub struct ThumbnailConfig {
    /// Folder scanned (non-recursively) for input PDFs. Default: `public/pdfs`.
    pub input_dir: PathBuf,

    /// Folder the thumbnails are written to; created if missing.
    /// Default: `public/images`.
    pub output_dir: PathBuf,

    /// Directory holding the renderer: `pdftoppm` for
    /// [`RendererBackend::Poppler`], the pdfium shared library for
    /// [`RendererBackend::Pdfium`]. Must exist before a run starts.
    pub renderer_path: PathBuf,

    /// Which rendering backend to drive. Default: [`RendererBackend::Poppler`].
    pub backend: RendererBackend,

    /// Rasterisation resolution. Range: 72–600. Default: 200.
    pub dpi: u32,

    /// Bounding-box width in pixels. Default: 1200.
    pub max_width: u32,

    /// Bounding-box height in pixels. Default: 1754.
    pub max_height: u32,

    /// JPEG quality, 1–100. Default: 95.
    pub jpeg_quality: u8,

    /// File-name glob selecting inputs (`*` and `?` wildcards). Default: `*.pdf`.
    pub pattern: String,

    /// Prefix of every output file name. Default: `pagina_`.
    pub output_prefix: String,

    /// Optional per-file progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            renderer_path: PathBuf::from(DEFAULT_RENDERER_PATH),
            backend: RendererBackend::default(),
            dpi: DEFAULT_DPI,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            pattern: DEFAULT_PATTERN.to_string(),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ThumbnailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThumbnailConfig")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("renderer_path", &self.renderer_path)
            .field("backend", &self.backend)
            .field("dpi", &self.dpi)
            .field("max_width", &self.max_width)
            .field("max_height", &self.max_height)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("pattern", &self.pattern)
            .field("output_prefix", &self.output_prefix)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ThumbnailProgressCallback>"),
            )
            .finish()
    }
}

impl ThumbnailConfig {
    /// Create a new builder for `ThumbnailConfig`.
    pub fn builder() -> ThumbnailConfigBuilder {
        ThumbnailConfigBuilder {
            config: Self::default(),
        }
    }

    /// The bounding box as `(width, height)`.
    pub fn bounds(&self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }
}

/// Builder for [`ThumbnailConfig`].
#[derive(Debug)]
pub struct ThumbnailConfigBuilder {
    config: ThumbnailConfig,
}

impl ThumbnailConfigBuilder {
    pub fn input_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.input_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn renderer_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.renderer_path = path.as_ref().to_path_buf();
        self
    }

    pub fn backend(mut self, backend: RendererBackend) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn max_width(mut self, px: u32) -> Self {
        self.config.max_width = px;
        self
    }

    pub fn max_height(mut self, px: u32) -> Self {
        self.config.max_height = px;
        self
    }

    pub fn jpeg_quality(mut self, q: u8) -> Self {
        self.config.jpeg_quality = q;
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.pattern = pattern.into();
        self
    }

    pub fn output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.output_prefix = prefix.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// Out-of-range numbers are rejected, never silently adjusted.
    pub fn build(self) -> Result<ThumbnailConfig, ThumbError> {
        let c = &self.config;
        if !(72..=600).contains(&c.dpi) {
            return Err(ThumbError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if !(1..=100).contains(&c.jpeg_quality) {
            return Err(ThumbError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        if c.max_width == 0 || c.max_height == 0 {
            return Err(ThumbError::InvalidConfig(format!(
                "Bounding box must be at least 1 × 1, got {} × {}",
                c.max_width, c.max_height
            )));
        }
        if c.pattern.is_empty() || c.pattern.contains(['/', '\\']) {
            return Err(ThumbError::InvalidPattern {
                pattern: c.pattern.clone(),
            });
        }
        if c.output_prefix.contains(['/', '\\']) {
            return Err(ThumbError::InvalidConfig(format!(
                "Output prefix must not contain a path separator, got '{}'",
                c.output_prefix
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which external PDF rasteriser renders the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererBackend {
    /// Poppler's `pdftoppm`, run as a subprocess. (default)
    #[default]
    Poppler,
    /// The pdfium shared library, loaded via `pdfium-render`.
    Pdfium,
}

impl fmt::Display for RendererBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererBackend::Poppler => f.write_str("poppler"),
            RendererBackend::Pdfium => f.write_str("pdfium"),
        }
    }
}
