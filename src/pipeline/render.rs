//! PDF rasterisation: turn a document into one `DynamicImage` per page.
//!
//! Rendering is delegated to a locally installed engine found under the
//! configured renderer path. Two engines are supported behind the
//! [`PageRenderer`] trait:
//!
//! * [`PopplerRenderer`] runs poppler's `pdftoppm` as a subprocess into a
//!   throw-away [`TempDir`] and decodes the PNGs it leaves behind.
//! * [`PdfiumRenderer`] loads the pdfium shared library once via
//!   `pdfium-render` and renders in-process.
//!
//! Both return every page in document order; callers decide how many they
//! actually use.

use crate::config::{RendererBackend, ThumbnailConfig};
use crate::error::FileError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tracing::{debug, info, warn};

#[cfg(windows)]
const PDFTOPPM_BIN: &str = "pdftoppm.exe";
#[cfg(not(windows))]
const PDFTOPPM_BIN: &str = "pdftoppm";

#[cfg(target_os = "windows")]
const PDFIUM_LIB: &str = "pdfium.dll";
#[cfg(target_os = "macos")]
const PDFIUM_LIB: &str = "libpdfium.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const PDFIUM_LIB: &str = "libpdfium.so";

/// Prefix `pdftoppm` is told to use for its output files.
const PAGE_PREFIX: &str = "page";

/// A PDF rasteriser.
pub trait PageRenderer {
    /// Short engine name for log lines.
    fn name(&self) -> &str;

    /// Render every page of `pdf_path` at `dpi`, in page order.
    ///
    /// A document without pages yields an empty vector, not an error.
    fn render_pages(&self, pdf_path: &Path, dpi: u32) -> Result<Vec<DynamicImage>, FileError>;
}

/// Build the renderer selected by `config.backend`.
///
/// A pdfium library that cannot be bound is not fatal: the returned
/// renderer fails every file with [`FileError::RendererUnavailable`], the
/// same way a missing `pdftoppm` fails every file with
/// [`FileError::ToolFailed`].
pub fn renderer_for(config: &ThumbnailConfig) -> Box<dyn PageRenderer> {
    match config.backend {
        RendererBackend::Poppler => Box::new(PopplerRenderer::new(&config.renderer_path)),
        RendererBackend::Pdfium => match PdfiumRenderer::bind(&config.renderer_path) {
            Ok(renderer) => Box::new(renderer),
            Err(FileError::RendererUnavailable { library, detail }) => {
                warn!("Cannot bind pdfium from {}: {}", library.display(), detail);
                Box::new(UnavailableRenderer { library, detail })
            }
            Err(other) => Box::new(UnavailableRenderer {
                library: config.renderer_path.join(PDFIUM_LIB),
                detail: other.to_string(),
            }),
        },
    }
}

/// Stands in for a backend whose library failed to load.
struct UnavailableRenderer {
    library: PathBuf,
    detail: String,
}

impl PageRenderer for UnavailableRenderer {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn render_pages(&self, _pdf_path: &Path, _dpi: u32) -> Result<Vec<DynamicImage>, FileError> {
        Err(FileError::RendererUnavailable {
            library: self.library.clone(),
            detail: self.detail.clone(),
        })
    }
}

// ── Poppler ──────────────────────────────────────────────────────────────

/// Renders through poppler's `pdftoppm` binary.
#[derive(Debug, Clone)]
pub struct PopplerRenderer {
    pdftoppm: PathBuf,
}

impl PopplerRenderer {
    /// Use the `pdftoppm` executable inside `tool_dir`.
    pub fn new(tool_dir: &Path) -> Self {
        Self {
            pdftoppm: tool_dir.join(PDFTOPPM_BIN),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.pdftoppm
    }
}

impl PageRenderer for PopplerRenderer {
    fn name(&self) -> &str {
        "poppler"
    }

    fn render_pages(&self, pdf_path: &Path, dpi: u32) -> Result<Vec<DynamicImage>, FileError> {
        let temp_dir = TempDir::new().map_err(|e| FileError::RenderFailed {
            detail: format!("cannot create temp dir: {e}"),
        })?;
        let prefix = temp_dir.path().join(PAGE_PREFIX);

        let output = Command::new(&self.pdftoppm)
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-png")
            .arg(pdf_path)
            .arg(&prefix)
            .output()
            .map_err(|e| FileError::ToolFailed {
                tool: self.pdftoppm.clone(),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FileError::ToolFailed {
                tool: self.pdftoppm.clone(),
                detail: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        let pages = collect_page_files(temp_dir.path())?;
        debug!("pdftoppm produced {} page(s) for {}", pages.len(), pdf_path.display());

        pages
            .into_iter()
            .map(|path| image::open(&path).map_err(|source| FileError::DecodeFailed { path, source }))
            .collect()
    }
}

/// Page number of a `pdftoppm` output name such as `page-7.png` or
/// `page-007.png`.
fn page_number(file_name: &str) -> Option<usize> {
    file_name
        .strip_prefix(PAGE_PREFIX)?
        .strip_prefix('-')?
        .strip_suffix(".png")?
        .parse()
        .ok()
}

/// The rendered page files in `dir`, ordered by page number.
fn collect_page_files(dir: &Path) -> Result<Vec<PathBuf>, FileError> {
    let entries = fs::read_dir(dir).map_err(|e| FileError::RenderFailed {
        detail: format!("cannot list rendered pages: {e}"),
    })?;

    let mut numbered: Vec<(usize, PathBuf)> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let path = entry.path();
            let n = page_number(path.file_name()?.to_str()?)?;
            Some((n, path))
        })
        .collect();

    numbered.sort_by_key(|(n, _)| *n);
    Ok(numbered.into_iter().map(|(_, p)| p).collect())
}

// ── Pdfium ───────────────────────────────────────────────────────────────

/// Renders in-process through a pdfium shared library.
pub struct PdfiumRenderer {
    pdfium: Pdfium,
}

impl PdfiumRenderer {
    /// Bind to the platform pdfium library inside `library_dir`.
    pub fn bind(library_dir: &Path) -> Result<Self, FileError> {
        let lib_path = library_dir.join(PDFIUM_LIB);
        let bindings =
            Pdfium::bind_to_library(&lib_path).map_err(|e| FileError::RendererUnavailable {
                library: lib_path.clone(),
                detail: e.to_string(),
            })?;
        info!("Bound pdfium from {}", lib_path.display());
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PageRenderer for PdfiumRenderer {
    fn name(&self) -> &str {
        "pdfium"
    }

    fn render_pages(&self, pdf_path: &Path, dpi: u32) -> Result<Vec<DynamicImage>, FileError> {
        let document = self
            .pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| FileError::RenderFailed {
                detail: format!("{:?}", e),
            })?;

        // PDF user space is 72 units per inch.
        let render_config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0);

        let pages = document.pages();
        let mut images = Vec::with_capacity(pages.len() as usize);
        for (idx, page) in pages.iter().enumerate() {
            let bitmap =
                page.render_with_config(&render_config)
                    .map_err(|e| FileError::RenderFailed {
                        detail: format!("page {}: {:?}", idx + 1, e),
                    })?;
            let image = bitmap.as_image();
            debug!(
                "Rendered page {} → {}x{} px",
                idx + 1,
                image.width(),
                image.height()
            );
            images.push(image);
        }

        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_numbers_parse_padded_and_plain() {
        assert_eq!(page_number("page-1.png"), Some(1));
        assert_eq!(page_number("page-007.png"), Some(7));
        assert_eq!(page_number("page-12.png"), Some(12));
        assert_eq!(page_number("page.png"), None);
        assert_eq!(page_number("other-1.png"), None);
        assert_eq!(page_number("page-1.ppm"), None);
    }

    #[test]
    fn page_files_sort_numerically() {
        let dir = TempDir::new().unwrap();
        for name in ["page-10.png", "page-2.png", "page-1.png", "stray.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let files = collect_page_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["page-1.png", "page-2.png", "page-10.png"]);
    }

    #[test]
    fn poppler_uses_binary_inside_tool_dir() {
        let r = PopplerRenderer::new(Path::new("/opt/poppler/bin"));
        assert_eq!(r.executable(), Path::new("/opt/poppler/bin").join(PDFTOPPM_BIN));
        assert_eq!(r.name(), "poppler");
    }

    #[test]
    fn missing_pdftoppm_is_a_tool_error() {
        let dir = TempDir::new().unwrap();
        let r = PopplerRenderer::new(dir.path());
        let err = r.render_pages(Path::new("whatever.pdf"), 200).unwrap_err();
        assert!(matches!(err, FileError::ToolFailed { .. }), "got: {err}");
    }

    #[test]
    fn pdfium_bind_fails_without_library() {
        let dir = TempDir::new().unwrap();
        let err = PdfiumRenderer::bind(dir.path()).err().expect("bind must fail");
        assert!(matches!(err, FileError::RendererUnavailable { .. }));
    }

    #[test]
    fn unbindable_pdfium_fails_per_file() {
        let dir = TempDir::new().unwrap();
        let config = ThumbnailConfig::builder()
            .backend(RendererBackend::Pdfium)
            .renderer_path(dir.path())
            .build()
            .unwrap();

        let renderer = renderer_for(&config);
        let err = renderer.render_pages(Path::new("a.pdf"), 200).unwrap_err();
        match err {
            FileError::RendererUnavailable { library, .. } => {
                assert_eq!(library, dir.path().join(PDFIUM_LIB));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
