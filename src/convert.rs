//! Top-level thumbnail API: one file ([`convert_file`]) or a whole folder
//! ([`run`]).
//!
//! A run is strictly sequential: validate the environment, list the PDFs in
//! name order, then render → shrink → encode each one. A failure on one
//! file is logged and recorded in its [`FileReport`]; it never stops the
//! files after it.

use crate::config::ThumbnailConfig;
use crate::error::{FileError, ThumbError};
use crate::pipeline::discover::{discover_pdfs, plan_jobs, ThumbnailJob};
use crate::pipeline::encode::write_jpeg;
use crate::pipeline::render::{renderer_for, PageRenderer};
use crate::pipeline::thumbnail::shrink_to_fit;
use crate::validate::validate_environment;
use std::borrow::Cow;
use std::path::Path;
use tracing::{error, info, warn};

/// What happened to one PDF that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// A thumbnail of the given size was written.
    Written { width: u32, height: u32 },
    /// The renderer returned no pages; nothing was written.
    NoPages,
}

/// The result of one planned conversion.
#[derive(Debug)]
pub struct FileReport {
    pub job: ThumbnailJob,
    pub result: Result<FileOutcome, FileError>,
}

fn file_label(path: &Path) -> Cow<'_, str> {
    match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => path.to_string_lossy(),
    }
}

/// Render the first page of `input` and write it as a thumbnail to `output`.
///
/// Pages after the first are discarded. An empty document is not an error:
/// a warning is logged and [`FileOutcome::NoPages`] returned without
/// touching `output`.
pub fn convert_file(
    renderer: &dyn PageRenderer,
    input: &Path,
    output: &Path,
    config: &ThumbnailConfig,
) -> Result<FileOutcome, FileError> {
    let pages = renderer.render_pages(input, config.dpi)?;

    let Some(first) = pages.into_iter().next() else {
        warn!("PDF has no pages: {}", file_label(input));
        return Ok(FileOutcome::NoPages);
    };

    let (max_width, max_height) = config.bounds();
    let thumb = shrink_to_fit(first, max_width, max_height);
    write_jpeg(&thumb, output, config.jpeg_quality)?;

    info!("Converted: {} → {}", file_label(input), output.display());
    Ok(FileOutcome::Written {
        width: thumb.width(),
        height: thumb.height(),
    })
}

/// List the jobs a run would perform, without rendering anything.
///
/// Fails if the input folder is missing; never creates the output folder.
pub fn plan(config: &ThumbnailConfig) -> Result<Vec<ThumbnailJob>, ThumbError> {
    if !config.input_dir.exists() {
        return Err(ThumbError::InputDirNotFound {
            path: config.input_dir.clone(),
        });
    }
    let files = discover_pdfs(&config.input_dir, &config.pattern)?;
    Ok(plan_jobs(files, &config.output_dir, &config.output_prefix))
}

/// Thumbnail every matching PDF in `config.input_dir` with the configured
/// rendering backend.
///
/// # Errors
/// Only pre-flight problems are returned as `Err`; per-file failures are
/// inside the returned reports.
///
/// # Example
/// ```rust,no_run
/// use pdf2thumb::{run, ThumbnailConfig};
///
/// let reports = run(&ThumbnailConfig::default())?;
/// for r in &reports {
///     println!("{} → {}", r.job.input.display(), r.job.output.display());
/// }
/// # Ok::<(), pdf2thumb::ThumbError>(())
/// ```
pub fn run(config: &ThumbnailConfig) -> Result<Vec<FileReport>, ThumbError> {
    validate_environment(config)?;
    let Some(jobs) = pending_jobs(config)? else {
        return Ok(Vec::new());
    };
    // The backend is only loaded once there is something to render.
    let renderer = renderer_for(config);
    Ok(drive(config, jobs, renderer.as_ref()))
}

/// Same as [`run`] but with a caller-supplied renderer.
pub fn run_with_renderer(
    config: &ThumbnailConfig,
    renderer: &dyn PageRenderer,
) -> Result<Vec<FileReport>, ThumbError> {
    validate_environment(config)?;
    let Some(jobs) = pending_jobs(config)? else {
        return Ok(Vec::new());
    };
    Ok(drive(config, jobs, renderer))
}

/// The planned jobs, or `None` (with a warning) when nothing matched.
fn pending_jobs(config: &ThumbnailConfig) -> Result<Option<Vec<ThumbnailJob>>, ThumbError> {
    let jobs = plan(config)?;
    if jobs.is_empty() {
        warn!(
            "No PDF files matching {:?} found in {}",
            config.pattern,
            config.input_dir.display()
        );
        return Ok(None);
    }
    Ok(Some(jobs))
}

fn drive(
    config: &ThumbnailConfig,
    jobs: Vec<ThumbnailJob>,
    renderer: &dyn PageRenderer,
) -> Vec<FileReport> {
    let total = jobs.len();
    info!("Rendering {} PDF(s) with {}", total, renderer.name());
    let cb = config.progress_callback.as_ref();
    if let Some(cb) = cb {
        cb.on_run_start(total);
    }

    let mut reports = Vec::with_capacity(total);
    for job in jobs {
        if let Some(cb) = cb {
            cb.on_file_start(job.index, total, &job.input);
        }

        let result = convert_file(renderer, &job.input, &job.output, config);

        match &result {
            Ok(FileOutcome::Written { .. }) => {
                if let Some(cb) = cb {
                    cb.on_file_written(job.index, total, &job.output);
                }
            }
            Ok(FileOutcome::NoPages) => {
                if let Some(cb) = cb {
                    cb.on_file_without_pages(job.index, total, &job.input);
                }
            }
            Err(e) => {
                error!("Failed to convert {}: {}", file_label(&job.input), e);
                if let Some(cb) = cb {
                    cb.on_file_error(job.index, total, &job.input, &e.to_string());
                }
            }
        }

        reports.push(FileReport { job, result });
    }

    if let Some(cb) = cb {
        cb.on_run_finished(total);
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Renders a fixed list of page sizes and records each call.
    struct FakeRenderer {
        pages: Vec<(u32, u32)>,
        calls: RefCell<Vec<(String, u32)>>,
    }

    impl FakeRenderer {
        fn new(pages: Vec<(u32, u32)>) -> Self {
            Self {
                pages,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl PageRenderer for FakeRenderer {
        fn name(&self) -> &str {
            "fake"
        }

        fn render_pages(&self, pdf_path: &Path, dpi: u32) -> Result<Vec<DynamicImage>, FileError> {
            self.calls
                .borrow_mut()
                .push((file_label(pdf_path).into_owned(), dpi));
            Ok(self
                .pages
                .iter()
                .map(|&(w, h)| DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([9, 9, 9]))))
                .collect())
        }
    }

    #[test]
    fn first_page_is_shrunk_and_written() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("pagina_01.jpg");
        let renderer = FakeRenderer::new(vec![(2400, 3508), (10, 10)]);
        let config = ThumbnailConfig::default();

        let outcome = convert_file(&renderer, Path::new("a.pdf"), &out, &config).unwrap();

        assert_eq!(outcome, FileOutcome::Written { width: 1200, height: 1754 });
        assert_eq!(renderer.calls.borrow()[0], ("a.pdf".to_string(), 200));
        let img = image::open(&out).unwrap();
        assert_eq!((img.width(), img.height()), (1200, 1754));
    }

    #[test]
    fn empty_document_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("pagina_01.jpg");
        let renderer = FakeRenderer::new(vec![]);

        let outcome =
            convert_file(&renderer, Path::new("empty.pdf"), &out, &ThumbnailConfig::default()).unwrap();

        assert_eq!(outcome, FileOutcome::NoPages);
        assert!(!out.exists());
    }

    #[test]
    fn plan_without_input_dir_fails_and_creates_nothing() {
        let root = TempDir::new().unwrap();
        let config = ThumbnailConfig::builder()
            .input_dir(root.path().join("pdfs"))
            .output_dir(root.path().join("images"))
            .build()
            .unwrap();

        let err = plan(&config).unwrap_err();
        assert!(matches!(err, ThumbError::InputDirNotFound { .. }));
        assert!(!root.path().join("images").exists());
    }

    #[test]
    fn plan_lists_jobs_in_name_order() {
        let root = TempDir::new().unwrap();
        let input = root.path().join("pdfs");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("b.pdf"), b"%PDF").unwrap();
        fs::write(input.join("a.pdf"), b"%PDF").unwrap();
        let config = ThumbnailConfig::builder()
            .input_dir(&input)
            .output_dir(root.path().join("images"))
            .build()
            .unwrap();

        let jobs = plan(&config).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].input, input.join("a.pdf"));
        assert!(jobs[1].output.ends_with("pagina_02.jpg"));
    }
}
