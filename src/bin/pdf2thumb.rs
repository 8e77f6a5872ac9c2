//! CLI binary for pdf2thumb.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ThumbnailConfig`. Every flag defaults to the tool's fixed setting, so a
//! bare `pdf2thumb` converts `public/pdfs/*.pdf` into `public/images/`.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2thumb::config::{
    DEFAULT_DPI, DEFAULT_INPUT_DIR, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH,
    DEFAULT_OUTPUT_DIR, DEFAULT_OUTPUT_PREFIX, DEFAULT_PATTERN, DEFAULT_RENDERER_PATH,
};
use pdf2thumb::{
    plan, run, ProgressCallback, RendererBackend, ThumbnailConfig, ThumbnailProgressCallback,
};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar for the run plus a log line per PDF.
struct CliProgressCallback {
    bar: ProgressBar,
    /// The PDF being rendered and when it started.
    current: Mutex<Option<(PathBuf, Instant)>>,
}

impl CliProgressCallback {
    /// The bar stays invisible until `on_run_start` gives it a length.
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: ProgressBar::new(0),
            current: Mutex::new(None),
        })
    }

    /// Input name and elapsed seconds of the file that just finished.
    fn finish_current(&self) -> (String, f64) {
        let taken = self.current.lock().ok().and_then(|mut c| c.take());
        match taken {
            Some((path, started)) => (file_name(&path), started.elapsed().as_secs_f64()),
            None => (String::new(), 0.0),
        }
    }
}

impl ThumbnailProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_files: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} PDFs  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total_files as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Rendering");
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_file_start(&self, _index: usize, _total: usize, input: &Path) {
        if let Ok(mut current) = self.current.lock() {
            *current = Some((input.to_path_buf(), Instant::now()));
        }
        self.bar.set_message(file_name(input));
    }

    fn on_file_written(&self, index: usize, total: usize, output: &Path) {
        let (name, secs) = self.finish_current();
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  →  {}  {}",
            green("✓"),
            index,
            total,
            name,
            bold(&file_name(output)),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_file_without_pages(&self, index: usize, total: usize, _input: &Path) {
        let (name, _) = self.finish_current();
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            yellow("⚠"),
            index,
            total,
            name,
            yellow("PDF has no pages, skipped"),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, index: usize, total: usize, _input: &Path, error: &str) {
        let (name, secs) = self.finish_current();
        // Keep one line per file even for multi-line tool output.
        let first_line = error.lines().next().unwrap_or(error);
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}  {}",
            red("✗"),
            index,
            total,
            name,
            red(first_line),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_run_finished(&self, _total_files: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Default layout: public/pdfs/*.pdf → public/images/pagina_NN.jpg
  pdf2thumb

  # Other folders, poppler installed elsewhere
  pdf2thumb --input-dir scans --output-dir thumbs --renderer-path /opt/poppler/bin

  # Render with pdfium instead of poppler
  pdf2thumb --backend pdfium --renderer-path /opt/pdfium/lib

  # Show which thumbnail each PDF would become, as JSON
  pdf2thumb --dry-run --json

OUTPUT NAMING:
  PDFs are sorted by file name and numbered from 1. The n-th PDF becomes
  <prefix><NN>.jpg regardless of its own name; existing files are replaced.

ENVIRONMENT VARIABLES:
  Every flag can also be set through the PDF2THUMB_* variable listed next to
  it in --help. RUST_LOG overrides the log filter.
"#;

/// Render the first page of each PDF in a folder to a JPEG thumbnail.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2thumb",
    version,
    about = "Render the first page of each PDF in a folder to a JPEG thumbnail",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Folder scanned for PDFs (not recursive).
    #[arg(long, env = "PDF2THUMB_INPUT_DIR", default_value = DEFAULT_INPUT_DIR)]
    input_dir: PathBuf,

    /// Folder thumbnails are written to; created if missing.
    #[arg(long, env = "PDF2THUMB_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Directory holding pdftoppm (poppler) or the pdfium library.
    #[arg(long, env = "PDF2THUMB_RENDERER_PATH", default_value = DEFAULT_RENDERER_PATH)]
    renderer_path: PathBuf,

    /// Rendering engine.
    #[arg(long, env = "PDF2THUMB_BACKEND", value_enum, default_value = "poppler")]
    backend: BackendArg,

    /// Rendering DPI (72–600).
    #[arg(long, env = "PDF2THUMB_DPI", default_value_t = DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Bounding-box width in pixels.
    #[arg(long, env = "PDF2THUMB_MAX_WIDTH", default_value_t = DEFAULT_MAX_WIDTH,
          value_parser = clap::value_parser!(u32).range(1..))]
    max_width: u32,

    /// Bounding-box height in pixels.
    #[arg(long, env = "PDF2THUMB_MAX_HEIGHT", default_value_t = DEFAULT_MAX_HEIGHT,
          value_parser = clap::value_parser!(u32).range(1..))]
    max_height: u32,

    /// JPEG quality (1–100).
    #[arg(long, env = "PDF2THUMB_QUALITY", default_value_t = DEFAULT_JPEG_QUALITY,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// File-name pattern selecting inputs (`*` and `?` wildcards).
    #[arg(long, env = "PDF2THUMB_PATTERN", default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Output file-name prefix.
    #[arg(long, env = "PDF2THUMB_PREFIX", default_value = DEFAULT_OUTPUT_PREFIX)]
    prefix: String,

    /// List the planned PDF → thumbnail pairs without rendering.
    #[arg(long)]
    dry_run: bool,

    /// With --dry-run, print the plan as JSON.
    #[arg(long, requires = "dry_run")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2THUMB_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2THUMB_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2THUMB_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum BackendArg {
    Poppler,
    Pdfium,
}

impl From<BackendArg> for RendererBackend {
    fn from(v: BackendArg) -> Self {
        match v {
            BackendArg::Poppler => RendererBackend::Poppler,
            BackendArg::Pdfium => RendererBackend::Pdfium,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = progress_enabled(&cli, io::stderr().is_terminal());
    let filter = log_filter(&cli, show_progress);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ThumbnailProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Dry run ──────────────────────────────────────────────────────────
    if cli.dry_run {
        let jobs = plan(&config).context("Cannot plan thumbnails")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&jobs).context("Failed to serialise plan")?
            );
        } else if jobs.is_empty() {
            eprintln!("{} No PDF files found in {}", yellow("⚠"), config.input_dir.display());
        } else {
            for job in &jobs {
                println!(
                    "{:>3}  {}  →  {}",
                    job.index,
                    job.input.display(),
                    job.output.display()
                );
            }
        }
        return Ok(());
    }

    // ── Run ──────────────────────────────────────────────────────────────
    // Per-file failures are reported by the callback or the logs and do not
    // change the exit status.
    let reports = run(&config).context("Cannot start thumbnail generation")?;

    if reports.is_empty() && show_progress {
        eprintln!("{} No PDF files found in {}", yellow("⚠"), config.input_dir.display());
    }

    Ok(())
}

/// The bar only draws on a terminal; anywhere else its lines would be lost,
/// so the plain log output takes over.
fn progress_enabled(cli: &Cli, stderr_is_terminal: bool) -> bool {
    stderr_is_terminal && !cli.quiet && !cli.no_progress && !cli.dry_run
}

/// The progress bar reports every file, so library logs are reduced to
/// errors while it is active.
fn log_filter(cli: &Cli, show_progress: bool) -> &'static str {
    if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    }
}

/// Map CLI flags onto a validated `ThumbnailConfig`.
fn build_config(cli: &Cli, progress_cb: Option<ProgressCallback>) -> Result<ThumbnailConfig> {
    let mut builder = ThumbnailConfig::builder()
        .input_dir(&cli.input_dir)
        .output_dir(&cli.output_dir)
        .renderer_path(&cli.renderer_path)
        .backend(cli.backend.clone().into())
        .dpi(cli.dpi)
        .max_width(cli.max_width)
        .max_height(cli.max_height)
        .jpeg_quality(cli.quality)
        .pattern(cli.pattern.clone())
        .output_prefix(cli.prefix.clone());

    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
