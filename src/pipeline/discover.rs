//! Input discovery: list the PDFs of one folder and assign output names.
//!
//! Only the folder's direct children are considered and only regular files
//! whose name matches the configured pattern. The result is sorted by file
//! name so the `pagina_NN.jpg` numbering is stable between runs.

use crate::error::ThumbError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One planned conversion: which PDF goes to which thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThumbnailJob {
    /// 1-based position in sorted order.
    pub index: usize,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Match a file name against a glob made of literals, `*` and `?`.
///
/// Case-insensitive on Windows, case-sensitive elsewhere, like the
/// platform's own shell globbing.
pub fn matches_pattern(pattern: &str, name: &str) -> bool {
    let fold = |s: &str| -> Vec<char> {
        if cfg!(windows) {
            s.to_lowercase().chars().collect()
        } else {
            s.chars().collect()
        }
    };
    let p = fold(pattern);
    let n = fold(name);

    let (mut pi, mut ni) = (0, 0);
    // Position of the last `*` seen and the name index it was tried at.
    let mut star: Option<(usize, usize)> = None;

    while ni < n.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == n[ni]) {
            pi += 1;
            ni += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ni));
            pi += 1;
        } else if let Some((sp, sn)) = star {
            pi = sp + 1;
            ni = sn + 1;
            star = Some((sp, sn + 1));
        } else {
            return false;
        }
    }

    p[pi..].iter().all(|&c| c == '*')
}

/// List the files in `dir` whose name matches `pattern`, sorted by name.
///
/// Sub-directories are never entered. Entries that cannot be read are
/// skipped with a warning; failing to open `dir` itself is fatal.
pub fn discover_pdfs(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, ThumbError> {
    let entries = fs::read_dir(dir).map_err(|e| ThumbError::ListFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };
        // Non-UTF-8 names are matched on their lossy form and kept as-is.
        if matches_pattern(pattern, &name.to_string_lossy()) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Found {} file(s) matching {:?} in {}", files.len(), pattern, dir.display());
    Ok(files)
}

/// Output file name for the `index`-th input: `<prefix><NN>.jpg`.
pub fn output_file_name(prefix: &str, index: usize) -> String {
    format!("{prefix}{index:02}.jpg")
}

/// Pair each input with its sequential output path, starting at 1.
pub fn plan_jobs(files: Vec<PathBuf>, output_dir: &Path, prefix: &str) -> Vec<ThumbnailJob> {
    files
        .into_iter()
        .enumerate()
        .map(|(i, input)| {
            let index = i + 1;
            ThumbnailJob {
                index,
                output: output_dir.join(output_file_name(prefix, index)),
                input,
            }
        })
        .collect()
}
