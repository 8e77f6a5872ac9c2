//! Pre-flight checks run before any PDF is touched.

use crate::config::ThumbnailConfig;
use crate::error::ThumbError;
use std::fs;
use tracing::debug;

/// Check that the input folder and renderer path exist, then make sure the
/// output folder exists.
///
/// Nothing is created when either check fails. Creating the output folder
/// is idempotent and includes missing parents.
pub fn validate_environment(config: &ThumbnailConfig) -> Result<(), ThumbError> {
    if !config.input_dir.exists() {
        return Err(ThumbError::InputDirNotFound {
            path: config.input_dir.clone(),
        });
    }

    if !config.renderer_path.exists() {
        return Err(ThumbError::RendererNotFound {
            path: config.renderer_path.clone(),
        });
    }

    fs::create_dir_all(&config.output_dir).map_err(|e| ThumbError::OutputDirCreateFailed {
        path: config.output_dir.clone(),
        source: e,
    })?;

    debug!(
        "Environment ok: input={} output={} renderer={}",
        config.input_dir.display(),
        config.output_dir.display(),
        config.renderer_path.display()
    );
    Ok(())
}
