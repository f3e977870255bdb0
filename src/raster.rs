//! External rasterization via Inkscape.
//!
//! Inkscape sometimes exits zero without producing usable output, so the
//! exported file is checked for existence and size rather than trusting the
//! exit status alone.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("failed to launch inkscape: {0}")]
    Launch(#[source] std::io::Error),

    #[error("inkscape failed ({status})\noutput:\n{output}")]
    Failed { status: String, output: String },

    #[error("inkscape produced no output file at {path}\noutput:\n{output}")]
    MissingOutput { path: PathBuf, output: String },

    #[error("inkscape produced empty output file ({path})")]
    EmptyOutput { path: PathBuf },
}

/// Converts SVG sources to PNG with an Inkscape v1+ binary.
pub struct Rasterizer {
    inkscape: PathBuf,
}

impl Rasterizer {
    pub fn new(inkscape: impl Into<PathBuf>) -> Self {
        Self {
            inkscape: inkscape.into(),
        }
    }

    pub fn convert(&self, src: &Path, dst: &Path) -> Result<(), RasterError> {
        debug!(src = %src.display(), dst = %dst.display(), "converting svg to png");

        let out = Command::new(&self.inkscape)
            .arg(src)
            .arg("--export-type=png")
            .arg("--export-overwrite")
            .arg(format!("--export-filename={}", dst.display()))
            .output()
            .map_err(RasterError::Launch)?;

        // Inkscape logs useful info even on "success"; keep it for errors.
        let combined = String::from_utf8_lossy(&out.stdout).into_owned()
            + &String::from_utf8_lossy(&out.stderr);

        if !out.status.success() {
            return Err(RasterError::Failed {
                status: out.status.to_string(),
                output: combined,
            });
        }

        let meta = std::fs::metadata(dst).map_err(|_| RasterError::MissingOutput {
            path: dst.to_path_buf(),
            output: combined,
        })?;
        if meta.len() == 0 {
            return Err(RasterError::EmptyOutput {
                path: dst.to_path_buf(),
            });
        }

        Ok(())
    }
}
