//! Airframe descriptors - the JSON files that bind sprite artwork to an
//! aircraft type.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum AirframeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airframe {
    pub version: u32,
    pub icao: Icao,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<String>,
    pub render: RenderSpec,
    pub art: Art,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Icao {
    pub designator: String,
    pub type_code: String,
    pub wake_category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSpec {
    pub scale: f64,
    pub anchor: Anchor,
    #[serde(default)]
    pub no_rotate: bool,
}

/// Point from the top-left of the sprite that rotation and placement happen
/// about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Art {
    pub frames: Vec<Frame>,
    #[serde(default)]
    pub frame_time: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub src: String,
}

impl Airframe {
    pub fn from_file(path: &Path) -> Result<Self, AirframeError> {
        let content = fs::read_to_string(path).map_err(|source| AirframeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| AirframeError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads every `.json` descriptor in `dir`, in directory-listing order.
    /// Subdirectories and other files are skipped.
    pub fn from_dir(dir: &Path) -> Result<Vec<Self>, AirframeError> {
        let listing = fs::read_dir(dir).map_err(|source| AirframeError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut out = Vec::new();
        for entry in listing {
            let entry = entry.map_err(|source| AirframeError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();

            if path.is_dir() {
                debug!(dir = %path.display(), "skipping dir");
                continue;
            }
            if path.extension().map_or(true, |e| e != "json") {
                debug!(file = %path.display(), "skipping non-json file");
                continue;
            }

            let af = Self::from_file(&path)?;
            info!(icao = %af.icao.designator, "added airframe");
            out.push(af);
        }

        Ok(out)
    }
}
