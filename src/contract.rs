//! Style Contract - the fixed visual rules every sprite source must meet
//!
//! All sprite artwork is drawn against one contract: a 70px square canvas,
//! white fill, black hairline stroke, full opacity. The contract is data so
//! the validator stays free of scattered magic numbers.

use serde::{Deserialize, Serialize};

/// Target opacity for both stroke and fill. Anything translucent renders
/// wrong once the sprite is composited over the map.
pub const FULL_OPACITY: f64 = 1.0;

/// Visual rules enforced on every visible drawable element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleContract {
    /// Required width and height of the root canvas, in pixels.
    pub canvas_size_px: f64,
    /// Absolute pixel tolerance for the canvas dimensions.
    pub canvas_size_tol_px: f64,
    /// Required fill color, normalized lowercase.
    pub fill: String,
    /// Required stroke color, normalized lowercase.
    pub stroke: String,
    /// Required stroke width in user units.
    pub stroke_width: f64,
    /// "Close enough" tolerance for stroke-width.
    pub stroke_width_tol: f64,
    /// Tolerance for stroke-opacity and fill-opacity around [`FULL_OPACITY`].
    pub opacity_tol: f64,
}

impl Default for StyleContract {
    fn default() -> Self {
        Self {
            canvas_size_px: 70.0,
            canvas_size_tol_px: 0.01,
            fill: "#ffffff".to_string(),
            stroke: "#000000".to_string(),
            stroke_width: 0.26458333,
            stroke_width_tol: 0.0005,
            opacity_tol: 0.0001,
        }
    }
}
