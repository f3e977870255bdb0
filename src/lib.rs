//! Airsprite Core - Aircraft Sprite Toolchain
//!
//! # The Working Rules
//! 1. SVG Is Truth
//! 2. The Contract Is Fixed
//! 3. Validation Collects, It Never Aborts
//! 4. Hidden Means Hidden, All The Way Down
//! 5. One Sprite Per Unique Source

pub mod airframe;
pub mod contract;
pub mod raster;
pub mod sheet;
pub mod style;
pub mod units;
pub mod validator;

pub use airframe::{Airframe, AirframeError, Anchor};
pub use contract::{StyleContract, FULL_OPACITY};
pub use raster::{RasterError, Rasterizer};
pub use sheet::{assign_sprite_ids, build_manifest, SheetLayout, SheetManifest, SpriteSlot};
pub use validator::{Issue, SvgValidator, ValidateError};

pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");
