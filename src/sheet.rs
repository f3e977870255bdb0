//! Spritesheet layout and manifest.
//!
//! Sprites live in a uniform row-major grid; an index maps to pixel
//! coordinates with plain arithmetic. Several airframes may reference the
//! same artwork, so sprite ids are assigned over the deduplicated set of
//! source paths.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::airframe::{Airframe, Anchor};

/// Frame size used by the deployed spritesheet.
pub const SPRITE_WIDTH: u32 = 72;
pub const SPRITE_HEIGHT: u32 = 72;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("sheet/frame dimensions must be > 0")]
    BadDimensions,

    #[error("sheet width too small for margin")]
    MarginTooLarge,

    #[error("no columns fit (check sheet width, frame width, margin, padding)")]
    NoColumns,
}

/// Uniform grid geometry of one spritesheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetLayout {
    /// Sheet width in pixels.
    pub sheet_width: u32,
    /// Frame size in pixels.
    pub frame_width: u32,
    pub frame_height: u32,
    /// Pixels before the first frame, both axes.
    pub margin: u32,
    /// Pixels between frames, both axes.
    pub padding: u32,
}

impl SheetLayout {
    /// Layout of the deployed sheet: 72x72 frames, no margin or padding.
    pub fn standard(sheet_width: u32) -> Self {
        Self {
            sheet_width,
            frame_width: SPRITE_WIDTH,
            frame_height: SPRITE_HEIGHT,
            margin: 0,
            padding: 0,
        }
    }

    /// How many frames fit per row.
    pub fn columns(&self) -> Result<u32, SheetError> {
        if self.sheet_width == 0 || self.frame_width == 0 || self.frame_height == 0 {
            return Err(SheetError::BadDimensions);
        }
        let usable = self
            .sheet_width
            .checked_sub(2 * self.margin)
            .filter(|w| *w > 0)
            .ok_or(SheetError::MarginTooLarge)?;
        let cols = (usable + self.padding) / (self.frame_width + self.padding);
        if cols == 0 {
            return Err(SheetError::NoColumns);
        }
        Ok(cols)
    }

    /// Top-left pixel of the frame at `index` (0-based, left-to-right then
    /// top-to-bottom).
    pub fn top_left(&self, index: u32) -> Result<(u32, u32), SheetError> {
        let cols = self.columns()?;
        let col = index % cols;
        let row = index / cols;
        let x = self.margin + col * (self.frame_width + self.padding);
        let y = self.margin + row * (self.frame_height + self.padding);
        Ok((x, y))
    }

    /// Rows needed to hold `count` frames.
    pub fn rows_for(&self, count: u32) -> Result<u32, SheetError> {
        let cols = self.columns()?;
        Ok(count.div_ceil(cols))
    }
}

/// One unique piece of artwork and the grid slot it was assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteSlot {
    pub src: String,
    pub sprite_id: u32,
}

/// Assigns sprite ids to the unique artwork sources across `airframes`, in
/// encounter order, starting at `id_offset` (the id after the last
/// pre-existing sprite). Duplicate sources keep their first id.
pub fn assign_sprite_ids(airframes: &[Airframe], id_offset: u32) -> Vec<SpriteSlot> {
    let mut seen: HashMap<&str, u32> = HashMap::new();
    let mut slots = Vec::new();
    let mut next = id_offset;

    for af in airframes {
        for frame in &af.art.frames {
            if seen.contains_key(frame.src.as_str()) {
                info!(airframe = %af.icao.designator, src = %frame.src, "skipping duplicate");
                continue;
            }
            info!(
                airframe = %af.icao.designator,
                src = %frame.src,
                sprite_id = next,
                "adding sprite"
            );
            seen.insert(&frame.src, next);
            slots.push(SpriteSlot {
                src: frame.src.clone(),
                sprite_id: next,
            });
            next += 1;
        }
    }

    slots
}

/// The manifest shipped next to the sheet PNG.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetManifest {
    pub version: u32,
    pub metadata: SheetMetadata,
    /// Maps an airframe ICAO designator to the sprite entry it renders with
    /// (itself, or its `aliasOf` target).
    pub airframe_to_sprite: BTreeMap<String, String>,
    /// Sprite entries keyed by ICAO designator.
    pub sprites: BTreeMap<String, SpriteEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetMetadata {
    pub png: String,
    pub sprite_width: u32,
    pub sprite_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteEntry {
    pub ids: Vec<u32>,
    pub scale: f64,
    pub anchor: Anchor,
    #[serde(default, skip_serializing_if = "is_false")]
    pub no_rotate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_time: Option<u32>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

pub const MANIFEST_VERSION: u32 = 1;

/// Builds the output manifest for `airframes` given the id assignment from
/// [`assign_sprite_ids`]. Aliases contribute no sprite entry of their own,
/// only an `airframeToSprite` mapping.
pub fn build_manifest(
    airframes: &[Airframe],
    slots: &[SpriteSlot],
    layout: &SheetLayout,
    png: &str,
) -> SheetManifest {
    let ids_by_src: HashMap<&str, u32> = slots
        .iter()
        .map(|s| (s.src.as_str(), s.sprite_id))
        .collect();

    let mut airframe_to_sprite = BTreeMap::new();
    let mut sprites = BTreeMap::new();

    for af in airframes {
        let designator = af.icao.designator.clone();

        if let Some(target) = &af.alias_of {
            airframe_to_sprite.insert(designator, target.clone());
            continue;
        }
        airframe_to_sprite.insert(designator.clone(), designator.clone());

        let ids: Vec<u32> = af
            .art
            .frames
            .iter()
            .filter_map(|f| ids_by_src.get(f.src.as_str()).copied())
            .collect();

        sprites.insert(
            designator,
            SpriteEntry {
                ids,
                scale: af.render.scale,
                anchor: af.render.anchor,
                no_rotate: af.render.no_rotate,
                frame_time: (af.art.frame_time > 0).then_some(af.art.frame_time),
            },
        );
    }

    SheetManifest {
        version: MANIFEST_VERSION,
        metadata: SheetMetadata {
            png: png.to_string(),
            sprite_width: layout.frame_width,
            sprite_height: layout.frame_height,
        },
        airframe_to_sprite,
        sprites,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airframe::{Art, Frame, Icao, RenderSpec};

    fn airframe(designator: &str, alias_of: Option<&str>, srcs: &[&str]) -> Airframe {
        Airframe {
            version: 1,
            icao: Icao {
                designator: designator.to_string(),
                type_code: "L2J".to_string(),
                wake_category: "M".to_string(),
            },
            alias_of: alias_of.map(String::from),
            render: RenderSpec {
                scale: 1.0,
                anchor: Anchor { x: 36, y: 36 },
                no_rotate: false,
            },
            art: Art {
                frames: srcs.iter().map(|s| Frame { src: s.to_string() }).collect(),
                frame_time: 0,
            },
            notes: String::new(),
        }
    }

    #[test]
    fn test_top_left_row_major() {
        let layout = SheetLayout::standard(360); // 5 columns of 72px
        assert_eq!(layout.columns().unwrap(), 5);
        assert_eq!(layout.top_left(0).unwrap(), (0, 0));
        assert_eq!(layout.top_left(4).unwrap(), (288, 0));
        assert_eq!(layout.top_left(5).unwrap(), (0, 72));
        assert_eq!(layout.top_left(12).unwrap(), (144, 144));
    }

    #[test]
    fn test_top_left_with_margin_and_padding() {
        let layout = SheetLayout {
            sheet_width: 100,
            frame_width: 20,
            frame_height: 10,
            margin: 5,
            padding: 2,
        };
        // usable = 90, cols = 92 / 22 = 4
        assert_eq!(layout.columns().unwrap(), 4);
        assert_eq!(layout.top_left(0).unwrap(), (5, 5));
        assert_eq!(layout.top_left(1).unwrap(), (27, 5));
        assert_eq!(layout.top_left(4).unwrap(), (5, 17));
    }

    #[test]
    fn test_layout_errors() {
        assert!(matches!(
            SheetLayout::standard(0).columns(),
            Err(SheetError::BadDimensions)
        ));
        let tight = SheetLayout {
            sheet_width: 10,
            frame_width: 20,
            frame_height: 20,
            margin: 5,
            padding: 0,
        };
        assert!(matches!(tight.columns(), Err(SheetError::MarginTooLarge)));
        let narrow = SheetLayout {
            sheet_width: 10,
            frame_width: 20,
            frame_height: 20,
            margin: 0,
            padding: 0,
        };
        assert!(matches!(narrow.columns(), Err(SheetError::NoColumns)));
    }

    #[test]
    fn test_rows_for() {
        let layout = SheetLayout::standard(360);
        assert_eq!(layout.rows_for(0).unwrap(), 0);
        assert_eq!(layout.rows_for(5).unwrap(), 1);
        assert_eq!(layout.rows_for(6).unwrap(), 2);
    }

    #[test]
    fn test_assign_sprite_ids_dedups_by_src() {
        let frames = [
            airframe("A320", None, &["svg/a320.svg"]),
            airframe("B744", None, &["svg/b744.svg", "svg/a320.svg"]),
        ];
        let slots = assign_sprite_ids(&frames, 10);
        assert_eq!(
            slots,
            vec![
                SpriteSlot { src: "svg/a320.svg".to_string(), sprite_id: 10 },
                SpriteSlot { src: "svg/b744.svg".to_string(), sprite_id: 11 },
            ]
        );
    }

    #[test]
    fn test_build_manifest_aliases_and_shared_ids() {
        let frames = [
            airframe("A320", None, &["svg/a320.svg"]),
            airframe("A321", Some("A320"), &[]),
            airframe("B744", None, &["svg/b744.svg", "svg/a320.svg"]),
        ];
        let layout = SheetLayout::standard(360);
        let slots = assign_sprite_ids(&frames, 0);
        let manifest = build_manifest(&frames, &slots, &layout, "sprites.png");

        assert_eq!(manifest.version, MANIFEST_VERSION);
        assert_eq!(manifest.metadata.sprite_width, SPRITE_WIDTH);
        assert_eq!(manifest.airframe_to_sprite["A321"], "A320");
        assert_eq!(manifest.airframe_to_sprite["A320"], "A320");
        assert!(!manifest.sprites.contains_key("A321"));
        assert_eq!(manifest.sprites["A320"].ids, vec![0]);
        assert_eq!(manifest.sprites["B744"].ids, vec![1, 0]);
    }

    #[test]
    fn test_manifest_json_field_names() {
        let frames = [airframe("A320", None, &["svg/a320.svg"])];
        let slots = assign_sprite_ids(&frames, 0);
        let manifest = build_manifest(&frames, &slots, &SheetLayout::standard(360), "sprites.png");

        let json = serde_json::to_value(&manifest).unwrap();
        assert!(json.get("airframeToSprite").is_some());
        assert_eq!(json["metadata"]["spriteWidth"], 72);
        // noRotate=false and absent frameTime are omitted
        assert!(json["sprites"]["A320"].get("noRotate").is_none());
        assert!(json["sprites"]["A320"].get("frameTime").is_none());
    }
}
