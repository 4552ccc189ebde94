use crate::{grid::shape::GridShape, Vector2};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Configuration that defines a grid: which cells exist, how big each tile is
/// on screen, and the viewport the grid is displayed in. Two grids built from
/// the same config are always identical.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_secondary_size"))]
#[serde(default)]
pub struct GridConfig {
    /// The shape of the board. See [GridShape] for how each shape is
    /// enumerated.
    pub shape: GridShape,

    /// The primary size parameter of the board, `n`. For a hexagon this is
    /// the radius, for a line it's the distance from the center to either
    /// end, etc.
    #[validate(range(min = 1, max = 10000))]
    pub size: u16,

    /// The secondary size parameter of the board, `m`. Only used by
    /// parallelograms and rectangles (see [GridShape::is_two_dimensional]),
    /// for which it must be positive. Ignored by every other shape.
    #[validate(range(max = 10000))]
    pub secondary_size: u16,

    /// Width of the viewport the grid is displayed in, in pixels. The grid's
    /// canvas is never smaller than the viewport.
    #[validate(range(min = 0.0))]
    pub viewport_width: f64,

    /// Height of the viewport the grid is displayed in, in pixels
    #[validate(range(min = 0.0))]
    pub viewport_height: f64,

    /// Pixel footprint of a single tile, plus the tuned layout constants that
    /// go with it. Must stay the last field, TOML requires tables to come
    /// after plain values.
    #[validate]
    pub footprint: TileFootprint,
}

impl GridConfig {
    /// Viewport dimensions as a vector
    pub fn viewport(&self) -> Vector2 {
        Vector2::new(self.viewport_width, self.viewport_height)
    }
}

/// Footprint of a single tile's art, in pixels, along with the constants that
/// are tuned to that art. The tuned values are an intrinsic property of the
/// tile images (they compensate for the border pixels that neighbouring tiles
/// overlap on), so they can't be derived from the width and height alone. If
/// you change the art, re-tune them.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TileFootprint {
    /// Width of the tile art. For pointy-top tiles, this is the distance
    /// between two opposite sides.
    #[validate(range(min = 1.0))]
    pub width: f64,

    /// Height of the tile art. For pointy-top tiles, this is the distance
    /// between the top and bottom vertices.
    #[validate(range(min = 1.0))]
    pub height: f64,

    /// Horizontal "adjusted size" divisor. Horizontally adjacent tiles are
    /// `√3 * adjusted_size_x` pixels apart.
    #[validate(range(min = 0.001))]
    pub adjusted_size_x: f64,

    /// Vertical "adjusted size" divisor. Rows are `1.5 * adjusted_size_y`
    /// pixels apart.
    #[validate(range(min = 0.001))]
    pub adjusted_size_y: f64,

    /// Horizontal skew applied while picking, after the picked position has
    /// been mapped back into tile space. Compensates for anchor positions
    /// being rounded to whole pixels.
    pub pick_skew_x: f64,

    /// Vertical counterpart of [Self::pick_skew_x]
    pub pick_skew_y: f64,
}

impl TileFootprint {
    /// Tile art dimensions as a vector
    pub fn size(&self) -> Vector2 {
        Vector2::new(self.width, self.height)
    }

    /// Picking skew as a vector
    pub fn pick_skew(&self) -> Vector2 {
        Vector2::new(self.pick_skew_x, self.pick_skew_y)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            shape: GridShape::Hexagon,
            size: 8,
            secondary_size: 0,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            footprint: TileFootprint::default(),
        }
    }
}

impl Default for TileFootprint {
    fn default() -> Self {
        // Tuned for 56x64 pointy-top art with a one pixel shared border
        Self {
            width: 56.0,
            height: 64.0,
            adjusted_size_x: 32.0,
            adjusted_size_y: 32.0,
            pick_skew_x: 0.5,
            pick_skew_y: 0.5,
        }
    }
}

/// Two-dimensional shapes need a positive secondary size
fn validate_secondary_size(config: &GridConfig) -> Result<(), ValidationError> {
    if config.shape.is_two_dimensional() && config.secondary_size == 0 {
        let mut error = ValidationError::new("secondary_size");
        let message = format!("{} boards need a secondary size", config.shape);
        error.message = Some(message.into());
        Err(error)
    } else {
        Ok(())
    }
}
