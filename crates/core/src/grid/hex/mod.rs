//! This module holds basic types and data structures related to hexagon grids.
//!
//! ## Coordinate Systems
//!
//! Hexfield uses three coordinate systems:
//!
//! ### Cube Coordinates
//!
//! Cube coordinates define cells within the grid. The system is the [cube
//! coordinate system defined by Amit Patel](https://www.redblobgames.com/grids/hexagons/#coordinates-cube),
//! using "pointy topped" tiles.
//!
//! Each coordinate has three components (`x`, `y`, and `z`). **For any cell,
//! all three components are integers and `x + y + z = 0`.** Even though a hex
//! grid only has two dimensions, the third component makes the math around
//! distances, rotation and rounding symmetric, which is much simpler than the
//! alternatives. [CubePoint] only stores two components and derives the third,
//! so the invariant can never be broken.
//!
//! Fractional positions (e.g. points along a line between two cells, or a
//! mouse position converted back into grid space) are [FractionalPoint]s.
//! They live on the same plane but have real components, and must be rounded
//! with [FractionalPoint::round] to land on a cell.
//!
//! ### Axial Coordinates
//!
//! Axial coordinates are a two-component projection of cube coordinates:
//! `q = x` and `r = z`. They're the compact form used to enumerate board
//! shapes. Converting between the two is lossless, see [AxialPoint].
//!
//! ### Pixel Coordinates
//!
//! Pixel coordinates place each tile in 2D world space so it can be drawn or
//! picked with the mouse. The origin is the top-left of the canvas, `+x` is
//! right and `+y` is down. The mapping between cube and pixel space is defined
//! by [Layout](crate::Layout), and the grid's view rotation is applied on top
//! of that by [HexGrid](crate::HexGrid).
//!
//! ```text
//!        NW    NE
//!          \  /
//!    W ---- o ---- E
//!          /  \
//!        SW    SE
//! ```
//!
//! In pixel space, each of the six [TileDirection]s points from a tile's
//! center through the middle of one of its sides, as shown above.

mod data_structure;
mod unit;

pub use self::{data_structure::*, unit::*};
