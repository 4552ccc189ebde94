//! Hexfield is the core of a hex tile board game: board shapes, the hex
//! coordinate system, screen layout and picking, line of sight, fog of war and
//! movement pathfinding. It doesn't render anything or know anything about
//! game rules. Terrain and occupancy semantics come in through predicates
//! supplied by the caller.
//!
//! ```
//! use hexfield::{
//!     compute_fog_of_war, find_path, CubePoint, GridConfig, HexGrid,
//!     MovementCost, Point2,
//! };
//!
//! let mut grid = HexGrid::new(GridConfig::default()).unwrap();
//! let unit = CubePoint::new_xz(-4, 0);
//!
//! // Find the tile under the mouse cursor, if there is one
//! let hovered = grid
//!     .pick(Point2::new(640.0, 200.0))
//!     .map(|tile| tile.position());
//!
//! // Rotating the view changes picking, but not the tiles themselves
//! grid.rotate_degrees(30.0);
//!
//! let fog = compute_fog_of_war(&grid, unit, 5, |_| true).unwrap();
//! let path = find_path(
//!     &grid,
//!     unit,
//!     CubePoint::new_xz(4, 0),
//!     MovementCost(6.0),
//!     |_| false,
//!     |point| fog.is_visible(point),
//! )
//! .unwrap();
//! println!("{:?} {:?}", hovered, path.furthest_affordable());
//! ```
//!
//! See [GridConfig] for details on how the grid can be customized.

mod config;
pub mod grid;
pub mod query;
mod util;

pub use crate::{
    config::{GridConfig, TileFootprint},
    grid::{
        hex::{
            AxialPoint, AxialPointIndexSet, CubePoint, CubePointIndexMap,
            CubePointMap, CubePointSet, FractionalPoint, HexVector,
            TileDirection,
        },
        layout::{Layout, PixelBounds},
        shape::{
            build_shape, GridShape, HEXAGON_DONUT_HOLE, MAX_BOARD_SIZE,
        },
        tile::{Terrain, Tile},
        HexGrid, ObserverId, RotationChange,
    },
    query::{
        pathfinding::{find_path, find_path_with_costs, Path, PathStep},
        visibility::{
            compute_fog_of_war, has_line_of_sight, trace_line, FogOfWar,
            LineStep, TIE_BREAK_EPSILON,
        },
    },
    util::{
        hexagon_len,
        unit::{Color3, MovementCost, Point2, Vector2},
    },
};
