pub mod hex;
pub mod layout;
pub mod shape;
pub mod tile;

use crate::{
    config::GridConfig,
    grid::{
        hex::{CubePoint, CubePointIndexMap, TileDirection},
        layout::{Layout, PixelBounds},
        shape::build_shape,
        tile::Tile,
    },
    timed, Point2, Vector2,
};
use anyhow::Context;
use log::{debug, info, trace, warn};
use nalgebra::{Isometry2, Matrix3};
use std::{f64::consts::TAU, fmt};
use validator::Validate;

/// A hexagonal grid of tiles. The grid owns every [Tile], the [Layout] that
/// positions them in pixel space, and the view rotation applied on top of the
/// layout.
///
/// ## Pixel Spaces
///
/// There are two pixel spaces in play:
///
/// - **Anchor space** is where [Layout] puts each tile. It's unrotated, and
///   the origin tile's anchor is at `(0, 0)`, so anchors can be negative.
/// - **Screen space** is what gets drawn into the canvas. A tile's anchor is
///   rotated about the center of the tile bounds, then shifted by the
///   centering offset so the tiles sit in the middle of the canvas.
///
/// [Self::rendered_position] goes from anchor space to screen space, and
/// [Self::pick] goes the other way.
///
/// ## Rotation
///
/// Rotation is purely a view parameter. Rotating the grid never changes which
/// tiles exist, their positions or their anchors, only where they get drawn
/// and which tile a screen position picks.
pub struct HexGrid {
    /// The config used to build this grid. Once the grid has been built, the
    /// config can never change (the viewport is tracked separately).
    config: GridConfig,

    layout: Layout,

    /// The tiles that make up this grid, keyed by their position. Ordered so
    /// that iteration (and everything derived from it) is deterministic.
    tiles: CubePointIndexMap<Tile>,

    /// Tightest bounds covering every tile footprint, in anchor space
    tile_bounds: PixelBounds,

    /// The size of the viewport this grid is displayed in
    viewport: Vector2,

    /// Larger of the tile bounds size and the viewport size
    canvas_size: Vector2,

    /// Offset that centers the tile bounds inside the canvas. Computed by
    /// [Self::arrange] and reused until the next arrangement.
    centering_offset: Vector2,

    /// View rotation, in radians. Always in `[0, 2π)`.
    rotation: f64,

    /// Callbacks to invoke after the rotation changes, in registration order
    rotation_observers: Vec<(ObserverId, Box<dyn FnMut(&RotationChange)>)>,
    next_observer_id: u64,
}

impl HexGrid {
    /// Build a new grid from a config. Returns an error if the config is
    /// invalid. If validation fails, the underlying error is
    /// [validator::ValidationErrors], which can be recovered with
    /// [anyhow::Error::downcast].
    pub fn new(config: GridConfig) -> anyhow::Result<Self> {
        info!("Building grid with config {:?}", config);
        config.validate().context("invalid grid config")?;

        let layout = Layout::new(config.footprint);
        let half_footprint = layout.half_footprint();
        let tiles: CubePointIndexMap<Tile> = timed!("Grid construction", {
            let points =
                build_shape(config.shape, config.size, config.secondary_size)?;
            points
                .into_iter()
                .map(|axial| {
                    let position = CubePoint::from_axial(axial);
                    let anchor = layout.point_to_pixel(position);
                    (position, Tile::new(position, anchor, half_footprint))
                })
                .collect()
        });
        let tile_bounds = PixelBounds::covering(
            tiles.values().map(Tile::anchor),
            config.footprint.size(),
        );
        info!(
            "Built {} grid with {} tiles, bounds {}",
            config.shape,
            tiles.len(),
            tile_bounds
        );

        let mut grid = Self {
            config,
            layout,
            tiles,
            tile_bounds,
            viewport: config.viewport(),
            canvas_size: Vector2::ZERO,
            centering_offset: Vector2::ZERO,
            rotation: 0.0,
            rotation_observers: Vec::new(),
            next_observer_id: 0,
        };
        grid.arrange(config.viewport());
        Ok(grid)
    }

    /// Get a reference to the config that defines this grid
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Get a reference to the map of tiles that make up this grid
    pub fn tiles(&self) -> &CubePointIndexMap<Tile> {
        &self.tiles
    }

    /// Number of tiles in the grid
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always false for a successfully built grid, since board sizes must be
    /// positive
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Does a tile exist at this position?
    pub fn contains(&self, position: CubePoint) -> bool {
        self.tiles.contains_key(&position)
    }

    /// Get the tile at a position, or `None` if it's off the board
    pub fn tile(&self, position: CubePoint) -> Option<&Tile> {
        self.tiles.get(&position)
    }

    /// Get a mutable reference to the tile at a position, to change its
    /// terrain, elevation or highlight
    pub fn tile_mut(&mut self, position: CubePoint) -> Option<&mut Tile> {
        self.tiles.get_mut(&position)
    }

    /// Get the tile adjacent to a position in a particular direction, or
    /// `None` if that's off the board
    pub fn neighbor(
        &self,
        position: CubePoint,
        direction: TileDirection,
    ) -> Option<&Tile> {
        self.tile(position.adjacent(direction))
    }

    /// Get all the tiles adjacent to a position, in clockwise order. Adjacent
    /// positions that are off the board are skipped.
    pub fn neighbors(
        &self,
        position: CubePoint,
    ) -> impl Iterator<Item = &Tile> + '_ {
        position.adjacents().filter_map(move |adj| self.tile(adj))
    }

    /// Tightest bounds covering every tile footprint, in anchor space
    pub fn tile_bounds(&self) -> PixelBounds {
        self.tile_bounds
    }

    /// The size of the viewport the grid was last arranged for
    pub fn viewport(&self) -> Vector2 {
        self.viewport
    }

    /// The working canvas size. This is the component-wise max of the tile
    /// bounds and the viewport, so a small board never shrinks below the
    /// viewport and a large board is never clipped.
    pub fn canvas_size(&self) -> Vector2 {
        self.canvas_size
    }

    /// The offset that centers the tile bounds inside the canvas
    pub fn centering_offset(&self) -> Vector2 {
        self.centering_offset
    }

    /// Recompute the canvas size and centering offset for a viewport. Call
    /// this whenever the viewport is resized. Tiles are not affected.
    pub fn arrange(&mut self, viewport: Vector2) {
        let tile_size = self.tile_bounds.size();
        self.viewport = viewport;
        self.canvas_size = tile_size.max(viewport);
        // Center the tile bounds in the canvas, then shift so the bounds'
        // minimum corner (which may be negative) lands there
        self.centering_offset = (self.canvas_size - tile_size) / 2.0
            - self.tile_bounds.min.to_vector();
        debug!(
            "Arranged grid in viewport {}: canvas {}, centering offset {}",
            viewport, self.canvas_size, self.centering_offset
        );
    }

    /// Current view rotation in radians, in `[0, 2π)`
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Rotate the view by some number of degrees (positive is clockwise on
    /// screen). Observers are notified before this returns.
    pub fn rotate_degrees(&mut self, degrees: f64) -> RotationChange {
        self.set_rotation(self.rotation + degrees.to_radians())
    }

    /// Set the view rotation to an absolute angle in radians. The angle is
    /// wrapped into `[0, 2π)`. A NaN or infinite angle leaves the rotation
    /// where it was. Observers are notified before this returns, even if the
    /// angle didn't actually change.
    pub fn set_rotation(&mut self, radians: f64) -> RotationChange {
        let current = if radians.is_finite() {
            radians.rem_euclid(TAU)
        } else {
            warn!("Ignoring non-finite rotation {}", radians);
            self.rotation
        };
        let change = RotationChange {
            previous: self.rotation,
            current,
        };
        self.rotation = change.current;
        debug!(
            "Rotated grid from {:.4} to {:.4} rad",
            change.previous, change.current
        );
        for (_, observer) in &mut self.rotation_observers {
            observer(&change);
        }
        change
    }

    /// Register a callback to be invoked synchronously every time the
    /// rotation changes. Observers are invoked in registration order. Returns
    /// an ID that can be used to remove the observer later.
    pub fn on_rotate(
        &mut self,
        observer: impl FnMut(&RotationChange) + 'static,
    ) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.rotation_observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a rotation observer. Returns `false` if there was no observer
    /// with that ID.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let len_before = self.rotation_observers.len();
        self.rotation_observers
            .retain(|(observer_id, _)| *observer_id != id);
        self.rotation_observers.len() != len_before
    }

    /// The view rotation as a transform on anchor space: translate the center
    /// of the tile bounds to the origin, rotate, then translate back.
    pub fn transform(&self) -> Isometry2<f64> {
        let center = self.tile_bounds.center();
        Isometry2::translation(center.x, center.y)
            * Isometry2::rotation(self.rotation)
            * Isometry2::translation(-center.x, -center.y)
    }

    /// [Self::transform] as a homogeneous 3x3 matrix, for renderers that want
    /// to apply it to tile sprites directly. Note that this does **not**
    /// include the centering offset.
    pub fn transform_matrix(&self) -> Matrix3<f64> {
        self.transform().to_homogeneous()
    }

    /// Map a point from anchor space to screen space
    pub fn to_screen(&self, point: Point2) -> Point2 {
        let rotated: Point2 =
            self.transform().transform_point(&point.into()).into();
        rotated + self.centering_offset
    }

    /// Map a point from screen space back to anchor space. This is the exact
    /// inverse of [Self::to_screen].
    pub fn from_screen(&self, point: Point2) -> Point2 {
        let uncentered = point - self.centering_offset;
        self.transform()
            .inverse_transform_point(&uncentered.into())
            .into()
    }

    /// Get the screen position of a tile's anchor, or `None` if there's no
    /// tile at that position
    pub fn rendered_position(&self, position: CubePoint) -> Option<Point2> {
        self.tile(position).map(|tile| self.to_screen(tile.anchor()))
    }

    /// Get the screen position of a tile's center, or `None` if there's no
    /// tile at that position
    pub fn rendered_center(&self, position: CubePoint) -> Option<Point2> {
        self.tile(position).map(|tile| self.to_screen(tile.center()))
    }

    /// Find the cell under a screen position. The returned cell isn't
    /// necessarily on the board, use [Self::pick] if you only want tiles.
    pub fn pick_point(&self, screen_position: Point2) -> CubePoint {
        self.layout.pixel_to_point(self.from_screen(screen_position))
    }

    /// Find the tile under a screen position. Returns `None` if the position
    /// is outside the canvas or there's no tile there. This is expected to
    /// happen constantly as the mouse moves around, so it's not an error.
    pub fn pick(&self, screen_position: Point2) -> Option<&Tile> {
        let canvas = PixelBounds {
            min: Point2::ORIGIN,
            max: Point2::ORIGIN + self.canvas_size,
        };
        if !canvas.contains(screen_position) {
            trace!("Pick at {} is outside the canvas", screen_position);
            return None;
        }
        let point = self.pick_point(screen_position);
        trace!("Picked {} at {}", point, screen_position);
        self.tile(point)
    }
}

impl fmt::Debug for HexGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HexGrid")
            .field("config", &self.config)
            .field("tiles", &self.tiles.len())
            .field("tile_bounds", &self.tile_bounds)
            .field("viewport", &self.viewport)
            .field("canvas_size", &self.canvas_size)
            .field("centering_offset", &self.centering_offset)
            .field("rotation", &self.rotation)
            .field("rotation_observers", &self.rotation_observers.len())
            .finish()
    }
}

/// Identifies a registered rotation observer. See [HexGrid::on_rotate].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Describes a change to a grid's view rotation. Returned from the rotation
/// methods and passed to every observer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RotationChange {
    /// Rotation before the change, in radians
    pub previous: f64,
    /// Rotation after the change, in radians
    pub current: f64,
}
