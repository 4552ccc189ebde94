use crate::{
    grid::hex::CubePoint, Color3, MovementCost, Point2, Vector2,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A grid is comprised of tiles. Each tile is one hexagonal cell, with a fixed
/// position in cube space and a fixed anchor in pixel space.
///
/// Tiles can't be constructed directly, they're created by
/// [HexGrid::new](crate::HexGrid::new) and owned by the grid. Their position
/// and anchor never change after that, but the owning application is free to
/// change terrain, elevation and highlight at any time via
/// [HexGrid::tile_mut](crate::HexGrid::tile_mut). The grid itself doesn't care
/// about those values, they only matter to whatever predicates the caller
/// builds from them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// The location of this tile in the grid. See [CubePoint] for a
    /// description of the coordinate system. Every tile in a grid has a
    /// unique position.
    position: CubePoint,

    /// The top-left corner of this tile's footprint, in unrotated pixel space.
    /// See [Layout](crate::Layout) for how this is computed.
    anchor: Point2,

    /// Offset from the anchor to the middle of the footprint
    half_footprint: Vector2,

    /// Terrain classification
    terrain: Terrain,

    /// Elevation level, in abstract steps. 0 is the base level.
    elevation: i16,

    /// Optional color override, e.g. for highlighting a selection. `None`
    /// means "draw it however you normally would".
    highlight: Option<Color3>,
}

impl Tile {
    pub(super) fn new(
        position: CubePoint,
        anchor: Point2,
        half_footprint: Vector2,
    ) -> Self {
        Self {
            position,
            anchor,
            half_footprint,
            terrain: Terrain::default(),
            elevation: 0,
            highlight: None,
        }
    }

    pub fn position(&self) -> CubePoint {
        self.position
    }

    /// The top-left corner of this tile's footprint in unrotated pixel space
    pub fn anchor(&self) -> Point2 {
        self.anchor
    }

    /// The middle of this tile's footprint in unrotated pixel space
    pub fn center(&self) -> Point2 {
        self.anchor + self.half_footprint
    }

    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn set_terrain(&mut self, terrain: Terrain) {
        self.terrain = terrain;
    }

    pub fn elevation(&self) -> i16 {
        self.elevation
    }

    pub fn set_elevation(&mut self, elevation: i16) {
        self.elevation = elevation;
    }

    pub fn highlight(&self) -> Option<Color3> {
        self.highlight
    }

    pub fn set_highlight(&mut self, highlight: Option<Color3>) {
        self.highlight = highlight;
    }
}

/// A terrain classification. The grid never looks at these itself, but they
/// come with sensible defaults for movement cost and line of sight that
/// callers can use to build their predicates.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    EnumIter,
    EnumString,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Terrain {
    Plain,
    Forest,
    Hill,
    Water,
    Mountain,
    Wall,
}

impl Default for Terrain {
    fn default() -> Self {
        Self::Plain
    }
}

impl Terrain {
    /// The movement it costs to step onto a tile of this terrain. `None`
    /// means the terrain can't be entered at all.
    pub fn entry_cost(self) -> Option<MovementCost> {
        match self {
            Self::Plain => Some(MovementCost(1.0)),
            Self::Forest | Self::Hill => Some(MovementCost(2.0)),
            Self::Water => Some(MovementCost(3.0)),
            Self::Mountain => Some(MovementCost(4.0)),
            Self::Wall => None,
        }
    }

    /// Does this terrain block line of sight through it?
    pub fn blocks_sight(self) -> bool {
        match self {
            Self::Plain | Self::Hill | Self::Water => false,
            Self::Forest | Self::Mountain | Self::Wall => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_tile_mutation() {
        let mut tile = Tile::new(
            CubePoint::new_xy(1, -1),
            Point2::new(55.0, 0.0),
            Vector2::new(28.0, 32.0),
        );
        assert_eq!(tile.center(), Point2::new(83.0, 32.0));
        assert_eq!(tile.terrain(), Terrain::Plain);

        tile.set_terrain(Terrain::Forest);
        tile.set_elevation(-2);
        tile.set_highlight(Some(Color3::new_int(255, 0, 0)));
        assert_eq!(tile.terrain(), Terrain::Forest);
        assert_eq!(tile.elevation(), -2);
        assert!(tile.highlight().is_some());
        // Identity is untouched
        assert_eq!(tile.position(), CubePoint::new_xy(1, -1));
    }

    #[test]
    fn test_terrain() {
        for terrain in Terrain::iter() {
            // Round trip through the string name
            assert_eq!(
                Terrain::from_str(&terrain.to_string()).unwrap(),
                terrain
            );
        }
        assert_eq!(Terrain::Wall.entry_cost(), None);
        assert_eq!(Terrain::Plain.entry_cost(), Some(MovementCost(1.0)));
        assert!(Terrain::Wall.blocks_sight());
        assert!(!Terrain::Water.blocks_sight());
    }
}
