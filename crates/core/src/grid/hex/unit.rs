//! This sub-module contains basic types for units that form the hex coordinate
//! system. See the parent module documentation for more info on the coordinate
//! system.

use anyhow::{anyhow, bail, Context};
use derive_more::{Add, AddAssign, Display, Mul, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};
use std::{cmp, convert::TryFrom, ops, str::FromStr};
use strum::{EnumIter, IntoEnumIterator};

/// A point in the hex coordinate system that refers to a whole cell (via its
/// center point). See module-level documentation for a description of the
/// coordinate system.
///
/// ## Implementation
///
/// Every cell satisfies `x + y + z = 0`, so this struct only needs to store `x`
/// and `y` and can derive `z` as needed. That makes it impossible to construct
/// a point that violates the invariant, and cuts the memory footprint by a
/// third.
///
/// The x and y coordinates are stored as `i16`s. We'll never have a board with
/// a radius of more than 32k (that'd be ~3 billion tiles), so this saves on
/// a lot of memory.
///
/// Points (de)serialize in their axial form, `{"q": .., "r": ..}`.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Neg,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {}, {})", "self.x()", "self.y()", "self.z()")]
#[serde(into = "AxialPoint", from = "AxialPoint")]
pub struct CubePoint {
    x: i16,
    y: i16,
}

impl CubePoint {
    pub const ORIGIN: Self = Self::new_xy(0, 0);

    /// Construct a new cube point with the given x and y. Since x+y+z=0 for all
    /// points, we can derive z from x & y.
    pub const fn new_xy(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Construct a new cube point with the given x and z. Since x+y+z=0 for all
    /// points, we can derive y from x & z.
    pub const fn new_xz(x: i16, z: i16) -> Self {
        Self::new_xy(x, -x - z)
    }

    /// Construct a new cube point with the given y and z. Since x+y+z=0 for all
    /// points, we can derive x from y & z.
    pub const fn new_yz(y: i16, z: i16) -> Self {
        Self::new_xy(-y - z, y)
    }

    /// Construct a point from all three components. Returns an error if the
    /// components don't fall on the plane `x + y + z = 0`.
    pub fn try_new(x: i16, y: i16, z: i16) -> anyhow::Result<Self> {
        // i32 so that extreme components can't overflow while we check them
        if x as i32 + y as i32 + z as i32 != 0 {
            Err(anyhow!(
                "Invalid cube point ({}, {}, {}); must be on the plane x+y+z=0",
                x,
                y,
                z
            ))
        } else {
            Ok(Self::new_xy(x, y))
        }
    }

    /// Round real-valued cube components to the nearest cell. See
    /// [FractionalPoint::round].
    pub fn round(x: f64, y: f64, z: f64) -> Self {
        FractionalPoint::new(x, y, z).round()
    }

    /// Convert from axial coordinates. This is exact: `x = q`, `z = r`.
    pub const fn from_axial(axial: AxialPoint) -> Self {
        Self::new_xz(axial.q, axial.r)
    }

    /// Convert to axial coordinates. This is exact: `q = x`, `r = z`.
    pub const fn to_axial(self) -> AxialPoint {
        AxialPoint::new(self.x, -self.x - self.y)
    }

    pub const fn x(self) -> i16 {
        self.x
    }

    pub const fn y(self) -> i16 {
        self.y
    }

    pub const fn z(self) -> i16 {
        -(self.x + self.y)
    }

    /// Convert to a real-valued point at the exact center of this cell
    pub fn to_fractional(self) -> FractionalPoint {
        FractionalPoint::new(self.x().into(), self.y().into(), self.z().into())
    }

    /// Get the location of the cell adjacent to this one in a particular
    /// direction. The returned cell isn't necessarily on any board.
    pub fn adjacent(self, direction: TileDirection) -> Self {
        self + direction.to_vector()
    }

    /// Get an iterator of all the cells directly adjacent to this one. The
    /// iterator will always contain exactly 6 values, in clockwise order
    /// starting at [TileDirection::NE].
    pub fn adjacents(self) -> impl Iterator<Item = Self> {
        TileDirection::iter().map(move |dir| self.adjacent(dir))
    }

    /// Calculate the path distance between two cells, meaning the number of
    /// hops it takes to get from one to the other. 0 if the points are equal,
    /// 1 if the cells are adjacent, 2 if there is 1 cell between them, etc.
    pub fn distance_to(self, other: Self) -> usize {
        // https://www.redblobgames.com/grids/hexagons/#distances
        // i32 because the difference of two i16s can overflow an i16
        let dx = (self.x() as i32 - other.x() as i32).abs();
        let dy = (self.y() as i32 - other.y() as i32).abs();
        let dz = (self.z() as i32 - other.z() as i32).abs();
        // IMPORTANT: We divide by 2 here because each hop between adjacent
        // cells changes two of the three components by one
        ((dx + dy + dz) / 2) as usize
    }

    /// Rotate this point one 60° step clockwise (in pixel space) about the
    /// origin. This is just a permutation and negation of the components, so
    /// rotating six times gets you back to where you started.
    pub const fn rotate(self) -> Self {
        // (x, y, z) -> (-z, -x, -y)
        Self::new_xy(-self.z(), -self.x)
    }

    /// Get every cell at exactly `radius` hops from this one, in clockwise
    /// order starting from the cell `radius` steps to the west. Radius 0 is
    /// just this cell.
    pub fn ring(self, radius: u16) -> Vec<Self> {
        if radius == 0 {
            return vec![self];
        }

        let radius = radius as i16;
        let mut ring = Vec::with_capacity(6 * radius as usize);
        // Start at the west corner then walk each of the six sides. Walking
        // the directions in clockwise order takes us around the ring and back
        // to the start
        let mut cell = self + TileDirection::W.to_vector() * radius;
        for direction in TileDirection::iter() {
            for _ in 0..radius {
                ring.push(cell);
                cell = cell.adjacent(direction);
            }
        }
        ring
    }

    /// Get an iterator of every cell within `radius` hops of this one,
    /// including this one. The iterator yields `3r²+3r+1` cells.
    pub fn range(self, radius: u16) -> impl Iterator<Item = Self> {
        let r = radius as i16;
        (-r..=r).flat_map(move |dx| {
            // If we just do [-r,r] for dy as well, then we end up with a
            // diamond pattern instead of a hexagon
            // https://www.redblobgames.com/grids/hexagons/#range
            let dy_min = cmp::max(-r, -dx - r);
            let dy_max = cmp::min(r, -dx + r);
            (dy_min..=dy_max)
                .map(move |dy| self + HexVector::new(dx, dy))
        })
    }
}

impl ops::Add<HexVector> for CubePoint {
    type Output = CubePoint;

    fn add(self, rhs: HexVector) -> Self::Output {
        Self::new_xy(self.x + rhs.x(), self.y + rhs.y())
    }
}

impl ops::Sub<HexVector> for CubePoint {
    type Output = CubePoint;

    fn sub(self, rhs: HexVector) -> Self::Output {
        Self::new_xy(self.x - rhs.x(), self.y - rhs.y())
    }
}

impl From<AxialPoint> for CubePoint {
    fn from(axial: AxialPoint) -> Self {
        Self::from_axial(axial)
    }
}

/// A two-component projection of a [CubePoint], where `q = x` and `r = z`.
/// Board shapes are enumerated in axial coordinates because it's more compact,
/// but everything else uses cube coordinates.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", q, r)]
pub struct AxialPoint {
    pub q: i16,
    pub r: i16,
}

impl AxialPoint {
    pub const fn new(q: i16, r: i16) -> Self {
        Self { q, r }
    }
}

impl From<CubePoint> for AxialPoint {
    fn from(point: CubePoint) -> Self {
        point.to_axial()
    }
}

/// Parse an axial point from a string like `"q,r"`. Whitespace around either
/// component is ignored.
impl FromStr for AxialPoint {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |name: &str, component: &str| -> anyhow::Result<i16> {
            component.trim().parse().with_context(|| {
                format!("invalid {} component in {:?}", name, s)
            })
        };
        let mut components = s.split(',');
        match (components.next(), components.next(), components.next()) {
            (Some(q), Some(r), None) => {
                Ok(Self::new(parse("q", q)?, parse("r", r)?))
            }
            _ => bail!("expected axial point as \"q,r\", got {:?}", s),
        }
    }
}

/// A real-valued point on the plane `x + y + z = 0`. Used for intermediate
/// values, e.g. interpolating along a line between two cells or mapping a
/// pixel position back into grid space. Convert to a cell with
/// [FractionalPoint::round].
///
/// The components are only _approximately_ zero-sum, because of floating
/// point error. That's fine, rounding doesn't depend on the sum.
#[derive(Copy, Clone, Debug, PartialEq, Display, Add, Sub, Mul)]
#[display(fmt = "({}, {}, {})", x, y, z)]
pub struct FractionalPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl FractionalPoint {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Construct from fractional axial components
    pub fn from_axial(q: f64, r: f64) -> Self {
        Self::new(q, -q - r, r)
    }

    /// Linear interpolation between `a` and `b`, on each axis independently.
    /// `t = 0` is `a`, `t = 1` is `b`.
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        a + (b - a) * t
    }

    /// Snap this point to the nearest cell.
    ///
    /// Each component is rounded independently, which usually breaks the
    /// zero-sum invariant. To restore it, we throw away the rounded component
    /// that moved the furthest and recompute it from the other two. That
    /// minimizes the total rounding error.
    /// https://www.redblobgames.com/grids/hexagons/#rounding
    pub fn round(self) -> CubePoint {
        let mut rx = self.x.round();
        let mut ry = self.y.round();
        let mut rz = self.z.round();

        let dx = (rx - self.x).abs();
        let dy = (ry - self.y).abs();
        let dz = (rz - self.z).abs();

        if dx > dy && dx > dz {
            rx = -ry - rz;
        } else if dy > dz {
            ry = -rx - rz;
        } else {
            rz = -rx - ry;
        }
        debug_assert_eq!(rx + ry + rz, 0.0, "rounded point must be zero-sum");

        CubePoint::new_xy(rx as i16, ry as i16)
    }
}

/// A vector in a hex grid. This is an (x,y,z) kind of vector, not a list
/// vector. This is essentially the same as a [CubePoint], but by denoting some
/// values explicitly as vectors rather than points, it's a bit clearer when
/// shifting points around. Like [CubePoint], x+y+z will always equal 0 for all
/// vectors.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Display, Add, Neg, Mul,
)]
#[display(fmt = "({}, {}, {})", "self.x()", "self.y()", "self.z()")]
pub struct HexVector {
    x: i16,
    y: i16,
}

impl HexVector {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    pub const fn x(self) -> i16 {
        self.x
    }

    pub const fn y(self) -> i16 {
        self.y
    }

    pub const fn z(self) -> i16 {
        -(self.x + self.y)
    }
}

/// The 6 directions in which hexes can line up side-to-side. For any given
/// cell, a tile direction represents both:
///
/// - Direction from the center to the midpoint of a single side of that cell
/// - Direction to a neighboring cell's center
///
/// Variants are declared in clockwise order (in pixel space) starting at
/// northeast, and iteration always follows that order.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    EnumIter,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TileDirection {
    /// Northeast
    NE,
    /// East
    E,
    /// Southeast
    SE,
    /// Southwest
    SW,
    /// West
    W,
    /// Northwest
    NW,
}

impl TileDirection {
    /// All directions, in clockwise order starting at northeast
    pub const CLOCKWISE: [Self; 6] =
        [Self::NE, Self::E, Self::SE, Self::SW, Self::W, Self::NW];

    /// Get the index of this direction within [Self::CLOCKWISE]
    pub fn index(self) -> usize {
        match self {
            Self::NE => 0,
            Self::E => 1,
            Self::SE => 2,
            Self::SW => 3,
            Self::W => 4,
            Self::NW => 5,
        }
    }

    /// Get an vector offset that would move a point one cell in this direction
    pub const fn to_vector(self) -> HexVector {
        match self {
            Self::NE => HexVector::new(1, 0),
            Self::E => HexVector::new(1, -1),
            Self::SE => HexVector::new(0, -1),
            Self::SW => HexVector::new(-1, 0),
            Self::W => HexVector::new(-1, 1),
            Self::NW => HexVector::new(0, 1),
        }
    }

    /// Get the direction that is directly opposite this one. The vectors of
    /// opposite directions are always negatives of each other.
    pub fn opposite(self) -> Self {
        Self::CLOCKWISE[(self.index() + 3) % 6]
    }

    /// Get the next direction clockwise from this one
    pub fn rotate_clockwise(self) -> Self {
        Self::CLOCKWISE[(self.index() + 1) % 6]
    }
}

/// Directions can be addressed by their index in [TileDirection::CLOCKWISE].
/// Anything outside `0..6` isn't a direction, and is rejected.
impl TryFrom<u8> for TileDirection {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::CLOCKWISE.get(value as usize).copied().ok_or_else(|| {
            anyhow!("Invalid tile direction index {}; must be in [0, 6)", value)
        })
    }
}
