use anyhow::anyhow;
use derive_more::{
    Add, AddAssign, Display, Div, DivAssign, From, Into, Mul, MulAssign, Neg,
    Sub, SubAssign, Sum,
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, ops};

/// A point in 2D pixel space. This isn't used by any of the grid math itself,
/// only by layout and picking, i.e. the places where the grid meets a renderer
/// or a mouse cursor. Stick to [CubePoint](crate::CubePoint) for distances,
/// visibility, pathfinding, etc.
///
/// ## 2D Coordinates
///
/// The origin is the top-left corner of the canvas. Right is positive x, down
/// is positive y, which is what every windowing system we care about uses.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    PartialOrd,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", x, y)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise minimum of two points
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise maximum of two points
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// The vector from the origin to this point
    pub fn to_vector(self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }
}

impl From<Point2> for nalgebra::Point2<f64> {
    fn from(point: Point2) -> Self {
        nalgebra::Point2::new(point.x, point.y)
    }
}

impl From<nalgebra::Point2<f64>> for Point2 {
    fn from(point: nalgebra::Point2<f64>) -> Self {
        Self::new(point.x, point.y)
    }
}

/// A vector in 2D pixel space. Like [Point2], this is only used for layout and
/// picking. This can represent offsets or sizes in 2D.
///
/// See [Point2] for a description of the 2D coordinate space.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    PartialOrd,
    From,
    Into,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    Sum,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", x, y)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise maximum of two vectors. Used to grow a size so it covers
    /// another one.
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }
}

impl From<Vector2> for nalgebra::Vector2<f64> {
    fn from(vector: Vector2) -> Self {
        nalgebra::Vector2::new(vector.x, vector.y)
    }
}

impl ops::Add<Vector2> for Point2 {
    type Output = Point2;

    fn add(self, rhs: Vector2) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl ops::Sub<Vector2> for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Vector2) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl ops::Sub<Point2> for Point2 {
    type Output = Vector2;

    fn sub(self, rhs: Point2) -> Self::Output {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An RGB color. Values are stored as floats between 0 and 1 (inclusive).
/// This uses f32 because the extra precision from f64 is pointless.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color3 {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color3 {
    /// Create a new RGB color. Returns an error if any of the components are
    /// outside the range [0.0, 1.0].
    pub fn new(red: f32, green: f32, blue: f32) -> anyhow::Result<Self> {
        fn check_component(
            component_name: &str,
            value: f32,
        ) -> anyhow::Result<f32> {
            if (0.0..=1.0).contains(&value) {
                Ok(value)
            } else {
                Err(anyhow!(
                    "Color component {} must be in [0, 1], but was {}",
                    component_name,
                    value
                ))
            }
        }

        Ok(Self {
            red: check_component("red", red)?,
            green: check_component("green", green)?,
            blue: check_component("blue", blue)?,
        })
    }

    /// Create a new RGB color from integer components in the range [0, 255].
    /// This can't fail because every `u8` maps into range.
    pub fn new_int(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
        }
    }

    /// Convert this color to a hex string like "#ff0000"
    pub fn to_html(self) -> String {
        // Components are always in [0, 1], so these casts can't overflow
        format!(
            "#{:02x}{:02x}{:02x}",
            (self.red * 255.0).round() as u8,
            (self.green * 255.0).round() as u8,
            (self.blue * 255.0).round() as u8
        )
    }
}

/// Unit used for movement. Entering a tile costs some amount of movement, and
/// a path's cost is the sum of the entry costs of every tile along it (not
/// counting the tile it starts on).
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    PartialOrd,
    From,
    Into,
    Add,
    Sub,
    Mul,
    Div,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    Sum,
    Serialize,
    Deserialize,
)]
#[display(fmt = "{} mp", "self.0")]
pub struct MovementCost(pub f64);

impl MovementCost {
    pub const ZERO: Self = Self(0.0);

    /// Total ordering over costs. See [crate::util::cmp_f64] for how NaN is
    /// handled.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        crate::util::cmp_f64(self.0, other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_vector_math() {
        let point = Point2::new(3.0, 4.0);
        let offset = Vector2::new(1.0, -2.0);
        assert_eq!(point + offset, Point2::new(4.0, 2.0));
        assert_eq!(point - offset, Point2::new(2.0, 6.0));
        assert_eq!(Point2::new(4.0, 2.0) - point, offset);
        assert_eq!(offset * 2.0, Vector2::new(2.0, -4.0));
    }

    #[test]
    fn test_color_validation() {
        assert!(Color3::new(0.0, 0.5, 1.0).is_ok());
        assert!(Color3::new(1.1, 0.5, 1.0).is_err());
        assert!(Color3::new(0.0, -0.1, 1.0).is_err());
        assert_eq!(Color3::new_int(255, 0, 128).to_html(), "#ff0080");
    }

    #[test]
    fn test_movement_cost_ordering() {
        let cheap = MovementCost(1.0);
        let pricey = MovementCost(2.5);
        assert_eq!(cheap + pricey, MovementCost(3.5));
        assert_eq!(cheap.total_cmp(&pricey), Ordering::Less);
        assert_eq!(
            vec![cheap, pricey].into_iter().sum::<MovementCost>(),
            MovementCost(3.5)
        );
    }
}
