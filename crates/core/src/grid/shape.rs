//! Board shapes. Each shape is a deterministic enumeration of axial points,
//! with no knowledge of tiles or layout. [HexGrid](crate::HexGrid) turns the
//! enumerated points into tiles.

use crate::grid::hex::{AxialPoint, AxialPointIndexSet, CubePoint};
use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::cmp;
use strum::{Display, EnumIter, EnumString};

/// The axial offsets carved out of the middle of every hexagon board with a
/// radius of 3 or more: the origin plus the two rings around it. This is a
/// fixed gameplay carve-out, not a derived quantity, so it doesn't grow with
/// the board.
pub const HEXAGON_DONUT_HOLE: [AxialPoint; 19] = [
    // Center
    AxialPoint::new(0, 0),
    // Ring 1
    AxialPoint::new(1, -1),
    AxialPoint::new(1, 0),
    AxialPoint::new(0, 1),
    AxialPoint::new(-1, 1),
    AxialPoint::new(-1, 0),
    AxialPoint::new(0, -1),
    // Ring 2
    AxialPoint::new(2, -2),
    AxialPoint::new(2, -1),
    AxialPoint::new(2, 0),
    AxialPoint::new(1, 1),
    AxialPoint::new(0, 2),
    AxialPoint::new(-1, 2),
    AxialPoint::new(-2, 2),
    AxialPoint::new(-2, 1),
    AxialPoint::new(-2, 0),
    AxialPoint::new(-1, -1),
    AxialPoint::new(0, -2),
    AxialPoint::new(1, -2),
];

/// The smallest hexagon radius that gets a hole carved in the middle. Anything
/// smaller would be left with at most a single ring, or nothing at all.
pub const HEXAGON_DONUT_MIN_RADIUS: u16 = 3;

/// The largest size either parameter can have. Hexagon and line boards span
/// `2n + 1` cells along an axis, and every coordinate must fit in an `i16`.
pub const MAX_BOARD_SIZE: u16 = i16::MAX as u16 / 2;

/// The different board shapes that a grid can be built in. `n` and `m` refer
/// to the two size parameters passed to [build_shape].
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
pub enum GridShape {
    /// All `(q, r)` with `0 ≤ q ≤ n` and `0 ≤ r ≤ n - q`
    Triangle,
    /// All `(q, r)` with `0 ≤ q ≤ n` and `0 ≤ r ≤ m`
    Parallelogram,
    /// Every cell within `n` steps of the origin, minus
    /// [HEXAGON_DONUT_HOLE] once `n` reaches [HEXAGON_DONUT_MIN_RADIUS]
    Hexagon,
    /// `m` rows of `n` cells, each row shifted so the rows interlock into a
    /// brick-like rectangle
    Rectangle,
    /// All `(q, 0)` with `-n ≤ q ≤ n`
    Line,
}

impl GridShape {
    /// Does this shape use the second size parameter?
    pub fn is_two_dimensional(self) -> bool {
        match self {
            Self::Parallelogram | Self::Rectangle => true,
            Self::Triangle | Self::Hexagon | Self::Line => false,
        }
    }
}

/// Enumerate every axial point in a board of the given shape and size. `m` is
/// only used by [GridShape::is_two_dimensional] shapes, and ignored otherwise.
/// Returns an error if a size parameter the shape depends on is zero or above
/// [MAX_BOARD_SIZE].
///
/// The output order is deterministic (row-major in `q` then `r`, except for
/// rectangles which go row by row), so two boards built with the same
/// parameters always enumerate their tiles identically.
pub fn build_shape(
    shape: GridShape,
    n: u16,
    m: u16,
) -> anyhow::Result<AxialPointIndexSet> {
    ensure!(n > 0, "{} board size must be positive, got {}", shape, n);
    ensure!(
        n <= MAX_BOARD_SIZE,
        "{} board size must be at most {}, got {}",
        shape,
        MAX_BOARD_SIZE,
        n
    );
    if shape.is_two_dimensional() {
        ensure!(
            m > 0 && m <= MAX_BOARD_SIZE,
            "{} board secondary size must be in [1, {}], got {}",
            shape,
            MAX_BOARD_SIZE,
            m
        );
    }

    // Both sizes are bounded above, so 2n still fits in an i16
    let n = n as i16;
    let m = m as i16;
    let mut points = AxialPointIndexSet::default();
    match shape {
        GridShape::Triangle => {
            for q in 0..=n {
                for r in 0..=(n - q) {
                    points.insert(AxialPoint::new(q, r));
                }
            }
        }
        GridShape::Parallelogram => {
            for q in 0..=n {
                for r in 0..=m {
                    points.insert(AxialPoint::new(q, r));
                }
            }
        }
        GridShape::Hexagon => {
            let carve_hole = n as u16 >= HEXAGON_DONUT_MIN_RADIUS;
            for q in -n..=n {
                let r_min = cmp::max(-n, -q - n);
                let r_max = cmp::min(n, -q + n);
                for r in r_min..=r_max {
                    let point = AxialPoint::new(q, r);
                    if !(carve_hole && HEXAGON_DONUT_HOLE.contains(&point)) {
                        points.insert(point);
                    }
                }
            }
        }
        GridShape::Rectangle => {
            for r in 0..m {
                // Floor division, so the offset for row r is ⌊r/2⌋
                let r_offset = r >> 1;
                for q in -r_offset..(n - r_offset) {
                    points.insert(AxialPoint::new(q, r));
                }
            }
        }
        GridShape::Line => {
            for q in -n..=n {
                points.insert(AxialPoint::new(q, 0));
            }
        }
    }

    debug_assert!(
        points
            .iter()
            .all(|p| CubePoint::from_axial(*p).to_axial() == *p),
        "axial points must round trip through cube coordinates"
    );
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::hexagon_len;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    /// Helper to turn a list of (q, r) tuples into a sorted vec of points
    fn sorted(points: &AxialPointIndexSet) -> Vec<(i16, i16)> {
        let mut points: Vec<(i16, i16)> =
            points.iter().map(|p| (p.q, p.r)).collect();
        points.sort_unstable();
        points
    }

    #[test]
    fn test_line() {
        let points = build_shape(GridShape::Line, 2, 0).unwrap();
        assert_eq!(
            sorted(&points),
            vec![(-2, 0), (-1, 0), (0, 0), (1, 0), (2, 0)]
        );
    }

    #[test]
    fn test_triangle() {
        let points = build_shape(GridShape::Triangle, 2, 0).unwrap();
        assert_eq!(
            sorted(&points),
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (2, 0)]
        );
    }

    #[test]
    fn test_parallelogram() {
        let points = build_shape(GridShape::Parallelogram, 2, 1).unwrap();
        assert_eq!(points.len(), 6);
        assert!(points.contains(&AxialPoint::new(2, 1)));
        assert!(!points.contains(&AxialPoint::new(1, 2)));
    }

    #[test]
    fn test_hexagon() {
        // No hole for small boards
        let points = build_shape(GridShape::Hexagon, 1, 0).unwrap();
        assert_eq!(points.len(), 7);
        let points = build_shape(GridShape::Hexagon, 2, 0).unwrap();
        assert_eq!(points.len(), 19);
        assert!(points.contains(&AxialPoint::new(0, 0)));

        // A full radius 3 hexagon minus the hole
        let points = build_shape(GridShape::Hexagon, 3, 0).unwrap();
        assert_eq!(points.len(), hexagon_len(3) - HEXAGON_DONUT_HOLE.len());
        assert!(!points.contains(&AxialPoint::new(0, 0)));
        assert!(!points.contains(&AxialPoint::new(-2, 1)));
        assert!(points.contains(&AxialPoint::new(3, -3)));
        for point in &points {
            let point = CubePoint::from_axial(*point);
            assert_eq!(point.distance_to(CubePoint::ORIGIN), 3);
        }
    }

    #[test]
    fn test_donut_hole_is_radius_two() {
        let hole: Vec<CubePoint> = HEXAGON_DONUT_HOLE
            .iter()
            .map(|p| CubePoint::from_axial(*p))
            .collect();
        let expected: Vec<CubePoint> = CubePoint::ORIGIN.range(2).collect();
        assert_eq!(hole.len(), expected.len());
        for point in expected {
            assert!(hole.contains(&point), "{} missing from hole", point);
        }
    }

    #[test]
    fn test_rectangle() {
        let points = build_shape(GridShape::Rectangle, 3, 4).unwrap();
        assert_eq!(points.len(), 12);
        // Row 0 and 1 aren't offset, rows 2 and 3 shift by 1
        assert!(points.contains(&AxialPoint::new(0, 1)));
        assert!(points.contains(&AxialPoint::new(-1, 2)));
        assert!(points.contains(&AxialPoint::new(1, 3)));
        assert!(!points.contains(&AxialPoint::new(2, 3)));
    }

    #[test]
    fn test_invalid_sizes() {
        for shape in GridShape::iter() {
            assert!(build_shape(shape, 0, 5).is_err(), "{} took n=0", shape);
        }
        assert!(build_shape(GridShape::Parallelogram, 3, 0).is_err());
        assert!(build_shape(GridShape::Rectangle, 3, 0).is_err());
        // m is irrelevant here
        assert!(build_shape(GridShape::Line, 3, 0).is_ok());
    }

    #[test]
    fn test_oversized() {
        for shape in GridShape::iter() {
            for n in [MAX_BOARD_SIZE + 1, 20000, 40000, u16::MAX] {
                let result = build_shape(shape, n, 1);
                assert!(result.is_err(), "{} took {}", shape, n);
            }
        }
        assert!(build_shape(GridShape::Parallelogram, 1, 20000).is_err());
        assert!(build_shape(GridShape::Rectangle, 1, 40000).is_err());
        // m is irrelevant here too
        assert!(build_shape(GridShape::Hexagon, 1, 40000).is_ok());

        // The largest line still gets every one of its cells
        let points = build_shape(GridShape::Line, MAX_BOARD_SIZE, 0).unwrap();
        assert_eq!(points.len(), 2 * MAX_BOARD_SIZE as usize + 1);
        let end = MAX_BOARD_SIZE as i16;
        assert!(points.contains(&AxialPoint::new(-end, 0)));
        assert!(points.contains(&AxialPoint::new(end, 0)));
    }

    #[test]
    fn test_parse_shape() {
        assert_eq!(
            GridShape::from_str("parallelogram").unwrap(),
            GridShape::Parallelogram
        );
        assert!(GridShape::from_str("octagon").is_err());
        assert_eq!(GridShape::Hexagon.to_string(), "hexagon");
    }
}
