use crate::{
    grid::hex::{CubePoint, CubePointIndexMap, FractionalPoint},
    timed, HexGrid,
};
use anyhow::ensure;
use log::trace;
use serde::{Deserialize, Serialize};

/// Offset used to nudge sampled points off of cell edges and vertices while
/// tracing a line. A point exactly on an edge is sampled at `p + ε` and
/// `p - ε`, so the two samples land on either side of the edge. Every
/// component is non-zero (and they're all different) so no edge or vertex can
/// leave both samples ambiguous, and the components sum to zero so the offset
/// itself is a valid cube vector.
pub const TIE_BREAK_EPSILON: FractionalPoint =
    FractionalPoint::new(1e-6, 2e-6, -3e-6);

/// One cell along a traced line
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStep {
    pub point: CubePoint,
    /// Can this cell be seen from the start of the line?
    pub visible: bool,
}

/// The two cells a sampled point could belong to. They're the same cell
/// unless the sample is right on an edge (or vertex).
fn sample_candidates(
    start: CubePoint,
    end: CubePoint,
    t: f64,
) -> (CubePoint, CubePoint) {
    let sample =
        FractionalPoint::lerp(end.to_fractional(), start.to_fractional(), t);
    (
        (sample + TIE_BREAK_EPSILON).round(),
        (sample - TIE_BREAK_EPSILON).round(),
    )
}

/// Trace a straight line from `start` to `end`, and determine which cells
/// along the line can be seen from `start`. `passable` tells us whether sight
/// passes through a cell.
///
/// The returned steps are every cell strictly between the two endpoints,
/// ordered from `start` outward. Neither endpoint is tested against
/// `passable`: you can always see your own cell, and a wall you're looking at
/// is still visible, it just hides whatever is behind it.
///
/// Visibility is monotone along the line. The result is always some number
/// of visible steps followed by some number of blocked ones, since once sight
/// is broken nothing further out can be seen.
///
/// When the line runs exactly along an edge between two cells, both cells are
/// candidates for that step. Sight passes as long as either of them is
/// passable, and the step reports whichever one let it through.
pub fn trace_line(
    start: CubePoint,
    end: CubePoint,
    passable: impl Fn(CubePoint) -> bool,
) -> Vec<LineStep> {
    let distance = start.distance_to(end);
    if distance < 2 {
        return Vec::new();
    }

    let mut steps = Vec::with_capacity(distance - 1);
    let mut blocked = false;
    // k counts down from the cell adjacent to start, out to the cell adjacent
    // to end. t is the weight on start.
    for k in (1..distance).rev() {
        let t = k as f64 / distance as f64;
        let (positive, negative) = sample_candidates(start, end, t);

        let step = if blocked {
            LineStep {
                point: positive,
                visible: false,
            }
        } else if positive == negative {
            LineStep {
                point: positive,
                visible: passable(positive),
            }
        } else {
            match (passable(positive), passable(negative)) {
                (true, _) => LineStep {
                    point: positive,
                    visible: true,
                },
                (false, true) => LineStep {
                    point: negative,
                    visible: true,
                },
                (false, false) => LineStep {
                    point: positive,
                    visible: false,
                },
            }
        };

        blocked = !step.visible;
        steps.push(step);
    }

    debug_assert!(
        steps.windows(2).all(|pair| pair[0].visible || !pair[1].visible),
        "line visibility must be monotone"
    );
    steps
}

/// Can `end` be seen from `start`? True iff every cell strictly between the
/// two is visible according to [trace_line]. This stops at the first blocked
/// cell, so it's cheaper than tracing the whole line.
pub fn has_line_of_sight(
    start: CubePoint,
    end: CubePoint,
    passable: impl Fn(CubePoint) -> bool,
) -> bool {
    let distance = start.distance_to(end);
    (1..distance).rev().all(|k| {
        let (positive, negative) =
            sample_candidates(start, end, k as f64 / distance as f64);
        passable(positive) || passable(negative)
    })
}

/// Which cells of a grid one observer can currently see. Each observer (or
/// faction, or whatever the caller's game needs) gets its own map, there's no
/// global fog state.
///
/// The map covers every tile on the grid. Cells that aren't on the grid never
/// appear in it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FogOfWar {
    observer: CubePoint,
    view_radius: u16,
    #[serde(with = "crate::util::serde_point_map_to_vec")]
    visibility: CubePointIndexMap<bool>,
}

impl FogOfWar {
    /// The cell that everything was seen from
    pub fn observer(&self) -> CubePoint {
        self.observer
    }

    pub fn view_radius(&self) -> u16 {
        self.view_radius
    }

    /// Can the observer see this cell? Cells outside the grid are never
    /// visible, except for the observer's own cell which always is.
    pub fn is_visible(&self, point: CubePoint) -> bool {
        point == self.observer
            || self.visibility.get(&point).copied().unwrap_or(false)
    }

    /// Iterate over every visible cell, in grid order
    pub fn visible_points(&self) -> impl Iterator<Item = CubePoint> + '_ {
        self.visibility
            .iter()
            .filter(|(_, visible)| **visible)
            .map(|(point, _)| *point)
    }

    /// Iterate over every cell on the grid along with its visibility
    pub fn iter(&self) -> impl Iterator<Item = (CubePoint, bool)> + '_ {
        self.visibility
            .iter()
            .map(|(point, visible)| (*point, *visible))
    }

    /// Number of cells in the map, visible or not
    pub fn len(&self) -> usize {
        self.visibility.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visibility.is_empty()
    }
}

/// Compute what an observer can see. A cell is visible iff it is strictly
/// closer than `view_radius` to the observer, and there is an unbroken line of
/// sight from the cell back to the observer. The observer's own cell is always
/// visible.
///
/// Lines are traced from each cell toward the observer, with the same edge
/// handling as [trace_line]: a step is passable if either candidate cell is.
/// The first impassable step ends the trace.
///
/// Returns an error if `view_radius` is 0.
pub fn compute_fog_of_war(
    grid: &HexGrid,
    observer: CubePoint,
    view_radius: u16,
    passable: impl Fn(CubePoint) -> bool,
) -> anyhow::Result<FogOfWar> {
    ensure!(view_radius > 0, "view radius must be positive");

    let visibility = timed!("Fog of war", {
        grid.tiles()
            .keys()
            .map(|&point| {
                let visible = point == observer
                    || (point.distance_to(observer) < view_radius as usize
                        && has_line_of_sight(point, observer, &passable));
                (point, visible)
            })
            .collect::<CubePointIndexMap<bool>>()
    });
    trace!(
        "Observer at {} can see {} of {} tiles",
        observer,
        visibility.values().filter(|visible| **visible).count(),
        visibility.len()
    );

    Ok(FogOfWar {
        observer,
        view_radius,
        visibility,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grid::{hex::CubePointSet, shape::GridShape},
        GridConfig,
    };

    fn grid(radius: u16) -> HexGrid {
        HexGrid::new(GridConfig {
            shape: GridShape::Hexagon,
            size: radius,
            ..Default::default()
        })
        .unwrap()
    }

    fn walls(points: &[CubePoint]) -> impl Fn(CubePoint) -> bool {
        let walls: CubePointSet = points.iter().copied().collect();
        move |point| !walls.contains(&point)
    }

    #[test]
    fn test_epsilon_is_a_valid_offset() {
        let sum =
            TIE_BREAK_EPSILON.x + TIE_BREAK_EPSILON.y + TIE_BREAK_EPSILON.z;
        assert!(sum.abs() < 1e-12);
    }

    #[test]
    fn test_trace_short_lines() {
        let origin = CubePoint::ORIGIN;
        assert!(trace_line(origin, origin, |_| false).is_empty());
        assert!(trace_line(origin, CubePoint::new_xy(1, -1), |_| false)
            .is_empty());
    }

    #[test]
    fn test_trace_straight_line() {
        let start = CubePoint::ORIGIN;
        let end = CubePoint::new_xz(4, 0);
        let steps = trace_line(start, end, |_| true);
        assert_eq!(
            steps,
            (1..4)
                .map(|x| LineStep {
                    point: CubePoint::new_xz(x, 0),
                    visible: true,
                })
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_trace_blocked() {
        let start = CubePoint::ORIGIN;
        let end = CubePoint::new_xz(5, 0);
        let wall = CubePoint::new_xz(2, 0);
        let steps = trace_line(start, end, walls(&[wall]));
        let visibility: Vec<bool> =
            steps.iter().map(|step| step.visible).collect();
        assert_eq!(visibility, vec![true, false, false, false]);
        assert_eq!(steps[1].point, wall);
        assert!(!has_line_of_sight(start, end, walls(&[wall])));
        // Looking at the wall itself is fine
        assert!(has_line_of_sight(start, wall, walls(&[wall])));
    }

    #[test]
    fn test_trace_along_edge() {
        // This line runs exactly along the edge between (1, -1, 0) and
        // (1, 0, -1), so both are candidates for the middle step
        let start = CubePoint::ORIGIN;
        let end = CubePoint::new_xy(2, -1);
        let a = CubePoint::new_xy(1, -1);
        let b = CubePoint::new_xy(1, 0);

        // Both open, so the positive offset side wins
        let steps = trace_line(start, end, |_| true);
        assert_eq!(steps, vec![LineStep { point: b, visible: true }]);
        assert!(has_line_of_sight(start, end, |_| true));

        let steps = trace_line(start, end, walls(&[a]));
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0], LineStep { point: b, visible: true });

        let steps = trace_line(start, end, walls(&[b]));
        assert_eq!(steps[0], LineStep { point: a, visible: true });

        let steps = trace_line(start, end, walls(&[a, b]));
        assert!(!steps[0].visible);
        assert!(!has_line_of_sight(start, end, walls(&[a, b])));
    }

    #[test]
    fn test_trace_is_monotone() {
        let start = CubePoint::new_xz(-3, 1);
        let blockers =
            [CubePoint::new_xz(0, 0), CubePoint::new_xz(2, -1)];
        for end in CubePoint::ORIGIN.ring(5) {
            let steps = trace_line(start, end, walls(&blockers));
            let first_blocked = steps
                .iter()
                .position(|step| !step.visible)
                .unwrap_or(steps.len());
            assert!(steps[first_blocked..].iter().all(|step| !step.visible));
            assert_eq!(
                has_line_of_sight(start, end, walls(&blockers)),
                first_blocked == steps.len()
            );
        }
    }

    #[test]
    fn test_fog_radius_error() {
        let grid = grid(2);
        assert!(compute_fog_of_war(&grid, CubePoint::ORIGIN, 0, |_| true)
            .is_err());
    }

    #[test]
    fn test_fog_open_field() {
        let grid = grid(2);
        let fog =
            compute_fog_of_war(&grid, CubePoint::ORIGIN, 2, |_| true).unwrap();
        assert_eq!(fog.len(), grid.len());
        assert_eq!(fog.observer(), CubePoint::ORIGIN);
        assert_eq!(fog.view_radius(), 2);
        for (point, visible) in fog.iter() {
            assert_eq!(visible, point.distance_to(CubePoint::ORIGIN) < 2);
        }
        assert_eq!(fog.visible_points().count(), 7);
    }

    #[test]
    fn test_fog_walls() {
        let grid = grid(2);
        let wall = CubePoint::new_xz(1, 0);
        let fog =
            compute_fog_of_war(&grid, CubePoint::ORIGIN, 3, walls(&[wall]))
                .unwrap();
        // The wall itself is visible, the cell behind it isn't
        assert!(fog.is_visible(wall));
        assert!(!fog.is_visible(CubePoint::new_xz(2, 0)));
        assert!(fog.is_visible(CubePoint::new_xz(-2, 0)));
        // Observer always sees itself, even if its own cell blocks sight
        let fog =
            compute_fog_of_war(&grid, CubePoint::ORIGIN, 1, |_| false).unwrap();
        assert!(fog.is_visible(CubePoint::ORIGIN));
        assert_eq!(fog.visible_points().count(), 1);
    }
}
