use crate::{
    grid::{
        hex::{CubePoint, CubePointIndexMap, CubePointMap},
        tile::Tile,
    },
    timed, HexGrid, MovementCost,
};
use anyhow::{bail, ensure};
use log::trace;
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    collections::{hash_map::Entry, BinaryHeap},
};

/// One cell that a unit can reach
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub point: CubePoint,
    /// Can the cell be reached without going over the movement budget?
    pub within_budget: bool,
    /// Minimal total cost to get here from the source, only crossing permitted
    /// cells. The source itself costs nothing.
    pub cost: MovementCost,
}

/// The result of a pathfinding query.
///
/// There are two views of the result. [Self::steps] is a single route from
/// the source toward the target, for drawing a path overlay. [Self::reachable]
/// is every cell that can be reached at all, for showing a movement range.
/// Every step along the route is also in the reachable set, with the same
/// cost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    source: CubePoint,
    target: CubePoint,
    budget: MovementCost,
    steps: Vec<PathStep>,
    #[serde(with = "crate::util::serde_point_map_to_vec")]
    reachable: CubePointIndexMap<PathStep>,
}

impl Path {
    pub fn source(&self) -> CubePoint {
        self.source
    }

    pub fn target(&self) -> CubePoint {
        self.target
    }

    pub fn budget(&self) -> MovementCost {
        self.budget
    }

    /// A connected route of adjacent cells, starting at the source. If the
    /// target is reachable, the route ends at the target. Otherwise it ends
    /// at the reachable cell that's closest to the target, so the caller can
    /// still show how far toward it a unit could get.
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Every cell reachable from the source through permitted cells, in the
    /// order they were settled (i.e. sorted by cost). Cells beyond the budget
    /// are included, with `within_budget` set to false.
    pub fn reachable(&self) -> impl Iterator<Item = &PathStep> {
        self.reachable.values()
    }

    /// Look up the reachability of a particular cell. `None` if it can't be
    /// reached at all.
    pub fn reachable_step(&self, point: CubePoint) -> Option<&PathStep> {
        self.reachable.get(&point)
    }

    /// The last step along the route that's within budget, i.e. the furthest
    /// a unit could get toward the target this turn. Never `None` for a path
    /// built by [find_path], since the source is always within budget.
    pub fn furthest_affordable(&self) -> Option<&PathStep> {
        self.steps.iter().rev().find(|step| step.within_budget)
    }

    /// Does the route actually end at the target?
    pub fn reached_target(&self) -> bool {
        self.steps.last().map(|step| step.point) == Some(self.target)
    }
}

/// An entry in the open set. Ordered so that a [BinaryHeap] (max-heap) pops
/// the cheapest node first.
#[derive(Copy, Clone, Debug)]
struct FrontierNode {
    point: CubePoint,
    cost: MovementCost,
    /// Hex distance to the target. Among equal-cost nodes, ones closer to the
    /// target get settled first, which keeps routes pointed at the target.
    distance_to_target: usize,
    /// Insertion counter, for fully deterministic ordering
    sequence: u64,
}

impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on every key, so the max-heap acts like a min-heap
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| {
                other.distance_to_target.cmp(&self.distance_to_target)
            })
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierNode {}

/// Find a path from `source` toward `target`, with a movement budget. Each
/// tile's entry cost comes from its terrain (see
/// [Terrain::entry_cost](crate::Terrain::entry_cost)).
///
/// A cell can only be stepped onto if it's on the grid, `inaccessible`
/// returns false for it, `visible` returns true for it, and its terrain can
/// be entered at all. The source is exempt from all of those checks.
///
/// See [find_path_with_costs] for details on the result and errors.
pub fn find_path(
    grid: &HexGrid,
    source: CubePoint,
    target: CubePoint,
    budget: MovementCost,
    inaccessible: impl Fn(CubePoint) -> bool,
    visible: impl Fn(CubePoint) -> bool,
) -> anyhow::Result<Path> {
    find_path_with_costs(
        grid,
        source,
        target,
        budget,
        inaccessible,
        visible,
        |tile| tile.terrain().entry_cost(),
    )
}

/// Find a path from `source` toward `target`, with a movement budget and a
/// caller-supplied cost to enter each tile. `entry_cost` returning `None`
/// means the tile can't be entered.
///
/// Costs are computed with a cost-ordered frontier expansion over every
/// permitted cell (Dijkstra's algorithm), so every reachable cell gets its
/// minimal cost, even those beyond the budget. Cells that can't be reached at
/// all don't appear anywhere in the result. When there are multiple cheapest
/// routes to a cell, the first one found wins, with ties between frontier
/// nodes broken by distance to the target then insertion order. That makes
/// the result fully deterministic.
///
/// Returns an error if:
/// - `budget` is negative or NaN
/// - `source` isn't on the grid
/// - `entry_cost` returns a negative or NaN cost for any tile the search
///   looks at
pub fn find_path_with_costs(
    grid: &HexGrid,
    source: CubePoint,
    target: CubePoint,
    budget: MovementCost,
    inaccessible: impl Fn(CubePoint) -> bool,
    visible: impl Fn(CubePoint) -> bool,
    entry_cost: impl Fn(&Tile) -> Option<MovementCost>,
) -> anyhow::Result<Path> {
    ensure!(
        budget.0 >= 0.0,
        "movement budget must be non-negative, got {}",
        budget
    );
    ensure!(grid.contains(source), "source {} is not on the grid", source);

    let (reachable, came_from) = timed!("Pathfinding", {
        let mut open_set: BinaryHeap<FrontierNode> = BinaryHeap::new();
        let mut best_costs: CubePointMap<MovementCost> =
            CubePointMap::default();
        let mut came_from: CubePointMap<CubePoint> = CubePointMap::default();
        let mut reachable: CubePointIndexMap<PathStep> =
            CubePointIndexMap::default();
        let mut sequence = 0;

        best_costs.insert(source, MovementCost::ZERO);
        open_set.push(FrontierNode {
            point: source,
            cost: MovementCost::ZERO,
            distance_to_target: source.distance_to(target),
            sequence,
        });

        while let Some(current) = open_set.pop() {
            // Stale entry, we already settled this cell more cheaply
            if reachable.contains_key(&current.point) {
                continue;
            }
            reachable.insert(
                current.point,
                PathStep {
                    point: current.point,
                    within_budget: current.cost <= budget,
                    cost: current.cost,
                },
            );

            for tile in grid.neighbors(current.point) {
                let next = tile.position();
                if reachable.contains_key(&next)
                    || inaccessible(next)
                    || !visible(next)
                {
                    continue;
                }
                let step_cost = match entry_cost(tile) {
                    Some(step_cost) => step_cost,
                    None => continue,
                };
                if !(step_cost.0 >= 0.0) {
                    bail!(
                        "entry cost for {} must be non-negative, got {}",
                        next,
                        step_cost
                    );
                }

                let cost = current.cost + step_cost;
                // Only strictly cheaper routes replace a known one, so the
                // first route found wins ties
                let improved = match best_costs.entry(next) {
                    Entry::Occupied(mut entry) => {
                        if cost.total_cmp(entry.get()) == Ordering::Less {
                            entry.insert(cost);
                            true
                        } else {
                            false
                        }
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(cost);
                        true
                    }
                };
                if improved {
                    came_from.insert(next, current.point);
                    sequence += 1;
                    open_set.push(FrontierNode {
                        point: next,
                        cost,
                        distance_to_target: next.distance_to(target),
                        sequence,
                    });
                }
            }
        }
        (reachable, came_from)
    });

    // Route to the target if we can, otherwise to the closest reachable cell.
    // Ties go to the cheaper cell, then to the one settled first.
    let destination = reachable
        .values()
        .enumerate()
        .min_by(|(i, a), (j, b)| {
            a.point
                .distance_to(target)
                .cmp(&b.point.distance_to(target))
                .then_with(|| a.cost.total_cmp(&b.cost))
                .then_with(|| i.cmp(j))
        })
        .map(|(_, step)| step.point)
        .unwrap_or(source);
    let steps = reconstruct_route(&reachable, &came_from, destination);
    debug_assert_eq!(
        steps.first().map(|step| step.point),
        Some(source),
        "route must start at the source"
    );
    trace!(
        "Path from {} to {}: {} steps, {} reachable cells",
        source,
        target,
        steps.len(),
        reachable.len()
    );

    Ok(Path {
        source,
        target,
        budget,
        steps,
        reachable,
    })
}

/// Walk the predecessor map backwards from the destination, then flip it so
/// the route starts at the source
fn reconstruct_route(
    reachable: &CubePointIndexMap<PathStep>,
    came_from: &CubePointMap<CubePoint>,
    destination: CubePoint,
) -> Vec<PathStep> {
    let mut route = Vec::new();
    let mut current = Some(destination);
    while let Some(point) = current {
        if let Some(step) = reachable.get(&point) {
            route.push(*step);
        }
        current = came_from.get(&point).copied();
    }
    route.reverse();
    route
}
