use crate::grid::hex::{AxialPoint, CubePoint};
use fnv::FnvBuildHasher;
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet};

/// A set of cube points
pub type CubePointSet = HashSet<CubePoint, FnvBuildHasher>;
/// A map of cube points to some `T`
pub type CubePointMap<T> = HashMap<CubePoint, T, FnvBuildHasher>;
/// An ORDERED map of cube points to some `T`. This has some extra memory
/// overhead, so we should only use it when we actually need the ordering.
/// Anything a caller iterates over (tiles, fog of war, reachable cells) uses
/// this, so that results are deterministic between runs.
pub type CubePointIndexMap<T> = IndexMap<CubePoint, T, FnvBuildHasher>;
/// An ORDERED set of axial points. Board shapes are enumerated into this, so
/// that tiles get created in a predictable order.
pub type AxialPointIndexSet = IndexSet<AxialPoint, FnvBuildHasher>;
