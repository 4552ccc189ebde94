//! Queries that run against a built [HexGrid](crate::HexGrid). Everything in
//! here is terrain-agnostic: whatever the caller's game considers "blocked" or
//! "expensive" comes in through predicates, so the same grid can answer
//! questions for any number of observers or units.

pub mod pathfinding;
pub mod visibility;
