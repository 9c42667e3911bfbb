//! Nearest-neighbour tour construction for Itsuki trip plans.
//!
//! This crate provides [`NearestNeighbourOptimizer`], the default
//! [`RouteOptimizer`](itsuki_core::RouteOptimizer) implementation: a
//! greedy O(n²) heuristic that is deliberately approximate. The item cap
//! keeps the distance evaluations bounded, so no matrix caching or exact
//! solving is warranted.

#![forbid(unsafe_code)]

mod optimizer;

pub use optimizer::NearestNeighbourOptimizer;
