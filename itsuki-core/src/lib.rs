//! Core domain types for the Itsuki trip-planning engine.
//!
//! The crate models a traveller's plan, an ordered list of stops with
//! optional geocoordinates, together with the haversine distance
//! primitive, the mode-dependent travel-time model, and the traits at the
//! engine's seams: [`RouteOptimizer`] for tour construction and
//! [`PlanStore`] for per-owner persistence.
//!
//! Constructors and write paths return `Result` so invalid input surfaces
//! early; per-item sanitisation of untyped input is deliberately lossy and
//! documented on [`PlanItem::sanitise`].

#![forbid(unsafe_code)]

mod cache;
mod distance;
mod item;
mod optimizer;
mod plan;
pub mod store;
mod travel;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use cache::{CacheError, PlanCache, STORAGE_SLOT};
pub use distance::{EARTH_RADIUS_KM, distance_km};
pub use item::{Location, PlanItem};
pub use optimizer::{OptimizeError, RouteOptimizer, RouteResult, geolocated};
pub use plan::{MAX_PLAN_ITEMS, OwnerId, Plan, PlanError};
pub use store::{Page, PlanPage, PlanStore, StoreError};
#[cfg(feature = "store-sqlite")]
pub use store::{SqlitePlanStore, SqlitePlanStoreError};
pub use travel::{
    TOLL_AVOIDANCE_FACTOR, TravelEstimate, TravelMode, TravelSettings, path_distance_km,
};
