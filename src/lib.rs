//! Facade crate for the Itsuki trip-planning engine.
//!
//! This crate re-exports the core domain types and exposes the optional
//! nearest-neighbour optimizer and SQLite plan store behind feature flags.

#![forbid(unsafe_code)]

pub use itsuki_core::{
    CacheError, Location, MAX_PLAN_ITEMS, OptimizeError, OwnerId, Page, Plan, PlanCache, PlanError,
    PlanItem, PlanPage, PlanStore, RouteOptimizer, RouteResult, StoreError, TravelEstimate,
    TravelMode, TravelSettings, distance_km, geolocated,
};

pub use itsuki_service::{
    Decision, FailurePolicy, FixedWindowLimiter, NullDirectory, OwnerDirectory, OwnerProfile,
    PlanLimits, PlanService, RATE_LIMIT_MESSAGE, RateLimitConfig, ServiceError, StaticDirectory,
};

#[cfg(feature = "store-sqlite")]
pub use itsuki_core::{SqlitePlanStore, SqlitePlanStoreError};

#[cfg(feature = "optimizer-nn")]
pub use itsuki_optimizer_nn::NearestNeighbourOptimizer;
