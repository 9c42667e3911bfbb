//! Plan persistence boundary and its protective rate limiting.
//!
//! [`PlanService`] wraps a [`PlanStore`](itsuki_core::PlanStore) with the
//! write-boundary rules (raw-batch cap, per-item sanitisation, wholesale
//! upsert) and throttles the caller-facing operations with per-endpoint
//! fixed-window limiters. Admin listing and the JSON/CSV exporters live
//! here too, resolving owner contact details through the
//! [`OwnerDirectory`] collaborator.

#![forbid(unsafe_code)]

mod directory;
mod export;
mod limiter;
mod service;

pub use directory::{NullDirectory, OwnerDirectory, OwnerProfile, StaticDirectory};
pub use export::{plans_to_csv, plans_to_json};
pub use limiter::{Decision, FailurePolicy, FixedWindowLimiter, PlanLimits, RateLimitConfig};
pub use service::{PlanService, RATE_LIMIT_MESSAGE, ServiceError};
