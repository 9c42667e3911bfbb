//! Persistence seam for plans.
//!
//! The [`PlanStore`] trait expresses the document-store contract the plan
//! service needs: find/upsert/delete by owner plus a paginated admin
//! listing. Any key-value or document backend satisfies it; the crate
//! ships a SQLite implementation behind the `store-sqlite` feature.

use thiserror::Error;

use crate::{OwnerId, Plan};

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqlitePlanStore, SqlitePlanStoreError};

/// Errors surfaced through the [`PlanStore`] seam.
///
/// Backend-specific failures are flattened to a message so the trait stays
/// implementation-agnostic; callers treat any variant as an internal
/// (5xx-class) condition.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying storage backend failed.
    #[error("storage backend failure: {0}")]
    Backend(String),
    /// A plan payload could not be encoded or decoded.
    #[error("failed to encode plan items: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// A 1-based page request for admin listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Page number, clamped to at least 1.
    pub number: u64,
    /// Page size, clamped to at least 1.
    pub size: u64,
}

impl Page {
    /// Construct a page request, clamping zeroes up to 1.
    #[must_use]
    pub fn new(number: u64, size: u64) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    /// Offset of the first record on this page.
    ///
    /// Tolerates a zero `number` written directly to the public field, so
    /// a literal that bypassed [`Page::new`]'s clamp still addresses the
    /// first page.
    #[must_use]
    pub fn offset(self) -> u64 {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }
}

/// One page of an admin listing, with the filtered total.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanPage {
    /// Plans on this page, ordered by owner id.
    pub plans: Vec<Plan>,
    /// Total number of plans matching the filter.
    pub total: u64,
    /// The page that was requested.
    pub page: Page,
}

/// Per-owner plan persistence.
///
/// Writes are wholesale: `upsert` replaces a plan's items entirely
/// (create-if-absent), and concurrent upserts for the same owner are
/// last-write-wins with no version token. `delete` is idempotent.
pub trait PlanStore: Send + Sync {
    /// Fetch the plan owned by `owner`, if any.
    fn find(&self, owner: &OwnerId) -> Result<Option<Plan>, StoreError>;

    /// Create or wholesale-replace the plan for `plan.owner`.
    fn upsert(&self, plan: &Plan) -> Result<(), StoreError>;

    /// Remove the plan owned by `owner`; succeeds silently when absent.
    fn delete(&self, owner: &OwnerId) -> Result<(), StoreError>;

    /// List plans ordered by owner id, optionally filtered to one owner.
    fn list(&self, filter: Option<&OwnerId>, page: Page) -> Result<PlanPage, StoreError>;
}
