//! The plan persistence boundary, scoped to the authenticated caller.

use serde_json::Value;
use thiserror::Error;

use itsuki_core::{OwnerId, Page, Plan, PlanError, PlanPage, PlanStore, StoreError};

use crate::directory::OwnerDirectory;
use crate::export;
use crate::limiter::{Decision, FailurePolicy, FixedWindowLimiter, PlanLimits};

/// Message returned with every rate-limit rejection.
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, please slow down";

/// Errors surfaced by [`PlanService`] operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The incoming batch violated a write-boundary rule.
    #[error(transparent)]
    Validation(#[from] PlanError),
    /// An admin operation referenced an owner with no plan.
    #[error("no plan exists for owner {owner}")]
    NotFound {
        /// The owner whose plan was requested.
        owner: OwnerId,
    },
    /// The caller exhausted their request budget.
    #[error("{RATE_LIMIT_MESSAGE}")]
    RateLimited,
    /// The storage backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// An export payload could not be encoded.
    #[error("failed to encode export payload: {0}")]
    Export(#[from] serde_json::Error),
}

impl ServiceError {
    /// The HTTP status an edge layer should map this error to.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound { .. } => 404,
            Self::RateLimited => 429,
            Self::Store(_) | Self::Export(_) => 500,
        }
    }
}

/// Plans scoped to their authenticated owner, with per-endpoint
/// throttling.
///
/// Caller-facing operations (`get_my_plan`, `upsert_my_plan`,
/// `delete_my_plan`) consume the read/write/delete budgets keyed by the
/// caller's identity. Admin operations bypass the limiters.
///
/// # Examples
/// ```
/// use itsuki_core::{OwnerId, test_support::MemoryPlanStore};
/// use itsuki_service::PlanService;
/// use serde_json::json;
///
/// let service = PlanService::new(MemoryPlanStore::default());
/// let owner = OwnerId::new("u1");
/// let plan = service
///     .upsert_my_plan(&owner, &[json!({ "id": "a" })])
///     .expect("within budget and cap");
/// assert_eq!(plan.item_ids(), vec!["a"]);
/// ```
#[derive(Debug)]
pub struct PlanService<S: PlanStore> {
    store: S,
    read_limiter: FixedWindowLimiter,
    write_limiter: FixedWindowLimiter,
    delete_limiter: FixedWindowLimiter,
}

impl<S: PlanStore> PlanService<S> {
    /// A service over `store` with default limits and fail-open limiting.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_limits(store, PlanLimits::default(), FailurePolicy::default())
    }

    /// A service with explicit budgets and limiter failure policy.
    #[must_use]
    pub fn with_limits(store: S, limits: PlanLimits, policy: FailurePolicy) -> Self {
        Self {
            store,
            read_limiter: FixedWindowLimiter::with_policy(limits.read, policy),
            write_limiter: FixedWindowLimiter::with_policy(limits.write, policy),
            delete_limiter: FixedWindowLimiter::with_policy(limits.delete, policy),
        }
    }

    /// The caller's plan; an empty plan when none exists yet.
    pub fn get_my_plan(&self, owner: &OwnerId) -> Result<Plan, ServiceError> {
        guard(&self.read_limiter, owner)?;
        Ok(self
            .store
            .find(owner)?
            .unwrap_or_else(|| Plan::empty(owner.clone())))
    }

    /// Sanitize `raw_items` and wholesale-replace the caller's plan.
    ///
    /// A batch longer than the item cap fails with a validation error;
    /// individual unparseable items are dropped silently. The stored plan
    /// is returned.
    pub fn upsert_my_plan(
        &self,
        owner: &OwnerId,
        raw_items: &[Value],
    ) -> Result<Plan, ServiceError> {
        guard(&self.write_limiter, owner)?;
        let plan = Plan::from_raw(owner.clone(), raw_items)?;
        self.store.upsert(&plan)?;
        log::debug!("plan for {} replaced with {} items", owner, plan.items.len());
        Ok(plan)
    }

    /// Delete the caller's plan; succeeds silently when absent.
    pub fn delete_my_plan(&self, owner: &OwnerId) -> Result<(), ServiceError> {
        guard(&self.delete_limiter, owner)?;
        self.store.delete(owner)?;
        Ok(())
    }

    /// Admin: list plans, optionally filtered to one owner.
    pub fn list_plans(
        &self,
        filter: Option<&OwnerId>,
        page: Page,
    ) -> Result<PlanPage, ServiceError> {
        Ok(self.store.list(filter, page)?)
    }

    /// Admin: the plan for `owner`, failing when none exists.
    pub fn plan_by_owner(&self, owner: &OwnerId) -> Result<Plan, ServiceError> {
        self.store.find(owner)?.ok_or_else(|| ServiceError::NotFound {
            owner: owner.clone(),
        })
    }

    /// Admin: export matching plans as a JSON document.
    pub fn export_plans_json(
        &self,
        filter: Option<&OwnerId>,
        directory: &dyn OwnerDirectory,
    ) -> Result<String, ServiceError> {
        let plans = self.all_plans(filter)?;
        Ok(export::plans_to_json(&plans, directory)?)
    }

    /// Admin: export matching plans as CSV.
    pub fn export_plans_csv(
        &self,
        filter: Option<&OwnerId>,
        directory: &dyn OwnerDirectory,
    ) -> Result<String, ServiceError> {
        let plans = self.all_plans(filter)?;
        Ok(export::plans_to_csv(&plans, directory))
    }

    fn all_plans(&self, filter: Option<&OwnerId>) -> Result<Vec<Plan>, ServiceError> {
        const EXPORT_PAGE_SIZE: u64 = 500;
        let mut plans = Vec::new();
        let mut number = 1;
        loop {
            let page = self.store.list(filter, Page::new(number, EXPORT_PAGE_SIZE))?;
            let fetched = page.plans.len() as u64;
            plans.extend(page.plans);
            if fetched < EXPORT_PAGE_SIZE || plans.len() as u64 >= page.total {
                break;
            }
            number += 1;
        }
        Ok(plans)
    }
}

fn guard(limiter: &FixedWindowLimiter, owner: &OwnerId) -> Result<(), ServiceError> {
    match limiter.check(owner.as_str()) {
        Decision::Allowed => Ok(()),
        Decision::Limited => Err(ServiceError::RateLimited),
    }
}
