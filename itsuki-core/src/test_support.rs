//! Test-only, in-memory `PlanStore` implementation and fixtures used by
//! unit and behaviour tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::{Location, OwnerId, Page, Plan, PlanItem, PlanPage, PlanStore, StoreError};

/// In-memory `PlanStore` used in tests.
///
/// Plans are held in a `BTreeMap` so listings come back ordered by owner
/// id, matching the SQLite implementation.
#[derive(Default, Debug)]
pub struct MemoryPlanStore {
    plans: Mutex<BTreeMap<OwnerId, Plan>>,
}

impl MemoryPlanStore {
    /// A store pre-seeded with the given plans.
    pub fn with_plans<I>(plans: I) -> Self
    where
        I: IntoIterator<Item = Plan>,
    {
        Self {
            plans: Mutex::new(
                plans
                    .into_iter()
                    .map(|plan| (plan.owner.clone(), plan))
                    .collect(),
            ),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<OwnerId, Plan>>, StoreError> {
        self.plans
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }
}

impl PlanStore for MemoryPlanStore {
    fn find(&self, owner: &OwnerId) -> Result<Option<Plan>, StoreError> {
        Ok(self.lock()?.get(owner).cloned())
    }

    fn upsert(&self, plan: &Plan) -> Result<(), StoreError> {
        self.lock()?.insert(plan.owner.clone(), plan.clone());
        Ok(())
    }

    fn delete(&self, owner: &OwnerId) -> Result<(), StoreError> {
        self.lock()?.remove(owner);
        Ok(())
    }

    fn list(&self, filter: Option<&OwnerId>, page: Page) -> Result<PlanPage, StoreError> {
        let plans = self.lock()?;
        let matching: Vec<Plan> = plans
            .values()
            .filter(|plan| filter.is_none_or(|owner| &plan.owner == owner))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let selected = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.size).unwrap_or(usize::MAX))
            .collect();
        Ok(PlanPage {
            plans: selected,
            total,
            page,
        })
    }
}

/// A plan for `owner` holding bare items with the given ids.
#[must_use]
pub fn plan_with_ids(owner: &OwnerId, ids: &[&str]) -> Plan {
    let items = ids.iter().map(|id| PlanItem::new(*id)).collect();
    Plan::new(owner.clone(), items).unwrap_or_else(|_| Plan::empty(owner.clone()))
}

/// An item pinned at the given coordinates.
#[must_use]
pub fn pinned_item(id: &str, lat: f64, lng: f64) -> PlanItem {
    PlanItem {
        location: Some(Location {
            lat: Some(lat),
            lng: Some(lng),
            address: None,
        }),
        ..PlanItem::new(id)
    }
}
