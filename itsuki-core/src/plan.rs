//! A traveller's plan: an ordered, capped list of stops owned by one user.

use std::collections::HashSet;
use std::time::SystemTime;

use serde_json::Value;
use thiserror::Error;

use crate::PlanItem;

/// Upper bound on the number of stops a plan may hold.
///
/// A raw batch longer than this fails the whole write; it is never
/// silently truncated.
pub const MAX_PLAN_ITEMS: usize = 50;

/// Identity of a plan's owner, as supplied by the authentication layer.
///
/// The engine trusts this identity without re-validating it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(String);

impl OwnerId {
    /// Wrap an authenticated caller identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Errors raised when building a [`Plan`] from raw input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The raw batch exceeded [`MAX_PLAN_ITEMS`].
    #[error("a plan accepts at most {MAX_PLAN_ITEMS} items, got {count}")]
    TooManyItems {
        /// Number of items in the rejected batch.
        count: usize,
    },
}

/// A user's ordered collection of trip stops.
///
/// Exactly one plan exists per owner. Insertion order is the default
/// (pre-optimisation) visiting order. Item ids are unique within a plan;
/// when raw input repeats an id the first occurrence wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// The authenticated owner of this plan.
    pub owner: OwnerId,
    /// Ordered stops, at most [`MAX_PLAN_ITEMS`] of them.
    pub items: Vec<PlanItem>,
    /// Set on every upsert.
    pub updated_at: SystemTime,
}

impl Plan {
    /// An empty plan for `owner`, returned where absence is not an error.
    #[must_use]
    pub fn empty(owner: OwnerId) -> Self {
        Self {
            owner,
            items: Vec::new(),
            updated_at: SystemTime::now(),
        }
    }

    /// Build a plan from already-typed items, enforcing the cap and
    /// suppressing duplicate ids (first occurrence wins).
    pub fn new(owner: OwnerId, items: Vec<PlanItem>) -> Result<Self, PlanError> {
        if items.len() > MAX_PLAN_ITEMS {
            return Err(PlanError::TooManyItems { count: items.len() });
        }
        Ok(Self {
            owner,
            items: dedup_by_id(items),
            updated_at: SystemTime::now(),
        })
    }

    /// Build a plan from an untyped raw batch, the write-boundary path.
    ///
    /// The cap applies to the raw batch before sanitisation: an over-long
    /// request fails wholesale. Individual items that fail
    /// [`PlanItem::sanitise`] are dropped silently and the request
    /// continues with the remainder.
    pub fn from_raw(owner: OwnerId, raw_items: &[Value]) -> Result<Self, PlanError> {
        if raw_items.len() > MAX_PLAN_ITEMS {
            return Err(PlanError::TooManyItems {
                count: raw_items.len(),
            });
        }
        let items = raw_items.iter().filter_map(PlanItem::sanitise).collect();
        Ok(Self {
            owner,
            items: dedup_by_id(items),
            updated_at: SystemTime::now(),
        })
    }

    /// Ids of the plan's items, in order.
    #[must_use]
    pub fn item_ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.id.as_str()).collect()
    }
}

fn dedup_by_id(items: Vec<PlanItem>) -> Vec<PlanItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn raw_item(id: u64) -> Value {
        json!({ "id": id.to_string() })
    }

    #[rstest]
    fn raw_batch_over_cap_fails_wholesale() {
        let raw: Vec<Value> = (0..51).map(raw_item).collect();
        let result = Plan::from_raw(OwnerId::new("u1"), &raw);
        assert_eq!(result.unwrap_err(), PlanError::TooManyItems { count: 51 });
    }

    #[rstest]
    fn raw_batch_at_cap_succeeds() {
        let raw: Vec<Value> = (0..50).map(raw_item).collect();
        let plan = Plan::from_raw(OwnerId::new("u1"), &raw).unwrap();
        assert_eq!(plan.items.len(), 50);
    }

    #[rstest]
    fn items_missing_id_are_dropped_silently() {
        let raw = vec![
            json!({ "id": "a", "title": "A" }),
            json!({ "title": "no id" }),
            json!({ "id": "b" }),
        ];
        let plan = Plan::from_raw(OwnerId::new("u1"), &raw).unwrap();
        assert_eq!(plan.item_ids(), vec!["a", "b"]);
    }

    #[rstest]
    fn duplicate_ids_keep_first_occurrence() {
        let raw = vec![
            json!({ "id": "a", "title": "first" }),
            json!({ "id": "b" }),
            json!({ "id": "a", "title": "second" }),
        ];
        let plan = Plan::from_raw(OwnerId::new("u1"), &raw).unwrap();
        assert_eq!(plan.item_ids(), vec!["a", "b"]);
        assert_eq!(plan.items.first().unwrap().title.as_deref(), Some("first"));
    }

    #[rstest]
    fn typed_constructor_enforces_cap() {
        let items: Vec<PlanItem> = (0..51).map(|i| PlanItem::new(i.to_string())).collect();
        assert!(Plan::new(OwnerId::new("u1"), items).is_err());
    }

    #[rstest]
    fn empty_plan_has_no_items() {
        let plan = Plan::empty(OwnerId::new("u1"));
        assert!(plan.items.is_empty());
    }
}
