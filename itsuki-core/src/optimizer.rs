//! Tour construction over a plan's geolocated stops.
//!
//! The [`RouteOptimizer`] trait is the seam between the plan model and a
//! concrete tour heuristic. Implementations consume the stop list and
//! visit only stops with resolved coordinates. When fewer than two such
//! stops exist they report a recoverable error rather than panicking or
//! returning a partial tour, since a one-stop plan is a normal
//! interactive state.

use serde::Serialize;
use thiserror::Error;

use crate::{PlanItem, TravelEstimate, TravelSettings};

/// Errors returned by [`RouteOptimizer::optimize`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizeError {
    /// Fewer than two stops carry resolved coordinates.
    #[error("need at least 2 locations")]
    NotEnoughLocations,
}

/// An optimised visiting order with its distance and time estimate.
///
/// `ordered_items` is a permutation of the geolocated input stops. The
/// original full stop list, including coordinate-less stops, remains the
/// source of truth for the unoptimised display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    /// Stops in optimised visiting order.
    pub ordered_items: Vec<PlanItem>,
    /// Sum of great-circle legs along the optimised order, in km.
    pub total_distance_km: f64,
    /// Time estimate derived from the settings' average speed.
    pub estimate: TravelEstimate,
    /// The settings the estimate was derived under.
    pub settings: TravelSettings,
}

/// Compute an approximate shortest visiting order for a set of stops.
///
/// Implementations must be deterministic for a fixed input order and must
/// be `Send + Sync` so a single optimizer can serve concurrent requests.
pub trait RouteOptimizer: Send + Sync {
    /// Order `items` into a tour under `settings`.
    ///
    /// Stops without resolved coordinates never enter the tour. Returns
    /// [`OptimizeError::NotEnoughLocations`] when fewer than two stops
    /// remain after that filter.
    fn optimize(
        &self,
        items: &[PlanItem],
        settings: TravelSettings,
    ) -> Result<RouteResult, OptimizeError>;
}

/// The subset of `items` carrying resolved coordinates, in input order.
///
/// Callers use this to preview what an optimizer will actually tour.
#[must_use]
pub fn geolocated(items: &[PlanItem]) -> Vec<PlanItem> {
    items
        .iter()
        .filter(|item| item.coord().is_some())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Location;
    use rstest::rstest;

    fn pinned(id: &str, lat: f64, lng: f64) -> PlanItem {
        PlanItem {
            location: Some(Location {
                lat: Some(lat),
                lng: Some(lng),
                address: None,
            }),
            ..PlanItem::new(id)
        }
    }

    #[rstest]
    fn geolocated_filters_out_coordinate_less_stops() {
        let items = vec![
            pinned("a", 35.0, 139.0),
            PlanItem::new("b"),
            pinned("c", 34.0, 138.0),
        ];
        let kept = geolocated(&items);
        let ids: Vec<&str> = kept.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[rstest]
    fn geolocated_preserves_input_order() {
        let items = vec![pinned("z", 1.0, 1.0), pinned("a", 2.0, 2.0)];
        let ids: Vec<String> = geolocated(&items).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["z", "a"]);
    }
}
