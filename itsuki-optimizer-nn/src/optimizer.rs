//! Greedy nearest-neighbour implementation of `RouteOptimizer`.

use geo::Coord;
use itsuki_core::{
    OptimizeError, PlanItem, RouteOptimizer, RouteResult, TravelEstimate, TravelSettings,
    distance_km,
};

/// Greedy tour construction over great-circle distance.
///
/// The tour is seeded with the first geolocated stop in input order; each
/// step appends the closest unvisited stop, ties broken by
/// first-encountered. Deterministic for a fixed input order, with no
/// backtracking; a classic approximation rather than an exact shortest
/// tour.
///
/// # Examples
/// ```
/// use itsuki_core::{RouteOptimizer, TravelSettings, test_support::pinned_item};
/// use itsuki_optimizer_nn::NearestNeighbourOptimizer;
///
/// let items = vec![
///     pinned_item("home", 35.0, 139.0),
///     pinned_item("far", 34.0, 138.0),
///     pinned_item("near", 35.01, 139.0),
/// ];
/// let result = NearestNeighbourOptimizer
///     .optimize(&items, TravelSettings::default())
///     .expect("two or more geolocated stops");
/// let order: Vec<&str> = result.ordered_items.iter().map(|i| i.id.as_str()).collect();
/// assert_eq!(order, vec!["home", "near", "far"]);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct NearestNeighbourOptimizer;

impl RouteOptimizer for NearestNeighbourOptimizer {
    fn optimize(
        &self,
        items: &[PlanItem],
        settings: TravelSettings,
    ) -> Result<RouteResult, OptimizeError> {
        let mut pending: Vec<(PlanItem, Coord<f64>)> = items
            .iter()
            .filter_map(|item| item.coord().map(|coord| (item.clone(), coord)))
            .collect();
        if pending.len() < 2 {
            return Err(OptimizeError::NotEnoughLocations);
        }

        let mut ordered = Vec::with_capacity(pending.len());
        let (seed, mut current) = pending.remove(0);
        ordered.push(seed);

        #[expect(
            clippy::float_arithmetic,
            reason = "tour length is an accumulated great-circle distance"
        )]
        let total_distance_km = {
            let mut total = 0.0;
            while !pending.is_empty() {
                let mut best_index = 0;
                let mut best_leg = f64::INFINITY;
                for (index, (_, coord)) in pending.iter().enumerate() {
                    let leg = distance_km(current, *coord);
                    // Strict comparison keeps the first-encountered stop on ties.
                    if leg < best_leg {
                        best_leg = leg;
                        best_index = index;
                    }
                }
                let (item, coord) = pending.remove(best_index);
                total += best_leg;
                current = coord;
                ordered.push(item);
            }
            total
        };

        log::debug!(
            "nearest-neighbour tour over {} stops: {:.1} km",
            ordered.len(),
            total_distance_km
        );

        Ok(RouteResult {
            ordered_items: ordered,
            total_distance_km,
            estimate: TravelEstimate::from_distance(settings, total_distance_km),
            settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itsuki_core::test_support::pinned_item;
    use rstest::rstest;

    #[rstest]
    #[case(Vec::new())]
    #[case(vec![pinned_item("only", 35.0, 139.0)])]
    #[case(vec![pinned_item("only", 35.0, 139.0), PlanItem::new("no coords")])]
    fn fewer_than_two_geolocated_stops_is_recoverable(#[case] items: Vec<PlanItem>) {
        let result = NearestNeighbourOptimizer.optimize(&items, TravelSettings::default());
        assert_eq!(result.unwrap_err(), OptimizeError::NotEnoughLocations);
    }

    #[rstest]
    fn coordinate_less_stops_never_enter_the_tour() {
        let items = vec![
            pinned_item("a", 35.0, 139.0),
            PlanItem::new("unpinned"),
            pinned_item("b", 35.01, 139.0),
        ];
        let result = NearestNeighbourOptimizer
            .optimize(&items, TravelSettings::default())
            .expect("optimize");
        let order: Vec<&str> = result
            .ordered_items
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[rstest]
    fn ties_are_broken_by_first_encountered() {
        // Two stops equidistant from the seed; input order decides.
        let items = vec![
            pinned_item("seed", 0.0, 0.0),
            pinned_item("east", 0.0, 1.0),
            pinned_item("west", 0.0, -1.0),
        ];
        let result = NearestNeighbourOptimizer
            .optimize(&items, TravelSettings::default())
            .expect("optimize");
        let order: Vec<&str> = result
            .ordered_items
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(order, vec!["seed", "east", "west"]);
    }
}
