//! Mode-dependent travel-time estimation.
//!
//! The model converts a tour's total great-circle distance into a duration
//! using an average-speed assumption. It is a declared approximation:
//! distances are straight-line, not road-network, and callers must present
//! the result as an estimate.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::distance::distance_km;
use geo::Coord;

/// Speed penalty applied when toll roads are avoided, modelling slower
/// side-road routing.
pub const TOLL_AVOIDANCE_FACTOR: f64 = 0.7;

/// Vehicle used for the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// Passenger car, 40 km/h average.
    #[default]
    Car,
    /// Motorcycle, 45 km/h average.
    Motorcycle,
}

impl TravelMode {
    /// Base average speed for the mode, in km/h.
    #[must_use]
    pub fn base_speed_kmh(self) -> f64 {
        match self {
            Self::Car => 40.0,
            Self::Motorcycle => 45.0,
        }
    }
}

/// Settings the time estimate was derived under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TravelSettings {
    /// Vehicle mode.
    pub mode: TravelMode,
    /// Whether toll roads are avoided.
    pub avoid_tolls: bool,
}

impl TravelSettings {
    /// Effective average speed in km/h after the toll-avoidance penalty.
    #[must_use]
    pub fn average_speed_kmh(self) -> f64 {
        let base = self.mode.base_speed_kmh();
        if self.avoid_tolls {
            base * TOLL_AVOIDANCE_FACTOR
        } else {
            base
        }
    }
}

/// Estimated travel time, reported as whole hours plus rounded minutes.
///
/// # Examples
/// ```
/// use itsuki_core::{TravelEstimate, TravelMode, TravelSettings};
///
/// let settings = TravelSettings { mode: TravelMode::Car, avoid_tolls: false };
/// let estimate = TravelEstimate::from_distance(settings, 80.0);
/// assert_eq!(estimate.label(), "2h 0m");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelEstimate {
    /// Whole hours.
    pub hours: u64,
    /// Remainder minutes, rounded to the nearest minute.
    pub minutes: u64,
    /// The same estimate as an exact duration.
    pub duration: Duration,
}

impl TravelEstimate {
    /// Derive an estimate from a total distance under the given settings.
    ///
    /// Minute rounding carries into the hour, so 1h 59.6m reports as
    /// "2h 0m".
    #[must_use]
    pub fn from_distance(settings: TravelSettings, total_distance_km: f64) -> Self {
        let hours_exact = (total_distance_km / settings.average_speed_kmh()).max(0.0);
        let duration = Duration::from_secs_f64(hours_exact * 3600.0);

        let mut hours = hours_exact.trunc() as u64;
        let mut minutes = ((hours_exact - hours_exact.trunc()) * 60.0).round() as u64;
        if minutes == 60 {
            hours += 1;
            minutes = 0;
        }
        Self {
            hours,
            minutes,
            duration,
        }
    }

    /// Human-readable form, e.g. `"2h 51m"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}h {}m", self.hours, self.minutes)
    }
}

/// Total distance of visiting `points` in the given order.
///
/// The sum of consecutive great-circle legs; zero for fewer than two
/// points. This is the "naive" tour the optimizer is measured against.
#[must_use]
pub fn path_distance_km(points: &[Coord<f64>]) -> f64 {
    points
        .windows(2)
        .map(|pair| match pair {
            [from, to] => distance_km(*from, *to),
            _ => 0.0,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TravelMode::Car, false, 40.0)]
    #[case(TravelMode::Motorcycle, false, 45.0)]
    #[case(TravelMode::Car, true, 28.0)]
    #[case(TravelMode::Motorcycle, true, 31.5)]
    fn average_speed_reflects_mode_and_tolls(
        #[case] mode: TravelMode,
        #[case] avoid_tolls: bool,
        #[case] expected: f64,
    ) {
        let settings = TravelSettings { mode, avoid_tolls };
        assert!((settings.average_speed_kmh() - expected).abs() < 1e-9);
    }

    #[rstest]
    fn eighty_km_by_car_is_two_hours_flat() {
        let settings = TravelSettings {
            mode: TravelMode::Car,
            avoid_tolls: false,
        };
        let estimate = TravelEstimate::from_distance(settings, 80.0);
        assert_eq!((estimate.hours, estimate.minutes), (2, 0));
        assert_eq!(estimate.label(), "2h 0m");
    }

    #[rstest]
    fn eighty_km_avoiding_tolls_is_two_hours_fifty_one() {
        let settings = TravelSettings {
            mode: TravelMode::Car,
            avoid_tolls: true,
        };
        let estimate = TravelEstimate::from_distance(settings, 80.0);
        assert_eq!((estimate.hours, estimate.minutes), (2, 51));
        assert_eq!(estimate.label(), "2h 51m");
    }

    #[rstest]
    fn minute_rounding_carries_into_the_hour() {
        // 79.8 km at 40 km/h = 1.995 h = 1 h 59.7 m, which rounds to 2h 0m.
        let settings = TravelSettings {
            mode: TravelMode::Car,
            avoid_tolls: false,
        };
        let estimate = TravelEstimate::from_distance(settings, 79.8);
        assert_eq!((estimate.hours, estimate.minutes), (2, 0));
    }

    #[rstest]
    fn zero_distance_is_zero_time() {
        let estimate = TravelEstimate::from_distance(TravelSettings::default(), 0.0);
        assert_eq!((estimate.hours, estimate.minutes), (0, 0));
        assert_eq!(estimate.duration, Duration::ZERO);
    }

    #[rstest]
    fn path_distance_sums_consecutive_legs() {
        let points = vec![
            Coord { x: 139.0, y: 35.0 },
            Coord { x: 139.0, y: 35.01 },
            Coord { x: 138.0, y: 34.0 },
        ];
        let total = path_distance_km(&points);
        let leg1 = distance_km(points[0], points[1]);
        let leg2 = distance_km(points[1], points[2]);
        assert!((total - (leg1 + leg2)).abs() < 1e-9);
    }

    #[rstest]
    fn path_distance_of_single_point_is_zero() {
        assert_eq!(path_distance_km(&[Coord { x: 0.0, y: 0.0 }]), 0.0);
    }
}
