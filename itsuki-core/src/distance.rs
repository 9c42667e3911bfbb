//! Great-circle distance between geographic coordinates.
//!
//! The haversine formula over a spherical Earth is accurate to well under a
//! percent for the distances a trip plan covers, which is ample given the
//! travel-time model is itself a straight-line approximation.

use geo::Coord;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two WGS84 coordinates.
///
/// Coordinates follow the crate convention `x = longitude`, `y = latitude`,
/// both in decimal degrees. The function is pure and symmetric, and returns
/// exactly `0.0` for coincident points. Inputs are not range-checked:
/// out-of-range degrees produce a mathematically defined but geographically
/// meaningless value.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use itsuki_core::distance_km;
///
/// let tokyo = Coord { x: 139.69, y: 35.69 };
/// let osaka = Coord { x: 135.50, y: 34.69 };
/// let d = distance_km(tokyo, osaka);
/// assert!((390.0..410.0).contains(&d));
/// ```
#[must_use]
pub fn distance_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let delta_lat = (b.y - a.y).to_radians();
    let delta_lng = (b.x - a.x).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Float error can push h fractionally above 1 near the antipode, and
    // asin would then return NaN.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn coord(lng: f64, lat: f64) -> Coord<f64> {
        Coord { x: lng, y: lat }
    }

    #[rstest]
    #[case(coord(139.0, 35.0))]
    #[case(coord(0.0, 0.0))]
    #[case(coord(-180.0, -90.0))]
    fn coincident_points_have_zero_distance(#[case] point: Coord<f64>) {
        assert_eq!(distance_km(point, point), 0.0);
    }

    #[rstest]
    #[case(coord(139.0, 35.0), coord(139.0, 35.01))]
    #[case(coord(139.77, 35.68), coord(135.50, 34.69))]
    #[case(coord(-0.13, 51.51), coord(2.35, 48.86))]
    fn distance_is_symmetric(#[case] a: Coord<f64>, #[case] b: Coord<f64>) {
        let forward = distance_km(a, b);
        let backward = distance_km(b, a);
        assert!((forward - backward).abs() <= forward.abs() * 1e-9);
    }

    #[rstest]
    fn one_hundredth_degree_of_latitude_is_about_one_km() {
        let d = distance_km(coord(139.0, 35.0), coord(139.0, 35.01));
        assert!((1.0..1.2).contains(&d), "got {d}");
    }

    #[rstest]
    fn tokyo_to_osaka_is_about_four_hundred_km() {
        let d = distance_km(coord(139.77, 35.68), coord(135.50, 34.69));
        assert!((390.0..410.0).contains(&d), "got {d}");
    }

    #[rstest]
    #[case(coord(0.0, 0.0), coord(180.0, 0.0))]
    #[case(coord(-90.0, 10.0), coord(90.0, -10.0))]
    #[case(coord(0.0, 0.0), coord(179.999_999, 0.000_001))]
    fn antipodal_points_yield_a_finite_half_circumference(
        #[case] a: Coord<f64>,
        #[case] b: Coord<f64>,
    ) {
        let d = distance_km(a, b);
        assert!(d.is_finite(), "got {d}");
        assert!((20_000.0..20_030.0).contains(&d), "got {d}");
    }
}
