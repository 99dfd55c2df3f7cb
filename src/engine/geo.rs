//! Great-circle geometry on a spherical earth, in nautical miles.

use crate::engine::models::GeoPoint;

/// Mean earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Brings a finite longitude into [-180, 180) by repeated 360-degree
/// shifts; non-finite values pass through untouched.
pub fn normalize_longitude(mut lon: f64) -> f64 {
    if !lon.is_finite() {
        return lon;
    }
    while lon >= 180.0 {
        lon -= 360.0;
    }
    while lon < -180.0 {
        lon += 360.0;
    }
    lon
}

/// Minimum unsigned angular separation between two headings, in [0, 180].
pub fn heading_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// Haversine distance between two points in nautical miles.
///
/// The longitude delta is reduced to [-pi, pi] first so antimeridian
/// crossings measure the short way around.
pub fn great_circle_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let mut dlon = (b.lon - a.lon).to_radians();

    if dlon > std::f64::consts::PI {
        dlon -= 2.0 * std::f64::consts::PI;
    } else if dlon < -std::f64::consts::PI {
        dlon += 2.0 * std::f64::consts::PI;
    }

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());
    EARTH_RADIUS_NM * c
}

/// Initial bearing from one point toward another, degrees in (-180, 180].
pub fn great_circle_bearing(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlon = (to.lon - from.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    y.atan2(x).to_degrees()
}

/// Forward geodesic: the point reached by sailing `distance_nm` on a fixed
/// initial heading. The returned longitude is normalized.
pub fn advance_position(origin: &GeoPoint, heading_deg: f64, distance_nm: f64) -> GeoPoint {
    let heading_rad = heading_deg.to_radians();
    let angular_distance = distance_nm / EARTH_RADIUS_NM;

    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let lat2 = (sin_lat1 * cos_ad + cos_lat1 * sin_ad * heading_rad.cos()).asin();
    let lon2 = lon1
        + (heading_rad.sin() * sin_ad * cos_lat1).atan2(cos_ad - sin_lat1 * lat2.sin());

    GeoPoint {
        lat: lat2.to_degrees(),
        lon: normalize_longitude(lon2.to_degrees()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_equator_is_sixty_miles() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let d = great_circle_distance(&a, &b);
        assert!((d - 60.04).abs() < 0.1, "got {d}");
    }

    #[test]
    fn distance_is_zero_for_identical_points() {
        let p = GeoPoint::new(48.66, -2.03);
        assert!(great_circle_distance(&p, &p) < 1e-9);
    }

    #[test]
    fn distance_takes_short_way_across_antimeridian() {
        let a = GeoPoint::new(0.0, 179.5);
        let b = GeoPoint::new(0.0, -179.5);
        let d = great_circle_distance(&a, &b);
        assert!((d - 60.04).abs() < 0.1, "got {d}");
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert!((great_circle_bearing(&origin, &GeoPoint::new(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((great_circle_bearing(&origin, &GeoPoint::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((great_circle_bearing(&origin, &GeoPoint::new(-1.0, 0.0)).abs() - 180.0).abs() < 1e-9);
        assert!((great_circle_bearing(&origin, &GeoPoint::new(0.0, -1.0)) + 90.0).abs() < 1e-9);
    }

    #[test]
    fn advance_round_trips_against_distance() {
        let origin = GeoPoint::new(12.5, -44.0);
        for heading in [0.0, 37.0, 90.0, 145.5, 210.0, 359.0] {
            for distance in [0.5, 10.0, 250.0, 1500.0] {
                let dest = advance_position(&origin, heading, distance);
                let measured = great_circle_distance(&origin, &dest);
                assert!(
                    (measured - distance).abs() < 1e-6,
                    "heading {heading}, distance {distance}, measured {measured}"
                );
            }
        }
    }

    #[test]
    fn advance_normalizes_across_antimeridian() {
        let origin = GeoPoint::new(0.0, 179.9);
        let dest = advance_position(&origin, 90.0, 60.0);
        assert!(dest.lon >= -180.0 && dest.lon < 180.0);
        assert!(dest.lon < 0.0, "should wrap east into the western hemisphere");
    }

    #[test]
    fn normalize_longitude_principal_range() {
        for lon in [-720.0, -540.0, -360.5, -180.0, -179.9, 0.0, 179.9, 180.0, 360.0, 725.0] {
            let n = normalize_longitude(lon);
            assert!((-180.0..180.0).contains(&n), "lon {lon} -> {n}");
        }
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(360.0), 0.0);
        assert_eq!(normalize_longitude(45.0 + 5.0 * 360.0), 45.0);
    }

    #[test]
    fn heading_difference_is_symmetric_and_bounded() {
        assert_eq!(heading_difference(350.0, 10.0), 20.0);
        assert_eq!(heading_difference(10.0, 350.0), 20.0);
        assert_eq!(heading_difference(0.0, 180.0), 180.0);
        assert_eq!(heading_difference(90.0, 90.0), 0.0);
        assert_eq!(heading_difference(0.0, 720.0), 0.0);
    }
}
