//! Swept corridor around a coarse route, used to gate the fine search.

use serde::{Deserialize, Serialize};

use crate::engine::geo::{great_circle_bearing, great_circle_distance, EARTH_RADIUS_NM};
use crate::engine::models::GeoPoint;

const EPS: f64 = 1e-6;

/// Polyline centerline plus a half-width. A point is inside when any
/// centerline segment is within `width_nm` cross-track distance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Corridor {
    pub centerline: Vec<GeoPoint>,
    pub width_nm: f64,
}

impl Corridor {
    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.centerline
            .windows(2)
            .any(|seg| cross_track_distance(point, &seg[0], &seg[1]) < self.width_nm)
    }
}

/// Great-circle cross-track distance from `point` to the segment `(a, b)`,
/// in nautical miles.
///
/// When the along-track projection falls outside the segment the nearer
/// endpoint distance is returned instead.
pub fn cross_track_distance(point: &GeoPoint, a: &GeoPoint, b: &GeoPoint) -> f64 {
    let dist_ap = great_circle_distance(a, point);
    if dist_ap < EPS {
        return 0.0;
    }

    let bearing_ap = great_circle_bearing(a, point);
    let bearing_ab = great_circle_bearing(a, b);
    let angle = (bearing_ap - bearing_ab).to_radians();

    let delta13 = dist_ap / EARTH_RADIUS_NM;
    let sin_xt = (delta13.sin() * angle.sin()).clamp(-1.0, 1.0);
    let cross_track = (sin_xt.asin() * EARTH_RADIUS_NM).abs();

    let along_track = (delta13.sin() * angle.cos()).atan2(delta13.cos()) * EARTH_RADIUS_NM;
    let dist_ab = great_circle_distance(a, b);

    if along_track < 0.0 || along_track > dist_ab {
        return dist_ap.min(great_circle_distance(b, point));
    }
    cross_track
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abeam_point_measures_perpendicular_offset() {
        // One degree of latitude abeam an equatorial segment.
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 10.0);
        let p = GeoPoint::new(1.0, 5.0);
        let d = cross_track_distance(&p, &a, &b);
        assert!((d - 60.0).abs() < 0.2, "got {d}");
    }

    #[test]
    fn point_on_the_segment_is_at_zero() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 10.0);
        let p = GeoPoint::new(0.0, 4.0);
        assert!(cross_track_distance(&p, &a, &b) < 1e-6);
    }

    #[test]
    fn beyond_the_end_falls_back_to_endpoint_distance() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 10.0);
        let p = GeoPoint::new(0.0, 12.0);
        let d = cross_track_distance(&p, &a, &b);
        let expected = great_circle_distance(&b, &p);
        assert!((d - expected).abs() < 1e-9);
    }

    #[test]
    fn before_the_start_falls_back_to_endpoint_distance() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 10.0);
        let p = GeoPoint::new(1.0, -2.0);
        let d = cross_track_distance(&p, &a, &b);
        let expected = great_circle_distance(&a, &p);
        assert!((d - expected).abs() < 1e-9);
    }

    #[test]
    fn corridor_accepts_any_segment_within_width() {
        let corridor = Corridor {
            centerline: vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 5.0),
                GeoPoint::new(2.0, 10.0),
            ],
            width_nm: 70.0,
        };
        assert!(corridor.contains(&GeoPoint::new(1.0, 2.5)));
        assert!(corridor.contains(&GeoPoint::new(1.5, 8.0)));
        assert!(!corridor.contains(&GeoPoint::new(5.0, 2.5)));
    }

    #[test]
    fn degenerate_corridor_contains_nothing() {
        let corridor = Corridor {
            centerline: vec![GeoPoint::new(0.0, 0.0)],
            width_nm: 50.0,
        };
        assert!(!corridor.contains(&GeoPoint::new(0.0, 0.1)));
    }
}
