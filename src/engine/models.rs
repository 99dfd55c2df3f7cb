use serde::{Deserialize, Serialize};

use crate::engine::geo;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Builds a point with the longitude normalized to [-180, 180).
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon: geo::normalize_longitude(lon),
        }
    }
}

/// Static vessel constraints applied during expansion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipModel {
    pub calm_speed_kts: f64,
    pub min_speed_kts: f64,
    pub draft_m: f64,
    pub safety_depth_buffer_m: f64,
    pub max_wave_height_m: f64,
    pub max_heading_change_deg: f64,
    /// Knots lost per meter of significant wave height.
    pub wave_drag_coefficient: f64,
}

impl Default for ShipModel {
    fn default() -> Self {
        Self {
            calm_speed_kts: 14.0,
            min_speed_kts: 3.0,
            draft_m: 7.0,
            safety_depth_buffer_m: 1.5,
            max_wave_height_m: 4.5,
            max_heading_change_deg: 45.0,
            wave_drag_coefficient: 0.8,
        }
    }
}

/// Tuning knobs for a solve. Out-of-range values are clamped on entry,
/// never rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub time_step_minutes: f64,
    pub heading_count: u32,
    pub merge_radius_nm: f64,
    pub goal_radius_nm: f64,
    pub max_hours: f64,
    /// Output polyline tolerance; <= 0 disables simplification.
    pub simplify_tolerance_nm: f64,
    /// Reserved for a post-processing leg-merge pass.
    pub min_leg_nm: f64,
    /// Reserved for a post-processing leg-merge pass.
    pub min_heading_deg: f64,
    /// Admissible headings stay within this window around the goal bearing.
    pub bearing_window_deg: f64,
    /// Maximum states kept per layer after cost pruning; 0 disables.
    pub beam_width: u32,
    pub min_time_step_minutes: f64,
    pub max_time_step_minutes: f64,
    pub complexity_threshold: f64,
    pub enable_adaptive_sampling: bool,
    pub enable_hierarchical_routing: bool,
    /// Routes longer than this run a coarse pass first.
    pub long_route_threshold_nm: f64,
    /// Reserved.
    pub coarse_grid_resolution_deg: f64,
    pub corridor_width_nm: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_step_minutes: 45.0,
            heading_count: 16,
            merge_radius_nm: 15.0,
            goal_radius_nm: 25.0,
            max_hours: 240.0,
            simplify_tolerance_nm: 5.0,
            min_leg_nm: 0.0,
            min_heading_deg: 0.0,
            bearing_window_deg: 25.0,
            beam_width: 0,
            min_time_step_minutes: 15.0,
            max_time_step_minutes: 60.0,
            complexity_threshold: 0.7,
            enable_adaptive_sampling: false,
            enable_hierarchical_routing: false,
            long_route_threshold_nm: 500.0,
            coarse_grid_resolution_deg: 1.0,
            corridor_width_nm: 60.0,
        }
    }
}

/// Advisory conditions recorded along a path. Flags never reject a
/// candidate; they surface in waypoints and diagnostics.
pub struct HazardFlags;

impl HazardFlags {
    pub const NONE: u32 = 0;
    pub const HIGH_WAVE: u32 = 1 << 0;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub start: GeoPoint,
    pub goal: GeoPoint,
    #[serde(default)]
    pub departure_time_hours: f64,
    #[serde(default)]
    pub ship: ShipModel,
    #[serde(default)]
    pub settings: Settings,
}

/// Environmental conditions at one point in space and time.
///
/// `depth_m == 0` denotes land and is honored verbatim; the other fields
/// default to open deep water when a host omits them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSample {
    /// Positive = eastward, knots.
    pub current_east_kn: f64,
    /// Positive = northward, knots.
    pub current_north_kn: f64,
    pub wave_height_m: f64,
    pub depth_m: f64,
}

impl Default for EnvironmentSample {
    fn default() -> Self {
        Self {
            current_east_kn: 0.0,
            current_north_kn: 0.0,
            wave_height_m: 0.0,
            depth_m: 5000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
    pub time_hours: f64,
    /// NaN on the departure waypoint, which has no inbound leg.
    pub heading_deg: f64,
    pub is_course_change: bool,
    pub max_wave_height_m: f64,
    pub hazard_flags: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub total_distance_nm: f64,
    pub eta_hours: f64,
    pub average_speed_kts: f64,
    pub max_wave_height_m: f64,
    pub step_count: u32,
    pub frontier_size: usize,
    pub reached_goal: bool,
    pub final_distance_to_goal_nm: f64,
    pub hazard_flags: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteResult {
    /// Simplified waypoint list; starts at the departure position.
    pub waypoints: Vec<Waypoint>,
    /// Every state on the backtracked path.
    pub waypoints_raw: Vec<Waypoint>,
    /// Raw index of each simplified waypoint.
    pub index_map: Vec<usize>,
    pub diagnostics: Diagnostics,
    pub is_coarse_route: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_point_normalizes_longitude() {
        let p = GeoPoint::new(10.0, 190.0);
        assert_eq!(p.lon, -170.0);
        let q = GeoPoint::new(-5.0, -540.0);
        assert_eq!(q.lon, -180.0);
    }

    #[test]
    fn request_json_fills_defaults() {
        let request: Request = serde_json::from_str(
            r#"{"start": {"lat": 0.0, "lon": 0.0}, "goal": {"lat": 0.0, "lon": 10.0}}"#,
        )
        .unwrap();
        assert_eq!(request.departure_time_hours, 0.0);
        assert_eq!(request.ship.calm_speed_kts, 14.0);
        assert_eq!(request.settings.heading_count, 16);
    }

    #[test]
    fn settings_json_overrides_single_field() {
        let settings: Settings = serde_json::from_str(r#"{"merge_radius_nm": 20.0}"#).unwrap();
        assert_eq!(settings.merge_radius_nm, 20.0);
        assert_eq!(settings.goal_radius_nm, Settings::default().goal_radius_nm);
    }

    #[test]
    fn environment_sample_defaults_to_deep_water() {
        let sample = EnvironmentSample::default();
        assert_eq!(sample.depth_m, 5000.0);
        assert_eq!(sample.wave_height_m, 0.0);
    }
}
