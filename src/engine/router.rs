//! Frontier-based isochrone expansion and the coarse/fine hierarchical
//! driver on top of it.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use log::{debug, info};

use crate::engine::corridor::Corridor;
use crate::engine::error::RouteError;
use crate::engine::geo::{
    advance_position, great_circle_bearing, great_circle_distance, heading_difference,
};
use crate::engine::models::{
    Diagnostics, EnvironmentSample, GeoPoint, HazardFlags, Request, RouteResult, Settings,
    Waypoint,
};
use crate::engine::physics;
use crate::engine::simplify::simplify_indices;

const EPS: f64 = 1e-6;
/// Candidates advancing less than this per layer are discarded as stalled.
const MIN_STEP_DISTANCE_NM: f64 = 0.05;
/// Spacing of the land/depth samples along a candidate leg.
const SAMPLE_SPACING_NM: f64 = 2.0;

/// One node of the search arena. Nodes are append-only within a solve and
/// reference their parent by index, so backtracking survives vector growth.
#[derive(Debug, Clone)]
struct State {
    position: GeoPoint,
    time_hours: f64,
    /// NaN until the first leg fixes a heading.
    heading_deg: f64,
    parent: Option<usize>,
    cumulative_distance_nm: f64,
    /// Running maximum of significant wave height along the chain.
    max_wave_height_m: f64,
    hazard_flags: u32,
}

#[derive(Debug, Default)]
pub struct IsochroneRouter;

impl IsochroneRouter {
    pub fn new() -> Self {
        Self
    }

    /// Computes a near-time-optimal route. The sampler supplies currents,
    /// waves and depth for any `(lat, lon, time_hours)` the engine probes.
    pub fn solve<F>(&self, request: &Request, sampler: &F) -> Result<RouteResult, RouteError>
    where
        F: Fn(f64, f64, f64) -> EnvironmentSample,
    {
        self.solve_with_debug(request, sampler, |_| {})
    }

    /// Like [`solve`](Self::solve), but invokes `debug_hook` with the coarse
    /// result (marked `is_coarse_route`) before the corridor-gated fine pass
    /// runs. The hook is not called when the route is solved in one pass.
    pub fn solve_with_debug<F, D>(
        &self,
        request: &Request,
        sampler: &F,
        mut debug_hook: D,
    ) -> Result<RouteResult, RouteError>
    where
        F: Fn(f64, f64, f64) -> EnvironmentSample,
        D: FnMut(&RouteResult),
    {
        validate(request)?;

        let direct_nm = great_circle_distance(&request.start, &request.goal);
        if request.settings.enable_hierarchical_routing
            && direct_nm > request.settings.long_route_threshold_nm
        {
            let mut coarse_request = request.clone();
            coarse_request.settings.time_step_minutes = 90.0;
            coarse_request.settings.heading_count = 12;
            coarse_request.settings.merge_radius_nm = 40.0;
            coarse_request.settings.beam_width = 300;
            coarse_request.settings.simplify_tolerance_nm = 50.0;
            coarse_request.settings.enable_adaptive_sampling = false;

            let mut coarse = self.solve_internal(&coarse_request, sampler, None);
            coarse.is_coarse_route = true;
            debug_hook(&coarse);

            if coarse.waypoints.len() < 2 {
                info!("coarse pass produced no usable centerline, falling back to a single pass");
                return Ok(self.solve_internal(request, sampler, None));
            }

            let corridor = Corridor {
                centerline: coarse
                    .waypoints
                    .iter()
                    .map(|wp| GeoPoint {
                        lat: wp.lat,
                        lon: wp.lon,
                    })
                    .collect(),
                width_nm: request.settings.corridor_width_nm,
            };
            return Ok(self.solve_internal(request, sampler, Some(&corridor)));
        }

        Ok(self.solve_internal(request, sampler, None))
    }

    fn solve_internal<F>(
        &self,
        request: &Request,
        sampler: &F,
        corridor: Option<&Corridor>,
    ) -> RouteResult
    where
        F: Fn(f64, f64, f64) -> EnvironmentSample,
    {
        let ship = &request.ship;
        let settings = clamp_settings(&request.settings);

        let mut step_minutes = settings.time_step_minutes;
        let mut delta_hours = step_minutes / 60.0;
        let heading_increment = 360.0 / f64::from(settings.heading_count);

        let mut states: Vec<State> = Vec::with_capacity(8192);
        states.push(State {
            position: request.start,
            time_hours: request.departure_time_hours,
            heading_deg: f64::NAN,
            parent: None,
            cumulative_distance_nm: 0.0,
            max_wave_height_m: 0.0,
            hazard_flags: HazardFlags::NONE,
        });
        let mut frontier: Vec<usize> = vec![0];

        let mut best_goal_index: Option<usize> = None;
        let mut best_goal_arrival = f64::INFINITY;
        let mut goal_reached = false;

        let mut closest_index = 0usize;
        let mut closest_distance = great_circle_distance(&request.start, &request.goal);

        let mut step_count = 0u32;
        let mut last_frontier_size = 1usize;
        let max_steps = (settings.max_hours / (settings.min_time_step_minutes / 60.0)) as u32 + 1;

        while !frontier.is_empty() && step_count < max_steps {
            step_count += 1;

            if settings.enable_adaptive_sampling && step_count > 1 {
                let mut total_complexity = 0.0;
                for &idx in &frontier {
                    let state = &states[idx];
                    let env = sampler(state.position.lat, state.position.lon, state.time_hours);
                    total_complexity += environment_complexity(&env);
                }
                let avg = total_complexity / frontier.len() as f64;
                // The division is undefined only at a threshold of exactly
                // 0.3; a negative span below that flips the factor's sign.
                let span = settings.complexity_threshold - 0.3;
                let factor = if span == 0.0 {
                    if avg > 0.3 {
                        1.0
                    } else {
                        0.0
                    }
                } else {
                    ((avg - 0.3) / span).clamp(0.0, 1.0)
                };
                step_minutes = settings.max_time_step_minutes
                    - factor * (settings.max_time_step_minutes - settings.min_time_step_minutes);
                delta_hours = step_minutes / 60.0;
            }

            let mut next_frontier: Vec<usize> =
                Vec::with_capacity(frontier.len() * settings.heading_count as usize);
            let mut reached_this_layer = false;

            for &idx in &frontier {
                let current = states[idx].clone();
                let env_src =
                    sampler(current.position.lat, current.position.lon, current.time_hours);
                let bearing_to_goal = great_circle_bearing(&current.position, &request.goal);

                for h in 0..settings.heading_count {
                    let heading = heading_increment * f64::from(h);

                    if heading_difference(bearing_to_goal, heading) > settings.bearing_window_deg {
                        continue;
                    }
                    if !current.heading_deg.is_nan()
                        && heading_difference(current.heading_deg, heading)
                            > ship.max_heading_change_deg
                    {
                        continue;
                    }

                    let ground = physics::ground_speed(ship, &env_src, heading);
                    let distance_nm = ground.max(ship.min_speed_kts) * delta_hours;
                    if distance_nm < MIN_STEP_DISTANCE_NM {
                        continue;
                    }

                    let position = advance_position(&current.position, heading, distance_nm);
                    let time_hours = current.time_hours + delta_hours;

                    // Sample the leg itself, not just its endpoints, so a
                    // route cannot cut a corner across land or a shoal.
                    let min_depth = ship.draft_m + ship.safety_depth_buffer_m;
                    let sample_count =
                        ((distance_nm / SAMPLE_SPACING_NM).ceil() as usize).clamp(2, 50);
                    let mut blocked = false;
                    for s in 1..sample_count {
                        let fraction = s as f64 / sample_count as f64;
                        let midpoint =
                            advance_position(&current.position, heading, distance_nm * fraction);
                        let env_mid = sampler(
                            midpoint.lat,
                            midpoint.lon,
                            current.time_hours + delta_hours * fraction,
                        );
                        if env_mid.depth_m < min_depth || env_mid.depth_m == 0.0 {
                            blocked = true;
                            break;
                        }
                    }
                    if blocked {
                        continue;
                    }

                    if let Some(corridor) = corridor {
                        if !corridor.contains(&position) {
                            continue;
                        }
                    }

                    let env_dst = sampler(position.lat, position.lon, time_hours);
                    if env_dst.depth_m + EPS < min_depth {
                        continue;
                    }

                    let peak_wave = current
                        .max_wave_height_m
                        .max(env_src.wave_height_m)
                        .max(env_dst.wave_height_m);
                    let wave_hazard = env_dst.wave_height_m > ship.max_wave_height_m;

                    let candidate = State {
                        position,
                        time_hours,
                        heading_deg: heading,
                        parent: Some(idx),
                        cumulative_distance_nm: current.cumulative_distance_nm + distance_nm,
                        max_wave_height_m: peak_wave,
                        hazard_flags: current.hazard_flags
                            | if wave_hazard {
                                HazardFlags::HIGH_WAVE
                            } else {
                                HazardFlags::NONE
                            },
                    };

                    // Spatial dominance: the first queued state within the
                    // merge radius absorbs the candidate, unless the
                    // candidate arrives strictly earlier.
                    let mut dominated = false;
                    let mut replace_index = None;
                    for &existing_index in &next_frontier {
                        let existing = &states[existing_index];
                        if great_circle_distance(&existing.position, &candidate.position)
                            <= settings.merge_radius_nm
                        {
                            dominated = true;
                            if candidate.time_hours + EPS < existing.time_hours {
                                replace_index = Some(existing_index);
                            }
                            break;
                        }
                    }
                    if dominated && replace_index.is_none() {
                        continue;
                    }

                    let candidate_index = match replace_index {
                        Some(slot) => {
                            states[slot] = candidate;
                            slot
                        }
                        None => {
                            states.push(candidate);
                            let new_index = states.len() - 1;
                            next_frontier.push(new_index);
                            new_index
                        }
                    };

                    let goal_distance =
                        great_circle_distance(&states[candidate_index].position, &request.goal);
                    if goal_distance < closest_distance {
                        closest_distance = goal_distance;
                        closest_index = candidate_index;
                    }
                    if goal_distance <= settings.goal_radius_nm {
                        reached_this_layer = true;
                        if states[candidate_index].time_hours < best_goal_arrival {
                            best_goal_arrival = states[candidate_index].time_hours;
                            best_goal_index = Some(candidate_index);
                            goal_reached = true;
                        }
                    }
                }
            }

            last_frontier_size = next_frontier.len();

            let beam = settings.beam_width as usize;
            if beam > 0 && next_frontier.len() > beam {
                // Stable sort keeps insertion order on cost ties.
                next_frontier.sort_by(|&a, &b| {
                    let cost_a = states[a].cumulative_distance_nm
                        + great_circle_distance(&states[a].position, &request.goal);
                    let cost_b = states[b].cumulative_distance_nm
                        + great_circle_distance(&states[b].position, &request.goal);
                    cost_a.partial_cmp(&cost_b).unwrap_or(Ordering::Equal)
                });
                next_frontier.truncate(beam);
                last_frontier_size = beam;
            }

            debug!(
                "layer {step_count}: {} survivors, dt {step_minutes:.1} min",
                next_frontier.len()
            );

            if reached_this_layer {
                break;
            }
            frontier = next_frontier;
        }

        let final_index = best_goal_index.unwrap_or(closest_index);
        let final_state = states[final_index].clone();

        let mut backtrack = Vec::new();
        let mut cursor = Some(final_index);
        while let Some(index) = cursor {
            backtrack.push(index);
            cursor = states[index].parent;
        }
        backtrack.reverse();

        let waypoints_raw: Vec<Waypoint> = backtrack
            .iter()
            .map(|&index| {
                let state = &states[index];
                Waypoint {
                    lat: state.position.lat,
                    lon: state.position.lon,
                    time_hours: state.time_hours,
                    heading_deg: state.heading_deg,
                    is_course_change: false,
                    max_wave_height_m: state.max_wave_height_m,
                    hazard_flags: state.hazard_flags,
                }
            })
            .collect();

        let (waypoints, index_map) =
            if settings.simplify_tolerance_nm > 0.0 && waypoints_raw.len() > 2 {
                let path: Vec<GeoPoint> = waypoints_raw
                    .iter()
                    .map(|wp| GeoPoint {
                        lat: wp.lat,
                        lon: wp.lon,
                    })
                    .collect();
                let preserve: BTreeSet<usize> = [0, path.len() - 1].into_iter().collect();
                let kept = simplify_indices(&path, settings.simplify_tolerance_nm, &preserve);
                let waypoints = kept.iter().map(|&i| waypoints_raw[i]).collect();
                (waypoints, kept)
            } else {
                (waypoints_raw.clone(), (0..waypoints_raw.len()).collect())
            };

        let travel_time = final_state.time_hours - request.departure_time_hours;
        let diagnostics = Diagnostics {
            total_distance_nm: final_state.cumulative_distance_nm,
            eta_hours: final_state.time_hours,
            average_speed_kts: if travel_time > EPS {
                final_state.cumulative_distance_nm / travel_time
            } else {
                0.0
            },
            max_wave_height_m: final_state.max_wave_height_m,
            step_count,
            frontier_size: last_frontier_size,
            reached_goal: goal_reached,
            final_distance_to_goal_nm: great_circle_distance(&final_state.position, &request.goal),
            hazard_flags: final_state.hazard_flags,
        };

        info!(
            "isochrone pass finished: {} layers, {} states, reached_goal={}",
            step_count,
            states.len(),
            goal_reached
        );

        RouteResult {
            waypoints,
            waypoints_raw,
            index_map,
            diagnostics,
            is_coarse_route: false,
        }
    }
}

fn validate(request: &Request) -> Result<(), RouteError> {
    let start = &request.start;
    if !start.lat.is_finite() || !start.lon.is_finite() || start.lat.abs() > 90.0 {
        return Err(RouteError::InvalidStart {
            lat: start.lat,
            lon: start.lon,
        });
    }
    let goal = &request.goal;
    if !goal.lat.is_finite() || !goal.lon.is_finite() || goal.lat.abs() > 90.0 {
        return Err(RouteError::InvalidGoal {
            lat: goal.lat,
            lon: goal.lon,
        });
    }
    if !request.departure_time_hours.is_finite() {
        return Err(RouteError::InvalidDeparture);
    }
    let ship = &request.ship;
    if !ship.calm_speed_kts.is_finite() || ship.calm_speed_kts <= 0.0 {
        return Err(RouteError::InvalidShip(format!(
            "calm speed must be positive, got {}",
            ship.calm_speed_kts
        )));
    }
    if !ship.min_speed_kts.is_finite() || ship.min_speed_kts < 0.0 {
        return Err(RouteError::InvalidShip(format!(
            "minimum speed must be non-negative, got {}",
            ship.min_speed_kts
        )));
    }
    Ok(())
}

fn clamp_settings(settings: &Settings) -> Settings {
    let mut clamped = settings.clone();
    clamped.time_step_minutes = settings.time_step_minutes.clamp(15.0, 120.0);
    clamped.heading_count = settings.heading_count.clamp(8, 72);
    clamped.merge_radius_nm = settings.merge_radius_nm.clamp(5.0, 40.0);
    clamped.goal_radius_nm = settings.goal_radius_nm.clamp(10.0, 60.0);
    let max_hours = if settings.max_hours <= 0.0 {
        240.0
    } else {
        settings.max_hours
    };
    clamped.max_hours = max_hours.clamp(12.0, 720.0);
    clamped.min_time_step_minutes = settings.min_time_step_minutes.max(5.0);
    clamped.max_time_step_minutes = settings
        .max_time_step_minutes
        .max(clamped.min_time_step_minutes);
    clamped.complexity_threshold = settings.complexity_threshold.clamp(f64::EPSILON, 1.0);
    clamped
}

/// Scalar "how demanding is this water" score in [0, 1], used to shrink the
/// time step where conditions change quickly.
fn environment_complexity(env: &EnvironmentSample) -> f64 {
    let wave = (env.wave_height_m / 8.0).min(1.0);
    let depth = if env.depth_m < 100.0 {
        ((100.0 - env.depth_m) / 100.0).min(1.0)
    } else {
        0.0
    };
    0.7 * wave + 0.3 * depth
}
