use std::time::Instant;

use chrono::{Duration, Utc};
use seasight_router::{EnvironmentSample, GeoPoint, IsochroneRouter, Request};

/// Analytic demo environment: slowly rotating current cells, around a meter
/// of swell, deep water everywhere.
fn demo_sampler(lat: f64, lon: f64, time_hours: f64) -> EnvironmentSample {
    let lat_rad = lat.to_radians();
    let lon_rad = lon.to_radians();
    EnvironmentSample {
        current_east_kn: 0.4 * lat_rad.sin() * (time_hours / 6.0).cos(),
        current_north_kn: 0.3 * lat_rad.cos() * (time_hours / 6.0).sin(),
        wave_height_m: (1.0 + 0.4 * (lat_rad + lon_rad + time_hours / 12.0).sin()).max(0.0),
        depth_m: 5000.0,
    }
}

fn main() {
    env_logger::init();
    println!("--- Seasight Router CLI Debugger ---");

    // Off Brittany, toward the Azores.
    let request = Request {
        start: GeoPoint::new(48.0, -5.0),
        goal: GeoPoint::new(40.0, -10.0),
        departure_time_hours: 0.0,
        ship: Default::default(),
        settings: Default::default(),
    };

    let router = IsochroneRouter::new();
    let started = Instant::now();
    let result = match router.solve(&request, &demo_sampler) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("solve failed: {err}");
            std::process::exit(1);
        }
    };
    let elapsed = started.elapsed();

    let d = &result.diagnostics;
    println!("Calculation time: {elapsed:?}");
    println!(
        "Reached goal: {} (final distance {:.1} nm)",
        d.reached_goal, d.final_distance_to_goal_nm
    );
    println!(
        "Distance: {:.1} nm in {:.1} h ({:.1} kts average)",
        d.total_distance_nm,
        d.eta_hours - request.departure_time_hours,
        d.average_speed_kts
    );
    println!(
        "Layers: {}, last frontier: {}, max waves: {:.1} m, hazards: {:#x}",
        d.step_count, d.frontier_size, d.max_wave_height_m, d.hazard_flags
    );

    let departure = Utc::now();
    println!(
        "\nWaypoints ({} simplified of {} raw):",
        result.waypoints.len(),
        result.waypoints_raw.len()
    );
    for wp in &result.waypoints {
        let eta = departure + Duration::seconds((wp.time_hours * 3600.0) as i64);
        let heading = if wp.heading_deg.is_nan() {
            "  start".to_string()
        } else {
            format!("{:>6.1}°", wp.heading_deg)
        };
        println!(
            "  {:>8.4}, {:>9.4}  {}  {}",
            wp.lat,
            wp.lon,
            heading,
            eta.format("%Y-%m-%d %H:%M UTC")
        );
    }

    if std::env::args().any(|arg| arg == "--json") {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("\n{json}"),
            Err(err) => eprintln!("failed to serialize result: {err}"),
        }
    }
}
