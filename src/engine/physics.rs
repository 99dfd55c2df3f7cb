//! Speed-made-good model: wave drag through the water, then current
//! advection over the ground.

use crate::engine::models::{EnvironmentSample, ShipModel};

/// Speed through the water after wave drag, floored at the ship's minimum
/// maneuvering speed.
pub fn through_water_speed(ship: &ShipModel, wave_height_m: f64) -> f64 {
    (ship.calm_speed_kts - ship.wave_drag_coefficient * wave_height_m).max(ship.min_speed_kts)
}

/// Speed over the ground for a heading: the through-water velocity is
/// decomposed into north/east components and vector-summed with the
/// sampled current.
pub fn ground_speed(ship: &ShipModel, env: &EnvironmentSample, heading_deg: f64) -> f64 {
    let tw = through_water_speed(ship, env.wave_height_m);
    let heading_rad = heading_deg.to_radians();

    let north = tw * heading_rad.cos() + env.current_north_kn;
    let east = tw * heading_rad.sin() + env.current_east_kn;
    north.hypot(east)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(east: f64, north: f64, wave: f64) -> EnvironmentSample {
        EnvironmentSample {
            current_east_kn: east,
            current_north_kn: north,
            wave_height_m: wave,
            depth_m: 5000.0,
        }
    }

    #[test]
    fn calm_water_keeps_calm_speed() {
        let ship = ShipModel::default();
        assert_eq!(through_water_speed(&ship, 0.0), 14.0);
    }

    #[test]
    fn wave_drag_is_linear_until_the_floor() {
        let ship = ShipModel::default();
        assert!((through_water_speed(&ship, 3.0) - 11.6).abs() < 1e-12);
        // 14 - 0.8 * 20 would be negative; floored at min speed.
        assert_eq!(through_water_speed(&ship, 20.0), ship.min_speed_kts);
    }

    #[test]
    fn following_current_adds_to_ground_speed() {
        let ship = ShipModel::default();
        let gs = ground_speed(&ship, &env(2.0, 0.0, 0.0), 90.0);
        assert!((gs - 16.0).abs() < 1e-9);
    }

    #[test]
    fn cross_current_combines_vectorially() {
        let ship = ShipModel::default();
        let gs = ground_speed(&ship, &env(2.0, 0.0, 0.0), 0.0);
        assert!((gs - (14.0f64 * 14.0 + 4.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn opposing_current_slows_the_ship() {
        let ship = ShipModel::default();
        let gs = ground_speed(&ship, &env(-3.0, 0.0, 0.0), 90.0);
        assert!((gs - 11.0).abs() < 1e-9);
    }
}
