use thiserror::Error;

/// Input-shape failures detected before the search loop. Out-of-range
/// settings are clamped rather than rejected and never appear here.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("start position out of range: lat={lat}, lon={lon}")]
    InvalidStart { lat: f64, lon: f64 },
    #[error("goal position out of range: lat={lat}, lon={lon}")]
    InvalidGoal { lat: f64, lon: f64 },
    #[error("departure time must be finite")]
    InvalidDeparture,
    #[error("ship model rejected: {0}")]
    InvalidShip(String),
}
