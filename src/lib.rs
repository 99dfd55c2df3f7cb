//! Isochrone-based weather routing for surface vessels.
//!
//! The engine expands layers of reachable states at discrete time steps,
//! thins each layer by spatial dominance, and backtracks the best chain into
//! a waypoint list. Environmental data (currents, waves, depth) is supplied
//! by the caller as a sampling closure, so the engine itself performs no I/O.

pub mod engine;

pub use engine::corridor::Corridor;
pub use engine::error::RouteError;
pub use engine::models::{
    Diagnostics, EnvironmentSample, GeoPoint, HazardFlags, Request, RouteResult, Settings,
    ShipModel, Waypoint,
};
pub use engine::router::IsochroneRouter;
