pub mod corridor;
pub mod error;
pub mod geo;
pub mod models;
pub mod physics;
pub mod router;
pub mod simplify;
