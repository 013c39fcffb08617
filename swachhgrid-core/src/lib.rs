//! Core types and service wiring for the SwachhGrid waste-bin monitor.

/// Alert derivation from bin snapshots.
pub mod alerts;
/// Password digests and account validation.
pub mod credentials;
/// Dashboard statistics over the bin collection.
pub mod dashboard;
/// Great-circle distance.
pub mod geo;
/// Domain models and identifiers.
pub mod model;
/// Change notifications for connected listeners.
pub mod notify;
/// Traits describing the store interface.
pub mod ports;
/// Nearest-neighbor collection routing.
pub mod route;
/// Demo data generation.
pub mod seed;
/// High-level service facade used by clients.
pub mod service;
/// Fill-level tiers, estimates, and bin mutations.
pub mod status;

pub use model::*;
pub use notify::*;
pub use ports::*;
pub use service::*;
