pub mod artemis_errors;
pub mod clock;
pub mod config;
pub mod constants;
pub mod earth_orientation;
pub mod ephemeris;
pub mod event;
pub mod observers;
pub mod protocol;
pub mod query;
pub mod ref_system;
pub mod server;
pub mod time;

pub use artemis_errors::ArtemisError;
pub use clock::{RealInstant, TimeDomain, WorldInstant};
pub use ephemeris::analytic::AnalyticEphemeris;
pub use ephemeris::Ephemeris;
pub use query::QueryResolver;
