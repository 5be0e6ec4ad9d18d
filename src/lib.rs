// Library interface for the binary and the integration tests

pub mod analytics;
pub mod config;
pub mod constants;
pub mod db;
pub mod events;
pub mod ident;
pub mod queries;
pub mod registry;
pub mod schema;
pub mod serve;
pub mod store;
pub mod timestamp;

pub use constants::{DEFAULT_TIMER_COLOR, FALLBACK_ALARM_SOUND, SEQUENCE_START_EVENT};
