//! Application-level configuration.
//!
//! - [`DeliberationParams`] - round loop and stage control (rounds, top-k, gating, timeouts)

pub mod deliberation_params;

pub use deliberation_params::{DeliberationParams, ParamsError};
