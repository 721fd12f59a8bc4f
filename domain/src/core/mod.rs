//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`] - a validated query to put before the expert panel
//! - [`mode::RoundMode`] / [`mode::RoutingLabel`] - session posture and per-round routing
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod mode;
pub mod query;
pub mod string;
