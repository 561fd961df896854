//! Route from an origin to an entrance candidate.
//!
//! The `RoutingEngine` trait abstracts the graph search. Callers supply a
//! [`RouteQuery`] and receive the first [`Path`](crate::Path) the engine
//! finds, or `None` when no path exists.
//!
//! Failures are typed so callers can tell timeouts, transport errors and
//! malformed routing data apart.

mod engine;
mod error;

pub use engine::{RouteQuery, RoutingEngine};
pub use error::RoutingError;
