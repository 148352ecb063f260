//! Compute driving routes between two coordinates.
//!
//! The `RouteProvider` trait abstracts the routing service. Implementations
//! return a [`Route`](crate::Route) whose reported length is authoritative
//! for fuel planning.

mod error;
mod provider;

pub use error::RouteProviderError;
pub use provider::RouteProvider;
