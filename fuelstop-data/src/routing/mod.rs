//! Driving routes from an OSRM routing service.
//!
//! This module provides [`HttpRouteProvider`], an implementation of
//! [`fuelstop_core::RouteProvider`] that fetches the best driving route
//! between two coordinates from the OSRM Route API and attaches an
//! OpenStreetMap directions link.
//!
//! # Example
//!
//! ```no_run
//! use fuelstop_data::routing::{HttpRouteProvider, HttpRouteProviderConfig};
//! use std::time::Duration;
//!
//! let config = HttpRouteProviderConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(60))
//!     .with_user_agent("my-app/1.0");
//! let provider = HttpRouteProvider::with_config(config)?;
//! # Ok::<(), fuelstop_data::routing::ProviderBuildError>(())
//! ```

mod map_url;
mod osrm;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use map_url::{DEFAULT_MAP_BASE_URL, directions_url};
pub use provider::{
    DEFAULT_OSRM_BASE_URL, DEFAULT_USER_AGENT, HttpRouteProvider, HttpRouteProviderConfig,
    ProviderBuildError,
};
