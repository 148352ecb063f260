//! HTTP-based `RouteProvider` using OSRM's Route API.
//!
//! The [`RouteProvider`] trait is synchronous to keep the core library
//! embeddable in synchronous contexts. This provider bridges the async HTTP
//! calls to the sync interface by blocking on a Tokio runtime internally.

use std::time::Duration;

use fuelstop_core::{Route, RouteError, RouteProvider, RouteProviderError};
use geo::{Coord, LineString};
use reqwest::Client;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::map_url::{DEFAULT_MAP_BASE_URL, directions_url};
use super::osrm::RouteResponse;

/// Error type for [`HttpRouteProvider`] construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// Failed to build the Tokio runtime.
    Runtime(std::io::Error),
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::Runtime(err) => write!(f, "failed to build Tokio runtime: {err}"),
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::Runtime(err) => Some(err),
        }
    }
}

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "fuelstop-routing/0.1";

/// Default OSRM endpoint.
pub const DEFAULT_OSRM_BASE_URL: &str = "http://localhost:5000";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const METRES_PER_MILE: f64 = 1_609.344;

/// Configuration for [`HttpRouteProvider`].
#[derive(Debug, Clone)]
pub struct HttpRouteProviderConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Base URL for the map link attached to each route; `None` omits it.
    pub map_base_url: Option<String>,
}

impl Default for HttpRouteProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OSRM_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            map_base_url: Some(DEFAULT_MAP_BASE_URL.to_owned()),
        }
    }
}

impl HttpRouteProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set or clear the map link base URL.
    #[must_use]
    pub fn with_map_base_url(mut self, map_base_url: Option<String>) -> Self {
        self.map_base_url = map_base_url;
        self
    }
}

/// HTTP-based route provider using the OSRM Route API.
///
/// The provider owns a Tokio runtime that is reused across calls.
///
/// # Runtime behaviour
///
/// When called from outside any Tokio runtime, the provider uses its own
/// stored runtime. When called from within an existing multi-threaded Tokio
/// runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]), it uses that runtime's handle with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics.
///
/// When called from within a `current_thread` Tokio runtime, the provider
/// falls back to its own internal runtime, which may deadlock if the
/// caller's runtime drives IO this request depends on.
///
/// # Example
///
/// ```no_run
/// use fuelstop_core::RouteProvider;
/// use fuelstop_data::routing::HttpRouteProvider;
/// use geo::Coord;
///
/// let provider = HttpRouteProvider::new("http://localhost:5000")?;
/// let route = provider.route(
///     Coord { x: -97.7431, y: 30.2672 },
///     Coord { x: -96.797, y: 32.7767 },
/// )?;
/// println!("{:.1} miles", route.length_miles);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct HttpRouteProvider {
    client: Client,
    config: HttpRouteProviderConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpRouteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRouteProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpRouteProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpRouteProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpRouteProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &HttpRouteProviderConfig {
        &self.config
    }

    /// Build the OSRM Route API URL for a start/finish pair.
    ///
    /// The URL format is:
    /// `{base_url}/route/v1/driving/{lon},{lat};{lon},{lat}?overview=full&geometries=geojson`.
    fn build_route_url(&self, start: Coord<f64>, finish: Coord<f64>) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
            self.config.base_url.trim_end_matches('/'),
            start.x,
            start.y,
            finish.x,
            finish.y
        )
    }

    async fn fetch_route_async(
        &self,
        start: Coord<f64>,
        finish: Coord<f64>,
    ) -> Result<Route, RouteProviderError> {
        let url = self.build_route_url(start, finish);
        log::debug!("requesting route from {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let route_response: RouteResponse =
            response
                .json()
                .await
                .map_err(|err| RouteProviderError::Parse {
                    message: err.to_string(),
                })?;

        route_from_response(
            route_response,
            start,
            finish,
            self.config.map_base_url.as_deref(),
        )
    }

    /// Convert a reqwest error to a `RouteProviderError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RouteProviderError {
        if error.is_timeout() {
            return RouteProviderError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return RouteProviderError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        RouteProviderError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Convert an OSRM response into a [`Route`], attaching a map link when
/// `map_base_url` is set.
pub(crate) fn route_from_response(
    response: RouteResponse,
    start: Coord<f64>,
    finish: Coord<f64>,
    map_base_url: Option<&str>,
) -> Result<Route, RouteProviderError> {
    if response.is_no_route() {
        return Err(RouteProviderError::NoRoute);
    }
    if !response.is_ok() {
        return Err(RouteProviderError::Service {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }

    let best = response
        .routes
        .into_iter()
        .next()
        .ok_or(RouteProviderError::NoRoute)?;
    let duration =
        Duration::try_from_secs_f64(best.duration).map_err(|err| RouteProviderError::Parse {
            message: format!("invalid route duration {}: {err}", best.duration),
        })?;
    let geometry: LineString<f64> = best
        .geometry
        .coordinates
        .into_iter()
        .map(|[x, y]| Coord { x, y })
        .collect();

    let route = Route::new(best.distance / METRES_PER_MILE, duration, geometry).map_err(
        |err| match err {
            RouteError::NonPositiveLength(_) => RouteProviderError::NoRoute,
            RouteError::EmptyGeometry => RouteProviderError::Parse {
                message: err.to_string(),
            },
        },
    )?;

    Ok(match map_base_url.map(|base| directions_url(base, start, finish)) {
        Some(Ok(url)) => route.with_map_url(url.as_str()),
        Some(Err(err)) => {
            log::warn!("omitting map link: {err}");
            route
        }
        None => route,
    })
}

impl RouteProvider for HttpRouteProvider {
    /// Fetch the best driving route between two coordinates.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must be
    /// multi-threaded (`flavor = "multi_thread"`). Otherwise the provider's
    /// own runtime is used.
    fn route(&self, start: Coord<f64>, finish: Coord<f64>) -> Result<Route, RouteProviderError> {
        let future = self.fetch_route_async(start, finish);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}
