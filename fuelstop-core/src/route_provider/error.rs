use thiserror::Error;

/// Errors from [`crate::RouteProvider::route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteProviderError {
    /// The routing service could not be reached.
    #[error("network error requesting {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Description of the transport failure.
        message: String,
    },
    /// The routing service did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The routing service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response description.
        message: String,
    },
    /// The routing service reported an error in its response body.
    #[error("routing service error {code}: {message}")]
    Service {
        /// Service status code.
        code: String,
        /// Service message.
        message: String,
    },
    /// The response could not be decoded.
    #[error("failed to parse routing response: {message}")]
    Parse {
        /// Decoder message.
        message: String,
    },
    /// No drivable route joins the two coordinates.
    #[error("no route found between the requested coordinates")]
    NoRoute,
}
