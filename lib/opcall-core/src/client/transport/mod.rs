//! The HTTP transport collaborator.
//!
//! The invoker builds a [`TransportRequest`] and hands it to an [`HttpTransport`];
//! everything past that point (sockets, status handling, timeouts) belongs to the
//! transport. [`ReqwestTransport`] is the default implementation.

use std::future::Future;
use std::time::Duration;

use http::Method;
use indexmap::IndexMap;

use super::ParameterBag;

mod error;
pub use self::error::TransportError;

mod reqwest_transport;
pub use self::reqwest_transport::ReqwestTransport;

/// Maximum size, in bytes, of a response body kept in an error message.
pub(in crate::client) const BODY_MAX_LENGTH: usize = 1024;

/// A fully built request, ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// The HTTP verb.
    pub method: Method,
    /// The final URL, path parameters already substituted.
    pub url: String,
    /// Residual parameters: everything not consumed by the path.
    pub params: ParameterBag,
    /// Options for the transport.
    pub options: RequestOptions,
}

/// Per-call options for the transport.
///
/// `timeout` and `headers` are understood by [`ReqwestTransport`]; `extensions` is an
/// open bag passed through untouched for custom transports.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use opcall_core::RequestOptions;
///
/// let options = RequestOptions::new()
///     .with_timeout(Duration::from_secs(10))
///     .add_header("X-Request-Id", "42")
///     .add_extension("retries", 3);
///
/// assert_eq!(options.timeout(), Some(Duration::from_secs(10)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    timeout: Option<Duration>,
    headers: IndexMap<String, String>,
    extensions: IndexMap<String, serde_json::Value>,
}

impl RequestOptions {
    /// Options with no timeout, headers or extensions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the total request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a request header, replacing any previous value.
    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a transport-specific option.
    pub fn add_extension(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.extensions.insert(name.into(), value.into());
        self
    }

    /// Per-request timeout; the client default applies when `None`.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Extra request headers, in insertion order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns an extension value; transports may ignore them.
    pub fn extension(&self, name: &str) -> Option<&serde_json::Value> {
        self.extensions.get(name)
    }
}

/// Performs the actual network call.
///
/// Implementations receive exactly one [`TransportRequest`] per operation call and
/// their errors are returned to the caller unchanged.
///
/// # Example
///
/// ```rust
/// use opcall_core::{HttpTransport, TransportRequest};
///
/// #[derive(Debug, Clone)]
/// struct EchoTransport;
///
/// impl HttpTransport for EchoTransport {
///     type Response = String;
///     type Error = std::io::Error;
///
///     async fn call(&self, request: TransportRequest) -> Result<String, std::io::Error> {
///         Ok(format!("{} {}", request.method, request.url))
///     }
/// }
/// ```
pub trait HttpTransport: Send + Sync {
    /// The successful result of a call.
    type Response: Send;
    /// The failure of a call.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends the request.
    fn call(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send;
}
