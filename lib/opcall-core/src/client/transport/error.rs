/// Errors raised by [`ReqwestTransport`](super::ReqwestTransport).
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum TransportError {
    /// HTTP client error from the underlying reqwest library.
    ///
    /// Occurs when network requests fail, timeouts occur, or connection issues arise.
    ReqwestError(reqwest::Error),

    /// The URL built by the invoker cannot be parsed.
    UrlError(url::ParseError),

    /// Invalid HTTP header name in the request options.
    InvalidHeaderName(http::header::InvalidHeaderName),

    /// Invalid HTTP header value in the request options.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// A residual parameter has no query string representation.
    ///
    /// Occurs for objects and nested arrays sent with a verb that carries no body.
    #[display("Unsupported query parameter value for `{name}`: {value}")]
    #[from(skip)]
    UnsupportedQueryParameterValue {
        /// The parameter name.
        name: String,
        /// The unsupported value that was provided.
        value: serde_json::Value,
    },

    /// Server answered with a non-success status code.
    #[display("Unexpected status code {status_code}: {body}")]
    #[from(skip)]
    UnexpectedStatusCode {
        /// The HTTP status code received.
        status_code: u16,
        /// The response body, truncated.
        body: String,
    },
}
