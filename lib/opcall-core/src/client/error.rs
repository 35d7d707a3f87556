use std::error::Error;
use std::fmt::{self, Display};

/// Errors raised while configuring an [`ApiClient`](crate::ApiClient).
///
/// These come from loading the operation table or the path templates it refers to,
/// never from a call.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ApiClientError {
    /// A path template segment holds a malformed placeholder.
    ///
    /// Occurs for segments like `{`, `id}` or `user-{id}`: a placeholder must span
    /// the whole segment.
    #[display("Invalid segment '{segment}' in path template '{template}'")]
    #[from(skip)]
    InvalidPathSegment {
        /// The template being parsed.
        template: String,
        /// The offending segment.
        segment: String,
    },

    /// The operation descriptor list is not valid JSON or has the wrong shape.
    #[display("Failed to load operations at '{path}': {error}")]
    #[from(skip)]
    OperationsJson {
        /// JSON path of the failing element.
        path: String,
        /// The underlying JSON error.
        #[error(source)]
        error: serde_json::Error,
    },

    /// Two operations share an id, or their snake_case aliases collide.
    #[display("Duplicate operation: {id}")]
    #[from(skip)]
    DuplicateOperation {
        /// The conflicting operation id or alias.
        id: String,
    },
}

/// Errors detected while building a request, before anything reaches the transport.
#[derive(Debug, Clone, PartialEq, derive_more::Error, derive_more::Display)]
pub enum RequestError {
    /// A parameter named in the path template is absent from the parameter bag.
    #[display("Required parameter `{name}` missing")]
    MissingParameter {
        /// Name of the missing path parameter.
        name: String,
    },

    /// A path parameter value cannot be rendered as a path segment.
    ///
    /// Objects and nested arrays have no path representation.
    #[display("Unsupported value for path parameter `{name}`: {value}")]
    UnsupportedParameterValue {
        /// Name of the path parameter.
        name: String,
        /// The rejected value.
        value: serde_json::Value,
    },

    /// No registered operation matches the requested name.
    #[display("Unknown operation: {name}")]
    UnknownOperation {
        /// The requested operation id or alias.
        name: String,
    },
}

/// Failure of a single operation call.
///
/// Request errors are raised before the transport is touched; transport errors are
/// handed back exactly as the transport produced them.
#[derive(Debug)]
pub enum InvokeError<E> {
    /// The request could not be built.
    Request(RequestError),
    /// The transport failed.
    Transport(E),
}

impl<E> InvokeError<E> {
    /// Returns the request error, if the call failed before dispatch.
    pub fn as_request(&self) -> Option<&RequestError> {
        match self {
            Self::Request(error) => Some(error),
            Self::Transport(_) => None,
        }
    }

    /// Returns the transport error, if the call failed during dispatch.
    pub fn as_transport(&self) -> Option<&E> {
        match self {
            Self::Request(_) => None,
            Self::Transport(error) => Some(error),
        }
    }

    /// Consumes the error and returns the transport error, if any.
    pub fn into_transport(self) -> Option<E> {
        match self {
            Self::Request(_) => None,
            Self::Transport(error) => Some(error),
        }
    }
}

impl<E> From<RequestError> for InvokeError<E> {
    fn from(value: RequestError) -> Self {
        Self::Request(value)
    }
}

impl<E> Display for InvokeError<E>
where
    E: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(error) => Display::fmt(error, f),
            Self::Transport(error) => Display::fmt(error, f),
        }
    }
}

impl<E> Error for InvokeError<E>
where
    E: Error + 'static,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Request(error) => Some(error),
            Self::Transport(error) => Some(error),
        }
    }
}
