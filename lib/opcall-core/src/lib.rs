//! # Opcall Core
//!
//! Turn REST operation descriptions into HTTP requests.
//!
//! An operation is a verb and a path template such as `/pets/{petId}/photos`.
//! Given a [`Configuration`] (protocol, host, base path) and a [`ParameterBag`],
//! this crate:
//!
//! - checks that every path parameter is present, before any I/O,
//! - substitutes the path parameters in template order,
//! - keeps the remaining parameters for the query string or the body,
//! - hands the request to an [`HttpTransport`] and returns its result unchanged.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use http::Method;
//! use opcall_core::{ApiClient, Operation, ParameterBag, RequestOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::builder()
//!     .with_protocol("https")
//!     .with_host("api.example.com")
//!     .with_base_path("/v2")
//!     .add_operation(Operation::parse("listPetPhotos", Method::GET, "/pets/{petId}/photos")?)
//!     .build()?;
//!
//! // GET https://api.example.com/v2/pets/42/photos?limit=10
//! let params = ParameterBag::new()
//!     .add_param("petId", 42)
//!     .add_param("limit", 10);
//! let response = client
//!     .call_operation("listPetPhotos", &params, RequestOptions::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Building Requests Without a Client
//!
//! The request construction steps are plain functions:
//!
//! ```rust
//! use opcall_core::{clean_parameters, url_for, Configuration, ParameterBag, PathTemplate};
//!
//! let configuration = Configuration::builder()
//!     .with_protocol("https")
//!     .with_host("api.example.com")
//!     .with_base_path("/v2")
//!     .build();
//! let path = PathTemplate::parse("/pets/{petId}/photos")?;
//! let params = ParameterBag::new().add_param("petId", 42).add_param("limit", 10);
//!
//! let url = url_for(&configuration, &path, &params)?;
//! let residual = clean_parameters(&path, &params);
//!
//! assert_eq!(url, "https://api.example.com/v2/pets/42/photos");
//! assert_eq!(residual, ParameterBag::new().add_param("limit", 10));
//! // the caller's bag is untouched
//! assert_eq!(params.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Transport
//!
//! Implement [`HttpTransport`] to replace `reqwest`, e.g. to record requests in tests:
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use opcall_core::{ApiClient, HttpTransport, TransportRequest};
//!
//! #[derive(Debug, Clone, Default)]
//! struct Recorder(Arc<Mutex<Vec<TransportRequest>>>);
//!
//! impl HttpTransport for Recorder {
//!     type Response = ();
//!     type Error = std::io::Error;
//!
//!     async fn call(&self, request: TransportRequest) -> Result<(), std::io::Error> {
//!         self.0.lock().map_err(|_| std::io::Error::other("poisoned"))?.push(request);
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::builder().with_transport(Recorder::default()).build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Limitations
//!
//! By default path parameter values are inserted verbatim, without URL encoding.
//! Use [`PathEncoding::Percent`] to percent-encode them.

mod client;

pub use self::client::{
    ApiClient, ApiClientBuilder, ApiClientError, Configuration, ConfigurationBuilder,
    HttpTransport, InvokeError, Operation, OperationInvoker, ParameterBag, PathEncoding,
    PathTemplate, RequestError, RequestOptions, ReqwestTransport, Segment, TransportError,
    TransportRequest, clean_parameters, url_for,
};
