use std::borrow::Cow;

use http::Method;
use tracing::debug;

use super::parameters::{encode_path_value, path_value};
use super::{
    Configuration, HttpTransport, InvokeError, ParameterBag, PathEncoding, PathTemplate,
    RequestError, RequestOptions, Segment, TransportRequest,
};

/// Builds and dispatches exactly one HTTP request per operation call.
///
/// The invoker keeps no state besides its transport: every call reads its inputs,
/// builds the URL and the residual parameters, then hands them to the transport.
/// A call either sends one request built from a complete set of path parameters,
/// or fails before reaching the transport.
///
/// # Example
///
/// ```rust,no_run
/// use http::Method;
/// use opcall_core::{
///     Configuration, OperationInvoker, ParameterBag, PathTemplate, ReqwestTransport, RequestOptions,
/// };
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let invoker = OperationInvoker::new(ReqwestTransport::default());
/// let configuration = Configuration::builder()
///     .with_protocol("https")
///     .with_host("api.example.com")
///     .with_base_path("/v2")
///     .build();
/// let path = PathTemplate::parse("/pets/{petId}/photos")?;
/// let params = ParameterBag::new().add_param("petId", 42).add_param("limit", 10);
///
/// // GET https://api.example.com/v2/pets/42/photos?limit=10
/// let response = invoker
///     .call(Method::GET, &path, &configuration, &params, RequestOptions::default())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct OperationInvoker<T> {
    transport: T,
}

impl<T> OperationInvoker<T>
where
    T: HttpTransport,
{
    /// Creates an invoker dispatching through `transport`.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The transport used for every call.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Calls one operation.
    ///
    /// # Errors
    ///
    /// - [`InvokeError::Request`] when a path parameter is missing or cannot be
    ///   rendered; the transport is not called.
    /// - [`InvokeError::Transport`] with the transport error, unchanged.
    pub async fn call(
        &self,
        verb: Method,
        path: &PathTemplate,
        configuration: &Configuration,
        parameters: &ParameterBag,
        options: RequestOptions,
    ) -> Result<T::Response, InvokeError<T::Error>> {
        let url = url_for(configuration, path, parameters)?;
        let params = clean_parameters(path, parameters);

        debug!(%verb, %url, residual = params.len(), "dispatching operation");
        let request = TransportRequest {
            method: verb,
            url,
            params,
            options,
        };
        self.transport
            .call(request)
            .await
            .map_err(InvokeError::Transport)
    }
}

/// Builds the URL of a call: `{protocol}://{host}{base_path}` followed by the template
/// segments joined with `/`, each placeholder replaced by its parameter value.
///
/// Every parameter of the template is checked before anything is rendered.
///
/// # Errors
///
/// - [`RequestError::MissingParameter`] naming the first absent parameter, in
///   template order.
/// - [`RequestError::UnsupportedParameterValue`] for objects or nested arrays.
///
/// # Example
///
/// ```rust
/// use opcall_core::{url_for, Configuration, ParameterBag, PathTemplate};
///
/// let configuration = Configuration::builder()
///     .with_protocol("https")
///     .with_host("api.example.com")
///     .with_base_path("/v2")
///     .build();
/// let path = PathTemplate::parse("/pets/{petId}/photos")?;
/// let params = ParameterBag::new().add_param("petId", 42);
///
/// let url = url_for(&configuration, &path, &params)?;
/// assert_eq!(url, "https://api.example.com/v2/pets/42/photos");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn url_for(
    configuration: &Configuration,
    path: &PathTemplate,
    parameters: &ParameterBag,
) -> Result<String, RequestError> {
    if let Some(name) = path
        .parameter_elements()
        .into_iter()
        .find(|name| !parameters.contains(name))
    {
        return Err(RequestError::MissingParameter {
            name: name.to_string(),
        });
    }

    let segments = path
        .segments()
        .iter()
        .map(|segment| match segment {
            Segment::Literal(literal) => Ok(Cow::Borrowed(literal.as_str())),
            Segment::Parameter(name) => {
                let value = parameters
                    .get(name)
                    .ok_or_else(|| RequestError::MissingParameter { name: name.clone() })?;
                let rendered = path_value(name, value)?;
                let rendered = match configuration.path_encoding() {
                    PathEncoding::Raw => rendered,
                    PathEncoding::Percent => encode_path_value(&rendered),
                };
                Ok(Cow::Owned(rendered))
            }
        })
        .collect::<Result<Vec<_>, RequestError>>()?;

    let url = format!("{}{}", configuration.base_url(), segments.join("/"));
    debug!(%path, %url, "url built");
    Ok(url)
}

/// Returns a copy of `parameters` without the path parameters of `path`.
///
/// The caller's bag is left untouched.
pub fn clean_parameters(path: &PathTemplate, parameters: &ParameterBag) -> ParameterBag {
    parameters.without(&path.parameter_elements())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::client::TransportError;

    /// Records every request and answers with the configured outcome.
    #[derive(Debug, Clone, Default)]
    struct SpyTransport {
        requests: Arc<Mutex<Vec<TransportRequest>>>,
        fail_with_status: Option<u16>,
    }

    impl SpyTransport {
        fn failing(status_code: u16) -> Self {
            Self {
                fail_with_status: Some(status_code),
                ..Self::default()
            }
        }

        fn requests(&self) -> Vec<TransportRequest> {
            self.requests.lock().expect("not poisoned").clone()
        }
    }

    impl HttpTransport for SpyTransport {
        type Response = &'static str;
        type Error = TransportError;

        async fn call(&self, request: TransportRequest) -> Result<Self::Response, Self::Error> {
            self.requests.lock().expect("not poisoned").push(request);
            match self.fail_with_status {
                Some(status_code) => Err(TransportError::UnexpectedStatusCode {
                    status_code,
                    body: "boom".to_string(),
                }),
                None => Ok("ok"),
            }
        }
    }

    fn petstore() -> Configuration {
        Configuration::builder()
            .with_protocol("https")
            .with_host("api.example.com")
            .with_base_path("/v2")
            .build()
    }

    fn template(template: &str) -> PathTemplate {
        PathTemplate::parse(template).expect("valid template")
    }

    #[tokio::test]
    async fn should_call_transport_with_url_and_residual_parameters() {
        let spy = SpyTransport::default();
        let invoker = OperationInvoker::new(spy.clone());
        let path = template("/pets/{petId}/photos");
        let params = ParameterBag::new().add_param("petId", 42).add_param("limit", 10);
        let options = RequestOptions::new().add_header("X-Trace", "1");

        let response = invoker
            .call(Method::GET, &path, &petstore(), &params, options.clone())
            .await
            .expect("successful call");

        assert_eq!(response, "ok");
        assert_eq!(
            spy.requests(),
            [TransportRequest {
                method: Method::GET,
                url: "https://api.example.com/v2/pets/42/photos".to_string(),
                params: ParameterBag::new().add_param("limit", 10),
                options,
            }]
        );
        assert_eq!(
            params,
            ParameterBag::new().add_param("petId", 42).add_param("limit", 10)
        );
    }

    #[tokio::test]
    async fn should_not_call_transport_when_parameter_is_missing() {
        let spy = SpyTransport::default();
        let invoker = OperationInvoker::new(spy.clone());
        let path = template("/pets/{petId}");
        let params = ParameterBag::new();

        let result = invoker
            .call(Method::GET, &path, &petstore(), &params, RequestOptions::default())
            .await;

        let Err(error) = result else {
            panic!("missing parameter should fail");
        };
        assert_eq!(
            error.as_request(),
            Some(&RequestError::MissingParameter {
                name: "petId".to_string()
            })
        );
        insta::assert_snapshot!(error, @"Required parameter `petId` missing");
        assert!(spy.requests().is_empty());
        assert!(params.is_empty());
    }

    #[tokio::test]
    async fn should_not_call_transport_for_unsupported_path_value() {
        let spy = SpyTransport::default();
        let invoker = OperationInvoker::new(spy.clone());
        let path = template("/pets/{petId}");
        let params = ParameterBag::new().add_param("petId", json!({"id": 1}));

        let result = invoker
            .call(Method::GET, &path, &petstore(), &params, RequestOptions::default())
            .await;

        assert!(matches!(
            result,
            Err(InvokeError::Request(
                RequestError::UnsupportedParameterValue { .. }
            ))
        ));
        assert!(spy.requests().is_empty());
    }

    #[tokio::test]
    async fn should_return_transport_error_unchanged() {
        let spy = SpyTransport::failing(503);
        let invoker = OperationInvoker::new(spy.clone());
        let path = template("/store/inventory");
        let params = ParameterBag::new().add_param("verbose", true);

        let result = invoker
            .call(Method::GET, &path, &petstore(), &params, RequestOptions::default())
            .await;

        let Err(InvokeError::Transport(TransportError::UnexpectedStatusCode { status_code, body })) =
            result
        else {
            panic!("transport error expected");
        };
        assert_eq!(status_code, 503);
        assert_eq!(body, "boom");
        assert_eq!(spy.requests().len(), 1);
        assert_eq!(params, ParameterBag::new().add_param("verbose", true));
    }

    #[tokio::test]
    async fn should_support_concurrent_calls() {
        let spy = SpyTransport::default();
        let invoker = Arc::new(OperationInvoker::new(spy.clone()));
        let configuration = Arc::new(petstore());
        let path = Arc::new(template("/pets/{petId}"));

        let handles: Vec<_> = (0..8)
            .map(|id| {
                let invoker = Arc::clone(&invoker);
                let configuration = Arc::clone(&configuration);
                let path = Arc::clone(&path);
                tokio::spawn(async move {
                    let params = ParameterBag::new().add_param("petId", id);
                    invoker
                        .call(Method::GET, &path, &configuration, &params, RequestOptions::default())
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.expect("task completed").expect("successful call");
        }

        let mut urls: Vec<_> = spy.requests().into_iter().map(|it| it.url).collect();
        urls.sort();
        let mut expected: Vec<_> = (0..8)
            .map(|id| format!("https://api.example.com/v2/pets/{id}"))
            .collect();
        expected.sort();
        assert_eq!(urls, expected);
    }

    #[test]
    fn should_build_url_for_end_to_end_example() {
        let path = template("/pets/{petId}/photos");
        let params = ParameterBag::new().add_param("petId", 42).add_param("limit", 10);

        let url = url_for(&petstore(), &path, &params).expect("complete parameters");

        insta::assert_snapshot!(url, @"https://api.example.com/v2/pets/42/photos");
    }

    #[rstest]
    #[case::literal_only("/store/inventory", json!({}), "https://api.example.com/v2/store/inventory")]
    #[case::root("/", json!({}), "https://api.example.com/v2/")]
    #[case::two_parameters(
        "/users/{userId}/posts/{postId}",
        json!({"userId": 7, "postId": "my-post"}),
        "https://api.example.com/v2/users/7/posts/my-post"
    )]
    #[case::leading_parameter("/{tenant}/pets", json!({"tenant": "acme"}), "https://api.example.com/v2/acme/pets")]
    #[case::duplicate("/test/{id}/{id}", json!({"id": 123}), "https://api.example.com/v2/test/123/123")]
    #[case::array("/search/{tags}", json!({"tags": ["rust", "web"]}), "https://api.example.com/v2/search/rust,web")]
    #[case::raw_value("/search/{query}", json!({"query": "hello world"}), "https://api.example.com/v2/search/hello world")]
    fn should_build_url(#[case] path: &str, #[case] params: serde_json::Value, #[case] expected: &str) {
        let serde_json::Value::Object(params) = params else {
            panic!("params must be an object");
        };
        let params: ParameterBag = params.into_iter().collect();

        let url = url_for(&petstore(), &template(path), &params).expect("complete parameters");

        assert_eq!(url, expected);
        assert!(!url.contains('{'));
    }

    #[test]
    fn should_percent_encode_values_when_configured() {
        let configuration = Configuration::builder()
            .with_host("localhost:8080")
            .with_path_encoding(PathEncoding::Percent)
            .build();
        let path = template("/search/{query}/items");
        let params = ParameterBag::new().add_param("query", "a b/c");

        let url = url_for(&configuration, &path, &params).expect("complete parameters");

        insta::assert_snapshot!(url, @"http://localhost:8080/search/a%20b%2Fc/items");
    }

    #[test]
    fn should_report_first_missing_parameter_in_template_order() {
        let path = template("/users/{userId}/posts/{postId}");
        let params = ParameterBag::new().add_param("other", 1);

        let result = url_for(&petstore(), &path, &params);

        assert_eq!(
            result,
            Err(RequestError::MissingParameter {
                name: "userId".to_string()
            })
        );
    }

    #[test]
    fn should_check_all_parameters_before_rendering() {
        let path = template("/pets/{petId}/owners/{ownerId}");
        let params = ParameterBag::new().add_param("petId", json!({"not": "renderable"}));

        let result = url_for(&petstore(), &path, &params);

        assert_eq!(
            result,
            Err(RequestError::MissingParameter {
                name: "ownerId".to_string()
            })
        );
    }

    #[test]
    fn should_build_same_url_twice() {
        let path = template("/pets/{petId}");
        let params = ParameterBag::new().add_param("petId", 42);

        let first = url_for(&petstore(), &path, &params);
        let second = url_for(&petstore(), &path, &params);

        assert_eq!(first, second);
    }

    #[test]
    fn should_remove_exactly_the_path_parameters() {
        let path = template("/users/{userId}/posts/{postId}");
        let params = ParameterBag::new()
            .add_param("userId", 7)
            .add_param("page", 2)
            .add_param("postId", 3)
            .add_param("fields", vec!["title", "body"]);

        let residual = clean_parameters(&path, &params);

        assert_eq!(
            residual,
            ParameterBag::new()
                .add_param("page", 2)
                .add_param("fields", vec!["title", "body"])
        );
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn should_keep_all_parameters_for_literal_path() {
        let path = template("/pets");
        let params = ParameterBag::new().add_param("name", "doggie");

        assert_eq!(clean_parameters(&path, &params), params);
    }
}
