use http::Method;
use indexmap::IndexMap;

mod builder;
pub use self::builder::ApiClientBuilder;

mod configuration;
pub use self::configuration::{Configuration, ConfigurationBuilder, PathEncoding};

mod error;
pub use self::error::{ApiClientError, InvokeError, RequestError};

mod invoker;
pub use self::invoker::{OperationInvoker, clean_parameters, url_for};

mod operation;
pub use self::operation::Operation;

mod parameters;
pub use self::parameters::{ParameterBag, PathTemplate, Segment};

mod transport;
pub use self::transport::{
    HttpTransport, RequestOptions, ReqwestTransport, TransportError, TransportRequest,
};


/// Client for a fixed table of REST operations.
///
/// `ApiClient` pairs a [`Configuration`] with the operations of an API, each
/// registered once under its id. Calls are dispatched by operation id (or its
/// snake_case alias) through an [`OperationInvoker`].
///
/// # Example
///
/// ```rust,no_run
/// use http::Method;
/// use opcall_core::{ApiClient, Operation, ParameterBag, RequestOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .with_protocol("https")
///     .with_host("petstore.swagger.io")
///     .with_base_path("/v2")
///     .add_operation(Operation::parse("findPetsByStatus", Method::GET, "/pet/findByStatus")?)
///     .add_operation(Operation::parse("getPetById", Method::GET, "/pet/{petId}")?)
///     .build()?;
///
/// // GET https://petstore.swagger.io/v2/pet/42
/// let params = ParameterBag::new().add_param("petId", 42);
/// let response = client
///     .call_operation("get_pet_by_id", &params, RequestOptions::default())
///     .await?;
/// # Ok(())
/// # }
/// ```
///
/// # Thread Safety
///
/// The client holds no mutable state; it can be shared between tasks as long as
/// the transport can.
#[derive(derive_more::Debug, Clone)]
pub struct ApiClient<T = ReqwestTransport> {
    configuration: Configuration,
    invoker: OperationInvoker<T>,
    operations: IndexMap<String, Operation>,
    #[debug(skip)]
    aliases: IndexMap<String, String>,
}

// Create
impl ApiClient {
    /// Starts a builder using the default [`ReqwestTransport`].
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }
}

// Operations
impl<T> ApiClient<T>
where
    T: HttpTransport,
{
    /// The configuration shared by every call.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// The transport shared by every call.
    pub fn transport(&self) -> &T {
        self.invoker.transport()
    }

    /// Finds an operation by id, or by its snake_case alias.
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name).or_else(|| {
            self.aliases
                .get(name)
                .and_then(|id| self.operations.get(id))
        })
    }

    /// The registered operations, in registration order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }

    /// Calls a registered operation.
    ///
    /// # Errors
    ///
    /// - [`RequestError::UnknownOperation`] when no operation matches `name`.
    /// - Any error of [`OperationInvoker::call`].
    pub async fn call_operation(
        &self,
        name: &str,
        parameters: &ParameterBag,
        options: RequestOptions,
    ) -> Result<T::Response, InvokeError<T::Error>> {
        let operation = self
            .operation(name)
            .ok_or_else(|| RequestError::UnknownOperation {
                name: name.to_string(),
            })?;

        self.invoker
            .call(
                operation.verb().clone(),
                operation.path(),
                &self.configuration,
                parameters,
                options,
            )
            .await
    }

    /// Calls an operation that is not part of the registered table.
    ///
    /// # Errors
    ///
    /// Same as [`OperationInvoker::call`].
    pub async fn call(
        &self,
        verb: Method,
        path: &PathTemplate,
        parameters: &ParameterBag,
        options: RequestOptions,
    ) -> Result<T::Response, InvokeError<T::Error>> {
        self.invoker
            .call(verb, path, &self.configuration, parameters, options)
            .await
    }

    /// `GET` on an ad-hoc path, with default options.
    pub async fn get(
        &self,
        path: &PathTemplate,
        parameters: &ParameterBag,
    ) -> Result<T::Response, InvokeError<T::Error>> {
        self.call(Method::GET, path, parameters, RequestOptions::default())
            .await
    }

    /// `POST` on an ad-hoc path, with default options.
    pub async fn post(
        &self,
        path: &PathTemplate,
        parameters: &ParameterBag,
    ) -> Result<T::Response, InvokeError<T::Error>> {
        self.call(Method::POST, path, parameters, RequestOptions::default())
            .await
    }

    /// `PUT` on an ad-hoc path, with default options.
    pub async fn put(
        &self,
        path: &PathTemplate,
        parameters: &ParameterBag,
    ) -> Result<T::Response, InvokeError<T::Error>> {
        self.call(Method::PUT, path, parameters, RequestOptions::default())
            .await
    }

    /// `DELETE` on an ad-hoc path, with default options.
    pub async fn delete(
        &self,
        path: &PathTemplate,
        parameters: &ParameterBag,
    ) -> Result<T::Response, InvokeError<T::Error>> {
        self.call(Method::DELETE, path, parameters, RequestOptions::default())
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Debug, Clone, Default)]
    struct RecordingTransport {
        requests: Arc<Mutex<Vec<TransportRequest>>>,
    }

    impl RecordingTransport {
        fn requests(&self) -> Vec<TransportRequest> {
            self.requests.lock().expect("not poisoned").clone()
        }
    }

    impl HttpTransport for RecordingTransport {
        type Response = ();
        type Error = std::io::Error;

        async fn call(&self, request: TransportRequest) -> Result<(), std::io::Error> {
            self.requests.lock().expect("not poisoned").push(request);
            Ok(())
        }
    }

    fn petstore(transport: RecordingTransport) -> ApiClient<RecordingTransport> {
        ApiClient::builder()
            .with_transport(transport)
            .with_protocol("https")
            .with_host("api.example.com")
            .with_base_path("/v2")
            .with_operations_json(
                r#"[
                    { "operationId": "listPetPhotos", "verb": "get", "path": "/pets/{petId}/photos" },
                    { "operationId": "updatePet", "verb": "put", "path": "/pets/{petId}" }
                ]"#,
            )
            .expect("valid descriptors")
            .build()
            .expect("valid client")
    }

    #[tokio::test]
    async fn should_dispatch_registered_operation() {
        let transport = RecordingTransport::default();
        let client = petstore(transport.clone());
        let params = ParameterBag::new().add_param("petId", 42).add_param("limit", 10);

        client
            .call_operation("listPetPhotos", &params, RequestOptions::default())
            .await
            .expect("successful call");

        let requests = transport.requests();
        let [request] = requests.as_slice() else {
            panic!("exactly one request expected");
        };
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "https://api.example.com/v2/pets/42/photos");
        assert_eq!(request.params, ParameterBag::new().add_param("limit", 10));
    }

    #[tokio::test]
    async fn should_dispatch_by_alias() {
        let transport = RecordingTransport::default();
        let client = petstore(transport.clone());
        let params = ParameterBag::new()
            .add_param("petId", 7)
            .add_param("name", "doggie");

        client
            .call_operation("update_pet", &params, RequestOptions::default())
            .await
            .expect("successful call");

        let urls: Vec<_> = transport
            .requests()
            .into_iter()
            .map(|it| format!("{} {}", it.method, it.url))
            .collect();
        assert_eq!(urls, ["PUT https://api.example.com/v2/pets/7"]);
    }

    #[tokio::test]
    async fn should_fail_for_unknown_operation() {
        let transport = RecordingTransport::default();
        let client = petstore(transport.clone());

        let result = client
            .call_operation("deletePet", &ParameterBag::new(), RequestOptions::default())
            .await;

        let Err(error) = result else {
            panic!("unknown operation should fail");
        };
        insta::assert_snapshot!(error, @"Unknown operation: deletePet");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn should_call_ad_hoc_path_with_client_configuration() {
        let transport = RecordingTransport::default();
        let client = petstore(transport.clone());
        let path = PathTemplate::parse("/store/order/{orderId}").expect("valid template");
        let params = ParameterBag::new().add_param("orderId", 3);

        client.delete(&path, &params).await.expect("successful call");
        client.get(&path, &params).await.expect("successful call");

        let urls: Vec<_> = transport
            .requests()
            .into_iter()
            .map(|it| format!("{} {}", it.method, it.url))
            .collect();
        assert_eq!(
            urls,
            [
                "DELETE https://api.example.com/v2/store/order/3",
                "GET https://api.example.com/v2/store/order/3",
            ]
        );
    }

    #[test]
    fn should_find_operation_by_id_or_alias() {
        let client = petstore(RecordingTransport::default());

        let by_id = client.operation("listPetPhotos").map(Operation::id);
        let by_alias = client.operation("list_pet_photos").map(Operation::id);

        assert_eq!(by_id, Some("listPetPhotos"));
        assert_eq!(by_alias, Some("listPetPhotos"));
        assert!(client.operation("listpetphotos").is_none());
    }
}
