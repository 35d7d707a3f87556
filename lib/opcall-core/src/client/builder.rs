use indexmap::IndexMap;
use tracing::debug;

use super::operation::operations_from_json;
use super::{
    ApiClient, ApiClientError, Configuration, ConfigurationBuilder, HttpTransport, Operation,
    OperationInvoker, PathEncoding, ReqwestTransport,
};

/// Builder for creating [`ApiClient`] instances.
///
/// # Default Configuration
///
/// - **Configuration**: see [`Configuration`] (`http://127.0.0.1`, no base path)
/// - **Transport**: [`ReqwestTransport`] with a default `reqwest::Client`
/// - **Operations**: none
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use opcall_core::{ApiClient, Operation};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .with_protocol("https")
///     .with_host("petstore.swagger.io")
///     .with_base_path("/v2")
///     .add_operation(Operation::parse("getPetById", Method::GET, "/pet/{petId}")?)
///     .with_operations_json(r#"[{ "operationId": "addPet", "verb": "post", "path": "/pet" }]"#)?
///     .build()?;
///
/// assert!(client.operation("get_pet_by_id").is_some());
/// assert!(client.operation("addPet").is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClientBuilder<T = ReqwestTransport> {
    transport: T,
    configuration: ConfigurationBuilder,
    operations: Vec<Operation>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            transport: ReqwestTransport::default(),
            configuration: ConfigurationBuilder::default(),
            operations: Vec::new(),
        }
    }
}

impl<T> ApiClientBuilder<T>
where
    T: HttpTransport,
{
    /// Builds the client and its operation table.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiClientError::DuplicateOperation`] when two operations share an
    /// id, or when the snake_case alias of one operation names another.
    pub fn build(self) -> Result<ApiClient<T>, ApiClientError> {
        let Self {
            transport,
            configuration,
            operations: descriptors,
        } = self;

        let mut operations = IndexMap::with_capacity(descriptors.len());
        let mut aliases = IndexMap::with_capacity(descriptors.len());
        for operation in descriptors {
            let id = operation.id().to_string();
            if operations.contains_key(&id) {
                return Err(ApiClientError::DuplicateOperation { id });
            }
            let alias = operation.alias();
            if aliases.get(&alias).is_some_and(|other| other != &id) {
                return Err(ApiClientError::DuplicateOperation { id: alias });
            }
            aliases.insert(alias, id.clone());
            operations.insert(id, operation);
        }

        let configuration = configuration.build();
        debug!(
            base_url = %configuration.base_url(),
            operations = operations.len(),
            "client built"
        );

        Ok(ApiClient {
            configuration,
            invoker: OperationInvoker::new(transport),
            operations,
            aliases,
        })
    }

    /// Replaces the transport.
    ///
    /// ```rust
    /// use opcall_core::{ApiClient, ReqwestTransport};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let http = reqwest::Client::builder().build()?;
    /// let client = ApiClient::builder()
    ///     .with_transport(ReqwestTransport::new(http))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_transport<U>(self, transport: U) -> ApiClientBuilder<U>
    where
        U: HttpTransport,
    {
        let Self {
            transport: _,
            configuration,
            operations,
        } = self;
        ApiClientBuilder {
            transport,
            configuration,
            operations,
        }
    }

    /// Replaces the whole configuration.
    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = ConfigurationBuilder::from(configuration);
        self
    }

    /// Sets the protocol, e.g. `https`.
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.configuration = self.configuration.with_protocol(protocol);
        self
    }

    /// Sets the host, with an optional port.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.configuration = self.configuration.with_host(host);
        self
    }

    /// Sets the path prefix shared by every operation, e.g. `/v2`.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.configuration = self.configuration.with_base_path(base_path);
        self
    }

    /// Sets how path parameter values are encoded.
    pub fn with_path_encoding(mut self, path_encoding: PathEncoding) -> Self {
        self.configuration = self.configuration.with_path_encoding(path_encoding);
        self
    }

    /// Registers one operation.
    pub fn add_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Registers several operations.
    pub fn with_operations(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.operations.extend(operations);
        self
    }

    /// Registers the operations of a JSON descriptor list.
    ///
    /// Each descriptor is `{ "operationId": "...", "verb": "get", "path": "/pets/{petId}" }`.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiClientError::OperationsJson`], with the JSON path of the faulty
    /// element, when the list cannot be read.
    pub fn with_operations_json(self, json: &str) -> Result<Self, ApiClientError> {
        let operations = operations_from_json(json)?;
        Ok(self.with_operations(operations))
    }
}
