use http::uri::Scheme;
use serde::Deserialize;

/// How substituted path parameter values are written into the URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathEncoding {
    /// Values are inserted verbatim.
    ///
    /// A value containing `/`, `?` or spaces will change the shape of the URL.
    #[default]
    Raw,
    /// Values are percent-encoded, every non-alphanumeric byte escaped.
    Percent,
}

/// Target server of the operation calls.
///
/// The URL of a call is `{protocol}://{host}{base_path}{path}`.
///
/// # Default Configuration
///
/// - **Protocol**: `http`
/// - **Host**: `127.0.0.1`
/// - **Base path**: empty
/// - **Path encoding**: [`PathEncoding::Raw`]
///
/// # Example
///
/// ```rust
/// use opcall_core::Configuration;
///
/// let configuration = Configuration::builder()
///     .with_protocol("https")
///     .with_host("petstore.swagger.io")
///     .with_base_path("/v2")
///     .build();
///
/// assert_eq!(configuration.base_url(), "https://petstore.swagger.io/v2");
/// ```
///
/// It can also be deserialized, using the field names of a Swagger document:
///
/// ```rust
/// use opcall_core::Configuration;
///
/// let configuration: Configuration = serde_json::from_str(
///     r#"{ "protocol": "https", "host": "petstore.swagger.io", "basePath": "/v2" }"#,
/// )?;
///
/// assert_eq!(configuration.base_path(), "/v2");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    protocol: String,
    host: String,
    #[serde(alias = "base_path")]
    base_path: String,
    #[serde(alias = "path_encoding")]
    path_encoding: PathEncoding,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            protocol: Scheme::HTTP.to_string(),
            host: "127.0.0.1".to_string(),
            base_path: String::new(),
            path_encoding: PathEncoding::default(),
        }
    }
}

impl Configuration {
    /// Starts from the default configuration.
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// The protocol, without `://`.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// The host, with an optional port.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The path prefix, possibly empty.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// How substituted path values are encoded.
    pub fn path_encoding(&self) -> PathEncoding {
        self.path_encoding
    }

    /// The URL prefix shared by every call: `{protocol}://{host}{base_path}`.
    pub fn base_url(&self) -> String {
        let Self {
            protocol,
            host,
            base_path,
            path_encoding: _,
        } = self;
        format!("{protocol}://{host}{base_path}")
    }
}

/// Builder for [`Configuration`].
///
/// Values are taken as given; nothing is validated or normalized.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationBuilder {
    configuration: Configuration,
}

impl ConfigurationBuilder {
    /// Finishes the configuration.
    pub fn build(self) -> Configuration {
        self.configuration
    }

    /// Sets the protocol, e.g. `"https"`.
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.configuration.protocol = protocol.into();
        self
    }

    /// Sets the protocol from an [`http`] scheme.
    pub fn with_scheme(self, scheme: &Scheme) -> Self {
        self.with_protocol(scheme.as_str())
    }

    /// Sets the host, optionally with a port: `"api.example.com"`, `"localhost:8080"`.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.configuration.host = host.into();
        self
    }

    /// Sets the base path prepended to every template, e.g. `"/v2"`.
    ///
    /// The path template already starts with `/`, so the base path should not end
    /// with one.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.configuration.base_path = base_path.into();
        self
    }

    /// Sets how path parameter values are encoded.
    pub fn with_path_encoding(mut self, path_encoding: PathEncoding) -> Self {
        self.configuration.path_encoding = path_encoding;
        self
    }
}

impl From<Configuration> for ConfigurationBuilder {
    fn from(configuration: Configuration) -> Self {
        Self { configuration }
    }
}
