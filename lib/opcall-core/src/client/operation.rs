use http::Method;
use serde::{Deserialize, Deserializer};

use super::{ApiClientError, PathTemplate};

/// A callable operation: its id, HTTP verb and path template.
///
/// Descriptors can be deserialized from JSON:
///
/// ```rust
/// use opcall_core::Operation;
///
/// let operation: Operation = serde_json::from_str(
///     r#"{ "operationId": "getPetById", "verb": "get", "path": "/pet/{petId}" }"#,
/// )?;
///
/// assert_eq!(operation.id(), "getPetById");
/// assert_eq!(operation.alias(), "get_pet_by_id");
/// assert_eq!(operation.verb(), &http::Method::GET);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", alias = "id")]
    id: String,
    #[serde(deserialize_with = "deserialize_method")]
    verb: Method,
    path: PathTemplate,
}

impl Operation {
    /// Creates an operation from an already parsed template.
    pub fn new(id: impl Into<String>, verb: Method, path: PathTemplate) -> Self {
        let id = id.into();
        Self { id, verb, path }
    }

    /// Parses the path template and builds the operation.
    ///
    /// # Errors
    ///
    /// Fails if the path template is malformed.
    pub fn parse(id: impl Into<String>, verb: Method, path: &str) -> Result<Self, ApiClientError> {
        let path = PathTemplate::parse(path)?;
        Ok(Self::new(id, verb, path))
    }

    /// The operation id, e.g. `getPetById`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The HTTP method.
    pub fn verb(&self) -> &Method {
        &self.verb
    }

    /// The path template, relative to the base path.
    pub fn path(&self) -> &PathTemplate {
        &self.path
    }

    /// The snake_case name of the operation, e.g. `find_pets_by_status` for
    /// `findPetsByStatus`.
    pub fn alias(&self) -> String {
        use cruet::*;
        self.id.to_snake_case()
    }
}

fn deserialize_method<'de, D>(deserializer: D) -> Result<Method, D::Error>
where
    D: Deserializer<'de>,
{
    let verb = String::deserialize(deserializer)?;
    Method::from_bytes(verb.to_uppercase().as_bytes()).map_err(serde::de::Error::custom)
}

/// Parses a JSON list of operation descriptors.
pub(in crate::client) fn operations_from_json(json: &str) -> Result<Vec<Operation>, ApiClientError> {
    let deserializer = &mut serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize(deserializer).map_err(|err| ApiClientError::OperationsJson {
        path: err.path().to_string(),
        error: err.into_inner(),
    })
}
