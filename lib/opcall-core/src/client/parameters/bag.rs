use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Named parameters supplied for a single call.
///
/// The bag holds path parameters and residual (query or body) parameters alike; the
/// invoker decides which is which from the path template. Values are JSON values so
/// both scalars and structured payloads can be carried.
///
/// # Example
///
/// ```rust
/// use opcall_core::ParameterBag;
///
/// let params = ParameterBag::new()
///     .add_param("petId", 42)
///     .add_param("limit", 10);
///
/// assert_eq!(params.len(), 2);
/// assert!(params.contains("petId"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterBag(IndexMap<String, Value>);

impl ParameterBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value with the same name.
    pub fn add_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a parameter and returns the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Returns the value of a parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether a parameter is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag holds no parameter.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns a copy of this bag without the given names.
    pub(in crate::client) fn without(&self, names: &[&str]) -> Self {
        let mut result = self.clone();
        result.0.retain(|name, _| !names.contains(&name.as_str()));
        result
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterBag
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a ParameterBag {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
