use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::client::ApiClientError;

/// Regular expression for a segment that is exactly one `{param_name}` placeholder.
static RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{(?<name>\w+)}$").expect("a valid regex"));

/// A single `/`-separated element of a [`PathTemplate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Literal text, emitted unchanged.
    Literal(String),
    /// Named placeholder, replaced by the parameter value.
    Parameter(String),
}

impl Segment {
    fn parse(template: &str, segment: &str) -> Result<Self, ApiClientError> {
        if let Some(name) = RE.captures(segment).and_then(|caps| caps.name("name")) {
            return Ok(Self::Parameter(name.as_str().to_string()));
        }
        if segment.contains(['{', '}']) {
            return Err(ApiClientError::InvalidPathSegment {
                template: template.to_string(),
                segment: segment.to_string(),
            });
        }
        Ok(Self::Literal(segment.to_string()))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => f.write_str(literal),
            Self::Parameter(name) => write!(f, "{{{name}}}"),
        }
    }
}

/// The shape of a REST path: literal segments and named placeholders, in template order.
///
/// Templates use the `{parameter_name}` syntax, one placeholder per segment.
/// Joining the segments with `/` after substitution gives the request path.
///
/// # Examples
///
/// ```rust
/// use opcall_core::PathTemplate;
///
/// let path = PathTemplate::parse("/pets/{petId}/photos")?;
///
/// assert_eq!(path.non_parameter_elements(), ["", "pets", "photos"]);
/// assert_eq!(path.parameter_elements(), ["petId"]);
/// assert_eq!(path.to_string(), "/pets/{petId}/photos");
/// # Ok::<(), opcall_core::ApiClientError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct PathTemplate {
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parses a path template such as `/users/{user_id}/posts`.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiClientError::InvalidPathSegment`] when a segment contains a
    /// brace without being a whole `{name}` placeholder.
    pub fn parse(template: &str) -> Result<Self, ApiClientError> {
        let segments = template
            .split('/')
            .map(|segment| Segment::parse(template, segment))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// Builds a template from already split segments.
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Self {
        let segments = segments.into_iter().collect();
        Self { segments }
    }

    /// All segments in template order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Literal segments, in template order.
    pub fn non_parameter_elements(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Literal(literal) => Some(literal.as_str()),
                Segment::Parameter(_) => None,
            })
            .collect()
    }

    /// Parameter names, in template order.
    pub fn parameter_elements(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Literal(_) => None,
                Segment::Parameter(name) => Some(name.as_str()),
            })
            .collect()
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for PathTemplate {
    type Err = ApiClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for PathTemplate {
    type Error = ApiClientError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for PathTemplate {
    type Error = ApiClientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
