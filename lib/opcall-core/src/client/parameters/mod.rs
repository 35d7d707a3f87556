//! Request inputs for an operation call.
//!
//! - [`PathTemplate`] - The templated REST path (e.g., `/pets/{petId}`)
//! - [`ParameterBag`] - Named parameter values, for the path and for the payload

mod bag;
pub use self::bag::ParameterBag;

mod path;
pub use self::path::{PathTemplate, Segment};

mod value;
pub(in crate::client) use self::value::{encode_path_value, path_value, scalar_to_string};
