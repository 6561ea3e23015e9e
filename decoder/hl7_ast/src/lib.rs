//! Decoded tree model for HL7 v2 messages.
//!
//! A [`Message`] is a list of segment nodes. Below the segment level the tree
//! is shaped by the data: a field that contains no repetition, component or
//! subcomponent delimiter stays a single [`Data::Leaf`], and a
//! [`Composite`] only appears at a level whose delimiter actually occurs.

mod printer;
#[cfg(feature = "serde")]
mod repr;
pub mod tree;

pub use printer::TreePrinter;
pub use tree::{Composite, CompositeKind, Data, Message, Value};

/// A result type for tree serialization helpers.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Serializes a tree value to pretty-printed JSON.
///
/// Intended for fixtures and debugging output; the JSON layout is not a
/// stable interchange format.
///
/// ```
/// use hl7_ast::{to_json, Data};
///
/// let json = to_json(&Data::text("ADT")).unwrap();
/// assert!(json.contains(r#""Present": "ADT""#));
/// ```
#[cfg(feature = "serde")]
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Deserializes a tree value from JSON produced by [`to_json`].
#[cfg(feature = "serde")]
pub fn from_json<T: for<'de> serde::Deserialize<'de>>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}
