use serde_json::Value;

use super::ParseError;

/// Top level shape of a REST response.
///
/// WordPress returns most collections as arrays, but some (taxonomies for
/// one) come back as an object keyed by slug.
#[derive(Debug, PartialEq, Eq)]
pub enum Shape {
    Sequence(usize),
    Mapping(usize),
    Unrecognized,
}

impl From<&Value> for Shape {
    fn from(value: &Value) -> Self {
        match value {
            Value::Array(arr) => Shape::Sequence(arr.len()),
            Value::Object(map) => Shape::Mapping(map.len()),
            _ => Shape::Unrecognized,
        }
    }
}

pub fn shape(data: &[u8]) -> Result<Shape, ParseError> {
    let value: Value = serde_json::from_slice(data)?;
    Ok(Shape::from(&value))
}

/// Number of items in a JSON payload.
pub fn count(data: &[u8]) -> Result<i64, ParseError> {
    match shape(data)? {
        Shape::Sequence(len) | Shape::Mapping(len) => Ok(len as i64),
        Shape::Unrecognized => Err(ParseError::NotCountable),
    }
}
