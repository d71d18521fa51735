//! Typed reads from JSON objects for the entity mappers.
//!
//! Every reader returns a `FieldError` instead of failing the document;
//! callers pick a default with [`or_default`] and move on.

use log::{debug, warn};

use crate::error::FieldError;
use crate::json::{JsonValue, Map};

fn present<'a>(obj: &'a Map, field: &'static str) -> Result<&'a JsonValue, FieldError> {
    match obj.get(field) {
        None | Some(JsonValue::Null) => Err(FieldError::Missing(field)),
        Some(value) => Ok(value),
    }
}

/// Integer value, accepting numeric strings as well as numbers.
pub(crate) fn to_integer(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn int(obj: &Map, field: &'static str) -> Result<i64, FieldError> {
    let value = present(obj, field)?;
    to_integer(value).ok_or_else(|| FieldError::WrongType {
        field,
        expected: "integer",
        found: value.type_name(),
    })
}

pub(crate) fn text<'a>(obj: &'a Map, field: &'static str) -> Result<&'a str, FieldError> {
    let value = present(obj, field)?;
    value.as_str().ok_or(FieldError::WrongType {
        field,
        expected: "string",
        found: value.type_name(),
    })
}

pub(crate) fn boolean(obj: &Map, field: &'static str) -> Result<bool, FieldError> {
    let value = present(obj, field)?;
    value.as_bool().ok_or(FieldError::WrongType {
        field,
        expected: "bool",
        found: value.type_name(),
    })
}

pub(crate) fn array<'a>(obj: &'a Map, field: &'static str) -> Result<&'a [JsonValue], FieldError> {
    let value = present(obj, field)?;
    value.as_array().ok_or(FieldError::WrongType {
        field,
        expected: "array",
        found: value.type_name(),
    })
}

pub(crate) fn object<'a>(obj: &'a Map, field: &'static str) -> Result<&'a Map, FieldError> {
    let value = present(obj, field)?;
    value.as_object().ok_or(FieldError::WrongType {
        field,
        expected: "object",
        found: value.type_name(),
    })
}

/// Field value, or `default` when it is missing or unusable.
pub(crate) fn or_default<T>(result: Result<T, FieldError>, default: T) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            report(&err);
            default
        }
    }
}

/// Field value, or `None` when it is missing or unusable.
pub(crate) fn optional<T>(result: Result<T, FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            report(&err);
            None
        }
    }
}

fn report(err: &FieldError) {
    match err {
        FieldError::Missing(_) => debug!("{}, using default", err),
        _ => warn!("{}, ignoring it", err),
    }
}
