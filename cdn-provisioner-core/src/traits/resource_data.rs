//! Declared configuration interface

use crate::types::{AttrError, AttrValue};

/// Declared configuration of one resource instance, as handed over by the engine.
///
/// Implementors supply raw access and change tracking; typed accessors are
/// provided. An absent attribute means "inherit the remote default". Empty
/// strings and empty lists read as [`AttrError::NotFound`].
pub trait ResourceData {
    /// Identity token; empty when the resource has not been created.
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Raw declared value.
    fn get(&self, key: &str) -> Option<&AttrValue>;

    /// Whether the attribute changed since the last apply.
    fn has_change(&self, key: &str) -> bool;

    /// `(old, new)` values of the attribute.
    fn get_change(&self, key: &str) -> (Option<&AttrValue>, Option<&AttrValue>);

    /// Write a value into state (after a remote read). Does not mark a change.
    fn set(&mut self, key: &str, value: AttrValue);

    /// The value if present and non-empty.
    fn lookup(&self, key: &str) -> Result<&AttrValue, AttrError> {
        match self.get(key) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(AttrError::NotFound(key.to_string())),
        }
    }

    fn get_string(&self, key: &str) -> Result<String, AttrError> {
        match self.lookup(key)? {
            AttrValue::Str(s) => Ok(s.clone()),
            other => Err(wrong_type(key, "string", other)),
        }
    }

    fn get_int(&self, key: &str) -> Result<i64, AttrError> {
        match self.lookup(key)? {
            AttrValue::Int(i) => Ok(*i),
            other => Err(wrong_type(key, "int", other)),
        }
    }

    /// Integers widen to floats.
    #[allow(clippy::cast_precision_loss)]
    fn get_float(&self, key: &str) -> Result<f64, AttrError> {
        match self.lookup(key)? {
            AttrValue::Float(f) => Ok(*f),
            AttrValue::Int(i) => Ok(*i as f64),
            other => Err(wrong_type(key, "float", other)),
        }
    }

    fn get_bool(&self, key: &str) -> Result<bool, AttrError> {
        match self.lookup(key)? {
            AttrValue::Bool(b) => Ok(*b),
            other => Err(wrong_type(key, "bool", other)),
        }
    }

    fn get_list(&self, key: &str) -> Result<Vec<String>, AttrError> {
        match self.lookup(key)? {
            AttrValue::List(l) => Ok(l.clone()),
            other => Err(wrong_type(key, "list", other)),
        }
    }
}

fn wrong_type(key: &str, expected: &'static str, actual: &AttrValue) -> AttrError {
    AttrError::WrongType {
        key: key.to_string(),
        expected,
        actual: actual.kind(),
    }
}
