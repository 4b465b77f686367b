//! Core value types for argument defaults and bound arguments
//!
//! Configuration files (TOML, YAML, JSON), spec defaults and parsed
//! command-line text all normalize to [`ArgValue`], a thin wrapper over
//! `serde_json::Value`.

use crate::error::{DynCliError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically typed argument value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgValue {
    inner: serde_json::Value,
}

impl ArgValue {
    /// Create a new value from a JSON value
    pub fn new(value: serde_json::Value) -> Self {
        Self { inner: value }
    }

    /// Create a null value
    pub fn null() -> Self {
        Self::new(serde_json::Value::Null)
    }

    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Self::new(serde_json::Value::String(s.into()))
    }

    /// Create an integer value
    pub fn int(i: i64) -> Self {
        Self::new(serde_json::Value::from(i))
    }

    /// Create a float value
    ///
    /// Non-finite floats have no JSON representation and become null.
    pub fn float(f: f64) -> Self {
        Self::new(
            serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        )
    }

    /// Create a boolean value
    pub fn bool(b: bool) -> Self {
        Self::new(serde_json::Value::Bool(b))
    }

    /// Create a list value
    pub fn list(values: Vec<ArgValue>) -> Self {
        Self::new(serde_json::Value::Array(
            values.into_iter().map(|v| v.inner).collect(),
        ))
    }

    /// Convert any serializable value (e.g. a `toml::Value` or a
    /// `serde_yaml::Value`) into an argument value
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self::new(serde_json::to_value(value)?))
    }

    /// Get the inner JSON value
    pub fn into_inner(self) -> serde_json::Value {
        self.inner
    }

    /// Get a reference to the inner JSON value
    pub fn as_inner(&self) -> &serde_json::Value {
        &self.inner
    }

    pub fn is_null(&self) -> bool {
        self.inner.is_null()
    }

    pub fn is_string(&self) -> bool {
        self.inner.is_string()
    }

    pub fn is_bool(&self) -> bool {
        self.inner.is_boolean()
    }

    pub fn is_list(&self) -> bool {
        self.inner.is_array()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.inner.as_str()
    }

    pub fn as_int(&self) -> Option<i64> {
        self.inner.as_i64()
    }

    pub fn as_float(&self) -> Option<f64> {
        self.inner.as_f64()
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.inner.as_bool()
    }

    /// Try to convert to a list of values
    pub fn as_list(&self) -> Option<Vec<ArgValue>> {
        self.inner
            .as_array()
            .map(|items| items.iter().cloned().map(ArgValue::new).collect())
    }

    /// Render the value the way a user would type it on the command line
    pub fn to_cli_string(&self) -> String {
        match &self.inner {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Null => String::new(),
            serde_json::Value::Array(_) => self.cli_strings().join(","),
            other => other.to_string(),
        }
    }

    /// Render each element of a list (or the scalar itself) for the command line
    pub fn cli_strings(&self) -> Vec<String> {
        match self.as_list() {
            Some(items) => items.iter().map(ArgValue::to_cli_string).collect(),
            None if self.is_null() => Vec::new(),
            None => vec![self.to_cli_string()],
        }
    }

    /// Parse command-line text into a value of the given type
    pub fn parse_as(raw: &str, value_type: ValueType) -> Result<Self> {
        let trimmed = raw.trim();

        match value_type {
            ValueType::String | ValueType::Path => Ok(Self::string(raw)),
            ValueType::Int => trimmed
                .parse::<i64>()
                .map(Self::int)
                .map_err(|_| DynCliError::type_conversion(raw, "integer")),
            ValueType::Float => trimmed
                .parse::<f64>()
                .map(Self::float)
                .map_err(|_| DynCliError::type_conversion(raw, "float")),
            ValueType::Bool => match trimmed.to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(Self::bool(true)),
                "false" | "no" | "off" | "0" => Ok(Self::bool(false)),
                _ => Err(DynCliError::type_conversion(raw, "boolean")),
            },
            // Comma-separated for CLI convenience
            ValueType::List => Ok(Self::list(
                raw.split(',')
                    .map(|part| Self::string(part.trim()))
                    .collect(),
            )),
        }
    }

    /// Convert a value read from a file to `value_type`, the way the same
    /// text typed on the command line would be parsed
    ///
    /// Null stays null. Lists are kept for [`ValueType::List`].
    pub fn coerce_to(&self, value_type: ValueType) -> Result<Self> {
        if self.is_null() {
            return Ok(self.clone());
        }
        let same = match (ValueType::of(self), value_type) {
            (Some(ValueType::String), ValueType::Path) => true,
            (Some(actual), wanted) => actual == wanted,
            (None, _) => false,
        };
        if same {
            return Ok(self.clone());
        }
        if self.inner.is_object() {
            return Err(DynCliError::type_conversion(
                self.to_string(),
                value_type.name(),
            ));
        }
        Self::parse_as(&self.to_cli_string(), value_type)
    }

    /// Convert every element of a list (or a lone scalar) to `value_type`
    pub fn coerce_elements(&self, value_type: ValueType) -> Result<Self> {
        if self.is_null() {
            return Ok(self.clone());
        }
        let items = self.as_list().unwrap_or_else(|| vec![self.clone()]);
        items
            .iter()
            .map(|item| item.coerce_to(value_type))
            .collect::<Result<Vec<_>>>()
            .map(Self::list)
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        Self::string(s)
    }
}

impl From<i64> for ArgValue {
    fn from(i: i64) -> Self {
        Self::int(i)
    }
}

impl From<i32> for ArgValue {
    fn from(i: i32) -> Self {
        Self::int(i64::from(i))
    }
}

impl From<f64> for ArgValue {
    fn from(f: f64) -> Self {
        Self::float(f)
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        Self::bool(b)
    }
}

impl From<Vec<ArgValue>> for ArgValue {
    fn from(values: Vec<ArgValue>) -> Self {
        Self::list(values)
    }
}

impl From<serde_json::Value> for ArgValue {
    fn from(value: serde_json::Value) -> Self {
        Self::new(value)
    }
}

/// The value type a parameter is parsed as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Int,
    Float,
    Bool,
    Path,
    List,
}

impl ValueType {
    /// Infer the type of a default value
    ///
    /// Null and table values carry no usable type.
    pub fn of(value: &ArgValue) -> Option<Self> {
        match value.as_inner() {
            serde_json::Value::String(_) => Some(Self::String),
            serde_json::Value::Bool(_) => Some(Self::Bool),
            serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => Some(Self::Int),
            serde_json::Value::Number(_) => Some(Self::Float),
            serde_json::Value::Array(_) => Some(Self::List),
            serde_json::Value::Null | serde_json::Value::Object(_) => None,
        }
    }

    /// Name used in generated documentation
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Path => "path",
            Self::List => "list",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_creation() {
        assert!(ArgValue::null().is_null());
        assert_eq!(ArgValue::string("World").as_str(), Some("World"));
        assert_eq!(ArgValue::int(42).as_int(), Some(42));
        assert_eq!(ArgValue::float(1.5).as_float(), Some(1.5));
        assert_eq!(ArgValue::bool(true).as_bool(), Some(true));
        assert!(ArgValue::float(f64::NAN).is_null());
    }

    #[test]
    fn test_parse_as() {
        assert_eq!(
            ArgValue::parse_as(" 7 ", ValueType::Int).unwrap(),
            ArgValue::int(7)
        );
        assert_eq!(
            ArgValue::parse_as("yes", ValueType::Bool).unwrap(),
            ArgValue::bool(true)
        );
        assert_eq!(
            ArgValue::parse_as("a, b", ValueType::List).unwrap(),
            ArgValue::list(vec!["a".into(), "b".into()])
        );
        assert!(matches!(
            ArgValue::parse_as("seven", ValueType::Int),
            Err(DynCliError::TypeConversion { .. })
        ));
    }

    #[test]
    fn test_cli_rendering() {
        assert_eq!(ArgValue::string("12:00").to_cli_string(), "12:00");
        assert_eq!(ArgValue::int(3).to_cli_string(), "3");
        assert_eq!(ArgValue::null().to_cli_string(), "");
        let list = ArgValue::list(vec!["x".into(), ArgValue::int(1)]);
        assert_eq!(list.cli_strings(), vec!["x".to_string(), "1".to_string()]);
        assert_eq!(list.to_cli_string(), "x,1");
    }

    #[test]
    fn test_type_inference() {
        assert_eq!(ValueType::of(&"Hi".into()), Some(ValueType::String));
        assert_eq!(ValueType::of(&10.into()), Some(ValueType::Int));
        assert_eq!(ValueType::of(&0.5.into()), Some(ValueType::Float));
        assert_eq!(ValueType::of(&false.into()), Some(ValueType::Bool));
        assert_eq!(ValueType::of(&ArgValue::null()), None);
    }

    #[test]
    fn test_from_toml_value() {
        let parsed: toml::Value = toml::from_str("a = 1\nb = 'x'").unwrap();
        let value = ArgValue::from_serialize(&parsed).unwrap();
        assert_eq!(value.as_inner()["a"], serde_json::json!(1));
        assert_eq!(value.as_inner()["b"], serde_json::json!("x"));
    }

    #[test]
    fn test_coerce_file_values_to_declared_type() {
        assert_eq!(
            ArgValue::int(42).coerce_to(ValueType::String).unwrap(),
            ArgValue::string("42")
        );
        assert_eq!(
            ArgValue::string("3").coerce_to(ValueType::Int).unwrap(),
            ArgValue::int(3)
        );
        assert_eq!(
            ArgValue::int(2).coerce_to(ValueType::Float).unwrap(),
            ArgValue::float(2.0)
        );
        assert_eq!(
            ArgValue::string("yes").coerce_to(ValueType::Bool).unwrap(),
            ArgValue::bool(true)
        );
        assert_eq!(
            ArgValue::string("a.txt").coerce_to(ValueType::Path).unwrap(),
            ArgValue::string("a.txt")
        );
        assert!(ArgValue::null().coerce_to(ValueType::Int).unwrap().is_null());
        assert!(matches!(
            ArgValue::string("many").coerce_to(ValueType::Int),
            Err(DynCliError::TypeConversion { .. })
        ));
    }

    #[test]
    fn test_coerce_elements() {
        let list = ArgValue::list(vec!["1".into(), 2.into()]);
        assert_eq!(
            list.coerce_elements(ValueType::Int).unwrap(),
            ArgValue::list(vec![1.into(), 2.into()])
        );
        assert_eq!(
            ArgValue::string("x").coerce_elements(ValueType::String).unwrap(),
            ArgValue::list(vec!["x".into()])
        );
    }
}
