//! Explicit parameter schema of a command
//!
//! A [`Signature`] is the introspectable half of a command: the ordered
//! list of parameters the framework adapter builds its parser from.

use super::marker::Marker;
use super::spec::{validate_name, Scope};
use super::value::{ArgValue, ValueType};
use crate::error::{DynCliError, Result};
use std::collections::HashSet;

/// How a parameter receives its values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamMode {
    #[default]
    Standard,
    /// Collects all remaining positional values
    Variadic,
    /// Only settable by name
    KeywordOnly,
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub value_type: Option<ValueType>,
    pub default: Option<ArgValue>,
    pub marker: Option<Marker>,
    pub mode: ParamMode,
}

impl Param {
    /// Plain parameter with no type, default or marker
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: None,
            default: None,
            marker: None,
            mode: ParamMode::Standard,
        }
    }

    pub fn variadic(name: impl Into<String>) -> Self {
        Self {
            mode: ParamMode::Variadic,
            ..Self::new(name)
        }
    }

    pub fn keyword_only(name: impl Into<String>) -> Self {
        Self {
            mode: ParamMode::KeywordOnly,
            ..Self::new(name)
        }
    }

    pub fn typed(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn default(mut self, value: impl Into<ArgValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// The author attached a default or a marker
    pub fn is_explicit(&self) -> bool {
        self.default.is_some() || self.marker.is_some()
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Ordered parameter list with unique names
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    pub fn new(params: Vec<Param>) -> Result<Self> {
        let mut seen = HashSet::new();
        for param in &params {
            validate_name(&param.name)?;
            if !seen.insert(param.name.as_str()) {
                return Err(DynCliError::duplicate_parameter(
                    param.name.clone(),
                    Scope::Signature,
                ));
            }
        }
        Ok(Self { params })
    }

    /// Signature of plain parameters, in order
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(Param::new).collect())
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Apply `f` to every parameter, keeping declaration order
    pub(crate) fn map_params<F>(&self, f: F) -> Self
    where
        F: FnMut(&Param) -> Param,
    {
        Self {
            params: self.params.iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_detection() {
        assert!(!Param::new("greet").is_explicit());
        assert!(!Param::new("greet").typed(ValueType::String).is_explicit());
        assert!(Param::new("name").default("Alice").is_explicit());
        assert!(Param::new("name").marker(Marker::argument()).is_explicit());
    }

    #[test]
    fn test_duplicate_params_rejected() {
        let result = Signature::from_names(["greet", "name", "greet"]);
        assert!(matches!(
            result,
            Err(DynCliError::DuplicateParameter {
                scope: Scope::Signature,
                ..
            })
        ));
    }

    #[test]
    fn test_order_is_declaration_order() {
        let sig = Signature::from_names(["time", "greet", "name"]).unwrap();
        assert_eq!(sig.names().collect::<Vec<_>>(), vec!["time", "greet", "name"]);
        assert!(Signature::default().is_empty());
    }
}
