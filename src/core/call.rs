//! Bound argument values handed to a command handler

use super::value::ArgValue;
use crate::error::{DynCliError, Result};
use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// Arguments bound for one invocation, in signature order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallArgs {
    values: Vec<(String, ArgValue)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value, replacing any previous binding for the name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(entry, _)| *entry == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.iter().any(|(entry, _)| entry == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw bound value
    pub fn value(&self, name: &str) -> Result<&ArgValue> {
        self.values
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| value)
            .ok_or_else(|| DynCliError::missing_argument(name))
    }

    /// Deserialize a bound value into any serde type
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self.value(name)?;
        serde_json::from_value(value.as_inner().clone()).map_err(|_| {
            DynCliError::type_conversion(value.to_string(), std::any::type_name::<T>())
        })
    }

    pub fn str(&self, name: &str) -> Result<&str> {
        let value = self.value(name)?;
        value
            .as_str()
            .ok_or_else(|| DynCliError::type_conversion(value.to_string(), "string"))
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        let value = self.value(name)?;
        value
            .as_int()
            .ok_or_else(|| DynCliError::type_conversion(value.to_string(), "integer"))
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        let value = self.value(name)?;
        value
            .as_float()
            .ok_or_else(|| DynCliError::type_conversion(value.to_string(), "float"))
    }

    pub fn bool(&self, name: &str) -> Result<bool> {
        let value = self.value(name)?;
        value
            .as_bool()
            .ok_or_else(|| DynCliError::type_conversion(value.to_string(), "boolean"))
    }

    pub fn path(&self, name: &str) -> Result<PathBuf> {
        self.str(name).map(PathBuf::from)
    }

    pub fn list(&self, name: &str) -> Result<Vec<ArgValue>> {
        let value = self.value(name)?;
        value
            .as_list()
            .ok_or_else(|| DynCliError::type_conversion(value.to_string(), "list"))
    }
}

impl<S: Into<String>, V: Into<ArgValue>> FromIterator<(S, V)> for CallArgs {
    fn from_iter<T: IntoIterator<Item = (S, V)>>(iter: T) -> Self {
        let mut args = Self::new();
        for (name, value) in iter {
            args.insert(name, value);
        }
        args
    }
}
