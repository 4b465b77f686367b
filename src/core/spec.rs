//! Argument specs and the name-unique registry holding them for one scope

use super::call::CallArgs;
use super::marker::{Marker, ParamKind};
use super::value::{ArgValue, ValueType};
use crate::error::{DynCliError, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Level at which a set of names is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Shared by every command of an application
    Application,
    /// Overrides for a single command
    Command,
    /// A command's own parameter list
    Signature,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Application => write!(f, "application"),
            Self::Command => write!(f, "command"),
            Self::Signature => write!(f, "signature"),
        }
    }
}

/// Type, default and marker for one logical parameter name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArgSpec {
    pub value_type: Option<ValueType>,
    pub default: Option<ArgValue>,
    pub marker: Option<Marker>,
}

impl ArgSpec {
    pub fn new(value_type: ValueType, marker: Marker) -> Self {
        Self {
            value_type: Some(value_type),
            default: None,
            marker: Some(marker),
        }
    }

    /// Spec that only fixes the value type
    pub fn typed(value_type: ValueType) -> Self {
        Self {
            value_type: Some(value_type),
            ..Default::default()
        }
    }

    pub fn with_default(mut self, default: impl Into<ArgValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn kind(&self) -> Option<ParamKind> {
        self.marker.as_ref().map(Marker::kind)
    }
}

fn identifier_regex() -> &'static Regex {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"))
}

/// Check that a parameter name is an identifier
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DynCliError::invalid_parameter_name(name, "name is empty"));
    }
    if !identifier_regex().is_match(name) {
        return Err(DynCliError::invalid_parameter_name(
            name,
            "expected letters, digits and underscores, not starting with a digit",
        ));
    }
    Ok(())
}

/// Ordered registry of specs for one scope; names are unique
#[derive(Debug, Clone, PartialEq)]
pub struct SpecTable {
    scope: Scope,
    entries: Vec<(String, ArgSpec)>,
}

impl SpecTable {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            entries: Vec::new(),
        }
    }

    /// Empty application-wide table
    pub fn application() -> Self {
        Self::new(Scope::Application)
    }

    /// Empty command-local table
    pub fn command() -> Self {
        Self::new(Scope::Command)
    }

    /// Build a table, failing on the first repeated name
    pub fn from_entries<I, S>(scope: Scope, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ArgSpec)>,
        S: Into<String>,
    {
        let mut table = Self::new(scope);
        for (name, spec) in entries {
            table.insert(name, spec)?;
        }
        Ok(table)
    }

    /// Add a spec; a name may only be declared once per scope
    pub fn insert(&mut self, name: impl Into<String>, spec: ArgSpec) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        if self.contains(&name) {
            return Err(DynCliError::duplicate_parameter(name, self.scope));
        }
        self.entries.push((name, spec));
        Ok(())
    }

    /// Builder form of [`SpecTable::insert`]
    pub fn with(mut self, name: impl Into<String>, spec: ArgSpec) -> Result<Self> {
        self.insert(name, spec)?;
        Ok(self)
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub(crate) fn rescoped(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn get(&self, name: &str) -> Option<&ArgSpec> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, spec)| spec)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgSpec)> {
        self.entries.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Settings built from the table: every spec's default, replaced by
    /// the matching override
    pub fn instantiate<I, S, V>(&self, overrides: I) -> Result<CallArgs>
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<ArgValue>,
    {
        let mut supplied = BTreeMap::new();
        for (name, value) in overrides {
            let name = name.into();
            if !self.contains(&name) {
                return Err(DynCliError::unknown_parameter(name));
            }
            supplied.insert(name, value.into());
        }

        let mut args = CallArgs::new();
        for (name, spec) in self.iter() {
            let value = supplied
                .remove(name)
                .or_else(|| spec.default.clone())
                .unwrap_or_else(ArgValue::null);
            args.insert(name, value);
        }
        Ok(args)
    }
}
