//! Framework markers: "positional argument" or "named option" plus an
//! opaque bag of display attributes forwarded to clap.

use super::value::ArgValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Whether a parameter is taken positionally or by `--name`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Positional,
    Named,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional => write!(f, "argument"),
            Self::Named => write!(f, "option"),
        }
    }
}

/// Attribute keys the clap adapter understands
pub mod attrs {
    pub const HELP: &str = "help";
    pub const LONG_HELP: &str = "long_help";
    pub const SHORT: &str = "short";
    pub const LONG: &str = "long";
    pub const VALUE_NAME: &str = "value_name";
    pub const METAVAR: &str = "metavar";
    pub const HIDDEN: &str = "hidden";
    pub const ALIAS: &str = "alias";
    pub const HEADING: &str = "heading";
    pub const CHOICES: &str = "choices";
}

/// Marker attached to a parameter
///
/// The library never interprets the attributes; only the framework adapter
/// reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    kind: ParamKind,
    attrs: BTreeMap<String, ArgValue>,
}

impl Marker {
    /// Marker for a positional argument
    pub fn argument() -> Self {
        Self::new(ParamKind::Positional)
    }

    /// Marker for a named option
    pub fn option() -> Self {
        Self::new(ParamKind::Named)
    }

    pub fn new(kind: ParamKind) -> Self {
        Self {
            kind,
            attrs: BTreeMap::new(),
        }
    }

    /// Set an arbitrary attribute
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn help(self, text: impl Into<String>) -> Self {
        self.attr(attrs::HELP, text.into())
    }

    pub fn long_help(self, text: impl Into<String>) -> Self {
        self.attr(attrs::LONG_HELP, text.into())
    }

    pub fn short(self, c: char) -> Self {
        self.attr(attrs::SHORT, c.to_string())
    }

    pub fn long(self, name: impl Into<String>) -> Self {
        self.attr(attrs::LONG, name.into())
    }

    pub fn value_name(self, name: impl Into<String>) -> Self {
        self.attr(attrs::VALUE_NAME, name.into())
    }

    pub fn hidden(self, hidden: bool) -> Self {
        self.attr(attrs::HIDDEN, hidden)
    }

    pub fn alias(self, name: impl Into<String>) -> Self {
        self.attr(attrs::ALIAS, name.into())
    }

    /// Help section the parameter is listed under
    pub fn heading(self, heading: impl Into<String>) -> Self {
        self.attr(attrs::HEADING, heading.into())
    }

    pub fn choices<I, S>(self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = choices
            .into_iter()
            .map(|c| ArgValue::string(c.into()))
            .collect();
        self.attr(attrs::CHOICES, ArgValue::list(values))
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    pub fn attrs(&self) -> &BTreeMap<String, ArgValue> {
        &self.attrs
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.attrs.get(key)
    }

    /// Help text, if any
    pub fn help_text(&self) -> Option<&str> {
        self.get(attrs::HELP).and_then(ArgValue::as_str)
    }
}
