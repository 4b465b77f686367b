//! Scope resolution: command-local specs, application-wide specs and
//! configuration defaults merged into one effective spec per parameter

use super::marker::Marker;
use super::signature::{ParamMode, Signature};
use super::spec::{ArgSpec, SpecTable};
use super::value::{ArgValue, ValueType};
use log::{debug, warn};
use std::collections::BTreeMap;

/// Flat `parameter name -> default` mapping resolved from config files
pub type ConfigMap = BTreeMap<String, ArgValue>;

/// Where an effective spec (or its default) came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecOrigin {
    Command,
    Application,
    Config,
}

/// Merge result for one parameter
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveSpec {
    pub value_type: Option<ValueType>,
    pub default: Option<ArgValue>,
    pub marker: Option<Marker>,
    pub origin: SpecOrigin,
    pub default_origin: Option<SpecOrigin>,
}

/// Effective specs in signature order; parameters left as declared are absent
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectiveSpecs {
    entries: Vec<(String, EffectiveSpec)>,
}

impl EffectiveSpecs {
    pub fn get(&self, name: &str) -> Option<&EffectiveSpec> {
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

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EffectiveSpec)> {
        self.entries.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute the effective spec of every parameter that takes injected metadata
///
/// Parameters carrying an author-supplied default or marker, variadic and
/// keyword-only parameters, and parameters unknown to every source are left
/// out so the rewriter keeps them verbatim.
pub fn resolve(
    signature: &Signature,
    command_specs: Option<&SpecTable>,
    app_specs: Option<&SpecTable>,
    config: &ConfigMap,
) -> EffectiveSpecs {
    let mut entries = Vec::new();

    for param in signature.params() {
        if param.is_explicit() {
            debug!("Keeping explicit declaration of `{}`", param.name);
            continue;
        }
        if param.mode != ParamMode::Standard {
            debug!("Passing through {:?} parameter `{}`", param.mode, param.name);
            continue;
        }

        let local = command_specs.and_then(|t| t.get(&param.name));
        let global = app_specs.and_then(|t| t.get(&param.name));
        if let (Some(local), Some(global)) = (local, global) {
            if local.kind() != global.kind() {
                debug!(
                    "Command spec for `{}` changes kind from {:?} to {:?}",
                    param.name,
                    global.kind(),
                    local.kind()
                );
            }
        }

        let hit: Option<(&ArgSpec, SpecOrigin)> = local
            .map(|spec| (spec, SpecOrigin::Command))
            .or_else(|| global.map(|spec| (spec, SpecOrigin::Application)));
        let from_config = config.get(&param.name);

        let effective = match hit {
            Some((spec, origin)) => {
                let (default, default_origin) = match (&spec.default, from_config) {
                    (Some(default), _) => (Some(default.clone()), Some(origin)),
                    (None, Some(value)) => (Some(value.clone()), Some(SpecOrigin::Config)),
                    (None, None) => (None, None),
                };
                EffectiveSpec {
                    value_type: spec.value_type.or(param.value_type),
                    default,
                    marker: spec.marker.clone(),
                    origin,
                    default_origin,
                }
            }
            None => match from_config {
                Some(value) => EffectiveSpec {
                    value_type: param.value_type,
                    default: Some(value.clone()),
                    marker: None,
                    origin: SpecOrigin::Config,
                    default_origin: Some(SpecOrigin::Config),
                },
                None => continue,
            },
        };

        debug!(
            "Resolved `{}` from {:?} (default from {:?})",
            param.name, effective.origin, effective.default_origin
        );
        entries.push((param.name.clone(), effective));
    }

    if let Some(local) = command_specs {
        for name in local.names() {
            if signature.get(name).is_none() {
                warn!("Command spec `{}` matches no parameter and is ignored", name);
            }
        }
    }

    EffectiveSpecs { entries }
}
