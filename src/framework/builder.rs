//! Signature introspection: one clap `Arg` per parameter

use crate::app::RegisteredCommand;
use crate::core::marker::attrs;
use crate::core::{ArgValue, Marker, Param, ParamKind, ParamMode, ValueType};
use crate::error::{DynCliError, Result};
use clap::builder::{BoolishValueParser, PossibleValuesParser};
use clap::{value_parser, Arg, ArgAction, Command};
use log::debug;
use std::collections::HashSet;

/// Id and long name of the injected configuration option
pub(crate) const CONF_FILE_ID: &str = "conf_file";
const CONF_FILE_LONG: &str = "conf-file";

/// Rust type clap stores a parameter's values as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Storage {
    Str,
    Int,
    Float,
    Bool,
    Path,
    /// `--name` / `--no-name` switch
    Flag,
}

/// How one parameter maps onto clap
#[derive(Debug, Clone)]
pub(crate) struct ParamPlan<'a> {
    pub param: &'a Param,
    pub kind: ParamKind,
    pub value_type: ValueType,
    pub storage: Storage,
    pub multiple: bool,
}

impl<'a> ParamPlan<'a> {
    pub fn new(param: &'a Param) -> Self {
        let kind = match (&param.marker, param.mode) {
            (Some(marker), _) => marker.kind(),
            (None, ParamMode::Variadic) => ParamKind::Positional,
            (None, ParamMode::KeywordOnly) => ParamKind::Named,
            (None, ParamMode::Standard) if param.default.is_some() => ParamKind::Named,
            (None, ParamMode::Standard) => ParamKind::Positional,
        };

        let value_type = param
            .value_type
            .or_else(|| param.default.as_ref().and_then(ValueType::of))
            .unwrap_or(if param.mode == ParamMode::Variadic {
                ValueType::List
            } else {
                ValueType::String
            });
        let multiple = value_type == ValueType::List || param.mode == ParamMode::Variadic;
        let has_choices = param
            .marker
            .as_ref()
            .and_then(|m| m.get(attrs::CHOICES))
            .is_some();

        let storage = match value_type {
            ValueType::Bool if kind == ParamKind::Named => Storage::Flag,
            _ if has_choices => Storage::Str,
            ValueType::Int => Storage::Int,
            ValueType::Float => Storage::Float,
            ValueType::Bool => Storage::Bool,
            ValueType::Path => Storage::Path,
            ValueType::String | ValueType::List => Storage::Str,
        };

        Self {
            param,
            kind,
            value_type,
            storage,
            multiple,
        }
    }

    pub fn id(&self) -> &str {
        &self.param.name
    }

    fn marker_str(&self, key: &str) -> Option<&str> {
        self.param
            .marker
            .as_ref()
            .and_then(|m| m.get(key))
            .and_then(ArgValue::as_str)
    }

    /// Flags whose default is true are spelled `--no-<name>`
    fn negated_flag(&self) -> bool {
        self.storage == Storage::Flag
            && self.param.default.as_ref().and_then(ArgValue::as_bool) == Some(true)
    }

    pub fn long(&self) -> Option<String> {
        if self.kind != ParamKind::Named {
            return None;
        }
        let long = self
            .marker_str(attrs::LONG)
            .map(|s| s.trim_start_matches('-').to_string())
            .unwrap_or_else(|| self.param.name.replace('_', "-"));
        Some(if self.negated_flag() {
            format!("no-{}", long)
        } else {
            long
        })
    }

    pub fn short(&self) -> Option<char> {
        if self.kind != ParamKind::Named {
            return None;
        }
        self.marker_str(attrs::SHORT)
            .and_then(|s| s.trim_start_matches('-').chars().next())
    }

    /// Optional when it has a default, is a flag, or is variadic
    pub fn is_required(&self) -> bool {
        self.param.default.is_none()
            && self.storage != Storage::Flag
            && self.param.mode != ParamMode::Variadic
    }

    pub fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.param.name.clone());

        if let Some(long) = self.long() {
            arg = arg.long(long);
        }
        if let Some(short) = self.short() {
            arg = arg.short(short);
        }

        arg = match self.storage {
            Storage::Flag if self.negated_flag() => arg.action(ArgAction::SetFalse),
            Storage::Flag => arg.action(ArgAction::SetTrue),
            Storage::Int => arg.value_parser(value_parser!(i64)),
            Storage::Float => arg.value_parser(value_parser!(f64)),
            Storage::Bool => arg.value_parser(BoolishValueParser::new()),
            Storage::Path => arg.value_parser(value_parser!(std::path::PathBuf)),
            Storage::Str => arg,
        };

        if self.storage != Storage::Flag {
            if self.multiple {
                arg = arg.action(ArgAction::Append);
                if self.kind == ParamKind::Positional {
                    arg = arg.num_args(1..);
                }
            }
            arg = arg.required(self.is_required());

            match &self.param.default {
                Some(default) if default.is_null() => {}
                Some(default) if self.multiple => {
                    let values = default.cli_strings();
                    if !values.is_empty() {
                        arg = arg.default_values(values);
                    }
                }
                Some(default) => arg = arg.default_value(default.to_cli_string()),
                None => {}
            }
        }

        if let Some(marker) = &self.param.marker {
            arg = apply_marker(arg, marker, self.kind);
        }

        arg
    }
}

/// Forward the marker attributes clap understands
fn apply_marker(mut arg: Arg, marker: &Marker, kind: ParamKind) -> Arg {
    for (key, value) in marker.attrs() {
        match key.as_str() {
            attrs::HELP => arg = arg.help(value.to_cli_string()),
            attrs::LONG_HELP => arg = arg.long_help(value.to_cli_string()),
            attrs::VALUE_NAME | attrs::METAVAR => arg = arg.value_name(value.to_cli_string()),
            attrs::HIDDEN => arg = arg.hide(value.as_bool().unwrap_or(false)),
            attrs::HEADING => arg = arg.help_heading(value.to_cli_string()),
            attrs::ALIAS if kind == ParamKind::Named => {
                for alias in value.cli_strings() {
                    arg = arg.alias(alias);
                }
            }
            attrs::CHOICES => arg = arg.value_parser(PossibleValuesParser::new(value.cli_strings())),
            attrs::LONG | attrs::SHORT => {}
            other => debug!("Attribute `{}` not forwarded to clap", other),
        }
    }
    arg
}

fn check_positionals(command: &str, plans: &[ParamPlan<'_>]) -> Result<()> {
    let mut optional_seen: Option<&str> = None;
    let mut multiple_seen: Option<&str> = None;

    for plan in plans.iter().filter(|p| p.kind == ParamKind::Positional) {
        if let Some(previous) = multiple_seen {
            return Err(DynCliError::framework(
                command,
                format!(
                    "positional `{}` follows multi-valued positional `{}`",
                    plan.id(),
                    previous
                ),
            ));
        }
        if plan.is_required() {
            if let Some(previous) = optional_seen {
                return Err(DynCliError::framework(
                    command,
                    format!(
                        "required positional `{}` follows optional positional `{}`",
                        plan.id(),
                        previous
                    ),
                ));
            }
        } else {
            optional_seen = Some(plan.id());
        }
        if plan.multiple {
            multiple_seen = Some(plan.id());
        }
    }
    Ok(())
}

fn check_names(
    command: &str,
    plans: &[ParamPlan<'_>],
    config_option: bool,
    reserve_version: bool,
) -> Result<()> {
    let mut longs: HashSet<String> = HashSet::from(["help".to_string()]);
    let mut shorts: HashSet<char> = HashSet::from(['h']);
    if reserve_version {
        longs.insert("version".to_string());
        shorts.insert('V');
    }
    if config_option {
        longs.insert(CONF_FILE_LONG.to_string());
        if plans.iter().any(|p| p.id() == CONF_FILE_ID) {
            return Err(DynCliError::framework(
                command,
                format!("parameter `{}` clashes with the config option", CONF_FILE_ID),
            ));
        }
    }

    for plan in plans {
        if let Some(long) = plan.long() {
            if !longs.insert(long.clone()) {
                return Err(DynCliError::framework(
                    command,
                    format!("option `--{}` of `{}` is already taken", long, plan.id()),
                ));
            }
        }
        if let Some(short) = plan.short() {
            if !shorts.insert(short) {
                return Err(DynCliError::framework(
                    command,
                    format!("option `-{}` of `{}` is already taken", short, plan.id()),
                ));
            }
        }
    }
    Ok(())
}

/// Build the clap command for a registered command
///
/// `reserve_version` marks `--version` / `-V` as taken, for a command used
/// as the root of a versioned application.
pub fn build_command(registered: &RegisteredCommand, reserve_version: bool) -> Result<Command> {
    let command = registered.command();
    let options = registered.options();
    let plans: Vec<ParamPlan<'_>> = command
        .signature()
        .params()
        .iter()
        .map(ParamPlan::new)
        .collect();

    check_positionals(command.name(), &plans)?;
    check_names(
        command.name(),
        &plans,
        options.config_option,
        reserve_version,
    )?;

    let mut cmd = Command::new(command.name().to_string());
    if let Some(about) = &options.about {
        cmd = cmd.about(about.clone());
    }
    if let Some(long_about) = &options.long_about {
        cmd = cmd.long_about(long_about.clone());
    }
    if let Some(after_help) = &options.after_help {
        cmd = cmd.after_help(after_help.clone());
    }
    cmd = cmd
        .hide(options.hidden)
        .arg_required_else_help(options.no_args_is_help);

    for plan in &plans {
        cmd = cmd.arg(plan.to_arg());
    }

    if options.config_option {
        cmd = cmd.arg(
            Arg::new(CONF_FILE_ID)
                .long(CONF_FILE_LONG)
                .value_name("PATH")
                .value_parser(value_parser!(std::path::PathBuf))
                .help("Path to the configuration file"),
        );
    }

    Ok(cmd)
}
