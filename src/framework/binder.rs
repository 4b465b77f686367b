//! Turning clap matches back into call arguments

use super::builder::{ParamPlan, Storage, CONF_FILE_ID};
use crate::app::RegisteredCommand;
use crate::core::{ArgValue, CallArgs, ParamMode, ValueType};
use crate::error::{DynCliError, Result};
use crate::io::ConfigDefaults;
use clap::parser::ValueSource;
use clap::ArgMatches;
use log::debug;
use std::path::{Path, PathBuf};

fn matches_error(command: &str, id: &str, err: clap::parser::MatchesError) -> DynCliError {
    DynCliError::framework(command, format!("cannot read `{}`: {}", id, err))
}

fn path_value(path: &Path) -> ArgValue {
    ArgValue::string(path.to_string_lossy())
}

fn one(command: &str, plan: &ParamPlan<'_>, matches: &ArgMatches) -> Result<Option<ArgValue>> {
    let id = plan.id();
    let err = |e| matches_error(command, id, e);

    let value = match plan.storage {
        Storage::Flag | Storage::Bool => matches
            .try_get_one::<bool>(id)
            .map_err(err)?
            .map(|b| ArgValue::bool(*b)),
        Storage::Int => matches
            .try_get_one::<i64>(id)
            .map_err(err)?
            .map(|i| ArgValue::int(*i)),
        Storage::Float => matches
            .try_get_one::<f64>(id)
            .map_err(err)?
            .map(|f| ArgValue::float(*f)),
        Storage::Path => matches
            .try_get_one::<PathBuf>(id)
            .map_err(err)?
            .map(|p| path_value(p)),
        Storage::Str => match matches.try_get_one::<String>(id).map_err(err)? {
            Some(raw) => Some(ArgValue::parse_as(raw, plan.value_type)?),
            None => None,
        },
    };
    Ok(value)
}

fn many(command: &str, plan: &ParamPlan<'_>, matches: &ArgMatches) -> Result<Option<ArgValue>> {
    let id = plan.id();
    let err = |e| matches_error(command, id, e);

    let values: Option<Vec<ArgValue>> = match plan.storage {
        Storage::Int => matches
            .try_get_many::<i64>(id)
            .map_err(err)?
            .map(|vs| vs.map(|i| ArgValue::int(*i)).collect()),
        Storage::Float => matches
            .try_get_many::<f64>(id)
            .map_err(err)?
            .map(|vs| vs.map(|f| ArgValue::float(*f)).collect()),
        Storage::Flag | Storage::Bool => matches
            .try_get_many::<bool>(id)
            .map_err(err)?
            .map(|vs| vs.map(|b| ArgValue::bool(*b)).collect()),
        Storage::Path => matches
            .try_get_many::<PathBuf>(id)
            .map_err(err)?
            .map(|vs| vs.map(|p| path_value(p)).collect()),
        Storage::Str => matches
            .try_get_many::<String>(id)
            .map_err(err)?
            .map(|vs| vs.map(ArgValue::string).collect()),
    };
    Ok(values.map(ArgValue::list))
}

/// Values taken from defaults or files are parsed to the parameter's type,
/// the same as if they had been typed on the command line
fn coerce(plan: &ParamPlan<'_>, value: &ArgValue) -> Result<ArgValue> {
    if plan.value_type != ValueType::List && plan.multiple {
        value.coerce_elements(plan.value_type)
    } else {
        value.coerce_to(plan.value_type)
    }
}

/// Collect one value per parameter, in signature order
///
/// Where clap fell back to a default, the declared default is bound instead
/// (coerced to the parameter's type) so list and typed defaults survive.
pub(crate) fn bind(registered: &RegisteredCommand, matches: &ArgMatches) -> Result<CallArgs> {
    let command = registered.command();
    let mut args = CallArgs::new();

    for param in command.signature().params() {
        let plan = ParamPlan::new(param);

        let bound = match matches.value_source(plan.id()) {
            Some(ValueSource::DefaultValue) if param.default.is_some() => None,
            Some(_) if plan.multiple && plan.storage != Storage::Flag => {
                many(command.name(), &plan, matches)?
            }
            Some(_) => one(command.name(), &plan, matches)?,
            None => None,
        };

        let value = match (bound, &param.default) {
            (Some(value), _) => value,
            (None, Some(default)) => coerce(&plan, default)?,
            (None, None) if param.mode == ParamMode::Variadic => ArgValue::list(Vec::new()),
            (None, None) => ArgValue::null(),
        };
        args.insert(param.name.clone(), value);
    }

    if registered.options().config_option {
        apply_conf_file(registered, matches, &mut args)?;
    }

    Ok(args)
}

/// Values from `--conf-file` override everything not typed on the command line
fn apply_conf_file(
    registered: &RegisteredCommand,
    matches: &ArgMatches,
    args: &mut CallArgs,
) -> Result<()> {
    let command = registered.command();
    let path = match matches
        .try_get_one::<PathBuf>(CONF_FILE_ID)
        .map_err(|e| matches_error(command.name(), CONF_FILE_ID, e))?
    {
        Some(path) => path,
        None => return Ok(()),
    };

    let values = ConfigDefaults::load(path)?.for_command(command.name());
    for (name, value) in values {
        let param = match command.signature().get(&name) {
            Some(param) => param,
            None => {
                debug!("Ignoring `{}` from {}: no such parameter", name, path.display());
                continue;
            }
        };
        if matches.value_source(&name) == Some(ValueSource::CommandLine) {
            continue;
        }
        debug!("`{}` set from {}", name, path.display());
        args.insert(name, coerce(&ParamPlan::new(param), &value)?);
    }
    Ok(())
}
