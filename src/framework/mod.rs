//! clap adapter
//!
//! Introspects the rewritten signatures into a `clap::Command` tree, parses
//! the command line, binds matches back into [`CallArgs`](crate::core::CallArgs)
//! and invokes the selected handler.

mod binder;
mod builder;

pub use builder::build_command;

use crate::app::App;
use crate::error::{DynCliError, Result};
use clap::error::ErrorKind;
use clap::Command;
use log::debug;
use std::ffi::OsString;
use std::io::Write;

/// Build the full command-line interface of an application
///
/// An application with a single command runs it without a subcommand name.
pub fn build_cli(app: &App) -> Result<Command> {
    let commands = app.commands();
    if commands.is_empty() {
        return Err(DynCliError::framework(app.name(), "no commands registered"));
    }

    let mut cli = if let [single] = commands {
        build_command(single, app.version().is_some())?.name(app.name().to_string())
    } else {
        let mut root = Command::new(app.name().to_string())
            .subcommand_required(true)
            .arg_required_else_help(true);
        for registered in commands {
            root = root.subcommand(build_command(registered, false)?);
        }
        root
    };

    if let Some(about) = app.about() {
        cli = cli.about(about.to_string());
    }
    if let Some(version) = app.version() {
        cli = cli.version(version.to_string());
    }
    Ok(cli)
}

/// Parse `args`, bind and invoke the selected command
pub fn run_from<I, T>(app: &App, args: I, out: &mut dyn Write) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = build_cli(app)?;
    let matches = match cli.try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            write!(out, "{}", e.render())?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let (registered, matches) = match app.commands() {
        [single] => (single, &matches),
        _ => {
            let (name, sub) = matches
                .subcommand()
                .ok_or_else(|| DynCliError::framework(app.name(), "no command selected"))?;
            let registered = app
                .get_command(name)
                .ok_or_else(|| DynCliError::unknown_command(name))?;
            (registered, sub)
        }
    };

    let call_args = binder::bind(registered, matches)?;
    debug!("Invoking `{}` with {:?}", registered.name(), call_args);
    registered.command().call(&call_args, out)?;
    Ok(())
}
