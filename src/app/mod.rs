//! Application and command registration
//!
//! An [`App`] captures the application-wide [`SpecTable`] and the
//! configuration defaults once. Every command registered through
//! [`App::command`] is merged against them, rewritten, and stored ready for
//! the clap adapter.

use crate::core::{resolve, rewrite, CommandFn, Scope, SpecTable};
use crate::error::{DynCliError, Result};
use crate::framework;
use crate::io::{ConfigDefaults, ConfigSource};
use log::{debug, info};
use std::ffi::OsString;
use std::io::Write;

/// Presentation options for one command
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    pub about: Option<String>,
    pub long_about: Option<String>,
    /// Text printed after the argument list
    pub after_help: Option<String>,
    pub hidden: bool,
    pub no_args_is_help: bool,
    /// Add a `--conf-file` option whose file overrides bound values
    pub config_option: bool,
}

/// A command as stored in the registry: rewritten signature plus options
#[derive(Debug, Clone)]
pub struct RegisteredCommand {
    command: CommandFn,
    options: CommandOptions,
}

impl RegisteredCommand {
    pub fn name(&self) -> &str {
        self.command.name()
    }

    pub fn command(&self) -> &CommandFn {
        &self.command
    }

    pub fn options(&self) -> &CommandOptions {
        &self.options
    }
}

/// A command-line application with shared argument specs
#[derive(Debug)]
pub struct App {
    name: String,
    about: Option<String>,
    version: Option<String>,
    specs: SpecTable,
    config: ConfigDefaults,
    commands: Vec<RegisteredCommand>,
}

impl App {
    /// Application without shared specs or configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    pub fn builder(name: impl Into<String>) -> AppBuilder {
        AppBuilder {
            name: name.into(),
            about: None,
            version: None,
            specs: None,
            config: ConfigSource::None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Application-wide specs
    pub fn specs(&self) -> &SpecTable {
        &self.specs
    }

    pub fn config_defaults(&self) -> &ConfigDefaults {
        &self.config
    }

    /// Registered commands in registration order
    pub fn commands(&self) -> &[RegisteredCommand] {
        &self.commands
    }

    pub fn get_command(&self, name: &str) -> Option<&RegisteredCommand> {
        self.commands.iter().find(|c| c.name() == name)
    }

    /// Start registering a command
    pub fn command(&mut self) -> CommandDecorator<'_> {
        CommandDecorator {
            app: self,
            name: None,
            specs: None,
            options: CommandOptions::default(),
        }
    }

    fn register(
        &mut self,
        func: CommandFn,
        name: Option<String>,
        local: Option<SpecTable>,
        options: CommandOptions,
    ) -> Result<&RegisteredCommand> {
        let name = name.unwrap_or_else(|| func.name().to_string());
        if self.get_command(&name).is_some() {
            return Err(DynCliError::duplicate_command(name));
        }
        let func = if func.name() == name {
            func
        } else {
            func.renamed(name.as_str())
        };

        let local = local.map(|table| table.rescoped(Scope::Command));
        let config = self.config.for_command(&name);
        let effective = resolve(func.signature(), local.as_ref(), Some(&self.specs), &config);
        let registered = RegisteredCommand {
            command: rewrite(&func, &effective),
            options,
        };

        // Fail at registration rather than at the first invocation
        framework::build_command(&registered, false)?;

        info!(
            "Registered command `{}` ({} of {} parameters injected)",
            name,
            effective.len(),
            func.signature().len()
        );
        debug!("Signature of `{}`: {:?}", name, registered.command.signature());

        self.commands.push(registered);
        let index = self.commands.len() - 1;
        Ok(&self.commands[index])
    }

    /// Register every entry of a command table, in order
    ///
    /// Either all entries are registered or, on the first error, none of
    /// them are and the error is returned.
    pub fn register_all<I>(&mut self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = CommandEntry>,
    {
        let start = self.commands.len();
        for entry in entries {
            let CommandEntry {
                command,
                name,
                specs,
                options,
            } = entry;
            let registered = self.register(command, name, specs, options).map(|_| ());
            if let Err(e) = registered {
                self.commands.truncate(start);
                return Err(e);
            }
        }
        Ok(self.commands.len() - start)
    }

    /// Parse `args` (program name first), run the selected command and
    /// write its output to `out`
    ///
    /// Help and version requests are written to `out` and succeed.
    pub fn run_from<I, T>(&self, args: I, out: &mut dyn Write) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        framework::run_from(self, args, out)
    }

    /// Run with the process arguments, writing to stdout
    ///
    /// Command-line errors are printed by clap and end the process.
    pub fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match self.run_from(std::env::args_os(), &mut out) {
            Err(DynCliError::Clap(e)) => e.exit(),
            other => other,
        }
    }
}

/// One row of a command table for [`App::register_all`]
#[derive(Debug, Clone)]
pub struct CommandEntry {
    pub command: CommandFn,
    /// Register under this name instead of the function's own
    pub name: Option<String>,
    /// Command-local specs
    pub specs: Option<SpecTable>,
    pub options: CommandOptions,
}

impl CommandEntry {
    pub fn new(command: CommandFn) -> Self {
        Self {
            command,
            name: None,
            specs: None,
            options: CommandOptions::default(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn specs(mut self, specs: SpecTable) -> Self {
        self.specs = Some(specs);
        self
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.options.about = Some(about.into());
        self
    }

    pub fn with_config_option(mut self, yes: bool) -> Self {
        self.options.config_option = yes;
        self
    }

    pub fn options(mut self, options: CommandOptions) -> Self {
        self.options = options;
        self
    }
}

impl From<CommandFn> for CommandEntry {
    fn from(command: CommandFn) -> Self {
        Self::new(command)
    }
}

/// Builder for [`App`]
pub struct AppBuilder {
    name: String,
    about: Option<String>,
    version: Option<String>,
    specs: Option<SpecTable>,
    config: ConfigSource,
}

impl AppBuilder {
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Application-wide specs shared by every command
    pub fn specs(mut self, specs: SpecTable) -> Self {
        self.specs = Some(specs);
        self
    }

    /// Configuration source; without this call no file is read
    pub fn config(mut self, source: ConfigSource) -> Self {
        self.config = source;
        self
    }

    /// Resolve configuration and build the application
    ///
    /// A missing or unparseable configuration file leaves the application
    /// without configuration defaults.
    pub fn build(self) -> App {
        let config = self.config.resolve(&self.name);
        let specs = self
            .specs
            .map(|table| table.rescoped(Scope::Application))
            .unwrap_or_else(SpecTable::application);

        App {
            name: self.name,
            about: self.about,
            version: self.version,
            specs,
            config,
            commands: Vec::new(),
        }
    }
}

/// Pending registration of one command
pub struct CommandDecorator<'a> {
    app: &'a mut App,
    name: Option<String>,
    specs: Option<SpecTable>,
    options: CommandOptions,
}

impl<'a> CommandDecorator<'a> {
    /// Register under this name instead of the function's own
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Command-local specs overriding the application-wide ones
    pub fn specs(mut self, specs: SpecTable) -> Self {
        self.specs = Some(specs);
        self
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.options.about = Some(about.into());
        self
    }

    pub fn long_about(mut self, long_about: impl Into<String>) -> Self {
        self.options.long_about = Some(long_about.into());
        self
    }

    pub fn after_help(mut self, text: impl Into<String>) -> Self {
        self.options.after_help = Some(text.into());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.options.hidden = hidden;
        self
    }

    pub fn no_args_is_help(mut self, yes: bool) -> Self {
        self.options.no_args_is_help = yes;
        self
    }

    pub fn with_config_option(mut self, yes: bool) -> Self {
        self.options.config_option = yes;
        self
    }

    /// Merge, rewrite and register `func`
    pub fn register(self, func: CommandFn) -> Result<&'a RegisteredCommand> {
        let CommandDecorator {
            app,
            name,
            specs,
            options,
        } = self;
        app.register(func, name, specs, options)
    }
}
