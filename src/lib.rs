//! dyncli: shared argument metadata for clap command-line applications
//!
//! This library lets an application declare the type, default value and
//! help text of its command arguments once, in a registry keyed by
//! parameter name, and have every command that takes a parameter of that
//! name pick the metadata up automatically. Command functions keep their
//! own explicit declarations; the registry only fills the gaps.
//!
//! # Features
//!
//! - **Application-wide and command-local spec tables** with precedence
//! - **Signature rewriting** that never touches the command body
//! - **Configuration defaults** from TOML, YAML or JSON files
//! - **clap integration** with help text, defaults and typed parsing
//! - **Comprehensive error handling** with detailed error types
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dyncli::{App, ArgSpec, CommandFn, Marker, Result, Signature, SpecTable, ValueType};
//! use std::io::Write;
//!
//! fn main() -> Result<()> {
//!     let specs = SpecTable::application()
//!         .with(
//!             "name",
//!             ArgSpec::new(ValueType::String, Marker::argument().help("Who to greet"))
//!                 .with_default("World"),
//!         )?
//!         .with(
//!             "greet",
//!             ArgSpec::new(ValueType::String, Marker::option().help("Greeting word"))
//!                 .with_default("Hello"),
//!         )?;
//!
//!     let mut app = App::builder("greeter").specs(specs).build();
//!     app.command().register(CommandFn::new(
//!         "hello",
//!         Signature::from_names(["name", "greet"])?,
//!         |args, out| {
//!             writeln!(out, "{} {}", args.str("greet")?, args.str("name")?)?;
//!             Ok(())
//!         },
//!     ))?;
//!
//!     app.run()
//! }
//! ```
//!
//! ## Configuration Defaults
//!
//! ```rust,no_run
//! use dyncli::{App, ConfigFormat, ConfigLocation, ConfigSource, Result};
//!
//! fn main() -> Result<()> {
//!     // Looks for ./.greeter.yaml, ~/.greeter.yaml and <config dir>/greeter/config.yaml
//!     let app = App::builder("greeter")
//!         .config(ConfigSource::Discover {
//!             format: ConfigFormat::Yaml,
//!             location: ConfigLocation::Both,
//!         })
//!         .build();
//!     println!("{:?}", app.config_defaults());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`core`]: specs, signatures, scope merge and signature rewriting
//! - [`io`]: configuration file discovery and loading
//! - [`app`]: application and command registration
//! - [`framework`]: the clap adapter
//! - [`error`]: error types

// Public API exports
pub use error::{DynCliError, ErrorSeverity, Result};

// Registration
pub use app::{
    App, AppBuilder, CommandDecorator, CommandEntry, CommandOptions, RegisteredCommand,
};

// Core types
pub use core::{
    resolve, rewrite, ArgSpec, ArgValue, CallArgs, CommandFn, ConfigMap, EffectiveSpec,
    EffectiveSpecs, Handler, Marker, Param, ParamKind, ParamMode, Scope, Signature, SpecOrigin,
    SpecTable, ValueType,
};

// IO types
pub use io::{
    ConfigDefaults, ConfigFinder, ConfigFormat, ConfigLocation, ConfigSource, FinderConfig,
};

pub mod app;
pub mod core;
pub mod error;
pub mod framework;
pub mod io;

/// Convenience functions for common operations
pub mod convenience {
    //! Shortcuts for using the merge and rewrite engine without an [`App`](crate::App)

    use crate::{resolve, rewrite, CommandFn, ConfigDefaults, ConfigFinder, Result, SpecTable};
    use std::path::Path;

    /// Rewrite a single command against one spec table, without configuration
    pub fn inject(command: &CommandFn, specs: &SpecTable) -> CommandFn {
        let effective = resolve(command.signature(), None, Some(specs), &Default::default());
        rewrite(command, &effective)
    }

    /// Load the configuration file at `path`
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ConfigDefaults> {
        ConfigDefaults::load(path)
    }

    /// Discover and load the TOML configuration of `app_name`
    ///
    /// Returns `Ok(None)` when no file exists.
    pub fn discover_config(app_name: &str) -> Result<Option<ConfigDefaults>> {
        ConfigFinder::new(app_name)
            .find()
            .map(ConfigDefaults::load)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn greet_specs() -> SpecTable {
        SpecTable::application()
            .with(
                "name",
                ArgSpec::new(ValueType::String, Marker::argument()).with_default("World"),
            )
            .unwrap()
    }

    #[test]
    fn test_end_to_end_workflow() {
        let mut app = App::builder("greeter").specs(greet_specs()).build();
        app.command()
            .register(CommandFn::new(
                "hello",
                Signature::from_names(["name"]).unwrap(),
                |args, out| {
                    writeln!(out, "Hello {}", args.str("name")?)?;
                    Ok(())
                },
            ))
            .unwrap();

        let mut out = Vec::new();
        app.run_from(["greeter"], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Hello World\n");
    }

    #[test]
    fn test_convenience_inject() {
        let command = CommandFn::new(
            "hello",
            Signature::from_names(["name", "other"]).unwrap(),
            |_, _| Ok(()),
        );
        let injected = convenience::inject(&command, &greet_specs());

        assert!(injected.shares_handler(&command));
        assert_eq!(
            injected.signature().get("name").unwrap().default,
            Some(ArgValue::from("World"))
        );
        assert_eq!(injected.signature().get("other").unwrap().default, None);
    }

    #[test]
    fn test_convenience_load_config() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[global]\nname = \"Ann\"").unwrap();
        file.flush().unwrap();

        let config = convenience::load_config(file.path()).unwrap();
        assert_eq!(config.global().get("name"), Some(&ArgValue::from("Ann")));

        let missing = convenience::load_config("/nonexistent/.greeter.toml");
        assert!(missing.is_err());
    }
}
