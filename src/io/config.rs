//! Configuration files supplying parameter defaults
//!
//! A configuration file holds top-level tables: `global` applies to every
//! command, and a table named after a command applies to that command only,
//! overriding `global` key by key.
//!
//! ```toml
//! [global]
//! greet = "Hi"
//!
//! [cmd2]
//! time = "13:00"
//! ```

use crate::core::{ArgValue, ConfigMap};
use crate::error::{DynCliError, Result};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the table applying to every command
pub const GLOBAL_SECTION: &str = "global";

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    #[default]
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Pick the format from a file's extension
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| DynCliError::unsupported_format(path))
    }

    /// File extensions tried during discovery, preferred first
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Toml => &["toml"],
            Self::Yaml => &["yaml", "yml"],
            Self::Json => &["json"],
        }
    }

    /// Parse file content into a value tree
    pub fn parse(&self, content: &str) -> Result<ArgValue> {
        match self {
            Self::Toml => {
                let value: toml::Value = toml::from_str(content)?;
                ArgValue::from_serialize(&value)
            }
            Self::Yaml => {
                let value: serde_yaml::Value = serde_yaml::from_str(content)?;
                ArgValue::from_serialize(&value)
            }
            Self::Json => Ok(ArgValue::new(serde_json::from_str(content)?)),
        }
    }
}

/// Where configuration discovery looks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigLocation {
    /// `./.{app}.{ext}` then `~/.{app}.{ext}`
    File,
    /// `{config_dir}/{app}/config.{ext}`
    Dir,
    /// File candidates first, then Dir candidates
    #[default]
    Both,
}

/// Configuration for file discovery
#[derive(Debug, Clone, Default)]
pub struct FinderConfig {
    pub format: ConfigFormat,
    pub location: ConfigLocation,
    /// Working directory searched first (defaults to the process cwd)
    pub current_dir: Option<PathBuf>,
    /// Home directory (defaults to `dirs::home_dir`)
    pub home_dir: Option<PathBuf>,
    /// Per-user configuration root (defaults to `dirs::config_dir`)
    pub config_dir: Option<PathBuf>,
}

/// Locates an application's configuration file
pub struct ConfigFinder {
    app_name: String,
    config: FinderConfig,
}

impl ConfigFinder {
    /// Create a new finder with default configuration
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            config: FinderConfig::default(),
        }
    }

    /// Create a new finder with custom configuration
    pub fn with_config(app_name: impl Into<String>, config: FinderConfig) -> Self {
        Self {
            app_name: app_name.into(),
            config,
        }
    }

    /// Every path discovery would try, in order
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        let exts = self.config.format.extensions();

        if matches!(self.config.location, ConfigLocation::File | ConfigLocation::Both) {
            let cwd = self
                .config
                .current_dir
                .clone()
                .or_else(|| std::env::current_dir().ok());
            let home = self.config.home_dir.clone().or_else(dirs::home_dir);
            for root in [cwd, home].into_iter().flatten() {
                for ext in exts {
                    candidates.push(root.join(format!(".{}.{}", self.app_name, ext)));
                }
            }
        }

        if matches!(self.config.location, ConfigLocation::Dir | ConfigLocation::Both) {
            if let Some(root) = self.config.config_dir.clone().or_else(dirs::config_dir) {
                for ext in exts {
                    candidates.push(root.join(&self.app_name).join(format!("config.{}", ext)));
                }
            }
        }

        candidates
    }

    /// First existing candidate
    pub fn find(&self) -> Option<PathBuf> {
        let found = self.candidates().into_iter().find(|path| path.is_file());
        match &found {
            Some(path) => info!("Using configuration file {}", path.display()),
            None => debug!("No configuration file found for {}", self.app_name),
        }
        found
    }
}

/// Parameter defaults read from configuration, by section
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigDefaults {
    global: ConfigMap,
    commands: BTreeMap<String, ConfigMap>,
}

impl ConfigDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a configuration file; errors are returned
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;
        Self::parse_str(&content, format, path)
    }

    /// Parse configuration content; `origin` is only used in errors
    pub fn parse_str(content: &str, format: ConfigFormat, origin: &Path) -> Result<Self> {
        let tree = format.parse(content)?;
        Self::from_value(&tree, origin)
    }

    /// Split a parsed tree into the global and per-command sections
    pub fn from_value(tree: &ArgValue, origin: &Path) -> Result<Self> {
        let mut defaults = Self::new();

        let sections = match tree.as_inner() {
            serde_json::Value::Object(sections) => sections,
            // An empty YAML document
            serde_json::Value::Null => return Ok(defaults),
            _ => return Err(DynCliError::config(origin, "top level must be a table")),
        };

        for (section, body) in sections {
            let table = match body {
                serde_json::Value::Object(table) => table,
                _ if section == GLOBAL_SECTION => {
                    return Err(DynCliError::config(origin, "`global` must be a table"));
                }
                _ => {
                    debug!("Ignoring top-level key `{}` in {}", section, origin.display());
                    continue;
                }
            };
            let map: ConfigMap = table
                .iter()
                .map(|(key, value)| (key.clone(), ArgValue::new(value.clone())))
                .collect();

            if section == GLOBAL_SECTION {
                defaults.global = map;
            } else {
                defaults.commands.insert(section.clone(), map);
            }
        }

        Ok(defaults)
    }

    pub fn with_global(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.global.insert(name.into(), value.into());
        self
    }

    pub fn with_command(
        mut self,
        command: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<ArgValue>,
    ) -> Self {
        self.commands
            .entry(command.into())
            .or_default()
            .insert(name.into(), value.into());
        self
    }

    pub fn global(&self) -> &ConfigMap {
        &self.global
    }

    /// `global` merged with the command's own section, which wins
    pub fn for_command(&self, command: &str) -> ConfigMap {
        let mut merged = self.global.clone();
        if let Some(section) = self.commands.get(command) {
            merged.extend(section.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.commands.is_empty()
    }
}

/// Where an application takes its configuration defaults from
///
/// The default is [`ConfigSource::None`]: an application reads no file
/// unless it opts in, typically with [`ConfigSource::discover`]. Building
/// an application therefore never depends on the files present in the
/// working or home directory.
#[derive(Debug, Clone, Default)]
pub enum ConfigSource {
    #[default]
    None,
    /// Search the standard locations for the application's file
    Discover {
        format: ConfigFormat,
        location: ConfigLocation,
    },
    /// A specific file
    File(PathBuf),
    /// Already resolved defaults
    Defaults(ConfigDefaults),
}

impl ConfigSource {
    /// Discover a TOML file in every standard location
    pub fn discover() -> Self {
        Self::Discover {
            format: ConfigFormat::default(),
            location: ConfigLocation::default(),
        }
    }

    /// Resolve to defaults; a missing or broken file yields no defaults
    pub fn resolve(&self, app_name: &str) -> ConfigDefaults {
        let path = match self {
            Self::None => return ConfigDefaults::new(),
            Self::Defaults(defaults) => return defaults.clone(),
            Self::File(path) => path.clone(),
            Self::Discover { format, location } => {
                let finder = ConfigFinder::with_config(
                    app_name,
                    FinderConfig {
                        format: *format,
                        location: *location,
                        ..Default::default()
                    },
                );
                match finder.find() {
                    Some(path) => path,
                    None => return ConfigDefaults::new(),
                }
            }
        };

        if !path.is_file() {
            info!("Configuration file {} not found", path.display());
            return ConfigDefaults::new();
        }

        match ConfigDefaults::load(&path) {
            Ok(defaults) => defaults,
            Err(e) => {
                warn!("Ignoring configuration file {}: {}", path.display(), e);
                ConfigDefaults::new()
            }
        }
    }
}
