//! Configuration file discovery and loading

pub mod config;

pub use config::{
    ConfigDefaults, ConfigFinder, ConfigFormat, ConfigLocation, ConfigSource, FinderConfig,
    GLOBAL_SECTION,
};
