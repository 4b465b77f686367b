//! Core library types for argument metadata injection
//!
//! This module contains the registry, merge and rewrite engine:
//! - ArgSpec / SpecTable: per-name type, default and marker for one scope
//! - Signature / Param: the explicit parameter schema of a command
//! - resolve: scope merge into one effective spec per parameter
//! - rewrite: a new command whose signature carries the effective specs

pub mod call;
pub mod doc;
pub mod marker;
pub mod merge;
pub mod rewrite;
pub mod signature;
pub mod spec;
pub mod value;

pub use call::CallArgs;
pub use marker::{Marker, ParamKind};
pub use merge::{resolve, ConfigMap, EffectiveSpec, EffectiveSpecs, SpecOrigin};
pub use rewrite::{rewrite, CommandFn, Handler};
pub use signature::{Param, ParamMode, Signature};
pub use spec::{ArgSpec, Scope, SpecTable};
pub use value::{ArgValue, ValueType};
