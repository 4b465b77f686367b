//! Commands as handler + signature pairs, and the signature rewriter

use super::call::CallArgs;
use super::merge::EffectiveSpecs;
use super::signature::{Param, Signature};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Executable half of a command
pub type Handler = Arc<dyn Fn(&CallArgs, &mut dyn Write) -> anyhow::Result<()> + Send + Sync>;

/// A command function: a name, the signature the framework introspects,
/// and the handler it invokes
#[derive(Clone)]
pub struct CommandFn {
    name: String,
    signature: Signature,
    handler: Handler,
}

impl CommandFn {
    pub fn new<F>(name: impl Into<String>, signature: Signature, handler: F) -> Self
    where
        F: Fn(&CallArgs, &mut dyn Write) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature,
            handler: Arc::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Same command under another name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Run the handler
    pub fn call(&self, args: &CallArgs, out: &mut dyn Write) -> anyhow::Result<()> {
        (self.handler)(args, out)
    }

    /// Whether two commands execute the same handler
    pub fn shares_handler(&self, other: &CommandFn) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl fmt::Debug for CommandFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandFn")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Build a command whose signature carries the effective specs
///
/// The handler is shared, so calling the result runs exactly the original
/// body. Parameters without an effective spec are cloned verbatim and the
/// parameter order never changes.
pub fn rewrite(command: &CommandFn, effective: &EffectiveSpecs) -> CommandFn {
    let signature = command.signature.map_params(|param| match effective.get(&param.name) {
        Some(spec) => Param {
            name: param.name.clone(),
            value_type: spec.value_type,
            default: spec.default.clone(),
            marker: spec.marker.clone(),
            mode: param.mode,
        },
        None => param.clone(),
    });

    CommandFn {
        name: command.name.clone(),
        signature,
        handler: Arc::clone(&command.handler),
    }
}
