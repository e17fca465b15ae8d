//! Pipe receivers: anything that can stand on the right of `->`.

use std::fmt;
use std::sync::Arc;

use fleaux_compiler::MaterializedUnit;
use fleaux_core::RuntimeError;

use crate::builtins::Builtin;
use crate::interpreter::Interpreter;
use crate::value::{Bundle, Value};

/// A materialized unit together with the generated module it lives in.
#[derive(Debug, Clone)]
pub struct UnitHandle {
    pub module: String,
    pub unit: Arc<MaterializedUnit>,
}

/// A resolved receiver, ready to be invoked on a bundle.
#[derive(Debug, Clone)]
pub enum PipeReceiver {
    Builtin(Builtin),
    Unit(UnitHandle),
}

impl PipeReceiver {
    /// Invoke the receiver. Bundle size must match a unit's parameter count.
    pub fn invoke(&self, interp: &mut Interpreter, bundle: Bundle) -> Result<Value, RuntimeError> {
        match self {
            PipeReceiver::Builtin(builtin) => builtin.call(bundle, interp.console_mut()),
            PipeReceiver::Unit(handle) => interp.call_unit(handle, bundle),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PipeReceiver::Builtin(builtin) => builtin.name(),
            PipeReceiver::Unit(handle) => &handle.unit.binding,
        }
    }
}

impl fmt::Display for PipeReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipeReceiver::Builtin(builtin) => write!(f, "Std.{builtin}"),
            PipeReceiver::Unit(handle) => write!(f, "{}.{}", handle.module, handle.unit.binding),
        }
    }
}
