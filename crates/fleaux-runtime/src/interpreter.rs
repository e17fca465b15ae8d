//! Reference evaluator for lowered modules.
//!
//! The interpreter runs [`GeneratedModule`]s directly, with the same
//! observable behavior as the emitted Python: module-scope bindings are
//! registered in statement order, top-level expressions run as they are
//! reached, and unit bodies look bindings up at call time so a later `let`
//! of the same name shadows an earlier one for every subsequent call.
//!
//! Unit calls recurse on the Rust stack. The public entry points therefore
//! evaluate on a dedicated thread with an [`EVAL_STACK_SIZE`] stack, which
//! leaves room for [`MAX_CALL_DEPTH`] nested calls with deep bodies.

use std::sync::Arc;
use std::thread;

use fleaux_compiler::{GeneratedModule, Item, Literal, LoweredExpr, MaterializedUnit, ReceiverRef};
use fleaux_core::RuntimeError;
use fleaux_parser::ast::BinaryOp;
use rustc_hash::FxHashMap;

use crate::builtins::Builtin;
use crate::console::Console;
use crate::ops;
use crate::receiver::{PipeReceiver, UnitHandle};
use crate::value::{Bundle, Value};

/// Deepest unit call nesting before evaluation fails.
pub const MAX_CALL_DEPTH: usize = 1000;

/// Stack reserved for the evaluation thread, 256 KiB per call level.
pub const EVAL_STACK_SIZE: usize = MAX_CALL_DEPTH * (256 << 10);

/// Parameter values of the unit being evaluated.
type Frame = FxHashMap<String, Value>;

/// Evaluates lowered modules against a [`Console`].
pub struct Interpreter {
    /// generated module name -> binding -> unit
    globals: FxHashMap<String, FxHashMap<String, Arc<MaterializedUnit>>>,
    console: Console,
    depth: usize,
    max_depth: usize,
}

impl Interpreter {
    pub fn new(console: Console) -> Self {
        Self {
            globals: FxHashMap::default(),
            console,
            depth: 0,
            max_depth: MAX_CALL_DEPTH,
        }
    }

    /// Override the unit call nesting limit.
    ///
    /// Limits above [`MAX_CALL_DEPTH`] may exhaust the evaluation stack.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }

    pub fn into_console(self) -> Console {
        self.console
    }

    /// Check whether `module` has been loaded.
    pub fn is_loaded(&self, module: &str) -> bool {
        self.globals.contains_key(module)
    }

    /// Load every module in order and return the last one's top-level values.
    ///
    /// Dependencies must precede their importers, which is the order a
    /// compilation session produces them in.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(&mut self, modules: &[GeneratedModule]) -> Result<Vec<Value>, RuntimeError> {
        self.on_eval_stack(|interp| {
            let mut values = Vec::new();
            for module in modules {
                values = interp.load_inline(module)?;
            }
            Ok(values)
        })
    }

    /// Execute one module's statements and return its top-level values.
    pub fn load_module(&mut self, module: &GeneratedModule) -> Result<Vec<Value>, RuntimeError> {
        self.on_eval_stack(|interp| interp.load_inline(module))
    }

    fn load_inline(&mut self, module: &GeneratedModule) -> Result<Vec<Value>, RuntimeError> {
        tracing::debug!(
            module = %module.source_name,
            generated = %module.generated_name,
            items = module.items.len(),
            "loading module"
        );
        let name = module.generated_name.clone();
        self.globals.entry(name.clone()).or_default();

        let mut values = Vec::new();
        for item in &module.items {
            match item {
                Item::Unit(unit) => {
                    if let Some(scope) = self.globals.get_mut(&name) {
                        scope.insert(unit.binding.clone(), Arc::new(unit.clone()));
                    }
                }
                Item::Expr(expr) => {
                    values.push(self.eval(&name, &Frame::default(), expr)?);
                }
            }
        }
        Ok(values)
    }

    /// Invoke `binding` from a loaded module with `bundle`.
    pub fn call(
        &mut self,
        module: &str,
        binding: &str,
        bundle: Bundle,
    ) -> Result<Value, RuntimeError> {
        let handle = self.unit_handle(module, binding)?;
        self.on_eval_stack(|interp| interp.call_unit(&handle, bundle))
    }

    /// Run `f` on a scoped thread with an [`EVAL_STACK_SIZE`] stack.
    fn on_eval_stack<T, F>(&mut self, f: F) -> Result<T, RuntimeError>
    where
        T: Send,
        F: FnOnce(&mut Self) -> Result<T, RuntimeError> + Send,
    {
        thread::scope(|scope| {
            let spawned = thread::Builder::new()
                .name("fleaux-eval".into())
                .stack_size(EVAL_STACK_SIZE)
                .spawn_scoped(scope, || f(self));
            match spawned {
                Ok(worker) => worker
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic)),
                Err(e) => Err(RuntimeError::Io {
                    message: format!("cannot start evaluation thread: {e}"),
                }),
            }
        })
    }

    pub(crate) fn call_unit(
        &mut self,
        handle: &UnitHandle,
        bundle: Bundle,
    ) -> Result<Value, RuntimeError> {
        let unit = &handle.unit;
        if bundle.len() != unit.arity() {
            return Err(RuntimeError::ArityMismatch {
                receiver: unit.binding.clone(),
                expected: unit.arity().to_string(),
                got: bundle.len(),
            });
        }
        if self.depth >= self.max_depth {
            return Err(RuntimeError::CallDepthExceeded {
                limit: self.max_depth,
            });
        }

        let frame: Frame = unit
            .params
            .iter()
            .map(|param| param.name.clone())
            .zip(bundle.into_items())
            .collect();

        self.depth += 1;
        let result = self.eval(&handle.module, &frame, &unit.body);
        self.depth -= 1;
        result
    }

    // ==========================================================================
    // Evaluation
    // ==========================================================================

    fn eval(
        &mut self,
        module: &str,
        frame: &Frame,
        expr: &LoweredExpr,
    ) -> Result<Value, RuntimeError> {
        match expr {
            LoweredExpr::Literal(literal) => Ok(literal_value(literal)),
            LoweredExpr::Param(name) => frame
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::Unbound { name: name.clone() }),
            LoweredExpr::Receiver(receiver) => Err(RuntimeError::TypeMismatch {
                context: format!("'{receiver}'"),
                expected: "a value".into(),
                actual: "pipe receiver".into(),
            }),
            LoweredExpr::Bundle(items) => items
                .iter()
                .map(|item| self.eval(module, frame, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Tuple),
            LoweredExpr::Unary { op, operand } => {
                let value = self.eval(module, frame, operand)?;
                ops::unary(*op, &value)
            }
            LoweredExpr::Binary { op, left, right } => {
                let left = self.eval(module, frame, left)?;
                match op {
                    BinaryOp::And if !left.is_truthy() => Ok(left),
                    BinaryOp::Or if left.is_truthy() => Ok(left),
                    BinaryOp::And | BinaryOp::Or => self.eval(module, frame, right),
                    _ => {
                        let right = self.eval(module, frame, right)?;
                        ops::binary(*op, &left, &right)
                    }
                }
            }
            LoweredExpr::Pipeline { input, receiver } => {
                let bundle = self.eval(module, frame, input)?.into_bundle();
                let target = self.resolve(module, receiver)?;
                tracing::trace!(receiver = %target, args = bundle.len(), "pipe");
                target.invoke(self, bundle)
            }
        }
    }

    fn resolve(&self, module: &str, receiver: &ReceiverRef) -> Result<PipeReceiver, RuntimeError> {
        match receiver {
            ReceiverRef::Local { name } => self.unit_handle(module, name).map(PipeReceiver::Unit),
            ReceiverRef::Member {
                generated_module,
                name,
                ..
            } => self
                .unit_handle(generated_module, name)
                .map(PipeReceiver::Unit),
            ReceiverRef::Builtin { name, .. } => Builtin::from_name(name)
                .map(PipeReceiver::Builtin)
                .ok_or_else(|| RuntimeError::NotAReceiver {
                    what: receiver.to_string(),
                }),
        }
    }

    fn unit_handle(&self, module: &str, binding: &str) -> Result<UnitHandle, RuntimeError> {
        self.globals
            .get(module)
            .and_then(|scope| scope.get(binding))
            .map(|unit| UnitHandle {
                module: module.to_string(),
                unit: Arc::clone(unit),
            })
            .ok_or_else(|| RuntimeError::Unbound {
                name: binding.to_string(),
            })
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Int(v) => Value::Int(*v),
        // no arbitrary-precision integers; the nearest float stands in
        Literal::BigInt(text) => Value::Float(text.parse().unwrap_or(f64::NAN)),
        Literal::Float(v) => Value::Float(*v),
        Literal::String(raw) => Value::String(unescape(raw)),
        Literal::Bool(v) => Value::Bool(*v),
        Literal::Null => Value::Null,
    }
}

/// Resolve the escapes a string literal may carry. Unknown escapes are kept
/// verbatim, backslash included.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
