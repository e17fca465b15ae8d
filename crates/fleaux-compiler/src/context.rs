//! CompilationContext - per-session compiler state.
//!
//! One context lives exactly as long as one top-level compilation (root
//! module plus its transitive imports). It owns the unit counter, the
//! module-seen table and the stack of modules currently being compiled.
//! Nothing here is shared between sessions.

use fleaux_core::{ResolutionError, Span};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::CompilerOptions;
use crate::builtins::STD_BUILTINS;

/// What the session knows about a compiled (or builtin) module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRecord {
    /// Host-side module name other modules import.
    pub generated_name: String,
    /// Names the module binds at top level.
    pub exports: FxHashSet<String>,
}

impl ModuleRecord {
    /// Check whether the module binds `name`.
    pub fn exports(&self, name: &str) -> bool {
        self.exports.contains(name)
    }
}

/// Per-session compilation state.
#[derive(Debug)]
pub struct CompilationContext {
    options: CompilerOptions,
    /// Next materialized unit id.
    next_unit_id: u64,
    /// Module-seen table: source name to record.
    modules: FxHashMap<String, ModuleRecord>,
    /// Modules whose compilation has started but not finished, outermost first.
    active: Vec<String>,
}

impl CompilationContext {
    /// Create a context with the builtin module already present.
    pub fn new(options: CompilerOptions) -> Self {
        let mut modules = FxHashMap::default();
        modules.insert(
            options.std_module.clone(),
            ModuleRecord {
                generated_name: options.std_generated.clone(),
                exports: STD_BUILTINS.iter().map(|name| name.to_string()).collect(),
            },
        );

        Self {
            options,
            next_unit_id: 0,
            modules,
            active: Vec::new(),
        }
    }

    /// The options this session compiles with.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Take the next unit id. Ids are never reused within a session.
    pub fn next_unit_id(&mut self) -> u64 {
        let id = self.next_unit_id;
        self.next_unit_id += 1;
        id
    }

    /// Look up a module that has finished compiling (or the builtin module).
    pub fn module(&self, name: &str) -> Option<&ModuleRecord> {
        self.modules.get(name)
    }

    /// Check whether `name` is the builtin module.
    pub fn is_std(&self, name: &str) -> bool {
        name == self.options.std_module
    }

    /// Number of modules in the module-seen table, builtin module included.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Record a finished module.
    pub fn record(&mut self, name: impl Into<String>, record: ModuleRecord) {
        self.modules.insert(name.into(), record);
    }

    /// Mark `name` as being compiled.
    ///
    /// Fails with [`ResolutionError::ImportCycle`] when `name` is already on
    /// the active stack; the chain runs from its first entry back to itself.
    pub fn enter(&mut self, name: &str, span: Span) -> Result<(), ResolutionError> {
        if let Some(pos) = self.active.iter().position(|m| m == name) {
            let mut chain = self.active[pos..].to_vec();
            chain.push(name.to_string());
            return Err(ResolutionError::ImportCycle { chain, span });
        }
        self.active.push(name.to_string());
        Ok(())
    }

    /// Pop `name` off the active stack.
    pub fn leave(&mut self, name: &str) {
        debug_assert_eq!(self.active.last().map(String::as_str), Some(name));
        self.active.pop();
    }

    /// The module currently being compiled, if any.
    pub fn current(&self) -> Option<&str> {
        self.active.last().map(String::as_str)
    }
}
