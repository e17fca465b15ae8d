//! Session - one top-level compilation.
//!
//! A session compiles a root module and, depth first, every module it
//! references. Each module is compiled at most once per session; later
//! references reuse the recorded generated name. The unit counter and the
//! module-seen table live in the session's [`CompilationContext`], so two
//! sessions never share them.

use bumpalo::Bump;
use fleaux_core::{FleauxError, Span};
use fleaux_parser::ast::{Parser, Program};
use thiserror::Error;

use crate::context::{CompilationContext, ModuleRecord};
use crate::ir::GeneratedModule;
use crate::loader::ModuleLoader;
use crate::materializer::Materializer;
use crate::resolver::referenced_modules;
use crate::CompilerOptions;

/// A compilation failure, tagged with the module where it happened.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("in module '{module}': {error}")]
pub struct SessionError {
    /// Source module whose compilation failed first.
    pub module: String,
    pub error: FleauxError,
}

impl SessionError {
    fn new(module: &str, error: impl Into<FleauxError>) -> Self {
        Self {
            module: module.to_string(),
            error: error.into(),
        }
    }
}

/// Compiles a root module and its transitive imports.
pub struct Session {
    ctx: CompilationContext,
    loader: Box<dyn ModuleLoader>,
    /// Compiled modules, dependencies before their dependents.
    modules: Vec<GeneratedModule>,
}

impl Session {
    pub fn new(options: CompilerOptions, loader: Box<dyn ModuleLoader>) -> Self {
        Self {
            ctx: CompilationContext::new(options),
            loader,
            modules: Vec::new(),
        }
    }

    /// Load and compile `module`, returning its generated name.
    pub fn compile_root(&mut self, module: &str) -> Result<String, SessionError> {
        if let Some(generated) = self.memoized(module) {
            return Ok(generated);
        }
        let source = self
            .loader
            .load(module)
            .map_err(|e| SessionError::new(module, e.into_resolution(module, Span::default())))?;
        self.compile_source(module, &source)
    }

    /// Compile `source` as module `module`, loading its imports through the
    /// session's loader. Returns the generated module name.
    pub fn compile_source(&mut self, module: &str, source: &str) -> Result<String, SessionError> {
        if let Some(generated) = self.memoized(module) {
            return Ok(generated);
        }
        self.ctx
            .enter(module, Span::default())
            .map_err(|e| SessionError::new(module, e))?;
        let result = self.compile_inner(module, source);
        self.ctx.leave(module);
        result
    }

    /// Compiled modules, dependencies first.
    pub fn modules(&self) -> &[GeneratedModule] {
        &self.modules
    }

    /// A compiled module by source name.
    pub fn module(&self, name: &str) -> Option<&GeneratedModule> {
        self.modules.iter().find(|m| m.source_name == name)
    }

    pub fn into_modules(self) -> Vec<GeneratedModule> {
        self.modules
    }

    pub fn context(&self) -> &CompilationContext {
        &self.ctx
    }

    pub fn options(&self) -> &CompilerOptions {
        self.ctx.options()
    }

    fn memoized(&self, module: &str) -> Option<String> {
        let record = self.ctx.module(module)?;
        tracing::debug!(module, generated = %record.generated_name, "module already compiled");
        Some(record.generated_name.clone())
    }

    /// Compile a dependency referenced from `from` at `span`.
    fn ensure_module(&mut self, dep: &str, span: Span, from: &str) -> Result<(), SessionError> {
        if self.memoized(dep).is_some() {
            return Ok(());
        }
        self.ctx
            .enter(dep, span)
            .map_err(|e| SessionError::new(from, e))?;

        let result = match self.loader.load(dep) {
            Ok(source) => self.compile_inner(dep, &source).map(|_| ()),
            Err(e) => Err(SessionError::new(from, e.into_resolution(dep, span))),
        };
        self.ctx.leave(dep);
        result
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn compile_inner(&mut self, module: &str, source: &str) -> Result<String, SessionError> {
        let arena = Bump::new();
        let program = Parser::parse(source, &arena).map_err(|e| SessionError::new(module, e))?;
        tracing::debug!(module, statements = program.statements().len(), "parsed module");

        for (dep, span) in referenced_modules(&program, module) {
            self.ensure_module(&dep, span, module)?;
        }

        self.lower(module, &program)
    }

    fn lower(&mut self, module: &str, program: &Program<'_>) -> Result<String, SessionError> {
        let generated = Materializer::new(&mut self.ctx, module, program)
            .run(program)
            .map_err(|e| SessionError::new(module, e))?;

        let generated_name = generated.generated_name.clone();
        self.ctx.record(
            module,
            ModuleRecord {
                generated_name: generated_name.clone(),
                exports: generated.bindings().map(str::to_string).collect(),
            },
        );
        tracing::info!(
            module,
            generated = %generated_name,
            units = generated.units().count(),
            "compiled module"
        );

        self.modules.push(generated);
        Ok(generated_name)
    }
}
