//! Symbol and import resolution.
//!
//! Resolution works in two steps. Before a module is lowered,
//! [`referenced_modules`] collects every module the program names (through
//! `import` statements or `Module.name` qualifiers) so the session can compile
//! them first. While lowering, a [`Resolver`] maps each identifier to a
//! parameter or a pipe receiver, and records the generated modules the output
//! has to import.
//!
//! Lookup order for an unqualified name:
//! 1. a parameter of the enclosing `let`
//! 2. a `let` binding of the current module (late-bound, so order does not matter)
//! 3. a builtin of the builtin module
//!
//! A qualified name `Q.n` is looked up in module `Q` only.

use fleaux_core::{ResolutionError, Span};
use fleaux_parser::ast::{Expr, Program, QualIdent, Stmt};
use rustc_hash::FxHashSet;

use crate::context::CompilationContext;
use crate::ir::ReceiverRef;

/// Collect the modules `program` depends on, in first-reference order.
///
/// A `Module.name` qualifier naming the current module is a local reference
/// and is skipped, but an explicit `import` of the current module is kept so
/// the session reports it as a cycle. Qualifiers on `let` names are
/// definitions, not references, and are skipped too.
pub fn referenced_modules(program: &Program<'_>, current: &str) -> Vec<(String, Span)> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    let mut note = |name: &str, span: Span, explicit: bool| {
        if (explicit || name != current) && seen.insert(name.to_string()) {
            out.push((name.to_string(), span));
        }
    };

    for stmt in program.statements() {
        match stmt {
            Stmt::Import(import) => note(import.module.name, import.module.span, true),
            Stmt::Let(let_stmt) => {
                collect_qualifiers(let_stmt.body, &mut |name: &str, span: Span| note(name, span, false))
            }
            Stmt::Expr(expr_stmt) => {
                collect_qualifiers(expr_stmt.expr, &mut |name: &str, span: Span| note(name, span, false))
            }
        }
    }
    out
}

fn collect_qualifiers(expr: &Expr<'_>, note: &mut impl FnMut(&str, Span)) {
    match expr {
        Expr::Literal(_) => {}
        Expr::Ident(ident) => {
            if let Some(qualifier) = ident.qualifier {
                note(qualifier.name, qualifier.span);
            }
        }
        Expr::Unary(unary) => collect_qualifiers(unary.operand, note),
        Expr::Binary(binary) => {
            collect_qualifiers(binary.left, note);
            collect_qualifiers(binary.right, note);
        }
    }
}

/// What an identifier refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A parameter of the enclosing unit.
    Param(String),
    /// A pipe receiver.
    Receiver(ReceiverRef),
}

/// Per-module name resolver.
#[derive(Debug)]
pub struct Resolver {
    module: String,
    bindings: FxHashSet<String>,
    /// Generated module names to import, first-use order.
    imports: Vec<String>,
}

impl Resolver {
    /// Create a resolver for `module` whose `let`s bind `bindings`.
    pub fn new(module: impl Into<String>, bindings: impl IntoIterator<Item = String>) -> Self {
        Self {
            module: module.into(),
            bindings: bindings.into_iter().collect(),
            imports: Vec::new(),
        }
    }

    /// Name of the module being resolved.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Check whether the current module binds `name`.
    pub fn is_bound(&self, name: &str) -> bool {
        self.bindings.contains(name)
    }

    /// Record an `import` statement.
    pub fn import(
        &mut self,
        ctx: &CompilationContext,
        module: &str,
        span: Span,
    ) -> Result<(), ResolutionError> {
        if module == self.module {
            return Ok(());
        }
        let record = ctx.module(module).ok_or_else(|| ResolutionError::UnknownModule {
            name: module.to_string(),
            span,
        })?;
        let generated = record.generated_name.clone();
        self.note_import(generated);
        Ok(())
    }

    /// Resolve an identifier in expression position.
    ///
    /// `params` are the parameters in scope (empty for top-level statements).
    pub fn resolve(
        &mut self,
        ctx: &CompilationContext,
        ident: &QualIdent<'_>,
        params: &[&str],
    ) -> Result<Resolved, ResolutionError> {
        let name = ident.name.name;
        match ident.qualifier {
            None => {
                if params.contains(&name) {
                    return Ok(Resolved::Param(name.to_string()));
                }
                if self.bindings.contains(name) {
                    return Ok(Resolved::Receiver(ReceiverRef::Local {
                        name: name.to_string(),
                    }));
                }
                let std = &ctx.options().std_module;
                match ctx.module(std) {
                    Some(record) if record.exports(name) => {
                        let module = record.generated_name.clone();
                        self.note_import(module.clone());
                        Ok(Resolved::Receiver(ReceiverRef::Builtin {
                            module,
                            name: name.to_string(),
                        }))
                    }
                    _ => Err(ResolutionError::UnresolvedName {
                        name: name.to_string(),
                        span: ident.span,
                    }),
                }
            }
            Some(qualifier) => self
                .resolve_member(ctx, qualifier.name, name, ident.span)
                .map(Resolved::Receiver),
        }
    }

    /// Resolve `module.name`.
    fn resolve_member(
        &mut self,
        ctx: &CompilationContext,
        module: &str,
        name: &str,
        span: Span,
    ) -> Result<ReceiverRef, ResolutionError> {
        let unresolved = || ResolutionError::UnresolvedMember {
            module: module.to_string(),
            member: name.to_string(),
            span,
        };

        if module == self.module {
            return if self.bindings.contains(name) {
                Ok(ReceiverRef::Local {
                    name: name.to_string(),
                })
            } else {
                Err(unresolved())
            };
        }

        let record = ctx.module(module).ok_or_else(|| ResolutionError::UnknownModule {
            name: module.to_string(),
            span,
        })?;
        if !record.exports(name) {
            return Err(unresolved());
        }

        let generated = record.generated_name.clone();
        self.note_import(generated.clone());
        if ctx.is_std(module) {
            Ok(ReceiverRef::Builtin {
                module: generated,
                name: name.to_string(),
            })
        } else {
            Ok(ReceiverRef::Member {
                module: module.to_string(),
                generated_module: generated,
                name: name.to_string(),
            })
        }
    }

    pub(crate) fn note_import(&mut self, generated: String) {
        if !self.imports.contains(&generated) {
            self.imports.push(generated);
        }
    }

    /// Generated module names to import, first-use order.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Consume the resolver, returning its imports.
    pub fn into_imports(self) -> Vec<String> {
        self.imports
    }
}
