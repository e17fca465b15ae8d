//! Materializer - lowers a parsed module into [`GeneratedModule`] IR.
//!
//! Every `let` becomes a [`MaterializedUnit`] with a session-unique id taken
//! from the [`CompilationContext`]; every expression statement becomes a
//! top-level [`LoweredExpr`]. Names are resolved through a [`Resolver`], which
//! also collects the generated modules the output imports.
//!
//! Dependencies named by the program must already be recorded in the context
//! (the session compiles them first).

use fleaux_core::{FleauxError, MaterializationError, ResolutionError, Span};
use fleaux_parser::ast::{
    BinaryExpr, BinaryOp, Expr, LetStmt, LiteralKind, PrimitiveType, Program, Stmt, TypeExpr,
};
use rustc_hash::FxHashSet;

use crate::context::CompilationContext;
use crate::emit::is_python_keyword;
use crate::ir::{
    GeneratedModule, Item, Literal, LoweredExpr, LoweredParam, LoweredType, MaterializedUnit,
};
use crate::resolver::{Resolved, Resolver};

/// Lowers one module.
pub struct Materializer<'a> {
    ctx: &'a mut CompilationContext,
    resolver: Resolver,
    source_name: String,
}

impl<'a> Materializer<'a> {
    /// Create a materializer for `module`, binding every `let` name it defines.
    pub fn new(ctx: &'a mut CompilationContext, module: &str, program: &Program<'_>) -> Self {
        let bindings = program.lets().map(|l| l.name.name.name.to_string());
        Self {
            ctx,
            resolver: Resolver::new(module, bindings),
            source_name: module.to_string(),
        }
    }

    /// Lower every statement of `program`, in order.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, program: &Program<'_>) -> Result<GeneratedModule, FleauxError> {
        let mut items = Vec::with_capacity(program.statements().len());

        for stmt in program.statements() {
            match stmt {
                Stmt::Import(import) => {
                    self.resolver
                        .import(self.ctx, import.module.name, import.module.span)?;
                }
                Stmt::Let(let_stmt) => items.push(Item::Unit(self.lower_let(let_stmt)?)),
                Stmt::Expr(expr_stmt) => {
                    items.push(Item::Expr(self.lower_expr(expr_stmt.expr, &[])?));
                }
            }
        }

        // Pipeline nodes are built with the builtin module's `make_node`,
        // so it leads the imports whenever the module defines units.
        let std_generated = self.ctx.options().std_generated.clone();
        let has_units = items.iter().any(|item| matches!(item, Item::Unit(_)));
        let mut imports = self.resolver.into_imports();
        if has_units {
            imports.retain(|import| *import != std_generated);
            imports.insert(0, std_generated);
        }

        let generated_name = self.ctx.options().generated_name(&self.source_name);
        Ok(GeneratedModule {
            source_name: self.source_name,
            generated_name,
            imports,
            items,
        })
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    fn lower_let(&mut self, let_stmt: &LetStmt<'_>) -> Result<MaterializedUnit, FleauxError> {
        let origin = let_stmt.name.to_qualified_name();
        match origin.qualifier() {
            Some(qualifier) if qualifier != self.source_name => {
                return Err(ResolutionError::ForeignDefinition {
                    module: self.source_name.clone(),
                    qualifier: qualifier.to_string(),
                    name: origin.name.clone(),
                    span: let_stmt.name.span,
                }
                .into());
            }
            _ => {}
        }
        reject_reserved(&origin.name, let_stmt.name.name.span)?;

        let mut seen = FxHashSet::default();
        let mut params = Vec::with_capacity(let_stmt.params.len());
        for param in let_stmt.params {
            if !seen.insert(param.name.name) {
                return Err(MaterializationError::DuplicateParameter {
                    function: origin.to_string(),
                    name: param.name.name.to_string(),
                    span: param.span,
                }
                .into());
            }
            reject_reserved(param.name.name, param.name.span)?;
            params.push(LoweredParam {
                name: param.name.name.to_string(),
                ty: lower_type(&param.ty),
            });
        }

        let names: Vec<&str> = let_stmt.params.iter().map(|p| p.name.name).collect();
        let body = self.lower_expr(let_stmt.body, &names)?;

        let id = self.ctx.next_unit_id();
        let name = MaterializedUnit::generated_name(&origin, id);
        tracing::debug!(
            module = %self.source_name,
            origin = %origin,
            unit = %name,
            id,
            "materialized unit"
        );

        Ok(MaterializedUnit {
            binding: origin.name.clone(),
            origin,
            id,
            name,
            params,
            return_type: lower_type(&let_stmt.return_type),
            body,
        })
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    fn lower_expr(&mut self, expr: &Expr<'_>, params: &[&str]) -> Result<LoweredExpr, FleauxError> {
        match expr {
            Expr::Literal(lit) => Ok(LoweredExpr::Literal(match lit.kind {
                LiteralKind::Int(v) => Literal::Int(v),
                LiteralKind::BigInt(text) => Literal::BigInt(text.to_string()),
                LiteralKind::Float(v) => Literal::Float(v),
                LiteralKind::String(s) => Literal::String(s.to_string()),
                LiteralKind::Bool(b) => Literal::Bool(b),
                LiteralKind::Null => Literal::Null,
            })),

            Expr::Ident(ident) => Ok(match self.resolver.resolve(self.ctx, ident, params)? {
                Resolved::Param(name) => LoweredExpr::Param(name),
                Resolved::Receiver(receiver) => LoweredExpr::Receiver(receiver),
            }),

            Expr::Unary(unary) => Ok(LoweredExpr::Unary {
                op: unary.op,
                operand: Box::new(self.lower_expr(unary.operand, params)?),
            }),

            Expr::Binary(binary) => match binary.op {
                BinaryOp::Comma => {
                    let mut items = Vec::new();
                    self.collect_bundle(binary, params, &mut items)?;
                    Ok(LoweredExpr::Bundle(items))
                }
                BinaryOp::Pipeline => self.lower_pipeline(binary, params),
                op => Ok(LoweredExpr::Binary {
                    op,
                    left: Box::new(self.lower_expr(binary.left, params)?),
                    right: Box::new(self.lower_expr(binary.right, params)?),
                }),
            },
        }
    }

    /// Flatten the left spine of a comma chain: `a, b, c` is one 3-bundle.
    fn collect_bundle(
        &mut self,
        comma: &BinaryExpr<'_>,
        params: &[&str],
        items: &mut Vec<LoweredExpr>,
    ) -> Result<(), FleauxError> {
        match comma.left.as_binary(BinaryOp::Comma) {
            Some(inner) => self.collect_bundle(inner, params, items)?,
            None => items.push(self.lower_expr(comma.left, params)?),
        }
        items.push(self.lower_expr(comma.right, params)?);
        Ok(())
    }

    fn lower_pipeline(
        &mut self,
        pipeline: &BinaryExpr<'_>,
        params: &[&str],
    ) -> Result<LoweredExpr, FleauxError> {
        let input = self.lower_expr(pipeline.left, params)?;

        let ident = match pipeline.right {
            Expr::Ident(ident) => ident,
            other => {
                return Err(MaterializationError::InvalidReceiver {
                    found: describe(other),
                    span: other.span(),
                }
                .into());
            }
        };

        match self.resolver.resolve(self.ctx, ident, params)? {
            Resolved::Receiver(receiver) => Ok(LoweredExpr::Pipeline {
                input: Box::new(input),
                receiver,
            }),
            Resolved::Param(name) => Err(MaterializationError::InvalidReceiver {
                found: format!("parameter '{name}'"),
                span: ident.span,
            }
            .into()),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn lower_type(ty: &TypeExpr<'_>) -> LoweredType {
    match ty {
        TypeExpr::Primitive(p, _) => match p {
            PrimitiveType::Number => LoweredType::Number,
            PrimitiveType::String => LoweredType::String,
            PrimitiveType::Bool => LoweredType::Bool,
            PrimitiveType::Null => LoweredType::Null,
            PrimitiveType::Any => LoweredType::Any,
        },
        TypeExpr::Named(name) => LoweredType::Named(name.to_qualified_name()),
        TypeExpr::Tuple(elements, _) => LoweredType::Tuple(elements.iter().map(lower_type).collect()),
    }
}

/// Short description of a non-receiver expression for diagnostics.
fn describe(expr: &Expr<'_>) -> String {
    match expr {
        Expr::Literal(_) => "a literal".to_string(),
        Expr::Ident(ident) => format!("'{ident}'"),
        Expr::Unary(unary) => format!("a '{}' expression", unary.op),
        Expr::Binary(binary) => format!("a '{}' expression", binary.op),
    }
}

/// Parameter and binding names become Python identifiers as written.
fn reject_reserved(name: &str, span: Span) -> Result<(), FleauxError> {
    if is_python_keyword(name) {
        return Err(MaterializationError::ReservedName {
            name: name.to_string(),
            span,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompilerOptions;
    use crate::ir::ReceiverRef;
    use bumpalo::Bump;
    use fleaux_core::QualifiedName;
    use fleaux_parser::ast::{Parser, UnaryOp};

    fn lower(ctx: &mut CompilationContext, module: &str, source: &str) -> Result<GeneratedModule, FleauxError> {
        let arena = Bump::new();
        let program = Parser::parse(source, &arena)?;
        Materializer::new(ctx, module, &program).run(&program)
    }

    fn lower_main(source: &str) -> GeneratedModule {
        let mut ctx = CompilationContext::new(CompilerOptions::default());
        lower(&mut ctx, "Main", source).unwrap()
    }

    fn lower_err(source: &str) -> FleauxError {
        let mut ctx = CompilationContext::new(CompilerOptions::default());
        lower(&mut ctx, "Main", source).unwrap_err()
    }

    fn pow() -> ReceiverRef {
        ReceiverRef::Builtin {
            module: "fleaux_std_lib".into(),
            name: "Pow".into(),
        }
    }

    #[test]
    fn pipeline_unit() {
        let module = lower_main("let F(x: Number): Number :: (x, 5) -> Pow;");
        assert_eq!(module.generated_name, "fleaux_generated_module_Main");
        assert_eq!(module.imports, vec!["fleaux_std_lib"]);

        let unit = module.unit("F").unwrap();
        assert_eq!(unit.id, 0);
        assert_eq!(unit.name, "__fleaux_materialized_func_F_0");
        assert_eq!(unit.arity(), 1);
        assert_eq!(unit.params[0].ty, LoweredType::Number);
        assert_eq!(
            unit.body,
            LoweredExpr::Pipeline {
                input: Box::new(LoweredExpr::Bundle(vec![
                    LoweredExpr::Param("x".into()),
                    LoweredExpr::Literal(Literal::Int(5)),
                ])),
                receiver: pow(),
            }
        );
    }

    #[test]
    fn redefinition_gets_distinct_units() {
        let module = lower_main(
            "let F(x: Number): Number :: x;\n\
             let F(x: Number): Number :: (x, 2) -> Pow;",
        );
        let units: Vec<_> = module.units().collect();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].name, "__fleaux_materialized_func_F_0");
        assert_eq!(units[1].name, "__fleaux_materialized_func_F_1");
        assert_eq!(module.unit("F").unwrap().id, 1);
    }

    #[test]
    fn ids_continue_across_modules() {
        let mut ctx = CompilationContext::new(CompilerOptions::default());
        lower(&mut ctx, "A", "let F(x: Any): Any :: x;").unwrap();
        let b = lower(&mut ctx, "B", "let F(x: Any): Any :: x;").unwrap();
        assert_eq!(b.unit("F").unwrap().id, 1);
    }

    #[test]
    fn comma_chain_is_flattened() {
        let module = lower_main("(1, 2, 3) -> Println;");
        let expr = module.top_level().next().unwrap();
        match expr {
            LoweredExpr::Pipeline { input, .. } => match input.as_ref() {
                LoweredExpr::Bundle(items) => assert_eq!(items.len(), 3),
                other => panic!("expected bundle, got {other:?}"),
            },
            other => panic!("expected pipeline, got {other:?}"),
        }
    }

    #[test]
    fn right_nested_comma_stays_nested() {
        let module = lower_main("1, (2, 3);");
        let expr = module.top_level().next().unwrap();
        assert_eq!(
            *expr,
            LoweredExpr::Bundle(vec![
                LoweredExpr::Literal(Literal::Int(1)),
                LoweredExpr::Bundle(vec![
                    LoweredExpr::Literal(Literal::Int(2)),
                    LoweredExpr::Literal(Literal::Int(3)),
                ]),
            ])
        );
    }

    #[test]
    fn pipeline_binds_tighter_than_add() {
        let module = lower_main("let G(a: Number, c: Number): Number :: a -> Sqrt + c;");
        let unit = module.unit("G").unwrap();
        match &unit.body {
            LoweredExpr::Binary { op, left, .. } => {
                assert_eq!(*op, BinaryOp::Add);
                assert!(matches!(left.as_ref(), LoweredExpr::Pipeline { .. }));
            }
            other => panic!("expected add, got {other:?}"),
        }
    }

    #[test]
    fn late_bound_local_reference() {
        let module = lower_main(
            "let A(x: Number): Number :: x -> B;\n\
             let B(x: Number): Number :: -x;",
        );
        let a = module.unit("A").unwrap();
        assert!(matches!(
            &a.body,
            LoweredExpr::Pipeline { receiver: ReceiverRef::Local { name }, .. } if name == "B"
        ));
        let b = module.unit("B").unwrap();
        assert!(matches!(&b.body, LoweredExpr::Unary { op: UnaryOp::Neg, .. }));
    }

    #[test]
    fn qualified_let_in_own_module() {
        let module = lower_main("let Main.F(x: Number): Number :: x;\n(1) -> Main.F;");
        let unit = module.unit("F").unwrap();
        assert_eq!(unit.origin, QualifiedName::qualified("Main", "F"));
        assert_eq!(unit.name, "__fleaux_materialized_func_Main_F_0");
    }

    #[test]
    fn foreign_definition() {
        let err = lower_err("let Other.F(x: Number): Number :: x;");
        assert!(matches!(
            err,
            FleauxError::Resolution(ResolutionError::ForeignDefinition { .. })
        ));
    }

    #[test]
    fn duplicate_parameter() {
        let err = lower_err("let F(x: Number, x: Number): Number :: x;");
        assert_eq!(
            err.to_string(),
            "at 1:18: duplicate parameter 'x' in 'F'"
        );
        assert!(err.is_materialization());
    }

    #[test]
    fn python_keyword_names_are_rejected() {
        let err = lower_err("let F(from: Number): Number :: (from, 2) -> Pow;");
        assert_eq!(
            err.to_string(),
            "at 1:7: 'from' is a reserved word in generated code"
        );
        assert!(err.is_materialization());

        let err = lower_err("let lambda(x: Number): Number :: x;");
        assert!(matches!(
            err,
            FleauxError::Materialization(MaterializationError::ReservedName { ref name, span })
                if name == "lambda" && span.col == 5
        ));

        // soft keywords are ordinary identifiers
        lower_main("let match(type: Number): Number :: type;");
    }

    #[test]
    fn invalid_receivers() {
        let err = lower_err("1 -> 2;");
        assert!(matches!(
            err,
            FleauxError::Materialization(MaterializationError::InvalidReceiver { .. })
        ));

        let err = lower_err("let F(x: Number, f: Any): Number :: x -> f;");
        assert!(err.to_string().contains("parameter 'f'"));
    }

    #[test]
    fn unresolved_name() {
        let err = lower_err("let F(x: Number): Number :: x -> Missing;");
        assert!(err.is_resolution());
        assert!(err.to_string().contains("'Missing'"));
    }

    #[test]
    fn top_level_without_units_imports_only_what_it_uses() {
        let module = lower_main("1 + 2;");
        assert!(module.imports.is_empty());
        assert_eq!(module.top_level().count(), 1);
    }

    #[test]
    fn std_import_first() {
        let mut ctx = CompilationContext::new(CompilerOptions::default());
        ctx.record(
            "Dep",
            crate::context::ModuleRecord {
                generated_name: "fleaux_generated_module_Dep".into(),
                exports: ["Id".to_string()].into_iter().collect(),
            },
        );
        let module = lower(&mut ctx, "Main", "import Dep;\nlet F(x: Any): Any :: x -> Dep.Id;").unwrap();
        assert_eq!(
            module.imports,
            vec!["fleaux_std_lib", "fleaux_generated_module_Dep"]
        );
    }

    #[test]
    fn types_are_carried() {
        let module = lower_main("let F(p: (Number, String)): Geo.Point :: p;");
        let unit = module.unit("F").unwrap();
        assert_eq!(
            unit.params[0].ty,
            LoweredType::Tuple(vec![LoweredType::Number, LoweredType::String])
        );
        assert_eq!(
            unit.return_type,
            LoweredType::Named(QualifiedName::qualified("Geo", "Point"))
        );
    }
}
