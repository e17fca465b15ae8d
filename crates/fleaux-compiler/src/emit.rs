//! Python source emitter.
//!
//! Turns a [`GeneratedModule`] into the text of a Python 3 module that runs
//! against the builtin module (`fleaux_std_lib`). Every pipeline becomes
//! `bundle | Receiver()`, where the receiver's `__ror__` unpacks the bundle.
//!
//! # Example
//!
//! ```
//! use fleaux_compiler::{CompilerOptions, MemoryLoader, Session, emit_python};
//!
//! let loader = MemoryLoader::new().with("Main", "let F(x: Number): Number :: (x, 5) -> Pow;");
//! let mut session = Session::new(CompilerOptions::default(), Box::new(loader));
//! session.compile_root("Main").unwrap();
//!
//! let python = emit_python(session.module("Main").unwrap());
//! assert!(python.contains("return ((x, 5) | fleaux_std_lib.Pow())"));
//! ```

use fleaux_parser::ast::{BinaryOp, UnaryOp};

use crate::ir::{GeneratedModule, Item, Literal, LoweredExpr, LoweredType, MaterializedUnit, ReceiverRef};

/// Name of the helper that wraps a non-tuple value into a 1-tuple.
pub const BUNDLE_HELPER: &str = "__fleaux_bundle";

const INDENT: &str = "    ";

/// Python 3 hard keywords. None of them may name a parameter or binding.
pub const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Check whether `name` cannot appear as a Python identifier.
pub fn is_python_keyword(name: &str) -> bool {
    PYTHON_KEYWORDS.contains(&name)
}

/// Emit the Python text of `module`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn emit_python(module: &GeneratedModule) -> String {
    PythonEmitter::new(module).emit()
}

struct PythonEmitter<'m> {
    module: &'m GeneratedModule,
    /// Generated name of the builtin module, used for `make_node`.
    std_module: Option<&'m str>,
    out: String,
}

impl<'m> PythonEmitter<'m> {
    fn new(module: &'m GeneratedModule) -> Self {
        // the materializer puts the builtin module first whenever there are units
        let std_module = if module.units().next().is_some() {
            module.imports.first().map(String::as_str)
        } else {
            None
        };
        Self {
            module,
            std_module,
            out: String::new(),
        }
    }

    fn emit(mut self) -> String {
        self.emit_header();

        for item in &self.module.items {
            match item {
                Item::Unit(unit) => self.emit_unit(unit),
                Item::Expr(expr) => {
                    let line = emit_expr(expr);
                    self.line(&line);
                }
            }
        }
        self.out
    }

    // ==========================================================================
    // Sections
    // ==========================================================================

    fn emit_header(&mut self) {
        let uses_typing = self.module.units().any(|unit| {
            needs_typing(&unit.return_type) || unit.params.iter().any(|p| needs_typing(&p.ty))
        });
        if uses_typing {
            self.line("import typing");
        }
        for import in &self.module.imports {
            self.line(&format!("import {import}"));
        }

        let pipelines: usize = self
            .module
            .items
            .iter()
            .map(|item| match item {
                Item::Unit(unit) => unit.body.pipeline_count(),
                Item::Expr(expr) => expr.pipeline_count(),
            })
            .sum();
        if pipelines > 0 {
            self.blank();
            self.line(&format!("def {BUNDLE_HELPER}(value):"));
            self.line(&format!(
                "{INDENT}return value if isinstance(value, tuple) else (value,)"
            ));
        }
        self.blank();
    }

    fn emit_unit(&mut self, unit: &MaterializedUnit) {
        let params = unit
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name, emit_type(&p.ty)))
            .collect::<Vec<_>>()
            .join(", ");

        self.blank();
        self.line(&format!(
            "def {}({}) -> {}:",
            unit.name,
            params,
            emit_type(&unit.return_type)
        ));
        self.line(&format!("{INDENT}return {}", emit_expr(&unit.body)));
        self.blank();

        let make_node = match self.std_module {
            Some(std) => format!("{std}.make_node"),
            None => "make_node".to_string(),
        };
        self.line(&format!("{} = {make_node}({})", unit.binding, unit.name));
        self.blank();
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// Emit one lowered expression as a Python expression.
pub fn emit_expr(expr: &LoweredExpr) -> String {
    match expr {
        LoweredExpr::Literal(lit) => emit_literal(lit),
        LoweredExpr::Param(name) => name.clone(),
        LoweredExpr::Receiver(receiver) => emit_receiver_path(receiver),
        LoweredExpr::Bundle(items) => emit_tuple(items),
        LoweredExpr::Unary { op, operand } => {
            let op = match op {
                UnaryOp::Not => "not ",
                UnaryOp::Neg => "-",
                UnaryOp::Plus => "+",
            };
            format!("({op}{})", emit_expr(operand))
        }
        LoweredExpr::Binary { op, left, right } => {
            format!("({} {} {})", emit_expr(left), python_op(*op), emit_expr(right))
        }
        LoweredExpr::Pipeline { input, receiver } => {
            let bundle = match input.as_ref() {
                LoweredExpr::Bundle(items) => emit_tuple(items),
                other => format!("{BUNDLE_HELPER}({})", emit_expr(other)),
            };
            format!("({bundle} | {}())", emit_receiver_path(receiver))
        }
    }
}

fn emit_tuple(items: &[LoweredExpr]) -> String {
    let inner = items.iter().map(emit_expr).collect::<Vec<_>>().join(", ");
    if items.len() == 1 {
        format!("({inner},)")
    } else {
        format!("({inner})")
    }
}

fn emit_literal(lit: &Literal) -> String {
    match lit {
        Literal::Int(v) if *v < 0 => format!("({v})"),
        Literal::Int(v) => v.to_string(),
        Literal::BigInt(text) if text.starts_with('-') => format!("({text})"),
        Literal::BigInt(text) => text.clone(),
        Literal::Float(v) if v.is_infinite() => {
            let sign = if *v < 0.0 { "-" } else { "" };
            format!("float('{sign}inf')")
        }
        Literal::Float(v) if *v < 0.0 => format!("({v:?})"),
        Literal::Float(v) => format!("{v:?}"),
        Literal::String(raw) => format!("\"{raw}\""),
        Literal::Bool(true) => "True".to_string(),
        Literal::Bool(false) => "False".to_string(),
        Literal::Null => "None".to_string(),
    }
}

fn emit_receiver_path(receiver: &ReceiverRef) -> String {
    receiver.to_string()
}

fn python_op(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Or => "or",
        BinaryOp::And => "and",
        BinaryOp::Pow => "**",
        BinaryOp::Equal => "==",
        BinaryOp::NotEqual => "!=",
        BinaryOp::Less => "<",
        BinaryOp::LessEqual => "<=",
        BinaryOp::Greater => ">",
        BinaryOp::GreaterEqual => ">=",
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        // lowered into bundles and pipelines before emission
        BinaryOp::Comma => ",",
        BinaryOp::Pipeline => "|",
    }
}

// ============================================================================
// Types
// ============================================================================

fn emit_type(ty: &LoweredType) -> String {
    match ty {
        LoweredType::Number => "float".to_string(),
        LoweredType::String => "str".to_string(),
        LoweredType::Bool => "bool".to_string(),
        LoweredType::Null => "None".to_string(),
        LoweredType::Any | LoweredType::Named(_) => "typing.Any".to_string(),
        LoweredType::Tuple(elements) => format!(
            "tuple[{}]",
            elements.iter().map(emit_type).collect::<Vec<_>>().join(", ")
        ),
    }
}

fn needs_typing(ty: &LoweredType) -> bool {
    match ty {
        LoweredType::Any | LoweredType::Named(_) => true,
        LoweredType::Tuple(elements) => elements.iter().any(needs_typing),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CompilationContext;
    use crate::materializer::Materializer;
    use crate::CompilerOptions;
    use bumpalo::Bump;
    use fleaux_parser::ast::Parser;

    fn python(source: &str) -> String {
        let arena = Bump::new();
        let program = Parser::parse(source, &arena).unwrap();
        let mut ctx = CompilationContext::new(CompilerOptions::default());
        let module = Materializer::new(&mut ctx, "Main", &program)
            .run(&program)
            .unwrap();
        emit_python(&module)
    }

    #[test]
    fn pow_unit() {
        let out = python("let F(x: Number): Number :: (x, 5) -> Pow;");
        let expected = "\
import fleaux_std_lib

def __fleaux_bundle(value):
    return value if isinstance(value, tuple) else (value,)

def __fleaux_materialized_func_F_0(x: float) -> float:
    return ((x, 5) | fleaux_std_lib.Pow())

F = fleaux_std_lib.make_node(__fleaux_materialized_func_F_0)

";
        assert_eq!(out, expected);
    }

    #[test]
    fn scalar_input_is_bundled() {
        let out = python("4 -> Wrap -> Println;");
        assert!(out.contains(
            "(__fleaux_bundle((__fleaux_bundle(4) | fleaux_std_lib.Wrap())) | fleaux_std_lib.Println())"
        ));
    }

    #[test]
    fn operators_map_to_python() {
        let out = python("let F(a: Bool, b: Number): Any :: !a && b ^ 2 ^ 3 >= 1 || -b % 2 == 0;");
        assert!(out.contains("import typing"));
        assert!(out.contains("-> typing.Any:"));
        // unary minus sits on the lowest tier, so it takes the whole comparison
        assert!(out.contains("(((not a) and ((b ** (2 ** 3)) >= 1)) or (-((b % 2) == 0)))"));
    }

    #[test]
    fn literals() {
        let out = python("(-1, 2.5, \"hi \\\"there\\\"\", True, False, Null) -> Println;");
        assert!(out.contains("((-1), 2.5, \"hi \\\"there\\\"\", True, False, None)"));
    }

    #[test]
    fn tuple_types() {
        let out = python("let P(p: (Number, String)): (Number) :: p -> Length;");
        assert!(out.contains("def __fleaux_materialized_func_P_0(p: tuple[float, str]) -> tuple[float]:"));
        assert!(!out.contains("import typing"));
    }

    #[test]
    fn huge_integers_emitted_verbatim() {
        let out = python("(123456789012345678901234567890, -99999999999999999999) -> Println;");
        assert!(out.contains("(123456789012345678901234567890, (-99999999999999999999))"));
    }

    #[test]
    fn python_keywords() {
        assert!(is_python_keyword("lambda"));
        assert!(is_python_keyword("None"));
        assert!(!is_python_keyword("match"));
        assert!(!is_python_keyword("Pow"));
    }

    #[test]
    fn no_pipeline_no_helper() {
        let out = python("1 + 2;");
        assert_eq!(out, "(1 + 2)\n");
    }

    #[test]
    fn receiver_as_value() {
        let out = python("let Id(x: Any): Any :: x;\nId;");
        assert!(out.ends_with("Id = fleaux_std_lib.make_node(__fleaux_materialized_func_Id_0)\n\nId\n"));
    }
}
