//! Lowered IR produced by the materializer.
//!
//! Unlike the arena AST, the IR is owned: it outlives the parse of its source
//! module so a session can keep every compiled module around, hand it to the
//! Python emitter, or evaluate it directly.
//!
//! - [`GeneratedModule`] - one compiled source module
//! - [`MaterializedUnit`] - one lowered `let`
//! - [`LoweredExpr`] - a lowered expression tree
//! - [`ReceiverRef`] - the resolved right-hand side of a pipeline

use std::fmt;

use fleaux_core::QualifiedName;
use fleaux_parser::ast::{BinaryOp, UnaryOp};

// ============================================================================
// Modules
// ============================================================================

/// Result of compiling one source module.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedModule {
    /// Source module name (`Geometry` for `Geometry.fleaux`).
    pub source_name: String,
    /// Host module name other modules import.
    pub generated_name: String,
    /// Generated names of the modules this one imports, in first-use order.
    pub imports: Vec<String>,
    /// Lowered statements in source order.
    pub items: Vec<Item>,
}

impl GeneratedModule {
    /// Materialized units in source order.
    pub fn units(&self) -> impl Iterator<Item = &MaterializedUnit> {
        self.items.iter().filter_map(|item| match item {
            Item::Unit(unit) => Some(unit),
            Item::Expr(_) => None,
        })
    }

    /// Top-level expression statements in source order.
    pub fn top_level(&self) -> impl Iterator<Item = &LoweredExpr> {
        self.items.iter().filter_map(|item| match item {
            Item::Expr(expr) => Some(expr),
            Item::Unit(_) => None,
        })
    }

    /// Find the last unit bound to `name`; later definitions shadow earlier ones.
    pub fn unit(&self, name: &str) -> Option<&MaterializedUnit> {
        self.units().filter(|unit| unit.binding == name).last()
    }

    /// Names bound at top level.
    pub fn bindings(&self) -> impl Iterator<Item = &str> {
        self.units().map(|unit| unit.binding.as_str())
    }

    /// File name of the emitted Python module.
    pub fn file_name(&self) -> String {
        format!("{}.py", self.generated_name)
    }
}

/// One lowered statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Unit(MaterializedUnit),
    Expr(LoweredExpr),
}

// ============================================================================
// Units
// ============================================================================

/// A lowered `let`: a uniquely named callable plus the name it is bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedUnit {
    /// Name as written in the source.
    pub origin: QualifiedName,
    /// Module-scope name the unit's pipeline node is bound to.
    pub binding: String,
    /// Session-unique id.
    pub id: u64,
    /// Generated callable name.
    pub name: String,
    pub params: Vec<LoweredParam>,
    pub return_type: LoweredType,
    pub body: LoweredExpr,
}

impl MaterializedUnit {
    /// Generated callable name for an origin and id.
    pub fn generated_name(origin: &QualifiedName, id: u64) -> String {
        format!("__fleaux_materialized_func_{}_{}", origin.mangled(), id)
    }

    /// Number of values the unit unpacks from its bundle.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoweredParam {
    pub name: String,
    pub ty: LoweredType,
}

/// Declared types, carried as metadata only.
#[derive(Debug, Clone, PartialEq)]
pub enum LoweredType {
    Number,
    String,
    Bool,
    Null,
    Any,
    Named(QualifiedName),
    Tuple(Vec<LoweredType>),
}

impl fmt::Display for LoweredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoweredType::Number => write!(f, "Number"),
            LoweredType::String => write!(f, "String"),
            LoweredType::Bool => write!(f, "Bool"),
            LoweredType::Null => write!(f, "Null"),
            LoweredType::Any => write!(f, "Any"),
            LoweredType::Named(name) => write!(f, "{name}"),
            LoweredType::Tuple(elements) => {
                write!(f, "(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, ")")
            }
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    /// Integral numeral outside `i64`, kept as written.
    BigInt(String),
    Float(f64),
    /// Inner text of a string literal, escapes untouched.
    String(String),
    Bool(bool),
    Null,
}

/// Lowered expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum LoweredExpr {
    Literal(Literal),
    /// A parameter of the enclosing unit.
    Param(String),
    /// A receiver used as a plain value rather than a pipeline target.
    Receiver(ReceiverRef),
    /// An ordered, fixed-size bundle (flattened comma chain).
    Bundle(Vec<LoweredExpr>),
    Unary {
        op: UnaryOp,
        operand: Box<LoweredExpr>,
    },
    /// Arithmetic, comparison or boolean operator. Never `,` or `->`.
    Binary {
        op: BinaryOp,
        left: Box<LoweredExpr>,
        right: Box<LoweredExpr>,
    },
    /// `input -> receiver`.
    Pipeline {
        input: Box<LoweredExpr>,
        receiver: ReceiverRef,
    },
}

impl LoweredExpr {
    /// Check whether this is a bundle literal.
    pub fn is_bundle(&self) -> bool {
        matches!(self, LoweredExpr::Bundle(_))
    }

    /// Count the pipeline stages in this tree.
    pub fn pipeline_count(&self) -> usize {
        match self {
            LoweredExpr::Literal(_) | LoweredExpr::Param(_) | LoweredExpr::Receiver(_) => 0,
            LoweredExpr::Bundle(items) => items.iter().map(Self::pipeline_count).sum(),
            LoweredExpr::Unary { operand, .. } => operand.pipeline_count(),
            LoweredExpr::Binary { left, right, .. } => {
                left.pipeline_count() + right.pipeline_count()
            }
            LoweredExpr::Pipeline { input, .. } => 1 + input.pipeline_count(),
        }
    }
}

/// A resolved pipe receiver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReceiverRef {
    /// A binding of the module being compiled.
    Local { name: String },
    /// A binding of another compiled module.
    Member {
        module: String,
        generated_module: String,
        name: String,
    },
    /// A builtin; `module` is the generated builtin module name.
    Builtin { module: String, name: String },
}

impl ReceiverRef {
    /// Simple name of the receiver.
    pub fn name(&self) -> &str {
        match self {
            ReceiverRef::Local { name }
            | ReceiverRef::Member { name, .. }
            | ReceiverRef::Builtin { name, .. } => name,
        }
    }
}

impl fmt::Display for ReceiverRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiverRef::Local { name } => write!(f, "{name}"),
            ReceiverRef::Member {
                generated_module,
                name,
                ..
            } => write!(f, "{generated_module}.{name}"),
            ReceiverRef::Builtin { module, name } => write!(f, "{module}.{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_names() {
        assert_eq!(
            MaterializedUnit::generated_name(&QualifiedName::local("Polynomial"), 1),
            "__fleaux_materialized_func_Polynomial_1"
        );
        assert_eq!(
            MaterializedUnit::generated_name(&QualifiedName::qualified("Main", "F"), 4),
            "__fleaux_materialized_func_Main_F_4"
        );
    }

    #[test]
    fn type_display() {
        let ty = LoweredType::Tuple(vec![
            LoweredType::Number,
            LoweredType::Named(QualifiedName::qualified("Geo", "Point")),
        ]);
        assert_eq!(ty.to_string(), "(Number, Geo.Point)");
    }

    #[test]
    fn pipeline_count() {
        let pow = ReceiverRef::Builtin {
            module: "fleaux_std_lib".into(),
            name: "Pow".into(),
        };
        let expr = LoweredExpr::Binary {
            op: BinaryOp::Add,
            left: Box::new(LoweredExpr::Pipeline {
                input: Box::new(LoweredExpr::Pipeline {
                    input: Box::new(LoweredExpr::Param("x".into())),
                    receiver: pow.clone(),
                }),
                receiver: pow,
            }),
            right: Box::new(LoweredExpr::Literal(Literal::Int(1))),
        };
        assert_eq!(expr.pipeline_count(), 2);
        assert!(!expr.is_bundle());
    }

    #[test]
    fn receiver_display() {
        let member = ReceiverRef::Member {
            module: "Geometry".into(),
            generated_module: "fleaux_generated_module_Geometry".into(),
            name: "Area".into(),
        };
        assert_eq!(member.to_string(), "fleaux_generated_module_Geometry.Area");
        assert_eq!(member.name(), "Area");
    }
}
