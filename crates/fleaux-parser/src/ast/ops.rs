//! Operator definitions for Fleaux expressions.
//!
//! Provides enums for binary and unary operators along with precedence and
//! associativity information for the Pratt parser.
//!
//! | Operator              | Assoc | Precedence |
//! |-----------------------|-------|------------|
//! | `->`                  | left  | 10         |
//! | `^`                   | right | 7          |
//! | `/ * %`               | left  | 6          |
//! | binary `+ -`          | left  | 5          |
//! | `== != < > >= <=`     | left  | 4          |
//! | prefix `!`            | right | 3          |
//! | `&&`                  | left  | 2          |
//! | `\|\| ,`              | left  | 1          |
//! | prefix `+ -`          | right | 1          |
//!
//! A precedence `p` maps to binding powers around `2p`: left-associative
//! operators use `(2p, 2p + 1)` and right-associative ones `(2p + 1, 2p)`.

use crate::lexer::TokenKind;
use std::fmt;

/// Binary operators in Fleaux.
///
/// Organized by precedence from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Precedence 1
    /// `,` builds a bundle
    Comma,
    /// `||`
    Or,

    // Precedence 2
    /// `&&`
    And,

    // Precedence 4
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,

    // Precedence 5
    /// `+`
    Add,
    /// `-`
    Sub,

    // Precedence 6
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,

    // Precedence 7
    /// `^`
    Pow,

    // Precedence 10
    /// `->` threads a bundle into a receiver
    Pipeline,
}

impl BinaryOp {
    /// Get the binding power (precedence) for this operator.
    ///
    /// Higher values bind more tightly. Returns (left_bp, right_bp).
    pub fn binding_power(&self) -> (u8, u8) {
        use BinaryOp::*;
        match self {
            Comma | Or => (2, 3),
            And => (4, 5),
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => (8, 9),
            Add | Sub => (10, 11),
            Mul | Div | Mod => (12, 13),
            Pow => (15, 14), // right-associative
            Pipeline => (20, 21),
        }
    }

    /// Try to convert a token kind to a binary operator.
    pub fn from_token(token: TokenKind) -> Option<Self> {
        use TokenKind::*;

        Some(match token {
            Comma => BinaryOp::Comma,
            PipePipe => BinaryOp::Or,
            AmpAmp => BinaryOp::And,
            EqualEqual => BinaryOp::Equal,
            BangEqual => BinaryOp::NotEqual,
            Less => BinaryOp::Less,
            LessEqual => BinaryOp::LessEqual,
            Greater => BinaryOp::Greater,
            GreaterEqual => BinaryOp::GreaterEqual,
            Plus => BinaryOp::Add,
            Minus => BinaryOp::Sub,
            Star => BinaryOp::Mul,
            Slash => BinaryOp::Div,
            Percent => BinaryOp::Mod,
            Caret => BinaryOp::Pow,
            Arrow => BinaryOp::Pipeline,
            _ => return None,
        })
    }

    /// Check if this operator is comparison-related.
    pub fn is_comparison(&self) -> bool {
        use BinaryOp::*;
        matches!(
            self,
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOp::*;
        let s = match self {
            Comma => ",",
            Or => "||",
            And => "&&",
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Pow => "^",
            Pipeline => "->",
        };
        write!(f, "{}", s)
    }
}

/// Unary prefix operators in Fleaux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `!` logical not
    Not,
    /// `-` negation
    Neg,
    /// `+` plus
    Plus,
}

impl UnaryOp {
    /// Minimum binding power for the operand of this prefix operator.
    ///
    /// `!` sits between comparisons and `&&`, so `!a == b` negates the
    /// comparison while `!a && b` negates only `a`. Sign prefixes take
    /// everything except a trailing `,` or `||`.
    pub fn binding_power(&self) -> u8 {
        match self {
            UnaryOp::Not => 6,
            UnaryOp::Neg | UnaryOp::Plus => 3,
        }
    }

    /// Try to convert a token kind to a unary operator.
    pub fn from_token(token: TokenKind) -> Option<Self> {
        use TokenKind::*;

        Some(match token {
            Bang => UnaryOp::Not,
            Minus => UnaryOp::Neg,
            Plus => UnaryOp::Plus,
            _ => return None,
        })
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_op_precedence() {
        let (pipe, _) = BinaryOp::Pipeline.binding_power();
        let (pow, _) = BinaryOp::Pow.binding_power();
        let (mul, _) = BinaryOp::Mul.binding_power();
        let (add, _) = BinaryOp::Add.binding_power();
        let (eq, _) = BinaryOp::Equal.binding_power();
        let (and, _) = BinaryOp::And.binding_power();
        let (or, _) = BinaryOp::Or.binding_power();

        assert!(pipe > pow);
        assert!(pow > mul);
        assert!(mul > add);
        assert!(add > eq);
        assert!(eq > and);
        assert!(and > or);
        assert_eq!(BinaryOp::Comma.binding_power(), BinaryOp::Or.binding_power());
    }

    #[test]
    fn associativity() {
        let (l, r) = BinaryOp::Pow.binding_power();
        assert!(l > r, "power is right-associative");

        for op in [BinaryOp::Pipeline, BinaryOp::Add, BinaryOp::Comma, BinaryOp::Or] {
            let (l, r) = op.binding_power();
            assert!(r > l, "{op} is left-associative");
        }
    }

    #[test]
    fn not_sits_between_comparison_and_and() {
        let not = UnaryOp::Not.binding_power();
        assert!(not < BinaryOp::Equal.binding_power().0);
        assert!(not > BinaryOp::And.binding_power().0);
    }

    #[test]
    fn sign_prefix_stops_at_comma() {
        let sign = UnaryOp::Neg.binding_power();
        assert!(sign > BinaryOp::Comma.binding_power().0);
        assert!(sign < BinaryOp::And.binding_power().0);
    }

    #[test]
    fn operator_from_token() {
        assert_eq!(BinaryOp::from_token(TokenKind::Arrow), Some(BinaryOp::Pipeline));
        assert_eq!(BinaryOp::from_token(TokenKind::Caret), Some(BinaryOp::Pow));
        assert_eq!(BinaryOp::from_token(TokenKind::Comma), Some(BinaryOp::Comma));
        assert_eq!(BinaryOp::from_token(TokenKind::Semicolon), None);

        assert_eq!(UnaryOp::from_token(TokenKind::Bang), Some(UnaryOp::Not));
        assert_eq!(UnaryOp::from_token(TokenKind::Minus), Some(UnaryOp::Neg));
        assert_eq!(UnaryOp::from_token(TokenKind::Star), None);
    }

    #[test]
    fn operator_display() {
        assert_eq!(format!("{}", BinaryOp::Pipeline), "->");
        assert_eq!(format!("{}", BinaryOp::Pow), "^");
        assert_eq!(format!("{}", UnaryOp::Not), "!");
    }

    #[test]
    fn comparison_check() {
        assert!(BinaryOp::LessEqual.is_comparison());
        assert!(!BinaryOp::And.is_comparison());
    }
}
