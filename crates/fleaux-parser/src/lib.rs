//! Fleaux parser crate.
//!
//! This crate provides the lexer and parser for Fleaux source code:
//! - Lexical analysis (tokenization)
//! - Abstract Syntax Tree (AST) definitions
//! - A Pratt parser for transforming tokens into an AST
//!
//! # Example
//!
//! ```
//! use fleaux_parser::Parser;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let source = r#"
//!     let Square(x: Number): Number :: (x, 2) -> Std.Pow;
//!     3 -> Square -> Std.Println;
//! "#;
//!
//! match Parser::parse(source, &arena) {
//!     Ok(program) => println!("Parsed successfully: {} statements", program.statements().len()),
//!     Err(error) => eprintln!("{}", error.display_with_source(source)),
//! }
//! ```

pub mod ast;
pub mod lexer;

pub use ast::{Parser, Program};
pub use lexer::{Lexer, Token, TokenKind};
