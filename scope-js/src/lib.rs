//! JavaScript scoping and hoisting, demonstrated on a small tree-walking evaluator.
//!
//! The evaluator understands a subset of JavaScript: function declarations and expressions,
//! `var`/`let`/`const`, blocks, number arithmetic, arrays with `reduce`, and rest parameters. What
//! it models faithfully is name resolution:
//! - `var` bindings exist for the whole function body from entry, holding `undefined`;
//! - `let`/`const` bindings exist from block entry but cannot be touched until their declaration
//!   runs (the temporal dead zone);
//! - inner blocks shadow outer bindings without affecting them.
//!
//! [`demos`] holds the demonstrations built on top of it, and [`sum`] their native counterparts.

use ast::Node;
use ast::TopLevel;
use error::SyntaxResult;
use lex::Lexer;
use parse::Parser;

pub mod ast;
pub mod demos;
pub mod env;
pub mod error;
pub mod exec;
pub mod function;
pub mod hoist;
pub mod lex;
pub mod loc;
pub mod parse;
pub mod sum;
pub mod token;
pub mod value;
pub mod vm;

pub use crate::error::SyntaxError;
pub use crate::error::Termination;
pub use crate::error::TerminationReason;
pub use crate::error::VmError;
pub use crate::exec::Completion;
pub use crate::exec::JsRuntime;
pub use crate::value::Value;
pub use crate::vm::StackFrame;
pub use crate::vm::Vm;
pub use crate::vm::VmOptions;

pub fn parse(source: &str) -> SyntaxResult<Node<TopLevel>> {
  let lexer = Lexer::new(source);
  let mut parser = Parser::new(lexer);
  parser.parse_top_level()
}
