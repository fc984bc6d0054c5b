use crate::loc::Loc;
use crate::token::TT;
use crate::vm::StackFrame;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Formatter;
use std::error::Error;
use std::fmt::Display;

/// A stable classification of syntax errors produced by the parser.
///
/// Diagnostic codes (prefix `SJ`) are assigned per variant and are stable:
/// - `SJ0001`: [`SyntaxErrorType::NestingTooDeep`]
/// - `SJ0002`: [`SyntaxErrorType::ExpectedSyntax`]
/// - `SJ0003`: [`SyntaxErrorType::InvalidAssigmentTarget`]
/// - `SJ0004`: [`SyntaxErrorType::MalformedLiteralNumber`]
/// - `SJ0005`: [`SyntaxErrorType::RequiredTokenNotFound`]
/// - `SJ0006`: [`SyntaxErrorType::UnexpectedEnd`]
/// - `SJ0007`: [`SyntaxErrorType::ConstWithoutInitializer`]
/// - `SJ0008`: [`SyntaxErrorType::RestParameterNotLast`]
/// - `SJ0009`: [`SyntaxErrorType::UnterminatedComment`]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SyntaxErrorType {
  /// Blocks, parentheses, arrays, calls or operator chains nested past the parser's limit.
  NestingTooDeep,
  ExpectedSyntax(&'static str),
  InvalidAssigmentTarget,
  MalformedLiteralNumber,
  RequiredTokenNotFound(TT),
  UnexpectedEnd,
  ConstWithoutInitializer,
  RestParameterNotLast,
  UnterminatedComment,
}

#[derive(Clone)]
pub struct SyntaxError {
  pub typ: SyntaxErrorType,
  pub loc: Loc,
  pub actual_token: Option<TT>,
}

impl SyntaxError {
  pub fn new(typ: SyntaxErrorType, loc: Loc, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError {
      typ,
      loc,
      actual_token,
    }
  }

  /// Renders `code: message at line:col` against the source the error came from.
  pub fn render(&self, source: &str) -> String {
    let (line, col) = self.loc.line_col(source);
    format!(
      "{}: {} at {line}:{col}",
      self.typ.code(),
      self.typ.message(self.actual_token)
    )
  }
}

impl Debug for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{} around loc [{}:{}]", self, self.loc.0, self.loc.1)
  }
}

impl Display for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{:?} [token={:?}]", self.typ, self.actual_token)
  }
}

impl Error for SyntaxError {}

impl PartialEq for SyntaxError {
  fn eq(&self, other: &Self) -> bool {
    self.typ == other.typ
  }
}

impl Eq for SyntaxError {}

pub type SyntaxResult<T> = Result<T, SyntaxError>;

impl SyntaxErrorType {
  /// Stable diagnostic code for this syntax error variant.
  pub fn code(&self) -> &'static str {
    match self {
      SyntaxErrorType::NestingTooDeep => "SJ0001",
      SyntaxErrorType::ExpectedSyntax(_) => "SJ0002",
      SyntaxErrorType::InvalidAssigmentTarget => "SJ0003",
      SyntaxErrorType::MalformedLiteralNumber => "SJ0004",
      SyntaxErrorType::RequiredTokenNotFound(_) => "SJ0005",
      SyntaxErrorType::UnexpectedEnd => "SJ0006",
      SyntaxErrorType::ConstWithoutInitializer => "SJ0007",
      SyntaxErrorType::RestParameterNotLast => "SJ0008",
      SyntaxErrorType::UnterminatedComment => "SJ0009",
    }
  }

  /// Human-readable message describing this syntax error.
  pub fn message(&self, actual_token: Option<TT>) -> String {
    match self {
      SyntaxErrorType::NestingTooDeep => "nesting too deep".into(),
      SyntaxErrorType::ExpectedSyntax(expected) => format!("expected {}", expected),
      SyntaxErrorType::InvalidAssigmentTarget => "invalid assignment target".into(),
      SyntaxErrorType::MalformedLiteralNumber => "malformed number literal".into(),
      SyntaxErrorType::RequiredTokenNotFound(token) => format!("expected token {:?}", token),
      SyntaxErrorType::UnexpectedEnd => actual_token
        .map(|tok| format!("unexpected end before {:?}", tok))
        .unwrap_or_else(|| "unexpected end of input".into()),
      SyntaxErrorType::ConstWithoutInitializer => "missing initializer in const declaration".into(),
      SyntaxErrorType::RestParameterNotLast => "rest parameter must be the last parameter".into(),
      SyntaxErrorType::UnterminatedComment => "unterminated multiline comment".into(),
    }
  }
}

/// Errors produced while executing a script.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VmError {
  /// A `let`/`const` binding was read or written before its declaration executed.
  #[error("cannot access '{name}' before initialization")]
  UninitializedAccess { name: String },

  /// A reduction without a seed value was applied to an empty sequence.
  #[error("reduce of empty sequence with no initial value")]
  EmptySequenceReduction,

  /// The name is not bound in any enclosing scope.
  #[error("{name} is not defined")]
  Undeclared { name: String },

  #[error("assignment to constant variable '{name}'")]
  AssignToConst { name: String },

  /// A lexical declaration collides with another declaration of the same name in the same scope.
  #[error("identifier '{name}' has already been declared")]
  DuplicateDeclaration { name: String },

  /// Attempted to call a non-callable value.
  #[error("{0} is not a function")]
  NotCallable(String),

  #[error("type error: {0}")]
  TypeError(String),

  /// A construct that parses but is not executed by this evaluator.
  #[error("unimplemented: {0}")]
  Unimplemented(&'static str),

  /// A non-recoverable termination condition (fuel exhausted, stack overflow).
  #[error("{0}")]
  Termination(Termination),

  #[error("syntax error: {0}")]
  Syntax(SyntaxError),
}

impl From<SyntaxError> for VmError {
  fn from(err: SyntaxError) -> Self {
    VmError::Syntax(err)
  }
}

/// An error that terminates execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Termination {
  pub reason: TerminationReason,
  pub stack: Vec<StackFrame>,
}

impl Termination {
  pub fn new(reason: TerminationReason, stack: Vec<StackFrame>) -> Self {
    Self { reason, stack }
  }
}

impl Display for Termination {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{reason}", reason = self.reason)
  }
}

/// The reason execution terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
  OutOfFuel,
  StackOverflow,
}

impl Display for TerminationReason {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TerminationReason::OutOfFuel => f.write_str("execution terminated: out of fuel"),
      TerminationReason::StackOverflow => f.write_str("execution terminated: stack overflow"),
    }
  }
}
