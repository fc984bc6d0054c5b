use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::loc::Loc;
use serde::Serialize;
use serde::Serializer;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::rc::Rc;

pub struct Node<S> {
  pub loc: Loc,
  pub stx: Box<S>,
}

impl<S> Node<S> {
  pub fn new(loc: Loc, stx: S) -> Node<S> {
    Node {
      loc,
      stx: Box::new(stx),
    }
  }

  /// Create an error at this node's location.
  pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
    self.loc.error(typ, None)
  }
}

impl<S: Debug> Debug for Node<S> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    self.stx.fmt(f)
  }
}

impl<S: Serialize> Serialize for Node<S> {
  fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
    self.stx.serialize(serializer)
  }
}

#[derive(Debug, Serialize)]
pub struct TopLevel {
  pub body: Vec<Node<Stmt>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "$t")]
pub enum Stmt {
  Block(BlockStmt),
  Empty(EmptyStmt),
  Expr(ExprStmt),
  FunctionDecl(FuncDecl),
  Return(ReturnStmt),
  VarDecl(VarDecl),
}

#[derive(Debug, Serialize)]
pub struct BlockStmt {
  pub body: Vec<Node<Stmt>>,
}

#[derive(Debug, Serialize)]
pub struct EmptyStmt {}

#[derive(Debug, Serialize)]
pub struct ExprStmt {
  pub expr: Node<Expr>,
}

#[derive(Debug, Serialize)]
pub struct ReturnStmt {
  pub value: Option<Node<Expr>>,
}

/// `function name(params) { body }` in statement position. Fully hoisted to the start of the
/// enclosing scope.
#[derive(Debug, Serialize)]
pub struct FuncDecl {
  pub name: String,
  pub function: Rc<Func>,
}

#[derive(Debug, Serialize)]
pub struct Func {
  pub parameters: Vec<Param>,
  pub body: Vec<Node<Stmt>>,
}

#[derive(Debug, Serialize)]
pub struct Param {
  pub name: String,
  pub rest: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum VarDeclMode {
  Const,
  Let,
  Var,
}

#[derive(Debug, Serialize)]
pub struct VarDecl {
  pub mode: VarDeclMode,
  pub declarators: Vec<VarDeclarator>,
}

#[derive(Debug, Serialize)]
pub struct VarDeclarator {
  pub name: String,
  pub initializer: Option<Node<Expr>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "$t")]
pub enum Expr {
  Array(ArrayExpr),
  Assign(AssignExpr),
  Binary(BinaryExpr),
  Call(CallExpr),
  Func(FuncExpr),
  Id(IdExpr),
  LitNum(LitNumExpr),
  Member(MemberExpr),
  Unary(UnaryExpr),
}

#[derive(Debug, Serialize)]
pub struct ArrayExpr {
  pub elements: Vec<Node<Expr>>,
}

#[derive(Debug, Serialize)]
pub struct AssignExpr {
  pub target: String,
  pub value: Node<Expr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
  Addition,
  Subtraction,
  Multiplication,
  Division,
  Remainder,
}

#[derive(Debug, Serialize)]
pub struct BinaryExpr {
  pub operator: BinaryOperator,
  pub left: Node<Expr>,
  pub right: Node<Expr>,
}

#[derive(Debug, Serialize)]
pub struct CallExpr {
  pub callee: Node<Expr>,
  pub arguments: Vec<Node<Expr>>,
}

/// A function expression. The optional name is only visible inside the function itself.
#[derive(Debug, Serialize)]
pub struct FuncExpr {
  pub name: Option<String>,
  pub function: Rc<Func>,
}

#[derive(Debug, Serialize)]
pub struct IdExpr {
  pub name: String,
}

#[derive(Debug, Serialize)]
pub struct LitNumExpr {
  pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct MemberExpr {
  pub object: Node<Expr>,
  pub property: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum UnaryOperator {
  Negation,
  Plus,
}

#[derive(Debug, Serialize)]
pub struct UnaryExpr {
  pub operator: UnaryOperator,
  pub argument: Node<Expr>,
}
