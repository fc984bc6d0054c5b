use super::Parser;
use crate::ast::BlockStmt;
use crate::ast::EmptyStmt;
use crate::ast::ExprStmt;
use crate::ast::Func;
use crate::ast::FuncDecl;
use crate::ast::Node;
use crate::ast::Param;
use crate::ast::ReturnStmt;
use crate::ast::Stmt;
use crate::ast::VarDecl;
use crate::ast::VarDeclMode;
use crate::ast::VarDeclarator;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;
use std::rc::Rc;

impl<'a> Parser<'a> {
  /// Parses statements until (but not including) a token of type `end`.
  pub fn stmts(&mut self, end: TT) -> SyntaxResult<Vec<Node<Stmt>>> {
    let mut body = Vec::new();
    loop {
      let t = self.peek();
      if t.typ == end {
        break;
      }
      if t.typ == TT::EOF {
        return Err(self.unexpected(&t, SyntaxErrorType::RequiredTokenNotFound(end)));
      }
      body.push(self.stmt()?);
    }
    Ok(body)
  }

  pub fn stmt(&mut self) -> SyntaxResult<Node<Stmt>> {
    match self.peek().typ {
      TT::BraceOpen => self.with_loc(|p| Ok(Stmt::Block(p.block_stmt()?))),
      TT::KeywordFunction => self.with_loc(|p| Ok(Stmt::FunctionDecl(p.func_decl()?))),
      TT::KeywordConst | TT::KeywordLet | TT::KeywordVar => self.with_loc(|p| {
        let decl = p.var_decl()?;
        p.require_asi()?;
        Ok(Stmt::VarDecl(decl))
      }),
      TT::KeywordReturn => self.with_loc(|p| Ok(Stmt::Return(p.return_stmt()?))),
      TT::Semicolon => self.with_loc(|p| {
        p.consume();
        Ok(Stmt::Empty(EmptyStmt {}))
      }),
      _ => self.with_loc(|p| {
        let expr = p.expr()?;
        p.require_asi()?;
        Ok(Stmt::Expr(ExprStmt { expr }))
      }),
    }
  }

  /// Consumes a `;`, or accepts its automatic insertion before `}`, the end of input, or a token on
  /// a new line.
  pub fn require_asi(&mut self) -> SyntaxResult<()> {
    if self.consume_if(TT::Semicolon).is_match() {
      return Ok(());
    }
    let t = self.peek();
    if matches!(t.typ, TT::EOF | TT::BraceClose) || t.preceded_by_line_terminator {
      return Ok(());
    }
    Err(self.unexpected(&t, SyntaxErrorType::ExpectedSyntax("`;` or line terminator")))
  }

  pub fn block_stmt(&mut self) -> SyntaxResult<BlockStmt> {
    self.require(TT::BraceOpen)?;
    let body = self.nested(|p| p.stmts(TT::BraceClose))?;
    self.require(TT::BraceClose)?;
    Ok(BlockStmt { body })
  }

  pub fn var_decl_mode(&mut self) -> SyntaxResult<VarDeclMode> {
    let t = self.consume();
    Ok(match t.typ {
      TT::KeywordLet => VarDeclMode::Let,
      TT::KeywordConst => VarDeclMode::Const,
      TT::KeywordVar => VarDeclMode::Var,
      _ => return Err(self.unexpected(&t, SyntaxErrorType::ExpectedSyntax("variable declaration"))),
    })
  }

  /// Parses a variable declaration, which contains one or more declarators, each with an optional initializer. Examples of variable declarations:
  /// - `const a = 1`
  /// - `let a, b = 2, c`
  /// - `var a`
  pub fn var_decl(&mut self) -> SyntaxResult<VarDecl> {
    let mode = self.var_decl_mode()?;
    let mut declarators = Vec::new();
    loop {
      let name_tok = self.peek();
      let name = self.require_identifier()?;
      let initializer = self.consume_if(TT::Equals).and_then(|| self.expr())?;
      if mode == VarDeclMode::Const && initializer.is_none() {
        return Err(name_tok.error(SyntaxErrorType::ConstWithoutInitializer));
      }
      declarators.push(VarDeclarator { name, initializer });
      if !self.consume_if(TT::Comma).is_match() {
        break;
      }
    }
    Ok(VarDecl { mode, declarators })
  }

  pub fn func_decl(&mut self) -> SyntaxResult<FuncDecl> {
    self.require(TT::KeywordFunction)?;
    let name = self.require_identifier()?;
    let function = self.func_signature_and_body()?;
    Ok(FuncDecl {
      name,
      function: Rc::new(function),
    })
  }

  /// Parses `(params) { body }`.
  pub fn func_signature_and_body(&mut self) -> SyntaxResult<Func> {
    self.require(TT::ParenthesisOpen)?;
    let mut parameters = Vec::<Param>::new();
    loop {
      if self.consume_if(TT::ParenthesisClose).is_match() {
        break;
      }
      if parameters.last().is_some_and(|p| p.rest) {
        let t = self.peek();
        return Err(t.error(SyntaxErrorType::RestParameterNotLast));
      }
      let rest = self.consume_if(TT::DotDotDot).is_match();
      let name = self.require_identifier()?;
      parameters.push(Param { name, rest });
      if !self.consume_if(TT::Comma).is_match() {
        self.require(TT::ParenthesisClose)?;
        break;
      }
    }
    let body = self.block_stmt()?.body;
    Ok(Func { parameters, body })
  }

  pub fn return_stmt(&mut self) -> SyntaxResult<ReturnStmt> {
    self.require(TT::KeywordReturn)?;
    let t = self.peek();
    let value = if matches!(t.typ, TT::Semicolon | TT::BraceClose | TT::EOF)
      || t.preceded_by_line_terminator
    {
      None
    } else {
      Some(self.expr()?)
    };
    self.require_asi()?;
    Ok(ReturnStmt { value })
  }
}
