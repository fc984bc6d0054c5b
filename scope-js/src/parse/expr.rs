use super::Parser;
use crate::ast::ArrayExpr;
use crate::ast::AssignExpr;
use crate::ast::BinaryExpr;
use crate::ast::BinaryOperator;
use crate::ast::CallExpr;
use crate::ast::Expr;
use crate::ast::FuncExpr;
use crate::ast::IdExpr;
use crate::ast::LitNumExpr;
use crate::ast::MemberExpr;
use crate::ast::Node;
use crate::ast::UnaryExpr;
use crate::ast::UnaryOperator;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;
use std::rc::Rc;

fn additive_operator(tt: TT) -> Option<BinaryOperator> {
  match tt {
    TT::Plus => Some(BinaryOperator::Addition),
    TT::Hyphen => Some(BinaryOperator::Subtraction),
    _ => None,
  }
}

fn multiplicative_operator(tt: TT) -> Option<BinaryOperator> {
  match tt {
    TT::Asterisk => Some(BinaryOperator::Multiplication),
    TT::Slash => Some(BinaryOperator::Division),
    TT::Percent => Some(BinaryOperator::Remainder),
    _ => None,
  }
}

impl<'a> Parser<'a> {
  pub fn expr(&mut self) -> SyntaxResult<Node<Expr>> {
    self.nested(|p| p.assignment_expr())
  }

  /// Assignment is right associative and only accepts a bare identifier as its target.
  pub fn assignment_expr(&mut self) -> SyntaxResult<Node<Expr>> {
    let target = self.additive_expr()?;
    if !self.consume_if(TT::Equals).is_match() {
      return Ok(target);
    }
    let Expr::Id(id) = &*target.stx else {
      return Err(target.error(SyntaxErrorType::InvalidAssigmentTarget));
    };
    let value = self.expr()?;
    let loc = target.loc + value.loc;
    Ok(Node::new(
      loc,
      Expr::Assign(AssignExpr {
        target: id.name.clone(),
        value,
      }),
    ))
  }

  fn binary_expr_chain<O, N>(&mut self, operator_for: O, operand: N) -> SyntaxResult<Node<Expr>>
  where
    O: Fn(TT) -> Option<BinaryOperator>,
    N: Fn(&mut Self) -> SyntaxResult<Node<Expr>>,
  {
    let mut left = operand(self)?;
    let mut chain = 0;
    while let Some(operator) = operator_for(self.peek().typ) {
      chain += 1;
      self.check_depth(chain)?;
      self.consume();
      let right = operand(self)?;
      let loc = left.loc + right.loc;
      left = Node::new(
        loc,
        Expr::Binary(BinaryExpr {
          operator,
          left,
          right,
        }),
      );
    }
    Ok(left)
  }

  pub fn additive_expr(&mut self) -> SyntaxResult<Node<Expr>> {
    self.binary_expr_chain(additive_operator, |p| p.multiplicative_expr())
  }

  pub fn multiplicative_expr(&mut self) -> SyntaxResult<Node<Expr>> {
    self.binary_expr_chain(multiplicative_operator, |p| p.unary_expr())
  }

  pub fn unary_expr(&mut self) -> SyntaxResult<Node<Expr>> {
    let operator = match self.peek().typ {
      TT::Hyphen => UnaryOperator::Negation,
      TT::Plus => UnaryOperator::Plus,
      _ => return self.call_or_member_expr(),
    };
    self.with_loc(|p| {
      p.consume();
      let argument = p.nested(|p| p.unary_expr())?;
      Ok(Expr::Unary(UnaryExpr { operator, argument }))
    })
  }

  pub fn call_or_member_expr(&mut self) -> SyntaxResult<Node<Expr>> {
    let mut expr = self.primary_expr()?;
    let mut chain = 0;
    loop {
      if matches!(self.peek().typ, TT::ParenthesisOpen | TT::Dot) {
        chain += 1;
        self.check_depth(chain)?;
      }
      if self.consume_if(TT::ParenthesisOpen).is_match() {
        let arguments = self.list(TT::ParenthesisClose)?;
        let end = self.require(TT::ParenthesisClose)?;
        let loc = expr.loc + end.loc;
        expr = Node::new(
          loc,
          Expr::Call(CallExpr {
            callee: expr,
            arguments,
          }),
        );
      } else if self.consume_if(TT::Dot).is_match() {
        let prop = self.require(TT::Identifier)?;
        let property = self.string(prop.loc);
        let loc = expr.loc + prop.loc;
        expr = Node::new(
          loc,
          Expr::Member(MemberExpr {
            object: expr,
            property,
          }),
        );
      } else {
        break;
      }
    }
    Ok(expr)
  }

  /// Comma separated expressions up to (not including) `end`. A trailing comma is allowed.
  fn list(&mut self, end: TT) -> SyntaxResult<Vec<Node<Expr>>> {
    let mut items = Vec::new();
    while self.peek().typ != end {
      items.push(self.expr()?);
      if !self.consume_if(TT::Comma).is_match() {
        break;
      }
    }
    Ok(items)
  }

  pub fn primary_expr(&mut self) -> SyntaxResult<Node<Expr>> {
    let t = self.peek();
    match t.typ {
      TT::LiteralNumber => self.with_loc(|p| {
        let t = p.consume();
        let value = p
          .str(t.loc)
          .parse::<f64>()
          .map_err(|_| t.error(SyntaxErrorType::MalformedLiteralNumber))?;
        Ok(Expr::LitNum(LitNumExpr { value }))
      }),
      TT::Identifier => self.with_loc(|p| {
        let name = p.require_identifier()?;
        Ok(Expr::Id(IdExpr { name }))
      }),
      TT::ParenthesisOpen => {
        let open = self.consume();
        let mut inner = self.expr()?;
        let close = self.require(TT::ParenthesisClose)?;
        inner.loc = open.loc + close.loc;
        Ok(inner)
      }
      TT::BracketOpen => self.with_loc(|p| {
        p.consume();
        let elements = p.list(TT::BracketClose)?;
        p.require(TT::BracketClose)?;
        Ok(Expr::Array(ArrayExpr { elements }))
      }),
      TT::KeywordFunction => self.with_loc(|p| {
        p.consume();
        let name = match p.peek().typ {
          TT::Identifier => Some(p.require_identifier()?),
          _ => None,
        };
        let function = p.func_signature_and_body()?;
        Ok(Expr::Func(FuncExpr {
          name,
          function: Rc::new(function),
        }))
      }),
      _ => {
        self.consume();
        Err(self.unexpected(&t, SyntaxErrorType::ExpectedSyntax("expression operand")))
      }
    }
  }
}
