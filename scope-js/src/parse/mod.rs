use crate::ast::Node;
use crate::ast::TopLevel;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::lex_next;
use crate::lex::Lexer;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;

pub mod expr;
pub mod stmt;
#[cfg(test)]
mod tests;

#[derive(Debug)]
#[must_use]
pub struct MaybeToken {
  matched: bool,
}

impl MaybeToken {
  pub fn is_match(&self) -> bool {
    self.matched
  }

  pub fn and_then<R, F: FnOnce() -> SyntaxResult<R>>(self, f: F) -> SyntaxResult<Option<R>> {
    Ok(if self.matched { Some(f()?) } else { None })
  }
}

pub struct ParserCheckpoint {
  next_tok_i: usize,
}

/// How deeply expressions and blocks may nest, counting each left-associative operator, call or
/// member link as one level. Parsing and evaluation both recurse per level.
pub const MAX_NESTING_DEPTH: usize = 128;

pub struct Parser<'a> {
  lexer: Lexer<'a>,
  buf: Vec<Token>,
  next_tok_i: usize,
  depth: usize,
}

impl<'a> Parser<'a> {
  pub fn new(lexer: Lexer<'a>) -> Parser<'a> {
    Parser {
      lexer,
      buf: Vec::new(),
      next_tok_i: 0,
      depth: 0,
    }
  }

  pub fn source_range(&self) -> Loc {
    self.lexer.source_range()
  }

  pub fn str(&self, loc: Loc) -> &str {
    &self.lexer[loc]
  }

  pub fn string(&self, loc: Loc) -> String {
    self.str(loc).to_string()
  }

  pub fn checkpoint(&self) -> ParserCheckpoint {
    ParserCheckpoint {
      next_tok_i: self.next_tok_i,
    }
  }

  /// The location from the start of the first token consumed after `checkpoint` to the end of the
  /// last consumed token.
  pub fn since_checkpoint(&self, checkpoint: &ParserCheckpoint) -> Loc {
    let start = self
      .buf
      .get(checkpoint.next_tok_i)
      .map(|t| t.loc.0)
      .unwrap_or(self.lexer.next());
    let end = match self.next_tok_i {
      0 => start,
      n => self.buf[n - 1].loc.1.max(start),
    };
    Loc(start, end)
  }

  fn forward<K: FnOnce(&Token) -> bool>(&mut self, keep: K) -> (bool, Token) {
    if self.buf.len() == self.next_tok_i {
      let token = lex_next(&mut self.lexer);
      self.buf.push(token);
    }
    let t = self.buf[self.next_tok_i].clone();
    let k = keep(&t);
    if k {
      self.next_tok_i += 1;
    };
    (k, t)
  }

  pub fn consume(&mut self) -> Token {
    self.forward(|_| true).1
  }

  pub fn peek(&mut self) -> Token {
    self.forward(|_| false).1
  }

  pub fn consume_if(&mut self, typ: TT) -> MaybeToken {
    let (matched, _) = self.forward(|t| t.typ == typ);
    MaybeToken { matched }
  }

  /// Builds the error for an unexpected token, classifying `TT::Invalid` tokens by their source.
  pub fn unexpected(&self, t: &Token, fallback: SyntaxErrorType) -> SyntaxError {
    let typ = match t.typ {
      TT::EOF => SyntaxErrorType::UnexpectedEnd,
      TT::Invalid => {
        let raw = self.str(t.loc);
        if raw.starts_with("/*") {
          SyntaxErrorType::UnterminatedComment
        } else if raw.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
          SyntaxErrorType::MalformedLiteralNumber
        } else {
          fallback
        }
      }
      _ => fallback,
    };
    t.error(typ)
  }

  pub fn require(&mut self, typ: TT) -> SyntaxResult<Token> {
    let t = self.consume();
    if t.typ != typ {
      Err(self.unexpected(&t, SyntaxErrorType::RequiredTokenNotFound(typ)))
    } else {
      Ok(t)
    }
  }

  pub fn require_identifier(&mut self) -> SyntaxResult<String> {
    let t = self.require(TT::Identifier)?;
    Ok(self.string(t.loc))
  }

  /// Runs `f` one nesting level deeper.
  pub fn nested<T, F>(&mut self, f: F) -> SyntaxResult<T>
  where
    F: FnOnce(&mut Self) -> SyntaxResult<T>,
  {
    self.check_depth(1)?;
    self.depth += 1;
    let result = f(self);
    self.depth -= 1;
    result
  }

  /// Fails if `extra` more levels on top of the current depth would exceed [`MAX_NESTING_DEPTH`].
  pub fn check_depth(&mut self, extra: usize) -> SyntaxResult<()> {
    if self.depth + extra > MAX_NESTING_DEPTH {
      let t = self.peek();
      return Err(t.error(SyntaxErrorType::NestingTooDeep));
    }
    Ok(())
  }

  pub fn with_loc<S, F>(&mut self, f: F) -> SyntaxResult<Node<S>>
  where
    F: FnOnce(&mut Self) -> SyntaxResult<S>,
  {
    // Make sure the first token of the node is buffered so its start offset is known.
    self.peek();
    let start = self.checkpoint();
    let stx = f(self)?;
    Ok(Node::new(self.since_checkpoint(&start), stx))
  }

  pub fn parse_top_level(&mut self) -> SyntaxResult<Node<TopLevel>> {
    let body = self.stmts(TT::EOF)?;
    self.require(TT::EOF)?;
    Ok(Node::new(self.source_range(), TopLevel { body }))
  }
}
