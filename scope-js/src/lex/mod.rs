use crate::loc::Loc;
use crate::token::Token;
use crate::token::KEYWORD_STRS;
use crate::token::TT;
use core::ops::Index;
use memchr::memchr;
use memchr::memmem;

#[cfg(test)]
mod tests;

#[derive(Copy, Clone)]
pub struct LexerCheckpoint {
  next: usize,
}

pub struct Lexer<'a> {
  source: &'a str,
  next: usize,
}

impl<'a> Lexer<'a> {
  pub fn new(code: &'a str) -> Lexer<'a> {
    Lexer {
      source: code,
      next: 0,
    }
  }

  pub fn next(&self) -> usize {
    self.next
  }

  fn end(&self) -> usize {
    self.source.len()
  }

  fn remaining(&self) -> &'a str {
    &self.source[self.next..]
  }

  pub fn source_range(&self) -> Loc {
    Loc(0, self.end())
  }

  fn at_end(&self) -> bool {
    self.next >= self.end()
  }

  fn peek_or_eof(&self, n: usize) -> Option<char> {
    self.remaining().chars().nth(n)
  }

  fn skip_to_end(&mut self) {
    self.next = self.end();
  }

  pub fn checkpoint(&self) -> LexerCheckpoint {
    LexerCheckpoint { next: self.next }
  }

  pub fn since_checkpoint(&self, checkpoint: LexerCheckpoint) -> Loc {
    Loc(checkpoint.next, self.next)
  }

  fn skip(&mut self, n: usize) {
    debug_assert!(self.next + n <= self.end());
    self.next += n;
  }

  fn while_chars<F: Fn(char) -> bool>(&self, pred: F) -> usize {
    self
      .remaining()
      .char_indices()
      .find(|&(_, c)| !pred(c))
      .map(|(i, _)| i)
      .unwrap_or(self.remaining().len())
  }

  fn consume_while<F: Fn(char) -> bool>(&mut self, pred: F) -> usize {
    let n = self.while_chars(pred);
    self.skip(n);
    n
  }

  fn drive<F: FnOnce(&mut Self) -> TT>(&mut self, preceded_by_line_terminator: bool, f: F) -> Token {
    let cp = self.checkpoint();
    let typ = f(self);
    Token {
      loc: self.since_checkpoint(cp),
      preceded_by_line_terminator,
      typ,
    }
  }
}

impl<'a> Index<Loc> for Lexer<'a> {
  type Output = str;

  fn index(&self, index: Loc) -> &Self::Output {
    &self.source[index.0..index.1]
  }
}

fn is_line_terminator(c: char) -> bool {
  matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_id_start(c: char) -> bool {
  c == '$' || c == '_' || c.is_alphabetic()
}

fn is_id_continue(c: char) -> bool {
  is_id_start(c) || c.is_ascii_digit() || c == '\u{200C}' || c == '\u{200D}' || c.is_numeric()
}

enum Insig {
  None,
  Skipped { line_terminator: bool },
  // An unterminated multiline comment; the lexer is left at its start.
  Unterminated,
}

// Whitespace and comments between significant tokens.
fn skip_insig(lexer: &mut Lexer<'_>) -> Insig {
  let rest = lexer.remaining();
  let Some(c) = rest.chars().next() else {
    return Insig::None;
  };
  if is_line_terminator(c) {
    lexer.skip(c.len_utf8());
    return Insig::Skipped {
      line_terminator: true,
    };
  }
  if c.is_whitespace() || c == '\u{FEFF}' {
    lexer.skip(c.len_utf8());
    return Insig::Skipped {
      line_terminator: false,
    };
  }
  if rest.starts_with("//") {
    let len = memchr(b'\n', rest.as_bytes()).unwrap_or(rest.len());
    lexer.skip(len);
    return Insig::Skipped {
      line_terminator: false,
    };
  }
  if rest.starts_with("/*") {
    let Some(end) = memmem::find(&rest.as_bytes()[2..], b"*/") else {
      return Insig::Unterminated;
    };
    let body = &rest[2..2 + end];
    lexer.skip(2 + end + 2);
    // A multiline comment containing a line terminator counts as a line terminator for ASI.
    return Insig::Skipped {
      line_terminator: body.chars().any(is_line_terminator),
    };
  }
  Insig::None
}

fn lex_number(lexer: &mut Lexer<'_>) -> TT {
  lexer.consume_while(|c| c.is_ascii_digit());
  if lexer.peek_or_eof(0) == Some('.') {
    lexer.skip(1);
    lexer.consume_while(|c| c.is_ascii_digit());
  }
  if matches!(lexer.peek_or_eof(0), Some('e' | 'E')) {
    let sign = matches!(lexer.peek_or_eof(1), Some('+' | '-')) as usize;
    if !lexer
      .peek_or_eof(1 + sign)
      .is_some_and(|c| c.is_ascii_digit())
    {
      lexer.skip(1 + sign);
      return TT::Invalid;
    }
    lexer.skip(1 + sign);
    lexer.consume_while(|c| c.is_ascii_digit());
  }
  // A literal immediately followed by an identifier character is malformed (e.g. `3in`).
  if lexer.peek_or_eof(0).is_some_and(is_id_start) {
    lexer.consume_while(is_id_continue);
    return TT::Invalid;
  }
  TT::LiteralNumber
}

fn lex_identifier_or_keyword(lexer: &mut Lexer<'_>) -> TT {
  let start = lexer.next();
  lexer.consume_while(is_id_continue);
  let word = &lexer.source[start..lexer.next()];
  KEYWORD_STRS.get(word).copied().unwrap_or(TT::Identifier)
}

fn lex_punctuator(lexer: &mut Lexer<'_>, c: char) -> TT {
  let (tt, len) = match c {
    '{' => (TT::BraceOpen, 1),
    '}' => (TT::BraceClose, 1),
    '(' => (TT::ParenthesisOpen, 1),
    ')' => (TT::ParenthesisClose, 1),
    '[' => (TT::BracketOpen, 1),
    ']' => (TT::BracketClose, 1),
    ',' => (TT::Comma, 1),
    ';' => (TT::Semicolon, 1),
    '=' => (TT::Equals, 1),
    '+' => (TT::Plus, 1),
    '-' => (TT::Hyphen, 1),
    '*' => (TT::Asterisk, 1),
    '/' => (TT::Slash, 1),
    '%' => (TT::Percent, 1),
    '.' if lexer.remaining().starts_with("...") => (TT::DotDotDot, 3),
    '.' => (TT::Dot, 1),
    other => (TT::Invalid, other.len_utf8()),
  };
  lexer.skip(len);
  tt
}

pub fn lex_next(lexer: &mut Lexer<'_>) -> Token {
  let mut preceded_by_line_terminator = false;
  loop {
    match skip_insig(lexer) {
      Insig::None => break,
      Insig::Skipped { line_terminator } => preceded_by_line_terminator |= line_terminator,
      Insig::Unterminated => {
        return lexer.drive(preceded_by_line_terminator, |lexer| {
          lexer.skip_to_end();
          TT::Invalid
        });
      }
    }
  }

  if lexer.at_end() {
    return lexer.drive(preceded_by_line_terminator, |_| TT::EOF);
  };

  lexer.drive(preceded_by_line_terminator, |lexer| {
    // The at_end check above guarantees at least one char.
    let c = lexer.peek_or_eof(0).unwrap_or('\0');
    let next_is_digit = lexer.peek_or_eof(1).is_some_and(|c| c.is_ascii_digit());
    if c.is_ascii_digit() || (c == '.' && next_is_digit) {
      lex_number(lexer)
    } else if is_id_start(c) {
      lex_identifier_or_keyword(lexer)
    } else {
      lex_punctuator(lexer, c)
    }
  })
}
