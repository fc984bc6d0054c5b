use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::loc::Loc;
use ahash::HashMap;
use ahash::HashMapExt;
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum TT {
  // Special token used to represent the end of the source code. Easier than using and handling Option everywhere.
  EOF,
  // Special token used to represent invalid source code. The parser turns it into a SyntaxError when it is consumed.
  Invalid,

  Asterisk,
  BraceClose,
  BraceOpen,
  BracketClose,
  BracketOpen,
  Comma,
  Dot,
  DotDotDot,
  Equals,
  Hyphen,
  Identifier,
  KeywordConst,
  KeywordFunction,
  KeywordLet,
  KeywordReturn,
  KeywordVar,
  LiteralNumber,
  ParenthesisClose,
  ParenthesisOpen,
  Percent,
  Plus,
  Semicolon,
  Slash,
}

pub static KEYWORDS_MAPPING: Lazy<HashMap<TT, &'static str>> = Lazy::new(|| {
  let mut map = HashMap::<TT, &'static str>::new();
  map.insert(TT::KeywordConst, "const");
  map.insert(TT::KeywordFunction, "function");
  map.insert(TT::KeywordLet, "let");
  map.insert(TT::KeywordReturn, "return");
  map.insert(TT::KeywordVar, "var");
  map
});

pub static KEYWORD_STRS: Lazy<HashMap<&'static str, TT>> =
  Lazy::new(|| KEYWORDS_MAPPING.iter().map(|(&tt, &s)| (s, tt)).collect());

#[derive(Clone, Debug)]
pub struct Token {
  pub loc: Loc,
  // Whether one or more whitespace characters appear immediately before this token, and at least
  // one of those whitespace characters is a line terminator.
  pub preceded_by_line_terminator: bool,
  pub typ: TT,
}

impl Token {
  pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
    self.loc.error(typ, Some(self.typ))
  }
}
