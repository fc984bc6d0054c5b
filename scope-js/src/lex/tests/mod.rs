use crate::lex::lex_next;
use crate::lex::Lexer;
use crate::token::TT;
use crate::token::TT::*;

fn check<const N: usize>(code: &str, expecteds: [TT; N]) {
  let mut lexer = Lexer::new(code);
  for expected in expecteds {
    let t = lex_next(&mut lexer);
    assert_eq!(t.typ, expected);
  }
  let t = lex_next(&mut lexer);
  assert_eq!(EOF, t.typ);
}

#[test]
fn test_lex_keywords() {
  check("const", [KeywordConst]);
  check("let var", [KeywordLet, KeywordVar]);
  check("function return", [KeywordFunction, KeywordReturn]);
}

#[test]
fn test_lex_identifiers() {
  check("h929", [Identifier]);
  check("letAdd2numbers", [Identifier]);
  check("$_a", [Identifier]);
  check("constant", [Identifier]);
}

#[test]
fn test_lex_literal_numbers() {
  check("1", [LiteralNumber]);
  check("929", [LiteralNumber]);
  check(".929", [LiteralNumber]);
  check(". 929", [Dot, LiteralNumber]);
  check("1.5e3", [LiteralNumber]);
  check("1e-3", [LiteralNumber]);
  check("1e", [Invalid]);
  check("3in", [Invalid]);
}

#[test]
fn test_lex_punctuators() {
  check("...args", [DotDotDot, Identifier]);
  check("a.reduce", [Identifier, Dot, Identifier]);
  check("{}()[],;=+-*/%", [
    BraceOpen,
    BraceClose,
    ParenthesisOpen,
    ParenthesisClose,
    BracketOpen,
    BracketClose,
    Comma,
    Semicolon,
    Equals,
    Plus,
    Hyphen,
    Asterisk,
    Slash,
    Percent,
  ]);
  check("#", [Invalid]);
}

#[test]
fn test_lex_comments() {
  check("// only a comment", []);
  check("a /* inline */ b", [Identifier, Identifier]);
  check("a // trailing\nb", [Identifier, Identifier]);
  check("/* never closed", [Invalid]);
}

#[test]
fn test_lex_line_terminator_flag() {
  let mut lexer = Lexer::new("a\nb /*\n*/ c d");
  assert!(!lex_next(&mut lexer).preceded_by_line_terminator);
  assert!(lex_next(&mut lexer).preceded_by_line_terminator);
  assert!(lex_next(&mut lexer).preceded_by_line_terminator);
  assert!(!lex_next(&mut lexer).preceded_by_line_terminator);
}
