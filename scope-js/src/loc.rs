use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::token::TT;
use serde::Serialize;
use std::cmp::{max, min};
use std::ops::{Add, AddAssign};

/// A location within the current source file expressed as UTF-8 byte offsets.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  pub fn error(self, typ: SyntaxErrorType, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError::new(typ, self, actual_token)
  }

  pub fn extend(&mut self, other: Loc) {
    self.0 = min(self.0, other.0);
    self.1 = max(self.1, other.1);
  }

  /// 1-based line and column of the start of this location.
  pub fn line_col(&self, source: &str) -> (usize, usize) {
    let start = self.0.min(source.len());
    let before = &source.as_bytes()[..start];
    let line = memchr::memchr_iter(b'\n', before).count() + 1;
    let line_start = memchr::memrchr(b'\n', before).map(|i| i + 1).unwrap_or(0);
    let col = source[line_start..start].chars().count() + 1;
    (line, col)
  }
}

impl Add for Loc {
  type Output = Loc;

  fn add(self, rhs: Self) -> Self::Output {
    let mut new = self;
    new.extend(rhs);
    new
  }
}

impl AddAssign for Loc {
  fn add_assign(&mut self, rhs: Self) {
    self.extend(rhs);
  }
}
