use crate::ast::Func;
use crate::env::Scope;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::rc::Rc;

/// A function value: its syntax plus the scope it was created in.
pub struct Closure {
  name: Option<String>,
  func: Rc<Func>,
  env: Rc<Scope>,
}

impl Closure {
  pub fn new(name: Option<String>, func: Rc<Func>, env: Rc<Scope>) -> Self {
    Self { name, func, env }
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn func(&self) -> &Rc<Func> {
    &self.func
  }

  /// The scope captured at creation time; calls create their function scope under it.
  pub fn env(&self) -> &Rc<Scope> {
    &self.env
  }

  /// `Function.prototype.length`: parameters before the rest parameter.
  pub fn length(&self) -> usize {
    self.func.parameters.iter().take_while(|p| !p.rest).count()
  }
}

// Scopes can hold the closure that captured them, so the captured env is never printed.
impl Debug for Closure {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("Closure")
      .field("name", &self.name)
      .field("length", &self.length())
      .finish_non_exhaustive()
  }
}
