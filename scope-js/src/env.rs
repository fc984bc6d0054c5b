use crate::error::VmError;
use crate::value::Value;
use ahash::HashMap;
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::rc::Rc;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum ScopeType {
  Global,
  // Bindings visible for the whole function body: parameters, `var`s, and the body's own
  // top-level lexical declarations.
  Function,
  // Only ever holds the name of a named function expression.
  FunctionName,
  Block,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum BindingKind {
  Const,
  Let,
  Var,
  Param,
  Function,
}

impl BindingKind {
  pub fn is_lexical(self) -> bool {
    matches!(self, BindingKind::Const | BindingKind::Let)
  }

  pub fn is_mutable(self) -> bool {
    self != BindingKind::Const
  }
}

#[derive(Clone, Debug)]
pub enum Slot {
  /// Declared but its declaration has not executed yet (temporal dead zone).
  Uninitialized,
  Value(Value),
}

#[derive(Clone, Debug)]
pub struct Binding {
  pub kind: BindingKind,
  pub slot: Slot,
}

/// One lexical environment. A scope exclusively owns its bindings and links to the scope it is
/// nested in; name resolution walks that chain outwards.
pub struct Scope {
  typ: ScopeType,
  bindings: RefCell<HashMap<String, Binding>>,
  parent: Option<Rc<Scope>>,
}

impl Scope {
  pub fn new_global() -> Rc<Scope> {
    Rc::new(Scope {
      typ: ScopeType::Global,
      bindings: RefCell::default(),
      parent: None,
    })
  }

  pub fn new_child(parent: &Rc<Scope>, typ: ScopeType) -> Rc<Scope> {
    debug_assert!(typ != ScopeType::Global);
    Rc::new(Scope {
      typ,
      bindings: RefCell::default(),
      parent: Some(parent.clone()),
    })
  }

  pub fn typ(&self) -> ScopeType {
    self.typ
  }

  /// The nearest enclosing scope that `var` declarations are hoisted to.
  pub fn closure_scope(self: &Rc<Self>) -> Rc<Scope> {
    let mut scope = self;
    while !matches!(scope.typ, ScopeType::Global | ScopeType::Function) {
      match &scope.parent {
        Some(parent) => scope = parent,
        None => break,
      }
    }
    scope.clone()
  }

  pub fn has_own_binding(&self, name: &str) -> bool {
    self.bindings.borrow().contains_key(name)
  }

  /// A copy of a binding declared directly in this scope.
  pub fn own_binding(&self, name: &str) -> Option<Binding> {
    self.bindings.borrow().get(name).cloned()
  }

  /// Names declared directly in this scope, sorted.
  pub fn own_names(&self) -> Vec<String> {
    let mut names: Vec<_> = self.bindings.borrow().keys().cloned().collect();
    names.sort();
    names
  }

  /// Creates a binding in this scope.
  ///
  /// Lexical bindings start uninitialized; everything else starts as `undefined`. Redeclaring a
  /// `var` (or a `var` over a parameter or function) keeps the existing binding and value.
  /// Returns whether a new binding was created.
  pub fn declare(&self, name: &str, kind: BindingKind) -> Result<bool, VmError> {
    let mut bindings = self.bindings.borrow_mut();
    if let Some(existing) = bindings.get_mut(name) {
      if kind.is_lexical() || existing.kind.is_lexical() {
        return Err(VmError::DuplicateDeclaration {
          name: name.to_string(),
        });
      }
      if kind == BindingKind::Function {
        existing.kind = BindingKind::Function;
      }
      return Ok(false);
    }
    let slot = if kind.is_lexical() {
      Slot::Uninitialized
    } else {
      Slot::Value(Value::Undefined)
    };
    tracing::trace!(name, ?kind, scope = ?self.typ, "declare binding");
    bindings.insert(name.to_string(), Binding { kind, slot });
    Ok(true)
  }

  /// Gives a binding declared in this scope its value, ending its temporal dead zone. Used when the
  /// declaration itself executes, so `const` bindings can be initialized here.
  pub fn initialize(&self, name: &str, value: Value) -> Result<(), VmError> {
    let mut bindings = self.bindings.borrow_mut();
    let binding = bindings
      .get_mut(name)
      .ok_or_else(|| VmError::Undeclared {
        name: name.to_string(),
      })?;
    binding.slot = Slot::Value(value);
    Ok(())
  }

  /// Reads `name`, resolving outwards through enclosing scopes.
  pub fn get(&self, name: &str) -> Result<Value, VmError> {
    let mut scope = Some(self);
    while let Some(s) = scope {
      if let Some(binding) = s.bindings.borrow().get(name) {
        return match &binding.slot {
          Slot::Uninitialized => Err(VmError::UninitializedAccess {
            name: name.to_string(),
          }),
          Slot::Value(v) => Ok(v.clone()),
        };
      }
      scope = s.parent.as_deref();
    }
    Err(VmError::Undeclared {
      name: name.to_string(),
    })
  }

  /// Assigns to an existing, initialized, mutable binding found by resolving outwards.
  pub fn set(&self, name: &str, value: Value) -> Result<(), VmError> {
    let mut scope = Some(self);
    while let Some(s) = scope {
      if let Some(binding) = s.bindings.borrow_mut().get_mut(name) {
        if matches!(binding.slot, Slot::Uninitialized) {
          return Err(VmError::UninitializedAccess {
            name: name.to_string(),
          });
        }
        if !binding.kind.is_mutable() {
          return Err(VmError::AssignToConst {
            name: name.to_string(),
          });
        }
        binding.slot = Slot::Value(value);
        return Ok(());
      }
      scope = s.parent.as_deref();
    }
    Err(VmError::Undeclared {
      name: name.to_string(),
    })
  }

  /// Drops every binding. Closures stored in a scope they captured form a reference cycle; the
  /// runtime clears its global scope on drop to break it.
  pub fn clear(&self) {
    self.bindings.borrow_mut().clear();
  }
}

impl Debug for Scope {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("Scope")
      .field("typ", &self.typ)
      .field("names", &self.own_names())
      .field("parent", &self.parent.as_ref().map(|p| p.typ))
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::BindingKind;
  use super::Scope;
  use super::ScopeType;
  use crate::error::VmError;
  use crate::value::Value;

  #[test]
  fn test_var_starts_undefined_and_let_starts_uninitialized() {
    let global = Scope::new_global();
    global.declare("v", BindingKind::Var).unwrap();
    global.declare("l", BindingKind::Let).unwrap();
    assert_eq!(global.get("v").unwrap(), Value::Undefined);
    assert_eq!(global.get("l"), Err(VmError::UninitializedAccess {
      name: "l".into()
    }));
  }

  #[test]
  fn test_inner_binding_shadows_outer() {
    let global = Scope::new_global();
    global.declare("x", BindingKind::Const).unwrap();
    global.initialize("x", Value::Number(1.0)).unwrap();
    let block = Scope::new_child(&global, ScopeType::Block);
    block.declare("x", BindingKind::Let).unwrap();
    block.initialize("x", Value::Number(2.0)).unwrap();
    block.set("x", Value::Number(3.0)).unwrap();
    assert_eq!(block.get("x").unwrap(), Value::Number(3.0));
    drop(block);
    assert_eq!(global.get("x").unwrap(), Value::Number(1.0));
  }

  #[test]
  fn test_set_resolves_outwards_and_respects_const() {
    let global = Scope::new_global();
    global.declare("c", BindingKind::Const).unwrap();
    global.initialize("c", Value::Number(1.0)).unwrap();
    global.declare("v", BindingKind::Var).unwrap();
    let block = Scope::new_child(&global, ScopeType::Block);
    block.set("v", Value::Number(5.0)).unwrap();
    assert_eq!(global.get("v").unwrap(), Value::Number(5.0));
    assert!(matches!(
      block.set("c", Value::Number(2.0)),
      Err(VmError::AssignToConst { .. })
    ));
    assert!(matches!(
      block.set("nope", Value::Undefined),
      Err(VmError::Undeclared { .. })
    ));
  }

  #[test]
  fn test_redeclaration_rules() {
    let global = Scope::new_global();
    assert!(global.declare("a", BindingKind::Var).unwrap());
    assert!(!global.declare("a", BindingKind::Var).unwrap());
    assert!(global.declare("a", BindingKind::Let).is_err());
    global.declare("b", BindingKind::Let).unwrap();
    assert!(global.declare("b", BindingKind::Var).is_err());
    assert!(!global.declare("a", BindingKind::Function).unwrap());
    assert_eq!(global.own_binding("a").unwrap().kind, BindingKind::Function);
  }

  #[test]
  fn test_closure_scope_skips_blocks() {
    let global = Scope::new_global();
    let func = Scope::new_child(&global, ScopeType::Function);
    let block = Scope::new_child(&func, ScopeType::Block);
    let inner = Scope::new_child(&block, ScopeType::Block);
    assert_eq!(inner.closure_scope().typ(), ScopeType::Function);
    assert_eq!(global.closure_scope().typ(), ScopeType::Global);
  }
}
