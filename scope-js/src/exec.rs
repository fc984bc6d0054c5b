use crate::ast::BinaryExpr;
use crate::ast::BinaryOperator;
use crate::ast::BlockStmt;
use crate::ast::CallExpr;
use crate::ast::Expr;
use crate::ast::Func;
use crate::ast::FuncExpr;
use crate::ast::Node;
use crate::ast::ReturnStmt;
use crate::ast::Stmt;
use crate::ast::UnaryExpr;
use crate::ast::UnaryOperator;
use crate::ast::VarDecl;
use crate::ast::VarDeclMode;
use crate::env::BindingKind;
use crate::env::Scope;
use crate::env::ScopeType;
use crate::error::VmError;
use crate::function::Closure;
use crate::hoist;
use crate::parse;
use crate::value::Value;
use crate::vm::StackFrame;
use crate::vm::Vm;
use std::rc::Rc;

/// A statement completion record.
///
/// The "empty" completion value is modelled explicitly as `None` so statement-list evaluation can
/// implement `UpdateEmpty` (e.g. `1; {}` evaluates to `1`).
#[derive(Clone, Debug, PartialEq)]
pub enum Completion {
  Normal(Option<Value>),
  Return(Value),
}

impl Completion {
  pub fn empty() -> Self {
    Completion::Normal(None)
  }

  pub fn normal(value: Value) -> Self {
    Completion::Normal(Some(value))
  }

  /// Implements `UpdateEmpty(completion, value)`.
  pub fn update_empty(self, value: Option<Value>) -> Self {
    match self {
      Completion::Normal(None) => Completion::Normal(value),
      other => other,
    }
  }
}

/// An AST-interpreting runtime. Each runtime owns one global scope; scripts executed on the same
/// runtime share it, like consecutive `<script>` elements on a page.
pub struct JsRuntime {
  pub vm: Vm,
  global: Rc<Scope>,
}

impl JsRuntime {
  pub fn new(vm: Vm) -> Result<Self, VmError> {
    let global = Scope::new_global();
    for (name, value) in [
      ("undefined", Value::Undefined),
      ("NaN", Value::Number(f64::NAN)),
      ("Infinity", Value::Number(f64::INFINITY)),
    ] {
      global.declare(name, BindingKind::Const)?;
      global.initialize(name, value)?;
    }
    Ok(Self { vm, global })
  }

  pub fn global(&self) -> &Rc<Scope> {
    &self.global
  }

  /// Parses and executes a script in the global scope, returning its completion value (the value
  /// of the last expression statement that produced one).
  pub fn exec_script(&mut self, source: &str) -> Result<Value, VmError> {
    tracing::debug!(bytes = source.len(), "exec script");
    let top = parse(source)?;
    let global = self.global.clone();
    let mut evaluator = Evaluator { vm: &mut self.vm };
    evaluator.instantiate_declarations(&global, &top.stx.body, true)?;
    match evaluator.eval_stmt_list(&global, &top.stx.body)? {
      Completion::Normal(v) => Ok(v.unwrap_or(Value::Undefined)),
      Completion::Return(_) => Err(VmError::Unimplemented("return outside of function")),
    }
  }

  /// Calls a function value with the given arguments.
  pub fn call(&mut self, callee: &Value, args: &[Value]) -> Result<Value, VmError> {
    let mut evaluator = Evaluator { vm: &mut self.vm };
    evaluator.call(callee, args, None)
  }

  /// Looks up `name` in the global scope and calls it.
  pub fn call_global(&mut self, name: &str, args: &[Value]) -> Result<Value, VmError> {
    let callee = self.global.get(name)?;
    let mut evaluator = Evaluator { vm: &mut self.vm };
    evaluator.call(&callee, args, Some(name))
  }
}

impl Drop for JsRuntime {
  fn drop(&mut self) {
    // Global function declarations capture the global scope that holds them.
    self.global.clear();
  }
}

struct Evaluator<'a> {
  vm: &'a mut Vm,
}

impl<'a> Evaluator<'a> {
  /// Charges one tick per statement and one per expression.
  #[inline]
  fn tick(&mut self) -> Result<(), VmError> {
    self.vm.tick()
  }

  /// Creates the bindings a scope needs before its first statement runs. `hoist_vars` is set for
  /// function bodies and scripts, where `var` declarations land.
  fn instantiate_declarations(
    &mut self,
    scope: &Rc<Scope>,
    stmts: &[Node<Stmt>],
    hoist_vars: bool,
  ) -> Result<(), VmError> {
    if hoist_vars {
      for name in hoist::var_names(stmts) {
        scope.declare(&name, BindingKind::Var)?;
      }
    }
    for (name, kind) in hoist::lexical_decls(stmts) {
      scope.declare(&name, kind)?;
    }
    for decl in hoist::function_decls(stmts) {
      scope.declare(&decl.name, BindingKind::Function)?;
      let closure = Closure::new(Some(decl.name.clone()), decl.function.clone(), scope.clone());
      scope.initialize(&decl.name, Value::Function(Rc::new(closure)))?;
    }
    Ok(())
  }

  fn call(&mut self, callee: &Value, args: &[Value], callee_name: Option<&str>) -> Result<Value, VmError> {
    let Value::Function(closure) = callee else {
      return Err(VmError::NotCallable(
        callee_name.unwrap_or(callee.type_name()).to_string(),
      ));
    };
    self.call_closure(closure, args)
  }

  fn call_closure(&mut self, closure: &Rc<Closure>, args: &[Value]) -> Result<Value, VmError> {
    self.vm.push_frame(StackFrame {
      function: closure.name().map(str::to_string),
    })?;
    tracing::trace!(function = closure.name(), argc = args.len(), "call");
    let result = self.eval_function_body(closure, args);
    self.vm.pop_frame();
    tracing::trace!(function = closure.name(), ok = result.is_ok(), "return");
    result
  }

  fn eval_function_body(&mut self, closure: &Rc<Closure>, args: &[Value]) -> Result<Value, VmError> {
    let func: &Func = closure.func();
    let scope = Scope::new_child(closure.env(), ScopeType::Function);
    for (i, param) in func.parameters.iter().enumerate() {
      let value = if param.rest {
        Value::Array(args.get(i..).unwrap_or_default().to_vec().into())
      } else {
        args.get(i).cloned().unwrap_or(Value::Undefined)
      };
      scope.declare(&param.name, BindingKind::Param)?;
      scope.initialize(&param.name, value)?;
    }
    // A `var` with a parameter's name reuses the parameter binding and keeps its value.
    self.instantiate_declarations(&scope, &func.body, true)?;
    match self.eval_stmt_list(&scope, &func.body)? {
      Completion::Return(v) => Ok(v),
      Completion::Normal(_) => Ok(Value::Undefined),
    }
  }

  fn eval_stmt_list(&mut self, scope: &Rc<Scope>, stmts: &[Node<Stmt>]) -> Result<Completion, VmError> {
    let mut last_value: Option<Value> = None;
    for stmt in stmts {
      let completion = self.eval_stmt(scope, stmt)?.update_empty(last_value.take());
      match completion {
        Completion::Normal(v) => last_value = v,
        abrupt => return Ok(abrupt),
      }
    }
    Ok(Completion::Normal(last_value))
  }

  fn eval_stmt(&mut self, scope: &Rc<Scope>, stmt: &Node<Stmt>) -> Result<Completion, VmError> {
    self.tick()?;

    match &*stmt.stx {
      Stmt::Empty(_) => Ok(Completion::empty()),
      Stmt::Expr(stmt) => Ok(Completion::normal(self.eval_expr(scope, &stmt.expr)?)),
      Stmt::VarDecl(decl) => self.eval_var_decl(scope, decl),
      // Already bound when the enclosing scope was entered.
      Stmt::FunctionDecl(_) => Ok(Completion::empty()),
      Stmt::Block(block) => self.eval_block_stmt(scope, block),
      Stmt::Return(stmt) => self.eval_return(scope, stmt),
    }
  }

  fn eval_block_stmt(&mut self, scope: &Rc<Scope>, block: &BlockStmt) -> Result<Completion, VmError> {
    let block_scope = Scope::new_child(scope, ScopeType::Block);
    self.instantiate_declarations(&block_scope, &block.body, false)?;
    self.eval_stmt_list(&block_scope, &block.body)
  }

  fn eval_var_decl(&mut self, scope: &Rc<Scope>, decl: &VarDecl) -> Result<Completion, VmError> {
    match decl.mode {
      VarDeclMode::Var => {
        // The binding already exists (holding `undefined`) from function entry; a declarator
        // without an initializer does nothing.
        for declarator in &decl.declarators {
          let Some(init) = &declarator.initializer else {
            continue;
          };
          let value = self.eval_expr(scope, init)?;
          scope.closure_scope().initialize(&declarator.name, value)?;
        }
      }
      VarDeclMode::Let | VarDeclMode::Const => {
        for declarator in &decl.declarators {
          let value = match &declarator.initializer {
            Some(init) => self.eval_expr(scope, init)?,
            None => Value::Undefined,
          };
          scope.initialize(&declarator.name, value)?;
        }
      }
    }
    Ok(Completion::empty())
  }

  fn eval_return(&mut self, scope: &Rc<Scope>, stmt: &ReturnStmt) -> Result<Completion, VmError> {
    let value = match &stmt.value {
      Some(expr) => self.eval_expr(scope, expr)?,
      None => Value::Undefined,
    };
    Ok(Completion::Return(value))
  }

  fn eval_expr(&mut self, scope: &Rc<Scope>, expr: &Node<Expr>) -> Result<Value, VmError> {
    self.tick()?;

    match &*expr.stx {
      Expr::LitNum(lit) => Ok(Value::Number(lit.value)),
      Expr::Id(id) => scope.get(&id.name),
      Expr::Array(array) => {
        let mut items = Vec::with_capacity(array.elements.len());
        for element in &array.elements {
          items.push(self.eval_expr(scope, element)?);
        }
        Ok(Value::Array(items.into()))
      }
      Expr::Func(func) => self.eval_func_expr(scope, func),
      Expr::Unary(unary) => self.eval_unary(scope, unary),
      Expr::Binary(binary) => self.eval_binary(scope, binary),
      Expr::Assign(assign) => {
        let value = self.eval_expr(scope, &assign.value)?;
        scope.set(&assign.target, value.clone())?;
        Ok(value)
      }
      Expr::Call(call) => self.eval_call(scope, call),
      Expr::Member(member) => {
        let object = self.eval_expr(scope, &member.object)?;
        get_property(&object, &member.property)
      }
    }
  }

  fn eval_func_expr(&mut self, scope: &Rc<Scope>, func: &FuncExpr) -> Result<Value, VmError> {
    let Some(name) = &func.name else {
      let closure = Closure::new(None, func.function.clone(), scope.clone());
      return Ok(Value::Function(Rc::new(closure)));
    };
    // The name of a named function expression is bound in its own scope between the function and
    // the surrounding code, so it is visible inside the function only.
    let name_scope = Scope::new_child(scope, ScopeType::FunctionName);
    name_scope.declare(name, BindingKind::Function)?;
    let closure = Closure::new(Some(name.clone()), func.function.clone(), name_scope.clone());
    let value = Value::Function(Rc::new(closure));
    name_scope.initialize(name, value.clone())?;
    Ok(value)
  }

  fn eval_unary(&mut self, scope: &Rc<Scope>, expr: &UnaryExpr) -> Result<Value, VmError> {
    let n = self.eval_expr(scope, &expr.argument)?.to_number()?;
    Ok(Value::Number(match expr.operator {
      UnaryOperator::Negation => -n,
      UnaryOperator::Plus => n,
    }))
  }

  fn eval_binary(&mut self, scope: &Rc<Scope>, expr: &BinaryExpr) -> Result<Value, VmError> {
    let left = self.eval_expr(scope, &expr.left)?;
    let right = self.eval_expr(scope, &expr.right)?;
    let (l, r) = (left.to_number()?, right.to_number()?);
    Ok(Value::Number(match expr.operator {
      BinaryOperator::Addition => l + r,
      BinaryOperator::Subtraction => l - r,
      BinaryOperator::Multiplication => l * r,
      BinaryOperator::Division => l / r,
      // f64 `%` truncates like ECMAScript's remainder (sign follows the dividend).
      BinaryOperator::Remainder => l % r,
    }))
  }

  fn eval_args(&mut self, scope: &Rc<Scope>, args: &[Node<Expr>]) -> Result<Vec<Value>, VmError> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
      values.push(self.eval_expr(scope, arg)?);
    }
    Ok(values)
  }

  fn eval_call(&mut self, scope: &Rc<Scope>, call: &CallExpr) -> Result<Value, VmError> {
    if let Expr::Member(member) = &*call.callee.stx {
      let receiver = self.eval_expr(scope, &member.object)?;
      let args = self.eval_args(scope, &call.arguments)?;
      return self.call_method(&receiver, &member.property, &args);
    }
    let callee = self.eval_expr(scope, &call.callee)?;
    let args = self.eval_args(scope, &call.arguments)?;
    let callee_name = match &*call.callee.stx {
      Expr::Id(id) => Some(id.name.as_str()),
      _ => None,
    };
    self.call(&callee, &args, callee_name)
  }

  fn call_method(&mut self, receiver: &Value, name: &str, args: &[Value]) -> Result<Value, VmError> {
    match (receiver, name) {
      (Value::Array(items), "reduce") => self.array_reduce(items, args),
      _ => {
        let method = get_property(receiver, name)?;
        let label = format!("{}.{name}", receiver.type_name());
        self.call(&method, args, Some(label.as_str()))
      }
    }
  }

  /// `Array.prototype.reduce`. Without a seed the first element starts the accumulator and an
  /// empty array is an error; with a seed (even an explicit `undefined`) the seed starts it.
  fn array_reduce(&mut self, items: &Rc<[Value]>, args: &[Value]) -> Result<Value, VmError> {
    let callback = match args.first() {
      Some(Value::Function(closure)) => closure.clone(),
      Some(other) => return Err(VmError::NotCallable(other.type_name().to_string())),
      None => return Err(VmError::NotCallable("undefined".to_string())),
    };
    let mut rest = items.iter().enumerate();
    let mut acc = match args.get(1) {
      Some(seed) => seed.clone(),
      None => match rest.next() {
        Some((_, first)) => first.clone(),
        None => return Err(VmError::EmptySequenceReduction),
      },
    };
    for (i, cur) in rest {
      acc = self.call_closure(&callback, &[
        acc,
        cur.clone(),
        Value::Number(i as f64),
        Value::Array(items.clone()),
      ])?;
    }
    Ok(acc)
  }
}

fn get_property(object: &Value, name: &str) -> Result<Value, VmError> {
  Ok(match (object, name) {
    (Value::Undefined, _) => {
      return Err(VmError::TypeError(format!(
        "cannot read properties of undefined (reading '{name}')"
      )))
    }
    (Value::Array(items), "length") => Value::Number(items.len() as f64),
    (Value::Function(closure), "length") => Value::Number(closure.length() as f64),
    _ => Value::Undefined,
  })
}
