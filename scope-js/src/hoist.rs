//! Declaration collection for scope entry.
//!
//! Before a function body, script, or block runs, every name it declares is created up front:
//! - `var` names anywhere in the body (through nested blocks, but not nested functions) become
//!   function-scoped bindings holding `undefined`;
//! - `let`/`const` names directly in the statement list become uninitialized bindings;
//! - function declarations directly in the statement list are bound to their closures.

use crate::ast::FuncDecl;
use crate::ast::Node;
use crate::ast::Stmt;
use crate::ast::VarDeclMode;
use crate::env::BindingKind;

/// Names declared with `var` in `stmts`, in source order and without duplicates.
pub fn var_names(stmts: &[Node<Stmt>]) -> Vec<String> {
  let mut out = Vec::new();
  for stmt in stmts {
    collect_var_names(stmt, &mut out);
  }
  out
}

fn collect_var_names(stmt: &Node<Stmt>, out: &mut Vec<String>) {
  match &*stmt.stx {
    Stmt::VarDecl(decl) if decl.mode == VarDeclMode::Var => {
      for d in &decl.declarators {
        if !out.contains(&d.name) {
          out.push(d.name.clone());
        }
      }
    }
    Stmt::Block(block) => {
      for stmt in &block.body {
        collect_var_names(stmt, out);
      }
    }
    // Nested functions own their `var`s.
    Stmt::FunctionDecl(_) => {}
    Stmt::VarDecl(_) | Stmt::Empty(_) | Stmt::Expr(_) | Stmt::Return(_) => {}
  }
}

/// `let`/`const` declarations directly in `stmts`.
pub fn lexical_decls(stmts: &[Node<Stmt>]) -> Vec<(String, BindingKind)> {
  let mut out = Vec::new();
  for stmt in stmts {
    let Stmt::VarDecl(decl) = &*stmt.stx else {
      continue;
    };
    let kind = match decl.mode {
      VarDeclMode::Const => BindingKind::Const,
      VarDeclMode::Let => BindingKind::Let,
      VarDeclMode::Var => continue,
    };
    for d in &decl.declarators {
      out.push((d.name.clone(), kind));
    }
  }
  out
}

/// Function declarations directly in `stmts`. A later declaration of the same name wins when
/// instantiated in order.
pub fn function_decls(stmts: &[Node<Stmt>]) -> Vec<&FuncDecl> {
  stmts
    .iter()
    .filter_map(|stmt| match &*stmt.stx {
      Stmt::FunctionDecl(decl) => Some(decl),
      _ => None,
    })
    .collect()
}
