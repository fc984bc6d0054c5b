use crate::ast::BinaryOperator;
use crate::ast::Expr;
use crate::ast::Stmt;
use crate::ast::VarDeclMode;
use crate::error::SyntaxErrorType;
use crate::parse;

fn first_expr(source: &str) -> Expr {
  let mut top = parse(source).unwrap();
  let stmt = top.stx.body.remove(0);
  match *stmt.stx {
    Stmt::Expr(e) => *e.expr.stx,
    other => panic!("expected expression statement, got {other:?}"),
  }
}

fn syntax_error(source: &str) -> SyntaxErrorType {
  parse(source).unwrap_err().typ
}

#[test]
fn test_parse_var_decl_modes() {
  let top = parse("const a = 1; let b, c = 2; var d").unwrap();
  let modes: Vec<_> = top
    .stx
    .body
    .iter()
    .map(|s| match &*s.stx {
      Stmt::VarDecl(d) => (d.mode, d.declarators.len()),
      other => panic!("unexpected {other:?}"),
    })
    .collect();
  assert_eq!(modes, vec![
    (VarDeclMode::Const, 1),
    (VarDeclMode::Let, 2),
    (VarDeclMode::Var, 1),
  ]);
}

#[test]
fn test_parse_precedence() {
  let Expr::Binary(add) = first_expr("1 + 2 * 3") else {
    panic!("expected binary");
  };
  assert_eq!(add.operator, BinaryOperator::Addition);
  let Expr::Binary(mul) = &*add.right.stx else {
    panic!("expected binary on the right");
  };
  assert_eq!(mul.operator, BinaryOperator::Multiplication);
}

#[test]
fn test_parse_left_associative() {
  let Expr::Binary(sub) = first_expr("5 - 2 - 1") else {
    panic!("expected binary");
  };
  assert!(matches!(&*sub.left.stx, Expr::Binary(_)));
  assert!(matches!(&*sub.right.stx, Expr::LitNum(n) if n.value == 1.0));
}

#[test]
fn test_parse_iife_with_rest_param() {
  let Expr::Call(call) = first_expr("(function (...args) { return args; })()") else {
    panic!("expected call");
  };
  let Expr::Func(func) = &*call.callee.stx else {
    panic!("expected function expression callee");
  };
  assert!(func.name.is_none());
  assert_eq!(func.function.parameters.len(), 1);
  assert!(func.function.parameters[0].rest);
  assert!(call.arguments.is_empty());
}

#[test]
fn test_parse_member_call() {
  let Expr::Call(call) = first_expr("args.reduce(f, 0)") else {
    panic!("expected call");
  };
  let Expr::Member(member) = &*call.callee.stx else {
    panic!("expected member callee");
  };
  assert_eq!(member.property, "reduce");
  assert_eq!(call.arguments.len(), 2);
}

#[test]
fn test_parse_nested_block_and_function_decl() {
  let top = parse("function f() { const a = 1; { const a = 2; } return a; }").unwrap();
  let Stmt::FunctionDecl(decl) = &*top.stx.body[0].stx else {
    panic!("expected function declaration");
  };
  assert_eq!(decl.name, "f");
  assert_eq!(decl.function.body.len(), 3);
  assert!(matches!(&*decl.function.body[1].stx, Stmt::Block(_)));
}

#[test]
fn test_parse_asi() {
  assert!(parse("let a = 1\nlet b = 2\na + b").is_ok());
  assert!(parse("{ a }").is_ok());
  assert_eq!(
    syntax_error("let a = 1 let b = 2"),
    SyntaxErrorType::ExpectedSyntax("`;` or line terminator")
  );
}

#[test]
fn test_parse_return_without_value_before_newline() {
  let top = parse("function f() { return\n1 }").unwrap();
  let Stmt::FunctionDecl(decl) = &*top.stx.body[0].stx else {
    panic!("expected function declaration");
  };
  let Stmt::Return(ret) = &*decl.function.body[0].stx else {
    panic!("expected return");
  };
  assert!(ret.value.is_none());
}

#[test]
fn test_parse_errors() {
  assert_eq!(syntax_error("const a;"), SyntaxErrorType::ConstWithoutInitializer);
  assert_eq!(syntax_error("1 = 2"), SyntaxErrorType::InvalidAssigmentTarget);
  assert_eq!(syntax_error("function f(...a, b) {}"), SyntaxErrorType::RestParameterNotLast);
  assert_eq!(syntax_error("let a = 1e;"), SyntaxErrorType::MalformedLiteralNumber);
  assert_eq!(syntax_error("/* open"), SyntaxErrorType::UnterminatedComment);
  assert_eq!(syntax_error("{ let a = 1;"), SyntaxErrorType::UnexpectedEnd);
  assert_eq!(syntax_error("let = 1"), SyntaxErrorType::RequiredTokenNotFound(crate::token::TT::Identifier));
}

#[test]
fn test_parse_locations() {
  let top = parse("let a = 1;\nfoo(a)").unwrap();
  let second = &top.stx.body[1];
  assert_eq!(second.loc.0, 11);
  assert_eq!(second.loc.1, 17);
}

#[test]
fn test_deep_nesting_is_a_syntax_error() {
  let parens = format!("{}1{}", "(".repeat(2000), ")".repeat(2000));
  assert_eq!(syntax_error(&parens), SyntaxErrorType::NestingTooDeep);

  let blocks = format!("{}{}", "{".repeat(2000), "}".repeat(2000));
  assert_eq!(syntax_error(&blocks), SyntaxErrorType::NestingTooDeep);

  let negations = format!("{}1", "-".repeat(2000));
  assert_eq!(syntax_error(&negations), SyntaxErrorType::NestingTooDeep);

  let sum = format!("1{}", " + 1".repeat(2000));
  assert_eq!(syntax_error(&sum), SyntaxErrorType::NestingTooDeep);

  let calls = format!("f{}", "()".repeat(2000));
  assert_eq!(syntax_error(&calls), SyntaxErrorType::NestingTooDeep);

  let assignments = format!("{}1", "a = ".repeat(2000));
  assert_eq!(syntax_error(&assignments), SyntaxErrorType::NestingTooDeep);
}

#[test]
fn test_moderate_nesting_parses() {
  let parens = format!("{}1{}", "(".repeat(100), ")".repeat(100));
  assert!(matches!(first_expr(&parens), Expr::LitNum(_)));

  let blocks = format!("{}{}", "{".repeat(100), "}".repeat(100));
  assert!(parse(&blocks).is_ok());

  let sum = format!("1{}", " + 1".repeat(100));
  assert!(matches!(first_expr(&sum), Expr::Binary(_)));
}
