use proptest::prelude::*;
use scope_js::demos::script_seeded_sum;
use scope_js::demos::script_sum;
use scope_js::sum::seeded_sum;
use scope_js::sum::sum;
use scope_js::{JsRuntime, Value, Vm, VmError, VmOptions};

fn new_runtime() -> JsRuntime {
  JsRuntime::new(Vm::new(VmOptions::default())).unwrap()
}

// Lowercase alphanumerics only, so generated names never collide with the `outer_`/`seen_` helpers.
fn arb_name() -> impl Strategy<Value = String> {
  "[a-z][a-z0-9]{0,6}".prop_filter("reserved word", |s| {
    !matches!(
      s.as_str(),
      "const" | "let" | "var" | "function" | "return" | "undefined"
    )
  })
}

fn arb_lexical() -> impl Strategy<Value = &'static str> {
  prop_oneof![Just("let"), Just("const")]
}

proptest! {
  #[test]
  fn inner_block_never_alters_outer_binding(
    name in arb_name(),
    outer_kind in arb_lexical(),
    outer in 0u32..10_000,
    inner in 0u32..10_000,
    bump in 1u32..100,
  ) {
    let mut rt = new_runtime();
    let src = format!(
      "function outer_() {{
        {outer_kind} {name} = {outer};
        let seen_before_ = {name};
        {{ let {name} = {inner}; {name} = {name} + {bump}; }}
        return {name} - seen_before_;
      }}
      outer_()"
    );
    prop_assert_eq!(rt.exec_script(&src).unwrap(), Value::Number(0.0));
  }

  #[test]
  fn var_read_before_declaration_is_undefined(name in arb_name(), v in 0u32..10_000) {
    let mut rt = new_runtime();
    let src = format!(
      "function outer_() {{ let seen_ = {name}; var {name} = {v}; return seen_; }} outer_()"
    );
    prop_assert_eq!(rt.exec_script(&src).unwrap(), Value::Undefined);
  }

  #[test]
  fn lexical_read_before_declaration_fails(
    name in arb_name(),
    kind in arb_lexical(),
    v in 0u32..10_000,
  ) {
    let mut rt = new_runtime();
    let src = format!(
      "function outer_() {{ let seen_ = {name}; {kind} {name} = {v}; return seen_; }} outer_()"
    );
    prop_assert_eq!(
      rt.exec_script(&src).unwrap_err(),
      VmError::UninitializedAccess { name }
    );
  }

  #[test]
  fn script_and_native_sums_agree(values in prop::collection::vec(0u32..1_000, 0..12)) {
    let values: Vec<f64> = values.into_iter().map(f64::from).collect();
    prop_assert_eq!(script_sum(&values), sum(&values));
    prop_assert_eq!(script_seeded_sum(&values).unwrap(), seeded_sum(&values));
  }
}
