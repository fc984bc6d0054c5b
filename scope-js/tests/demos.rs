use scope_js::demos;
use scope_js::demos::Demo;
use scope_js::{JsRuntime, Value, Vm, VmError, VmOptions};

#[test]
fn scope_demos_return_expected_values() {
  assert_eq!(demos::add2numbers().unwrap(), Value::Number(30.0));
  assert_eq!(demos::let_add2numbers().unwrap(), Value::Number(20.0));
  assert_eq!(demos::scope_add2numbers().unwrap(), Value::Number(30.0));
}

#[test]
fn hoisted_var_demo_is_nan_not_an_error() {
  let value = demos::valid_fun_add2numbers().unwrap();
  assert!(value.is_nan());
}

#[test]
fn disabled_demo_fails_with_uninitialized_access() {
  let demo = Demo::find("funAdd2numbers").unwrap();
  assert!(!demo.enabled);
  assert_eq!(demos::fun_add2numbers().unwrap_err(), VmError::UninitializedAccess {
    name: "n2".into()
  });
}

#[test]
fn default_run_excludes_disabled_demos() {
  let outcomes = demos::run_default(&VmOptions::default());
  assert!(outcomes.iter().all(|o| o.demo.enabled));
  assert!(outcomes.iter().all(|o| o.is_ok()));
  assert!(!outcomes.iter().any(|o| o.demo.name == "funAdd2numbers"));
  assert_eq!(outcomes.len(), demos::DEMOS.len() - 1);
}

#[test]
fn full_run_includes_the_negative_case() {
  let outcomes = demos::run_all(&VmOptions::default());
  assert_eq!(outcomes.len(), demos::DEMOS.len());
  let failed: Vec<_> = outcomes
    .iter()
    .filter(|o| !o.is_ok())
    .map(|o| o.demo.name)
    .collect();
  assert_eq!(failed, vec!["funAdd2numbers"]);
}

#[test]
fn sum_demos_add_one_two_three() {
  for name in ["sum", "seededSum"] {
    let value = Demo::find(name).unwrap().run(&VmOptions::default()).unwrap();
    assert_eq!(value, Value::Number(6.0), "{name}");
  }
}

#[test]
fn reports_render_values_as_text() {
  let outcomes = demos::run_all(&VmOptions::default());
  let reports: Vec<_> = outcomes.iter().map(|o| o.report()).collect();
  let json = serde_json::to_value(&reports).unwrap();
  let valid = json
    .as_array()
    .unwrap()
    .iter()
    .find(|r| r["name"] == "validFunAdd2numbers")
    .unwrap();
  assert_eq!(valid["value"], "NaN");
  assert!(valid.get("error").is_none());

  let disabled = json
    .as_array()
    .unwrap()
    .iter()
    .find(|r| r["name"] == "funAdd2numbers")
    .unwrap();
  assert_eq!(disabled["enabled"], false);
  assert_eq!(
    disabled["error"],
    "cannot access 'n2' before initialization"
  );
}

#[test]
fn demos_respect_vm_options() {
  let options = VmOptions {
    default_fuel: Some(5),
    ..VmOptions::default()
  };
  assert!(matches!(
    Demo::find("add2numbers").unwrap().run(&options),
    Err(VmError::Termination(_))
  ));
}

#[test]
fn scopes_script_runs_all_load_time_calls() {
  let mut rt = JsRuntime::new(Vm::new(VmOptions::default())).unwrap();
  // The last load-time call is `scopeAdd2numbers()`.
  let value = rt.exec_script(demos::SCOPES_SOURCE).unwrap();
  assert_eq!(value, Value::Number(30.0));
  assert_eq!(
    rt.call_global("add2numbers", &[]).unwrap(),
    Value::Number(30.0)
  );
  assert_eq!(
    rt.call_global("letAdd2numbers", &[]).unwrap(),
    Value::Number(20.0)
  );
  assert!(rt.call_global("validFunAdd2numbers", &[]).unwrap().is_nan());
  assert!(matches!(
    rt.call_global("funAdd2numbers", &[]),
    Err(VmError::Undeclared { .. })
  ));
}

#[test]
fn hoisted_var_demo_intermediate_result_is_nan() {
  let variant = demos::SCOPES_SOURCE.replace(
    "  var n2;\n  return n1 + n2;",
    "  var n2;\n  return result;",
  );
  assert_ne!(variant, demos::SCOPES_SOURCE);
  let mut rt = JsRuntime::new(Vm::new(VmOptions::default())).unwrap();
  rt.exec_script(&variant).unwrap();
  assert!(rt.call_global("validFunAdd2numbers", &[]).unwrap().is_nan());
}

#[test]
fn named_demo_functions_match_registry() {
  assert_eq!(Demo::find("scopeAdd2numbers").unwrap().function, "scopeAdd2numbers");
  assert!(Demo::find("noSuchDemo").is_none());
  assert_eq!(
    Demo::find("add2numbers").unwrap().run(&VmOptions::default()),
    demos::add2numbers()
  );
}
