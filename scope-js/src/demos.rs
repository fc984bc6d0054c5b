//! The scoping, hoisting and summation demonstrations, as scripts run on a fresh [`JsRuntime`].

use crate::error::VmError;
use crate::exec::JsRuntime;
use crate::value::Value;
use crate::vm::Vm;
use crate::vm::VmOptions;
use serde::Serialize;

/// Four functions, each showing one scoping rule, invoked once when the script loads.
pub const SCOPES_SOURCE: &str = r#"function add2numbers() {
  const n1 = 10;
  const n2 = 20;

  return n1 + n2;
}

function letAdd2numbers() {
  let n1 = 10;
  let n2 = 10;

  return n1 + n2;
}

// `n2` is a `var`, so it exists (as undefined) from the top of the function.
function validFunAdd2numbers() {
  let n1 = 20;
  let result = n1 + n2;
  var n2;
  return n1 + n2;
}

function scopeAdd2numbers() {
  const n1 = 10;
  const n2 = 20;
  const result = n1 + n2;
  {
    const n1 = 30;
    const n2 = 40;
    const result = n1 + n2;
  }

  return result;
}

add2numbers();
letAdd2numbers();
validFunAdd2numbers();
scopeAdd2numbers();
"#;

/// `validFunAdd2numbers` with `let n2`: the read before the declaration hits the temporal dead
/// zone. Never part of the default run.
pub const UNINITIALIZED_ACCESS_SOURCE: &str = r#"function funAdd2numbers() {
  let n1 = 20;
  let result = n1 + n2;
  let n2;
  return n1 + n2;
}
"#;

/// Summation without a seed: `sum()` fails.
pub const SUM_SOURCE: &str = r#"// Plain value declarations are prepared as soon as the script loads.
const a = 1;
const b = 2;

// A function body is normally only prepared once it is first called. Invoking the wrapper
// immediately means the summation function is built while the script loads.
const sum = (function () {
  return function (...args) {
    return args.reduce(function (acc, cur) {
      return acc + cur;
    });
  };
})();
"#;

/// Summation seeded with zero: `sum()` is 0.
pub const SEEDED_SUM_SOURCE: &str = r#"const sum = (function () {
  return function (...args) {
    return args.reduce(function (acc, cur) {
      return acc + cur;
    }, 0);
  };
})();
"#;

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Demo {
  pub name: &'static str,
  #[serde(skip)]
  pub source: &'static str,
  /// Global function called after the source has loaded.
  pub function: &'static str,
  pub args: &'static [f64],
  /// Disabled demos only run when asked for by name or with `run_all`.
  pub enabled: bool,
}

pub static ADD2NUMBERS: Demo = Demo {
  name: "add2numbers",
  source: SCOPES_SOURCE,
  function: "add2numbers",
  args: &[],
  enabled: true,
};

pub static LET_ADD2NUMBERS: Demo = Demo {
  name: "letAdd2numbers",
  source: SCOPES_SOURCE,
  function: "letAdd2numbers",
  args: &[],
  enabled: true,
};

pub static FUN_ADD2NUMBERS: Demo = Demo {
  name: "funAdd2numbers",
  source: UNINITIALIZED_ACCESS_SOURCE,
  function: "funAdd2numbers",
  args: &[],
  enabled: false,
};

pub static VALID_FUN_ADD2NUMBERS: Demo = Demo {
  name: "validFunAdd2numbers",
  source: SCOPES_SOURCE,
  function: "validFunAdd2numbers",
  args: &[],
  enabled: true,
};

pub static SCOPE_ADD2NUMBERS: Demo = Demo {
  name: "scopeAdd2numbers",
  source: SCOPES_SOURCE,
  function: "scopeAdd2numbers",
  args: &[],
  enabled: true,
};

pub static SUM: Demo = Demo {
  name: "sum",
  source: SUM_SOURCE,
  function: "sum",
  args: &[1.0, 2.0, 3.0],
  enabled: true,
};

pub static SEEDED_SUM: Demo = Demo {
  name: "seededSum",
  source: SEEDED_SUM_SOURCE,
  function: "sum",
  args: &[1.0, 2.0, 3.0],
  enabled: true,
};

pub static DEMOS: [&Demo; 7] = [
  &ADD2NUMBERS,
  &LET_ADD2NUMBERS,
  &FUN_ADD2NUMBERS,
  &VALID_FUN_ADD2NUMBERS,
  &SCOPE_ADD2NUMBERS,
  &SUM,
  &SEEDED_SUM,
];

impl Demo {
  pub fn find(name: &str) -> Option<&'static Demo> {
    DEMOS.iter().copied().find(|d| d.name == name)
  }

  /// Loads the demo's source into a fresh runtime, then calls its function.
  pub fn run(&self, options: &VmOptions) -> Result<Value, VmError> {
    tracing::debug!(demo = self.name, enabled = self.enabled, "run demo");
    let mut rt = JsRuntime::new(Vm::new(options.clone()))?;
    rt.exec_script(self.source)?;
    let args: Vec<Value> = self.args.iter().copied().map(Value::Number).collect();
    let result = rt.call_global(self.function, &args);
    tracing::debug!(demo = self.name, ok = result.is_ok(), "demo finished");
    result
  }
}

/// The result of one demo run.
#[derive(Debug)]
pub struct DemoOutcome {
  pub demo: &'static Demo,
  pub result: Result<Value, VmError>,
}

/// Printable form of a [`DemoOutcome`]. Values are rendered as text, since `NaN` has no JSON
/// representation.
#[derive(Debug, Serialize)]
pub struct DemoReport {
  pub name: &'static str,
  pub enabled: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl DemoOutcome {
  pub fn is_ok(&self) -> bool {
    self.result.is_ok()
  }

  pub fn report(&self) -> DemoReport {
    let (value, error) = match &self.result {
      Ok(v) => (Some(v.to_string()), None),
      Err(err) => (None, Some(err.to_string())),
    };
    DemoReport {
      name: self.demo.name,
      enabled: self.demo.enabled,
      value,
      error,
    }
  }
}

fn run_each(demos: impl Iterator<Item = &'static Demo>, options: &VmOptions) -> Vec<DemoOutcome> {
  demos
    .map(|demo| DemoOutcome {
      demo,
      result: demo.run(options),
    })
    .collect()
}

/// Runs every enabled demo.
pub fn run_default(options: &VmOptions) -> Vec<DemoOutcome> {
  run_each(DEMOS.iter().copied().filter(|d| d.enabled), options)
}

/// Runs every demo, including disabled negative cases.
pub fn run_all(options: &VmOptions) -> Vec<DemoOutcome> {
  run_each(DEMOS.iter().copied(), options)
}

pub fn add2numbers() -> Result<Value, VmError> {
  ADD2NUMBERS.run(&VmOptions::default())
}

pub fn let_add2numbers() -> Result<Value, VmError> {
  LET_ADD2NUMBERS.run(&VmOptions::default())
}

pub fn scope_add2numbers() -> Result<Value, VmError> {
  SCOPE_ADD2NUMBERS.run(&VmOptions::default())
}

pub fn valid_fun_add2numbers() -> Result<Value, VmError> {
  VALID_FUN_ADD2NUMBERS.run(&VmOptions::default())
}

/// Disabled by default; always fails with [`VmError::UninitializedAccess`].
pub fn fun_add2numbers() -> Result<Value, VmError> {
  FUN_ADD2NUMBERS.run(&VmOptions::default())
}

fn script_reduce(source: &str, values: &[f64]) -> Result<f64, VmError> {
  let mut rt = JsRuntime::new(Vm::new(VmOptions::default()))?;
  rt.exec_script(source)?;
  let args: Vec<Value> = values.iter().copied().map(Value::Number).collect();
  let result = rt.call_global("sum", &args)?;
  result
    .as_number()
    .ok_or_else(|| VmError::TypeError(format!("sum returned {}", result.type_name())))
}

/// Calls `sum` from [`SUM_SOURCE`].
pub fn script_sum(values: &[f64]) -> Result<f64, VmError> {
  script_reduce(SUM_SOURCE, values)
}

/// Calls `sum` from [`SEEDED_SUM_SOURCE`].
pub fn script_seeded_sum(values: &[f64]) -> Result<f64, VmError> {
  script_reduce(SEEDED_SUM_SOURCE, values)
}
