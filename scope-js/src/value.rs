use crate::error::VmError;
use crate::function::Closure;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::rc::Rc;

/// A value produced by the evaluator.
#[derive(Clone, Debug)]
pub enum Value {
  /// The JavaScript `undefined` value. Also what a hoisted `var` holds before its declaration line
  /// runs.
  Undefined,
  /// A JavaScript number (IEEE-754 double).
  Number(f64),
  /// An immutable array, e.g. the collected rest parameter `...args`.
  Array(Rc<[Value]>),
  Function(Rc<Closure>),
}

impl Value {
  pub fn type_name(&self) -> &'static str {
    match self {
      Value::Undefined => "undefined",
      Value::Number(_) => "number",
      Value::Array(_) => "array",
      Value::Function(_) => "function",
    }
  }

  pub fn as_number(&self) -> Option<f64> {
    match self {
      Value::Number(n) => Some(*n),
      _ => None,
    }
  }

  /// Whether this is the not-a-number sentinel.
  pub fn is_nan(&self) -> bool {
    self.as_number().is_some_and(f64::is_nan)
  }

  /// `ToNumber` restricted to the values this evaluator has. `undefined` becomes NaN, which is how
  /// a hoisted but unassigned `var` poisons arithmetic without raising an error.
  pub fn to_number(&self) -> Result<f64, VmError> {
    match self {
      Value::Undefined => Ok(f64::NAN),
      Value::Number(n) => Ok(*n),
      other => Err(VmError::TypeError(format!(
        "cannot convert {} to a number",
        other.type_name()
      ))),
    }
  }

  /// ECMAScript `SameValue(x, y)`.
  ///
  /// This differs from `==`/`===` for Numbers:
  /// - `NaN` is the same as `NaN`
  /// - `+0` and `-0` are distinct
  pub fn same_value(&self, other: &Self) -> bool {
    match (self, other) {
      (Value::Undefined, Value::Undefined) => true,
      (Value::Number(a), Value::Number(b)) => {
        if a.is_nan() && b.is_nan() {
          return true;
        }
        if *a == 0.0 && *b == 0.0 {
          // Distinguish +0 and -0.
          return a.to_bits() == b.to_bits();
        }
        a == b
      }
      // Arrays and functions are objects: same value only when they are the same allocation.
      (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
      (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
      _ => false,
    }
  }
}

/// Strict equality (`===`): like [`Value::same_value`] except `NaN` is never equal to anything and
/// `+0` equals `-0`. Arrays and functions compare by identity.
impl PartialEq for Value {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Value::Number(a), Value::Number(b)) => a == b,
      _ => self.same_value(other),
    }
  }
}

/// ECMAScript `Number::toString(n)` for radix 10.
///
/// `ryu` produces the shortest digit string that round-trips; its output is then re-laid out with
/// the ECMAScript rules: plain integers up to 21 digits, plain fractions down to `1e-7`, and
/// `d.ddde+x` exponent form outside that range.
fn fmt_number(n: f64, f: &mut Formatter<'_>) -> fmt::Result {
  if n.is_nan() {
    return f.write_str("NaN");
  }
  if n.is_infinite() {
    return f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" });
  }
  if n == 0.0 {
    // `ToString(-0)` is `"0"`.
    return f.write_str("0");
  }
  if n < 0.0 {
    f.write_str("-")?;
  }

  let mut buf = ryu::Buffer::new();
  let (digits, point) = decimal_digits(buf.format_finite(n.abs()));
  let k = digits.len() as i32;

  if k <= point && point <= 21 {
    f.write_str(&digits)?;
    for _ in 0..point - k {
      f.write_str("0")?;
    }
    Ok(())
  } else if 0 < point && point <= 21 {
    let (int, frac) = digits.split_at(point as usize);
    write!(f, "{int}.{frac}")
  } else if -6 < point && point <= 0 {
    f.write_str("0.")?;
    for _ in 0..-point {
      f.write_str("0")?;
    }
    f.write_str(&digits)
  } else {
    let exp = point - 1;
    let sign = if exp < 0 { '-' } else { '+' };
    let (first, rest) = digits.split_at(1);
    if rest.is_empty() {
      write!(f, "{first}e{sign}{}", exp.abs())
    } else {
      write!(f, "{first}.{rest}e{sign}{}", exp.abs())
    }
  }
}

/// Splits `ryu` output for a positive finite number into its significant digits (no leading or
/// trailing zeros) and the position of the decimal point relative to the first digit, so the value
/// is `0.DIGITS * 10^point`.
fn decimal_digits(formatted: &str) -> (String, i32) {
  let (mantissa, exp) = match formatted.split_once(['e', 'E']) {
    Some((mantissa, exp)) => (mantissa, exp.parse::<i32>().unwrap_or(0)),
    None => (formatted, 0),
  };
  let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
  let mut point = int.len() as i32 + exp;
  let all: String = int.chars().chain(frac.chars()).collect();
  let trimmed = all.trim_start_matches('0');
  point -= (all.len() - trimmed.len()) as i32;
  (trimmed.trim_end_matches('0').to_string(), point)
}

impl Display for Value {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Value::Undefined => f.write_str("undefined"),
      Value::Number(n) => fmt_number(*n, f),
      Value::Array(items) => {
        f.write_str("[")?;
        for (i, item) in items.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{item}")?;
        }
        f.write_str("]")
      }
      Value::Function(closure) => match closure.name() {
        Some(name) => write!(f, "[Function: {name}]"),
        None => f.write_str("[Function (anonymous)]"),
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::Value;

  #[test]
  fn test_display_numbers() {
    assert_eq!(Value::Number(30.0).to_string(), "30");
    assert_eq!(Value::Number(0.5).to_string(), "0.5");
    assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
    assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
    assert_eq!(Value::Number(-0.0).to_string(), "0");
    assert_eq!(Value::Undefined.to_string(), "undefined");
  }

  #[test]
  fn test_display_numbers_use_exponent_outside_plain_range() {
    let cases = [
      (1e21, "1e+21"),
      (1e20, "100000000000000000000"),
      (123456789012345680000.0, "123456789012345680000"),
      (1.5e300, "1.5e+300"),
      (1e-7, "1e-7"),
      (1.25e-7, "1.25e-7"),
      (0.000001, "0.000001"),
      (0.001, "0.001"),
      (-2.5e-8, "-2.5e-8"),
      (123.456, "123.456"),
      (-1.0, "-1"),
      (0.1 + 0.2, "0.30000000000000004"),
      (f64::MAX, "1.7976931348623157e+308"),
      (5e-324, "5e-324"),
    ];
    for (n, expected) in cases {
      assert_eq!(Value::Number(n).to_string(), expected, "{n:?}");
    }
  }

  #[test]
  fn test_arrays_compare_by_identity() {
    let a = Value::Array(vec![Value::Number(1.0)].into());
    let b = Value::Array(vec![Value::Number(1.0)].into());
    assert_eq!(a, a.clone());
    assert_ne!(a, b);
    assert!(!a.same_value(&b));
  }

  #[test]
  fn test_undefined_to_number_is_nan() {
    assert!(Value::Undefined.to_number().unwrap().is_nan());
  }

  #[test]
  fn test_same_value_vs_eq() {
    let nan = Value::Number(f64::NAN);
    assert!(nan.same_value(&nan));
    assert_ne!(nan, nan.clone());
    assert!(!Value::Number(0.0).same_value(&Value::Number(-0.0)));
    assert_eq!(Value::Number(0.0), Value::Number(-0.0));
  }
}
