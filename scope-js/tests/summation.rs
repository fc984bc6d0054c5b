use scope_js::demos::script_seeded_sum;
use scope_js::demos::script_sum;
use scope_js::sum::seeded_sum;
use scope_js::sum::sum;
use scope_js::VmError;

#[test]
fn unseeded_script_sum() {
  assert_eq!(script_sum(&[1.0, 2.0, 3.0]), Ok(6.0));
  assert_eq!(script_sum(&[5.0]), Ok(5.0));
  assert_eq!(script_sum(&[]), Err(VmError::EmptySequenceReduction));
}

#[test]
fn seeded_script_sum() {
  assert_eq!(script_seeded_sum(&[1.0, 2.0, 3.0]), Ok(6.0));
  assert_eq!(script_seeded_sum(&[]), Ok(0.0));
}

#[test]
fn native_sums_match_scripts() {
  assert_eq!(sum(&[1.0, 2.0, 3.0]), Ok(6.0));
  assert_eq!(sum(&[5.0]), Ok(5.0));
  assert_eq!(sum(&[]), Err(VmError::EmptySequenceReduction));
  assert_eq!(seeded_sum(&[1.0, 2.0, 3.0]), 6.0);
  assert_eq!(seeded_sum(&[]), 0.0);
}

#[test]
fn reduction_is_left_to_right() {
  // 0.1 + 0.2 + 0.3 depends on grouping in floating point.
  let values = [0.1, 0.2, 0.3];
  let expected = (0.1 + 0.2) + 0.3;
  assert_eq!(script_sum(&values), Ok(expected));
  assert_eq!(sum(&values), Ok(expected));
  assert_eq!(script_seeded_sum(&values), Ok(((0.0 + 0.1) + 0.2) + 0.3));
}
