//! Native summation, mirroring the two script variants in [`crate::demos`].
//!
//! Argument preparation is eager here: callers pass a slice. The script versions collect their
//! arguments with a rest parameter, which is eager as well; a lazy variant would take an
//! `impl IntoIterator<Item = f64>` and give up nothing but the length.

use crate::error::VmError;

/// Adds up `values` starting from the first one. Fails on an empty slice, like `reduce` without an
/// initial value.
pub fn sum(values: &[f64]) -> Result<f64, VmError> {
  values
    .iter()
    .copied()
    .reduce(|acc, cur| acc + cur)
    .ok_or(VmError::EmptySequenceReduction)
}

/// Adds up `values` starting from zero; an empty slice sums to zero.
pub fn seeded_sum(values: &[f64]) -> f64 {
  values.iter().fold(0.0, |acc, cur| acc + cur)
}
