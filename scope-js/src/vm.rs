use crate::error::Termination;
use crate::error::TerminationReason;
use crate::error::VmError;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

pub const DEFAULT_MAX_STACK_DEPTH: usize = 128;

/// Construction-time VM options.
#[derive(Debug, Clone)]
pub struct VmOptions {
  /// Nested calls allowed before the run terminates with a stack overflow. Every JS call costs a
  /// handful of native evaluator frames, so the default stays well inside a 2 MiB thread stack.
  pub max_stack_depth: usize,
  /// Ticks available to a run; one tick is spent per statement and per expression.
  pub default_fuel: Option<u64>,
}

impl Default for VmOptions {
  fn default() -> Self {
    Self {
      max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
      default_fuel: None,
    }
  }
}

/// A call frame, recorded for stack traces in [`Termination`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
  pub function: Option<String>,
}

impl Display for StackFrame {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "at {}", self.function.as_deref().unwrap_or("<anonymous>"))
  }
}

/// Execution budget and call stack bookkeeping.
#[derive(Debug)]
pub struct Vm {
  options: VmOptions,
  fuel: Option<u64>,
  ticks: u64,
  stack: Vec<StackFrame>,
}

impl Vm {
  pub fn new(options: VmOptions) -> Self {
    Self {
      fuel: options.default_fuel,
      options,
      ticks: 0,
      stack: Vec::new(),
    }
  }

  pub fn ticks(&self) -> u64 {
    self.ticks
  }

  pub fn stack_depth(&self) -> usize {
    self.stack.len()
  }

  pub fn push_frame(&mut self, frame: StackFrame) -> Result<(), VmError> {
    if self.stack.len() >= self.options.max_stack_depth {
      return Err(self.terminate(TerminationReason::StackOverflow));
    }
    self.stack.push(frame);
    Ok(())
  }

  pub fn pop_frame(&mut self) {
    self.stack.pop();
  }

  pub fn capture_stack(&self) -> Vec<StackFrame> {
    self.stack.iter().rev().cloned().collect()
  }

  fn terminate(&self, reason: TerminationReason) -> VmError {
    VmError::Termination(Termination::new(reason, self.capture_stack()))
  }

  /// Consume one VM "tick".
  pub fn tick(&mut self) -> Result<(), VmError> {
    if let Some(fuel) = &mut self.fuel {
      if *fuel == 0 {
        return Err(self.terminate(TerminationReason::OutOfFuel));
      }
      *fuel -= 1;
    }
    self.ticks = self.ticks.wrapping_add(1);
    Ok(())
  }
}
