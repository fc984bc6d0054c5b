use clap::{ArgAction, Args, Parser, Subcommand};
use scope_js::demos;
use scope_js::{parse, JsRuntime, StackFrame, SyntaxError, Vm, VmError, VmOptions};
use serde::Serialize;
use std::fs;
use std::io::stdin;
use std::io::stdout;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(author, version, about = "JavaScript scoping and hoisting demonstrations")]
struct Cli {
  #[command(flatten)]
  vm: VmArgs,

  /// Emit tracing events (JSON) to stderr.
  #[arg(long, global = true, action = ArgAction::SetTrue)]
  trace: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Args)]
struct VmArgs {
  /// Maximum number of nested calls before execution is terminated.
  #[arg(long, global = true, default_value_t = VmOptions::default().max_stack_depth)]
  max_stack_depth: usize,

  /// Ticks available per run (one per statement and per expression). Unlimited when omitted.
  #[arg(long, global = true)]
  fuel: Option<u64>,
}

impl VmArgs {
  fn options(&self) -> VmOptions {
    VmOptions {
      max_stack_depth: self.max_stack_depth,
      default_fuel: self.fuel,
    }
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Execute a script and print its completion value.
  Run(InputArgs),
  /// Print the syntax tree of a script as JSON.
  Ast(InputArgs),
  /// Run the built-in demonstrations.
  Demos(DemosArgs),
}

#[derive(Args)]
struct InputArgs {
  /// Script to read; stdin when omitted.
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// Print the result as JSON.
  #[arg(long, action = ArgAction::SetTrue)]
  json: bool,
}

#[derive(Args)]
struct DemosArgs {
  /// Also run demonstrations that are disabled by default (they are expected to fail).
  #[arg(long, action = ArgAction::SetTrue)]
  include_disabled: bool,

  /// Print one JSON report per demonstration.
  #[arg(long, action = ArgAction::SetTrue)]
  json: bool,
}

#[derive(Serialize)]
struct RunOutput {
  value: String,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.trace);
  let options = cli.vm.options();
  match cli.command {
    Commands::Run(args) => run_script(args, options),
    Commands::Ast(args) => print_ast(args),
    Commands::Demos(args) => run_demos(args, options),
  }
}

fn init_tracing(enabled: bool) {
  if !enabled {
    return;
  }
  let _ = tracing_subscriber::fmt()
    .with_span_events(FmtSpan::CLOSE)
    .with_max_level(Level::TRACE)
    .json()
    .with_ansi(false)
    .with_writer(std::io::stderr)
    .try_init();
}

fn read_input(input: Option<&PathBuf>) -> Result<String, String> {
  match input {
    Some(path) => fs::read_to_string(path).map_err(|err| format!("{}: {err}", path.display())),
    None => {
      let mut source = String::new();
      stdin()
        .read_to_string(&mut source)
        .map_err(|err| format!("stdin: {err}"))?;
      Ok(source)
    }
  }
}

/// Innermost frames printed for a termination; the rest are summarised as a count.
const STACK_TRACE_LIMIT: usize = 10;

fn report_stack(stack: &[StackFrame]) {
  for frame in stack.iter().take(STACK_TRACE_LIMIT) {
    eprintln!("    {frame}");
  }
  if stack.len() > STACK_TRACE_LIMIT {
    eprintln!("    ... {} more frames", stack.len() - STACK_TRACE_LIMIT);
  }
}

fn report_syntax_error(err: &SyntaxError, source: &str) {
  eprintln!("{}", err.render(source));
}

fn run_script(args: InputArgs, options: VmOptions) -> ExitCode {
  let source = match read_input(args.input.as_ref()) {
    Ok(source) => source,
    Err(err) => {
      eprintln!("{err}");
      return ExitCode::FAILURE;
    }
  };
  let mut rt = match JsRuntime::new(Vm::new(options)) {
    Ok(rt) => rt,
    Err(err) => {
      eprintln!("{err}");
      return ExitCode::FAILURE;
    }
  };
  match rt.exec_script(&source) {
    Ok(value) if args.json => {
      let output = RunOutput {
        value: value.to_string(),
      };
      if let Err(err) = serde_json::to_writer(stdout(), &output) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
      }
      println!();
      ExitCode::SUCCESS
    }
    Ok(value) => {
      println!("{value}");
      ExitCode::SUCCESS
    }
    Err(VmError::Syntax(err)) => {
      report_syntax_error(&err, &source);
      ExitCode::FAILURE
    }
    Err(VmError::Termination(t)) => {
      eprintln!("{t}");
      report_stack(&t.stack);
      ExitCode::FAILURE
    }
    Err(err) => {
      eprintln!("{err}");
      ExitCode::FAILURE
    }
  }
}

fn print_ast(args: InputArgs) -> ExitCode {
  let source = match read_input(args.input.as_ref()) {
    Ok(source) => source,
    Err(err) => {
      eprintln!("{err}");
      return ExitCode::FAILURE;
    }
  };
  let parsed = match parse(&source) {
    Ok(parsed) => parsed,
    Err(err) => {
      report_syntax_error(&err, &source);
      return ExitCode::FAILURE;
    }
  };
  if let Err(err) = serde_json::to_writer(stdout(), &parsed) {
    eprintln!("{err}");
    return ExitCode::FAILURE;
  }
  println!();
  ExitCode::SUCCESS
}

fn run_demos(args: DemosArgs, options: VmOptions) -> ExitCode {
  let outcomes = if args.include_disabled {
    demos::run_all(&options)
  } else {
    demos::run_default(&options)
  };
  let mut failed = false;
  for outcome in &outcomes {
    failed |= !outcome.is_ok();
    if args.json {
      match serde_json::to_string(&outcome.report()) {
        Ok(line) => println!("{line}"),
        Err(err) => {
          eprintln!("{err}");
          return ExitCode::FAILURE;
        }
      }
      continue;
    }
    match &outcome.result {
      Ok(value) => println!("{}() = {value}", outcome.demo.name),
      Err(err) => println!("{}() threw: {err}", outcome.demo.name),
    }
  }
  if failed {
    ExitCode::FAILURE
  } else {
    ExitCode::SUCCESS
  }
}
