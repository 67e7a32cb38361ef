//! Vector-driven verification harness CLI.
//!
//! This binary runs a vector table against one of the built-in DUT models. It provides:
//! 1. **Run:** Drive a built-in or JSON vector table, print one line per vector and a summary,
//!    optionally writing a VCD trace and a coverage ledger.
//! 2. **Ops:** Print the operation table of a DUT so the pass policy can be audited.
//!
//! Exit codes: 0 all vectors passed, 1 some vectors failed, 2 the run aborted,
//! 3 configuration or sink error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use rtlbench_core::common::HarnessError;
use rtlbench_core::coverage::JsonCoverageSink;
use rtlbench_core::dut::{Alu8, Dut, Fault, FaultyDut, FpAlu32};
use rtlbench_core::ops::{Alu8Op, CheckPolicy, Fp32Op, Operation};
use rtlbench_core::tables::{Builtin, BuiltinTable};
use rtlbench_core::trace::VcdTraceSink;
use rtlbench_core::vector::load_table;
use rtlbench_core::{Harness, HarnessConfig};

/// Exit code for configuration and sink errors.
const EXIT_ERROR: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    name = "rtlbench",
    author,
    version,
    about = "Vector-driven functional verification harness",
    long_about = "Drive a table of test vectors through a combinational DUT model, compare each \
                  observation with a reference oracle, and report pass/fail per vector.\n\n\
                  Logging goes to stderr and is controlled by RUST_LOG (default: warn).\n\n\
                  Examples:\n  \
                  rtlbench run --dut alu8\n  \
                  rtlbench run --dut fp32 --trace --coverage\n  \
                  rtlbench run --dut alu8 --table coverage-demo --coverage\n  \
                  rtlbench run --dut alu8 --vectors vectors.json --fault stuck-at:0:1\n  \
                  rtlbench ops --dut fp32"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a vector table against a DUT model.
    Run(RunArgs),

    /// Print the operation table (name, opcode, oracle, policy) of a DUT model.
    Ops {
        /// DUT model.
        #[arg(long, value_enum)]
        dut: DutKind,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// DUT model.
    #[arg(long, value_enum)]
    dut: DutKind,

    /// Built-in vector table (`default` or `coverage-demo`).
    #[arg(long, default_value_t = BuiltinTable::Default)]
    table: BuiltinTable,

    /// JSON vector file; replaces the built-in table.
    #[arg(long, value_name = "FILE")]
    vectors: Option<PathBuf>,

    /// Write a VCD trace.
    #[arg(long)]
    trace: bool,

    /// VCD trace path; implies --trace.
    #[arg(long, value_name = "PATH")]
    trace_file: Option<PathBuf>,

    /// Write a JSON coverage ledger and print the coverage summary.
    #[arg(long)]
    coverage: bool,

    /// Coverage ledger path; implies --coverage.
    #[arg(long, value_name = "PATH")]
    coverage_file: Option<PathBuf>,

    /// JSON configuration file; command-line flags override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Inject a fault: `stuck-at:<bit>:<0|1>` or `no-settle`.
    #[arg(long, value_name = "SPEC")]
    fault: Option<Fault>,
}

/// Built-in DUT models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DutKind {
    /// 8-bit integer ALU.
    Alu8,
    /// 32-bit floating-point ALU.
    Fp32,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Run(args) => {
            let result = match args.dut {
                DutKind::Alu8 => cmd_run::<Alu8Op>(Box::new(Alu8::new()), &args),
                DutKind::Fp32 => cmd_run::<Fp32Op>(Box::new(FpAlu32::new()), &args),
            };
            match result {
                Ok(code) => ExitCode::from(code),
                Err(e) => {
                    eprintln!("Error: {e}");
                    ExitCode::from(EXIT_ERROR)
                }
            }
        }
        Commands::Ops { dut } => {
            match dut {
                DutKind::Alu8 => print_ops::<Alu8Op>(),
                DutKind::Fp32 => print_ops::<Fp32Op>(),
            }
            ExitCode::SUCCESS
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the `warn` default.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Builds the effective configuration: the `--config` file (or defaults),
/// then the command-line overrides.
fn resolve_config(args: &RunArgs) -> Result<HarnessConfig, HarnessError> {
    let mut config = match &args.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    config.general.trace |= args.trace || args.trace_file.is_some();
    if let Some(path) = &args.trace_file {
        config.general.trace_path.clone_from(path);
    }
    config.general.coverage |= args.coverage || args.coverage_file.is_some();
    if let Some(path) = &args.coverage_file {
        config.general.coverage_path.clone_from(path);
    }
    Ok(config)
}

/// Runs one table against `dut` and prints the report.
///
/// # Arguments
///
/// * `dut` - The DUT model, wrapped with the requested fault if any.
/// * `args` - Parsed `run` arguments.
///
/// # Returns
///
/// The report's exit code (0, 1 or 2).
///
/// # Errors
///
/// Configuration, vector file, trace-open and stdout write failures.
fn cmd_run<O: Builtin>(dut: Box<dyn Dut>, args: &RunArgs) -> Result<u8, HarnessError> {
    let config = resolve_config(args)?;
    debug!(?config, "effective configuration");

    let table = match &args.vectors {
        Some(path) => load_table::<O>(path)?,
        None => O::builtin(args.table),
    };
    let dut: Box<dyn Dut> = match args.fault {
        Some(fault) => Box::new(FaultyDut::new(dut, fault)),
        None => dut,
    };

    println!("Table: {}  DUT: {}  Vectors: {}", table.name(), dut.name(), table.len());
    if let Some(fault) = args.fault {
        println!("  Fault: {fault}");
    }
    if config.general.trace {
        println!("  Trace: {}", config.general.trace_path.display());
    }
    if config.general.coverage {
        println!("  Coverage: {}", config.general.coverage_path.display());
    }
    println!();

    let mut harness = Harness::from_config(dut, &table, &config)?;
    if config.general.trace {
        harness = harness.with_trace(Box::new(VcdTraceSink::new(config.general.trace_path.clone())));
    }
    if config.general.coverage {
        harness = harness.with_coverage(Box::new(JsonCoverageSink::new(config.general.coverage_path.clone())));
    }

    let report = harness.run()?;
    report.print()?;
    Ok(report.exit_code())
}

/// Prints the operation table of one operation set.
fn print_ops<O: Operation>() {
    println!("{} operations ({}-bit operands)", O::SET, O::OPERAND_WIDTH);
    println!("{:<12} {:>6}  {:<7} {}", "NAME", "OPCODE", "ORACLE", "POLICY");
    for op in O::ALL {
        let d = op.descriptor();
        let policy = match d.policy {
            CheckPolicy::Checked => "checked",
            CheckPolicy::Unchecked => "unchecked",
        };
        let oracle = if d.oracle.is_some() { "yes" } else { "no" };
        println!("{:<12} {:>6}  {:<7} {}", d.name, d.opcode, oracle, policy);
    }
}
