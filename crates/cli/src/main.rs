// TtyCon - Serial Console Firmware
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

mod script;
mod session;
mod transport;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::io::{self, ErrorKind, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info};

use script::{SessionAssertion, SessionScript};
use session::{AssertionResult, SessionEnd};
use transport::CookedInput;
use ttycon_core::config::{HEARTBEAT_INTERVAL_MS, LINE_BUFFER_CAPACITY};
use ttycon_core::transport::IoTransport;
use ttycon_core::{Console, Heartbeat, Indicator, StreamError, StreamId, Ticks};

const EXIT_PASS: u8 = 0;
const EXIT_ASSERT_FAIL: u8 = 1;
const EXIT_CONFIG_ERROR: u8 = 2;
const EXIT_RUNTIME_ERROR: u8 = 3;

const RESULT_SCHEMA_VERSION: &str = "1.0";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "TtyCon host harness: runs the serial console core on stdio or a script",
    long_about = None
)]
struct Cli {
    /// Log line-editor events (bells, completed lines) at trace level
    #[arg(short, long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive console on stdin/stdout; every line read is written back.
    Echo(EchoArgs),

    /// Run the heartbeat application loop with a simulated 1 kHz tick.
    Heartbeat(HeartbeatArgs),

    /// Deterministic scripted session driven by a YAML script.
    Test(TestArgs),
}

#[derive(Parser, Debug)]
struct EchoArgs {
    /// Treat LF on input as CR (for terminals in cooked mode)
    #[arg(long)]
    lf_as_cr: bool,
}

#[derive(Parser, Debug)]
struct HeartbeatArgs {
    /// Number of beats before exiting (default: run forever)
    #[arg(short, long)]
    count: Option<u64>,

    /// Heartbeat period in milliseconds
    #[arg(long, default_value_t = HEARTBEAT_INTERVAL_MS)]
    interval_ms: u32,
}

#[derive(Parser, Debug)]
struct TestArgs {
    /// Path to the session script (YAML)
    #[arg(short = 'c', long)]
    script: PathBuf,

    /// Directory to write artifacts (result.json, echo.log)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Do not copy the console echo to stdout
    #[arg(long)]
    no_echo_stdout: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct TestResult {
    result_schema_version: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<SessionEnd>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    input_bytes: usize,
    echo_bytes: usize,
    reads: Vec<String>,
    buffered_after: String,
    assertions: Vec<AssertionResult>,
    script: PathBuf,
}

impl TestResult {
    fn error(script: PathBuf, message: String) -> Self {
        Self {
            result_schema_version: RESULT_SCHEMA_VERSION.to_string(),
            status: "error".to_string(),
            end: None,
            message: Some(message),
            input_bytes: 0,
            echo_bytes: 0,
            reads: vec![],
            buffered_after: String::new(),
            assertions: vec![],
            script,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout is the console wire, so logs go to stderr.
    let level = if cli.trace {
        tracing::Level::TRACE
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let outcome = match cli.command {
        Commands::Test(args) => return run_test(args),
        Commands::Echo(args) => run_echo(args),
        Commands::Heartbeat(args) => run_heartbeat(args),
    };
    match outcome {
        Ok(()) => ExitCode::from(EXIT_PASS),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

fn run_echo(args: EchoArgs) -> Result<()> {
    let io = IoTransport::new(io::stdin().lock(), io::stdout());
    let mut console: Console<_> = Console::new(CookedInput::new(io, args.lf_as_cr));
    let fd = StreamId::Stdin as i32;
    let mut line = [0u8; LINE_BUFFER_CAPACITY];

    info!("console ready (CR submits, ^H/DEL, ^W, ^U edit)");
    loop {
        let n = match console.read_line(fd, &mut line) {
            Ok(n) => n,
            Err(StreamError::Transport(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                info!("end of input");
                return Ok(());
            }
            Err(e) => return Err(e).context("console read failed"),
        };
        let text = String::from_utf8_lossy(&line[..n]);
        debug!(len = n, "line");
        write!(console, "got: {}", text).context("console write failed")?;
    }
}

/// Heartbeat output on the host: logs its level instead of driving a pin.
#[derive(Debug, Default)]
struct LoggedLed {
    high: bool,
}

impl Indicator for LoggedLed {
    fn set_high(&mut self) {
        self.high = true;
        debug!("led high");
    }

    fn toggle(&mut self) {
        self.high = !self.high;
        debug!(high = self.high, "led toggle");
    }
}

fn run_heartbeat(args: HeartbeatArgs) -> Result<()> {
    let ticks = Arc::new(Ticks::new());
    let running = Arc::new(AtomicBool::new(true));

    // Stands in for the SysTick interrupt.
    let ticker = {
        let ticks = Arc::clone(&ticks);
        let running = Arc::clone(&running);
        thread::Builder::new()
            .name("systick".to_string())
            .spawn(move || {
                while running.load(Ordering::Relaxed) {
                    thread::sleep(Duration::from_millis(1));
                    ticks.tick();
                }
            })
            .context("Failed to spawn tick thread")?
    };

    let mut console: Console<_> = Console::new(IoTransport::new(io::empty(), io::stdout()));
    let mut heartbeat = Heartbeat::new(LoggedLed::default(), args.interval_ms);
    info!(interval_ms = args.interval_ms, "heartbeat started");

    let result = (|| -> Result<()> {
        while args.count.map_or(true, |n| u64::from(heartbeat.beats()) < n) {
            heartbeat
                .beat(&ticks, &mut console, || {
                    thread::sleep(Duration::from_micros(250))
                })
                .context("status write failed")?;
        }
        Ok(())
    })();

    running.store(false, Ordering::Relaxed);
    if ticker.join().is_err() {
        anyhow::bail!("tick thread panicked");
    }
    result
}

fn run_test(args: TestArgs) -> ExitCode {
    let script = match SessionScript::from_file(&args.script) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("{:#}", e);
            error!("{}", msg);
            write_outputs(&args, &TestResult::error(args.script.clone(), msg), None);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let input = match script.input_bytes(&args.script) {
        Ok(bytes) => bytes,
        Err(e) => {
            let msg = format!("{:#}", e);
            error!("{}", msg);
            write_outputs(&args, &TestResult::error(args.script.clone(), msg), None);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let outcome = match session::run_session(&input, &script.read_sizes) {
        Ok(o) => o,
        Err(e) => {
            let msg = format!("{:#}", e);
            error!("{}", msg);
            write_outputs(&args, &TestResult::error(args.script.clone(), msg), None);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    };

    if !args.no_echo_stdout {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(&outcome.echo);
        let _ = stdout.flush();
    }

    let assertions: Vec<AssertionResult> = script
        .assertions
        .iter()
        .map(|assertion| AssertionResult {
            assertion: assertion.clone(),
            passed: session::evaluate(assertion, &outcome),
        })
        .collect();
    for failed in assertions.iter().filter(|a| !a.passed) {
        error!("Assertion failed: {}", describe(&failed.assertion));
    }
    let all_passed = assertions.iter().all(|a| a.passed);

    let result = TestResult {
        result_schema_version: RESULT_SCHEMA_VERSION.to_string(),
        status: if all_passed { "pass" } else { "fail" }.to_string(),
        end: Some(outcome.end),
        message: None,
        input_bytes: input.len(),
        echo_bytes: outcome.echo.len(),
        reads: outcome
            .reads
            .iter()
            .map(|r| String::from_utf8_lossy(r).into_owned())
            .collect(),
        buffered_after: String::from_utf8_lossy(&outcome.buffered_after).into_owned(),
        assertions,
        script: args.script.clone(),
    };
    write_outputs(&args, &result, Some(&outcome.echo));

    info!(
        status = %result.status,
        reads = result.reads.len(),
        "session finished ({:?})",
        outcome.end
    );
    if all_passed {
        ExitCode::from(EXIT_PASS)
    } else {
        ExitCode::from(EXIT_ASSERT_FAIL)
    }
}

fn describe(assertion: &SessionAssertion) -> String {
    match assertion {
        SessionAssertion::EchoEquals(s) => format!("echo_equals {:?}", s),
        SessionAssertion::EchoContains(s) => format!("echo_contains {:?}", s),
        SessionAssertion::ReadsEqual(v) => format!("reads_equal {:?}", v),
        SessionAssertion::BufferedAfter(s) => format!("buffered_after {:?}", s),
    }
}

fn write_outputs(args: &TestArgs, result: &TestResult, echo: Option<&[u8]>) {
    // Best-effort: a failed artifact write is logged but does not change the
    // exit code.
    let Some(output_dir) = &args.output_dir else {
        return;
    };
    if let Err(e) = std::fs::create_dir_all(output_dir) {
        error!("Failed to create output directory {:?}: {}", output_dir, e);
        return;
    }

    let result_path = output_dir.join("result.json");
    match serde_json::to_string_pretty(result) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&result_path, json) {
                error!("Failed to write {:?}: {}", result_path, e);
            }
        }
        Err(e) => error!("Failed to serialize result: {}", e),
    }

    if let Some(echo) = echo {
        let echo_path = output_dir.join("echo.log");
        if let Err(e) = std::fs::write(&echo_path, echo) {
            error!("Failed to write {:?}: {}", echo_path, e);
        }
    }
}
