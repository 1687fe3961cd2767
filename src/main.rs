//! Benchmark driver: runs every strategy on the same seeded inputs and
//! prints timings and verdicts.

use std::io::{self, BufWriter};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use matmul_strategies::config::{MATRIX_SIZE, NUM_PROCESSES, NUM_THREADS};
use matmul_strategies::matrix::verify::first_divergence;
use matmul_strategies::timing::measure;
use matmul_strategies::{
    BenchConfig, DetachedHandle, Matrix, MatrixStore, Operands, ProcessPool, Reporter, Result,
    Verdict, multiply_joined, multiply_mixed, multiply_sequential, process, seeded_inputs,
    spawn_detached, verify,
};

#[derive(Parser, Debug)]
#[command(version, about = "Compare sequential, process and thread matrix multiplication")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Side length of the square matrices.
    #[arg(long, default_value_t = MATRIX_SIZE)]
    size: usize,

    /// Worker processes for the process strategy.
    #[arg(long, default_value_t = NUM_PROCESSES)]
    processes: usize,

    /// Worker threads for each thread strategy.
    #[arg(long, default_value_t = NUM_THREADS)]
    threads: usize,

    /// Digits of matrix A.
    #[arg(long, default_value = "1211553")]
    seed_a: String,

    /// Multiplied by seed A; the product's digits fill matrix B.
    #[arg(long, default_value = "2003")]
    seed_b: String,

    /// How long shutdown waits for detached workers.
    #[arg(long, default_value_t = 10_000)]
    detached_timeout_ms: u64,

    /// Print the sequential result.
    #[arg(long)]
    print: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute one row range from a task frame on stdin.
    #[command(hide = true)]
    Worker,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let outcome = match cli.command {
        Some(Command::Worker) => run_worker(),
        None => run(&cli),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr: stdout carries reports, and in a process worker it
/// carries the result frame.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_worker() -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    process::serve(&mut stdin.lock(), &mut writer)
}

fn run(cli: &Cli) -> Result<()> {
    let config = BenchConfig {
        size: cli.size,
        processes: cli.processes,
        threads: cli.threads,
    };
    config.validate()?;
    if !config.is_balanced() {
        warn!(?config, "worker counts do not divide the size; last workers get the remainder");
    }

    let (a, b) = seeded_inputs(config.size, &cli.seed_a, &cli.seed_b)?;
    let mut store = MatrixStore::new(a, b);
    println!(
        "Matrix {}x{} from seeds {} and {}\n",
        config.size, config.size, cli.seed_a, cli.seed_b
    );

    let (baseline, elapsed) = measure(|| multiply_sequential(&store.a, &store.b));
    println!(
        "Naive solution:\n\tNaive approach: {:.6} seconds\n",
        elapsed.as_secs_f64()
    );
    let baseline = Arc::new(baseline);
    store.baseline = Some(Arc::clone(&baseline));
    if cli.print {
        print!("{}", baseline);
    }

    println!("Processes solution:");
    let pool = ProcessPool::new(config.processes)?;
    let (result, elapsed) = measure(|| pool.multiply(&store.a, &store.b));
    store.processes = finish_strategy(
        "processes",
        result,
        &baseline,
        format!(
            "Process-based approach with {} processes: {:.6} seconds",
            config.processes,
            elapsed.as_secs_f64()
        ),
    );

    println!("Threads solution:");
    let (result, elapsed) = measure(|| multiply_joined(&store.a, &store.b, config.threads));
    store.joined = finish_strategy(
        "joined",
        result,
        &baseline,
        format!(
            "1- Thread-based approach with {} join threads: {:.6} seconds",
            config.threads,
            elapsed.as_secs_f64()
        ),
    );

    let reporter = Reporter::spawn(io::stdout())?;
    let operands = Operands::new(Arc::clone(&store.a), Arc::clone(&store.b), Arc::clone(&baseline));
    let mut pending: Vec<(&str, DetachedHandle)> = Vec::new();

    println!("\t2- Thread-based approach with mix join & detached threads");
    match multiply_mixed(&operands, config.threads, &reporter.sender()) {
        Ok(handle) => {
            store.mixed = Some(Arc::clone(handle.slots()));
            pending.push(("mixed", handle));
        }
        Err(e) => abort_strategy("mixed", &e),
    }

    let (spawned, elapsed) = measure(|| spawn_detached(&operands, config.threads, &reporter.sender()));
    match spawned {
        Ok(handle) => {
            println!(
                "\n\t3- Thread-based approach with {} detached threads: such as time of creation = {:.6} seconds",
                config.threads,
                elapsed.as_secs_f64()
            );
            store.detached = Some(Arc::clone(handle.slots()));
            pending.push(("detached", handle));
        }
        Err(e) => abort_strategy("detached", &e),
    }

    let timeout = Duration::from_millis(cli.detached_timeout_ms);
    if await_detached(&pending, &baseline, timeout) {
        reporter.finish();
    } else {
        // Workers still hold senders; leave the consumer to die with the process.
        drop(reporter);
    }

    print_summary(&store);
    Ok(())
}

/// Final verdict of every strategy, read back from the store.
fn print_summary(store: &MatrixStore) {
    println!("\nSummary ({}x{}):", store.size(), store.size());
    for (strategy, verdict) in store.verdicts() {
        match verdict {
            Some(verdict) => println!("\t{}: {}", strategy, verdict),
            None => println!("\t{}: no complete result", strategy),
        }
    }
}

/// Prints a joined strategy's timing and verdict, or logs why it aborted.
fn finish_strategy(
    strategy: &str,
    result: Result<Matrix>,
    baseline: &Matrix,
    timing_line: String,
) -> Option<Matrix> {
    match result {
        Ok(m) => {
            let verdict = verify(&m, baseline);
            println!("\t{}", timing_line);
            println!("\t\tThe result is {}\n", verdict);
            log_verdict(strategy, &m, baseline, verdict);
            Some(m)
        }
        Err(e) => {
            abort_strategy(strategy, &e);
            None
        }
    }
}

fn abort_strategy(strategy: &str, e: &matmul_strategies::Error) {
    error!(strategy, error = %e, "strategy aborted");
    println!("\t{} strategy aborted: {}\n", strategy, e);
}

fn log_verdict(strategy: &str, result: &Matrix, baseline: &Matrix, verdict: Verdict) {
    match verdict {
        Verdict::Identical => info!(strategy, "result matches baseline"),
        Verdict::Divergent => warn!(
            strategy,
            first = ?first_divergence(result, baseline),
            "result diverges from baseline"
        ),
    }
}

/// Waits for every detached group up to a shared deadline. Returns whether
/// they all finished.
fn await_detached(pending: &[(&str, DetachedHandle)], baseline: &Matrix, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    let mut all_done = true;

    for (strategy, handle) in pending {
        let left = deadline.saturating_duration_since(Instant::now());
        if !handle.wait_timeout(left) {
            warn!(
                strategy,
                outstanding = handle.outstanding(),
                "detached workers still running at shutdown"
            );
            all_done = false;
            continue;
        }
        match handle.result() {
            Some(m) => log_verdict(strategy, &m, baseline, verify(&m, baseline)),
            None => warn!(strategy, "detached workers exited without publishing every row"),
        }
    }

    all_done
}
