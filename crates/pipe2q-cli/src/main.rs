//! pipe2q command-line interface.
//!
//! Reads one shell command per line from standard input and submits them
//! to a PBS queue as batch jobs:
//!
//! ```text
//! cat commands.txt | pipe2q --wt 10:00 --procs 2 --batch 4
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::io::IsTerminal;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use pipe2q_sched::{
    QsubRunner, SubmissionOptions, SubmitDriver, SubmitError, Walltime, read_commands,
};

/// Pipe jobs to the queue
#[derive(Parser)]
#[command(name = "pipe2q")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Amount of walltime. E.g. 10:00 (is 10 min), 10:00:00 (is 10
    /// hours), 10:00:00:00 (is 10 days)
    #[arg(long = "wt", value_name = "dd:hh:mm:ss")]
    wt: String,

    /// Number of processors per job
    #[arg(
        long,
        value_name = "int",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    procs: u32,

    /// Number of commands grouped into one job
    #[arg(
        long,
        value_name = "int",
        default_value_t = 1,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    batch: u64,

    /// Name of job. Prefix n-* will be added
    #[arg(long = "n", value_name = "str")]
    name: Option<String>,

    /// Add commands to the test queue
    #[arg(long)]
    testq: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let opts = SubmissionOptions {
        walltime: cli.wt,
        processors: cli.procs,
        batch_size: cli.batch as usize,
        job_name: cli.name,
        use_test_queue: cli.testq,
    };

    if let Err(e) = run(opts).await {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(opts: SubmissionOptions) -> anyhow::Result<()> {
    // A bad --wt must be reported before the stdin guard fires, so it is
    // validated here even though the driver parses it again during run().
    Walltime::parse(&opts.walltime)?;

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(SubmitError::StdinRequired.into());
    }

    let commands = read_commands(stdin.lock())?;

    let driver = SubmitDriver::new(opts, QsubRunner::new());
    let results = driver.run(commands).await?;

    let rejected = results.iter().filter(|r| !r.accepted).count();
    if rejected > 0 {
        eprintln!(
            "{} {rejected} of {} submission(s) were not accepted by the scheduler",
            style("Warning:").yellow().bold(),
            results.len()
        );
    } else {
        tracing::info!("{} submission(s) accepted", results.len());
    }

    Ok(())
}
