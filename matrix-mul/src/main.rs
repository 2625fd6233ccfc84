use clap::Parser;
use matrix_mul::{Bench, BenchConfig};
use tracing_subscriber::EnvFilter;

/// Times standard, hybrid and linked Strassen multiplication on random
/// square matrices of doubling size.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// First matrix width (power of two)
    #[arg(long, default_value_t = 4)]
    start_size: usize,

    /// Largest matrix width
    #[arg(long, default_value_t = 2048)]
    max_size: usize,

    /// Tests run at each size
    #[arg(long, default_value_t = 5)]
    tests: usize,

    /// Cells are drawn from 1..=RANGE
    #[arg(long, default_value_t = 1000)]
    range: i32,

    /// Hybrid cutoff width of the first test at each size
    #[arg(long, default_value_t = 8)]
    cutoff: usize,

    /// Seed for reproducible matrices
    #[arg(long)]
    seed: Option<u64>,

    /// Check that all three products agree
    #[arg(long)]
    verify: bool,
}

impl From<Args> for BenchConfig {
    fn from(args: Args) -> Self {
        Self {
            start_size: args.start_size,
            max_size: args.max_size,
            tests_per_size: args.tests,
            range: args.range,
            first_cutoff: args.cutoff,
            seed: args.seed,
            verify: args.verify,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut bench = Bench::new(Args::parse().into())?;
    let reports = bench.run(|report| println!("{report}"))?;

    println!("\n{} tests complete", reports.len());
    Ok(())
}
