//! ai-throughput-bench: 补全 API 吞吐量基准测试命令行工具
//!
//! Usage:
//!   ai-throughput-bench run --input-file <jsonl> [OPTIONS]    Run a benchmark
//!   ai-throughput-bench convert <input> <output> [--seed N]   Convert a text dataset
//!   ai-throughput-bench convert-all [--datasets-dir D] [--seed N]   Convert the standard datasets

use ai_throughput_bench::config::{BenchConfig, ENV_API_KEY};
use ai_throughput_bench::dataset::ConversionStatus;
use ai_throughput_bench::transport::HttpTransport;
use ai_throughput_bench::{dataset, run_benchmark, RequestExecutor};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Throughput benchmark for OpenAI-compatible completion APIs
#[derive(Parser, Debug)]
#[command(name = "ai-throughput-bench")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSONL batch against the API and write a JSON report
    Run(RunArgs),

    /// Convert a {"text", "token_length"} dataset into request lines
    Convert(ConvertArgs),

    /// Convert benchmark_{1K,8K,16K}.jsonl in a datasets directory
    #[command(name = "convert-all")]
    ConvertAll(ConvertAllArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// API key (bearer token)
    #[arg(long, env = ENV_API_KEY, hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the API; `/completions` is appended
    #[arg(long)]
    api_endpoint: Option<String>,

    /// Model name sent with every request
    #[arg(long)]
    model: Option<String>,

    /// JSONL file with one request per line
    #[arg(long)]
    input_file: Option<PathBuf>,

    /// Where to write the JSON report
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Number of concurrent workers
    #[arg(long)]
    concurrent_requests: Option<usize>,

    /// YAML config file; command-line values take precedence
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input JSONL file
    input_file: PathBuf,

    /// Output JSONL file
    output_file: PathBuf,

    /// Random seed for reproducible temperature values
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct ConvertAllArgs {
    /// Directory holding the benchmark_*.jsonl files
    #[arg(long, default_value = "datasets")]
    datasets_dir: PathBuf,

    /// Random seed for reproducible temperature values
    #[arg(long, default_value_t = dataset::DEFAULT_CONVERT_SEED)]
    seed: u64,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Convert(args) => cmd_convert(args),
        Commands::ConvertAll(args) => cmd_convert_all(args),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ai_throughput_bench=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_config(args: RunArgs) -> Result<BenchConfig> {
    let mut cfg = match &args.config {
        Some(path) => BenchConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BenchConfig::default(),
    };
    cfg.apply_env();

    if let Some(v) = args.api_key {
        cfg.api_key = Some(v);
    }
    if let Some(v) = args.api_endpoint {
        cfg.api_endpoint = v;
    }
    if let Some(v) = args.model {
        cfg.model = v;
    }
    if let Some(v) = args.input_file {
        cfg.input_file = Some(v);
    }
    if let Some(v) = args.output_file {
        cfg.output_file = v;
    }
    if let Some(v) = args.concurrent_requests {
        cfg.concurrent_requests = v;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let cfg = resolve_config(args)?;
    let input = cfg
        .input_file
        .as_ref()
        .context("input file is required")?;

    let requests = dataset::load_requests(input)
        .with_context(|| format!("reading requests from {}", input.display()))?;
    if requests.is_empty() {
        bail!("no valid requests found in {}", input.display());
    }

    let transport = HttpTransport::new(&cfg.api_endpoint, cfg.api_key.clone(), &cfg.http)?;
    let executor = RequestExecutor::new(Arc::new(transport), cfg.model.clone());

    let run = run_benchmark(&requests, cfg.concurrent_requests, &executor)?;
    let report = run.to_report();

    if let Err(e) = report.write_to_file(&cfg.output_file) {
        error!("printing report to stdout instead");
        println!("{}", report.to_json_string()?);
        return Err(e).with_context(|| format!("writing report to {}", cfg.output_file.display()));
    }

    let stats = &report.overall_stats;
    info!(
        output = %cfg.output_file.display(),
        requests = stats.total_number_requests,
        failures = stats.total_number_failures,
        rps = stats.requests_per_second,
        "done"
    );
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> Result<()> {
    if !args.input_file.exists() {
        bail!("input file '{}' does not exist", args.input_file.display());
    }
    let count = dataset::convert_dataset(&args.input_file, &args.output_file, args.seed)
        .with_context(|| format!("converting {}", args.input_file.display()))?;
    println!(
        "Converted {} entries from '{}' to '{}'",
        count,
        args.input_file.display(),
        args.output_file.display()
    );
    Ok(())
}

fn cmd_convert_all(args: ConvertAllArgs) -> Result<()> {
    println!("Converting all benchmark files with seed: {}", args.seed);
    let outcomes = dataset::convert_all(&args.datasets_dir, args.seed);

    for outcome in &outcomes {
        match &outcome.status {
            ConversionStatus::Converted(n) => println!(
                "converted {} -> {} ({} entries)",
                outcome.input.display(),
                outcome.output.display(),
                n
            ),
            ConversionStatus::Missing => {
                println!("skipped {}: not found", outcome.input.display())
            }
            ConversionStatus::Failed(e) => {
                println!("failed {}: {}", outcome.input.display(), e)
            }
        }
    }

    let converted = outcomes.iter().filter(|o| o.is_success()).count();
    let failed = outcomes.len() - converted;
    println!("\nConversion summary:");
    println!("  Successfully converted: {} files", converted);
    println!("  Failed: {} files", failed);

    if failed > 0 {
        bail!("{} of {} dataset files were not converted", failed, outcomes.len());
    }
    Ok(())
}
