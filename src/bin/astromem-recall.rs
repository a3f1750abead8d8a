//! astromem-recall - Run one neuron-astrocyte recall simulation
//!
//! # Usage
//!
//! ```bash
//! # Reference scenario (N=500, K=10, 10% corruption, 1000 steps)
//! astromem-recall --seed 7
//!
//! # Load a JSON config, override a field, log progress
//! astromem-recall --config run.json --corruption 0.2 -v
//!
//! # Small quick run
//! astromem-recall --n 64 --k 3 --memory 0 --steps 200
//! ```
//!
//! # Exit Codes
//!
//! - 0: The seeded memory was recalled exactly
//! - 1: Recall failed or the integration went non-finite
//! - 2: Invalid arguments or configuration

use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use astromem::{run_simulation_with, CpuBackend, ProgressLog, SimConfig};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let mut verbose = false;
    let mut config_path: Option<String> = None;
    let mut overrides: Vec<(String, String)> = Vec::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            "--config" | "--n" | "--k" | "--steps" | "--dt" | "--beta" | "--corruption"
            | "--memory" | "--seed" | "--progress" => match iter.next() {
                Some(value) if arg == "--config" => config_path = Some(value.clone()),
                Some(value) => overrides.push((arg.clone(), value.clone())),
                None => {
                    eprintln!("Error: {} needs a value\n", arg);
                    print_help();
                    return ExitCode::from(2);
                }
            },
            _ => {
                eprintln!("Unknown option: {}\n", arg);
                print_help();
                return ExitCode::from(2);
            }
        }
    }

    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let (config, progress_every) = match build_config(config_path.as_deref(), &overrides) {
        Ok(built) => built,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    let mut progress = ProgressLog::new(progress_every, config.num_steps);
    let outcome = match run_simulation_with(&config, &CpuBackend, &mut progress) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "N={} K={} memory={} corruption={} steps={} seed={}",
        config.n,
        config.k,
        config.memory_to_seed_from,
        config.corruption,
        config.num_steps,
        outcome.seed.map_or_else(|| "-".to_string(), |s| s.to_string()),
    );
    println!("{}", outcome.report);

    if outcome.report.recalled() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Start from the JSON file (or the defaults), apply flag overrides, validate.
fn build_config(
    path: Option<&str>,
    overrides: &[(String, String)],
) -> anyhow::Result<(SimConfig, u64)> {
    let mut config = match path {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path))?,
        None => SimConfig::default(),
    };
    let mut progress_every = 100;

    for (flag, value) in overrides {
        match flag.as_str() {
            "--n" => config.n = parse(flag, value)?,
            "--k" => config.k = parse(flag, value)?,
            "--steps" => config.num_steps = parse(flag, value)?,
            "--dt" => config.dt = parse(flag, value)?,
            "--beta" => config.beta = parse(flag, value)?,
            "--corruption" => config.corruption = parse(flag, value)?,
            "--memory" => config.memory_to_seed_from = parse(flag, value)?,
            "--seed" => config.seed = Some(parse(flag, value)?),
            "--progress" => progress_every = parse(flag, value)?,
            _ => return Err(anyhow!("unknown option {}", flag)),
        }
    }

    config.validate().context("invalid configuration")?;
    Ok((config, progress_every))
}

fn parse<T>(flag: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("invalid value for {}: {:?}", flag, value))
}

fn print_help() {
    eprintln!("astromem-recall - Neuron-astrocyte associative memory recall");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    astromem-recall [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    --config <FILE>       JSON run config (missing fields use defaults)");
    eprintln!("    --n <N>               Neuron count");
    eprintln!("    --k <K>               Stored memory count");
    eprintln!("    --steps <STEPS>       Euler steps");
    eprintln!("    --dt <DT>             Step size");
    eprintln!("    --beta <BETA>         Nonlinearity gain");
    eprintln!("    --corruption <P>      Flip probability for the seed memory, in [0, 1]");
    eprintln!("    --memory <M>          Memory index to recall");
    eprintln!("    --seed <SEED>         RNG seed (random if omitted)");
    eprintln!("    --progress <EVERY>    Log progress every EVERY steps with -v (0 = final only)");
    eprintln!("    -v, --verbose         Log run progress");
    eprintln!("    -h, --help            Print this help message");
    eprintln!();
    eprintln!("EXIT CODES:");
    eprintln!("    0    Memory recalled exactly");
    eprintln!("    1    Memory not recalled, or the integration failed");
    eprintln!("    2    Invalid arguments or configuration");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    astromem-recall --seed 7                 Reference scenario");
    eprintln!("    astromem-recall --config run.json -v     Configured run with progress");
}
