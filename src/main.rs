use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use fircheck::config::{DeviceTarget, FirCheckConfig, SampleRadix};
use fircheck::device::{DeviceChannel, MockDevice, ProcessChannel};
use fircheck::output::{OutputFormat, create_formatter};
use fircheck::vector::load_vector;
use fircheck::{ValidationProfile, ValidationRunner};

#[derive(Parser, Debug)]
#[command(name = "fircheck")]
#[command(about = "Validate a FIR filter block across coefficient profiles", long_about = None)]
struct Args {
    /// Coefficient files, one profile each (run after profiles from --config)
    profiles: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Target hardware unit (control program name or path)
    #[arg(short = 'u', long)]
    unit: Option<DeviceTarget>,

    /// Input vector file
    #[arg(short = 'i', long)]
    vector: Option<PathBuf>,

    /// Radix for bare sample and coefficient literals
    #[arg(long, value_enum)]
    radix: Option<SampleRadix>,

    /// Settle time after the halt write in milliseconds
    #[arg(long)]
    settle_ms: Option<u64>,

    /// Number of input samples kept for comparison
    #[arg(long)]
    prefix_cap: Option<usize>,

    /// Use the in-memory mock device instead of the control program
    #[arg(long)]
    mock: bool,

    /// Output format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Exit with an error if any profile failed
    #[arg(long)]
    strict: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn build_config(args: &Args) -> anyhow::Result<FirCheckConfig> {
    let mut config = match args.config {
        Some(ref path) => FirCheckConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => FirCheckConfig::default(),
    };

    if let Some(ref unit) = args.unit {
        config.unit = unit.clone();
    }
    if let Some(ref vector) = args.vector {
        config.vector = vector.clone();
    }
    if let Some(radix) = args.radix {
        config.sample_radix = radix;
    }
    if let Some(ms) = args.settle_ms {
        config.registers.settle_ms = ms;
    }
    if let Some(cap) = args.prefix_cap {
        config.input_prefix_cap = cap;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = build_config(&args)?;

    let mut profiles = config.validation_profiles()?;
    profiles.extend(args.profiles.iter().map(ValidationProfile::from_file));
    if profiles.is_empty() {
        anyhow::bail!("No profiles given: pass coefficient files or a --config with [[profiles]]");
    }

    let vector = load_vector(&config.vector, config.sample_radix)
        .with_context(|| format!("Failed to load vector {}", config.vector.display()))?;

    let mut channel: Box<dyn DeviceChannel> = if args.mock {
        Box::new(MockDevice::with_addresses(
            config.registers.control_address,
            config.registers.coefficient_address,
        ))
    } else {
        Box::new(ProcessChannel::new(config.unit.clone(), config.sample_radix))
    };

    let mut runner = ValidationRunner::new(&config);
    let mut report = runner.run(&profiles, &vector.samples, channel.as_mut());
    report.malformed_vector_lines = vector.malformed_lines;

    let formatter = create_formatter(args.format, args.verbose > 0);
    let rendered = formatter.format(&report);
    match args.output {
        Some(ref path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write report {}", path.display()))?,
        None => print!("{}", rendered),
    }

    let skipped = report.total_skipped();
    if skipped > 0 {
        log::warn!("{} samples skipped across all profiles", skipped);
    }

    let failed: Vec<&str> = report.failed_profiles().map(|p| p.name.as_str()).collect();
    if !failed.is_empty() {
        eprintln!("{} of {} profiles failed: {}", failed.len(), report.profiles.len(), failed.join(", "));
        if args.strict {
            std::process::exit(1);
        }
    }

    Ok(())
}
