use std::path::PathBuf;

use clap::Parser;
use lumber_optimizer::job::{self, Job};
use lumber_optimizer::render;
use lumber_optimizer::types::Unit;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "lumber_optimizer",
    about = "Raw lumber purchase and cut planner with lamination and offcut reuse"
)]
struct Cli {
    /// JSON job file with parts, stocks and settings
    #[arg(long)]
    input: Option<PathBuf>,

    /// Finished parts as NAME:TxWxL:QTY (e.g. Leg:45x45x700:4)
    #[arg(long = "part", num_args = 1..)]
    parts: Vec<String>,

    /// Raw stock sizes as NAME:TxWxL (e.g. 2x4:38x89x2440)
    #[arg(long = "stock", num_args = 1..)]
    stocks: Vec<String>,

    /// Extra thickness reserved for planing
    #[arg(long)]
    thickness_allowance: Option<f64>,

    /// Extra width reserved for jointing
    #[arg(long)]
    width_allowance: Option<f64>,

    /// Saw blade kerf
    #[arg(long)]
    kerf: Option<f64>,

    /// Unit of every dimension: mm or inch
    #[arg(long, value_parser = parse_unit)]
    unit: Option<Unit>,

    /// Maximum pieces glued along one axis (unlimited by default)
    #[arg(long)]
    max_layers: Option<u32>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Show an ASCII layout of each board
    #[arg(long)]
    layout: bool,

    /// Log rejected stock and assignment decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_unit(s: &str) -> Result<Unit, String> {
    match s {
        "mm" | "metric" => Ok(Unit::Mm),
        "inch" | "in" | "imperial" => Ok(Unit::Inch),
        _ => Err(format!("invalid unit '{}', expected: mm or inch", s)),
    }
}

fn build_job(cli: &Cli) -> Result<Job, job::JobError> {
    let mut job = match &cli.input {
        Some(path) => Job::from_path(path)?,
        None => Job::default(),
    };

    for spec in &cli.parts {
        job.parts.push(job::parse_part(spec)?);
    }
    for spec in &cli.stocks {
        job.stocks.push(job::parse_stock(spec)?);
    }
    job.assign_missing_ids();

    if let Some(v) = cli.thickness_allowance {
        job.settings.thickness_allowance = v;
    }
    if let Some(v) = cli.width_allowance {
        job.settings.width_allowance = v;
    }
    if let Some(v) = cli.kerf {
        job.settings.kerf = v;
    }
    if let Some(unit) = cli.unit {
        job.settings.unit = unit;
    }
    if let Some(max_layers) = cli.max_layers {
        job.config.max_layers = Some(max_layers);
    }
    Ok(job)
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let job = build_job(&cli).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let result = job.run().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if cli.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", render::render_plan(&result, job.settings.unit, cli.layout));
    }
}
