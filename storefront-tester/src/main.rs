mod logic;
mod scenarios;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use storefront_core::StorefrontConfig;

use logic::{LogicTester, ScenarioResult, TesterAssets};
use scenarios::{SCENARIO_KEYS, get_scenario, list_scenarios};
use util::{parse_seeds, split_csv};

#[derive(Debug, Parser)]
#[command(name = "storefront-tester", version = "0.1.0")]
#[command(
    about = "Automated QA for the storefront - seeded browsing sessions against the category window and cart"
)]
struct Args {
    /// Scenarios to run (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated, decimal or 0x hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Storefront config JSON to use instead of the bundled one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let assets = Arc::new(load_assets(&args)?);
    let scenarios = expand_scenarios(&args.scenarios);
    let seeds = parse_seeds(&split_csv(&args.seeds))?;
    log::info!(
        "running {} scenario(s) over {} seed(s), {} iteration(s) each",
        scenarios.len(),
        seeds.len(),
        args.iterations
    );

    let results = run_scenarios(&args, &scenarios, &seeds, assets);
    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:20} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🛒 Storefront Automated Tester".bright_cyan().bold());
    println!("{}", "==============================".cyan());
}

fn load_assets(args: &Args) -> Result<TesterAssets> {
    let Some(path) = args.config.as_ref() else {
        return TesterAssets::load_default();
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = StorefrontConfig::from_json(&json)
        .with_context(|| format!("invalid storefront config {}", path.display()))?;
    TesterAssets::load_with_config(config)
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s.eq_ignore_ascii_case("all")) {
        scenarios.retain(|s| !s.eq_ignore_ascii_case("all"));
        for key in SCENARIO_KEYS {
            if !scenarios.iter().any(|s| s == key) {
                scenarios.push(key.to_string());
            }
        }
    }
    scenarios
}

fn run_scenarios(
    args: &Args,
    scenarios: &[String],
    seeds: &[u64],
    assets: Arc<TesterAssets>,
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Browsing Sessions".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let tester = LogicTester::new(assets, args.verbose);
    let mut results = Vec::new();
    for scenario_name in scenarios {
        let Some(scenario) = get_scenario(scenario_name) else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
            continue;
        };
        results.extend(tester.run_scenario(&scenario, seeds, args.iterations));
    }
    results
}

fn write_reports(
    args: &Args,
    results: &[ScenarioResult],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, results)?,
        _ => logic::reports::generate_console_report(
            &mut output_target,
            results,
            start_time.elapsed(),
        )?,
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
