#![deny(warnings)]

//! Headless CLI: evaluate a nursery scenario and print the projection.

mod report;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use nursery_core::RiskScenario;
use nursery_runtime::{EngineConfig, ProjectionEngine, DEFAULT_HORIZON_YEARS, MAX_HORIZON_YEARS};
use scenario_kit::{PresetLibrary, ScenarioFile};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: nursery [OPTIONS]

Options:
  --preset <id>          Built-in or loaded preset to evaluate (default: direct)
  --scenario <path>      Scenario file (.yaml, .yml or .json) to evaluate
  --presets-dir <dir>    Load additional presets from a directory
  --risk <scenario>      Override the risk: none, drought or pest
  --years <n>            Outlook horizon in years, 1 to 100 (default: 5)
  --start <YYYY-MM-DD>   First day of operation, used to date the payback
  --stress               Compare every risk scenario against the base
  --json                 Print machine-readable JSON instead of a report
  --list                 List available presets
  --version              Print version information
  -h, --help             Print this help";

#[derive(Debug, Default, PartialEq)]
struct Args {
    preset: Option<String>,
    scenario: Option<PathBuf>,
    presets_dir: Option<PathBuf>,
    risk: Option<RiskScenario>,
    years: Option<u32>,
    start: Option<NaiveDate>,
    stress: bool,
    json: bool,
    list: bool,
    version: bool,
    help: bool,
}

fn value(flag: &str, v: Option<String>) -> Result<String> {
    v.with_context(|| format!("{flag} expects a value"))
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut parsed = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--preset" => parsed.preset = Some(value(&arg, it.next())?),
            "--scenario" => parsed.scenario = Some(value(&arg, it.next())?.into()),
            "--presets-dir" => parsed.presets_dir = Some(value(&arg, it.next())?.into()),
            "--risk" => parsed.risk = Some(value(&arg, it.next())?.parse()?),
            "--years" => {
                let years: u32 = value(&arg, it.next())?
                    .parse()
                    .context("--years expects a whole number")?;
                if years == 0 || years > MAX_HORIZON_YEARS {
                    bail!("--years must be between 1 and {MAX_HORIZON_YEARS}");
                }
                parsed.years = Some(years);
            }
            "--start" => {
                let text = value(&arg, it.next())?;
                let date = NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                    .map_err(|e| anyhow!("invalid --start date {text}: {e}"))?;
                parsed.start = Some(date);
            }
            "--stress" => parsed.stress = true,
            "--json" => parsed.json = true,
            "--list" => parsed.list = true,
            "--version" => parsed.version = true,
            "-h" | "--help" => parsed.help = true,
            other => bail!("unknown argument: {other}\n\n{USAGE}"),
        }
    }
    if parsed.preset.is_some() && parsed.scenario.is_some() {
        bail!("--preset and --scenario are mutually exclusive");
    }
    Ok(parsed)
}

fn main() -> Result<()> {
    // Logs go to stderr so that --json output stays clean
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }
    if args.version {
        println!(
            "nursery {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }
    info!(preset = ?args.preset, scenario = ?args.scenario, risk = ?args.risk, "starting CLI");

    let mut library = PresetLibrary::builtin().context("loading built-in presets")?;
    if let Some(dir) = &args.presets_dir {
        library
            .load_dir(dir)
            .with_context(|| format!("loading presets from {}", dir.display()))?;
    }
    if args.list {
        for p in library.iter() {
            println!("{:<12} {}", p.id, p.name);
        }
        return Ok(());
    }

    let mut file = match &args.scenario {
        Some(path) => ScenarioFile::load(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => library
            .get(args.preset.as_deref().unwrap_or("direct"))?
            .clone(),
    };
    if let Some(risk) = args.risk {
        file.scenario.risk = risk;
    }

    let engine = ProjectionEngine::new(EngineConfig {
        horizon_years: args.years.unwrap_or(DEFAULT_HORIZON_YEARS),
        start_date: args.start,
    });

    if args.stress {
        let results = engine.stress_test(&file.scenario)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
        } else {
            print!("{}", report::render_stress(&file, &results));
        }
        return Ok(());
    }

    let evaluation = engine.evaluate(&file.scenario)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        print!("{}", report::render(&file, &evaluation));
    }
    Ok(())
}
