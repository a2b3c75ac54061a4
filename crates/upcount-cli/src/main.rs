use clap::{Parser as ClapParser, ValueEnum};
use log::info;
use miette::{IntoDiagnostic, Result, bail};
use std::path::{Path, PathBuf};
use upcount::{
    DEFAULT_GATE_DELAY, SCENARIOS, Scenario, ScenarioReport, SettlePolicy, TestbenchConfig,
    Timing, find_scenario,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Settle {
    /// Sample a fixed delay after each change
    Fixed,
    /// Sample shortly after the next falling clock edge
    FallingEdge,
}

#[derive(ClapParser)]
#[command(name = "upcount", version, about = "Run the up-counter acceptance scenarios")]
struct Cli {
    /// TOML file with clock, reset, timing and settle settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulate with output propagation delay (gate-level timing)
    #[arg(long, env = "GATES", value_parser = parse_gates, num_args = 0..=1, default_missing_value = "yes")]
    gates: Option<bool>,

    /// Propagation delay used with --gates; defaults to the config's delay,
    /// else 3
    #[arg(long)]
    gate_delay: Option<u64>,

    /// Settle policy; defaults to falling-edge with --gates, else the config's
    #[arg(long, value_enum)]
    settle: Option<Settle>,

    /// Run only the named scenario (repeatable)
    #[arg(long = "scenario")]
    scenarios: Vec<String>,

    /// Directory for one VCD trace per scenario
    #[arg(long)]
    vcd: Option<PathBuf>,

    /// Print a JSON report instead of one line per scenario
    #[arg(long)]
    json: bool,

    /// List registered scenarios and exit
    #[arg(long)]
    list: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_gates(value: &str) -> std::result::Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "1" | "true" | "on" => Ok(true),
        "no" | "0" | "false" | "off" | "" => Ok(false),
        other => Err(format!("expected yes or no, got '{other}'")),
    }
}

fn build_config(cli: &Cli) -> Result<TestbenchConfig> {
    let mut config = match &cli.config {
        Some(path) => TestbenchConfig::load(path).into_diagnostic()?,
        None => TestbenchConfig::default(),
    };
    // Keep the configured settle delay when switching policy
    let settle_delay = match config.settle {
        SettlePolicy::Fixed { delay } | SettlePolicy::FallingEdge { delay } => delay,
    };
    if cli.gates.unwrap_or(false) {
        let delay = match (cli.gate_delay, config.timing) {
            (Some(delay), _) => delay,
            (None, Timing::Delayed { delay }) => delay,
            (None, Timing::Ideal) => DEFAULT_GATE_DELAY,
        };
        config.timing = Timing::Delayed { delay };
        config.settle = SettlePolicy::FallingEdge {
            delay: settle_delay,
        };
    }
    match cli.settle {
        Some(Settle::Fixed) => config.settle = SettlePolicy::Fixed { delay: settle_delay },
        Some(Settle::FallingEdge) => {
            config.settle = SettlePolicy::FallingEdge { delay: settle_delay }
        }
        None => {}
    }
    config.validate().into_diagnostic()?;
    Ok(config)
}

fn select_scenarios(names: &[String]) -> Result<Vec<&'static Scenario>> {
    if names.is_empty() {
        return Ok(SCENARIOS.iter().collect());
    }
    let mut selected = Vec::new();
    for name in names {
        match find_scenario(name) {
            Some(scenario) => selected.push(scenario),
            None => bail!("Unknown scenario '{}'", name),
        }
    }
    Ok(selected)
}

fn run_scenarios(
    scenarios: &[&'static Scenario],
    config: &TestbenchConfig,
    vcd_dir: Option<&Path>,
) -> Result<Vec<ScenarioReport>> {
    let mut reports = Vec::new();
    for scenario in scenarios {
        let vcd_path = vcd_dir.map(|dir| dir.join(format!("{}.vcd", scenario.name)));
        let report = scenario
            .run(config, vcd_path.as_deref())
            .into_diagnostic()?;
        reports.push(report);
    }
    Ok(reports)
}

/// Fails, and so exits non-zero, when any scenario failed.
fn check_reports(reports: &[ScenarioReport]) -> Result<()> {
    let failed = reports.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        bail!("{} of {} scenarios failed", failed, reports.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    if cli.list {
        for scenario in SCENARIOS {
            println!("{:<20} {}", scenario.name, scenario.description);
        }
        return Ok(());
    }

    let config = build_config(&cli)?;
    info!("config: {:?}", config);
    let scenarios = select_scenarios(&cli.scenarios)?;

    if let Some(dir) = &cli.vcd {
        std::fs::create_dir_all(dir).into_diagnostic()?;
    }

    let reports = run_scenarios(&scenarios, &config, cli.vcd.as_deref())?;

    if cli.json {
        let json = serde_json::to_string_pretty(&reports).into_diagnostic()?;
        println!("{json}");
    } else {
        for report in &reports {
            match &report.error {
                None => println!(
                    "PASS {} ({} checks, t={})",
                    report.name, report.checkpoints, report.end_time
                ),
                Some(err) => println!("FAIL {}: {}", report.name, err),
            }
        }
    }

    check_reports(&reports)
}
