//! virtbench: synthetic virtio vs emulated device benchmark.
//!
//! - `virtbench run`: run both profiles, print the comparison table, save results
//! - `virtbench analyze`: load saved results, write the detailed report and chart
//! - `virtbench init-config`: write a commented `virtbench.toml`

mod commands;

use std::path::{Path, PathBuf};
use std::process;

use clap::ArgMatches;
use tracing::{error, info, warn, Level};
use virtbench_core::{BenchConfig, TimingConfig, CONFIG_FILE_NAME};
use virtbench_harness::{CancellationToken, ComparisonSuite};
use virtbench_report::{
    load_results, open_in_viewer, save_results, write_comparison_report, write_detailed_report,
    ChartRenderer,
};

use commands::build_cli;

fn main() {
    let matches = build_cli().get_matches();
    let Some((name, sub)) = matches.subcommand() else {
        process::exit(2);
    };

    init_logging(sub);

    if name == "init-config" && !sub.get_flag("effective") {
        process::exit(run_init_config(sub));
    }

    let mut config = match load_config(sub) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let exit_code = match name {
        "run" => {
            apply_run_overrides(&mut config, sub);
            run_suite(&config)
        }
        "analyze" => {
            apply_analyze_overrides(&mut config, sub);
            run_analyze(&config, sub.get_flag("open"))
        }
        "init-config" => run_write_effective(&config, &init_config_path(sub)),
        _ => 2,
    };
    process::exit(exit_code);
}

fn init_logging(matches: &ArgMatches) {
    let level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else if matches.get_flag("quiet") {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<BenchConfig, String> {
    match matches.get_one::<String>("config") {
        Some(path) => BenchConfig::from_file(Path::new(path))
            .map_err(|e| format!("Failed to load config {}: {}", path, e)),
        None => BenchConfig::load_or_default(Path::new(CONFIG_FILE_NAME))
            .map_err(|e| format!("Failed to load {}: {}", CONFIG_FILE_NAME, e)),
    }
}

fn apply_run_overrides(config: &mut BenchConfig, matches: &ArgMatches) {
    if let Some(path) = matches.get_one::<String>("output") {
        config.results_path = PathBuf::from(path);
    }
    if let Some(path) = matches.get_one::<String>("report") {
        config.report_path = PathBuf::from(path);
    }
    if matches.get_flag("quick") {
        config.timings = TimingConfig::instant();
    }
}

fn apply_analyze_overrides(config: &mut BenchConfig, matches: &ArgMatches) {
    if let Some(path) = matches.get_one::<String>("input") {
        config.results_path = PathBuf::from(path);
    }
    if let Some(path) = matches.get_one::<String>("report") {
        config.detailed_report_path = PathBuf::from(path);
    }
    if let Some(path) = matches.get_one::<String>("chart") {
        config.chart_path = PathBuf::from(path);
    }
}

/// Ctrl-C cancels the token; the suite notices within one pause slice.
fn install_interrupt_handler(cancel: &CancellationToken) {
    let token = cancel.clone();
    let installed = ctrlc::set_handler(move || {
        warn!("Interrupt received, stopping after cleanup");
        token.cancel();
    });
    if let Err(e) = installed {
        warn!(error = %e, "Could not install Ctrl-C handler");
    }
}

fn run_suite(config: &BenchConfig) -> i32 {
    let cancel = CancellationToken::new();
    install_interrupt_handler(&cancel);
    run_suite_with(config, cancel)
}

fn run_suite_with(config: &BenchConfig, cancel: CancellationToken) -> i32 {
    let suite = ComparisonSuite::new(config, cancel);
    let records = match suite.run() {
        Ok(records) => records,
        Err(e) if e.is_interrupted() => {
            eprintln!("Interrupted");
            return 1;
        }
        Err(e) => {
            error!(error = %e, "Benchmark failed");
            return 1;
        }
    };

    match write_comparison_report(&records, &config.report_path) {
        Ok(text) => {
            println!("{}", text);
            info!(path = %config.report_path.display(), "Comparison report written");
        }
        Err(e) if e.is_insufficient_data() => println!("{}", e),
        Err(e) => {
            error!(error = %e, "Failed to write comparison report");
            return 1;
        }
    }

    match save_results(&records, &config.results_path) {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

fn run_analyze(config: &BenchConfig, open: bool) -> i32 {
    let document = match load_results(&config.results_path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };
    if document.metrics.len() == 2 && !document.is_conventionally_ordered() {
        warn!(
            path = %config.results_path.display(),
            "Records are not in [virtio, emulated] order; improvements are relative to slot 1"
        );
    }

    // Each consumer checks the record count on its own
    match write_detailed_report(&document.metrics, &config.detailed_report_path) {
        Ok(text) => println!("{}", text),
        Err(e) if e.is_insufficient_data() => println!("Detailed report: {}", e),
        Err(e) => {
            error!(error = %e, "Failed to write detailed report");
            return 1;
        }
    }

    match ChartRenderer::new().render(&document.metrics, &config.chart_path) {
        Ok(()) => {
            println!("Chart saved to {}", config.chart_path.display());
            if open {
                if let Err(e) = open_in_viewer(&config.chart_path) {
                    warn!(error = %e, "Could not open chart viewer");
                }
            }
        }
        Err(e) if e.is_insufficient_data() => println!("Chart: {}", e),
        Err(e) => {
            error!(error = %e, "Failed to render chart");
            return 1;
        }
    }
    0
}

fn init_config_path(matches: &ArgMatches) -> PathBuf {
    matches
        .get_one::<String>("path")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

fn run_write_effective(config: &BenchConfig, path: &Path) -> i32 {
    match config.write_to_file(path) {
        Ok(()) => {
            println!("Wrote effective settings to {}", path.display());
            0
        }
        Err(e) => {
            eprintln!("Failed to write {}: {}", path.display(), e);
            1
        }
    }
}

fn run_init_config(matches: &ArgMatches) -> i32 {
    let path = init_config_path(matches);

    match BenchConfig::write_default_if_missing(&path) {
        Ok(true) => {
            println!("Wrote {}", path.display());
            0
        }
        Ok(false) => {
            println!("{} already exists, left unchanged", path.display());
            0
        }
        Err(e) => {
            eprintln!("Failed to write {}: {}", path.display(), e);
            1
        }
    }
}
