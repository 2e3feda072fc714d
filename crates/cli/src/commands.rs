//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("virtbench")
        .about("Synthetic virtio vs emulated device benchmark")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Config file (default: virtbench.toml, if present)")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Debug logging")
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only warnings and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_run())
        .subcommand(build_analyze())
        .subcommand(build_init_config())
}

fn build_run() -> Command {
    Command::new("run")
        .about("Run the virtio and emulated profiles and save the results")
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Results file (default: results.json)"),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .help("Comparison table file (default: comparison_report.txt)"),
        )
        .arg(
            Arg::new("quick")
                .long("quick")
                .help("Skip the simulated delays")
                .action(ArgAction::SetTrue),
        )
}

fn build_analyze() -> Command {
    Command::new("analyze")
        .about("Load saved results and write the detailed report and an SVG chart")
        .arg(
            Arg::new("input")
                .long("input")
                .short('i')
                .help("Results file (default: results.json)"),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .help("Detailed report file (default: detailed_analysis.txt)"),
        )
        .arg(
            Arg::new("chart")
                .long("chart")
                .help("Chart file, always written as SVG (default: virtualization_comparison.svg)"),
        )
        .arg(
            Arg::new("open")
                .long("open")
                .help("Open the SVG chart in the desktop's default viewer")
                .action(ArgAction::SetTrue),
        )
}

fn build_init_config() -> Command {
    Command::new("init-config")
        .about("Write a commented default config file")
        .arg(
            Arg::new("path")
                .long("path")
                .help("Destination (default: virtbench.toml)"),
        )
        .arg(
            Arg::new("effective")
                .long("effective")
                .help("Write the settings currently in effect, replacing any existing file")
                .action(ArgAction::SetTrue),
        )
}
