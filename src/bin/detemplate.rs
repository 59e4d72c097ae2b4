//! Command-line interface for detemplate
//! Rewrites template literals in the given files (or the configured targets) into
//! string concatenation.
//!
//! Usage:
//!   detemplate                                  - Convert the configured targets in place
//!   detemplate `<paths>...`                     - Convert the given files instead
//!   detemplate --strategy scanner `<path>`      - Use the brace-aware scanner
//!   detemplate --output stdout `<path>`         - Print the result, write nothing

use clap::{Arg, ArgAction, Command};
use detemplate::{Runner, COMPLETION_MESSAGE};
use detemplate_config::{Loader, Setting};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("detemplate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rewrite template literals into string concatenation")
        .arg(
            Arg::new("paths")
                .help("Files to convert (default: targets.paths from configuration)")
                .num_args(0..)
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("strategy")
                .long("strategy")
                .short('s')
                .help("Conversion strategy")
                .value_parser(["regex", "scanner"]),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Where converted text goes")
                .value_parser(["in-place", "suffix", "stdout"]),
        )
        .arg(
            Arg::new("suffix")
                .long("suffix")
                .allow_hyphen_values(true)
                .help("Suffix inserted before the extension in suffix mode (e.g., '-fixed')"),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .short('r')
                .help("Summary format printed after a successful run")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log each converted file")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    let mut loader = Loader::new().with_project_dir(".");
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    for setting in Setting::ALL {
        if let Some(value) = matches.get_one::<String>(setting.flag()) {
            loader = loader
                .with_setting(setting, value)
                .unwrap_or_else(|e| fail(format!("Invalid --{}: {}", setting.flag(), e)));
        }
    }
    let config = loader
        .build()
        .unwrap_or_else(|e| fail(format!("Configuration error: {}", e)));

    let mut runner = Runner::from_config(&config);
    if let Some(paths) = matches.get_many::<String>("paths") {
        runner = runner.with_targets(paths.map(PathBuf::from));
    }

    let report = runner.run().unwrap_or_else(|e| fail(e.to_string()));

    // With --output stdout the converted text owns stdout.
    let to_stderr = matches!(runner.output(), detemplate::OutputMode::Stdout);
    let summary = match matches.get_one::<String>("report").map(String::as_str) {
        Some("json") => report
            .to_json()
            .unwrap_or_else(|e| fail(format!("Error formatting report: {}", e))),
        _ => COMPLETION_MESSAGE.to_string(),
    };
    if to_stderr {
        eprintln!("{}", summary);
    } else {
        println!("{}", summary);
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn fail(message: String) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}
