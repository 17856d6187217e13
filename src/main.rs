mod app;
mod cli;
mod config;
mod consts;
mod directions;
mod error;
mod sink;
mod utils;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use config::{Config, Settings};
use directions::{GoogleDirections, is_placeholder_key};
use sink::CsvFileSink;

fn main() -> ExitCode {
    let cli = Cli::parse();
    utils::logging::init(cli.debug);

    let settings = match Config::load(cli.config.as_deref())
        .and_then(|c| Settings::resolve(&cli, c))
    {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(
        log_file = %settings.log_file.display(),
        schema = settings.schema.name(),
        log_failures = settings.log_failures,
        "resolved settings"
    );

    // Timestamp is taken before the request, matching when the route was timed.
    let now = settings.timezone.now();
    let provider = GoogleDirections::new(settings.timeout);
    let mut sink = CsvFileSink::new(settings.log_file.clone(), settings.schema);

    let report = app::run(&settings, &provider, &mut sink, now);
    tracing::debug!(
        fetched = report.outcome.is_ok(),
        logged = report.logged,
        "run finished"
    );

    println!("\nDone.");
    if is_placeholder_key(&settings.api_key) {
        println!(
            "Note: no Google Maps API key is configured. Set api_key in ~/.config/routelog/config.toml or pass --config <PATH>."
        );
    }
    ExitCode::SUCCESS
}
