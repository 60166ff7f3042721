//! Storefront checkout runner

use std::{io, process::ExitCode};

use clap::Parser;
use storefront::fixtures::Fixture;
use tracing::error;

use crate::{config::Config, scenario::ScenarioError};

mod config;
mod logging;
mod scenario;

fn main() -> ExitCode {
    let config = Config::parse();

    if let Err(error) = logging::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Failed to initialise logging: {error}");
        }

        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "storefront run failed");

            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), ScenarioError> {
    let mut fixture = Fixture::with_base_path(config.fixtures.clone());

    fixture
        .load_products(&config.set)?
        .load_customers(&config.set)?;

    let mut stdout = io::stdout().lock();

    scenario::run(fixture, &mut stdout)
}
