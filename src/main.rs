//! Currency Converter CLI - Convert amounts between currencies
//!
//! Fetches exchange rates from ExchangeRate-API, caches them in the user's
//! home directory for a day, and falls back to cached rates when offline.

use std::io;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use curconv::app;
use curconv::cache::RateCache;
use curconv::cli::{Action, Cli};
use curconv::config::Config;
use curconv::data::{HttpRateSource, RateProvider};

/// Sets up logging to stderr; `RUST_LOG` overrides the verbosity flag
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = format!("{level},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn");
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::from_cli(&cli);
    let action = Action::from_cli(&cli);
    let cache = RateCache::new(&config.cache_path);
    let mut stdout = io::stdout().lock();

    tracing::debug!(?action, cache = %config.cache_path.display(), "starting");

    match action {
        Action::Help => {
            Cli::command().print_help()?;
        }
        Action::ClearCache => {
            app::clear_cache(&cache, &mut stdout)?;
        }
        action => {
            let source = HttpRateSource::new(config.api_url.clone(), config.timeout)?;
            let provider = RateProvider::new(cache, source, config.ttl);
            app::run(&provider, &action, &mut stdout).await?;
        }
    }

    Ok(())
}
