mod analytics;
mod config;
mod db;
mod error;
mod ledger;
mod logging;
mod models;
mod run;
mod store;

use anyhow::Result;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config, rest) = config::Config::from_args(&args)?;
    logging::setup_logging(config.verbose);

    tracing::debug!(db = %config.db_path.display(), as_of = %config.as_of, "starting");
    let mut db = db::Database::open(&config.db_path)?;
    run::as_cli(&rest, &config, &mut db)
}
