//! One-shot connectivity probe

use anyhow::{Context, Result};
use clap::Parser;

use folio_server::{ConnectionCache, PgConnector};

use crate::config::DbArgs;

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Acquire one connection and report the outcome
pub async fn run_check(args: CheckArgs) -> Result<()> {
    let connector = PgConnector::new(args.db.db_options());
    let cache = ConnectionCache::with_options(connector, args.db.cache_options());

    cache
        .acquire()
        .await
        .context("Database check failed")?;

    println!("Database reachable");
    Ok(())
}
