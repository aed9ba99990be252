//! Bodega Store CLI

use std::{io, path::PathBuf};

use anyhow::Context as _;
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use bodega::{
    catalog::load_inventory, console::ConsoleIo, fixtures, membership::Membership,
    session::Session,
};

/// Command-line options for the store front end.
#[derive(Debug, Parser)]
#[command(name = "bodega", about = "W Convenience Store checkout", long_about = None)]
struct Cli {
    /// Path to the product catalog; defaults to the built-in one
    #[arg(long, requires = "promotions")]
    products: Option<PathBuf>,

    /// Path to the promotion catalog; defaults to the built-in one
    #[arg(long, requires = "products")]
    promotions: Option<PathBuf>,

    /// Business date used for promotion windows, e.g. 2026-08-25
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let inventory = if let (Some(products), Some(promotions)) = (&cli.products, &cli.promotions) {
        load_inventory(products, promotions).context("failed to load the catalog files")?
    } else {
        fixtures::builtin_inventory().context("the built-in catalog failed to load")?
    };

    let today = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let console = ConsoleIo::new(io::stdin().lock(), io::stdout().lock());

    Session::new(inventory, Membership::standard(), today, console)
        .run()
        .context("checkout session failed")
}
