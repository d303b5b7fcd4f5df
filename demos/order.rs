//! Order Example
//!
//! Loads a catalog, lists the active products and places a single order.
//!
//! Use `-c` to load a catalog file (defaults to `fixtures/catalog.yml`)
//! Use `-l NAME=QUANTITY` to add an order line; repeat for more lines

use std::{
    io::{self, Write},
    time::Instant,
};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tabled::{builder::Builder, settings::Style};
use tracing_subscriber::EnvFilter;

use storefront::{
    catalog::CatalogConfig,
    store::{OrderLine, Store},
    utils::ExampleOrderArgs,
};

/// Order Example
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new("info")),
        )
        .init();

    let args = ExampleOrderArgs::parse();

    let mut store = CatalogConfig::from_path(&args.catalog)?.build()?;

    let lines = args
        .lines
        .iter()
        .map(|line| line.resolve(&store))
        .collect::<Result<Vec<OrderLine>, _>>()?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    write_catalog(&mut handle, &store)?;

    if lines.is_empty() {
        writeln!(handle, "\nNo order lines given, nothing to order.")?;

        return Ok(());
    }

    let start = Instant::now();
    let receipt = store.checkout(lines)?;
    let elapsed = start.elapsed();

    writeln!(handle)?;
    receipt.write_to(&mut handle)?;

    writeln!(
        handle,
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    writeln!(handle)?;
    write_catalog(&mut handle, &store)?;

    Ok(())
}

fn write_catalog(mut out: impl Write, store: &Store<'_>) -> Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["#", "Product", "Price", "Quantity", "Promotion"]);

    for (idx, (_, product)) in store.active_products().into_iter().enumerate() {
        builder.push_record([
            (idx + 1).to_string(),
            product.name().to_string(),
            product.price().to_string(),
            product.quantity().to_string(),
            product
                .promotion()
                .map_or_else(|| "no promotion".to_string(), |p| p.name().to_string()),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());

    writeln!(out, "{table}")?;
    writeln!(out, " Total quantity in store: {}", store.total_quantity())?;

    Ok(())
}
