use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use quote_core::{Estimator, RateTable};
use quote_data::RateTableLoader;

/// Print the estimate for every service and timeline in a rate table.
///
/// The CSV file should have the following columns:
/// - service_id: identifier matching the projectType answer (e.g. site-web)
/// - base_price: price in euros, per hour for hourly services
/// - timeline_label: label shown for a standard timeline
/// - is_hourly: true/false
/// - urgent_multiplier: factor for urgent requests (e.g. 1.3)
/// - flexible_discount: factor for flexible requests (e.g. 0.9)
#[derive(Parser, Debug)]
#[command(name = "quote-rates")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV rate table. The built-in table is used when omitted.
    #[arg(short, long)]
    file: Option<PathBuf>,
}

const TIMELINES: [&str; 3] = ["standard", "urgent", "flexible"];

fn main() -> Result<()> {
    let args = Args::parse();

    let table = match &args.file {
        Some(path) => {
            println!("Loading rates from: {}", path.display());
            RateTableLoader::load_file(path)
                .with_context(|| format!("Failed to load rate table: {}", path.display()))?
        }
        None => RateTable::default(),
    };

    println!("{} services\n", table.len());
    let estimator = Estimator::new(&table);

    for service_id in table.service_ids() {
        println!("{service_id}");
        for timeline in TIMELINES {
            let estimate = estimator
                .estimate(service_id, timeline)
                .with_context(|| format!("No estimate for '{service_id}'"))?;
            println!("  {timeline:<10} {estimate}");
        }
    }

    Ok(())
}
