//! # Taxonomy Export
//!
//! One-shot pull of the full species list for offline checks.
//!
//! ## Steps
//! 1. Load the same config as the server (URL, service key, timeout).
//!
//! 2. Fetch species from the species view, optionally restricted to one family.
//!
//! 3. Print red list coverage: how many species have a code, how they spread over the categories, and which
//!    codes are not part of the standard set.
//!
//! 4. Organize into the Order > Family > Genus tree, optionally sorted, and write it as pretty JSON.
//!
//! ## Notes
//! - Species whose red list category has no code in the catalog come back without one, so they show up as
//!   missing in the report. The server logs a warning for each.
use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use server::{
    config::Config,
    database::{PostgrestSource, SpeciesSource},
};
use taxa::{OrderGroup, organize, sort_alphabetically};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod coverage;

use coverage::RedListCoverage;

pub async fn export_taxonomy(
    output: &Path,
    familia: Option<&str>,
    sort: bool,
) -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load().context("Environment misconfigured")?;
    let source = PostgrestSource::new(
        &config.supabase_url,
        &config.supabase_key,
        config.request_timeout,
    )
    .context("Failed to build data source client")?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("Invalid progress template")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(match familia {
        Some(familia) => format!("Fetching species of {familia}"),
        None => "Fetching species".to_string(),
    });

    let species = source
        .list_species(familia)
        .await
        .context("Failed to fetch species")?;

    spinner.finish_with_message(format!("Fetched {} species", species.len()));

    println!("\n{}", RedListCoverage::from_species(&species));

    let mut orders = organize(&species);
    if sort {
        sort_alphabetically(&mut orders);
    }

    write_tree(output, &orders)?;
    info!("Wrote {} orders to {}", orders.len(), output.display());

    Ok(())
}

pub fn write_tree(output: &Path, orders: &[OrderGroup]) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(orders).context("Failed to serialize taxonomy")?;

    fs::write(output, json).with_context(|| format!("Failed to write {}", output.display()))
}
