//! Render station point forecasts as an HTML table.
//!
//! Without arguments the station catalog is printed, mirroring the lookup
//! step a user needs before asking for concrete stations. With a
//! comma-separated id list the per-station series are fetched, pivoted into
//! a dense table with interpolated gaps, and written as one HTML document.

use anyhow::Context;
use clap::Parser;
use log::info;
use radarcast::{ForecastPage, MosmixType, Radarcast};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "forecast-table",
    about = "Render station point forecasts as an HTML table."
)]
struct Args {
    /// Comma-separated station ids (e.g. "10637,01001"). Prints the station
    /// catalog when omitted.
    stations: Option<String>,

    /// Forecast flavor (small or large).
    #[arg(long, default_value = "small")]
    mosmix_type: MosmixType,

    /// Output path of the rendered HTML document.
    #[arg(long, default_value = "dist/index.html")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let client = Radarcast::new().await?;

    let Some(list) = args.stations else {
        let catalog = client.stations().await?;
        print!("{}", catalog.format_table());
        return Ok(());
    };

    let ids: Vec<String> = list
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let series = client
        .forecast()
        .stations(&ids)
        .mosmix_type(args.mosmix_type)
        .call()
        .await?;
    let dense = series.dense()?;
    info!(
        "Dense series has {} rows over {} parameter(s)",
        dense.rows.len(),
        dense.parameters.len()
    );

    let html = ForecastPage::new(&dense).to_html();
    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&args.output, html)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!("Wrote forecast table to {:?}", args.output);

    Ok(())
}
