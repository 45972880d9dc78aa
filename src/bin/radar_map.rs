//! Render the recent radar composite frames of one product as map images,
//! then assemble them into an animation.
//!
//! The pipeline is strictly per frame: query the window, skip frames whose
//! artifact already exists, otherwise fetch, decode, render and persist.
//! After the loop, artifacts that fell out of the window are deleted and the
//! remaining frames are handed to the external encoder.

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::Parser;
use log::info;
use radarcast::{
    encode_animation, ArtifactStore, Boundary, CompositeProduct, MapRenderer, QueryWindow,
    Radarcast,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "radar-map",
    about = "Render recent radar composite frames as map images and an animation."
)]
struct Args {
    /// Composite product to render (ry, rw or sf).
    #[arg(long, default_value = "ry")]
    product: CompositeProduct,

    /// Look-back from now, in minutes.
    #[arg(long, default_value_t = 60)]
    window_minutes: i64,

    /// Artifact file name prefix.
    #[arg(long, default_value = "radar")]
    prefix: String,

    /// Directory receiving frame images and the animation.
    #[arg(long, default_value = "out")]
    output_dir: PathBuf,

    /// Vector boundary file drawn as the map backdrop.
    #[arg(long, default_value = "countries/germany.geojson")]
    boundary: PathBuf,

    /// Frames per second of the assembled animation.
    #[arg(long, default_value_t = 2.0)]
    fps: f64,

    /// Re-render frames even when their artifact already exists.
    #[arg(long)]
    force: bool,

    /// Skip the animation assembly step.
    #[arg(long)]
    no_animation: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let client = Radarcast::new().await?;
    let window = QueryWindow::trailing(Utc::now(), Duration::minutes(args.window_minutes));
    info!(
        "Acquiring {} composite frames between {} and {}",
        args.product.label(),
        window.start,
        window.end
    );

    let items = client
        .composite()
        .query(args.product)
        .window(window)
        .call()
        .await?;
    info!("{} frame(s) listed inside the window", items.len());

    let boundary = Boundary::from_geojson(&args.boundary)
        .with_context(|| format!("loading boundary {}", args.boundary.display()))?;
    let renderer = MapRenderer::new(boundary);
    let mut store = ArtifactStore::new(&args.output_dir, &args.prefix, "png")?;

    for item in &items {
        let path = store.path_for(item.timestamp);
        if !args.force && store.is_cached(item.timestamp) {
            info!("Reusing cached frame {:?}", path);
            store.mark_produced(path);
            continue;
        }

        info!("Parsing composite data for {}", item.timestamp);
        let grid = client.composite().fetch_grid(item).await?;
        renderer.render(&grid, &path)?;
        store.mark_produced(path);
    }

    let removed = store.cleanup_stale()?;
    if !removed.is_empty() {
        info!("Removed {} stale artifact(s)", removed.len());
    }

    if !args.no_animation {
        let frames = store.produced();
        let animation = store.aggregate_path("webp");
        encode_animation(&frames, args.fps, &animation).await?;
        info!("Wrote animation {:?}", animation);
    }

    Ok(())
}
