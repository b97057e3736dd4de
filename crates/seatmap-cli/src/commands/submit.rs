use super::read_seat_map;
use anyhow::{Context, Result, bail};
use clap::Args;
use seatmap_core::{EditorConfig, SeatMap};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Seat-map file produced by `export`
    pub seat_map: PathBuf,

    /// Ingestion endpoint (overrides config)
    #[arg(short, long)]
    pub endpoint: Option<String>,
}

pub async fn submit(args: SubmitArgs, config: &EditorConfig) -> Result<()> {
    let map = read_seat_map(&args.seat_map)?;
    let endpoint = args
        .endpoint
        .as_deref()
        .unwrap_or(&config.submission.endpoint);

    let location = post_seat_map(endpoint, &map).await?;
    match location {
        Some(location) => println!("  ✓ {} created at {location}", map.venue_id),
        None => println!("  ✓ {} submitted", map.venue_id),
    }
    Ok(())
}

/// POST the map as JSON. Returns the `Location` header of the created
/// resource, if the server sent one.
pub async fn post_seat_map(endpoint: &str, map: &SeatMap) -> Result<Option<String>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("cannot build HTTP client")?;

    log::info!(
        "submitting venue `{}` ({} seat(s)) to {endpoint}",
        map.venue_id,
        map.seat_count()
    );
    let response = client
        .post(endpoint)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(map.to_pretty_json()?)
        .send()
        .await
        .with_context(|| format!("request to {endpoint} failed"))?;

    let status = response.status();
    let location = response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("submission rejected ({status}): {body}");
    }
    if let Some(location) = &location {
        log::info!("seat map stored at {location}");
    }
    Ok(location)
}
