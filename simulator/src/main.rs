mod feed;

use anyhow::{bail, Context};
use clap::Parser;
use dashboard::ApiClient;
use feed::{generate_feed, FeedLimits};
use rand::seq::SliceRandom;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const BURST_SIZE: u64 = 20;

/// Feeds random storage and incident deltas into existing cameras
#[derive(Debug, Parser)]
#[command(name = "simulator", version)]
struct Args {
    #[arg(long, env = "DASHBOARD_API_URL", default_value = "http://localhost:5000")]
    api_url: String,
    /// Feed requests per second
    #[arg(long, env = "RATE", default_value_t = 20)]
    rate: u64,
    /// Largest storage increment per feed, in GB
    #[arg(long, default_value_t = 0.5)]
    max_gb: f64,
    #[arg(long, default_value_t = 3)]
    max_incidents: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let client = ApiClient::new(&args.api_url)
        .with_context(|| format!("invalid backend URL {}", args.api_url))?;
    let limits = FeedLimits {
        max_gb: args.max_gb,
        max_incidents: args.max_incidents,
    };

    let cameras: Vec<_> = client
        .list_cameras()
        .await
        .context("could not load cameras")?
        .into_iter()
        .map(|c| c.id)
        .collect();
    if cameras.is_empty() {
        bail!("no cameras to feed at {}", args.api_url);
    }

    info!("Starting feed simulator");
    info!(
        "Backend: {}, Rate: {} feeds/s, Cameras: {}",
        args.api_url,
        args.rate,
        cameras.len()
    );

    let burst_interval = Duration::from_millis(BURST_SIZE * 1000 / args.rate.max(1));
    info!(
        "Feeding in bursts of {} requests every {:?}",
        BURST_SIZE, burst_interval
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut sent = 0u64;
    let mut failed = 0u64;
    loop {
        let burst_start = Instant::now();

        let burst = async {
            for _ in 0..BURST_SIZE {
                let (id, request) = {
                    let mut rng = rand::thread_rng();
                    let Some(&id) = cameras.choose(&mut rng) else {
                        break;
                    };
                    (id, generate_feed(&mut rng, limits))
                };

                match client.feed_camera(id, &request).await {
                    Ok(_) => sent += 1,
                    Err(e) => {
                        failed += 1;
                        warn!("Failed to feed camera {}: {}", id, e);
                    }
                }
            }
        };

        tokio::select! {
            _ = burst => {}
            result = &mut shutdown => {
                if let Err(e) = result {
                    error!("Could not listen for Ctrl-C: {}", e);
                }
                break;
            }
        }

        if sent > 0 && sent % 500 < BURST_SIZE {
            info!("Sent {} feeds ({} failed)", sent, failed);
        }

        let elapsed = burst_start.elapsed();
        if elapsed < burst_interval {
            tokio::time::sleep(burst_interval - elapsed).await;
        } else if elapsed > burst_interval * 2 {
            warn!(
                "Burst took {:?}, target was {:?}; backend may be overloaded",
                elapsed, burst_interval
            );
        }
    }

    info!("Stopped after {} feeds ({} failed)", sent, failed);
    Ok(())
}
