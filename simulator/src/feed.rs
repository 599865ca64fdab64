use dashboard::model::FeedRequest;
use rand::Rng;

/// Bounds for one simulated feed
#[derive(Debug, Clone, Copy)]
pub struct FeedLimits {
    pub max_gb: f64,
    pub max_incidents: u64,
}

/// Random deltas for one camera. Roughly one feed in ten only touches storage
/// and one in ten only touches incidents; the rest carry both.
pub fn generate_feed(rng: &mut impl Rng, limits: FeedLimits) -> FeedRequest {
    let gb = (rng.gen_range(0.0..=limits.max_gb.max(0.0)) * 100.0).round() / 100.0;
    let incidents = rng.gen_range(0..=limits.max_incidents);

    match rng.gen_range(0..10) {
        0 => FeedRequest {
            gb: Some(gb),
            incidents: None,
        },
        1 => FeedRequest {
            gb: None,
            incidents: Some(incidents),
        },
        _ => FeedRequest {
            gb: Some(gb),
            incidents: Some(incidents),
        },
    }
}
