use crate::api::ApiClient;
use crate::errors::Result;
use crate::metrics::{FETCH_FAILURES_TOTAL, FETCH_LATENCY_SECONDS, FETCH_TOTAL};
use crate::model::{Camera, CameraModel};
use std::fmt;
use std::future::Future;
use tokio::time::Instant;
use tracing::{debug, error};

/// Which camera collection a page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every camera in the fleet
    Fleet,
    /// Cameras of a single model
    Model(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Fleet => f.write_str("all cameras"),
            Scope::Model(name) => write!(f, "model {}", name),
        }
    }
}

/// Read side of the backend.
///
/// A failed read is logged and reported as `None`; callers keep whatever they
/// rendered last.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: ApiClient,
}

impl Fetcher {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn cameras(&self, scope: &Scope) -> Option<Vec<Camera>> {
        let what = scope.to_string();
        match scope {
            Scope::Fleet => observe(&what, self.client.list_cameras()).await,
            Scope::Model(name) => observe(&what, self.client.cameras_for_model(name)).await,
        }
    }

    pub async fn models(&self) -> Option<Vec<CameraModel>> {
        observe("models", self.client.list_models()).await
    }
}

async fn observe<T, F>(what: &str, request: F) -> Option<Vec<T>>
where
    F: Future<Output = Result<Vec<T>>>,
{
    FETCH_TOTAL.inc();
    let start = Instant::now();
    let result = request.await;
    FETCH_LATENCY_SECONDS.observe(start.elapsed().as_secs_f64());

    match result {
        Ok(items) => {
            debug!("Fetched {} records for {}", items.len(), what);
            Some(items)
        }
        Err(e) => {
            FETCH_FAILURES_TOTAL.inc();
            error!("Error fetching {}: {}", what, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::Fleet.to_string(), "all cameras");
        assert_eq!(Scope::Model("X100".into()).to_string(), "model X100");
    }

    #[test]
    fn test_unreachable_backend_yields_none() {
        tokio_test::block_on(async {
            // Port 9 (discard) on loopback is not expected to accept HTTP.
            let client = ApiClient::new("http://127.0.0.1:9").unwrap();
            let fetcher = Fetcher::new(client);
            assert!(fetcher.cameras(&Scope::Fleet).await.is_none());
            assert!(fetcher.models().await.is_none());
        });
    }
}
