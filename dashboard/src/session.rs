use crate::admin::{AdminController, AdminListing, AdminOutcome, Interaction};
use crate::chart::{ChartBoard, ChartSurface};
use crate::dashboard::Dashboard;
use crate::map::{MapSurface, MarkerLayer};
use crate::model::{CameraId, ModelId};
use tracing::error;

/// A page together with its admin controls.
///
/// Every accepted write triggers a full refetch of the page, and of the admin
/// listing when it is shown.
pub struct Session<I, M = MarkerLayer, C = ChartBoard> {
    pub dashboard: Dashboard<M, C>,
    pub admin: AdminController<I>,
    listing: Option<AdminListing>,
}

impl<I: Interaction, M: MapSurface, C: ChartSurface> Session<I, M, C> {
    pub fn new(dashboard: Dashboard<M, C>, interaction: I) -> Self {
        let admin = AdminController::new(dashboard.client().clone(), interaction);
        Self {
            dashboard,
            admin,
            listing: None,
        }
    }

    /// Shows the admin listing, or hides it when already shown.
    pub async fn toggle_admin_panel(&mut self) {
        if self.listing.take().is_none() {
            self.reload_listing().await;
        }
    }

    pub fn listing(&self) -> Option<&AdminListing> {
        self.listing.as_ref()
    }

    pub async fn submit_new_camera(&mut self) -> AdminOutcome {
        let outcome = self.admin.submit_new_camera().await;
        self.settle(outcome).await
    }

    pub async fn submit_add_camera(&mut self) -> AdminOutcome {
        let outcome = self.admin.submit_add_camera().await;
        self.settle(outcome).await
    }

    pub async fn submit_new_model(&mut self) -> AdminOutcome {
        let outcome = self.admin.submit_new_model().await;
        self.settle(outcome).await
    }

    pub async fn delete_camera(&mut self, id: CameraId) -> AdminOutcome {
        let outcome = self.admin.delete_camera(id).await;
        self.settle(outcome).await
    }

    pub async fn delete_model(&mut self, id: ModelId) -> AdminOutcome {
        let outcome = self.admin.delete_model(id).await;
        self.settle(outcome).await
    }

    pub async fn feed_camera(&mut self, id: CameraId) -> AdminOutcome {
        let outcome = self.admin.feed_camera(id).await;
        self.settle(outcome).await
    }

    pub async fn feed_camera_partial(
        &mut self,
        id: CameraId,
        gb: Option<f64>,
        incidents: Option<u64>,
    ) -> AdminOutcome {
        let outcome = self.admin.feed_camera_partial(id, gb, incidents).await;
        self.settle(outcome).await
    }

    async fn settle(&mut self, outcome: AdminOutcome) -> AdminOutcome {
        if outcome.needs_refresh() {
            if self.listing.is_some() {
                self.reload_listing().await;
            }
            self.dashboard.refresh().await;
        }
        outcome
    }

    async fn reload_listing(&mut self) {
        match self.admin.load_listing().await {
            Ok(listing) => self.listing = Some(listing),
            Err(e) => error!("Error loading admin listing: {}", e),
        }
    }
}
