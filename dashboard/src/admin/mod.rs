//! Administrative writes: create, delete and feed.
//!
//! Each operation talks to the backend once and reports an [`AdminOutcome`]. Only
//! [`AdminOutcome::Completed`] asks the caller to refetch; nothing is patched locally.

pub mod forms;
pub mod modal;

pub use forms::{CameraForm, ImageFormat, ImageUpload, ModelForm};
pub use modal::{FormSession, ModalState};

use crate::api::ApiClient;
use crate::errors::{Error, Result};
use crate::metrics::{MUTATIONS_TOTAL, MUTATION_FAILURES_TOTAL};
use crate::model::{Camera, CameraId, CameraModel, FeedRequest, ModelId};
use tracing::{debug, error, info, warn};

const FEED_STORAGE_PROMPT: &str = "How many GB of storage to add? (leave blank to keep unchanged)";
const FEED_INCIDENTS_PROMPT: &str = "How many incidents to add? (leave blank to keep unchanged)";

/// User-facing dialogs the controller needs
pub trait Interaction {
    /// Yes/no question asked before a destructive request.
    fn confirm(&mut self, message: &str) -> bool;
    /// Free-text question; `None` when the user cancels.
    fn prompt(&mut self, message: &str) -> Option<String>;
    /// Blocking notice.
    fn alert(&mut self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminOutcome {
    /// The backend accepted the write
    Completed,
    /// The user declined the confirmation; no request was sent
    Declined,
    /// The request failed and the user was alerted
    Failed,
    /// Required fields were empty; no request was sent
    Incomplete(Vec<&'static str>),
    /// Input could not be turned into a request; the user was alerted
    Invalid(String),
    /// Nothing was supplied, so no request was sent
    NothingToSend,
    /// The form's dialog was not open
    NotOpen,
}

impl AdminOutcome {
    pub fn needs_refresh(&self) -> bool {
        matches!(self, AdminOutcome::Completed)
    }
}

/// Everything the admin panel lists
#[derive(Debug, Clone, Default)]
pub struct AdminListing {
    pub models: Vec<CameraModel>,
    pub cameras: Vec<Camera>,
}

pub struct AdminController<I> {
    client: ApiClient,
    interaction: I,
    /// Dashboard "new camera" dialog, model picked from a list
    pub new_camera: FormSession<CameraForm>,
    /// "Add camera" dialog opened from a model row
    pub add_camera: FormSession<CameraForm>,
    /// "New model and first camera" form
    pub new_model: FormSession<ModelForm>,
}

impl<I: Interaction> AdminController<I> {
    pub fn new(client: ApiClient, interaction: I) -> Self {
        Self {
            client,
            interaction,
            new_camera: FormSession::default(),
            add_camera: FormSession::default(),
            new_model: FormSession::default(),
        }
    }

    pub fn interaction(&self) -> &I {
        &self.interaction
    }

    pub async fn load_listing(&self) -> Result<AdminListing> {
        let models = self.client.list_models().await?;
        let cameras = self.client.list_cameras().await?;
        Ok(AdminListing { models, cameras })
    }

    /// Opens the add-camera dialog with the model preselected and every other field blank.
    pub fn open_add_camera(&mut self, model: &str) {
        self.add_camera.open_with(CameraForm::for_model(model));
    }

    /// Submits the dashboard camera form as typed.
    pub async fn submit_new_camera(&mut self) -> AdminOutcome {
        submit_camera(&self.client, &mut self.new_camera, &mut self.interaction).await
    }

    /// Submits the add-camera dialog once every field has a value.
    pub async fn submit_add_camera(&mut self) -> AdminOutcome {
        if self.add_camera.state() != ModalState::Open {
            return AdminOutcome::NotOpen;
        }

        let missing = self.add_camera.form.missing_fields();
        if !missing.is_empty() {
            warn!("Add camera form incomplete, missing: {}", missing.join(", "));
            return AdminOutcome::Incomplete(missing);
        }

        submit_camera(&self.client, &mut self.add_camera, &mut self.interaction).await
    }

    /// Submits the model form as typed, image included.
    pub async fn submit_new_model(&mut self) -> AdminOutcome {
        if !self.new_model.begin_submit() {
            return AdminOutcome::NotOpen;
        }

        match self.client.create_model(&self.new_model.form).await {
            Ok(created) => {
                info!("Created model {} ({})", created.name, created.id);
                MUTATIONS_TOTAL.inc();
                self.new_model.succeed();
                self.interaction
                    .alert("Model and first camera added successfully!");
                AdminOutcome::Completed
            }
            Err(e) => {
                self.new_model.fail();
                report_failure(&mut self.interaction, &e, "Failed to add model");
                AdminOutcome::Failed
            }
        }
    }

    pub async fn delete_camera(&mut self, id: CameraId) -> AdminOutcome {
        if !self
            .interaction
            .confirm("Are you sure you want to delete this camera?")
        {
            info!("Deletion of camera {} cancelled", id);
            return AdminOutcome::Declined;
        }

        match self.client.delete_camera(id).await {
            Ok(()) => {
                info!("Deleted camera {}", id);
                MUTATIONS_TOTAL.inc();
                AdminOutcome::Completed
            }
            Err(e) => {
                report_failure(&mut self.interaction, &e, "Failed to delete camera");
                AdminOutcome::Failed
            }
        }
    }

    /// Deletes a model; the backend removes its cameras with it.
    pub async fn delete_model(&mut self, id: ModelId) -> AdminOutcome {
        if !self
            .interaction
            .confirm("Are you sure you want to delete this model and all of its cameras?")
        {
            info!("Deletion of model {} cancelled", id);
            return AdminOutcome::Declined;
        }

        match self.client.delete_model(id).await {
            Ok(()) => {
                info!("Deleted model {} and its cameras", id);
                MUTATIONS_TOTAL.inc();
                AdminOutcome::Completed
            }
            Err(e) => {
                report_failure(&mut self.interaction, &e, "Failed to delete model");
                AdminOutcome::Failed
            }
        }
    }

    /// Asks for both deltas, then feeds whichever were given.
    pub async fn feed_camera(&mut self, id: CameraId) -> AdminOutcome {
        self.feed_camera_partial(id, None, None).await
    }

    /// Feeds the deltas already known and asks only for the missing ones.
    pub async fn feed_camera_partial(
        &mut self,
        id: CameraId,
        gb: Option<f64>,
        incidents: Option<u64>,
    ) -> AdminOutcome {
        let gb_answer = match gb {
            Some(_) => None,
            None => self.interaction.prompt(FEED_STORAGE_PROMPT),
        };
        let incidents_answer = match incidents {
            Some(_) => None,
            None => self.interaction.prompt(FEED_INCIDENTS_PROMPT),
        };

        match parse_feed(gb_answer.as_deref(), incidents_answer.as_deref()) {
            Ok(answered) => {
                let request = FeedRequest {
                    gb: gb.or(answered.gb),
                    incidents: incidents.or(answered.incidents),
                };
                self.feed_camera_with(id, request).await
            }
            Err(e) => self.reject(e),
        }
    }

    pub async fn feed_camera_with(&mut self, id: CameraId, request: FeedRequest) -> AdminOutcome {
        if request.is_empty() {
            debug!("Nothing to feed into camera {}", id);
            return AdminOutcome::NothingToSend;
        }
        if let Err(e) = check_feed(&request) {
            return self.reject(e);
        }

        match self.client.feed_camera(id, &request).await {
            Ok(result) if !result.success => {
                warn!("Backend did not apply feed for camera {}", id);
                MUTATION_FAILURES_TOTAL.inc();
                self.interaction.alert("Failed to feed camera data");
                AdminOutcome::Failed
            }
            Ok(result) => {
                info!(
                    "Camera {} now at {:.2} GB and {} incidents",
                    id, result.new_gb, result.new_incidents
                );
                MUTATIONS_TOTAL.inc();
                AdminOutcome::Completed
            }
            Err(e) => {
                report_failure(&mut self.interaction, &e, "Failed to feed camera data");
                AdminOutcome::Failed
            }
        }
    }

    fn reject(&mut self, err: Error) -> AdminOutcome {
        warn!("Rejected admin input: {}", err);
        let message = match err {
            Error::Validation(message) => message,
            other => other.to_string(),
        };
        self.interaction.alert(&message);
        AdminOutcome::Invalid(message)
    }
}

async fn submit_camera<I: Interaction>(
    client: &ApiClient,
    session: &mut FormSession<CameraForm>,
    interaction: &mut I,
) -> AdminOutcome {
    if !session.begin_submit() {
        return AdminOutcome::NotOpen;
    }

    match client.create_camera(&session.form).await {
        Ok(created) => {
            info!(
                "Created camera {} ({}) for model {}",
                created.id, created.serial_number, created.model
            );
            MUTATIONS_TOTAL.inc();
            session.succeed();
            AdminOutcome::Completed
        }
        Err(e) => {
            session.fail();
            report_failure(interaction, &e, "Failed to add camera");
            AdminOutcome::Failed
        }
    }
}

fn report_failure<I: Interaction>(interaction: &mut I, err: &Error, fallback: &str) {
    MUTATION_FAILURES_TOTAL.inc();
    error!("{}: {}", fallback, err);
    interaction.alert(err.server_message().unwrap_or(fallback));
}

/// Turns the two prompt answers into a feed request. Blank or cancelled answers are left out.
pub fn parse_feed(gb: Option<&str>, incidents: Option<&str>) -> Result<FeedRequest> {
    let gb = match gb.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(raw.parse::<f64>().map_err(|_| {
            Error::Validation(format!("'{}' is not a valid storage amount", raw))
        })?),
        None => None,
    };
    let incidents = match incidents.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
            Error::Validation(format!("'{}' is not a valid incident count", raw))
        })?),
        None => None,
    };

    let request = FeedRequest { gb, incidents };
    check_feed(&request)?;
    Ok(request)
}

fn check_feed(request: &FeedRequest) -> Result<()> {
    if let Some(gb) = request.gb {
        if !gb.is_finite() || gb < 0.0 {
            return Err(Error::Validation(format!(
                "Storage increment {} must be a non-negative number",
                gb
            )));
        }
    }
    Ok(())
}
