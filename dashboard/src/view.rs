//! Named slots the page controllers write into.
//!
//! Rendering code fills these instead of looking up concrete elements; front ends
//! read them back to draw the page.

use crate::aggregate::Totals;
use crate::api::ApiClient;
use crate::errors::Result;
use crate::model::{Camera, CameraModel};
use chrono::{DateTime, Local};

pub fn format_storage(gb: f64) -> String {
    format!("{:.2} GB", gb)
}

/// Fleet overview cards
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCards {
    pub total_cameras: String,
    pub total_storage: String,
    pub incidents: String,
    pub active_cameras: String,
}

impl From<&Totals> for SummaryCards {
    fn from(totals: &Totals) -> Self {
        Self {
            total_cameras: totals.cameras.to_string(),
            total_storage: format_storage(totals.storage_gb),
            incidents: totals.incidents.to_string(),
            active_cameras: totals.active.to_string(),
        }
    }
}

/// Single-model info panel
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub installed: String,
    pub total_storage: String,
    pub total_incidents: String,
}

impl From<&Totals> for ModelInfo {
    fn from(totals: &Totals) -> Self {
        Self {
            installed: totals.cameras.to_string(),
            total_storage: format_storage(totals.storage_gb),
            total_incidents: totals.incidents.to_string(),
        }
    }
}

/// Sidebar link to a model page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub name: String,
    pub href: String,
}

impl From<&CameraModel> for NavEntry {
    fn from(model: &CameraModel) -> Self {
        Self {
            name: model.name.clone(),
            href: format!("/camera/{}", model.name),
        }
    }
}

/// Image and description shown when a model is picked in the camera form
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPreview {
    pub name: String,
    pub image_url: Option<String>,
    pub description: String,
}

impl ModelPreview {
    /// Preview for the selected model; `None` hides the preview.
    pub fn for_selection(
        client: &ApiClient,
        models: &[CameraModel],
        selected: Option<&str>,
    ) -> Result<Option<Self>> {
        let Some(model) = selected.and_then(|name| models.iter().find(|m| m.name == name)) else {
            return Ok(None);
        };

        let image_url = match &model.image_path {
            Some(path) => Some(client.model_image_url(path)?.to_string()),
            None => None,
        };

        Ok(Some(Self {
            name: model.name.clone(),
            image_url,
            description: model.description.clone().unwrap_or_default(),
        }))
    }
}

/// Label/value rows for the camera details panel
#[derive(Debug, Clone, PartialEq)]
pub struct CameraDetails {
    pub rows: Vec<(&'static str, String)>,
}

impl From<&Camera> for CameraDetails {
    fn from(camera: &Camera) -> Self {
        Self {
            rows: vec![
                ("Serial number", camera.serial_number.clone()),
                ("Model", camera.model.clone()),
                (
                    "Installation date",
                    camera.installation_date.format("%Y-%m-%d").to_string(),
                ),
                ("Status", camera.status.to_string()),
                ("Storage", format_storage(camera.image_storage_gb)),
                ("Incidents", camera.incidents_captured.to_string()),
                (
                    "Location",
                    format!("X: {}, Y: {}", camera.location.x, camera.location.y),
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    pub summary: Option<SummaryCards>,
    pub model_info: Option<ModelInfo>,
    pub model_list: Vec<NavEntry>,
    pub last_refresh: Option<DateTime<Local>>,
}

impl ViewModel {
    pub fn set_model_list(&mut self, models: &[CameraModel]) {
        self.model_list = models.iter().map(NavEntry::from).collect();
    }
}
