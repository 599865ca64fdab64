use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type CameraId = i64;
pub type ModelId = i64;

/// Floor-plan coordinate of an installed camera. Not checked against any bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CameraStatus {
    Active,
    Inactive,
    Other(String),
}

impl CameraStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, CameraStatus::Active)
    }

    pub fn as_str(&self) -> &str {
        match self {
            CameraStatus::Active => "active",
            CameraStatus::Inactive => "inactive",
            CameraStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for CameraStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "active" => CameraStatus::Active,
            "inactive" => CameraStatus::Inactive,
            _ => CameraStatus::Other(raw),
        }
    }
}

impl From<CameraStatus> for String {
    fn from(status: CameraStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Installed camera as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub id: CameraId,
    pub model: String,
    pub serial_number: String,
    pub installation_date: NaiveDateTime,
    pub location: Location,
    pub image_storage_gb: f64,
    pub incidents_captured: u64,
    pub status: CameraStatus,
}

/// Camera hardware/firmware variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraModel {
    pub id: ModelId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Acknowledgement for `POST /api/cameras`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedCamera {
    pub id: CameraId,
    pub model: String,
    pub serial_number: String,
}

/// Acknowledgement for `POST /api/models`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedModel {
    pub id: ModelId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
}

/// Counter increments for `POST /api/cameras/{id}/feed`.
///
/// Unsupplied deltas are left out of the body so the backend applies its own default.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gb: Option<f64>,
    #[serde(rename = "ocorr", skip_serializing_if = "Option::is_none")]
    pub incidents: Option<u64>,
}

impl FeedRequest {
    pub fn is_empty(&self) -> bool {
        self.gb.is_none() && self.incidents.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedResult {
    pub success: bool,
    pub new_gb: f64,
    #[serde(rename = "new_ocorr")]
    pub new_incidents: u64,
}

/// Error body shape used by the backend for rejected writes
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}
