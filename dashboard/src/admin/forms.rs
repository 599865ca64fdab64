use crate::errors::Result;
use serde::Serialize;
use std::path::Path;

/// Camera form fields, forwarded to the backend exactly as typed.
///
/// Serializes straight into the `POST /api/cameras` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CameraForm {
    pub model: String,
    pub serial_number: String,
    pub installation_date: String,
    pub location_x: String,
    pub location_y: String,
    pub image_storage: String,
    pub incidents_captured: String,
}

impl CameraForm {
    /// Blank form with the model preselected.
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Names of fields left empty, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("model", &self.model),
            ("serial_number", &self.serial_number),
            ("installation_date", &self.installation_date),
            ("location_x", &self.location_x),
            ("location_y", &self.location_y),
            ("image_storage", &self.image_storage),
            ("incidents_captured", &self.incidents_captured),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Image formats the model form knows how to label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
        }
    }
}

/// Model preview image attached to the create-model form
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub format: Option<ImageFormat>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self {
            file_name,
            format: ImageFormat::from_path(path),
            bytes,
        })
    }

    pub fn mime_type(&self) -> &'static str {
        self.format
            .map(|f| f.mime_type())
            .unwrap_or("application/octet-stream")
    }
}

/// New model plus the first camera installed with it.
///
/// Nothing here is checked before submission; the backend rejects what it cannot use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelForm {
    pub name: String,
    pub description: String,
    pub image: Option<ImageUpload>,
    pub serial_number: String,
    pub installation_date: String,
    pub location_x: String,
    pub location_y: String,
    pub image_storage: String,
    pub incidents_captured: String,
}

impl ModelForm {
    /// Text parts of the multipart body, in submission order.
    pub fn text_fields(&self) -> [(&'static str, &str); 8] {
        [
            ("name", self.name.as_str()),
            ("description", self.description.as_str()),
            ("serial_number", self.serial_number.as_str()),
            ("installation_date", self.installation_date.as_str()),
            ("location_x", self.location_x.as_str()),
            ("location_y", self.location_y.as_str()),
            ("image_storage", self.image_storage.as_str()),
            ("incidents_captured", self.incidents_captured.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> CameraForm {
        CameraForm {
            model: "X100".to_string(),
            serial_number: "SN-1".to_string(),
            installation_date: "2024-03-01".to_string(),
            location_x: "10".to_string(),
            location_y: "20".to_string(),
            image_storage: "0".to_string(),
            incidents_captured: "0".to_string(),
        }
    }

    #[test]
    fn test_complete_form_has_no_missing_fields() {
        assert!(complete_form().missing_fields().is_empty());
    }

    #[test]
    fn test_missing_fields_in_form_order() {
        let mut form = complete_form();
        form.location_y.clear();
        form.serial_number.clear();
        assert_eq!(form.missing_fields(), vec!["serial_number", "location_y"]);
    }

    #[test]
    fn test_for_model_only_fills_model() {
        let form = CameraForm::for_model("X100");
        assert_eq!(form.model, "X100");
        assert_eq!(form.missing_fields().len(), 6);
    }

    #[test]
    fn test_camera_form_body_uses_wire_names() {
        let body = serde_json::to_value(complete_form()).unwrap();
        assert_eq!(body["image_storage"], "0");
        assert_eq!(body["location_x"], "10");
    }

    #[test]
    fn test_image_format_from_extension() {
        assert_eq!(ImageFormat::from_path(Path::new("a/b.PNG")), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_path(Path::new("cam.jpeg")), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(ImageFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_image_upload_from_path() {
        tokio_test::block_on(async {
            let path = std::env::temp_dir().join(format!("dashboard-upload-{}.png", std::process::id()));
            tokio::fs::write(&path, b"\x89PNG").await.unwrap();

            let upload = ImageUpload::from_path(&path).await.unwrap();
            assert_eq!(upload.bytes, b"\x89PNG");
            assert_eq!(upload.mime_type(), "image/png");
            assert!(upload.file_name.ends_with(".png"));

            tokio::fs::remove_file(&path).await.unwrap();
        });
    }
}
