use crate::admin::forms::{CameraForm, ModelForm};
use crate::errors::{Error, Result};
use crate::model::{
    Camera, CameraId, CameraModel, CreatedCamera, CreatedModel, ErrorBody, FeedRequest,
    FeedResult, ModelId,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Client for the camera fleet backend.
///
/// One attempt per call: no retries and no request timeout.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Validation(format!("{} cannot be used as a base URL", base_url)));
        }
        let http = Client::builder().build()?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /api/cameras/all`
    pub async fn list_cameras(&self) -> Result<Vec<Camera>> {
        self.get_json(&["api", "cameras", "all"]).await
    }

    /// `GET /api/cameras/{model}`
    pub async fn cameras_for_model(&self, model: &str) -> Result<Vec<Camera>> {
        self.get_json(&["api", "cameras", model]).await
    }

    /// `GET /api/camera/{id}`
    pub async fn camera(&self, id: CameraId) -> Result<Camera> {
        self.get_json(&["api", "camera", &id.to_string()]).await
    }

    /// `GET /api/models`
    pub async fn list_models(&self) -> Result<Vec<CameraModel>> {
        self.get_json(&["api", "models"]).await
    }

    /// `POST /api/cameras` with the form as a JSON body
    pub async fn create_camera(&self, form: &CameraForm) -> Result<CreatedCamera> {
        let url = self.endpoint(&["api", "cameras"])?;
        debug!("POST {}", url);
        let response = self.http.post(url).json(form).send().await?;
        read_json(response).await
    }

    /// `POST /api/models` as multipart, image included when the form has one
    pub async fn create_model(&self, form: &ModelForm) -> Result<CreatedModel> {
        let url = self.endpoint(&["api", "models"])?;

        let mut body = Form::new();
        for (name, value) in form.text_fields() {
            body = body.text(name, value.to_string());
        }
        if let Some(image) = &form.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(image.mime_type())?;
            body = body.part("image", part);
        }

        debug!("POST {} (multipart)", url);
        let response = self.http.post(url).multipart(body).send().await?;
        read_json(response).await
    }

    /// `POST /api/cameras/{id}/feed`
    pub async fn feed_camera(&self, id: CameraId, request: &FeedRequest) -> Result<FeedResult> {
        let url = self.endpoint(&["api", "cameras", &id.to_string(), "feed"])?;
        debug!("POST {} {:?}", url, request);
        let response = self.http.post(url).json(request).send().await?;
        read_json(response).await
    }

    /// `DELETE /api/cameras/{id}`
    pub async fn delete_camera(&self, id: CameraId) -> Result<()> {
        self.delete(&["api", "cameras", &id.to_string()]).await
    }

    /// `DELETE /api/models/{id}`, which also removes every camera of the model
    pub async fn delete_model(&self, id: ModelId) -> Result<()> {
        self.delete(&["api", "models", &id.to_string()]).await
    }

    /// Static preview image of a model
    pub fn model_image_url(&self, image_path: &str) -> Result<Url> {
        self.endpoint(&["static", "images", "models", image_path])
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<()> {
        let url = self.endpoint(segments)?;
        debug!("DELETE {}", url);
        let response = self.http.delete(url).send().await?;
        check_status(response).await.map(|_| ())
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Validation(format!("{} cannot be used as a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error);
    Err(Error::Status { status, message })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_under_base_path() {
        let client = ApiClient::new("http://fleet.local:5000").unwrap();
        let url = client.endpoint(&["api", "cameras", "all"]).unwrap();
        assert_eq!(url.as_str(), "http://fleet.local:5000/api/cameras/all");

        let prefixed = ApiClient::new("http://fleet.local/backend/").unwrap();
        let url = prefixed.endpoint(&["api", "models"]).unwrap();
        assert_eq!(url.as_str(), "http://fleet.local/backend/api/models");
    }

    #[test]
    fn test_model_names_are_percent_encoded() {
        let client = ApiClient::new("http://fleet.local").unwrap();
        let url = client.endpoint(&["api", "cameras", "Dome 4K/v2"]).unwrap();
        assert_eq!(url.as_str(), "http://fleet.local/api/cameras/Dome%204K%2Fv2");
    }

    #[test]
    fn test_model_image_url() {
        let client = ApiClient::new("http://fleet.local").unwrap();
        let url = client.model_image_url("X100_20240301_101500.jpg").unwrap();
        assert_eq!(
            url.as_str(),
            "http://fleet.local/static/images/models/X100_20240301_101500.jpg"
        );
    }

    #[test]
    fn test_rejects_unusable_base() {
        assert!(ApiClient::new("mailto:ops@fleet.local").is_err());
        assert!(ApiClient::new("not a url").is_err());
    }
}
