use std::path::Path;

use reqwest::multipart;

use crate::error::{PlannerError, Result};
use crate::http::ApiClient;
use crate::models::Detection;

#[derive(Debug, Clone)]
pub struct DetectionGateway {
    api: ApiClient,
}

impl DetectionGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn detect_file(&self, path: &Path) -> Result<Detection> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo.jpg")
            .to_string();
        self.detect(bytes, &file_name).await
    }

    /// Uploads a photo as the `file` part of a multipart form.
    pub async fn detect(&self, bytes: Vec<u8>, file_name: &str) -> Result<Detection> {
        if bytes.is_empty() {
            return Err(PlannerError::Validation("Image is empty".to_string()));
        }
        let mime = image_mime(&bytes, file_name)?;

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(&mime)
            .map_err(|e| PlannerError::Validation(format!("Invalid MIME type: {e}")))?;
        let form = multipart::Form::new().part("file", part);

        self.api
            .post("/detect/food-items")
            .multipart(form)
            .send_json()
            .await
    }
}

/// Sniffs the content first and falls back to the file extension.
fn image_mime(bytes: &[u8], file_name: &str) -> Result<String> {
    let mime = infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| {
            mime_guess::from_path(file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        });

    if mime.starts_with("image/") {
        Ok(mime)
    } else {
        Err(PlannerError::Validation(format!(
            "Please choose an image file (got {mime})"
        )))
    }
}
