use crate::{
    ClassifyError, Result,
    config::{ApiConfig, ContentTypePolicy},
    intake::UploadedImage,
};
use async_trait::async_trait;
use reqwest::{
    StatusCode,
    multipart::{Form, Part},
};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const FIXED_CONTENT_TYPE: &str = "image/jpeg";

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Sends the image to the inference endpoint and returns the parsed body.
    async fn classify(&self, image: &UploadedImage) -> std::result::Result<Value, ClassifyError>;
}

pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
    field_name: String,
    content_type: ContentTypePolicy,
}

impl HttpClassifier {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            field_name: config.field_name.clone(),
            content_type: config.content_type,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn file_part(&self, image: &UploadedImage) -> std::result::Result<Part, ClassifyError> {
        let declared = match self.content_type {
            ContentTypePolicy::Fixed => FIXED_CONTENT_TYPE,
            ContentTypePolicy::Declared => image.content_type.as_str(),
        };

        let part = Part::bytes(image.bytes.clone()).file_name(image.filename.clone());
        match part.mime_str(declared) {
            Ok(part) => Ok(part),
            Err(e) => {
                warn!(
                    "Unusable content type '{}' for {}: {}, sending {}",
                    declared, image.filename, e, FIXED_CONTENT_TYPE
                );
                Part::bytes(image.bytes.clone())
                    .file_name(image.filename.clone())
                    .mime_str(FIXED_CONTENT_TYPE)
                    .map_err(|e| ClassifyError::connection(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, image: &UploadedImage) -> std::result::Result<Value, ClassifyError> {
        debug!(
            "Posting {} ({} bytes) to {}",
            image.filename,
            image.size(),
            self.endpoint
        );

        let form = Form::new().part(self.field_name.clone(), self.file_part(image)?);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClassifyError::connection(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Inference API answered with status {}", status);
            return Err(ClassifyError::ApiStatus {
                code: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ClassifyError::connection(e.to_string()))?;

        debug!("Received {} byte response from inference API", body.len());

        serde_json::from_slice(&body).map_err(|e| ClassifyError::format(e.to_string()))
    }
}
