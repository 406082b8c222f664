use async_trait::async_trait;
use mri_classifier::{ClassifyError, classifier::Classifier, intake::UploadedImage};
use serde_json::Value;
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

/// Mock inference client for testing
#[derive(Debug)]
pub struct MockClassifier {
    pub responses: Arc<Mutex<Vec<Result<Value, ClassifyError>>>>,
    pub requests: Arc<Mutex<Vec<String>>>,
    pub delay: Option<Duration>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Holds every answer back, like a slow inference endpoint.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_response(self, response: Value) -> Self {
        self.responses.lock().unwrap().push(Ok(response));
        self
    }

    pub fn with_error(self, error: ClassifyError) -> Self {
        self.responses.lock().unwrap().push(Err(error));
        self
    }

    /// Filenames of every image sent so far.
    pub fn get_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, image: &UploadedImage) -> Result<Value, ClassifyError> {
        self.requests.lock().unwrap().push(image.filename.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(ClassifyError::connection("No more mock responses available"));
        }

        responses.remove(0)
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}
