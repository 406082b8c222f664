pub mod client;
pub mod format;
pub mod types;

pub use client::{Classifier, HttpClassifier};
pub use format::format;
pub use types::*;

use crate::{ClassifyError, intake::UploadedImage};

/// One full round trip: remote call, then shaping of the body.
pub async fn classify_image(
    classifier: &dyn Classifier,
    image: &UploadedImage,
) -> Result<ClassificationResult, ClassifyError> {
    let raw = classifier.classify(image).await?;
    format(&raw)
}
