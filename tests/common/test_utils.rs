use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use mri_classifier::{
    classifier::Classifier, config::UiConfig, intake::UploadedImage, server,
    session::SessionStore,
};
use serde_json::{Value, json};
use std::{io::Cursor, sync::Arc};
use tower::ServiceExt;

pub const BOUNDARY: &str = "mri-test-boundary";

/// The response used throughout the scenarios.
pub fn glioma_response() -> Value {
    json!({
        "prediction": "glioma",
        "confidence": 0.87,
        "probabilities": {
            "glioma": 0.87,
            "meningioma": 0.10,
            "notumor": 0.02,
            "pituitary": 0.01
        }
    })
}

pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), format)
        .expect("Failed to encode test image");
    out
}

pub fn png_bytes() -> Vec<u8> {
    encoded_image(64, 48, ImageFormat::Png)
}

pub fn jpeg_bytes() -> Vec<u8> {
    encoded_image(64, 48, ImageFormat::Jpeg)
}

pub fn test_image(filename: &str) -> UploadedImage {
    mri_classifier::intake::accept_upload(
        filename,
        Some("image/png"),
        png_bytes(),
        &UiConfig::default(),
    )
    .expect("Failed to build test image")
}

/// Router plus the store behind it, so tests can inspect sessions.
pub fn create_test_app(classifier: Arc<dyn Classifier>) -> (Router, Arc<SessionStore>) {
    let sessions = Arc::new(SessionStore::new(3600, 100));
    let app = server::router(sessions.clone(), classifier, UiConfig::default());
    (app, sessions)
}

pub fn multipart_body(filename: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn upload_request(
    cookie: Option<&str>,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(multipart_body(filename, content_type, bytes)))
        .unwrap()
}

/// `name=value` pair from the response's `Set-Cookie`, ready to send back.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.to_string())
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Opens a session and returns its cookie.
pub async fn start_session(app: &Router) -> String {
    let response = app.clone().oneshot(get("/", None)).await.unwrap();
    session_cookie(&response).expect("first visit must set a session cookie")
}

pub async fn render_page(app: &Router, cookie: &str) -> String {
    let response = app.clone().oneshot(get("/", Some(cookie))).await.unwrap();
    body_string(response).await
}
