use super::{
    render,
    types::{ErrorResponse, HealthResponse, session_cookie, session_id_from},
};
use crate::{
    Error, IntakeError,
    classifier::{Classifier, classify_image},
    config::UiConfig,
    intake::{self, UploadedImage},
    session::{SessionStore, Trigger},
};
use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{Html, IntoResponse, Json, Redirect, Response},
};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

const UPLOAD_FIELD: &str = "file";

type HandlerResult = Result<Response, (StatusCode, Json<ErrorResponse>)>;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub classifier: Arc<dyn Classifier>,
    pub ui: Arc<UiConfig>,
}

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult {
    let (session_id, created) = state.sessions.resolve(session_id_from(&headers)).await;
    let html = state
        .sessions
        .with_session(session_id, |session| render::page(session))
        .await
        .map_err(internal_error)?;

    Ok(with_cookie(Html(html), session_id, created))
}

pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> HandlerResult {
    let (session_id, created) = state.sessions.resolve(session_id_from(&headers)).await;

    let accepted = match read_upload(multipart).await {
        Ok((filename, content_type, bytes)) => {
            info!("Received upload {} for session {}", filename, session_id);
            let ui = state.ui.clone();
            tokio::task::spawn_blocking(move || {
                intake::accept_upload(&filename, content_type.as_deref(), bytes, &ui)
            })
            .await
            .map_err(|e| internal_error(Error::internal(format!("Intake task failed: {}", e))))?
        }
        Err(e) => Err(e),
    };

    state
        .sessions
        .with_session(session_id, |session| match accepted {
            Ok(image) => session.load_image(image),
            Err(e) => {
                warn!("Rejected upload for session {}: {}", session_id, e);
                session.reject_upload(e);
                Ok(())
            }
        })
        .await
        .and_then(|r| r)
        .map_err(internal_error)?;

    Ok(with_cookie(Redirect::to("/"), session_id, created))
}

pub async fn classify(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult {
    let (session_id, created) = state.sessions.resolve(session_id_from(&headers)).await;

    let trigger = state
        .sessions
        .with_session(session_id, |session| session.begin_classification())
        .await
        .and_then(|r| r)
        .map_err(internal_error)?;

    match trigger {
        Trigger::NoImage => info!("Classify requested without an image (session {})", session_id),
        Trigger::Busy => info!("Classification already running for session {}", session_id),
        Trigger::Start { attempt, image } => {
            // the round trip runs detached so a dropped request still settles the session
            let sessions = state.sessions.clone();
            let classifier = state.classifier.clone();
            let task = tokio::spawn(async move {
                let result = run_classification(classifier.as_ref(), &image).await;
                match sessions
                    .with_session(session_id, |session| {
                        session.finish_classification(attempt, result)
                    })
                    .await
                {
                    Err(Error::Session(e)) => {
                        warn!("Session gone before classification finished: {}", e);
                        Ok(())
                    }
                    other => other.and_then(|r| r),
                }
            });

            task.await
                .map_err(|e| {
                    internal_error(Error::internal(format!("Classification task failed: {}", e)))
                })?
                .map_err(internal_error)?;
        }
    }

    Ok(with_cookie(Redirect::to("/"), session_id, created))
}

pub async fn clear(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult {
    let (session_id, created) = state.sessions.resolve(session_id_from(&headers)).await;

    state
        .sessions
        .with_session(session_id, |session| session.clear())
        .await
        .and_then(|r| r)
        .map_err(internal_error)?;

    Ok(with_cookie(Redirect::to("/"), session_id, created))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        sessions: state.sessions.len().await,
    })
}

async fn run_classification(
    classifier: &dyn Classifier,
    image: &UploadedImage,
) -> Result<crate::classifier::ClassificationResult, crate::ClassifyError> {
    info!("Classifying {} ({} bytes)", image.filename, image.size());
    let result = classify_image(classifier, image).await;
    match &result {
        Ok(r) => info!(
            "Prediction {} with confidence {}",
            r.prediction,
            r.confidence_text()
        ),
        Err(e) => warn!("Classification of {} failed: {}", image.filename, e),
    }
    result
}

async fn read_upload(
    mut multipart: Multipart,
) -> Result<(String, Option<String>, Vec<u8>), IntakeError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| IntakeError::Unreadable {
            detail: e.body_text(),
        })?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| IntakeError::Unreadable {
            detail: e.body_text(),
        })?;

        // browsers send an empty, unnamed part when nothing was picked
        if filename.is_empty() && bytes.is_empty() {
            return Err(IntakeError::MissingFile);
        }
        return Ok((filename, content_type, bytes.to_vec()));
    }

    Err(IntakeError::MissingFile)
}

fn with_cookie(response: impl IntoResponse, session_id: Uuid, created: bool) -> Response {
    let mut response = response.into_response();
    if created {
        response
            .headers_mut()
            .append(SET_COOKIE, session_cookie(session_id));
    }
    response
}

fn internal_error(e: Error) -> (StatusCode, Json<ErrorResponse>) {
    error!("Request failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Processing error: {}", e),
        }),
    )
}
