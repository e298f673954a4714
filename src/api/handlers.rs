use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::contact::{contact_link, ContactError};
use crate::content::SiteContent;
use crate::ideas::{report, GenerateError, IdeaResult};
use crate::media::{MediaError, MediaUpload};
use crate::notify::{Notification, Severity};
use crate::sections::section_visibility;
use crate::AppState;

use super::models::{ContactLinkRequest, ContactLinkResponse, ErrorResponse};

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(error))).into_response()
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn content_ideas(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<IdeaResult>) {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let result = IdeaResult::failure(format!(
                "invalid content idea request: {}",
                rejection.body_text()
            ));
            if let IdeaResult::Failure(error) = &result {
                state
                    .notifier
                    .notify(Notification::new(Severity::Error, error.clone()));
            }
            return (StatusCode::BAD_REQUEST, Json(result));
        }
    };

    let outcome = state.generator.generate_from_json(&payload).await;
    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(GenerateError::Validation(_)) => StatusCode::BAD_REQUEST,
        Err(GenerateError::Upstream(_) | GenerateError::Schema(_)) => StatusCode::BAD_GATEWAY,
    };

    (status, Json(report(outcome, state.notifier.as_ref())))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<MediaUpload, String> {
    while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| e.body_text())?;
        return Ok(MediaUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    Err("multipart field \"file\" is required".to_string())
}

pub async fn upload_media(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let file = match read_file_field(&mut multipart).await {
        Ok(file) => file,
        Err(error) => return error_response(StatusCode::BAD_REQUEST, error),
    };

    match state.media.upload(file).await {
        Ok(stored) => {
            state
                .notifier
                .notify(Notification::new(Severity::Success, "File uploaded"));
            (StatusCode::OK, Json(stored)).into_response()
        }
        Err(err) => {
            state
                .notifier
                .notify(Notification::new(Severity::Error, err.to_string()));
            let status = match err {
                MediaError::EmptyFile => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            };
            error_response(status, err.to_string())
        }
    }
}

pub async fn delete_media(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Response {
    match state.media.delete(&public_id).await {
        Ok(()) => {
            state
                .notifier
                .notify(Notification::new(Severity::Success, "File deleted"));
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => {
            state
                .notifier
                .notify(Notification::new(Severity::Error, err.to_string()));
            error_response(StatusCode::BAD_GATEWAY, err.to_string())
        }
    }
}

pub async fn sections(payload: Result<Json<SiteContent>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(content)) => Json(section_visibility(&content)).into_response(),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    }
}

pub async fn contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactLinkRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text())
        }
    };

    match contact_link(&state.contact_phone, &payload.name, &payload.message) {
        Ok(url) => Json(ContactLinkResponse { url }).into_response(),
        Err(err @ ContactError::InvalidPhone) => {
            tracing::error!(error = %err, "contact link requested without a phone number");
            error_response(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        Err(err) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
    }
}

pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}
