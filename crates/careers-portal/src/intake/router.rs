use std::sync::Arc;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tracing::warn;

use super::domain::{ApplicationSubmission, DocumentUpload, MAX_ATTACHMENT_BYTES};
use super::mailer::MailConnector;
use super::service::{ApplicationRelay, RelayError};
use super::validation::ValidationError;
use crate::config::SmtpSettingsSource;

pub const SUBMIT_FORM_PATH: &str = "/api/submit-form";

/// Room for a maximum-size document plus the text fields and multipart framing.
const REQUEST_BODY_LIMIT: usize = MAX_ATTACHMENT_BYTES + 1024 * 1024;

/// Router exposing the application form endpoint.
pub fn intake_router<S, M>(relay: Arc<ApplicationRelay<S, M>>) -> Router
where
    S: SmtpSettingsSource + 'static,
    M: MailConnector + 'static,
{
    Router::new()
        .route(SUBMIT_FORM_PATH, post(submit_form_handler::<S, M>))
        .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
        .with_state(relay)
}

pub(crate) async fn submit_form_handler<S, M>(
    State(relay): State<Arc<ApplicationRelay<S, M>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response
where
    S: SmtpSettingsSource + 'static,
    M: MailConnector + 'static,
{
    let submission = match multipart {
        Ok(multipart) => read_submission(multipart).await,
        Err(rejection) => Err(RelayError::MalformedRequest(rejection.body_text())),
    };

    let result = match submission {
        Ok(submission) => relay.submit(submission).await,
        Err(err) => {
            warn!(error = %err, "unreadable application form");
            Err(err)
        }
    };

    match result {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Collect the form fields. Unknown fields are skipped; the last value wins on repeats.
pub async fn read_submission(
    mut multipart: Multipart,
) -> Result<ApplicationSubmission, RelayError> {
    let mut submission = ApplicationSubmission::default();

    while let Some(field) = multipart.next_field().await.map_err(unreadable)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "firstName" => submission.first_name = field.text().await.map_err(unreadable)?,
            "lastName" => submission.last_name = field.text().await.map_err(unreadable)?,
            "email" => submission.email = field.text().await.map_err(unreadable)?,
            "phone" => submission.phone = field.text().await.map_err(unreadable)?,
            "message" => submission.message = field.text().await.map_err(unreadable)?,
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(unreadable)?;
                submission.attachment =
                    Some(DocumentUpload::new(file_name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    Ok(submission)
}

fn unreadable(err: MultipartError) -> RelayError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return RelayError::Validation(ValidationError::AttachmentTooLarge {
            size: REQUEST_BODY_LIMIT,
        });
    }
    RelayError::MalformedRequest(format!("Invalid form submission: {}", err.body_text()))
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
