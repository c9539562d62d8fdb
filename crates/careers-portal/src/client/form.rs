use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::gateway::{GatewayError, SubmissionGateway};
use crate::intake::validation::check_form;
use crate::intake::{ApplicationSubmission, DocumentUpload};

pub const GENERIC_ERROR: &str = "An error occurred";
pub const NETWORK_ERROR: &str = "Network error. Please try again.";
pub const ATTACHMENT_ERROR: &str = "Could not attach the selected file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Success,
    Error,
}

/// Raw input values as typed by the applicant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl FormFields {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// UI-local state of the application form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub attachment: Option<DocumentUpload>,
    pub submitting: bool,
    pub status: SubmitStatus,
    pub error_message: String,
}

impl FormState {
    fn fail(&mut self, message: impl Into<String>) {
        self.status = SubmitStatus::Error;
        self.error_message = message.into();
    }
}

/// Read a document from disk, guessing its MIME type from the extension.
pub async fn load_attachment(path: &Path) -> std::io::Result<DocumentUpload> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Ok(DocumentUpload::new(file_name, content_type, bytes))
}

/// Client side of the application flow: advisory checks, then one POST.
pub struct ApplicationForm<G> {
    gateway: G,
    state: FormState,
}

impl<G: SubmissionGateway> ApplicationForm<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: FormState::default(),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn select_attachment(&mut self, upload: DocumentUpload) {
        self.state.attachment = Some(upload);
    }

    pub fn clear_attachment(&mut self) {
        self.state.attachment = None;
    }

    /// Validate `fields`, post them, and record the outcome. Clears the form on success.
    pub async fn submit(&mut self, fields: &mut FormFields) -> &FormState {
        self.state.submitting = true;
        self.state.status = SubmitStatus::Idle;
        self.state.error_message.clear();

        let submission = ApplicationSubmission {
            first_name: fields.first_name.trim().to_string(),
            last_name: fields.last_name.trim().to_string(),
            email: fields.email.trim().to_string(),
            phone: fields.phone.trim().to_string(),
            message: fields.message.trim().to_string(),
            attachment: self.state.attachment.clone(),
        };

        if let Err(reason) = check_form(&submission) {
            self.state.fail(reason.client_message());
            self.state.submitting = false;
            return &self.state;
        }

        match self.gateway.post(&submission).await {
            Ok(response) => {
                let accepted = response.is_success();
                match (accepted, response.body) {
                    (true, Some(_)) => {
                        self.state.status = SubmitStatus::Success;
                        self.state.attachment = None;
                        fields.clear();
                        debug!(status = response.status, "application accepted");
                    }
                    (false, Some(body)) => self.state.fail(server_error(&body)),
                    (_, None) => self.state.fail(NETWORK_ERROR),
                }
            }
            Err(GatewayError::ContentType(content_type)) => {
                debug!(%content_type, "attachment type cannot be encoded");
                self.state.fail(ATTACHMENT_ERROR);
            }
            Err(err) => {
                debug!(error = %err, "application request failed");
                self.state.fail(NETWORK_ERROR);
            }
        }

        self.state.submitting = false;
        &self.state
    }
}

fn server_error(body: &Value) -> String {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .unwrap_or(GENERIC_ERROR)
        .to_string()
}
