use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::intake::{ApplicationSubmission, SUBMIT_FORM_PATH};

/// What came back from the submission endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status: u16,
    /// Parsed JSON body, `None` when the body was missing or not JSON.
    pub body: Option<Value>,
}

impl GatewayResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid attachment content type '{0}'")]
    ContentType(String),
    #[error("request failed: {0}")]
    Transport(String),
}

/// Carries a validated form to the submission endpoint.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn post(
        &self,
        submission: &ApplicationSubmission,
    ) -> Result<GatewayResponse, GatewayError>;
}

/// Posts `multipart/form-data` to a running portal over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGateway {
    /// `base_url` is the site root, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), SUBMIT_FORM_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn encode_form(submission: &ApplicationSubmission) -> Result<Form, GatewayError> {
    let mut form = Form::new()
        .text("firstName", submission.first_name.clone())
        .text("lastName", submission.last_name.clone())
        .text("email", submission.email.clone())
        .text("phone", submission.phone.clone())
        .text("message", submission.message.clone());

    if let Some(upload) = &submission.attachment {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|_| GatewayError::ContentType(upload.content_type.clone()))?;
        form = form.part("file", part);
    }

    Ok(form)
}

#[async_trait]
impl SubmissionGateway for HttpGateway {
    async fn post(
        &self,
        submission: &ApplicationSubmission,
    ) -> Result<GatewayResponse, GatewayError> {
        let form = encode_form(submission)?;
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response.json::<Value>().await.ok();
        Ok(GatewayResponse { status, body })
    }
}
