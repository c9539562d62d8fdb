use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;

use crate::config::{BrandingConfig, SmtpCredentials, SmtpSettings};
use crate::intake::domain::{ApplicationSubmission, DocumentUpload};
use crate::intake::mailer::{MailConnector, MailError, MailSession, OutboundEmail};
use crate::intake::service::ApplicationRelay;

pub(super) const BOUNDARY: &str = "----careers-portal-boundary";

pub(super) fn jane() -> ApplicationSubmission {
    ApplicationSubmission {
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: "jane@x.com".to_string(),
        phone: "+12345".to_string(),
        message: "Hello".to_string(),
        attachment: None,
    }
}

pub(super) fn smtp_settings() -> SmtpSettings {
    SmtpSettings {
        host: "smtp.example.com".to_string(),
        port: 587,
        secure: false,
        user: Some("careers@example.com".to_string()),
        pass: Some("app-password".to_string()),
        recipient: Some("hiring@example.com".to_string()),
    }
}

pub(super) fn missing_logo() -> BrandingConfig {
    BrandingConfig {
        logo_path: PathBuf::from("/nonexistent/careers-portal/logo.png"),
    }
}

#[derive(Debug, Default)]
pub(super) struct Recorded {
    pub(super) connects: Vec<SmtpSettings>,
    pub(super) verifies: usize,
    pub(super) sent: Vec<OutboundEmail>,
    pub(super) released: usize,
}

/// Connector double recording every session operation.
#[derive(Clone, Default)]
pub(super) struct RecordingConnector {
    recorded: Arc<Mutex<Recorded>>,
    verify_failure: Option<String>,
    send_failure: Option<String>,
}

impl RecordingConnector {
    pub(super) fn failing_verify(reason: &str) -> Self {
        Self {
            verify_failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub(super) fn failing_send(reason: &str) -> Self {
        Self {
            send_failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub(super) fn with_recorded<T>(&self, inspect: impl FnOnce(&Recorded) -> T) -> T {
        let guard = self.recorded.lock().expect("recorder mutex poisoned");
        inspect(&guard)
    }
}

pub(super) struct RecordingSession {
    recorded: Arc<Mutex<Recorded>>,
    verify_failure: Option<String>,
    send_failure: Option<String>,
}

impl MailConnector for RecordingConnector {
    type Session = RecordingSession;

    fn connect(
        &self,
        settings: &SmtpSettings,
        _credentials: SmtpCredentials,
    ) -> Result<RecordingSession, MailError> {
        self.recorded
            .lock()
            .expect("recorder mutex poisoned")
            .connects
            .push(settings.clone());
        Ok(RecordingSession {
            recorded: self.recorded.clone(),
            verify_failure: self.verify_failure.clone(),
            send_failure: self.send_failure.clone(),
        })
    }
}

#[async_trait]
impl MailSession for RecordingSession {
    async fn verify(&self) -> Result<(), MailError> {
        self.recorded.lock().expect("recorder mutex poisoned").verifies += 1;
        match &self.verify_failure {
            Some(reason) => Err(MailError::Verify(reason.clone())),
            None => Ok(()),
        }
    }

    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        if let Some(reason) = &self.send_failure {
            return Err(MailError::Send(reason.clone()));
        }
        self.recorded
            .lock()
            .expect("recorder mutex poisoned")
            .sent
            .push(email);
        Ok(())
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.recorded.lock() {
            guard.released += 1;
        }
    }
}

pub(super) fn build_relay(
    settings: SmtpSettings,
    connector: RecordingConnector,
    branding: BrandingConfig,
) -> ApplicationRelay<SmtpSettings, RecordingConnector> {
    ApplicationRelay::new(Arc::new(settings), Arc::new(connector), branding)
}

/// Encode text fields and an optional file as `multipart/form-data`.
pub(super) fn multipart_body(fields: &[(&str, &str)], file: Option<&DocumentUpload>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some(upload) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                upload.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", upload.content_type).as_bytes());
        body.extend_from_slice(&upload.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) fn jane_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("firstName", "Jane"),
        ("lastName", "Doe"),
        ("email", "jane@x.com"),
        ("phone", "+12345"),
        ("message", "Hello"),
    ]
}

pub(super) fn form_request(body: Vec<u8>) -> Request<Body> {
    Request::post(crate::intake::SUBMIT_FORM_PATH)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
