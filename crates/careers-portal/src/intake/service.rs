use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use super::domain::{ApplicationSubmission, SubmissionReceipt};
use super::logo::LogoAsset;
use super::mailer::{MailConnector, MailError, MailSession, OutboundEmail};
use super::template::{render_application_email, subject_line};
use super::validation::{validate_submission, ValidationError};
use crate::config::{BrandingConfig, ConfigError, SmtpSettingsSource};

const GENERIC_FAILURE: &str = "Failed to submit application. Please try again.";

/// Failure of a single submission. `Display` is the JSON `error` text.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    MalformedRequest(String),
    #[error("{0}")]
    Configuration(ConfigError),
    #[error("Email service connection failed: {0}")]
    Connection(MailError),
    #[error("{}", delivery_message(.0))]
    Delivery(MailError),
}

fn delivery_message(err: &MailError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        message
    }
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) | RelayError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::Configuration(_) | RelayError::Connection(_) | RelayError::Delivery(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ConfigError> for RelayError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value)
    }
}

/// Validates an application and relays it to the recruiting mailbox.
pub struct ApplicationRelay<S, M> {
    settings: Arc<S>,
    connector: Arc<M>,
    branding: BrandingConfig,
}

impl<S, M> ApplicationRelay<S, M>
where
    S: SmtpSettingsSource + 'static,
    M: MailConnector + 'static,
{
    pub fn new(settings: Arc<S>, connector: Arc<M>, branding: BrandingConfig) -> Self {
        Self {
            settings,
            connector,
            branding,
        }
    }

    pub async fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<SubmissionReceipt, RelayError> {
        self.submit_at(submission, Utc::now()).await
    }

    /// Run the pipeline with an explicit receive time.
    ///
    /// Gates, in order: field validation, SMTP settings, session, verify, send. The first
    /// gate that fails decides the response and nothing after it runs.
    pub async fn submit_at(
        &self,
        submission: ApplicationSubmission,
        received_at: DateTime<Utc>,
    ) -> Result<SubmissionReceipt, RelayError> {
        let submission = submission.trimmed();
        if let Err(reason) = validate_submission(&submission) {
            warn!(%reason, "rejected application");
            return Err(reason.into());
        }

        let settings = self.settings.load().map_err(|err| {
            error!(error = %err, "SMTP settings unusable");
            RelayError::from(err)
        })?;
        let credentials = settings.credentials().map_err(|err| {
            error!(error = %err, "SMTP credentials missing");
            RelayError::from(err)
        })?;
        let sender = credentials.user.clone();
        let recipient = settings.recipient().unwrap_or(&sender).to_string();

        let session = self
            .connector
            .connect(&settings, credentials)
            .map_err(RelayError::Connection)?;

        if let Err(err) = session.verify().await {
            error!(host = %settings.host, port = settings.port, error = %err, "SMTP verification failed");
            return Err(RelayError::Connection(err));
        }

        let logo = LogoAsset::resolve(&self.branding.logo_path).await;
        let html = render_application_email(&submission, &logo.img_src(), received_at);
        let subject = subject_line(&submission);
        let applicant = submission.full_name();

        let documents: Vec<_> = submission
            .attachment
            .filter(|upload| !upload.is_empty())
            .into_iter()
            .collect();
        let has_document = !documents.is_empty();

        let email = OutboundEmail {
            from: sender,
            to: recipient,
            subject,
            html,
            inline_logo: logo.into_inline(),
            documents,
        };

        if let Err(err) = session.send(email).await {
            error!(error = %err, "failed to send application email");
            return Err(RelayError::Delivery(err));
        }

        info!(
            %applicant,
            has_document,
            "application relayed"
        );
        Ok(SubmissionReceipt::accepted())
    }
}
