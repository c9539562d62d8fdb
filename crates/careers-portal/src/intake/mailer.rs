//! Outbound delivery over an authenticated SMTP relay.
//!
//! A [`MailConnector`] opens one [`MailSession`] per submission. The session is verified
//! before anything is sent and is dropped when the request finishes, whichever way it
//! finishes. Verification and delivery each open their own SMTP connection and close it
//! with `QUIT`.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::domain::DocumentUpload;
use super::logo::InlineImage;
use crate::config::{SmtpCredentials, SmtpSettings};

/// Transport-agnostic description of the notification email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub inline_logo: Option<InlineImage>,
    pub documents: Vec<DocumentUpload>,
}

impl OutboundEmail {
    /// Lay the email out as `multipart/mixed`: a `multipart/related` holding the HTML and the
    /// inline logo, followed by each document as a regular attachment.
    pub fn build_message(&self) -> Result<Message, MailError> {
        let from = parse_mailbox(&self.from)?;
        let to = parse_mailbox(&self.to)?;

        let mut related = MultiPart::related().singlepart(SinglePart::html(self.html.clone()));
        if let Some(logo) = &self.inline_logo {
            related = related.singlepart(
                Attachment::new_inline(logo.content_id.clone())
                    .body(logo.bytes.clone(), parse_content_type(&logo.content_type)?),
            );
        }

        let mut mixed = MultiPart::mixed().multipart(related);
        for document in &self.documents {
            mixed = mixed.singlepart(
                Attachment::new(document.file_name.clone()).body(
                    document.bytes.clone(),
                    parse_content_type(&document.content_type)?,
                ),
            );
        }

        Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject.clone())
            .multipart(mixed)
            .map_err(|err| MailError::Message(err.to_string()))
    }
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, MailError> {
    raw.parse::<Mailbox>().map_err(|err| MailError::Address {
        address: raw.to_string(),
        reason: err.to_string(),
    })
}

fn parse_content_type(raw: &str) -> Result<ContentType, MailError> {
    ContentType::parse(raw).map_err(|_| MailError::Message(format!("invalid content type '{raw}'")))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailError {
    #[error("unable to configure SMTP transport: {0}")]
    Transport(String),
    #[error("{0}")]
    Verify(String),
    #[error("invalid mailbox '{address}': {reason}")]
    Address { address: String, reason: String },
    #[error("unable to build email: {0}")]
    Message(String),
    #[error("{0}")]
    Send(String),
}

/// Opens an SMTP session for the settings in effect for one request.
pub trait MailConnector: Send + Sync {
    type Session: MailSession;

    fn connect(
        &self,
        settings: &SmtpSettings,
        credentials: SmtpCredentials,
    ) -> Result<Self::Session, MailError>;
}

/// One authenticated relay handle: verify first, then send.
#[async_trait]
pub trait MailSession: Send + Sync {
    async fn verify(&self) -> Result<(), MailError>;
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError>;
}

/// `lettre`-backed connector used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtpConnector;

pub struct SmtpSession {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl MailConnector for SmtpConnector {
    type Session = SmtpSession;

    fn connect(
        &self,
        settings: &SmtpSettings,
        credentials: SmtpCredentials,
    ) -> Result<SmtpSession, MailError> {
        // `secure` means TLS from the first byte; otherwise upgrade with STARTTLS.
        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|err| MailError::Transport(err.to_string()))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(credentials.user, credentials.pass))
            .build();

        Ok(SmtpSession { transport })
    }
}

#[async_trait]
impl MailSession for SmtpSession {
    async fn verify(&self) -> Result<(), MailError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailError::Verify(
                "SMTP server did not accept the connection".to_string(),
            )),
            Err(err) => Err(MailError::Verify(err.to_string())),
        }
    }

    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        let message = email.build_message()?;
        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|err| MailError::Send(err.to_string()))
    }
}
