//! Internship application intake: validation, email rendering, and SMTP relay.

pub mod domain;
pub mod logo;
pub mod mailer;
pub mod router;
pub mod service;
pub mod template;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationSubmission, DocumentUpload, SubmissionReceipt, ALLOWED_DOCUMENT_TYPES,
    MAX_ATTACHMENT_BYTES,
};
pub use logo::{InlineImage, LogoAsset};
pub use mailer::{MailConnector, MailError, MailSession, OutboundEmail, SmtpConnector};
pub use router::{intake_router, SUBMIT_FORM_PATH};
pub use service::{ApplicationRelay, RelayError};
pub use validation::{is_valid_email, is_valid_phone, validate_submission, ValidationError};
