//! Field rules shared by the form client and the submission handler.
//!
//! The server runs [`validate_submission`] and is authoritative; the client runs
//! [`check_form`] before touching the network and reports the friendlier wording.

use std::sync::OnceLock;

use regex::Regex;

use super::domain::{ApplicationSubmission, DocumentUpload, MAX_ATTACHMENT_BYTES};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const PHONE_PATTERN: &str = r"^[+]?[1-9][0-9]{0,15}$";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern compiles"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Whitespace anywhere in the number is ignored, so `+1 555 0100` passes.
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    phone_regex().is_match(&compact)
}

/// Server-side rejection reasons. `Display` is the exact JSON `error` text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Please enter a valid phone number")]
    InvalidPhone,
    #[error("File size must be less than 10MB")]
    AttachmentTooLarge { size: usize },
    #[error("Only PDF and Word documents are allowed")]
    DisallowedFileType { content_type: String },
}

impl ValidationError {
    /// Wording shown by the form before anything is sent.
    pub fn client_message(&self) -> String {
        match self {
            ValidationError::InvalidEmail => "Please enter a valid email address".to_string(),
            other => other.to_string(),
        }
    }
}

fn has_missing_field(submission: &ApplicationSubmission) -> bool {
    [
        &submission.first_name,
        &submission.last_name,
        &submission.email,
        &submission.phone,
        &submission.message,
    ]
    .iter()
    .any(|value| value.trim().is_empty())
}

pub fn check_attachment_size(upload: &DocumentUpload) -> Result<(), ValidationError> {
    if upload.size() > MAX_ATTACHMENT_BYTES {
        return Err(ValidationError::AttachmentTooLarge {
            size: upload.size(),
        });
    }
    Ok(())
}

pub fn check_attachment(upload: &DocumentUpload) -> Result<(), ValidationError> {
    check_attachment_size(upload)?;
    if !upload.is_allowed_type() {
        return Err(ValidationError::DisallowedFileType {
            content_type: upload.content_type.clone(),
        });
    }
    Ok(())
}

/// Authoritative checks run by the handler before any SMTP traffic.
///
/// Order: required fields, email, phone, then the document (size before type).
/// Zero-byte uploads are skipped entirely.
pub fn validate_submission(submission: &ApplicationSubmission) -> Result<(), ValidationError> {
    if has_missing_field(submission) {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_email(submission.email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_valid_phone(&submission.phone) {
        return Err(ValidationError::InvalidPhone);
    }
    if let Some(upload) = submission.document() {
        check_attachment(upload)?;
    }
    Ok(())
}

/// Advisory checks run by the form. The document type is left to the server.
pub fn check_form(submission: &ApplicationSubmission) -> Result<(), ValidationError> {
    if has_missing_field(submission) {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_email(submission.email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_valid_phone(&submission.phone) {
        return Err(ValidationError::InvalidPhone);
    }
    if let Some(upload) = submission.attachment.as_ref() {
        check_attachment_size(upload)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::domain::{DocumentUpload, OOXML_WORD, PDF};

    fn valid() -> ApplicationSubmission {
        ApplicationSubmission {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone: "+12345".to_string(),
            message: "Hello".to_string(),
            attachment: None,
        }
    }

    #[test]
    fn email_shape_requires_user_domain_and_tld() {
        for ok in ["jane@x.com", "a.b+c@sub.example.co.uk", "x@y.z"] {
            assert!(is_valid_email(ok), "{ok} should pass");
        }
        for bad in ["jane", "jane@x", "@x.com", "jane@.com.", "ja ne@x.com", "a@b@c.com"] {
            assert!(!is_valid_email(bad), "{bad} should fail");
        }
    }

    #[test]
    fn phone_shape_strips_whitespace() {
        assert!(is_valid_phone("+12345"));
        assert!(is_valid_phone("+44 20 7946 0958"));
        assert!(is_valid_phone("5"));
        assert!(!is_valid_phone("0123"));
        assert!(!is_valid_phone("+1-555-0100"));
        assert!(!is_valid_phone("12345678901234567"));
    }

    #[test]
    fn blank_fields_are_missing() {
        let mut submission = valid();
        submission.message = "   \n".to_string();
        assert_eq!(
            validate_submission(&submission),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn missing_fields_reported_before_email_shape() {
        let mut submission = valid();
        submission.email = "not-an-email".to_string();
        submission.first_name.clear();
        assert_eq!(
            validate_submission(&submission),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn attachment_limit_is_inclusive() {
        let mut submission = valid();
        submission.attachment = Some(DocumentUpload::new(
            "cv.pdf",
            PDF,
            vec![0u8; MAX_ATTACHMENT_BYTES],
        ));
        assert_eq!(validate_submission(&submission), Ok(()));

        submission.attachment = Some(DocumentUpload::new(
            "cv.pdf",
            PDF,
            vec![0u8; MAX_ATTACHMENT_BYTES + 1],
        ));
        assert_eq!(
            validate_submission(&submission),
            Err(ValidationError::AttachmentTooLarge {
                size: MAX_ATTACHMENT_BYTES + 1
            })
        );
    }

    #[test]
    fn png_is_rejected_even_when_small() {
        let mut submission = valid();
        submission.attachment = Some(DocumentUpload::new("me.png", "image/png", vec![1, 2, 3]));
        let err = validate_submission(&submission).expect_err("png rejected");
        assert_eq!(err.to_string(), "Only PDF and Word documents are allowed");
    }

    #[test]
    fn word_documents_are_accepted() {
        let mut submission = valid();
        submission.attachment = Some(DocumentUpload::new("cv.docx", OOXML_WORD, vec![1]));
        assert_eq!(validate_submission(&submission), Ok(()));
    }

    #[test]
    fn client_wording_differs_only_for_email() {
        assert_eq!(
            ValidationError::InvalidEmail.client_message(),
            "Please enter a valid email address"
        );
        assert_eq!(
            ValidationError::MissingFields.client_message(),
            "All fields are required"
        );
    }

    #[test]
    fn form_check_leaves_file_type_to_server() {
        let mut submission = valid();
        submission.attachment = Some(DocumentUpload::new("me.png", "image/png", vec![1]));
        assert_eq!(check_form(&submission), Ok(()));
    }
}
