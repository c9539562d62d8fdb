use serde::Serialize;
use std::fmt;

/// Largest accepted document, inclusive.
pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

pub const PDF: &str = "application/pdf";
pub const LEGACY_WORD: &str = "application/msword";
pub const OOXML_WORD: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub const ALLOWED_DOCUMENT_TYPES: [&str; 3] = [PDF, LEGACY_WORD, OOXML_WORD];

/// One internship application as received from the form. Lives for a single request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApplicationSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub attachment: Option<DocumentUpload>,
}

impl ApplicationSubmission {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The uploaded document, ignoring zero-byte uploads (an empty file input).
    pub fn document(&self) -> Option<&DocumentUpload> {
        self.attachment.as_ref().filter(|upload| !upload.is_empty())
    }

    pub(crate) fn trimmed(mut self) -> Self {
        for field in [
            &mut self.first_name,
            &mut self.last_name,
            &mut self.email,
            &mut self.phone,
            &mut self.message,
        ] {
            *field = field.trim().to_string();
        }
        self
    }
}

impl fmt::Debug for ApplicationSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationSubmission")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("message_len", &self.message.len())
            .field("attachment", &self.attachment)
            .finish()
    }
}

/// Uploaded document held in memory for the lifetime of the request.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Declared MIME type without parameters, lowercased.
    pub fn essence(&self) -> String {
        match self.content_type.parse::<mime::Mime>() {
            Ok(parsed) => parsed.essence_str().to_ascii_lowercase(),
            Err(_) => self.content_type.trim().to_ascii_lowercase(),
        }
    }

    pub fn is_allowed_type(&self) -> bool {
        let essence = self.essence();
        ALLOWED_DOCUMENT_TYPES.contains(&essence.as_str())
    }
}

impl fmt::Debug for DocumentUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Body of a successful `POST /api/submit-form`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub message: String,
}

impl SubmissionReceipt {
    pub const SUCCESS: &'static str = "Application submitted successfully!";

    pub fn accepted() -> Self {
        Self {
            message: Self::SUCCESS.to_string(),
        }
    }
}
