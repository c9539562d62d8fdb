use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

pub const LOGO_CONTENT_ID: &str = "intellectus-logo";
pub const LOGO_FILE_NAME: &str = "logo.png";
pub const LOGO_CONTENT_TYPE: &str = "image/png";

const PLACEHOLDER_SVG: &str = r##"<svg width="200" height="60" viewBox="0 0 200 60" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="logoGradient" x1="0%" y1="0%" x2="100%" y2="0%">
      <stop offset="0%" style="stop-color:#1a1a1a;stop-opacity:1" />
      <stop offset="100%" style="stop-color:#2a2a2a;stop-opacity:1" />
    </linearGradient>
  </defs>
  <rect width="200" height="60" fill="url(#logoGradient)" rx="8"/>
  <rect x="20" y="15" width="8" height="30" fill="#4285f4"/>
  <rect x="16" y="15" width="16" height="4" fill="#4285f4"/>
  <rect x="16" y="41" width="16" height="4" fill="#4285f4"/>
  <rect x="40" y="15" width="6" height="30" fill="white"/>
  <rect x="40" y="15" width="20" height="6" fill="white"/>
  <rect x="54" y="15" width="6" height="30" fill="white"/>
  <rect x="70" y="15" width="20" height="6" fill="white"/>
  <rect x="78" y="15" width="6" height="30" fill="white"/>
  <rect x="100" y="15" width="6" height="30" fill="white"/>
  <rect x="100" y="15" width="16" height="6" fill="white"/>
  <rect x="100" y="27" width="12" height="6" fill="white"/>
  <rect x="100" y="39" width="16" height="6" fill="white"/>
  <rect x="125" y="15" width="6" height="30" fill="white"/>
  <rect x="125" y="39" width="16" height="6" fill="white"/>
  <rect x="150" y="15" width="6" height="30" fill="white"/>
  <rect x="150" y="39" width="16" height="6" fill="white"/>
  <text x="100" y="55" font-family="Arial, sans-serif" font-size="8" fill="#cccccc" text-anchor="middle">CAPITAL</text>
</svg>"##;

/// PNG bytes sent as a `multipart/related` part and referenced by content id.
#[derive(Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub content_id: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for InlineImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InlineImage")
            .field("content_id", &self.content_id)
            .field("file_name", &self.file_name)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Branding image for the email header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoAsset {
    /// Logo file found on disk; attached inline.
    Inline(InlineImage),
    /// No file; the SVG placeholder is embedded in the `<img>` itself.
    Placeholder { data_uri: String },
}

impl LogoAsset {
    /// Load the logo at `path`, falling back to the placeholder on any read failure.
    pub async fn resolve(path: &Path) -> Self {
        match tokio::fs::read(path).await {
            Ok(bytes) => Self::Inline(InlineImage {
                content_id: LOGO_CONTENT_ID.to_string(),
                file_name: LOGO_FILE_NAME.to_string(),
                content_type: LOGO_CONTENT_TYPE.to_string(),
                bytes,
            }),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "logo unavailable, using placeholder");
                Self::placeholder()
            }
        }
    }

    pub fn placeholder() -> Self {
        let encoded = STANDARD.encode(PLACEHOLDER_SVG.as_bytes());
        Self::Placeholder {
            data_uri: format!("data:image/svg+xml;base64,{encoded}"),
        }
    }

    /// Value for the `src` attribute of the header `<img>`.
    pub fn img_src(&self) -> String {
        match self {
            LogoAsset::Inline(image) => format!("cid:{}", image.content_id),
            LogoAsset::Placeholder { data_uri } => data_uri.clone(),
        }
    }

    pub fn into_inline(self) -> Option<InlineImage> {
        match self {
            LogoAsset::Inline(image) => Some(image),
            LogoAsset::Placeholder { .. } => None,
        }
    }
}
