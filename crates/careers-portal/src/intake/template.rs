use chrono::{DateTime, Utc};

use super::domain::ApplicationSubmission;

const STYLESHEET: &str = r#"
    body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; background-color: #f8f9fa; }
    .container { background-color: #ffffff; border-radius: 8px; box-shadow: 0 2px 10px rgba(0, 0, 0, 0.1); overflow: hidden; }
    .header { background: linear-gradient(135deg, #1a1a1a 0%, #2a2a2a 100%); color: white; padding: 30px; text-align: center; }
    .logo { margin-bottom: 15px; }
    .logo img { max-width: 220px; height: auto; display: block; margin: 0 auto; border-radius: 6px; background-color: #1e1e1e; padding: 10px; }
    .subtitle { font-size: 16px; opacity: 0.9; margin: 0; }
    .content { padding: 30px; }
    .title { color: #1a1a1a; font-size: 24px; margin-bottom: 25px; border-bottom: 2px solid #4285f4; padding-bottom: 10px; }
    .info-section { background-color: #f8f9fa; border-radius: 6px; padding: 20px; margin-bottom: 20px; }
    .info-row { display: flex; margin-bottom: 12px; align-items: flex-start; }
    .info-row:last-child { margin-bottom: 0; }
    .label { font-weight: 600; color: #555; min-width: 120px; margin-right: 15px; }
    .value { color: #333; flex: 1; }
    .message-section { background-color: #ffffff; border: 1px solid #e1e5e9; border-radius: 6px; padding: 20px; margin-top: 20px; }
    .message-label { font-weight: 600; color: #555; margin-bottom: 10px; display: block; }
    .message-content { color: #333; white-space: pre-wrap; line-height: 1.6; }
    .file-info { background-color: #e3f2fd; border-left: 4px solid #4285f4; padding: 15px; margin-top: 20px; border-radius: 0 6px 6px 0; }
    .file-name { font-weight: 600; color: #1976d2; }
    .footer { background-color: #f8f9fa; padding: 20px 30px; text-align: center; color: #666; font-size: 14px; border-top: 1px solid #e1e5e9; }
    .timestamp { color: #888; font-size: 12px; margin-top: 10px; }
"#;

pub fn subject_line(submission: &ApplicationSubmission) -> String {
    format!("New Internship Application from {}", submission.full_name())
}

/// `Sunday, October 18, 2026 at 02:30 PM UTC`
pub fn format_received(received_at: DateTime<Utc>) -> String {
    received_at.format("%A, %B %-d, %Y at %I:%M %p UTC").to_string()
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render the notification body sent to the recruiting mailbox.
pub fn render_application_email(
    submission: &ApplicationSubmission,
    logo_src: &str,
    received_at: DateTime<Utc>,
) -> String {
    let file_block = submission
        .document()
        .map(|upload| {
            format!(
                r#"<div class="file-info"><span class="file-name">&#128206; Attached File: {}</span></div>"#,
                escape_html(&upload.file_name)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>New Internship Application</title>
  <style>{style}</style>
</head>
<body>
  <div class="container">
    <div class="header">
      <div class="logo">
        <img src="{logo}" alt="Intellectus Capital" style="max-width: 220px; height: auto;">
      </div>
      <p class="subtitle">Investment Banking &amp; Corporate Advisory</p>
    </div>

    <div class="content">
      <h1 class="title">New Internship Application</h1>

      <div class="info-section">
        <div class="info-row"><span class="label">Name:</span><span class="value">{first} {last}</span></div>
        <div class="info-row"><span class="label">Email:</span><span class="value">{email}</span></div>
        <div class="info-row"><span class="label">Phone:</span><span class="value">{phone}</span></div>
      </div>

      <div class="message-section">
        <span class="message-label">Cover Letter / Message:</span>
        <div class="message-content">{message}</div>
      </div>

      {file_block}
    </div>

    <div class="footer">
      <p>This application was submitted through the Intellectus Capital careers portal.</p>
      <div class="timestamp">Received: {received}</div>
    </div>
  </div>
</body>
</html>
"#,
        style = STYLESHEET,
        logo = escape_html(logo_src),
        first = escape_html(&submission.first_name),
        last = escape_html(&submission.last_name),
        email = escape_html(&submission.email),
        phone = escape_html(&submission.phone),
        message = escape_html(&submission.message),
        file_block = file_block,
        received = format_received(received_at),
    )
}
