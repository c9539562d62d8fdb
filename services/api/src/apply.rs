use careers_portal::client::{
    load_attachment, ApplicationForm, FormFields, HttpGateway, SubmitStatus,
};
use careers_portal::error::AppError;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ApplyArgs {
    /// Base URL of the running portal
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    pub(crate) endpoint: String,
    /// Applicant first name
    #[arg(long, default_value = "")]
    pub(crate) first_name: String,
    /// Applicant last name
    #[arg(long, default_value = "")]
    pub(crate) last_name: String,
    /// Contact email address
    #[arg(long, default_value = "")]
    pub(crate) email: String,
    /// Contact phone number, optionally with a leading +
    #[arg(long, default_value = "")]
    pub(crate) phone: String,
    /// Cover letter or message
    #[arg(long, default_value = "")]
    pub(crate) message: String,
    /// CV or cover letter to attach (PDF or Word, at most 10MB)
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
}

pub(crate) async fn run_apply(args: ApplyArgs) -> Result<(), AppError> {
    let ApplyArgs {
        endpoint,
        first_name,
        last_name,
        email,
        phone,
        message,
        file,
    } = args;

    let gateway = HttpGateway::new(&endpoint);
    info!(endpoint = gateway.endpoint(), "submitting application");
    let mut form = ApplicationForm::new(gateway);

    if let Some(path) = file {
        let upload = load_attachment(&path).await?;
        println!(
            "Attaching {} ({}, {} bytes)",
            upload.file_name,
            upload.content_type,
            upload.size()
        );
        form.select_attachment(upload);
    }

    let mut fields = FormFields {
        first_name,
        last_name,
        email,
        phone,
        message,
    };

    let state = form.submit(&mut fields).await;
    match state.status {
        SubmitStatus::Success => {
            println!("Application submitted successfully! We'll get back to you soon.");
            Ok(())
        }
        SubmitStatus::Error | SubmitStatus::Idle => {
            Err(AppError::Rejected(state.error_message.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn incomplete_form_is_rejected_before_any_request() {
        let args = ApplyArgs {
            // Nothing listens here; a request would surface as a network error instead.
            endpoint: "http://127.0.0.1:9".to_string(),
            first_name: "Jane".to_string(),
            last_name: String::new(),
            email: "jane@x.com".to_string(),
            phone: "+12345".to_string(),
            message: "Hello".to_string(),
            file: None,
        };

        let err = run_apply(args).await.expect_err("rejected");
        assert_eq!(
            err.to_string(),
            "application not submitted: All fields are required"
        );
    }
}
