//! Form-side counterpart of the intake endpoint.

mod form;
mod gateway;


pub use form::{
    load_attachment, ApplicationForm, FormFields, FormState, SubmitStatus, ATTACHMENT_ERROR,
    GENERIC_ERROR, NETWORK_ERROR,
};
pub use gateway::{GatewayError, GatewayResponse, HttpGateway, SubmissionGateway};
