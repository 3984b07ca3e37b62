use serde::{Deserialize, Serialize};

/// Contact form fields are all optional on the wire so missing ones can be reported per field.
#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub fax_number: Option<String>,
}

#[derive(Deserialize)]
pub struct RespondMessageRequest {
    pub response_text: String,
}

#[derive(Serialize)]
pub struct SubmissionAccepted {
    pub message: &'static str,
}
