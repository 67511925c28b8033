use serde::{Deserialize, Serialize};

use super::repo_types::Application;
use crate::sanitize::{sanitize, sanitize_opt};

#[derive(Debug, Default, Deserialize)]
pub struct CreateApplicationRequest {
    pub job_name: Option<String>,
    pub company_name: Option<String>,
    pub website_url: Option<String>,
    pub date_applied: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub interview_date: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub user_id: Option<i32>,
}

/// Application as returned to clients; every free-text field is sanitized.
#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub id: i32,
    pub job_name: String,
    pub company_name: String,
    pub website_url: Option<String>,
    pub date_applied: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub interview_date: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub user_id: i32,
}

impl From<Application> for ApplicationResponse {
    fn from(a: Application) -> Self {
        Self {
            id: a.id,
            job_name: sanitize(&a.job_name),
            company_name: sanitize(&a.company_name),
            website_url: sanitize_opt(a.website_url.as_deref()),
            date_applied: sanitize_opt(a.date_applied.as_deref()),
            contact_name: sanitize_opt(a.contact_name.as_deref()),
            contact_phone: sanitize_opt(a.contact_phone.as_deref()),
            contact_email: sanitize_opt(a.contact_email.as_deref()),
            interview_date: sanitize_opt(a.interview_date.as_deref()),
            status: sanitize(&a.status),
            notes: sanitize_opt(a.notes.as_deref()),
            user_id: a.user_id,
        }
    }
}
