use serde::Deserialize;
use sqlx::FromRow;

/// Job application record in the database.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Application {
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

#[derive(Debug, Clone)]
pub struct NewApplication {
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

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationChanges {
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
}

impl ApplicationChanges {
    fn values(&self) -> [&Option<String>; 10] {
        [
            &self.job_name,
            &self.company_name,
            &self.website_url,
            &self.date_applied,
            &self.contact_name,
            &self.contact_phone,
            &self.contact_email,
            &self.interview_date,
            &self.status,
            &self.notes,
        ]
    }

    /// True when at least one field carries a non-empty value.
    pub fn has_any(&self) -> bool {
        self.values()
            .iter()
            .any(|v| v.as_deref().is_some_and(|s| !s.is_empty()))
    }
}
