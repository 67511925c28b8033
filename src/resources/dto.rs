use serde::{Deserialize, Serialize};

use super::repo_types::Resource;
use crate::sanitize::{sanitize, sanitize_opt};

#[derive(Debug, Default, Deserialize)]
pub struct CreateResourceRequest {
    pub resource_name: Option<String>,
    pub resource_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub notes: Option<String>,
    pub user_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ResourceResponse {
    pub id: i32,
    pub resource_name: String,
    pub resource_url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub notes: Option<String>,
    pub user_id: i32,
}

impl From<Resource> for ResourceResponse {
    fn from(r: Resource) -> Self {
        Self {
            id: r.id,
            resource_name: sanitize(&r.resource_name),
            resource_url: sanitize(&r.resource_url),
            kind: sanitize(&r.kind),
            notes: sanitize_opt(r.notes.as_deref()),
            user_id: r.user_id,
        }
    }
}
