use sqlx::FromRow;

/// Saved job-search resource (link, article, tool).
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Resource {
    pub id: i32,
    pub resource_name: String,
    pub resource_url: String,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub notes: Option<String>,
    pub user_id: i32,
}

#[derive(Debug, Clone)]
pub struct NewResource {
    pub resource_name: String,
    pub resource_url: String,
    pub kind: String,
    pub notes: Option<String>,
    pub user_id: i32,
}
