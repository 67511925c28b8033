use serde::{Deserialize, Serialize};

/// JWT payload issued at login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub user_id: i32, // owning user's id
    pub sub: String,  // user_name
    #[serde(default)]
    pub iat: u64, // issued at (unix timestamp)
}
