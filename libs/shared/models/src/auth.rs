use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried by access tokens issued by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: u64,
    pub iat: Option<u64>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub aud: Option<String>,
    pub user_metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_practitioner(&self) -> bool {
        matches!(self.role.as_deref(), Some("practitioner") | Some("doctor"))
    }
}
