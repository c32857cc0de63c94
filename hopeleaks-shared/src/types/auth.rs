use chrono::Utc;
use serde::{Deserialize, Serialize};

/// JWT claims issued by the Discord login flow.
///
/// Field names follow the token the frontend already stores in the `token`
/// cookie, hence the camelCase `isAdmin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub discord_id: String,
    pub username: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(discord_id: impl Into<String>, username: impl Into<String>, is_admin: bool, duration_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            discord_id: discord_id.into(),
            username: username.into(),
            is_admin,
            avatar: None,
            iat: now,
            exp: now + duration_secs,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.discord_id,
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

impl AuthUser {
    /// True when the user may act on resources owned by `owner_id`.
    pub fn can_access(&self, owner_id: &str) -> bool {
        self.is_admin || self.id == owner_id
    }
}
