//! OAuth2 token as it is persisted in the credential cache.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Tokens are treated as expired this long before their real expiry.
const EXPIRY_DELTA_SECS: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "zero_time_as_none"
    )]
    pub expiry: Option<DateTime<Utc>>,
}

impl Token {
    /// Build a token from a token-endpoint response, where lifetime is given in seconds.
    pub fn from_expires_in(
        access_token: String,
        token_type: String,
        refresh_token: Option<String>,
        expires_in: Option<i64>,
    ) -> Self {
        let expiry = expires_in
            .filter(|secs| *secs > 0)
            .map(|secs| Utc::now() + Duration::seconds(secs));

        Token {
            access_token,
            token_type,
            refresh_token: refresh_token.filter(|t| !t.is_empty()),
            expiry,
        }
    }

    /// A token without expiry never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry - Duration::seconds(EXPIRY_DELTA_SECS) <= now,
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

// Other OAuth2 clients write `0001-01-01T00:00:00Z` for "no expiry".
fn zero_time_as_none<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let expiry = Option::<DateTime<Utc>>::deserialize(deserializer)?;
    Ok(expiry.filter(|t| t.timestamp() > 0))
}
