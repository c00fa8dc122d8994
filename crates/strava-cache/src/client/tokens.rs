use serde::{Deserialize, Serialize};

/// Bearer token for Strava API requests.
///
/// Obtaining and refreshing the token is the job of an external OAuth flow;
/// this tool only consumes an already-issued access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// Returns the Authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}
