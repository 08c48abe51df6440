//! OAuth token handling for the calendar provider.
//!
//! This service is headless: tokens are provisioned out-of-band (one
//! interactive consent on an operator machine) and dropped into the data
//! directory as a JSON file. At runtime we only load the file and refresh
//! the access token when it has expired.

use std::path::{Path, PathBuf};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Clock skew allowance when deciding whether a token is still usable.
const EXPIRY_SKEW_SECS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix timestamp.
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub token_type: String,
}

impl OAuthTokens {
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => chrono::Utc::now().timestamp() + EXPIRY_SKEW_SECS >= at,
            None => false,
        }
    }
}

/// Token file plus the client credentials needed to refresh it.
pub struct TokenStore {
    path: PathBuf,
    client_id: String,
    client_secret: String,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>, client_id: String, client_secret: String) -> Self {
        Self {
            path: path.into(),
            client_id,
            client_secret,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<OAuthTokens, SyncError> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|_| SyncError::NotAuthenticated)?;
        serde_json::from_str(&content).map_err(|_| SyncError::NotAuthenticated)
    }

    fn save(&self, tokens: &OAuthTokens) -> Result<(), SyncError> {
        let content = serde_json::to_string_pretty(tokens)
            .map_err(|e| SyncError::TokenRefreshFailed(e.to_string()))?;
        std::fs::write(&self.path, content)
            .map_err(|e| SyncError::TokenRefreshFailed(e.to_string()))
    }

    /// Return a valid access token, refreshing and persisting when the
    /// stored one has expired.
    pub fn access_token(&self) -> Result<String, SyncError> {
        let tokens = self.load()?;
        if !tokens.is_expired() {
            return Ok(tokens.access_token);
        }

        let refresh = tokens
            .refresh_token
            .clone()
            .ok_or_else(|| SyncError::TokenRefreshFailed("no refresh token stored".into()))?;

        let refreshed = self.refresh(&refresh)?;
        self.save(&refreshed)?;
        Ok(refreshed.access_token)
    }

    fn refresh(&self, refresh_token: &str) -> Result<OAuthTokens, SyncError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let body: serde_json::Value = tokio::runtime::Handle::current().block_on(async {
            Client::new()
                .post(TOKEN_URL)
                .form(&params)
                .send()
                .await?
                .json()
                .await
        })?;

        if let Some(error) = body.get("error") {
            return Err(SyncError::TokenRefreshFailed(error.to_string()));
        }

        let expires_at = body
            .get("expires_in")
            .and_then(|v| v.as_i64())
            .map(|ei| chrono::Utc::now().timestamp() + ei);

        Ok(OAuthTokens {
            access_token: body["access_token"].as_str().unwrap_or_default().to_string(),
            // Google omits the refresh token on refresh responses; keep the old one.
            refresh_token: body
                .get("refresh_token")
                .and_then(|v| v.as_str())
                .map(String::from)
                .or_else(|| Some(refresh_token.to_string())),
            expires_at,
            token_type: body["token_type"].as_str().unwrap_or("Bearer").to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_file_means_not_authenticated() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("tokens.json"), String::new(), String::new());
        assert!(matches!(store.load(), Err(SyncError::NotAuthenticated)));
    }

    #[test]
    fn fresh_token_is_returned_without_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        let tokens = OAuthTokens {
            access_token: "abc".into(),
            refresh_token: None,
            expires_at: Some(chrono::Utc::now().timestamp() + 3600),
            token_type: "Bearer".into(),
        };
        std::fs::write(&path, serde_json::to_string(&tokens).unwrap()).unwrap();
        let store = TokenStore::new(&path, String::new(), String::new());
        assert_eq!(store.access_token().unwrap(), "abc");
    }

    #[test]
    fn expired_token_without_refresh_token_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        let tokens = OAuthTokens {
            access_token: "abc".into(),
            refresh_token: None,
            expires_at: Some(0),
            token_type: "Bearer".into(),
        };
        std::fs::write(&path, serde_json::to_string(&tokens).unwrap()).unwrap();
        let store = TokenStore::new(&path, String::new(), String::new());
        assert!(matches!(
            store.access_token(),
            Err(SyncError::TokenRefreshFailed(_))
        ));
    }
}
