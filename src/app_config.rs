//! Application OAuth credentials.
//!
//! Read from the `client_secret.json` downloaded from the Google Cloud console,
//! which wraps the client under an `installed` or `web` key.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Full read/write access to the user's spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Clone, Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientCredentials>,
    web: Option<ClientCredentials>,
}

#[derive(Debug, Clone, Deserialize)]
struct ClientCredentials {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    auth_uri: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

/// Everything needed to talk to the authorization server for one client.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Unable to read client secret file: {} not found.\n\n\
                Download OAuth client credentials (type \"Desktop app\") from\n\
                https://console.cloud.google.com/apis/credentials\n\
                and save them as {}.",
                path.display(),
                path.display()
            );
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read client secret file {}", path.display()))?;

        Self::from_json(&contents, &[SPREADSHEETS_SCOPE])
            .with_context(|| format!("Unable to parse client secret file {}", path.display()))
    }

    pub fn from_json(json: &str, scopes: &[&str]) -> Result<Self> {
        let file: ClientSecretFile = serde_json::from_str(json)?;

        let creds = file
            .installed
            .or(file.web)
            .ok_or_else(|| anyhow::anyhow!("Expected an \"installed\" or \"web\" client"))?;

        let redirect_uri = creds
            .redirect_uris
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Client has no redirect_uris"))?;

        Ok(OAuthConfig {
            client_id: creds.client_id,
            client_secret: creds.client_secret,
            auth_uri: creds.auth_uri.unwrap_or_else(|| DEFAULT_AUTH_URI.to_string()),
            token_uri: creds.token_uri.unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            redirect_uri,
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        })
    }
}
