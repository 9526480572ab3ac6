//! Authorization-code flow against the Google authorization server.

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use crate::app_config::OAuthConfig;
use crate::token::Token;

/// Fixed state parameter sent with the consent URL.
pub const AUTH_STATE: &str = "state-token";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl From<TokenResponse> for Token {
    fn from(resp: TokenResponse) -> Self {
        Token::from_expires_in(
            resp.access_token,
            resp.token_type,
            resp.refresh_token,
            resp.expires_in,
        )
    }
}

/// Consent URL requesting offline access, so the exchange also yields a refresh token.
pub fn auth_code_url(config: &OAuthConfig, state: &str) -> Result<Url> {
    let scope = config.scopes.join(" ");

    Url::parse_with_params(
        &config.auth_uri,
        &[
            ("access_type", "offline"),
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("state", state),
        ],
    )
    .with_context(|| format!("Invalid auth_uri: {}", config.auth_uri))
}

pub async fn exchange(http: &reqwest::Client, config: &OAuthConfig, code: &str) -> Result<Token> {
    let params = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
    ];

    let resp = post_token_request(http, &config.token_uri, &params)
        .await
        .context("Unable to retrieve token from web")?;

    Ok(resp.into())
}

/// Google typically omits the refresh token on refresh; the previous one is kept.
pub async fn refresh(http: &reqwest::Client, config: &OAuthConfig, token: &Token) -> Result<Token> {
    let refresh_token = token
        .refresh_token
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Token expired and refresh token is not set"))?;

    let params = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
    ];

    let resp = post_token_request(http, &config.token_uri, &params)
        .await
        .context("Failed to refresh token")?;

    let mut refreshed: Token = resp.into();
    if refreshed.refresh_token.is_none() {
        refreshed.refresh_token = token.refresh_token.clone();
    }

    Ok(refreshed)
}

async fn post_token_request(
    http: &reqwest::Client,
    token_uri: &str,
    params: &[(&str, &str)],
) -> Result<TokenResponse> {
    let response = http
        .post(token_uri)
        .form(params)
        .send()
        .await
        .with_context(|| format!("Failed to send token request to {}", token_uri))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        anyhow::bail!("Token endpoint returned {}: {}", status, error_text);
    }

    response
        .json()
        .await
        .context("Failed to parse token response")
}
