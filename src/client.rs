//! Authenticated Sheets client, built from a cached or freshly authorized token.

use anyhow::{Context, Result};
use url::Url;

use crate::app_config::OAuthConfig;
use crate::authorizer::Authorizer;
use crate::error::TokenCacheError;
use crate::oauth;
use crate::sheets::{SheetsApi, UpdateValuesResponse, ValueInputOption, ValueRange};
use crate::token::Token;
use crate::token_cache::TokenCache;

pub const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/";

/// Load the cached token, or run the authorizer once and cache its token.
///
/// A cached token is used as-is; expiry is handled by the client on first use.
pub async fn get_client<A: Authorizer>(
    http: reqwest::Client,
    config: OAuthConfig,
    cache: &TokenCache,
    authorizer: &mut A,
) -> Result<SheetsClient> {
    let token = match cache.load() {
        Ok(token) => {
            tracing::info!(path = %cache.path().display(), "using cached token");
            token
        }
        Err(TokenCacheError::NotFound(path)) => {
            tracing::info!(path = %path.display(), "no cached token, starting authorization");
            authorize_and_cache(&config, cache, authorizer).await?
        }
        Err(e) => {
            tracing::warn!("{}; starting authorization", e);
            authorize_and_cache(&config, cache, authorizer).await?
        }
    };

    SheetsClient::new(http, config, token)
}

async fn authorize_and_cache<A: Authorizer>(
    config: &OAuthConfig,
    cache: &TokenCache,
    authorizer: &mut A,
) -> Result<Token> {
    let token = authorizer.authorize(config).await?;
    cache.save(&token)?;
    Ok(token)
}

/// Talks to the Sheets REST API, refreshing its token in memory when it expires.
pub struct SheetsClient {
    http: reqwest::Client,
    config: OAuthConfig,
    token: Token,
    base_url: Url,
}

impl SheetsClient {
    pub fn new(http: reqwest::Client, config: OAuthConfig, token: Token) -> Result<Self> {
        Self::with_base_url(http, config, token, SHEETS_BASE_URL)
    }

    pub fn with_base_url(
        http: reqwest::Client,
        config: OAuthConfig,
        token: Token,
        base_url: &str,
    ) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid Sheets base URL: {}", base_url))?;

        Ok(SheetsClient {
            http,
            config,
            token,
            base_url,
        })
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    async fn access_token(&mut self) -> Result<String> {
        if self.token.is_expired() {
            tracing::info!("access token expired, refreshing");
            self.token = oauth::refresh(&self.http, &self.config, &self.token).await?;
        }

        Ok(self.token.access_token.clone())
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Sheets base URL cannot hold a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(["spreadsheets", spreadsheet_id, "values", range]);
        Ok(url)
    }
}

impl SheetsApi for SheetsClient {
    async fn get_values(&mut self, spreadsheet_id: &str, range: &str) -> Result<ValueRange> {
        let url = self.values_url(spreadsheet_id, range)?;
        let bearer = self.access_token().await?;

        tracing::debug!(%url, "GET values");

        let response = self
            .http
            .get(url)
            .bearer_auth(bearer)
            .send()
            .await
            .with_context(|| format!("Failed to send read request for {}", range))?;

        let response = error_for_status(response).await?;

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse values for {}", range))
    }

    async fn update_values(
        &mut self,
        spreadsheet_id: &str,
        range: &str,
        values: &ValueRange,
        input: ValueInputOption,
    ) -> Result<UpdateValuesResponse> {
        let mut url = self.values_url(spreadsheet_id, range)?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", input.as_str());
        let bearer = self.access_token().await?;

        tracing::debug!(%url, rows = values.values.len(), "PUT values");

        let response = self
            .http
            .put(url)
            .bearer_auth(bearer)
            .json(values)
            .send()
            .await
            .with_context(|| format!("Failed to send update request for {}", range))?;

        let response = error_for_status(response).await?;

        let updated: UpdateValuesResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse update response for {}", range))?;

        tracing::info!(
            range = updated.updated_range.as_deref().unwrap_or(range),
            cells = updated.updated_cells.unwrap_or_default(),
            "values updated"
        );

        Ok(updated)
    }
}

async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    anyhow::bail!("Sheets API returned {}: {}", status, error_text);
}
