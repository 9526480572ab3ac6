//! Interactive OAuth authorization: show the consent URL, take a code, exchange it.

use std::io::{BufRead, StdinLock};

use anyhow::{Context, Result};

use crate::app_config::OAuthConfig;
use crate::oauth::{self, AUTH_STATE};
use crate::token::Token;

/// Source of the authorization code the user copies from the consent page.
pub trait CodeProvider {
    fn authorization_code(&mut self) -> Result<String>;
}

/// Reads the first whitespace-delimited word from a reader, skipping blank lines.
pub struct ReaderCodeProvider<R> {
    reader: R,
}

impl ReaderCodeProvider<StdinLock<'static>> {
    pub fn stdin() -> Self {
        ReaderCodeProvider::new(std::io::stdin().lock())
    }
}

impl<R: BufRead> ReaderCodeProvider<R> {
    pub fn new(reader: R) -> Self {
        ReaderCodeProvider { reader }
    }
}

impl<R: BufRead> CodeProvider for ReaderCodeProvider<R> {
    fn authorization_code(&mut self) -> Result<String> {
        loop {
            let mut line = String::new();
            let read = self
                .reader
                .read_line(&mut line)
                .context("Unable to read authorization code")?;

            if read == 0 {
                anyhow::bail!("Unable to read authorization code: input closed");
            }

            if let Some(code) = line.split_whitespace().next() {
                return Ok(code.to_string());
            }
        }
    }
}

/// A code known ahead of time (`--auth-code`).
pub struct FixedCodeProvider(pub String);

impl CodeProvider for FixedCodeProvider {
    fn authorization_code(&mut self) -> Result<String> {
        if self.0.trim().is_empty() {
            anyhow::bail!("No authorization code entered");
        }
        Ok(self.0.trim().to_string())
    }
}

/// Produces a fresh token when nothing usable is cached.
#[allow(async_fn_in_trait)]
pub trait Authorizer {
    async fn authorize(&mut self, config: &OAuthConfig) -> Result<Token>;
}

/// Authorization-code flow where the user pastes the code back into the terminal.
pub struct WebAuthorizer<P> {
    http: reqwest::Client,
    codes: P,
}

impl<P: CodeProvider> WebAuthorizer<P> {
    pub fn new(http: reqwest::Client, codes: P) -> Self {
        WebAuthorizer { http, codes }
    }
}

impl<P: CodeProvider> Authorizer for WebAuthorizer<P> {
    async fn authorize(&mut self, config: &OAuthConfig) -> Result<Token> {
        let auth_url = oauth::auth_code_url(config, AUTH_STATE)?;

        println!(
            "Go to the following link in your browser then type the authorization code: \n{}",
            auth_url
        );

        let code = self.codes.authorization_code()?;

        tracing::debug!("exchanging authorization code for a token");
        oauth::exchange(&self.http, config, &code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{http_client, serve_once};
    use std::io::Cursor;

    #[test]
    fn reads_first_word() {
        let mut provider = ReaderCodeProvider::new(Cursor::new("4/0AbCd extra words\n"));
        assert_eq!(provider.authorization_code().unwrap(), "4/0AbCd");
    }

    #[test]
    fn skips_blank_lines() {
        let mut provider = ReaderCodeProvider::new(Cursor::new("\n   \n\t4/xyz\n"));
        assert_eq!(provider.authorization_code().unwrap(), "4/xyz");
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut provider = ReaderCodeProvider::new(Cursor::new("\n\n"));
        assert!(provider.authorization_code().is_err());
    }

    #[test]
    fn fixed_code_rejects_empty() {
        assert!(FixedCodeProvider("  ".to_string()).authorization_code().is_err());
        assert_eq!(
            FixedCodeProvider(" 4/abc ".to_string()).authorization_code().unwrap(),
            "4/abc"
        );
    }

    #[tokio::test]
    async fn web_authorizer_exchanges_provided_code() {
        let (addr, request) = serve_once(
            "200 OK",
            r#"{"access_token":"ya29.web","token_type":"Bearer","refresh_token":"1//web","expires_in":3600}"#,
        )
        .await;

        let config = OAuthConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_uri: format!("http://{addr}/token"),
            redirect_uri: "urn:ietf:wg:oauth:2.0:oob".to_string(),
            scopes: vec![],
        };

        let mut authorizer = WebAuthorizer::new(
            http_client(),
            ReaderCodeProvider::new(Cursor::new("typed-code\n")),
        );
        let token = authorizer.authorize(&config).await.unwrap();

        assert_eq!(token.access_token, "ya29.web");
        assert!(request.await.unwrap().contains("code=typed-code"));
    }
}
