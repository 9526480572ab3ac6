//! Single-file cache for the OAuth token.
//!
//! The token lives at:
//!   ~/.credentials/sheets.googleapis.com-go-quickstart.json

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::TokenCacheError;
use crate::token::Token;

const CACHE_DIR: &str = ".credentials";
const CACHE_FILE: &str = "sheets.googleapis.com-go-quickstart.json";

pub fn default_path() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Could not determine home directory")?
        .join(CACHE_DIR)
        .join(CACHE_FILE))
}

#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenCache { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Token, TokenCacheError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TokenCacheError::NotFound(self.path.clone()));
            }
            Err(source) => {
                return Err(TokenCacheError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&contents).map_err(|source| TokenCacheError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrites whatever is cached.
    pub fn save(&self, token: &Token) -> Result<()> {
        println!("Saving credential file to: {}", self.path.display());

        if let Some(parent) = self.path.parent() {
            create_private_dir(parent)?;
        }

        let mut contents = serde_json::to_string(token).context("Failed to serialize token")?;
        contents.push('\n');

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.path)
            .with_context(|| format!("Unable to cache oauth token at {}", self.path.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write token to {}", self.path.display()))?;

        // Set to owner-only (0600) in case the file already existed with wider permissions:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", self.path.display()))?;
        }

        tracing::debug!(path = %self.path.display(), "token cached");

        Ok(())
    }
}

fn create_private_dir(dir: &Path) -> Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }

    builder
        .create(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))
}
