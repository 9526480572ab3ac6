//! sheets-quickstart - read a Google Sheets range and append a dated row.
//!
//! The OAuth token is cached in:
//!   ~/.credentials/sheets.googleapis.com-go-quickstart.json

pub mod app_config;
pub mod authorizer;
pub mod client;
pub mod driver;
pub mod error;
pub mod oauth;
pub mod sheets;
pub mod token;
pub mod token_cache;

#[cfg(test)]
mod test_support;
