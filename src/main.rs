use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sheets_quickstart::app_config::OAuthConfig;
use sheets_quickstart::authorizer::{CodeProvider, FixedCodeProvider, ReaderCodeProvider, WebAuthorizer};
use sheets_quickstart::client::{SheetsClient, get_client};
use sheets_quickstart::driver;
use sheets_quickstart::token_cache::{self, TokenCache};

#[derive(Parser, Debug)]
#[command(name = "sheets-quickstart")]
#[command(about = "Print the ClassData sheet and append today's squash row")]
struct Cli {
    /// Spreadsheet ID, found in the URL of the sheet
    #[arg(long = "id", default_value = "")]
    id: String,

    /// OAuth client credentials downloaded from the Google Cloud console
    #[arg(long, default_value = "client_secret.json")]
    client_secret: PathBuf,

    /// Token cache file (default: ~/.credentials/sheets.googleapis.com-go-quickstart.json)
    #[arg(long)]
    token_cache: Option<PathBuf>,

    /// Authorization code to exchange instead of prompting for one
    #[arg(long)]
    auth_code: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(go_style_args(std::env::args_os()));

    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    println!("id: {}", cli.id);
    println!("Connecting to Sheets API");

    let config = OAuthConfig::load(&cli.client_secret)?;

    let cache_path = match cli.token_cache {
        Some(path) => path,
        None => token_cache::default_path()?,
    };
    let cache = TokenCache::new(cache_path);

    let mut client = match cli.auth_code {
        Some(code) => connect(config, &cache, FixedCodeProvider(code)).await,
        None => connect(config, &cache, ReaderCodeProvider::stdin()).await,
    }
    .context("Unable to retrieve Sheets Client")?;

    let today = Local::now().date_naive();
    driver::run(&mut client, &cli.id, today, &mut std::io::stdout()).await?;

    Ok(())
}

async fn connect<P: CodeProvider>(
    config: OAuthConfig,
    cache: &TokenCache,
    codes: P,
) -> Result<SheetsClient> {
    let http = reqwest::Client::new();
    let mut authorizer = WebAuthorizer::new(http.clone(), codes);

    get_client(http, config, cache, &mut authorizer).await
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "sheets_quickstart=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Rewrites Go-style single-dash long flags (`-id abc`, `-id=abc`) to `--id`.
fn go_style_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .enumerate()
        .map(|(position, arg)| match arg.to_str() {
            Some(flag) if position > 0 && is_single_dash_long(flag) => {
                OsString::from(format!("-{}", flag))
            }
            _ => arg,
        })
        .collect()
}

fn is_single_dash_long(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    let name = rest.split('=').next().unwrap_or_default();

    !rest.starts_with('-')
        && name.len() > 1
        && name.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(go_style_args(args.iter().map(OsString::from)))
    }

    #[test]
    fn single_dash_id() {
        assert_eq!(parse(&["sheets-quickstart", "-id", "1BxiMVs0"]).id, "1BxiMVs0");
    }

    #[test]
    fn single_dash_id_with_equals() {
        assert_eq!(parse(&["sheets-quickstart", "-id=1BxiMVs0"]).id, "1BxiMVs0");
    }

    #[test]
    fn double_dash_id() {
        assert_eq!(parse(&["sheets-quickstart", "--id", "1BxiMVs0"]).id, "1BxiMVs0");
    }

    #[test]
    fn id_defaults_to_empty() {
        let cli = parse(&["sheets-quickstart"]);
        assert_eq!(cli.id, "");
        assert_eq!(cli.client_secret, PathBuf::from("client_secret.json"));
        assert!(cli.token_cache.is_none());
    }

    #[test]
    fn short_flags_untouched() {
        let cli = parse(&["sheets-quickstart", "-v", "-id", "abc"]);
        assert!(cli.verbose);
        assert_eq!(cli.id, "abc");
    }

    #[test]
    fn detects_single_dash_long_flags() {
        assert!(is_single_dash_long("-id"));
        assert!(is_single_dash_long("-client-secret=x.json"));
        assert!(!is_single_dash_long("-v"));
        assert!(!is_single_dash_long("--id"));
        assert!(!is_single_dash_long("1BxiMVs0"));
        assert!(!is_single_dash_long("-"));
    }
}
