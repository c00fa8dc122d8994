use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::client::AccessToken;
use crate::error::{CacheError, Result};

/// Default ledger file name (activity metadata table)
pub const DEFAULT_LEDGER_FILE: &str = "activities.csv";

/// Default archive file name (telemetry stream table)
pub const DEFAULT_ARCHIVE_FILE: &str = "streams.parquet";

/// Default access token file name
pub const DEFAULT_TOKEN_FILE: &str = "token.txt";

/// File locations for both persistent stores.
#[derive(Debug, Clone)]
pub struct CachePaths {
    pub ledger: PathBuf,
    pub archive: PathBuf,
}

impl Default for CachePaths {
    fn default() -> Self {
        Self {
            ledger: PathBuf::from(DEFAULT_LEDGER_FILE),
            archive: PathBuf::from(DEFAULT_ARCHIVE_FILE),
        }
    }
}

/// Load the access token from a token file, or prompt for one interactively.
///
/// Only the first line of the file is used, so the file may carry trailing
/// notes. An empty token is a configuration error either way.
pub fn load_token(path: &Path) -> Result<AccessToken> {
    let raw = if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        contents.lines().next().unwrap_or_default().trim().to_string()
    } else {
        prompt_token()?
    };

    if raw.is_empty() {
        return Err(CacheError::config(format!(
            "No access token in {} and none was entered",
            path.display()
        )));
    }

    Ok(AccessToken::new(raw))
}

fn prompt_token() -> Result<String> {
    print!("Enter access token: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
