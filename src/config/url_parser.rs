// ABOUTME: Parses database connection URLs into connection settings.
// ABOUTME: Supports postgres://, postgresql:// and sqlite:// URL schemes.

use super::{ConnectionConfig, DatabaseType};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Unsupported database scheme: {0}. Expected postgres, postgresql or sqlite")]
    UnsupportedScheme(String),
    #[error("Missing host in connection URL")]
    MissingHost,
    #[error("Missing username in connection URL")]
    MissingUsername,
    #[error("Missing database file path in SQLite URL")]
    MissingPath,
}

pub fn parse_connection_url(url_str: &str) -> Result<ConnectionConfig, ParseError> {
    let url = Url::parse(url_str).map_err(|e| ParseError::InvalidUrl(e.to_string()))?;

    let db_type = match url.scheme().to_lowercase().as_str() {
        "postgres" | "postgresql" => DatabaseType::Postgres,
        "sqlite" => DatabaseType::Sqlite,
        other => return Err(ParseError::UnsupportedScheme(other.to_string())),
    };

    if db_type == DatabaseType::Sqlite {
        return sqlite_config(&url);
    }

    let host = url.host_str().ok_or(ParseError::MissingHost)?.to_string();

    let username = url.username();
    if username.is_empty() {
        return Err(ParseError::MissingUsername);
    }

    let database = {
        let path = url.path();
        if path.len() > 1 {
            Some(path[1..].to_string())
        } else {
            None
        }
    };

    Ok(ConnectionConfig {
        db_type,
        host,
        port: url.port().unwrap_or(5432),
        username: percent_decode(username),
        password: percent_decode(url.password().unwrap_or("")),
        database,
        ..ConnectionConfig::default()
    })
}

/// `sqlite://ops.db` puts the file name in the host slot, so host and path are joined.
fn sqlite_config(url: &Url) -> Result<ConnectionConfig, ParseError> {
    let path = format!("{}{}", url.host_str().unwrap_or(""), url.path());
    if path.is_empty() {
        return Err(ParseError::MissingPath);
    }
    Ok(ConnectionConfig::sqlite(percent_decode(&path)))
}

fn percent_decode(s: &str) -> String {
    percent_encoding::percent_decode_str(s)
        .decode_utf8_lossy()
        .to_string()
}
