//! Token bootstrap: the launch URL may carry a `token` query parameter which is
//! persisted to local storage and stripped from the URL before it is shown.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::info;
use url::Url;

pub const TOKEN_QUERY_PARAM: &str = "token";
const TOKEN_FILE_NAME: &str = "token";
const APP_DIR_NAME: &str = "contacts-dashboard";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid launch url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("token store at '{}' is not accessible: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no writable data directory available for the token store")]
    NoDataDir,
}

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, SessionError>;
    fn save(&self, token: &str) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// File-backed stand-in for browser local storage.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Result<PathBuf, SessionError> {
        dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .map(|dir| dir.join(APP_DIR_NAME).join(TOKEN_FILE_NAME))
            .ok_or(SessionError::NoDataDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        fs::write(&self.path, token).map_err(|err| self.io_error(err))
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bootstrap {
    /// Launch URL with the token parameter removed.
    pub url: Url,
    /// Token from the URL if it carried one, otherwise whatever was stored.
    pub token: Option<String>,
}

pub fn bootstrap_from_url(launch_url: &str, store: &dyn TokenStore) -> Result<Bootstrap, SessionError> {
    let mut url = Url::parse(launch_url).map_err(|source| SessionError::InvalidUrl {
        url: launch_url.to_string(),
        source,
    })?;

    let mut inbound_token = None;
    let mut kept = Vec::new();
    for (key, value) in url.query_pairs() {
        if key == TOKEN_QUERY_PARAM {
            inbound_token = Some(value.into_owned());
        } else {
            kept.push((key.into_owned(), value.into_owned()));
        }
    }

    if inbound_token.is_none() {
        return Ok(Bootstrap {
            url,
            token: store.load()?,
        });
    }

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    let token = match inbound_token.filter(|t| !t.trim().is_empty()) {
        Some(token) => {
            store.save(&token)?;
            info!("persisted session token from launch url");
            Some(token)
        }
        None => store.load()?,
    };

    Ok(Bootstrap { url, token })
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
