use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::controller::state::RowsPerPage;

pub const SETTINGS_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub token_path: Option<PathBuf>,
    pub rows_per_page: RowsPerPage,
    pub request_wait_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000/api".into(),
            token_path: None,
            rows_per_page: RowsPerPage::default(),
            request_wait_secs: 30,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    token_path: Option<PathBuf>,
    rows_per_page: Option<u32>,
    request_wait_secs: Option<u64>,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then environment variables.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, file_cfg),
            Err(err) => {
                tracing::warn!(path = %path.display(), "ignoring malformed settings file: {err}")
            }
        }
    }

    if let Some(v) = env("CONTACTS_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("CONTACTS_TOKEN_PATH") {
        settings.token_path = Some(PathBuf::from(v));
    }
    if let Some(v) = env("APP__TOKEN_PATH") {
        settings.token_path = Some(PathBuf::from(v));
    }

    if let Some(v) = env("APP__ROWS_PER_PAGE") {
        match v.trim().parse::<u32>().map(RowsPerPage::try_from) {
            Ok(Ok(rows)) => settings.rows_per_page = rows,
            _ => tracing::warn!(value = %v, "ignoring invalid APP__ROWS_PER_PAGE"),
        }
    }

    if let Some(v) = env("APP__REQUEST_WAIT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_wait_secs = parsed;
        }
    }

    settings
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.api_url {
        settings.api_url = v;
    }
    if let Some(v) = file_cfg.token_path {
        settings.token_path = Some(v);
    }
    if let Some(v) = file_cfg.rows_per_page {
        match RowsPerPage::try_from(v) {
            Ok(rows) => settings.rows_per_page = rows,
            Err(err) => tracing::warn!("ignoring rows_per_page from settings file: {err}"),
        }
    }
    if let Some(v) = file_cfg.request_wait_secs {
        settings.request_wait_secs = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
