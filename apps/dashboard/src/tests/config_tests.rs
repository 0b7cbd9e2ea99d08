use super::{load_settings_from, Settings};

use std::{collections::HashMap, fs, path::PathBuf};

use crate::controller::state::RowsPerPage;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn missing_file_and_env_yield_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_from(&dir.path().join("dashboard.toml"), env_from(&[]));
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.rows_per_page, RowsPerPage::Fifty);
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dashboard.toml");
    fs::write(
        &path,
        "api_url = \"https://crm.example.com/api\"\nrows_per_page = 100\ntoken_path = \"/tmp/tok\"\n",
    )
    .expect("write settings");

    let settings = load_settings_from(&path, env_from(&[]));
    assert_eq!(settings.api_url, "https://crm.example.com/api");
    assert_eq!(settings.rows_per_page, RowsPerPage::Hundred);
    assert_eq!(settings.token_path, Some(PathBuf::from("/tmp/tok")));
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dashboard.toml");
    fs::write(&path, "api_url = \"https://file.example.com/api\"\n").expect("write settings");

    let settings = load_settings_from(
        &path,
        env_from(&[
            ("CONTACTS_API_URL", "https://legacy.example.com/api"),
            ("APP__API_URL", "https://app.example.com/api"),
            ("APP__ROWS_PER_PAGE", "25"),
        ]),
    );
    assert_eq!(settings.api_url, "https://app.example.com/api");
    assert_eq!(settings.rows_per_page, RowsPerPage::TwentyFive);
}

#[test]
fn invalid_rows_per_page_is_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dashboard.toml");
    fs::write(&path, "rows_per_page = 30\n").expect("write settings");

    let settings = load_settings_from(&path, env_from(&[("APP__ROWS_PER_PAGE", "abc")]));
    assert_eq!(settings.rows_per_page, RowsPerPage::Fifty);
}

#[test]
fn malformed_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dashboard.toml");
    fs::write(&path, "api_url = [not toml").expect("write settings");

    let settings = load_settings_from(&path, env_from(&[]));
    assert_eq!(settings, Settings::default());
}
