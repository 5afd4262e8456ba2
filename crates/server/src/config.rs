use std::{collections::HashMap, fs, path::PathBuf};

use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    pub context_path: String,
    pub templates_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            database_url: "sqlite://./data/bankit.db".into(),
            context_path: "/".into(),
            templates_dir: PathBuf::from("views"),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    match fs::read_to_string("server.toml") {
        Ok(raw) => apply_file_settings(&mut settings, &raw),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => warn!(%error, "failed to read server.toml; using defaults"),
    }

    apply_env_settings(&mut settings, |key| std::env::var(key).ok());

    settings.database_url = normalize_database_url(&settings.database_url);
    settings.context_path = normalize_context_path(&settings.context_path);
    settings
}

fn apply_file_settings(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, String>>(raw) {
        Ok(cfg) => cfg,
        Err(error) => {
            warn!(%error, "ignoring malformed server.toml");
            return;
        }
    };

    if let Some(v) = file_cfg.get("bind_addr") {
        settings.server_bind = v.clone();
    }
    if let Some(v) = file_cfg.get("database_url") {
        settings.database_url = v.clone();
    }
    if let Some(v) = file_cfg.get("context_path") {
        settings.context_path = v.clone();
    }
    if let Some(v) = file_cfg.get("templates_dir") {
        settings.templates_dir = PathBuf::from(v);
    }
}

/// Later keys win, so the `APP__*` aliases override the `BANKIT_*` names.
fn apply_env_settings(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    for key in ["BANKIT_BIND", "APP__BIND_ADDR"] {
        if let Some(v) = lookup(key) {
            settings.server_bind = v;
        }
    }
    for key in ["BANKIT_DATABASE_URL", "DATABASE_URL", "APP__DATABASE_URL"] {
        if let Some(v) = lookup(key) {
            settings.database_url = v;
        }
    }
    for key in ["BANKIT_CONTEXT_PATH", "APP__CONTEXT_PATH"] {
        if let Some(v) = lookup(key) {
            settings.context_path = v;
        }
    }
    for key in ["BANKIT_TEMPLATES_DIR", "APP__TEMPLATES_DIR"] {
        if let Some(v) = lookup(key) {
            settings.templates_dir = PathBuf::from(v);
        }
    }
}

pub(crate) fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

/// Leading slash, no trailing slash, `/` for the root.
pub(crate) fn normalize_context_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
