use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::Deserialize;
use thiserror::Error;

use crate::annotation::Body;
use crate::environment::{LocalEnvironment, UserIdentity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigPathError {
    #[error("neither XDG_CONFIG_HOME nor HOME is set")]
    MissingHomeDirectory,
}

const APP_DIR: &str = "annotation-popup";
const APP_CONFIG_FILE: &str = "config.json";

/// Settings from `config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Absent means anonymous mode.
    #[serde(default)]
    pub user: Option<UserIdentity>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub server_time_offset_ms: i64,
    #[serde(default)]
    pub apply_immediately: bool,
    #[serde(default)]
    pub template: Option<Vec<Body>>,
}

impl AppConfig {
    pub fn environment(&self) -> LocalEnvironment {
        LocalEnvironment::new(self.user.clone())
            .with_server_offset(Duration::milliseconds(self.server_time_offset_ms))
    }
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

pub fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(err) => {
            tracing::warn!(%err, "config path unavailable; using defaults");
            return AppConfig::default();
        }
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;

    fn scratch_root() -> PathBuf {
        std::env::temp_dir().join(format!("annotation-popup-config-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn app_config_path_prefers_xdg_config_home() {
        let path = app_config_path(
            APP_DIR,
            APP_CONFIG_FILE,
            Some(Path::new("/tmp/config-root")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(
            path,
            PathBuf::from("/tmp/config-root/annotation-popup/config.json")
        );
    }

    #[test]
    fn app_config_path_falls_back_to_home_dot_config() {
        let path = app_config_path(APP_DIR, APP_CONFIG_FILE, None, Some(Path::new("/tmp/home")))
            .expect("path should resolve");

        assert_eq!(
            path,
            PathBuf::from("/tmp/home/.config/annotation-popup/config.json")
        );
    }

    #[test]
    fn app_config_path_errors_when_home_missing_and_xdg_unset() {
        let error = app_config_path(APP_DIR, APP_CONFIG_FILE, None, None).unwrap_err();
        assert_eq!(error, ConfigPathError::MissingHomeDirectory);
    }

    #[test]
    fn load_app_config_uses_defaults_without_any_config_root() {
        let config = load_app_config_with(None, None);

        assert!(config.user.is_none());
        assert!(!config.read_only);
        assert_eq!(config.server_time_offset_ms, 0);
        assert!(config.template.is_none());
    }

    #[test]
    fn load_app_config_reads_user_and_template() {
        let root = scratch_root();
        let dir = root.join(APP_DIR);
        std::fs::create_dir_all(&dir).expect("config dir should be creatable");
        std::fs::write(
            dir.join(APP_CONFIG_FILE),
            r#"{
                "user": {"id": "u7", "displayName": "Grace"},
                "server_time_offset_ms": 1500,
                "template": [{"type": "TextualBody", "purpose": "tagging", "value": "todo"}]
            }"#,
        )
        .expect("config should be writable");

        let config = load_app_config_with(Some(&root), None);
        std::fs::remove_dir_all(&root).expect("cleanup should work");

        let user = config.user.clone().expect("user should be configured");
        assert_eq!(user.id.as_deref(), Some("u7"));
        assert_eq!(user.name.as_deref(), Some("Grace"));
        assert!(!config.read_only);
        assert_eq!(config.template.as_ref().map(Vec::len), Some(1));
        assert_eq!(
            config.environment().server_offset(),
            Duration::milliseconds(1500)
        );
        assert!(config.environment().current_user().is_some());
    }

    #[test]
    fn unparsable_config_falls_back_to_defaults() {
        let root = scratch_root();
        let dir = root.join(APP_DIR);
        std::fs::create_dir_all(&dir).expect("config dir should be creatable");
        std::fs::write(dir.join(APP_CONFIG_FILE), "{not json")
            .expect("config should be writable");

        let config = load_app_config_with(Some(&root), None);
        std::fs::remove_dir_all(&root).expect("cleanup should work");

        assert!(config.user.is_none());
        assert!(config.template.is_none());
    }
}
