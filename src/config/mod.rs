mod api;
mod defaults;
mod validation;

use crate::cli::Args;
use crate::error::{Result, TaskdeskError};
use crate::session::FilesystemKeyValueStore;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub use api::ApiConfig;
pub use defaults::{default_base_url, default_notice_lifetime_ms, default_timeout_secs};
pub use validation::{expand_env_var_in_string, normalize_base_url};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NoticesConfig {
    #[serde(default)]
    pub lifetime_ms: Option<u64>,
}

/// Resolved settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
    pub storage_dir: PathBuf,
    pub notice_lifetime: Duration,
    pub verbose: bool,
}

/// On-disk configuration file contents.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub notices: NoticesConfig,
    #[serde(default)]
    pub verbose: Option<bool>,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = match FileConfig::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable config file");
                FileConfig::default()
            }
        };
        Self::resolve(args, file_config, |key| env::var(key).ok())
    }

    /// Layer CLI args over env vars over the config file over defaults.
    pub fn resolve(
        args: &Args,
        file_config: FileConfig,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let expand = |value: String| expand_env_var_in_string(&value, &env_lookup);

        // Base URL: CLI args > env var > config file > default
        let raw_base_url = args
            .base_url
            .clone()
            .or_else(|| env_lookup("TASKDESK_BASE_URL"))
            .or(file_config.api.base_url.map(expand))
            .unwrap_or_else(default_base_url);
        let base_url = normalize_base_url(&raw_base_url).map_err(TaskdeskError::ConfigError)?;

        // Request timeout: env var > config file > default
        let timeout_secs = env_lookup("TASKDESK_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .or(file_config.api.timeout_secs)
            .unwrap_or_else(default_timeout_secs);

        // Storage dir: CLI args > env var > config file > platform default
        let storage_dir = args
            .storage_dir
            .clone()
            .or_else(|| env_lookup("TASKDESK_STORAGE_DIR").map(PathBuf::from))
            .or(file_config.storage.dir.map(|dir| PathBuf::from(expand(dir))))
            .unwrap_or_else(FilesystemKeyValueStore::default_dir);

        let notice_lifetime_ms = file_config
            .notices
            .lifetime_ms
            .unwrap_or_else(default_notice_lifetime_ms);

        // Verbose: CLI flag > env var > config file > default
        let verbose = args.verbose
            || env_lookup("TASKDESK_VERBOSE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(file_config.verbose)
                .unwrap_or(false);

        Ok(Config {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            storage_dir,
            notice_lifetime: Duration::from_millis(notice_lifetime_ms),
            verbose,
        })
    }
}

impl FileConfig {
    pub fn load() -> anyhow::Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        // No config file found, return default
        Ok(FileConfig::default())
    }

    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(&contents).with_context(|| {
                format!("Failed to parse YAML config file: {}", path.display())
            })?
        } else {
            serde_json::from_str(&contents).with_context(|| {
                format!("Failed to parse JSON config file: {}", path.display())
            })?
        };
        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            // 1. Current directory (local override)
            PathBuf::from(".taskdesk.yaml"),
            PathBuf::from(".taskdesk.yml"),
            PathBuf::from(".taskdesk.json"),
        ];

        // 2. User's config directory
        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("taskdesk");
            paths.push(config_dir.join("taskdesk.yaml"));
            paths.push(config_dir.join("taskdesk.yml"));
            paths.push(config_dir.join("taskdesk.json"));
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["taskdesk"];
        argv.extend_from_slice(extra);
        argv.push("whoami");
        Args::parse_from(argv)
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve(&args(&[]), FileConfig::default(), env(&[])).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.notice_lifetime, Duration::from_millis(5000));
        assert!(!config.verbose);
    }

    #[test]
    fn test_cli_beats_env_beats_file() {
        let mut file = FileConfig::default();
        file.api.base_url = Some("http://file.example".to_string());

        let from_file = Config::resolve(&args(&[]), file.clone(), env(&[])).unwrap();
        assert_eq!(from_file.base_url, "http://file.example");

        let from_env = Config::resolve(
            &args(&[]),
            file.clone(),
            env(&[("TASKDESK_BASE_URL", "http://env.example/")]),
        )
        .unwrap();
        assert_eq!(from_env.base_url, "http://env.example");

        let from_cli = Config::resolve(
            &args(&["--base-url", "https://cli.example"]),
            file,
            env(&[("TASKDESK_BASE_URL", "http://env.example")]),
        )
        .unwrap();
        assert_eq!(from_cli.base_url, "https://cli.example");
    }

    #[test]
    fn test_file_values_expand_env_vars() {
        let mut file = FileConfig::default();
        file.api.base_url = Some("http://${TASK_HOST}:8080".to_string());
        file.storage.dir = Some("${DATA}/taskdesk".to_string());

        let config = Config::resolve(
            &args(&[]),
            file,
            env(&[("TASK_HOST", "tasks.internal"), ("DATA", "/srv")]),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://tasks.internal:8080");
        assert_eq!(config.storage_dir, PathBuf::from("/srv/taskdesk"));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let result = Config::resolve(
            &args(&["--base-url", "localhost:8080"]),
            FileConfig::default(),
            env(&[]),
        );
        assert!(matches!(result, Err(TaskdeskError::ConfigError(_))));
    }

    #[test]
    fn test_yaml_file_parses() {
        let yaml = "api:\n  base_url: http://tasks.example\n  timeout_secs: 5\nnotices:\n  lifetime_ms: 1500\nverbose: true\n";
        let file: FileConfig = serde_yaml::from_str(yaml).unwrap();
        let config = Config::resolve(&args(&[]), file, env(&[])).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.notice_lifetime, Duration::from_millis(1500));
        assert!(config.verbose);
    }
}
