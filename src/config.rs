// Configuration module for callmap
// Reads from environment variables with sensible defaults

use std::env;
use std::sync::OnceLock;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory names skipped during traversal (CALLMAP_IGNORE_FOLDERS,
    /// comma-separated)
    pub ignore_folders: Vec<String>,

    /// Directory under the project root that the `@/` alias resolves into
    /// (CALLMAP_ALIAS_DIR)
    pub alias_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_folders: vec![
                "node_modules".to_string(),
                "dist".to_string(),
                ".git".to_string(),
                ".svn".to_string(),
                ".hg".to_string(),
                "vue.config.js".to_string(),
            ],
            alias_dir: "src".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(val) = env::var("CALLMAP_IGNORE_FOLDERS") {
            let folders: Vec<String> = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if folders.is_empty() {
                eprintln!(
                    "callmap: Warning: Empty CALLMAP_IGNORE_FOLDERS value, using default: {:?}",
                    config.ignore_folders
                );
            } else {
                config.ignore_folders = folders;
            }
        }

        if let Ok(val) = env::var("CALLMAP_ALIAS_DIR") {
            let trimmed = val.trim();
            if trimmed.is_empty() {
                eprintln!(
                    "callmap: Warning: Empty CALLMAP_ALIAS_DIR value, using default: {}",
                    config.alias_dir
                );
            } else {
                config.alias_dir = trimmed.to_string();
            }
        }

        config
    }

    /// Get the global configuration instance
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(Config::from_env)
    }
}
