use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Catalog REST API the categories are loaded from
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub categories_path: String,
    /// The API is paginated; one large page stands in for "all categories"
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            categories_path: "/api/categories".to_string(),
            page_size: 1000,
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn categories_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.categories_path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directives; RUST_LOG takes precedence
    pub level: String,
    /// Relative paths are resolved against the executable directory
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,reqwest=warn,hyper=warn".to_string(),
            dir: "logs".to_string(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "http://127.0.0.1:3000"
categories_path = "/api/categories"
page_size = 1000
timeout_secs = 30

[logging]
level = "info,reqwest=warn,hyper=warn"
dir = "logs"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Some(exe_dir) = exe_dir() {
        let config_path = exe_dir.join("config.toml");

        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            return load_config_from(&config_path);
        } else {
            tracing::warn!("config.toml not found at: {}", config_path.display());
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.api.page_size == 0 {
        anyhow::bail!("api.page_size must be greater than zero");
    }
    Ok(config)
}

/// Get the log directory from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_log_dir(config: &LoggingConfig) -> PathBuf {
    let dir = Path::new(&config.dir);

    if dir.is_absolute() {
        return dir.to_path_buf();
    }

    match exe_dir() {
        Some(exe_dir) => exe_dir.join(dir),
        None => Path::new("target").join(dir),
    }
}

fn exe_dir() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    exe_path.parent().map(Path::to_path_buf)
}
