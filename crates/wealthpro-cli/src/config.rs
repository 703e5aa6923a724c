use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default HTTP timeout for the Google backend.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Default look-ahead for `tasks upcoming`.
pub const DEFAULT_UPCOMING_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WealthProConfig {
    #[serde(default)]
    pub drive: DriveSection,
    #[serde(default)]
    pub http: HttpSection,
    #[serde(default)]
    pub tasks: TasksSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriveSection {
    #[serde(default)]
    pub backend: Backend,
    pub root_folder_id: Option<String>,
    pub local_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSection {
    pub timeout_seconds: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksSection {
    pub upcoming_days: i64,
}

impl Default for TasksSection {
    fn default() -> Self {
        Self {
            upcoming_days: DEFAULT_UPCOMING_DAYS,
        }
    }
}

/// Which drive implementation backs the CRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Google Drive and Sheets
    Google,
    /// Local SQLite file
    #[default]
    Local,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Local => "local",
        }
    }
}

impl WealthProConfig {
    pub fn new(
        backend: Backend,
        root_folder_id: Option<String>,
        local_path: Option<PathBuf>,
        timeout_seconds: u64,
    ) -> Self {
        Self {
            drive: DriveSection {
                backend,
                root_folder_id,
                local_path: local_path.map(|path| path.to_string_lossy().to_string()),
            },
            http: HttpSection { timeout_seconds },
            tasks: TasksSection::default(),
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_local_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("drive.sqlite"))
}

pub fn read_config(path: &Path) -> anyhow::Result<WealthProConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &WealthProConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("wealthpro"));
        }
    }
    Ok(home_dir()?.join(".config").join("wealthpro"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("wealthpro"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("wealthpro"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
