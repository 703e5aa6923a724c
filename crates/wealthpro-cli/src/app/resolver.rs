//! Resolution of config, backend settings and client references.

use std::path::{Path, PathBuf};
use std::time::Duration;

use wealthpro_core::clients::{ClientDirectory, ClientRecord};
use wealthpro_core::drive::{GoogleDrive, GoogleDriveConfig, SqliteDrive, ROOT_ID};
use wealthpro_core::{DriveClient, WorkspaceLayout};

use crate::cli::Cli;
use crate::config::{default_config_path, default_local_path, read_config, Backend, WealthProConfig};
use crate::constants::CLIENT_LIST_HINT;
use crate::errors::CliError;

/// Environment variable holding the Google OAuth access token.
pub const ACCESS_TOKEN_ENV: &str = "WEALTHPRO_ACCESS_TOKEN";

/// Everything needed to open a drive, after flags, env and config are merged.
#[derive(Debug, Clone)]
pub struct DriveSettings {
    pub backend: Backend,
    pub root_id: String,
    pub local_path: PathBuf,
    pub timeout: Duration,
    pub access_token: Option<String>,
    pub upcoming_days: i64,
}

/// Resolve the config file path, checking WEALTHPRO_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("WEALTHPRO_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Load the config file if it exists, defaults otherwise.
pub fn load_config() -> anyhow::Result<WealthProConfig> {
    let path = resolve_config_path()?;
    if path.exists() {
        read_config(&path)
    } else {
        Ok(WealthProConfig::default())
    }
}

/// Merge command-line flags (and their env vars) over the config file.
pub fn resolve_settings(cli: &Cli) -> anyhow::Result<DriveSettings> {
    let config = load_config()?;
    let backend = cli.backend.unwrap_or(config.drive.backend);

    let local_path = match cli.local_path.clone().or(config.drive.local_path) {
        Some(path) => PathBuf::from(path),
        None => default_local_path()?,
    };

    let (root_id, access_token) = match backend {
        Backend::Local => (
            cli.root.clone().unwrap_or_else(|| ROOT_ID.to_string()),
            None,
        ),
        Backend::Google => {
            let root = cli
                .root
                .clone()
                .or(config.drive.root_folder_id)
                .filter(|id| !id.trim().is_empty())
                .ok_or_else(|| {
                    CliError::config(
                        "No root folder ID configured for the google backend",
                        "Run `wealthpro init --backend google --root-folder-id <ID>` or set WEALTHPRO_ROOT_FOLDER_ID.",
                    )
                })?;
            let token = std::env::var(ACCESS_TOKEN_ENV)
                .ok()
                .filter(|token| !token.trim().is_empty())
                .ok_or_else(|| {
                    CliError::config(
                        format!("{} is not set", ACCESS_TOKEN_ENV),
                        "Export an OAuth access token with Drive and Sheets scopes.",
                    )
                })?;
            (root, Some(token))
        }
    };

    Ok(DriveSettings {
        backend,
        root_id,
        local_path,
        timeout: Duration::from_secs(config.http.timeout_seconds),
        access_token,
        upcoming_days: config.tasks.upcoming_days,
    })
}

/// Open the drive described by `settings`.
///
/// The local backend refuses to create a fresh file here; `init` does that.
pub fn open_drive(settings: &DriveSettings) -> anyhow::Result<Box<dyn DriveClient>> {
    match settings.backend {
        Backend::Local => {
            if !settings.local_path.exists() {
                return Err(CliError::not_found(
                    missing_drive_message(&settings.local_path),
                    "Run `wealthpro init` to create it.",
                )
                .into());
            }
            Ok(Box::new(SqliteDrive::open(&settings.local_path)?))
        }
        Backend::Google => {
            let token = settings.access_token.clone().ok_or_else(|| {
                CliError::config(
                    format!("{} is not set", ACCESS_TOKEN_ENV),
                    "Export an OAuth access token with Drive and Sheets scopes.",
                )
            })?;
            let config = GoogleDriveConfig::new(token).with_timeout(settings.timeout);
            Ok(Box::new(GoogleDrive::new(config)?))
        }
    }
}

pub fn missing_drive_message(path: &Path) -> String {
    format!("No local drive found at {}", path.display())
}

/// Resolve a client by folder ID or exact display name.
pub fn require_client<D: DriveClient + ?Sized>(
    drive: &D,
    layout: &WorkspaceLayout,
    reference: &str,
) -> anyhow::Result<ClientRecord> {
    ClientDirectory::new(drive, layout)
        .resolve(reference)?
        .ok_or_else(|| {
            CliError::not_found(format!("Client '{}' not found", reference), CLIENT_LIST_HINT)
                .into()
        })
}
