use std::path::PathBuf;
use std::time::Duration;

use tracing::info;
use wealthpro_core::drive::{GoogleDrive, GoogleDriveConfig, SqliteDrive, ROOT_ID};
use wealthpro_core::WorkspaceLayout;

use crate::app::{resolve_config_path, AppContext, ACCESS_TOKEN_ENV};
use crate::cli::InitArgs;
use crate::config::{
    default_local_path, write_config, Backend, WealthProConfig, DEFAULT_TIMEOUT_SECONDS,
};
use crate::errors::CliError;
use crate::ui::{blank_line, header, hint, print, receipt};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::config(
            format!("Config already exists at {}", config_path.display()),
            "Pass --force to overwrite it.",
        )
        .into());
    }

    let cli = ctx.cli();
    let backend = args.backend.or(cli.backend).unwrap_or_default();
    let timeout_seconds = args.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);

    let (config, layout) = match backend {
        Backend::Local => {
            let local_path = match args.local_path.clone().or_else(|| cli.local_path.clone()) {
                Some(path) => PathBuf::from(path),
                None => default_local_path()?,
            };
            let drive = SqliteDrive::open(&local_path)?;
            let layout = WorkspaceLayout::bootstrap(&drive, ROOT_ID)?;
            let config = WealthProConfig::new(backend, None, Some(local_path), timeout_seconds);
            (config, layout)
        }
        Backend::Google => {
            let root = args
                .root_folder_id
                .clone()
                .or_else(|| cli.root.clone())
                .filter(|id| !id.trim().is_empty())
                .ok_or_else(|| {
                    CliError::config(
                        "The google backend needs a root folder ID",
                        "Pass --root-folder-id <ID> (the folder ID from its Drive URL).",
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
            let drive = GoogleDrive::new(
                GoogleDriveConfig::new(token).with_timeout(Duration::from_secs(timeout_seconds)),
            )?;
            let layout = WorkspaceLayout::bootstrap(&drive, &root)?;
            let config = WealthProConfig::new(backend, Some(root), None, timeout_seconds);
            (config, layout)
        }
    };

    write_config(&config_path, &config)?;
    info!(path = %config_path.display(), backend = backend.as_str(), "wrote config");

    if ctx.quiet() {
        return Ok(());
    }
    let ui = ctx.ui_context(false, None);
    let config_display = config_path.display().to_string();
    let mut items = vec![
        ("Config", config_display.as_str()),
        ("Backend", backend.as_str()),
        ("Root", layout.root_id.as_str()),
        ("Active clients", layout.active_id.as_str()),
        ("Archived clients", layout.archived_id.as_str()),
        ("Tasks sheet", layout.tasks_sheet_id.as_str()),
    ];
    if let Some(path) = config.drive.local_path.as_deref() {
        items.insert(2, ("Local drive", path));
    }
    if ui.mode.is_pretty() {
        print(&ui, &header(&ui, "init", None));
        blank_line(&ui);
    }
    print(&ui, &receipt(&ui, "Workspace ready", &items));
    if ui.mode.is_pretty() {
        blank_line(&ui);
        print(&ui, &hint(&ui, "wealthpro clients add \"Surname, Firstname\""));
    }
    Ok(())
}
