//! Application context for the WealthPro CLI.
//!
//! Bundles the parsed arguments with lazily resolved settings, the open
//! drive and the bootstrapped root layout, so handlers only pay for what
//! they touch.

use once_cell::unsync::OnceCell;
use tracing::debug;

use wealthpro_core::settings::{OptionList, SettingsStore};
use wealthpro_core::{DriveClient, WorkspaceLayout};

use crate::cli::Cli;
use crate::ui::UiContext;

use super::resolver::{open_drive, resolve_settings, DriveSettings};

pub struct AppContext<'a> {
    cli: &'a Cli,
    settings: OnceCell<DriveSettings>,
    drive: OnceCell<Box<dyn DriveClient>>,
    layout: OnceCell<WorkspaceLayout>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            settings: OnceCell::new(),
            drive: OnceCell::new(),
            layout: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// UI context for a command's output flags.
    pub fn ui_context(&self, json: bool, format: Option<&str>) -> UiContext {
        UiContext::from_env(json, format, self.cli.no_color, self.cli.ascii)
    }

    pub fn settings(&self) -> anyhow::Result<&DriveSettings> {
        self.settings.get_or_try_init(|| resolve_settings(self.cli))
    }

    pub fn drive(&self) -> anyhow::Result<&dyn DriveClient> {
        let drive = self.drive.get_or_try_init(|| {
            let settings = self.settings()?;
            debug!(backend = settings.backend.as_str(), "opening drive");
            open_drive(settings)
        })?;
        Ok(drive.as_ref())
    }

    /// Root layout, created on first contact with a new root.
    pub fn layout(&self) -> anyhow::Result<&WorkspaceLayout> {
        self.layout.get_or_try_init(|| {
            let root_id = self.settings()?.root_id.clone();
            Ok(WorkspaceLayout::bootstrap(self.drive()?, &root_id)?)
        })
    }

    /// Remember a dropdown value; failures only warn.
    pub fn remember_option(&self, list: OptionList, value: &str) {
        if value.trim().is_empty() {
            return;
        }
        let result = self
            .layout()
            .and_then(|layout| {
                let store = SettingsStore::new(self.drive()?, &layout.root_id);
                Ok(store.remember(list, value)?)
            });
        if let Err(e) = result {
            tracing::warn!(list = list.as_str(), error = %e, "failed to remember option");
        }
    }
}
