use std::path::PathBuf;

use anyhow::{Context, Result};
use ghid_auth::{GhCli, ProcessRunner};
use ghid_core::{global_gitconfig_path, ConfigLayout, ACTIVE_PROFILE_ENV};
use ghid_gitconfig::IdentitySync;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli_args::GlobalArgs;

/// Logs go to stderr so `eval`-consumed stdout stays clean.
pub fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Everything a command needs from the environment, resolved once.
pub struct CommandContext {
    pub sync: IdentitySync,
    pub gh: GhCli<ProcessRunner>,
    pub cwd: PathBuf,
    pub active_override: Option<String>,
}

impl CommandContext {
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let layout = config_layout(args)?;
        let global_config = match &args.gitconfig {
            Some(path) => path.clone(),
            None => global_gitconfig_path().context("failed to locate the global git config")?,
        };
        let cwd = std::env::current_dir().context("failed to read the current directory")?;
        tracing::debug!(
            config_dir = %layout.config_dir().display(),
            gitconfig = %global_config.display(),
            "resolved configuration"
        );
        Ok(Self {
            sync: IdentitySync::new(layout, global_config),
            gh: GhCli::with_runner(args.gh.as_str(), ProcessRunner),
            cwd,
            active_override: active_override_from_env(),
        })
    }

    pub fn layout(&self) -> &ConfigLayout {
        self.sync.layout()
    }

    /// Explicit path argument, or the current directory.
    pub fn target_dir(&self, path: Option<&str>) -> String {
        match path {
            Some(path) if !path.trim().is_empty() => path.to_string(),
            _ => self.cwd.display().to_string(),
        }
    }
}

pub fn config_layout(args: &GlobalArgs) -> Result<ConfigLayout> {
    match &args.config_dir {
        Some(dir) => Ok(ConfigLayout::new(dir)),
        None => ConfigLayout::from_env().context("failed to locate the gh-identity config directory"),
    }
}

pub fn active_override_from_env() -> Option<String> {
    std::env::var(ACTIVE_PROFILE_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
