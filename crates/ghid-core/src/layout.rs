use std::path::{Path, PathBuf};

use crate::error::{IdentityError, Result};

pub const CONFIG_DIR_ENV: &str = "GH_IDENTITY_CONFIG_DIR";
pub const GITCONFIG_ENV: &str = "GH_IDENTITY_GITCONFIG";
pub const ACTIVE_PROFILE_ENV: &str = "GH_IDENTITY_PROFILE";
pub const DEFAULT_CONFIG_DIR_NAME: &str = "gh-identity";

const PROFILES_FILE: &str = "profiles.yml";
const BINDINGS_FILE: &str = "bindings.yml";
const FRAGMENT_DIR: &str = "git";
const FRAGMENT_EXTENSION: &str = "gitconfig";
const BIN_DIR: &str = "bin";
const ASKPASS_BINARY: &str = "gh-identity-askpass";
const HOOK_BINARY: &str = "gh-identity-hook";

#[derive(Debug, Clone, PartialEq, Eq)]
/// On-disk locations of every document gh-identity reads or writes.
pub struct ConfigLayout {
    config_dir: PathBuf,
}

impl ConfigLayout {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Resolves the layout from `GH_IDENTITY_CONFIG_DIR`, `XDG_CONFIG_HOME`
    /// or `~/.config`, in that order.
    pub fn from_env() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from);
        let xdg = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
        Self::from_env_values(explicit.as_deref(), xdg.as_deref(), dirs::home_dir().as_deref())
    }

    pub fn from_env_values(
        explicit_dir: Option<&Path>,
        xdg_config_home: Option<&Path>,
        home: Option<&Path>,
    ) -> Result<Self> {
        if let Some(dir) = explicit_dir.filter(|dir| !dir.as_os_str().is_empty()) {
            return Ok(Self::new(dir));
        }
        if let Some(base) = xdg_config_home.filter(|dir| !dir.as_os_str().is_empty()) {
            return Ok(Self::new(base.join(DEFAULT_CONFIG_DIR_NAME)));
        }
        let home = home.ok_or_else(|| IdentityError::PathResolution {
            path: "~/.config".to_string(),
            reason: "home directory is not known".to_string(),
        })?;
        Ok(Self::new(home.join(".config").join(DEFAULT_CONFIG_DIR_NAME)))
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn profiles_path(&self) -> PathBuf {
        self.config_dir.join(PROFILES_FILE)
    }

    pub fn bindings_path(&self) -> PathBuf {
        self.config_dir.join(BINDINGS_FILE)
    }

    pub fn fragment_dir(&self) -> PathBuf {
        self.config_dir.join(FRAGMENT_DIR)
    }

    /// Fragment file for a profile, e.g. `git/work.gitconfig`.
    pub fn fragment_path(&self, profile_name: &str) -> PathBuf {
        self.fragment_dir()
            .join(format!("{profile_name}.{FRAGMENT_EXTENSION}"))
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.config_dir.join(BIN_DIR)
    }

    pub fn askpass_path(&self) -> PathBuf {
        self.bin_dir().join(ASKPASS_BINARY)
    }

    pub fn hook_binary_path(&self) -> PathBuf {
        self.bin_dir().join(HOOK_BINARY)
    }
}

/// Global git config location, honoring `GH_IDENTITY_GITCONFIG`.
pub fn global_gitconfig_path() -> Result<PathBuf> {
    let explicit = std::env::var_os(GITCONFIG_ENV).map(PathBuf::from);
    global_gitconfig_path_from(explicit.as_deref(), dirs::home_dir().as_deref())
}

pub fn global_gitconfig_path_from(explicit: Option<&Path>, home: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(path.to_path_buf());
    }
    let home = home.ok_or_else(|| IdentityError::PathResolution {
        path: "~/.gitconfig".to_string(),
        reason: "home directory is not known".to_string(),
    })?;
    Ok(home.join(".gitconfig"))
}
