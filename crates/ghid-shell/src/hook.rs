use ghid_config::{BindingStore, ProfileStore};
use ghid_core::{ConfigLayout, Result};
use ghid_resolve::resolve_for_directory;

use crate::dialect::ShellDialect;
use crate::format::{build_environment, format_exports};

/// Resolves `directory` and renders the exports for the winning profile.
///
/// Returns an empty string when no profile resolves. `token_for` is called at
/// most once, with the profile's account, and only after a profile resolved.
pub fn hook_exports<F>(
    directory: &str,
    dialect: ShellDialect,
    layout: &ConfigLayout,
    token_for: F,
) -> Result<String>
where
    F: FnOnce(&str) -> Result<String>,
{
    let bindings = BindingStore::load_from(&layout.bindings_path())?;
    let profiles = ProfileStore::load_from(&layout.profiles_path())?;
    let resolution = resolve_for_directory(directory, &bindings, profiles.default_profile())?;
    if !resolution.is_active() {
        tracing::debug!(directory, "no profile resolved");
        return Ok(String::new());
    }

    let profile = profiles.get(&resolution.profile)?;
    let token = token_for(&profile.account)?;
    let askpass = layout.askpass_path();
    let askpass = askpass.is_file().then_some(askpass.as_path());
    let env = build_environment(&resolution.profile, profile, &token, askpass);
    tracing::debug!(
        directory,
        profile = %resolution.profile,
        used_default = resolution.used_default,
        "hook resolved profile"
    );
    Ok(format_exports(dialect, &env))
}
