use std::path::PathBuf;

use anyhow::{Context, Result};
use ghid_core::ConfigLayout;
use ghid_resolve::{apply_override, resolve_for_directory, ResolutionSource};
use ghid_shell::{build_environment, format_switch, hook_snippet, ShellDialect};

use crate::bootstrap::CommandContext;

const HOOK_BINARY_NAME: &str = "gh-identity-hook";

pub fn switch(ctx: &CommandContext, profile_name: &str, dialect: ShellDialect) -> Result<String> {
    let profiles = ctx.sync.load_profiles()?;
    let profile = profiles.get(profile_name)?;
    let askpass = ctx.layout().askpass_path();
    let askpass = askpass.is_file().then_some(askpass.as_path());
    let env = build_environment(profile_name, profile, "", askpass);
    Ok(format_switch(dialect, &env, &profile.account))
}

pub fn status(ctx: &CommandContext) -> Result<String> {
    let profiles = ctx.sync.load_profiles()?;
    let bindings = ctx.sync.load_bindings()?;
    let cwd = ctx.cwd.display().to_string();
    let resolution = resolve_for_directory(&cwd, &bindings, profiles.default_profile())?;
    let displayed = apply_override(&resolution, ctx.active_override.as_deref());

    if displayed.profile.is_empty() {
        return Ok("No active profile.\n\
                   Run `gh-identity bind <profile>` or `gh-identity switch <profile>` to activate one.\n"
            .to_string());
    }
    let profile = profiles.get(&displayed.profile).with_context(|| {
        format!(
            "profile '{}' is active but missing from profiles.yml",
            displayed.profile
        )
    })?;

    let mut output = format!(
        "  Profile:  {}\n  Account:  {}\n  Name:     {}\n  Email:    {}\n",
        displayed.profile, profile.account, profile.display_name, profile.contact_address
    );
    if let Some(key) = profile.signing_key() {
        output.push_str(&format!("  SSH Key:  {key}\n"));
    }
    match &displayed.source {
        ResolutionSource::Binding(path) => output.push_str(&format!("  Bound by: {path}\n")),
        ResolutionSource::Default => output.push_str("  Source:   default profile\n"),
        ResolutionSource::Override => {
            output.push_str("  Source:   environment (GH_IDENTITY_PROFILE)\n");
        }
        ResolutionSource::None => {}
    }
    Ok(output)
}

pub fn resolve(ctx: &CommandContext, dir: Option<&str>, json: bool) -> Result<String> {
    let profiles = ctx.sync.load_profiles()?;
    let bindings = ctx.sync.load_bindings()?;
    let dir = ctx.target_dir(dir);
    let resolution = resolve_for_directory(&dir, &bindings, profiles.default_profile())?;
    if json {
        let rendered =
            serde_json::to_string(&resolution).context("failed to render resolution as json")?;
        return Ok(format!("{rendered}\n"));
    }
    if !resolution.is_active() {
        return Ok("none\n".to_string());
    }
    let source = match (&resolution.matched_path, resolution.used_default) {
        (Some(path), _) => format!("binding {path}"),
        (None, _) => "default".to_string(),
    };
    Ok(format!("{} ({source})\n", resolution.profile))
}

pub fn shell_init(layout: &ConfigLayout, dialect: ShellDialect, hook_binary: Option<PathBuf>) -> String {
    let binary = hook_binary.unwrap_or_else(|| default_hook_binary(layout));
    hook_snippet(dialect, &binary)
}

/// Prefers the hook installed next to the running executable, then the copy
/// under the config directory.
fn default_hook_binary(layout: &ConfigLayout) -> PathBuf {
    let sibling = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(HOOK_BINARY_NAME)))
        .filter(|path| path.is_file());
    sibling.unwrap_or_else(|| layout.hook_binary_path())
}
