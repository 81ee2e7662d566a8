use anyhow::{bail, Context, Result};
use ghid_config::{Profile, ProfileStore};
use ghid_core::IdentityError;

use crate::bootstrap::CommandContext;
use crate::cli_args::ProfileAddArgs;

pub fn add_profile(ctx: &CommandContext, args: &ProfileAddArgs) -> Result<String> {
    let profiles = ctx.sync.load_profiles()?;
    if profiles.contains(&args.name) && !args.force {
        bail!(
            "profile '{}' already exists (use --force to replace it)",
            args.name
        );
    }

    let mut profile = Profile::new(
        args.account.trim(),
        args.display_name.trim(),
        args.contact_address.trim(),
    );
    if let Some(key) = args.ssh_key.as_deref().filter(|key| !key.trim().is_empty()) {
        profile = profile.with_signing_key(key.trim());
    }

    let mut probe = ProfileStore::default();
    probe.insert(&args.name, profile.clone())?;
    let issues = probe.validate();
    if !issues.is_empty() {
        return Err(IdentityError::Validation(issues).into());
    }

    ctx.sync
        .save_profile(&args.name, profile, args.make_default)
        .with_context(|| format!("failed to save profile '{}'", args.name))?;
    let mut output = format!("Profile '{}' saved.\n", args.name);
    if args.make_default {
        output.push_str(&format!("Profile '{}' is now the default.\n", args.name));
    }
    Ok(output)
}

pub fn list_profiles(ctx: &CommandContext, json: bool) -> Result<String> {
    let profiles = ctx.sync.load_profiles()?;
    let active = ctx.active_override.as_deref();
    let default = profiles.default_profile();

    if json {
        let entries = profiles
            .iter()
            .map(|(name, profile)| {
                serde_json::json!({
                    "name": name,
                    "gh_user": profile.account,
                    "git_name": profile.display_name,
                    "git_email": profile.contact_address,
                    "ssh_key": profile.signing_key(),
                    "default": default == Some(name),
                    "active": active == Some(name),
                })
            })
            .collect::<Vec<_>>();
        return Ok(format!("{}\n", serde_json::Value::Array(entries)));
    }

    if profiles.is_empty() {
        return Ok("No profiles configured.\n".to_string());
    }
    let mut output = String::new();
    for (name, profile) in profiles.iter() {
        let active_mark = if active == Some(name) { '*' } else { ' ' };
        let default_mark = if default == Some(name) { '→' } else { ' ' };
        output.push_str(&format!(
            "{active_mark}{default_mark} {name}  {}  {} <{}>\n",
            profile.account, profile.display_name, profile.contact_address
        ));
    }
    Ok(output)
}

pub fn remove_profile(ctx: &CommandContext, name: &str) -> Result<String> {
    let removal = ctx
        .sync
        .remove_profile(name)
        .with_context(|| format!("failed to remove profile '{name}'"))?;
    let mut output = format!("Profile '{name}' removed.\n");
    if !removal.removed_bindings.is_empty() {
        output.push_str(&format!(
            "Also removed {} binding(s).\n",
            removal.removed_bindings.len()
        ));
    }
    Ok(output)
}

pub fn set_default_profile(ctx: &CommandContext, name: &str) -> Result<String> {
    ctx.sync.set_default(name)?;
    Ok(format!("Profile '{name}' is now the default.\n"))
}
