use anyhow::{anyhow, Context, Result};
use ghid_auth::repo_to_dir;

use crate::bootstrap::CommandContext;

pub fn bind(ctx: &CommandContext, path: Option<&str>, profile: &str) -> Result<String> {
    let dir = ctx.target_dir(path);
    let bound = ctx
        .sync
        .bind(&dir, profile)
        .with_context(|| format!("failed to bind {dir}"))?;
    Ok(format!("Bound {} → {profile}\n", bound.display()))
}

pub fn unbind(ctx: &CommandContext, path: Option<&str>) -> Result<String> {
    let dir = ctx.target_dir(path);
    let removed = ctx.sync.unbind(&dir)?;
    Ok(format!("Unbound {} (was {})\n", removed.path, removed.profile))
}

/// Clones with `gh repo clone` into the current directory then binds the
/// checkout. A checkout that cannot be found afterwards is reported, not fatal.
pub fn clone(ctx: &CommandContext, repo: &str, profile: Option<&str>) -> Result<String> {
    let profile = profile
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .or(ctx.active_override.as_deref())
        .ok_or_else(|| {
            anyhow!("no profile given and no active profile; pass --profile or switch to one first")
        })?;
    ctx.sync.load_profiles()?.get(profile)?;

    ctx.gh
        .clone_repo(repo, &ctx.cwd)
        .with_context(|| format!("failed to clone {repo}"))?;
    let checkout = ctx.cwd.join(repo_to_dir(repo));
    let mut output = format!("Cloned {repo}.\n");
    if !checkout.is_dir() {
        tracing::warn!(checkout = %checkout.display(), "clone finished but checkout is missing");
        output.push_str(&format!(
            "Checkout {} not found; bind it manually with `gh-identity bind`.\n",
            checkout.display()
        ));
        return Ok(output);
    }
    output.push_str(&bind(ctx, Some(&checkout.display().to_string()), profile)?);
    Ok(output)
}
