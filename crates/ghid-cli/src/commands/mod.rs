pub mod binding;
pub mod doctor;
pub mod profile;
pub mod session;

use anyhow::Result;

use crate::bootstrap::CommandContext;

pub fn sync(ctx: &CommandContext) -> Result<String> {
    let report = ctx.sync.reconcile()?;
    let mut output = format!(
        "sync: updated={} removed={} skipped={}\n",
        report.updated.len(),
        report.removed.len(),
        report.skipped.len()
    );
    for dir in &report.updated {
        output.push_str(&format!("  updated {dir}\n"));
    }
    for dir in &report.removed {
        output.push_str(&format!("  removed {dir}\n"));
    }
    for binding in &report.skipped {
        output.push_str(&format!(
            "  skipped {} (profile '{}' not found)\n",
            binding.path, binding.profile
        ));
    }
    Ok(output)
}
