use std::path::Path;

use ghid_config::Profile;
use ghid_core::expand_path;

use crate::dialect::ShellDialect;
use crate::quote::{fish_quote, posix_quote};

pub const GH_TOKEN_KEY: &str = "GH_TOKEN";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Values projected into the shell for one resolved profile. Empty strings and
/// `None` are left out of the output.
pub struct ResolvedEnvironment {
    pub token: String,
    pub author_name: String,
    pub author_email: String,
    pub committer_name: String,
    pub committer_email: String,
    pub profile_name: String,
    pub ssh_command: Option<String>,
    pub askpass: Option<String>,
}

impl ResolvedEnvironment {
    /// `(key, value)` pairs in output order.
    pub fn entries(&self) -> [(&'static str, &str); 8] {
        [
            (GH_TOKEN_KEY, self.token.as_str()),
            ("GIT_AUTHOR_NAME", self.author_name.as_str()),
            ("GIT_AUTHOR_EMAIL", self.author_email.as_str()),
            ("GIT_COMMITTER_NAME", self.committer_name.as_str()),
            ("GIT_COMMITTER_EMAIL", self.committer_email.as_str()),
            (ghid_core::ACTIVE_PROFILE_ENV, self.profile_name.as_str()),
            ("GIT_SSH_COMMAND", self.ssh_command.as_deref().unwrap_or_default()),
            ("GIT_ASKPASS", self.askpass.as_deref().unwrap_or_default()),
        ]
    }
}

/// Renders one assignment statement per non-empty value.
pub fn format_exports(dialect: ShellDialect, env: &ResolvedEnvironment) -> String {
    render_entries(dialect, env.entries().into_iter())
}

fn render_entries<'a>(
    dialect: ShellDialect,
    entries: impl Iterator<Item = (&'static str, &'a str)>,
) -> String {
    let mut rendered = String::new();
    for (key, value) in entries.filter(|(_, value)| !value.is_empty()) {
        rendered.push_str(&format_assignment(dialect, key, value));
        rendered.push('\n');
    }
    rendered
}

fn format_assignment(dialect: ShellDialect, key: &str, value: &str) -> String {
    match dialect {
        ShellDialect::Fish => format!("set -gx {key} {}", fish_quote(value)),
        ShellDialect::Bash | ShellDialect::Zsh => format!("export {key}={}", posix_quote(value)),
    }
}

/// Assembles the environment for `profile_name`. Author and committer share the
/// profile's display name and contact address.
pub fn build_environment(
    profile_name: &str,
    profile: &Profile,
    token: &str,
    askpass: Option<&Path>,
) -> ResolvedEnvironment {
    ResolvedEnvironment {
        token: token.trim().to_string(),
        author_name: profile.display_name.clone(),
        author_email: profile.contact_address.clone(),
        committer_name: profile.display_name.clone(),
        committer_email: profile.contact_address.clone(),
        profile_name: profile_name.to_string(),
        ssh_command: profile.signing_key().and_then(ssh_command_for_key),
        askpass: askpass.map(|path| path.display().to_string()),
    }
}

/// `GIT_SSH_COMMAND` is run by git through `sh`, so the key path is always
/// POSIX-quoted regardless of the user's shell.
fn ssh_command_for_key(raw_key: &str) -> Option<String> {
    match expand_path(raw_key) {
        Ok(key_path) => {
            let key = key_path.display().to_string();
            Some(format!(
                "ssh -i {} -o IdentitiesOnly=yes",
                shell_words::quote(&key)
            ))
        }
        Err(error) => {
            tracing::warn!(key = raw_key, %error, "skipping ssh key that cannot be expanded");
            None
        }
    }
}

/// Statements for `switch`: drop any exported token so `gh` falls back to its
/// own active account, switch that account, then export the identity.
pub fn format_switch(dialect: ShellDialect, env: &ResolvedEnvironment, account: &str) -> String {
    let mut rendered = String::new();
    match dialect {
        ShellDialect::Fish => rendered.push_str(&format!("set -e {GH_TOKEN_KEY}\n")),
        ShellDialect::Bash | ShellDialect::Zsh => {
            rendered.push_str(&format!("unset {GH_TOKEN_KEY} 2>/dev/null\n"));
        }
    }
    if !account.trim().is_empty() {
        let quoted = match dialect {
            ShellDialect::Fish => fish_quote(account.trim()),
            ShellDialect::Bash | ShellDialect::Zsh => posix_quote(account.trim()),
        };
        rendered.push_str(&format!("gh auth switch --user {quoted} 2>/dev/null\n"));
    }
    rendered.push_str(&render_entries(
        dialect,
        env.entries()
            .into_iter()
            .filter(|(key, _)| *key != GH_TOKEN_KEY),
    ));
    rendered
}
