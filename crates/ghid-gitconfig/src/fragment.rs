use std::path::Path;

use ghid_config::Profile;
use ghid_core::{remove_file_if_exists, write_text_atomic, Result};

use crate::document::quote_config_value;

/// Renders the `[user]` block included for a bound directory.
pub fn render_profile_fragment(profile: &Profile) -> String {
    format!(
        "[user]\n    name = {}\n    email = {}\n",
        quote_config_value(&profile.display_name),
        quote_config_value(&profile.contact_address)
    )
}

/// Writes (or overwrites) a profile fragment, creating parent directories.
pub fn write_profile_fragment(fragment_path: &Path, profile: &Profile) -> Result<()> {
    write_text_atomic(fragment_path, &render_profile_fragment(profile))?;
    tracing::debug!(fragment = %fragment_path.display(), "wrote profile fragment");
    Ok(())
}

/// Deletes a profile fragment; a missing file is not an error.
pub fn remove_profile_fragment(fragment_path: &Path) -> Result<bool> {
    let removed = remove_file_if_exists(fragment_path)?;
    if removed {
        tracing::debug!(fragment = %fragment_path.display(), "removed profile fragment");
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_fragment_contains_only_name_and_email() {
        let profile = Profile::new("octo", "Test User", "test@example.com").with_signing_key("~/.ssh/k");
        assert_eq!(
            render_profile_fragment(&profile),
            "[user]\n    name = Test User\n    email = test@example.com\n"
        );
    }

    #[test]
    fn regression_fragment_quotes_values_that_would_inject_config() {
        let profile = Profile::new("octo", "Evil\n[core]\n    sshCommand = x", "a#b@example.com");
        let rendered = render_profile_fragment(&profile);
        assert_eq!(rendered.lines().count(), 3);
        assert!(rendered.contains("name = \"Evil\\n[core]\\n    sshCommand = x\""));
        assert!(rendered.contains("email = \"a#b@example.com\""));
    }

    #[test]
    fn functional_write_and_remove_fragment_are_idempotent() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("git").join("work.gitconfig");
        let profile = Profile::new("octo", "Octo", "octo@example.com");

        write_profile_fragment(&path, &profile).expect("write");
        write_profile_fragment(&path, &profile).expect("overwrite");
        assert_eq!(
            std::fs::read_to_string(&path).expect("read"),
            "[user]\n    name = Octo\n    email = octo@example.com\n"
        );

        assert!(remove_profile_fragment(&path).expect("remove"));
        assert!(!remove_profile_fragment(&path).expect("remove again"));
        assert!(!path.exists());
    }
}
