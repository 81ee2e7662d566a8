use std::collections::BTreeMap;
use std::path::Path;

use ghid_core::{IdentityError, Result, ValidationIssue};
use serde::{Deserialize, Serialize};

use crate::document::{load_yaml_document, save_yaml_document};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
/// Named identity bundle stored in `profiles.yml`.
pub struct Profile {
    #[serde(rename = "gh_user", default)]
    pub account: String,
    #[serde(rename = "git_name", default)]
    pub display_name: String,
    #[serde(rename = "git_email", default)]
    pub contact_address: String,
    #[serde(rename = "ssh_key", default, skip_serializing_if = "Option::is_none")]
    pub signing_key_path: Option<String>,
}

impl Profile {
    pub fn new(
        account: impl Into<String>,
        display_name: impl Into<String>,
        contact_address: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            display_name: display_name.into(),
            contact_address: contact_address.into(),
            signing_key_path: None,
        }
    }

    pub fn with_signing_key(mut self, path: impl Into<String>) -> Self {
        self.signing_key_path = Some(path.into());
        self
    }

    /// Configured signing key path, ignoring blank values from hand edits.
    pub fn signing_key(&self) -> Option<&str> {
        self.signing_key_path
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    fn issues(&self, name: &str) -> Vec<ValidationIssue> {
        let required = [
            ("gh_user", self.account.as_str()),
            ("git_name", self.display_name.as_str()),
            ("git_email", self.contact_address.as_str()),
        ];
        required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| ValidationIssue {
                profile: name.to_string(),
                field,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
/// Profile document: name → profile plus an optional default.
pub struct ProfileStore {
    #[serde(default)]
    profiles: BTreeMap<String, Profile>,
    #[serde(rename = "default", default, skip_serializing_if = "Option::is_none")]
    default_profile: Option<String>,
}

impl ProfileStore {
    pub fn load_from(path: &Path) -> Result<Self> {
        let store: Self = load_yaml_document(path)?;
        tracing::debug!(
            path = %path.display(),
            profiles = store.profiles.len(),
            "loaded profile store"
        );
        Ok(store)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        save_yaml_document(path, self)?;
        tracing::info!(path = %path.display(), profiles = self.profiles.len(), "saved profile store");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// Profiles in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.profiles
            .iter()
            .map(|(name, profile)| (name.as_str(), profile))
    }

    pub fn get(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .get(name)
            .ok_or_else(|| IdentityError::profile_not_found(name))
    }

    /// Adds or wholly replaces the named profile.
    pub fn insert(&mut self, name: &str, profile: Profile) -> Result<()> {
        validate_profile_name(name)?;
        self.profiles.insert(name.to_string(), profile);
        Ok(())
    }

    /// Removes a profile, clearing the default when it pointed at it.
    pub fn remove(&mut self, name: &str) -> Result<Profile> {
        let removed = self
            .profiles
            .remove(name)
            .ok_or_else(|| IdentityError::profile_not_found(name))?;
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        Ok(removed)
    }

    /// Configured default name. May reference a profile that no longer exists.
    pub fn default_profile(&self) -> Option<&str> {
        self.default_profile
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    pub fn set_default(&mut self, name: &str) -> Result<()> {
        if !self.profiles.contains_key(name) {
            return Err(IdentityError::profile_not_found(name));
        }
        self.default_profile = Some(name.to_string());
        Ok(())
    }

    pub fn clear_default(&mut self) {
        self.default_profile = None;
    }

    /// Collects every missing required field across all profiles.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        self.profiles
            .iter()
            .flat_map(|(name, profile)| profile.issues(name))
            .collect()
    }
}

/// Profile names become fragment file names, so only path-safe names pass.
pub fn validate_profile_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("name cannot be empty")
    } else if name.starts_with('.') {
        Some("name cannot start with '.'")
    } else if !name
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
    {
        Some("only ASCII letters, digits, '-', '_' and '.' are allowed")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(IdentityError::InvalidProfileName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
