//! Store-and-gitconfig operations that must never drift apart.
//!
//! The profile and binding documents are the source of truth and are saved
//! first; fragments and `includeIf` blocks are derived afterwards. Every
//! derived step is idempotent, so re-running an interrupted operation or
//! calling [`IdentitySync::reconcile`] converges on the same state.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ghid_config::{Binding, BindingStore, Profile, ProfileStore};
use ghid_core::{with_trailing_separator, ConfigLayout, Result};

use crate::fragment::{remove_profile_fragment, write_profile_fragment};
use crate::include_if::{add_include_if, list_managed_include_ifs, remove_include_if};

#[derive(Debug, Clone, PartialEq, Eq)]
/// What a profile removal cascaded to.
pub struct ProfileRemoval {
    pub profile: Profile,
    pub removed_bindings: Vec<Binding>,
    pub fragment_removed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Differences between the binding store and managed `includeIf` blocks.
pub struct SyncAudit {
    /// Bound directories without a managed directive.
    pub missing: Vec<String>,
    /// Managed directives whose directory is no longer bound.
    pub orphaned: Vec<String>,
}

impl SyncAudit {
    pub fn is_consistent(&self) -> bool {
        self.missing.is_empty() && self.orphaned.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub updated: Vec<String>,
    pub removed: Vec<String>,
    /// Bindings skipped because their profile does not exist.
    pub skipped: Vec<Binding>,
}

#[derive(Debug, Clone)]
pub struct IdentitySync {
    layout: ConfigLayout,
    global_config: PathBuf,
}

impl IdentitySync {
    pub fn new(layout: ConfigLayout, global_config: impl Into<PathBuf>) -> Self {
        Self {
            layout,
            global_config: global_config.into(),
        }
    }

    pub fn layout(&self) -> &ConfigLayout {
        &self.layout
    }

    pub fn global_config(&self) -> &Path {
        &self.global_config
    }

    pub fn load_profiles(&self) -> Result<ProfileStore> {
        ProfileStore::load_from(&self.layout.profiles_path())
    }

    pub fn load_bindings(&self) -> Result<BindingStore> {
        BindingStore::load_from(&self.layout.bindings_path())
    }

    /// Adds or replaces a profile and refreshes its fragment.
    pub fn save_profile(&self, name: &str, profile: Profile, make_default: bool) -> Result<()> {
        let mut profiles = self.load_profiles()?;
        profiles.insert(name, profile.clone())?;
        if make_default {
            profiles.set_default(name)?;
        }
        profiles.save_to(&self.layout.profiles_path())?;
        write_profile_fragment(&self.layout.fragment_path(name), &profile)
    }

    pub fn set_default(&self, name: &str) -> Result<()> {
        let mut profiles = self.load_profiles()?;
        profiles.set_default(name)?;
        profiles.save_to(&self.layout.profiles_path())
    }

    /// Binds `dir` to an existing profile and mirrors it into the global config.
    pub fn bind(&self, dir: &str, profile_name: &str) -> Result<PathBuf> {
        let profiles = self.load_profiles()?;
        let profile = profiles.get(profile_name)?;

        let mut bindings = self.load_bindings()?;
        let (normalized, previous) = bindings.upsert(dir, profile_name)?;
        bindings.save_to(&self.layout.bindings_path())?;

        let fragment = self.layout.fragment_path(profile_name);
        write_profile_fragment(&fragment, profile)?;
        let normalized_dir = normalized.to_string_lossy();
        add_include_if(&self.global_config, &normalized_dir, &fragment)?;
        // A hand-edited entry may have been mirrored under its raw spelling.
        if let Some(previous) = previous {
            if with_trailing_separator(&previous.path) != with_trailing_separator(&normalized_dir) {
                remove_include_if(&self.global_config, &previous.path)?;
            }
        }
        tracing::info!(dir = %normalized.display(), profile = profile_name, "bound directory");
        Ok(normalized)
    }

    /// Removes the binding for `dir`; `NotFound` when it is not bound.
    pub fn unbind(&self, dir: &str) -> Result<Binding> {
        let mut bindings = self.load_bindings()?;
        let removed = bindings.remove(dir)?;
        bindings.save_to(&self.layout.bindings_path())?;
        remove_include_if(&self.global_config, &removed.path)?;
        tracing::info!(dir = %removed.path, profile = %removed.profile, "unbound directory");
        Ok(removed)
    }

    /// Removes a profile with its bindings, fragment and directives.
    pub fn remove_profile(&self, name: &str) -> Result<ProfileRemoval> {
        let mut profiles = self.load_profiles()?;
        let profile = profiles.remove(name)?;
        profiles.save_to(&self.layout.profiles_path())?;

        let mut bindings = self.load_bindings()?;
        let removed_bindings = bindings.remove_profile(name);
        if !removed_bindings.is_empty() {
            bindings.save_to(&self.layout.bindings_path())?;
        }

        let fragment_removed = remove_profile_fragment(&self.layout.fragment_path(name))?;
        for binding in &removed_bindings {
            remove_include_if(&self.global_config, &binding.path)?;
        }
        tracing::info!(
            profile = name,
            bindings = removed_bindings.len(),
            "removed profile"
        );
        Ok(ProfileRemoval {
            profile,
            removed_bindings,
            fragment_removed,
        })
    }

    /// Compares managed directives in the global config with the binding store.
    pub fn audit(&self) -> Result<SyncAudit> {
        let bindings = self.load_bindings()?;
        let managed = list_managed_include_ifs(&self.global_config)?;
        Ok(audit_against(&bindings, &managed))
    }

    /// Rewrites fragments and directives for every binding and drops managed
    /// directives that no binding backs.
    pub fn reconcile(&self) -> Result<ReconcileReport> {
        let profiles = self.load_profiles()?;
        let bindings = self.load_bindings()?;
        let mut report = ReconcileReport::default();

        for binding in bindings.entries() {
            let Ok(profile) = profiles.get(&binding.profile) else {
                report.skipped.push(binding.clone());
                continue;
            };
            let fragment = self.layout.fragment_path(&binding.profile);
            write_profile_fragment(&fragment, profile)?;
            if add_include_if(&self.global_config, &binding.path, &fragment)? {
                report.updated.push(with_trailing_separator(&binding.path));
            }
        }

        let audit = self.audit()?;
        for dir in audit.orphaned {
            if remove_include_if(&self.global_config, &dir)? {
                report.removed.push(dir);
            }
        }
        Ok(report)
    }
}

/// Pure comparison used by [`IdentitySync::audit`].
pub fn audit_against(bindings: &BindingStore, managed: &[String]) -> SyncAudit {
    let bound = bindings
        .entries()
        .iter()
        .map(|binding| with_trailing_separator(&binding.path))
        .collect::<Vec<_>>();
    let bound_set = bound.iter().map(String::as_str).collect::<BTreeSet<_>>();
    let managed_set = managed.iter().map(String::as_str).collect::<BTreeSet<_>>();

    SyncAudit {
        missing: bound
            .iter()
            .filter(|dir| !managed_set.contains(dir.as_str()))
            .cloned()
            .collect(),
        orphaned: managed
            .iter()
            .filter(|dir| !bound_set.contains(dir.as_str()))
            .cloned()
            .collect(),
    }
}
