use std::path::{Path, PathBuf};

use ghid_core::{expand_path, IdentityError, Result};
use serde::{Deserialize, Serialize};

use crate::document::{load_yaml_document, save_yaml_document};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Directory subtree bound to a profile name. `path` is stored normalized.
pub struct Binding {
    pub path: String,
    pub profile: String,
}

impl Binding {
    /// Stored path normalized again, tolerating hand-edited documents.
    pub fn normalized_path(&self) -> Result<PathBuf> {
        expand_path(&self.path)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
/// Ordered binding document with at most one entry per normalized path.
pub struct BindingStore {
    #[serde(default)]
    bindings: Vec<Binding>,
}

impl BindingStore {
    pub fn load_from(path: &Path) -> Result<Self> {
        let store: Self = load_yaml_document(path)?;
        tracing::debug!(
            path = %path.display(),
            bindings = store.bindings.len(),
            "loaded binding store"
        );
        Ok(store)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        save_yaml_document(path, self)?;
        tracing::info!(path = %path.display(), bindings = self.bindings.len(), "saved binding store");
        Ok(())
    }

    /// Builds a store from raw entries without normalizing or deduplicating.
    pub fn from_entries(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    pub fn entries(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Binds `path` to `profile`, replacing an existing entry in place.
    /// The directory does not need to exist yet.
    pub fn add(&mut self, path: &str, profile: &str) -> Result<PathBuf> {
        Ok(self.upsert(path, profile)?.0)
    }

    /// Like [`BindingStore::add`], also returning the entry that was replaced
    /// as it was stored before (its raw path may differ from the normalized one).
    pub fn upsert(&mut self, path: &str, profile: &str) -> Result<(PathBuf, Option<Binding>)> {
        let normalized = expand_path(path)?;
        let replacement = Binding {
            path: normalized.to_string_lossy().into_owned(),
            profile: profile.to_string(),
        };
        let previous = match self.position_of(&normalized) {
            Some(index) => Some(std::mem::replace(&mut self.bindings[index], replacement)),
            None => {
                self.bindings.push(replacement);
                None
            }
        };
        Ok((normalized, previous))
    }

    pub fn remove(&mut self, path: &str) -> Result<Binding> {
        let normalized = expand_path(path)?;
        let index = self
            .position_of(&normalized)
            .ok_or_else(|| IdentityError::binding_not_found(normalized.display().to_string()))?;
        Ok(self.bindings.remove(index))
    }

    /// Profile bound to exactly this path; descendants do not count.
    pub fn find_exact(&self, path: &str) -> Result<Option<&str>> {
        let normalized = expand_path(path)?;
        Ok(self
            .position_of(&normalized)
            .map(|index| self.bindings[index].profile.as_str()))
    }

    pub fn referencing<'a>(&'a self, profile: &'a str) -> impl Iterator<Item = &'a Binding> + 'a {
        self.bindings
            .iter()
            .filter(move |binding| binding.profile == profile)
    }

    /// Drops every binding of `profile`, returning the removed entries in order.
    pub fn remove_profile(&mut self, profile: &str) -> Vec<Binding> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.bindings)
            .into_iter()
            .partition(|binding| binding.profile == profile);
        self.bindings = kept;
        removed
    }

    fn position_of(&self, normalized: &Path) -> Option<usize> {
        self.bindings.iter().position(|binding| {
            binding
                .normalized_path()
                .map(|existing| existing == normalized)
                .unwrap_or(false)
        })
    }
}
