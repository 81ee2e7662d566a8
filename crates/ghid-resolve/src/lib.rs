//! Directory → profile resolution.
//!
//! The deepest binding containing the query directory wins; when nothing
//! matches the configured default applies. Resolution never fails for "no
//! match", only when a path cannot be expanded.

use std::path::{Path, PathBuf};

use ghid_config::BindingStore;
use ghid_core::{expand_path, is_within, path_depth, Result};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Outcome of resolving one directory.
pub struct Resolution {
    /// Resolved profile name; empty means no identity is active.
    pub profile: String,
    /// Normalized path of the binding that matched, when one did.
    pub matched_path: Option<String>,
    /// True when no binding matched and a non-empty default was used.
    pub used_default: bool,
}

impl Resolution {
    pub fn is_active(&self) -> bool {
        !self.profile.is_empty()
    }
}

/// Resolves `directory` against `bindings`, falling back to `default_profile`.
pub fn resolve_for_directory(
    directory: &str,
    bindings: &BindingStore,
    default_profile: Option<&str>,
) -> Result<Resolution> {
    let query = expand_path(directory)?;
    let candidates = bindings
        .entries()
        .iter()
        .filter_map(|binding| {
            binding
                .normalized_path()
                .ok()
                .map(|path| (path, binding.profile.as_str()))
        })
        .collect::<Vec<_>>();
    Ok(resolve_normalized(
        &query,
        candidates.iter().map(|(path, profile)| (path.as_path(), *profile)),
        default_profile,
    ))
}

/// Pure resolution over already-normalized `(path, profile)` pairs given in
/// insertion order. Equal-depth matches keep the earliest pair.
pub fn resolve_normalized<'a, I>(
    query: &Path,
    candidates: I,
    default_profile: Option<&str>,
) -> Resolution
where
    I: IntoIterator<Item = (&'a Path, &'a str)>,
{
    let mut best: Option<(usize, &'a Path, &'a str)> = None;
    for (path, profile) in candidates {
        if profile.trim().is_empty() || !is_within(query, path) {
            continue;
        }
        let depth = path_depth(path);
        let deeper = best.map_or(true, |(best_depth, _, _)| depth > best_depth);
        if deeper {
            best = Some((depth, path, profile));
        }
    }

    if let Some((_, path, profile)) = best {
        return Resolution {
            profile: profile.to_string(),
            matched_path: Some(path.to_string_lossy().into_owned()),
            used_default: false,
        };
    }

    match default_profile.map(str::trim).filter(|name| !name.is_empty()) {
        Some(default) => Resolution {
            profile: default.to_string(),
            matched_path: None,
            used_default: true,
        },
        None => Resolution::default(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
/// Where the displayed profile came from.
pub enum ResolutionSource {
    Binding(String),
    Default,
    Override,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Resolution after applying the caller's active-profile override.
pub struct DisplayedResolution {
    pub profile: String,
    pub source: ResolutionSource,
}

/// Applies an explicit override (typically `GH_IDENTITY_PROFILE`) on top of a
/// resolution, for status and listing output.
pub fn apply_override(resolution: &Resolution, active_override: Option<&str>) -> DisplayedResolution {
    if let Some(active) = active_override
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return DisplayedResolution {
            profile: active.to_string(),
            source: ResolutionSource::Override,
        };
    }
    let source = match (&resolution.matched_path, resolution.used_default) {
        (Some(path), _) => ResolutionSource::Binding(path.clone()),
        (None, true) => ResolutionSource::Default,
        (None, false) => ResolutionSource::None,
    };
    DisplayedResolution {
        profile: resolution.profile.clone(),
        source,
    }
}

/// Convenience for callers holding plain path buffers.
pub fn resolve_path_buf(
    query: &Path,
    candidates: &[(PathBuf, String)],
    default_profile: Option<&str>,
) -> Resolution {
    resolve_normalized(
        query,
        candidates
            .iter()
            .map(|(path, profile)| (path.as_path(), profile.as_str())),
        default_profile,
    )
}
