//! Path normalization shared by the binding store, resolver and git config sync.
//!
//! Every path that is persisted or compared goes through [`expand_path`] so that
//! stored bindings and query directories compare byte-for-byte.

use std::path::{Component, Path, PathBuf};

use crate::error::{IdentityError, Result};

/// Expands `~`, makes the path absolute against the current directory and
/// cleans it lexically.
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let trimmed = raw.trim();
    let home = if is_tilde_path(trimmed) {
        Some(dirs::home_dir().ok_or_else(|| IdentityError::PathResolution {
            path: raw.to_string(),
            reason: "home directory is not known".to_string(),
        })?)
    } else {
        None
    };
    let needs_cwd = home.is_none() && !Path::new(trimmed).is_absolute();
    let cwd = if needs_cwd {
        std::env::current_dir().map_err(|error| IdentityError::PathResolution {
            path: raw.to_string(),
            reason: format!("current directory is not readable: {error}"),
        })?
    } else {
        PathBuf::from("/")
    };
    expand_path_with_home(trimmed, home.as_deref(), &cwd)
}

/// Pure variant of [`expand_path`] with injected home and working directories.
pub fn expand_path_with_home(raw: &str, home: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    let raw = raw.trim();
    let candidate = if is_tilde_path(raw) {
        let Some(home) = home else {
            return Err(IdentityError::PathResolution {
                path: raw.to_string(),
                reason: "home directory is not known".to_string(),
            });
        };
        let rest = raw[1..].trim_start_matches('/');
        if rest.is_empty() {
            home.to_path_buf()
        } else {
            home.join(rest)
        }
    } else if raw.is_empty() {
        cwd.to_path_buf()
    } else {
        PathBuf::from(raw)
    };

    let absolute = if candidate.is_absolute() {
        candidate
    } else if cwd.is_absolute() {
        cwd.join(candidate)
    } else {
        return Err(IdentityError::PathResolution {
            path: raw.to_string(),
            reason: format!("base directory '{}' is not absolute", cwd.display()),
        });
    };
    Ok(clean_path(&absolute))
}

/// Lexically removes `.`, resolves `..` and drops redundant separators.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    let mut normal_depth = 0usize;
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => cleaned.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if normal_depth > 0 {
                    cleaned.pop();
                    normal_depth -= 1;
                } else if !path.has_root() {
                    cleaned.push("..");
                }
            }
            Component::Normal(part) => {
                cleaned.push(part);
                normal_depth += 1;
            }
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

/// Number of named components below the root.
pub fn path_depth(path: &Path) -> usize {
    path.components()
        .filter(|component| matches!(component, Component::Normal(_)))
        .count()
}

/// True when `child` equals `parent` or sits below it, compared per component.
pub fn is_within(child: &Path, parent: &Path) -> bool {
    child.starts_with(parent)
}

/// Renders a directory with exactly one trailing `/`, as `gitdir:` expects.
pub fn with_trailing_separator(dir: &str) -> String {
    let trimmed = dir.trim_end_matches('/');
    format!("{trimmed}/")
}

fn is_tilde_path(raw: &str) -> bool {
    raw == "~" || raw.starts_with("~/")
}
