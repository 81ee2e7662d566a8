use std::path::Path;

use ghid_core::{read_text_if_exists, write_text_atomic, IdentityError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Loads a YAML document; a missing or blank file yields `T::default()`.
pub(crate) fn load_yaml_document<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = read_text_if_exists(path)? else {
        tracing::debug!(path = %path.display(), "document missing, using empty");
        return Ok(T::default());
    };
    if raw.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(&raw).map_err(|error| IdentityError::Format {
        path: path.to_path_buf(),
        message: error.to_string(),
    })
}

/// Serializes the whole document and replaces the file atomically.
pub(crate) fn save_yaml_document<T>(path: &Path, document: &T) -> Result<()>
where
    T: Serialize,
{
    let rendered = serde_yaml::to_string(document).map_err(|error| IdentityError::Format {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    write_text_atomic(path, &rendered)
}
