use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{IdentityError, Result};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Writes text using a temp file + rename so readers never observe partial data.
///
/// A symlinked destination is written through: the rename happens next to the
/// link target, so the link survives. An existing file keeps its permissions.
pub fn write_text_atomic(path: &Path, content: &str) -> Result<()> {
    let target = resolve_write_target(path)?;
    write_resolved_atomic(&target, content)
}

fn resolve_write_target(path: &Path) -> Result<PathBuf> {
    let is_symlink = std::fs::symlink_metadata(path)
        .map(|metadata| metadata.file_type().is_symlink())
        .unwrap_or(false);
    if !is_symlink {
        return Ok(path.to_path_buf());
    }
    match std::fs::canonicalize(path) {
        Ok(target) => Ok(target),
        // Dangling link: create the file it points at.
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            let link = std::fs::read_link(path)
                .map_err(|error| IdentityError::persistence("read link", path, error))?;
            Ok(match path.parent() {
                Some(parent) if link.is_relative() => parent.join(link),
                _ => link,
            })
        }
        Err(error) => Err(IdentityError::persistence("resolve link", path, error)),
    }
}

fn write_resolved_atomic(path: &Path, content: &str) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(IdentityError::persistence(
            "write",
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "destination path cannot be empty",
            ),
        ));
    }
    if path.is_dir() {
        return Err(IdentityError::persistence(
            "write",
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "destination path is a directory",
            ),
        ));
    }

    let parent_dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent_dir)
        .map_err(|error| IdentityError::persistence("create directory", parent_dir, error))?;

    let temp_name = format!(
        ".{}.tmp-{}-{}",
        path.file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("gh-identity"),
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    );
    let temp_path = parent_dir.join(temp_name);
    if let Err(error) = std::fs::write(&temp_path, content) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(IdentityError::persistence(
            "write temporary file",
            &temp_path,
            error,
        ));
    }
    if let Ok(metadata) = std::fs::metadata(path) {
        if let Err(error) = std::fs::set_permissions(&temp_path, metadata.permissions()) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(IdentityError::persistence(
                "copy permissions",
                &temp_path,
                error,
            ));
        }
    }
    std::fs::rename(&temp_path, path).map_err(|error| {
        let _ = std::fs::remove_file(&temp_path);
        IdentityError::persistence("replace", path, error)
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}

/// Reads a text file, mapping "file absent" to `None`.
pub fn read_text_if_exists(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(IdentityError::persistence("read", path, error)),
    }
}

/// Deletes a file; an already-missing file is success.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(error) => Err(IdentityError::persistence("remove", path, error)),
    }
}

#[cfg(test)]
mod tests {
    use std::fs::read_to_string;

    use super::*;

    #[test]
    fn unit_write_text_atomic_writes_content_and_creates_parents() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let path = tempdir.path().join("nested").join("sample.txt");
        write_text_atomic(&path, "hello world").expect("write");
        assert_eq!(read_to_string(&path).expect("read"), "hello world");

        write_text_atomic(&path, "replaced").expect("overwrite");
        assert_eq!(read_to_string(&path).expect("read"), "replaced");
    }

    #[test]
    fn unit_write_text_atomic_leaves_no_temp_files() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let path = tempdir.path().join("doc.yml");
        write_text_atomic(&path, "a: 1\n").expect("write");
        let entries = std::fs::read_dir(tempdir.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect::<Vec<_>>();
        assert_eq!(entries, vec![std::ffi::OsString::from("doc.yml")]);
    }

    #[test]
    fn regression_write_text_atomic_rejects_directory_destination() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let error = write_text_atomic(tempdir.path(), "x").expect_err("directory should fail");
        assert!(matches!(error, IdentityError::Persistence { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn regression_write_text_atomic_writes_through_symlink() {
        use std::os::unix::fs::{symlink, PermissionsExt};

        let tempdir = tempfile::tempdir().expect("tempdir");
        let target = tempdir.path().join("dotfiles").join("gitconfig");
        std::fs::create_dir_all(target.parent().expect("parent")).expect("mkdir");
        std::fs::write(&target, "[user]\n").expect("seed");
        std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o640)).expect("chmod");
        let link = tempdir.path().join(".gitconfig");
        symlink(&target, &link).expect("symlink");

        write_text_atomic(&link, "[core]\n").expect("write");
        let link_metadata = std::fs::symlink_metadata(&link).expect("link metadata");
        assert!(link_metadata.file_type().is_symlink());
        assert_eq!(read_to_string(&target).expect("read target"), "[core]\n");
        let mode = std::fs::metadata(&target).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn unit_write_text_atomic_creates_target_of_dangling_relative_symlink() {
        use std::os::unix::fs::symlink;

        let tempdir = tempfile::tempdir().expect("tempdir");
        let link = tempdir.path().join(".gitconfig");
        symlink("dotfiles/gitconfig", &link).expect("symlink");

        write_text_atomic(&link, "[user]\n").expect("write");
        assert!(std::fs::symlink_metadata(&link)
            .expect("link metadata")
            .file_type()
            .is_symlink());
        assert_eq!(
            read_to_string(tempdir.path().join("dotfiles/gitconfig")).expect("read target"),
            "[user]\n"
        );
    }

    #[test]
    fn unit_read_text_if_exists_maps_missing_file_to_none() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let path = tempdir.path().join("absent.txt");
        assert!(read_text_if_exists(&path).expect("read").is_none());
        std::fs::write(&path, "present").expect("seed");
        assert_eq!(
            read_text_if_exists(&path).expect("read").as_deref(),
            Some("present")
        );
    }

    #[test]
    fn unit_remove_file_if_exists_is_idempotent() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let path = tempdir.path().join("fragment.gitconfig");
        std::fs::write(&path, "x").expect("seed");
        assert!(remove_file_if_exists(&path).expect("first remove"));
        assert!(!remove_file_if_exists(&path).expect("second remove"));
    }
}
