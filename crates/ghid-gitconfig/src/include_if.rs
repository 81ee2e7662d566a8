use std::path::Path;

use ghid_core::{with_trailing_separator, Result};

use crate::document::{GitConfigDocument, GitConfigLine};

/// Inserts or updates the managed `includeIf` block for `dir_path`.
///
/// Returns `true` when the document changed. Calling this repeatedly with the
/// same arguments leaves exactly one block.
pub fn add_include_if_in(document: &mut GitConfigDocument, dir_path: &str, fragment_path: &str) -> bool {
    let dir = with_trailing_separator(dir_path);
    let desired_path = GitConfigLine::path_ref(fragment_path);
    let lines = document.lines_mut();

    let existing = lines.iter().position(
        |line| matches!(line, GitConfigLine::IncludeIfHeader { dir: existing, .. } if *existing == dir),
    );
    let Some(header_index) = existing else {
        if lines.last().is_some_and(|line| !line.is_blank()) {
            lines.push(GitConfigLine::Plain(String::new()));
        }
        lines.push(GitConfigLine::managed_header(&dir));
        lines.push(desired_path);
        return true;
    };

    let mut changed = false;
    if matches!(lines[header_index], GitConfigLine::IncludeIfHeader { managed: false, .. }) {
        lines[header_index] = GitConfigLine::managed_header(&dir);
        changed = true;
    }
    let current_path = match lines.get(header_index + 1) {
        Some(GitConfigLine::PathRef { value, .. }) => Some(value == fragment_path),
        _ => None,
    };
    match current_path {
        Some(true) => {}
        Some(false) => {
            lines[header_index + 1] = desired_path;
            changed = true;
        }
        None => {
            lines.insert(header_index + 1, desired_path);
            changed = true;
        }
    }
    changed
}

/// Removes every `includeIf` block for `dir_path` together with its path line
/// and the blank separator in front of it (or after it, for a block at the top
/// of the file). Returns `true` when anything was removed.
pub fn remove_include_if_in(document: &mut GitConfigDocument, dir_path: &str) -> bool {
    let dir = with_trailing_separator(dir_path);
    let lines = std::mem::take(document.lines_mut());
    let mut kept: Vec<GitConfigLine> = Vec::with_capacity(lines.len());
    let mut removed = false;
    let mut skip_path_line = false;
    let mut skip_leading_blank = false;

    for line in lines {
        if skip_path_line {
            skip_path_line = false;
            if matches!(line, GitConfigLine::PathRef { .. }) {
                continue;
            }
        }
        if skip_leading_blank {
            skip_leading_blank = false;
            if line.is_blank() {
                continue;
            }
        }
        if matches!(&line, GitConfigLine::IncludeIfHeader { dir: existing, .. } if *existing == dir) {
            if kept.last().is_some_and(GitConfigLine::is_blank) {
                kept.pop();
            }
            // Nothing precedes the block, so the separator after it would lead the file.
            skip_leading_blank = kept.is_empty();
            removed = true;
            skip_path_line = true;
            continue;
        }
        kept.push(line);
    }

    *document.lines_mut() = kept;
    if removed {
        document.trim_trailing_blank_lines();
    }
    removed
}

/// File-level [`add_include_if_in`]; creates the file when missing and skips
/// the write when nothing changed.
pub fn add_include_if(global_config: &Path, dir_path: &str, fragment_path: &Path) -> Result<bool> {
    let mut document = GitConfigDocument::load(global_config)?;
    let fragment = fragment_path.to_string_lossy();
    let changed = add_include_if_in(&mut document, dir_path, &fragment);
    if changed {
        document.save(global_config)?;
        tracing::info!(
            gitconfig = %global_config.display(),
            dir = dir_path,
            fragment = %fragment,
            "updated includeIf directive"
        );
    }
    Ok(changed)
}

/// File-level [`remove_include_if_in`]; a missing file is a no-op.
pub fn remove_include_if(global_config: &Path, dir_path: &str) -> Result<bool> {
    let mut document = GitConfigDocument::load(global_config)?;
    let removed = remove_include_if_in(&mut document, dir_path);
    if removed {
        document.save(global_config)?;
        tracing::info!(
            gitconfig = %global_config.display(),
            dir = dir_path,
            "removed includeIf directive"
        );
    }
    Ok(removed)
}

/// Directories (with trailing `/`) of marker-tagged directives, in file order.
pub fn list_managed_include_ifs(global_config: &Path) -> Result<Vec<String>> {
    Ok(GitConfigDocument::load(global_config)?.managed_dirs())
}
