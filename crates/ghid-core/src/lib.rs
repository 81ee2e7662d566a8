//! Foundational utilities shared across gh-identity crates.
//!
//! Provides the error taxonomy, path normalization, atomic file writes and the
//! configuration directory layout used by the stores and the git config sync.

pub mod atomic_io;
pub mod error;
pub mod layout;
pub mod paths;

pub use atomic_io::{read_text_if_exists, remove_file_if_exists, write_text_atomic};
pub use error::{IdentityError, NotFoundKind, Result, ValidationIssue};
pub use layout::{
    global_gitconfig_path, global_gitconfig_path_from, ConfigLayout, ACTIVE_PROFILE_ENV,
    CONFIG_DIR_ENV, GITCONFIG_ENV,
};
pub use paths::{
    clean_path, expand_path, expand_path_with_home, is_within, path_depth,
    with_trailing_separator,
};
