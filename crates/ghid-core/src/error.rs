use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by every gh-identity library crate.
pub type Result<T> = std::result::Result<T, IdentityError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Kind of record a `NotFound` error refers to.
pub enum NotFoundKind {
    Profile,
    Binding,
}

impl fmt::Display for NotFoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile => f.write_str("profile"),
            Self::Binding => f.write_str("binding"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One missing or malformed field found while validating a profile.
pub struct ValidationIssue {
    pub profile: String,
    pub field: &'static str,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "profile '{}': {} is required", self.profile, self.field)
    }
}

#[derive(Debug, Error)]
/// Enumerates failures surfaced by the profile, binding and git config layers.
pub enum IdentityError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: NotFoundKind, name: String },
    #[error("{}", render_issues(.0))]
    Validation(Vec<ValidationIssue>),
    #[error("invalid profile name '{name}': {reason}")]
    InvalidProfileName { name: String, reason: &'static str },
    #[error("failed to resolve path '{path}': {reason}")]
    PathResolution { path: String, reason: String },
    #[error("failed to {operation} {}: {source}", .path.display())]
    Persistence {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {message}", .path.display())]
    Format { path: PathBuf, message: String },
    #[error("account lookup failed: {message}")]
    Account { message: String },
}

impl IdentityError {
    pub fn profile_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: NotFoundKind::Profile,
            name: name.into(),
        }
    }

    pub fn binding_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: NotFoundKind::Binding,
            name: name.into(),
        }
    }

    pub fn persistence(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Persistence {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Returns true for the recoverable "record is absent" family.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn render_issues(issues: &[ValidationIssue]) -> String {
    if issues.is_empty() {
        return "validation failed".to_string();
    }
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
