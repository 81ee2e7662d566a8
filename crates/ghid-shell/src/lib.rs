//! Renders resolved identities as shell statements for `eval`.
//!
//! Output is one statement per line with no surrounding text. Values are
//! quoted per dialect so nothing in a profile can run as shell code.

pub mod dialect;
pub mod format;
pub mod hook;
pub mod quote;
pub mod snippet;

pub use dialect::ShellDialect;
pub use format::{build_environment, format_exports, format_switch, ResolvedEnvironment};
pub use hook::hook_exports;
pub use quote::{fish_quote, posix_quote};
pub use snippet::hook_snippet;
