//! Access to the GitHub CLI's account store.
//!
//! Resolution and the stores never talk to `gh` directly; they receive an
//! [`AccountAuth`] so tests can substitute [`StaticAuth`].

pub mod fixed;
pub mod gh;
pub mod runner;

pub use fixed::StaticAuth;
pub use gh::{parse_active_user, parse_auth_users, repo_to_dir, AccountAuth, GhCli};
pub use runner::{CommandOutput, CommandRequest, CommandRunner, ProcessRunner};
