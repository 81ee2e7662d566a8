//! Keeps the global git config in step with gh-identity bindings.
//!
//! Each profile gets a small `[user]` fragment; each binding gets one
//! marker-tagged `[includeIf "gitdir:<dir>/"]` block pointing at it, so tools
//! that never heard of gh-identity still commit with the right identity.

pub mod document;
pub mod fragment;
pub mod include_if;
pub mod sync;

pub use document::{quote_config_value, GitConfigDocument, GitConfigLine, MANAGED_MARKER};
pub use fragment::{remove_profile_fragment, render_profile_fragment, write_profile_fragment};
pub use include_if::{
    add_include_if, add_include_if_in, list_managed_include_ifs, remove_include_if,
    remove_include_if_in,
};
pub use sync::{audit_against, IdentitySync, ProfileRemoval, ReconcileReport, SyncAudit};
