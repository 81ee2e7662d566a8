//! Profile and binding documents for gh-identity.
//!
//! Both documents are small YAML files that are read whole and rewritten whole;
//! a missing file is an empty document.

mod document;

pub mod bindings;
pub mod profiles;

pub use bindings::{Binding, BindingStore};
pub use profiles::{validate_profile_name, Profile, ProfileStore};
