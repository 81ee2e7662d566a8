use std::collections::BTreeMap;

use ghid_core::{IdentityError, Result};

use crate::gh::AccountAuth;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// In-memory [`AccountAuth`] with canned answers. The first user added is the
/// active one.
pub struct StaticAuth {
    tokens: BTreeMap<String, String>,
    users: Vec<String>,
}

impl StaticAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: impl Into<String>, token: impl Into<String>) -> Self {
        let user = user.into();
        if !self.users.contains(&user) {
            self.users.push(user.clone());
        }
        self.tokens.insert(user, token.into());
        self
    }
}

impl AccountAuth for StaticAuth {
    fn token(&self, user: &str) -> Result<String> {
        self.tokens
            .get(user)
            .cloned()
            .ok_or_else(|| IdentityError::Account {
                message: format!("no token for account '{user}'"),
            })
    }

    fn authenticated_users(&self) -> Result<Vec<String>> {
        Ok(self.users.clone())
    }

    fn active_user(&self) -> Result<String> {
        self.users.first().cloned().ok_or_else(|| IdentityError::Account {
            message: "no authenticated accounts".to_string(),
        })
    }
}
