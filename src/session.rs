//! Session credential storage.
//!
//! [`SessionStore`] is the seam the coordinator reads the bearer token
//! through. [`MemorySessionStore`] keeps it for the life of the process only.

/// Holds the bearer token for the current analyst session.
pub trait SessionStore {
    fn credential(&self) -> Option<String>;
    fn set_credential(&mut self, token: String);
    fn clear_credential(&mut self);

    fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    token: Option<String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn credential(&self) -> Option<String> {
        self.token.clone()
    }

    fn set_credential(&mut self, token: String) {
        // an empty token is as good as none
        self.token = (!token.is_empty()).then_some(token);
    }

    fn clear_credential(&mut self) {
        self.token = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let mut store = MemorySessionStore::new();
        assert!(!store.is_authenticated());

        store.set_credential("abc".to_string());
        assert_eq!(store.credential().as_deref(), Some("abc"));

        store.clear_credential();
        assert_eq!(store.credential(), None);
    }

    #[test]
    fn test_empty_token_is_unauthenticated() {
        let mut store = MemorySessionStore::with_token("abc");
        store.set_credential(String::new());
        assert!(!store.is_authenticated());
    }
}
