//! Token-signing scopes
//!
//! An [`App`] names a client of the service and carries the symmetric secret used to sign tokens
//! issued for it. Apps are read-only from the core's point of view.
use std::fmt;

pub type AppId = i32;

#[derive(Clone, PartialEq, Eq)]
pub struct App {
    pub id: AppId,
    pub name: String,
    pub secret: String,
}

impl App {
    pub fn new(id: AppId, name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let app = App::new(1, "mobile", "super-secret-signing-key");
        let debug = format!("{app:?}");

        assert!(debug.contains("mobile"));
        assert!(!debug.contains("super-secret-signing-key"));
    }
}
