//! User identity records
//!
//! | Field           | Type     | Description                                        |
//! | --------------- | -------- | -------------------------------------------------- |
//! | `id`            | `i64`    | Stable identifier assigned by the store.           |
//! | `email`         | `String` | Unique, case-sensitive login key.                  |
//! | `password_hash` | `String` | Salted one-way hash in PHC string format.          |
//! | `is_admin`      | `bool`   | Grants admin privileges.                           |
//! | `is_verified`   | `bool`   | Set once ownership of the email has been proven.   |
//!
//! Users are created on registration and mutated on password update and on verification
//! success. The core never deletes them.
use serde::Serialize;

pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub is_verified: bool,
}

impl User {
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct UserBuilder {
    id: UserId,
    email: String,
    password_hash: String,
    is_admin: bool,
    is_verified: bool,
}

impl UserBuilder {
    pub fn id(mut self, id: UserId) -> Self {
        self.id = id;
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.password_hash = password_hash.into();
        self
    }

    pub fn is_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    pub fn is_verified(mut self, is_verified: bool) -> Self {
        self.is_verified = is_verified;
        self
    }

    pub fn build(self) -> User {
        User {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
            is_admin: self.is_admin,
            is_verified: self.is_verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_builder_defaults() {
        let user = User::builder().id(1).email("a@x.com").build();

        assert_eq!(user.id, 1);
        assert_eq!(user.email, "a@x.com");
        assert!(!user.is_admin);
        assert!(!user.is_verified);
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User::builder()
            .id(1)
            .email("a@x.com")
            .password_hash("$argon2id$v=19$m=19456,t=2,p=1$salt$hash")
            .build();

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["email"], "a@x.com");
        assert!(json.get("password_hash").is_none());
    }
}
