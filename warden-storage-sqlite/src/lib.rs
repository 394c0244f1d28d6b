//! SQLite storage backend for warden
//!
//! [`SqliteRepositoryProvider`] implements every repository trait from
//! [`warden_core::repositories`] over one connection pool. Foreign keys are enabled on every
//! connection so a verification record can only exist for a registered email.
//!
//! ```rust,ignore
//! let provider = SqliteRepositoryProvider::connect("./storage/warden.db").await?;
//! provider.migrate().await?;
//! ```
mod error;
mod migrations;
pub mod repositories;

pub use migrations::SqliteMigrationManager;
pub use repositories::{
    SqliteAppRepository, SqliteRepositoryProvider, SqliteUserRepository,
    SqliteVerificationRepository,
};
