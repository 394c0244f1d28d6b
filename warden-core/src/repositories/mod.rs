//! Repository traits for the data access layer
//!
//! These traits are the store adapter contract the services depend on.
//!
//! # Trait Hierarchy
//!
//! - Individual `*Repository` traits define the operations for each data domain
//! - Individual `*RepositoryProvider` traits provide access to each repository type
//! - [`RepositoryProvider`] combines the provider traits and adds lifecycle methods
//!
//! The `*RepositoryAdapter` types in [`adapter`] expose one repository of a shared provider as a
//! standalone value, so services can hold an `Arc` to it without borrowing the provider.

pub mod adapter;
pub mod app;
pub mod user;
pub mod verification;

pub use adapter::{AppRepositoryAdapter, UserRepositoryAdapter, VerificationRepositoryAdapter};
pub use app::AppRepository;
pub use user::UserRepository;
pub use verification::VerificationRepository;

use async_trait::async_trait;

use crate::Error;

/// Provider trait for user repository access.
pub trait UserRepositoryProvider: Send + Sync + 'static {
    type UserRepo: UserRepository;

    fn user(&self) -> &Self::UserRepo;
}

/// Provider trait for app repository access.
pub trait AppRepositoryProvider: Send + Sync + 'static {
    type AppRepo: AppRepository;

    fn app(&self) -> &Self::AppRepo;
}

/// Provider trait for verification repository access.
pub trait VerificationRepositoryProvider: Send + Sync + 'static {
    type VerificationRepo: VerificationRepository;

    fn verification(&self) -> &Self::VerificationRepo;
}

/// Provider trait that storage backends implement to provide every repository.
///
/// # Example
///
/// ```rust,ignore
/// use warden_core::repositories::*;
///
/// struct MyStorage { /* ... */ }
///
/// impl UserRepositoryProvider for MyStorage {
///     type UserRepo = MyUserRepository;
///     fn user(&self) -> &Self::UserRepo { &self.user_repo }
/// }
///
/// // ... implement the other provider traits ...
///
/// #[async_trait]
/// impl RepositoryProvider for MyStorage {
///     async fn migrate(&self) -> Result<(), Error> { /* ... */ }
///     async fn health_check(&self) -> Result<(), Error> { /* ... */ }
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider:
    UserRepositoryProvider + AppRepositoryProvider + VerificationRepositoryProvider
{
    /// Run migrations for all repositories
    async fn migrate(&self) -> Result<(), Error>;

    /// Health check for all repositories
    async fn health_check(&self) -> Result<(), Error>;
}
