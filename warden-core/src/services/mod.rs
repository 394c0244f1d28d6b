//! Service layer for business logic
//!
//! Services hold `Arc`s to the repositories they need and a [`Clock`](crate::Clock); they carry
//! no other state between calls.

pub mod auth;
pub mod verification;

pub use auth::AuthService;
pub use verification::VerificationService;

#[cfg(test)]
pub(crate) mod mock;
