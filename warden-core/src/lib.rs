//! Core functionality for the warden credential service
//!
//! This crate contains the credential and verification-code logic: password validation, token
//! issuance, admin lookup, and the lifecycle of one-time verification codes (creation, matching,
//! expiry, consumption).
//!
//! Storage is abstracted behind the traits in [`repositories`]; a backend implements them and
//! the services in [`services`] drive the state transitions. Time comes from an injected
//! [`Clock`] so expiry is deterministic under test.
//!
//! See [`AuthService`] for credential operations and [`VerificationService`] for the
//! verification-code state machine.
pub mod app;
pub mod clock;
pub mod crypto;
pub mod error;
pub mod repositories;
pub mod services;
pub mod token;
pub mod user;
pub mod validation;
pub mod verification;

pub use app::{App, AppId};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, ErrorKind};
pub use services::{AuthService, VerificationService};
pub use token::{AuthToken, TokenClaims};
pub use user::{User, UserId};
pub use verification::{VerificationPolicy, VerificationRecord};
