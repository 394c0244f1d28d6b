//! # Warden Axum Integration
//!
//! JSON routes over a [`Warden`] coordinator. Handlers check that required fields are present,
//! call the coordinator, and translate its error kinds to HTTP statuses.
//!
//! | Route                        | Flow                     |
//! | ---------------------------- | ------------------------ |
//! | `POST /register`             | register and send a code |
//! | `POST /login`                | issue a signed token     |
//! | `GET /users/{id}/admin`      | admin lookup             |
//! | `POST /verification`         | re-issue a code          |
//! | `POST /verification/verify`  | confirm an email         |
//! | `POST /password/reset`       | reset a password         |
//! | `GET /health`                | store health check       |
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use warden::{SqliteRepositoryProvider, Warden};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let repositories = Arc::new(SqliteRepositoryProvider::connect("./warden.db").await?);
//!     let warden = Arc::new(Warden::new(repositories));
//!
//!     let app = axum::Router::new().nest("/api", warden_axum::routes(warden).build());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

mod error;
mod routes;
mod types;

pub use error::{ApiError, Result, status_for};
pub use routes::{AppState, create_router};
pub use types::{
    CreateVerificationRequest, HealthResponse, IsAdminResponse, LoginRequest, MessageResponse,
    RegisterRequest, ResetPasswordRequest, TokenResponse, UserIdResponse, VerifyMailRequest,
};

use axum::Router;
use std::sync::Arc;
use warden::{RepositoryProvider, Warden};

/// Create the warden routes for an Axum application.
///
/// The returned builder converts into a [`Router`] that can be nested at any path.
pub fn routes<R>(warden: Arc<Warden<R>>) -> WardenRouterBuilder<R>
where
    R: RepositoryProvider + 'static,
{
    WardenRouterBuilder { warden }
}

pub struct WardenRouterBuilder<R: RepositoryProvider> {
    warden: Arc<Warden<R>>,
}

impl<R: RepositoryProvider + 'static> WardenRouterBuilder<R> {
    pub fn build(self) -> Router {
        create_router(self.warden)
    }
}

impl<R: RepositoryProvider + 'static> From<WardenRouterBuilder<R>> for Router {
    fn from(builder: WardenRouterBuilder<R>) -> Self {
        builder.build()
    }
}
