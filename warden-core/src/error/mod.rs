pub mod utilities;

pub use utilities::ResultExt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Request cancelled")]
    Cancelled,

    /// An error raised while running a named operation, tagged with the email it concerned.
    #[error("{op}{}: {source}", email_suffix(.email))]
    Context {
        op: &'static str,
        email: String,
        #[source]
        source: Box<Error>,
    },
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists")]
    UserExists,

    #[error("User not found")]
    UserNotFound,

    #[error("App not found")]
    AppNotFound,

    #[error("New password matches the current password")]
    PasswordsAreEqual,
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("Verification not found")]
    NotFound,

    #[error("Verification expired")]
    Expired,

    #[error("Verification codes differ")]
    CodesDiffer,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Email is required")]
    EmptyEmail,

    #[error("Password is required")]
    EmptyPassword,

    #[error("Code is required")]
    EmptyCode,

    #[error("Expiry time is required")]
    EmptyExpiresAt,

    #[error("Invalid field: {0}")]
    InvalidField(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Storage call cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Token signing failed: {0}")]
    TokenSigning(String),

    #[error("Token verification failed: {0}")]
    TokenVerification(String),
}

/// The closed set of outcomes callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidCredentials,
    UserExists,
    UserNotFound,
    AppNotFound,
    PasswordsAreEqual,
    EmptyEmail,
    EmptyPassword,
    EmptyCode,
    EmptyExpiresAt,
    InvalidArgument,
    VerificationNotFound,
    VerificationExpired,
    CodesDiffer,
    DeliveryError,
    Cancelled,
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorKind::UserExists => "USER_EXISTS",
            ErrorKind::UserNotFound => "USER_NOT_FOUND",
            ErrorKind::AppNotFound => "APP_NOT_FOUND",
            ErrorKind::PasswordsAreEqual => "PASSWORDS_ARE_EQUAL",
            ErrorKind::EmptyEmail => "EMPTY_EMAIL",
            ErrorKind::EmptyPassword => "EMPTY_PASSWORD",
            ErrorKind::EmptyCode => "EMPTY_CODE",
            ErrorKind::EmptyExpiresAt => "EMPTY_EXPIRES_AT",
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::VerificationNotFound => "VERIFICATION_NOT_FOUND",
            ErrorKind::VerificationExpired => "VERIFICATION_EXPIRED",
            ErrorKind::CodesDiffer => "CODES_DIFFER",
            ErrorKind::DeliveryError => "DELIVERY_ERROR",
            ErrorKind::Cancelled => "CANCELLED",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn email_suffix(email: &str) -> String {
    if email.is_empty() {
        String::new()
    } else {
        format!(" [{email}]")
    }
}

impl Error {
    /// Classify this error, looking through any operation context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Auth(error) => match error {
                AuthError::InvalidCredentials => ErrorKind::InvalidCredentials,
                AuthError::UserExists => ErrorKind::UserExists,
                AuthError::UserNotFound => ErrorKind::UserNotFound,
                AuthError::AppNotFound => ErrorKind::AppNotFound,
                AuthError::PasswordsAreEqual => ErrorKind::PasswordsAreEqual,
            },
            Error::Verification(error) => match error {
                VerificationError::NotFound => ErrorKind::VerificationNotFound,
                VerificationError::Expired => ErrorKind::VerificationExpired,
                VerificationError::CodesDiffer => ErrorKind::CodesDiffer,
            },
            Error::Validation(error) => match error {
                ValidationError::EmptyEmail => ErrorKind::EmptyEmail,
                ValidationError::EmptyPassword => ErrorKind::EmptyPassword,
                ValidationError::EmptyCode => ErrorKind::EmptyCode,
                ValidationError::EmptyExpiresAt => ErrorKind::EmptyExpiresAt,
                ValidationError::InvalidField(_) => ErrorKind::InvalidArgument,
            },
            Error::Storage(StorageError::Cancelled) | Error::Cancelled => ErrorKind::Cancelled,
            Error::Storage(_) | Error::Crypto(_) => ErrorKind::Internal,
            Error::Delivery(_) => ErrorKind::DeliveryError,
            Error::Context { source, .. } => source.kind(),
        }
    }

    pub fn is_storage_error(&self) -> bool {
        match self {
            Error::Storage(_) => true,
            Error::Context { source, .. } => source.is_storage_error(),
            _ => false,
        }
    }

    /// The operation name attached by the outermost context, if any.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Error::Context { op, .. } => Some(*op),
            _ => None,
        }
    }
}
