use crate::Error;

/// Attach the operation name and email to an error on its way out of a service.
///
/// ```rust,ignore
/// let record = self
///     .verifications
///     .find(email)
///     .await
///     .context("Verification.Verify", email)?;
/// ```
pub trait ResultExt<T> {
    fn context(self, op: &'static str, email: &str) -> Result<T, Error>;
}

impl<T, E: Into<Error>> ResultExt<T> for Result<T, E> {
    fn context(self, op: &'static str, email: &str) -> Result<T, Error> {
        self.map_err(|e| Error::Context {
            op,
            email: email.to_string(),
            source: Box::new(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, error::AuthError};

    #[test]
    fn test_context_keeps_kind() {
        let result: Result<(), AuthError> = Err(AuthError::UserExists);
        let err = result.context("Auth.Register", "a@x.com").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UserExists);
        match err {
            Error::Context { op, email, .. } => {
                assert_eq!(op, "Auth.Register");
                assert_eq!(email, "a@x.com");
            }
            other => panic!("Expected context error, got {other:?}"),
        }
    }

    #[test]
    fn test_context_passes_ok_through() {
        let result: Result<i64, Error> = Ok(7);
        assert_eq!(result.context("Auth.IsAdmin", "").unwrap(), 7);
    }
}
