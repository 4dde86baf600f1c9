//! The authentication collaborator boundary.
//!
//! The hosted provider stays opaque: this crate only needs sign-in and
//! sign-up calls that resolve to a user id or a displayable error.

mod memory;

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

pub use memory::InMemoryAuthClient;

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A failure reported by the provider. The message is shown to the user as
/// is; `code` is kept only for logging and tests.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{message}")]
pub struct AuthError {
    code: Option<String>,
    message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type BoxedAuthFuture<'a> = Pin<Box<dyn Future<Output = Result<UserId, AuthError>> + Send + 'a>>;

pub trait AuthClient: Send + Sync {
    fn sign_in<'a>(&'a self, email: &'a str, password: &'a str) -> BoxedAuthFuture<'a>;
    fn sign_up<'a>(&'a self, email: &'a str, password: &'a str) -> BoxedAuthFuture<'a>;
}
