use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::auth::UserId;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubmitSuccess {
    pub message: String,
    pub user_id: Option<UserId>,
}

impl SubmitSuccess {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// A failure reported by the collaborator behind a submission, shown as a
/// single top-level message.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{message}")]
pub struct SubmissionError {
    pub message: String,
}

impl SubmissionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type BoxedSubmitFuture<'a> =
    Pin<Box<dyn Future<Output = Result<SubmitSuccess, SubmissionError>> + Send + 'a>>;

/// Boundary that turns fully validated values into one external call.
///
/// Implementations make exactly one attempt; retrying is left to the user.
pub trait SubmissionAdapter<T>: Send + Sync {
    fn submit<'a>(&'a self, values: &'a T) -> BoxedSubmitFuture<'a>;
}

impl<T, F, Fut> SubmissionAdapter<T> for F
where
    T: Clone + Send + Sync,
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<SubmitSuccess, SubmissionError>> + Send + 'static,
{
    fn submit<'a>(&'a self, values: &'a T) -> BoxedSubmitFuture<'a> {
        Box::pin((self)(values.clone()))
    }
}
