use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::{FieldPresentation, FieldView, Notice, NoticeBoard, field_views, message_or};
use crate::auth::AuthClient;
use crate::config::NavigationConfig;
use crate::form::{
    BoxedSubmitFuture, FieldLens, FormController, FormModel, FormResult, FormSchema, SchemaError,
    SubmissionAdapter, SubmissionError, SubmitOutcome, SubmitSuccess,
};
use crate::navigation::{NavigationRequest, Navigator, Route, navigate_after};

const SIGNED_IN: &str = "✅ You are signed in!";
const SIGN_IN_FALLBACK: &str = "Sign in failed. Please try again.";

#[derive(Clone, Debug, Default, Eq, PartialEq, FormModel)]
pub struct SignInValues {
    pub email: String,
    pub password: String,
}

pub fn sign_in_schema() -> Result<FormSchema<SignInValues>, SchemaError> {
    let fields = SignInValues::fields();
    FormSchema::builder("sign-in")
        .field(fields.email(), |field| {
            field.required("Email is required").email("Invalid email")
        })
        .field(fields.password(), |field| {
            field
                .required("Password is required")
                .min_length(8, "Min 8 characters")
        })
        .build()
}

pub struct SignInAdapter {
    auth: Arc<dyn AuthClient>,
}

impl SignInAdapter {
    pub fn new(auth: Arc<dyn AuthClient>) -> Self {
        Self { auth }
    }
}

impl SubmissionAdapter<SignInValues> for SignInAdapter {
    fn submit<'a>(&'a self, values: &'a SignInValues) -> BoxedSubmitFuture<'a> {
        Box::pin(async move {
            match self.auth.sign_in(&values.email, &values.password).await {
                Ok(user_id) => {
                    info!(user = %user_id, "signed in");
                    Ok(SubmitSuccess::new(SIGNED_IN).with_user(user_id))
                }
                Err(error) => {
                    warn!(code = ?error.code(), error = %error, "sign-in failed");
                    Err(SubmissionError::new(message_or(
                        error.message(),
                        SIGN_IN_FALLBACK,
                    )))
                }
            }
        })
    }
}

pub struct SignInScreen {
    form: FormController<SignInValues>,
    navigator: Arc<dyn Navigator>,
    redirect_delay: Duration,
    notice: NoticeBoard,
}

impl SignInScreen {
    pub const TITLE: &'static str = "🔐 Sign In";

    pub fn new(
        auth: Arc<dyn AuthClient>,
        navigator: Arc<dyn Navigator>,
        navigation: &NavigationConfig,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            form: FormController::new(sign_in_schema()?, SignInAdapter::new(auth)),
            navigator,
            redirect_delay: navigation.sign_in_redirect(),
            notice: NoticeBoard::default(),
        })
    }

    pub fn form(&self) -> &FormController<SignInValues> {
        &self.form
    }

    /// Submits the form; on success waits for the redirect delay and then
    /// replaces the screen with the employee form.
    pub async fn submit(&self) -> FormResult<SubmitOutcome> {
        let outcome = self.form.submit().await?;
        self.notice.record(&outcome);
        if matches!(outcome, SubmitOutcome::Succeeded(_)) {
            let form = self.form.clone();
            navigate_after(
                self.navigator.as_ref(),
                NavigationRequest::replace(Route::EmployeeForm),
                self.redirect_delay,
                move || form.is_mounted().unwrap_or(false),
            )
            .await;
        }
        Ok(outcome)
    }

    /// Leaves for the landing page; a pending sign-in result is dropped.
    pub fn back(&self) -> FormResult<()> {
        self.form.teardown()?;
        self.notice.clear();
        self.navigator
            .navigate(NavigationRequest::replace(Route::Landing));
        Ok(())
    }

    /// The banner to show; hidden while a submission is in flight.
    pub fn notice(&self) -> FormResult<Option<Notice>> {
        if self.is_busy()? {
            return Ok(None);
        }
        Ok(self.notice.current())
    }

    pub fn is_busy(&self) -> FormResult<bool> {
        self.form.is_submitting()
    }

    pub fn button_label(&self) -> FormResult<&'static str> {
        Ok(if self.is_busy()? {
            "Signing in..."
        } else {
            "➡️ Sign In"
        })
    }

    pub fn fields(&self) -> FormResult<Vec<FieldView>> {
        let fields = SignInValues::fields();
        field_views(
            &self.form,
            &[
                FieldPresentation::new(fields.email().key(), "Enter your email")
                    .helper("Your email that you used while sign-up..."),
                FieldPresentation::new(fields.password().key(), "Enter your password")
                    .helper("Password created by you")
                    .secure(),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, BoxedAuthFuture, UserId};
    use crate::navigation::RecordingNavigator;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::task::noop_waker;
    use std::future::Future;
    use std::sync::Mutex;
    use std::task::Context;

    type Gate = oneshot::Receiver<Result<UserId, AuthError>>;

    struct PendingAuth {
        gate: Mutex<Option<Gate>>,
    }

    impl AuthClient for PendingAuth {
        fn sign_in<'a>(&'a self, _email: &'a str, _password: &'a str) -> BoxedAuthFuture<'a> {
            let gate = self.gate.lock().expect("gate lock").take();
            Box::pin(async move {
                match gate {
                    Some(gate) => gate
                        .await
                        .unwrap_or_else(|_| Err(AuthError::new(String::new()))),
                    None => Err(AuthError::new(String::new())),
                }
            })
        }

        fn sign_up<'a>(&'a self, _email: &'a str, _password: &'a str) -> BoxedAuthFuture<'a> {
            Box::pin(async { Err(AuthError::new("unsupported")) })
        }
    }

    #[test]
    fn sign_in_schema_orders_required_before_format() {
        let schema = sign_in_schema().expect("schema builds");
        let values = SignInValues::default();
        assert_eq!(
            schema
                .validate_field(SignInValues::fields().email().key(), &values)
                .as_deref(),
            Some("Email is required")
        );

        let values = SignInValues {
            email: "not-an-email".into(),
            password: "short".into(),
        };
        let errors = schema.validate_all(&values);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].1, "Invalid email");
        assert_eq!(errors[1].1, "Min 8 characters");
    }

    #[test]
    fn busy_screen_hides_notice_and_back_drops_the_result() {
        let (sender, receiver) = oneshot::channel();
        let navigator = RecordingNavigator::new();
        let screen = SignInScreen::new(
            Arc::new(PendingAuth {
                gate: Mutex::new(Some(receiver)),
            }),
            Arc::new(navigator.clone()),
            &NavigationConfig::immediate(),
        )
        .expect("screen");
        screen.form().change("email", "ada@example.com").expect("email");
        screen.form().change("password", "secret123").expect("password");

        let mut pending = Box::pin(screen.submit());
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        assert!(pending.as_mut().poll(&mut cx).is_pending());
        assert!(screen.is_busy().expect("busy"));
        assert_eq!(screen.button_label().expect("label"), "Signing in...");
        assert_eq!(screen.notice().expect("notice"), None);

        screen.back().expect("back");
        sender
            .send(Ok(UserId::new("uid-000001")))
            .expect("release gate");
        assert_eq!(block_on(pending).expect("submit"), SubmitOutcome::Stale);
        assert_eq!(
            navigator.requests(),
            vec![NavigationRequest::replace(Route::Landing)]
        );
    }

    #[test]
    fn empty_provider_message_uses_fallback() {
        let (sender, receiver) = oneshot::channel();
        let screen = SignInScreen::new(
            Arc::new(PendingAuth {
                gate: Mutex::new(Some(receiver)),
            }),
            Arc::new(RecordingNavigator::new()),
            &NavigationConfig::immediate(),
        )
        .expect("screen");
        screen.form().change("email", "ada@example.com").expect("email");
        screen.form().change("password", "secret123").expect("password");
        sender
            .send(Err(AuthError::new("  ")))
            .expect("release gate");

        let outcome = block_on(screen.submit()).expect("submit");
        assert_eq!(outcome, SubmitOutcome::Failed(SIGN_IN_FALLBACK.to_string()));
        assert_eq!(
            screen.notice().expect("notice"),
            Some(Notice::Error(SIGN_IN_FALLBACK.to_string()))
        );
    }
}
