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

const ACCOUNT_CREATED: &str = "✅ Account created successfully!";
const SIGN_UP_FALLBACK: &str = "Sign up failed";
const PHONE_PATTERN: &str = "[0-9]{10}";

#[derive(Clone, Debug, Default, Eq, PartialEq, FormModel)]
pub struct SignUpValues {
    pub full_name: String,
    pub user_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

pub fn sign_up_schema() -> Result<FormSchema<SignUpValues>, SchemaError> {
    let fields = SignUpValues::fields();
    FormSchema::builder("sign-up")
        .field(fields.full_name(), |field| {
            field
                .required("Full name is required")
                .min_length(3, "Name can not be less than 3 characters")
                .max_length(40, "Name can not exceed 40 characters")
        })
        .field(fields.user_name(), |field| {
            field
                .optional()
                .min_length(3, "User name can't be less than 3 characters")
                .max_length(20, "User name can't be more than 20 characters")
        })
        .field(fields.email(), |field| {
            field.required("Email is required").email("Invalid Email")
        })
        .field(fields.phone(), |field| {
            field
                .required("Phone number is required")
                .pattern(PHONE_PATTERN, "Phone must be a 10-digit number")
        })
        .field(fields.password(), |field| {
            field
                .required("Password is required")
                .min_length(6, "Min 6 characters")
        })
        .field(fields.confirm_password(), |field| {
            field
                .required("Confirm password is required")
                .equals(fields.password().key(), "Passwords must match")
        })
        .build()
}

pub struct SignUpAdapter {
    auth: Arc<dyn AuthClient>,
}

impl SignUpAdapter {
    pub fn new(auth: Arc<dyn AuthClient>) -> Self {
        Self { auth }
    }
}

impl SubmissionAdapter<SignUpValues> for SignUpAdapter {
    fn submit<'a>(&'a self, values: &'a SignUpValues) -> BoxedSubmitFuture<'a> {
        Box::pin(async move {
            match self.auth.sign_up(&values.email, &values.password).await {
                Ok(user_id) => {
                    info!(user = %user_id, "account created");
                    Ok(SubmitSuccess::new(ACCOUNT_CREATED).with_user(user_id))
                }
                Err(error) => {
                    warn!(code = ?error.code(), error = %error, "sign-up failed");
                    Err(SubmissionError::new(message_or(
                        error.message(),
                        SIGN_UP_FALLBACK,
                    )))
                }
            }
        })
    }
}

pub struct SignUpScreen {
    form: FormController<SignUpValues>,
    navigator: Arc<dyn Navigator>,
    redirect_delay: Duration,
    notice: NoticeBoard,
}

impl SignUpScreen {
    pub const TITLE: &'static str = "📝 Sign Up";

    pub fn new(
        auth: Arc<dyn AuthClient>,
        navigator: Arc<dyn Navigator>,
        navigation: &NavigationConfig,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            form: FormController::new(sign_up_schema()?, SignUpAdapter::new(auth)),
            navigator,
            redirect_delay: navigation.sign_up_redirect(),
            notice: NoticeBoard::default(),
        })
    }

    pub fn form(&self) -> &FormController<SignUpValues> {
        &self.form
    }

    /// Submits the form; once the account exists, returns to the landing
    /// page after the redirect delay.
    pub async fn submit(&self) -> FormResult<SubmitOutcome> {
        let outcome = self.form.submit().await?;
        self.notice.record(&outcome);
        if matches!(outcome, SubmitOutcome::Succeeded(_)) {
            let form = self.form.clone();
            navigate_after(
                self.navigator.as_ref(),
                NavigationRequest::replace(Route::Landing),
                self.redirect_delay,
                move || form.is_mounted().unwrap_or(false),
            )
            .await;
        }
        Ok(outcome)
    }

    pub fn back(&self) -> FormResult<()> {
        self.form.teardown()?;
        self.notice.clear();
        self.navigator
            .navigate(NavigationRequest::replace(Route::Landing));
        Ok(())
    }

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
            "Creating..."
        } else {
            "Create Account"
        })
    }

    pub fn fields(&self) -> FormResult<Vec<FieldView>> {
        let fields = SignUpValues::fields();
        field_views(
            &self.form,
            &[
                FieldPresentation::new(fields.full_name().key(), "Full Name"),
                FieldPresentation::new(fields.user_name().key(), "User Name (optional)"),
                FieldPresentation::new(fields.email().key(), "Email"),
                FieldPresentation::new(fields.phone().key(), "Contact Number (10 digits)"),
                FieldPresentation::new(fields.password().key(), "Password").secure(),
                FieldPresentation::new(fields.confirm_password().key(), "Confirm Password")
                    .secure(),
            ],
        )
    }
}
