//! The app's screens: each one wires a schema, a controller, a submission
//! adapter and a navigator together.

mod employee;
mod landing;
mod sign_in;
mod sign_up;

use std::sync::{Arc, RwLock};

use crate::form::{
    ErrorMessage, FieldKey, FormController, FormModel, FormResult, SubmitOutcome,
};

pub use employee::{
    EmployeeAdapter, EmployeeRecord, EmployeeRecordFields, EmployeeScreen, employee_schema,
};
pub use landing::{LandingEntry, LandingPage};
pub use sign_in::{SignInAdapter, SignInScreen, SignInValues, SignInValuesFields, sign_in_schema};
pub use sign_up::{SignUpAdapter, SignUpScreen, SignUpValues, SignUpValuesFields, sign_up_schema};

/// The banner shown under a form after a submission resolves.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(text) | Notice::Error(text) => text,
        }
    }
}

/// Everything a host needs to render one input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldView {
    pub key: FieldKey,
    pub label: &'static str,
    pub value: String,
    pub error: Option<ErrorMessage>,
    pub helper: Option<&'static str>,
    pub secure: bool,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct FieldPresentation {
    pub(crate) key: FieldKey,
    pub(crate) label: &'static str,
    /// Shown while the field has no error at all, touched or not.
    pub(crate) helper: Option<&'static str>,
    pub(crate) secure: bool,
}

impl FieldPresentation {
    pub(crate) const fn new(key: FieldKey, label: &'static str) -> Self {
        Self {
            key,
            label,
            helper: None,
            secure: false,
        }
    }

    pub(crate) const fn helper(mut self, helper: &'static str) -> Self {
        self.helper = Some(helper);
        self
    }

    pub(crate) const fn secure(mut self) -> Self {
        self.secure = true;
        self
    }
}

pub(crate) fn field_views<T: FormModel>(
    form: &FormController<T>,
    presentations: &[FieldPresentation],
) -> FormResult<Vec<FieldView>> {
    let snapshot = form.snapshot()?;
    Ok(presentations
        .iter()
        .map(|presentation| {
            let meta = snapshot
                .field_meta
                .get(&presentation.key)
                .cloned()
                .unwrap_or_default();
            FieldView {
                key: presentation.key,
                label: presentation.label,
                value: snapshot
                    .model
                    .value(presentation.key)
                    .unwrap_or_default()
                    .to_string(),
                error: meta.display_error().cloned(),
                helper: presentation.helper.filter(|_| meta.error.is_none()),
                secure: presentation.secure,
            }
        })
        .collect())
}

#[derive(Clone, Default)]
pub(crate) struct NoticeBoard {
    current: Arc<RwLock<Option<Notice>>>,
}

impl NoticeBoard {
    pub(crate) fn record(&self, outcome: &SubmitOutcome) {
        let notice = match outcome {
            SubmitOutcome::Succeeded(success) => Notice::Success(success.message.clone()),
            SubmitOutcome::Failed(message) => Notice::Error(message.clone()),
            SubmitOutcome::Rejected { .. } | SubmitOutcome::Suppressed | SubmitOutcome::Stale => {
                return;
            }
        };
        *self.write() = Some(notice);
    }

    pub(crate) fn current(&self) -> Option<Notice> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub(crate) fn clear(&self) {
        *self.write() = None;
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Notice>> {
        match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Substitutes `fallback` when the provider reported nothing readable.
pub(crate) fn message_or(message: &str, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}
