use tracing::info;

use super::{FieldPresentation, FieldView, Notice, NoticeBoard, field_views};
use crate::form::{
    BoxedSubmitFuture, FieldLens, FormController, FormModel, FormResult, FormSchema, SchemaError,
    SubmissionAdapter, SubmitOutcome, SubmitSuccess,
};

const EMPLOYEE_SAVED: &str = "✅ Employee details are saved.";
const PHONE_PATTERN: &str = "[0-9]{10}";

#[derive(Clone, Debug, Default, Eq, PartialEq, FormModel)]
pub struct EmployeeRecord {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub position: String,
    pub employee_id: String,
}

pub fn employee_schema() -> Result<FormSchema<EmployeeRecord>, SchemaError> {
    let fields = EmployeeRecord::fields();
    FormSchema::builder("employee")
        .field(fields.full_name(), |field| {
            field
                .required("Full name is required")
                .min_length(2, "Full name must be at least 2 characters")
        })
        .field(fields.email(), |field| {
            field.required("Email is required").email("Invalid email")
        })
        .field(fields.phone(), |field| {
            field
                .required("Phone number is required")
                .pattern(PHONE_PATTERN, "Phone must be a 10-digit number")
        })
        .field(fields.department(), |field| {
            field.required("Department is required")
        })
        .field(fields.position(), |field| field.required("Position is required"))
        .field(fields.employee_id(), |field| {
            field.required("Employee ID is required")
        })
        .build()
}

/// Accepts every validated record. Records are logged and dropped; there is
/// no storage behind this form yet.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmployeeAdapter;

impl SubmissionAdapter<EmployeeRecord> for EmployeeAdapter {
    fn submit<'a>(&'a self, values: &'a EmployeeRecord) -> BoxedSubmitFuture<'a> {
        Box::pin(async move {
            info!(
                employee_id = %values.employee_id,
                department = %values.department,
                position = %values.position,
                "employee saved"
            );
            Ok(SubmitSuccess::new(EMPLOYEE_SAVED))
        })
    }
}

pub struct EmployeeScreen {
    form: FormController<EmployeeRecord>,
    notice: NoticeBoard,
}

impl EmployeeScreen {
    pub const TITLE: &'static str = "👤 Add Employee";

    pub fn new() -> Result<Self, SchemaError> {
        Ok(Self {
            form: FormController::new(employee_schema()?, EmployeeAdapter),
            notice: NoticeBoard::default(),
        })
    }

    pub fn form(&self) -> &FormController<EmployeeRecord> {
        &self.form
    }

    /// Saves the record and clears the form for the next entry, keeping the
    /// success notice up.
    pub async fn submit(&self) -> FormResult<SubmitOutcome> {
        let outcome = self.form.submit().await?;
        self.notice.record(&outcome);
        if matches!(outcome, SubmitOutcome::Succeeded(_)) {
            self.form.reset()?;
        }
        Ok(outcome)
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
            "Saving..."
        } else {
            "💾 Save Employee"
        })
    }

    pub fn teardown(&self) -> FormResult<()> {
        self.form.teardown()
    }

    pub fn fields(&self) -> FormResult<Vec<FieldView>> {
        let fields = EmployeeRecord::fields();
        field_views(
            &self.form,
            &[
                FieldPresentation::new(fields.full_name().key(), "Full Name"),
                FieldPresentation::new(fields.email().key(), "Email"),
                FieldPresentation::new(fields.phone().key(), "Phone Number"),
                FieldPresentation::new(fields.department().key(), "Department"),
                FieldPresentation::new(fields.position().key(), "Position"),
                FieldPresentation::new(fields.employee_id().key(), "Employee ID"),
            ],
        )
    }
}
