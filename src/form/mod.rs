mod controller;
mod schema;
mod submit;
mod validation;


pub use controller::{
    FieldKey, FieldMeta, FormController, FormError, FormId, FormResult, FormSnapshot,
    SubmitOutcome, SubmitPhase, SubmitState, SubmitTicket,
};
pub use schema::{FieldSpec, FormSchema, FormSchemaBuilder, SchemaError};
pub use staffgate_form_derive::FormModel;
pub use submit::{BoxedSubmitFuture, SubmissionAdapter, SubmissionError, SubmitSuccess};
pub use validation::{
    AnchoredPattern, ErrorMessage, FieldLens, FieldRule, FormModel, Rule, is_valid_email,
    validate,
};
