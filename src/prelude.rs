pub use crate::application::{Screen, StaffApplication};
pub use crate::auth::{AuthClient, AuthError, InMemoryAuthClient, UserId};
pub use crate::config::{AppConfig, NavigationConfig};
pub use crate::form::{
    FieldKey, FieldLens, FormController, FormError, FormModel, FormResult, FormSchema,
    SubmissionAdapter, SubmitOutcome, SubmitState,
};
pub use crate::navigation::{NavigationMode, NavigationRequest, Navigator, Route};
pub use crate::screens::{
    EmployeeScreen, FieldView, LandingPage, Notice, SignInScreen, SignUpScreen,
};
