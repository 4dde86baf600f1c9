use std::sync::Arc;

use futures::executor::block_on;
use staffgate::auth::InMemoryAuthClient;
use staffgate::config::{AppConfig, NavigationConfig};
use staffgate::form::{SubmitOutcome, SubmitState};
use staffgate::navigation::{NavigationRequest, RecordingNavigator, Route};
use staffgate::screens::Notice;
use staffgate::{Screen, StaffApplication};

struct Harness {
    app: StaffApplication,
    auth: InMemoryAuthClient,
    navigator: RecordingNavigator,
}

fn harness() -> Harness {
    let auth = InMemoryAuthClient::new();
    let navigator = RecordingNavigator::new();
    let config = AppConfig {
        navigation: NavigationConfig::immediate(),
        ..AppConfig::default()
    };
    let app = StaffApplication::new(config, Arc::new(navigator.clone()))
        .with_auth(Arc::new(auth.clone()));
    Harness {
        app,
        auth,
        navigator,
    }
}

#[test]
fn landing_pushes_each_form() {
    let harness = harness();
    let Screen::Landing(landing) = harness.app.mount(Route::Landing).expect("landing") else {
        panic!("landing route must mount the landing page");
    };
    let labels: Vec<_> = landing.entries().iter().map(|entry| entry.label).collect();
    assert_eq!(labels, vec!["🔐 Sign-In", "📝 Sign-Up", "👨‍💼 Employee-Form"]);

    landing.open(&landing.entries()[1]);
    assert_eq!(
        harness.navigator.last(),
        Some(NavigationRequest::push(Route::SignUp))
    );
}

#[test]
fn sign_up_creates_account_and_returns_to_landing() {
    let harness = harness();
    let screen = harness.app.sign_up().expect("sign-up screen");
    let form = screen.form();
    form.change("full_name", "Ada Lovelace").expect("name");
    form.change("email", "ada@example.com").expect("email");
    form.change("phone", "9876543210").expect("phone");
    form.change("password", "secret1").expect("password");
    form.change("confirm_password", "secret1").expect("confirm");

    let outcome = block_on(screen.submit()).expect("submit");
    assert!(matches!(outcome, SubmitOutcome::Succeeded(_)));
    assert_eq!(harness.auth.account_count(), 1);
    assert_eq!(
        screen.notice().expect("notice"),
        Some(Notice::Success("✅ Account created successfully!".to_string()))
    );
    assert_eq!(
        harness.navigator.requests(),
        vec![NavigationRequest::replace(Route::Landing)]
    );
}

#[test]
fn sign_up_with_mismatched_confirmation_sends_nothing() {
    let harness = harness();
    let screen = harness.app.sign_up().expect("sign-up screen");
    let form = screen.form();
    form.change("full_name", "Ada Lovelace").expect("name");
    form.change("email", "ada@example.com").expect("email");
    form.change("phone", "9876543210").expect("phone");
    form.change("password", "secret1").expect("password");
    form.change("confirm_password", "secret2").expect("confirm");

    let outcome = block_on(screen.submit()).expect("submit");
    assert!(matches!(
        outcome,
        SubmitOutcome::Rejected { first_error } if first_error.as_str() == "confirm_password"
    ));
    assert_eq!(harness.auth.account_count(), 0);
    assert_eq!(screen.notice().expect("notice"), None);
    assert!(harness.navigator.requests().is_empty());

    let confirm = screen
        .fields()
        .expect("fields")
        .into_iter()
        .find(|field| field.key.as_str() == "confirm_password")
        .expect("confirm field");
    assert_eq!(confirm.error.as_deref(), Some("Passwords must match"));
    assert!(confirm.secure);
}

#[test]
fn duplicate_sign_up_shows_provider_message() {
    let harness = harness();
    block_on(staffgate::auth::AuthClient::sign_up(
        &harness.auth,
        "ada@example.com",
        "secret1",
    ))
    .expect("seed account");

    let screen = harness.app.sign_up().expect("sign-up screen");
    let form = screen.form();
    form.change("full_name", "Ada Lovelace").expect("name");
    form.change("email", "ada@example.com").expect("email");
    form.change("phone", "9876543210").expect("phone");
    form.change("password", "secret1").expect("password");
    form.change("confirm_password", "secret1").expect("confirm");

    let outcome = block_on(screen.submit()).expect("submit");
    let message = "Firebase: Error (auth/email-already-in-use).".to_string();
    assert_eq!(outcome, SubmitOutcome::Failed(message.clone()));
    assert_eq!(screen.notice().expect("notice"), Some(Notice::Error(message)));
    assert!(harness.navigator.requests().is_empty());
}

#[test]
fn sign_in_moves_on_to_employee_form() {
    let harness = harness();
    block_on(staffgate::auth::AuthClient::sign_up(
        &harness.auth,
        "ada@example.com",
        "secret123",
    ))
    .expect("seed account");

    let screen = harness.app.sign_in().expect("sign-in screen");
    assert_eq!(screen.button_label().expect("label"), "➡️ Sign In");
    screen.form().change("email", "ada@example.com").expect("email");
    screen.form().change("password", "secret123").expect("password");

    let outcome = block_on(screen.submit()).expect("submit");
    let SubmitOutcome::Succeeded(success) = outcome else {
        panic!("sign-in should succeed");
    };
    assert_eq!(success.user_id, harness.auth.user_id("ada@example.com"));
    assert_eq!(success.message, "✅ You are signed in!");
    assert_eq!(
        harness.navigator.requests(),
        vec![NavigationRequest::replace(Route::EmployeeForm)]
    );
}

#[test]
fn failed_sign_in_can_be_retried() {
    let harness = harness();
    block_on(staffgate::auth::AuthClient::sign_up(
        &harness.auth,
        "ada@example.com",
        "secret123",
    ))
    .expect("seed account");

    let screen = harness.app.sign_in().expect("sign-in screen");
    screen.form().change("email", "ada@example.com").expect("email");
    screen.form().change("password", "wrong-pass").expect("password");

    let outcome = block_on(screen.submit()).expect("submit");
    assert_eq!(
        outcome,
        SubmitOutcome::Failed("Firebase: Error (auth/invalid-credential).".to_string())
    );
    assert!(matches!(
        screen.form().submit_state().expect("state"),
        SubmitState::Failed(_)
    ));

    screen.form().change("password", "secret123").expect("fix");
    assert_eq!(screen.form().submit_state().expect("state"), SubmitState::Idle);
    assert_eq!(
        screen.notice().expect("notice"),
        Some(Notice::Error(
            "Firebase: Error (auth/invalid-credential).".to_string()
        ))
    );

    let retry = block_on(screen.submit()).expect("retry");
    assert!(matches!(retry, SubmitOutcome::Succeeded(_)));
    assert_eq!(
        screen.notice().expect("notice"),
        Some(Notice::Success("✅ You are signed in!".to_string()))
    );
}

#[test]
fn sign_in_helpers_hide_behind_errors() {
    let harness = harness();
    let screen = harness.app.sign_in().expect("sign-in screen");
    screen.form().change("email", "ada@example.com").expect("email");
    let views = screen.fields().expect("fields");
    assert_eq!(
        views[0].helper,
        Some("Your email that you used while sign-up...")
    );
    assert_eq!(views[1].error, None);
    assert_eq!(views[1].helper, None);

    screen.form().blur("password").expect("blur");
    let views = screen.fields().expect("fields");
    assert_eq!(views[1].error.as_deref(), Some("Password is required"));
}

#[test]
fn offline_provider_surfaces_network_error() {
    let harness = harness();
    harness.auth.set_online(false);
    let screen = harness.app.sign_in().expect("sign-in screen");
    screen.form().change("email", "ada@example.com").expect("email");
    screen.form().change("password", "secret123").expect("password");

    let outcome = block_on(screen.submit()).expect("submit");
    assert_eq!(
        outcome,
        SubmitOutcome::Failed("Firebase: Error (auth/network-request-failed).".to_string())
    );
}

#[test]
fn back_tears_down_and_replaces_with_landing() {
    let harness = harness();
    let screen = harness.app.sign_in().expect("sign-in screen");
    screen.back().expect("back");
    assert_eq!(
        harness.navigator.requests(),
        vec![NavigationRequest::replace(Route::Landing)]
    );
    assert!(!screen.form().is_mounted().expect("mounted"));
    assert!(screen.form().change("email", "ada@example.com").is_err());
}

#[test]
fn employee_form_saves_and_clears() {
    let harness = harness();
    let screen = harness.app.employee_form().expect("employee screen");
    let form = screen.form();
    form.change("full_name", "Grace Hopper").expect("name");
    form.change("email", "grace@example.com").expect("email");
    form.change("phone", "9876543210").expect("phone");
    form.change("department", "Engineering").expect("department");
    form.change("position", "Rear Admiral").expect("position");
    form.change("employee_id", "EMP-0001").expect("id");

    let outcome = block_on(screen.submit()).expect("submit");
    assert!(matches!(outcome, SubmitOutcome::Succeeded(_)));
    assert_eq!(
        screen.notice().expect("notice"),
        Some(Notice::Success("✅ Employee details are saved.".to_string()))
    );
    assert_eq!(form.submit_state().expect("state"), SubmitState::Idle);
    assert_eq!(form.value("employee_id").expect("value"), "");
    assert!(
        screen
            .fields()
            .expect("fields")
            .iter()
            .all(|field| field.error.is_none())
    );
}

#[test]
fn employee_form_rejects_short_phone() {
    let harness = harness();
    let screen = harness.app.employee_form().expect("employee screen");
    let form = screen.form();
    form.change("full_name", "Grace Hopper").expect("name");
    form.change("email", "grace@example.com").expect("email");
    form.change("phone", "98765").expect("phone");
    form.change("department", "Engineering").expect("department");
    form.change("position", "Rear Admiral").expect("position");
    form.change("employee_id", "EMP-0001").expect("id");

    let outcome = block_on(screen.submit()).expect("submit");
    assert!(matches!(
        outcome,
        SubmitOutcome::Rejected { first_error } if first_error.as_str() == "phone"
    ));
    assert_eq!(screen.button_label().expect("label"), "💾 Save Employee");
    assert_eq!(
        form.display_error("phone").expect("error").as_deref(),
        Some("Phone must be a 10-digit number")
    );
}
