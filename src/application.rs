use std::sync::Arc;

use tracing::debug;

use crate::auth::{AuthClient, InMemoryAuthClient};
use crate::config::AppConfig;
use crate::form::SchemaError;
use crate::logging;
use crate::navigation::{Navigator, Route};
use crate::screens::{EmployeeScreen, LandingPage, SignInScreen, SignUpScreen};

/// A freshly mounted screen for one route.
pub enum Screen {
    Landing(LandingPage),
    SignIn(SignInScreen),
    SignUp(SignUpScreen),
    EmployeeForm(EmployeeScreen),
}

impl Screen {
    pub fn route(&self) -> Route {
        match self {
            Screen::Landing(_) => Route::Landing,
            Screen::SignIn(_) => Route::SignIn,
            Screen::SignUp(_) => Route::SignUp,
            Screen::EmployeeForm(_) => Route::EmployeeForm,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Landing(_) => LandingPage::TITLE,
            Screen::SignIn(_) => SignInScreen::TITLE,
            Screen::SignUp(_) => SignUpScreen::TITLE,
            Screen::EmployeeForm(_) => EmployeeScreen::TITLE,
        }
    }
}

/// Holds the collaborators every screen is built from.
pub struct StaffApplication {
    config: AppConfig,
    auth: Arc<dyn AuthClient>,
    navigator: Arc<dyn Navigator>,
}

impl StaffApplication {
    /// Navigation intents go to `navigator`. Authentication starts on the
    /// in-memory provider until `with_auth` swaps in a real one.
    pub fn new(config: AppConfig, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            config,
            auth: Arc::new(InMemoryAuthClient::new()),
            navigator,
        }
    }

    pub fn with_auth(mut self, auth: Arc<dyn AuthClient>) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Installs the fmt subscriber with the configured fallback filter.
    pub fn init_logging(&self) -> bool {
        logging::init(&self.config.log_filter)
    }

    pub fn landing(&self) -> LandingPage {
        LandingPage::new(self.navigator.clone())
    }

    pub fn sign_in(&self) -> Result<SignInScreen, SchemaError> {
        SignInScreen::new(
            self.auth.clone(),
            self.navigator.clone(),
            &self.config.navigation,
        )
    }

    pub fn sign_up(&self) -> Result<SignUpScreen, SchemaError> {
        SignUpScreen::new(
            self.auth.clone(),
            self.navigator.clone(),
            &self.config.navigation,
        )
    }

    pub fn employee_form(&self) -> Result<EmployeeScreen, SchemaError> {
        EmployeeScreen::new()
    }

    pub fn mount(&self, route: Route) -> Result<Screen, SchemaError> {
        debug!(route = %route, "mounting screen");
        Ok(match route {
            Route::Landing => Screen::Landing(self.landing()),
            Route::SignIn => Screen::SignIn(self.sign_in()?),
            Route::SignUp => Screen::SignUp(self.sign_up()?),
            Route::EmployeeForm => Screen::EmployeeForm(self.employee_form()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{NavigationRequest, RecordingNavigator};

    #[test]
    fn every_route_mounts_its_screen() {
        let app = StaffApplication::new(AppConfig::default(), Arc::new(RecordingNavigator::new()));
        for route in [Route::Landing, Route::SignIn, Route::SignUp, Route::EmployeeForm] {
            let screen = app.mount(route).expect("screen mounts");
            assert_eq!(screen.route(), route);
            assert!(!screen.title().is_empty());
        }
    }

    #[test]
    fn screens_navigate_through_the_host_navigator() {
        let navigator = RecordingNavigator::new();
        let app = StaffApplication::new(AppConfig::default(), Arc::new(navigator.clone()));
        let landing = app.landing();
        landing.open(&landing.entries()[0]);
        app.sign_up().expect("sign-up screen").back().expect("back");
        assert_eq!(
            navigator.requests(),
            vec![
                NavigationRequest::push(Route::SignIn),
                NavigationRequest::replace(Route::Landing),
            ]
        );
    }
}
