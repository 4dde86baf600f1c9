use std::sync::Arc;

use tracing::debug;

use crate::navigation::{NavigationRequest, Navigator, Route};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LandingEntry {
    pub label: &'static str,
    pub route: Route,
}

const ENTRIES: [LandingEntry; 3] = [
    LandingEntry {
        label: "🔐 Sign-In",
        route: Route::SignIn,
    },
    LandingEntry {
        label: "📝 Sign-Up",
        route: Route::SignUp,
    },
    LandingEntry {
        label: "👨‍💼 Employee-Form",
        route: Route::EmployeeForm,
    },
];

pub struct LandingPage {
    navigator: Arc<dyn Navigator>,
}

impl LandingPage {
    pub const TITLE: &'static str = "Hi! Welcome to Our App";

    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }

    pub fn entries(&self) -> &'static [LandingEntry] {
        &ENTRIES
    }

    /// Pushes the entry's screen on top of the landing page.
    pub fn open(&self, entry: &LandingEntry) {
        debug!(route = %entry.route, "landing entry selected");
        self.navigator.navigate(NavigationRequest::push(entry.route));
    }
}
