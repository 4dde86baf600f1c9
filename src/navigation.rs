use std::fmt::{Display, Formatter};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures_timer::Delay;
use tracing::debug;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Route {
    Landing,
    SignIn,
    SignUp,
    EmployeeForm,
}

impl Route {
    pub const fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::SignIn => "/sign-in",
            Route::SignUp => "/sign-up",
            Route::EmployeeForm => "/employee-form",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        [Route::Landing, Route::SignIn, Route::SignUp, Route::EmployeeForm]
            .into_iter()
            .find(|route| route.path() == path)
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NavigationMode {
    /// Stack the route on top of the current screen.
    Push,
    /// Swap the current screen out for the route.
    Replace,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NavigationRequest {
    pub route: Route,
    pub mode: NavigationMode,
}

impl NavigationRequest {
    pub const fn push(route: Route) -> Self {
        Self {
            route,
            mode: NavigationMode::Push,
        }
    }

    pub const fn replace(route: Route) -> Self {
        Self {
            route,
            mode: NavigationMode::Replace,
        }
    }
}

/// Receives navigation intents. How a route is shown is up to the host.
pub trait Navigator: Send + Sync {
    fn navigate(&self, request: NavigationRequest);
}

impl<F> Navigator for F
where
    F: Fn(NavigationRequest) + Send + Sync,
{
    fn navigate(&self, request: NavigationRequest) {
        (self)(request)
    }
}

/// Keeps every request it receives, in order.
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    requests: Arc<RwLock<Vec<NavigationRequest>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<NavigationRequest> {
        match self.requests.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn last(&self) -> Option<NavigationRequest> {
        self.requests().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, request: NavigationRequest) {
        let mut requests = match self.requests.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        requests.push(request);
    }
}

/// Waits `delay` so a success notice stays visible, then navigates unless
/// `proceed` says the originating screen is gone. Returns whether the
/// request was sent.
pub async fn navigate_after(
    navigator: &dyn Navigator,
    request: NavigationRequest,
    delay: Duration,
    proceed: impl FnOnce() -> bool,
) -> bool {
    if !delay.is_zero() {
        Delay::new(delay).await;
    }
    if !proceed() {
        debug!(route = %request.route, "navigation dropped, screen is gone");
        return false;
    }
    debug!(route = %request.route, mode = ?request.mode, "navigating");
    navigator.navigate(request);
    true
}
