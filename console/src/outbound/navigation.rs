//! Navigator adapter for the terminal front end.
//!
//! A CLI has no views to switch between; requested routes are logged and
//! recorded so the command runner can tell the operator to sign in.

use std::sync::Mutex;

use tracing::info;

use crate::domain::ports::{Navigator, Route};

/// Records navigation requests for the current command.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    /// Routes requested so far, oldest first.
    pub fn routes(&self) -> Vec<Route> {
        match self.routes.lock() {
            Ok(routes) => routes.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether the login route was requested.
    pub fn login_requested(&self) -> bool {
        self.routes().contains(&Route::Login)
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        info!(?route, "navigation requested");
        match self.routes.lock() {
            Ok(mut routes) => routes.push(route),
            Err(poisoned) => poisoned.into_inner().push(route),
        }
    }
}
