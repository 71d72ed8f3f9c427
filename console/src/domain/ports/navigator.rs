//! Port for moving the operator between top-level views.

/// Top-level destinations the domain can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The sign-in view.
    Login,
}

/// Port through which the session guard requests navigation.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Navigate to `route`.
    fn navigate(&self, route: Route);
}
