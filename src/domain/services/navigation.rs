#[cfg(test)]
#[path = "navigation_test.rs"]
mod tests;

use crate::domain::models::Route;

/// Tracks where the client currently is. Guarding happens in [Router::resolve];
/// [Router::navigate] is a plain idempotent state write, so the global 401
/// handler can point at login from anywhere without looping.
pub struct Router {
    current: Route,
}

impl Default for Router {
    fn default() -> Router {
        return Router {
            current: Route::Login,
        };
    }
}

impl Router {
    pub fn current(&self) -> Route {
        return self.current;
    }

    pub fn navigate(&mut self, route: Route) {
        self.current = route;
    }

    /// Applies the auth guards: protected routes bounce signed-out callers to
    /// login, and the public auth pages bounce signed-in callers to the
    /// dashboard.
    pub fn resolve(&mut self, route: Route, authenticated: bool) -> Route {
        let resolved = if route.requires_auth() && !authenticated {
            Route::Login
        } else if matches!(route, Route::Login | Route::Register) && authenticated {
            Route::Dashboard
        } else {
            route
        };

        self.current = resolved;
        return resolved;
    }
}
