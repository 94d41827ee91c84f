#[cfg(test)]
#[path = "route_test.rs"]
mod tests;

/// The navigation surface of the client. Anything unknown falls back to the
/// dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Pricing,
    PaymentSuccess,
}

impl Route {
    pub fn parse(path: &str) -> Route {
        return match path.trim_end_matches('/') {
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/pricing" => Route::Pricing,
            "/payment/success" => Route::PaymentSuccess,
            _ => Route::Dashboard,
        };
    }

    pub fn path(&self) -> &'static str {
        return match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/",
            Route::Pricing => "/pricing",
            Route::PaymentSuccess => "/payment/success",
        };
    }

    pub fn requires_auth(&self) -> bool {
        return matches!(self, Route::Dashboard | Route::PaymentSuccess);
    }
}
