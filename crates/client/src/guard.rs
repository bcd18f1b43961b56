//! Route access control.
//!
//! Guards only consult the session; they never touch the network. The
//! administrator check relies on the display-name/email heuristic of
//! [`pizzeria_core::User::is_administrator`], since the backend has no role
//! field.

use crate::navigation::{Guard, Navigator, Route};
use crate::session::SessionStore;

/// Outcome of a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Route),
}

/// Allow any logged-in user; send everyone else to the login screen.
#[must_use]
pub fn require_authenticated(session: &SessionStore) -> Access {
    if session.is_authenticated() {
        Access::Allow
    } else {
        Access::Redirect(Route::Login)
    }
}

/// Allow administrators only. Logged-in users without the privilege are sent
/// home, anonymous users to the login screen.
#[must_use]
pub fn require_administrator(session: &SessionStore) -> Access {
    if !session.is_authenticated() {
        return Access::Redirect(Route::Login);
    }
    if session.is_administrator() {
        Access::Allow
    } else {
        Access::Redirect(Route::Home)
    }
}

/// Evaluate `guard` for the current session.
#[must_use]
pub fn check(guard: Guard, session: &SessionStore) -> Access {
    match guard {
        Guard::Public => Access::Allow,
        Guard::Authenticated => require_authenticated(session),
        Guard::Administrator => require_administrator(session),
    }
}

/// Navigate to `route` if its guard allows it, otherwise to the redirect
/// target. Returns whether `route` itself was entered.
pub fn navigate(route: Route, session: &SessionStore, navigator: &dyn Navigator) -> bool {
    match check(route.guard(), session) {
        Access::Allow => {
            navigator.navigate(route);
            true
        }
        Access::Redirect(target) => {
            tracing::debug!(requested = %route, redirect = %target, "Route guarded");
            navigator.navigate(target);
            false
        }
    }
}
