//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The root component keeps one `RwSignal<AuthState>` fed by the identity
//! client's auth-state notifications and picks the view from it.
//!
//! INVARIANTS
//! ==========
//! Only `SIGNED_IN` notifications change the state. Sign-out is not observed
//! here: the sign-out flow reloads the page and the fresh mount starts from
//! the logged-out default.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::{AuthChangeEvent, Session, User};

/// Which top-level view to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    LoggedOut,
    LoggedIn,
}

/// Authentication state tracking the current user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
}

impl AuthState {
    /// Fold one auth-state notification into the state.
    ///
    /// Returns `true` when the notification was applied. A `SIGNED_IN`
    /// without a session clears the user.
    pub fn apply(&mut self, event: AuthChangeEvent, session: Option<&Session>) -> bool {
        if event != AuthChangeEvent::SignedIn {
            return false;
        }
        self.user = session.map(|s| s.user.clone());
        true
    }

    #[must_use]
    pub fn view(&self) -> ViewState {
        if self.user.is_some() { ViewState::LoggedIn } else { ViewState::LoggedOut }
    }
}
