//! Session binder: mirrors identity-client notifications into UI state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Installed once by the root component. The returned subscription is
//! released from `on_cleanup`, so a torn-down root stops receiving events.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;

use crate::net::identity::{IdentityClient, Subscription};
use crate::state::auth::AuthState;

/// Subscribe `auth` to `identity`'s auth-state notifications.
pub fn install_session_binder(identity: &IdentityClient, auth: RwSignal<AuthState>) -> Subscription {
    identity.on_auth_state_change(move |event, session| {
        let mut applied = false;
        auth.update(|state| applied = state.apply(event, session));
        if applied {
            log::debug!("session binder applied {event}");
        }
    })
}
