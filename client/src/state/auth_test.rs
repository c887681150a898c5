use super::*;

fn session_for(email: &str) -> Session {
    Session {
        access_token: "token-abc".to_owned(),
        token_type: "bearer".to_owned(),
        expires_in: Some(3600),
        expires_at: None,
        refresh_token: None,
        user: User {
            id: "u1".to_owned(),
            email: Some(email.to_owned()),
            aud: "authenticated".to_owned(),
            role: None,
        },
    }
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn auth_state_default_no_user() {
    let state = AuthState::default();
    assert!(state.user.is_none());
}

#[test]
fn no_event_stays_logged_out() {
    assert_eq!(AuthState::default().view(), ViewState::LoggedOut);
}

// =============================================================
// SIGNED_IN
// =============================================================

#[test]
fn signed_in_switches_to_logged_in() {
    let mut state = AuthState::default();
    let session = session_for("alice@example.com");

    assert!(state.apply(AuthChangeEvent::SignedIn, Some(&session)));
    assert_eq!(state.view(), ViewState::LoggedIn);
    assert_eq!(state.user.as_ref().and_then(|u| u.email.as_deref()), Some("alice@example.com"));
}

#[test]
fn latest_signed_in_wins() {
    let mut state = AuthState::default();
    state.apply(AuthChangeEvent::SignedIn, Some(&session_for("alice@example.com")));
    state.apply(AuthChangeEvent::SignedIn, Some(&session_for("bob@example.com")));
    assert_eq!(state.user.and_then(|u| u.email).as_deref(), Some("bob@example.com"));
}

#[test]
fn signed_in_without_session_clears_user() {
    let mut state = AuthState::default();
    state.apply(AuthChangeEvent::SignedIn, Some(&session_for("alice@example.com")));

    assert!(state.apply(AuthChangeEvent::SignedIn, None));
    assert_eq!(state.view(), ViewState::LoggedOut);
}

// =============================================================
// Other events are not reconciled
// =============================================================

#[test]
fn other_events_leave_logged_out_state_untouched() {
    let session = session_for("alice@example.com");
    for event in [
        AuthChangeEvent::InitialSession,
        AuthChangeEvent::TokenRefreshed,
        AuthChangeEvent::UserUpdated,
        AuthChangeEvent::PasswordRecovery,
    ] {
        let mut state = AuthState::default();
        assert!(!state.apply(event, Some(&session)), "{event} should be ignored");
        assert_eq!(state.view(), ViewState::LoggedOut);
    }
}

#[test]
fn signed_out_does_not_clear_user() {
    let mut state = AuthState::default();
    state.apply(AuthChangeEvent::SignedIn, Some(&session_for("alice@example.com")));

    assert!(!state.apply(AuthChangeEvent::SignedOut, None));
    assert_eq!(state.view(), ViewState::LoggedIn);
}
