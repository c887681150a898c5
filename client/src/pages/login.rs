//! Logged-out view: email/password sign-in with sign-up, magic-link and
//! password-recovery modes, plus the new-password form a recovery link
//! lands on.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;

use crate::net::identity::IdentityClient;
#[cfg(feature = "csr")]
use crate::net::identity::{IdentityError, SignUpOutcome};
use crate::net::types::AuthChangeEvent;

/// Provider-side minimum password length.
pub(crate) const MIN_PASSWORD_LEN: usize = 6;

/// Form mode, switched through the links under the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthView {
    SignIn,
    SignUp,
    MagicLink,
    ForgottenPassword,
    UpdatePassword,
}

impl AuthView {
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            Self::SignIn => "Sign in",
            Self::SignUp => "Create an account",
            Self::MagicLink => "Sign in with a magic link",
            Self::ForgottenPassword => "Reset your password",
            Self::UpdatePassword => "Choose a new password",
        }
    }

    #[must_use]
    pub fn submit_label(self) -> &'static str {
        match self {
            Self::SignIn => "Sign in",
            Self::SignUp => "Sign up",
            Self::MagicLink => "Send magic link",
            Self::ForgottenPassword => "Send reset instructions",
            Self::UpdatePassword => "Update password",
        }
    }

    #[must_use]
    pub fn busy_label(self) -> &'static str {
        match self {
            Self::SignIn => "Signing in...",
            Self::SignUp => "Signing up...",
            Self::MagicLink | Self::ForgottenPassword => "Sending...",
            Self::UpdatePassword => "Updating password...",
        }
    }

    #[must_use]
    pub fn needs_email(self) -> bool {
        !matches!(self, Self::UpdatePassword)
    }

    #[must_use]
    pub fn needs_password(self) -> bool {
        matches!(self, Self::SignIn | Self::SignUp | Self::UpdatePassword)
    }

    /// Links to the other modes shown under the form.
    #[must_use]
    pub fn links(self) -> &'static [(AuthView, &'static str)] {
        match self {
            Self::SignIn => &[
                (Self::MagicLink, "Send a magic link email"),
                (Self::ForgottenPassword, "Forgot your password?"),
                (Self::SignUp, "Don't have an account? Sign up"),
            ],
            Self::SignUp => &[
                (Self::MagicLink, "Send a magic link email"),
                (Self::SignIn, "Already have an account? Sign in"),
            ],
            Self::MagicLink | Self::ForgottenPassword => &[(Self::SignIn, "Already have an account? Sign in")],
            Self::UpdatePassword => &[(Self::SignIn, "Back to sign in")],
        }
    }

    /// Confirmation shown after a request that does not sign the user in.
    #[must_use]
    pub fn pending_message(self) -> Option<&'static str> {
        match self {
            Self::SignIn => None,
            Self::SignUp => Some("Check your email for the confirmation link."),
            Self::MagicLink => Some("Check your email for the magic link."),
            Self::ForgottenPassword => Some("Check your email for the password reset link."),
            Self::UpdatePassword => Some("Your password has been updated."),
        }
    }
}

/// Mode the form moves to when the identity client emits `event` while
/// `current` is shown. A recovery redirect opens the new-password form; once
/// the password is updated the form returns to sign-in.
#[must_use]
pub fn follow_event(current: AuthView, event: AuthChangeEvent) -> Option<AuthView> {
    match (current, event) {
        (_, AuthChangeEvent::PasswordRecovery) => Some(AuthView::UpdatePassword),
        (AuthView::UpdatePassword, AuthChangeEvent::UserUpdated) => Some(AuthView::SignIn),
        _ => None,
    }
}

/// Validated form input for one submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AuthInput {
    pub email: String,
    pub password: String,
}

/// Trim and validate the form for `view`. Fields a mode does not use are
/// ignored and come back empty.
pub(crate) fn validate_input(view: AuthView, email: &str, password: &str) -> Result<AuthInput, &'static str> {
    let email = if view.needs_email() { email.trim() } else { "" };
    if view.needs_email() && (email.is_empty() || !email.contains('@')) {
        return Err("Enter a valid email address.");
    }
    if !view.needs_password() {
        return Ok(AuthInput { email: email.to_owned(), password: String::new() });
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters.");
    }
    Ok(AuthInput { email: email.to_owned(), password: password.to_owned() })
}

/// Run the provider call for `view`. `Ok(Some(_))` carries a message to show;
/// `Ok(None)` means the user is now signed in and the view will switch.
#[cfg(feature = "csr")]
async fn submit(identity: &IdentityClient, view: AuthView, input: &AuthInput) -> Result<Option<&'static str>, IdentityError> {
    match view {
        AuthView::SignIn => identity.sign_in_with_password(&input.email, &input.password).await.map(|_| None),
        AuthView::SignUp => match identity.sign_up(&input.email, &input.password).await? {
            SignUpOutcome::SignedIn(_) => Ok(None),
            SignUpOutcome::ConfirmationSent => Ok(view.pending_message()),
        },
        AuthView::MagicLink => identity.sign_in_with_otp(&input.email).await.map(|()| view.pending_message()),
        AuthView::ForgottenPassword => {
            identity.reset_password_for_email(&input.email).await.map(|()| view.pending_message())
        }
        AuthView::UpdatePassword => identity.update_password(&input.password).await.map(|_| view.pending_message()),
    }
}

/// Logged-out view rendered while no user is bound.
#[component]
pub fn LoginPage() -> impl IntoView {
    let identity = expect_context::<IdentityClient>();

    let view_mode = RwSignal::new(AuthView::SignIn);
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let error = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let subscription = identity.on_auth_state_change(move |event, _| {
        let Some(current) = view_mode.try_get_untracked() else {
            return;
        };
        if let Some(next) = follow_event(current, event) {
            view_mode.set(next);
            password.set(String::new());
            error.set(String::new());
        }
    });
    on_cleanup(move || subscription.unsubscribe());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let mode = view_mode.get();
        let input = match validate_input(mode, &email.get(), &password.get()) {
            Ok(input) => input,
            Err(message) => {
                error.set(message.to_owned());
                return;
            }
        };
        error.set(String::new());
        info.set(String::new());
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let identity = identity.clone();
            leptos::task::spawn_local(async move {
                match submit(&identity, mode, &input).await {
                    Ok(Some(message)) => info.set(message.to_owned()),
                    Ok(None) => {}
                    Err(e) => {
                        log::warn!("{} failed: {e}", mode.submit_label());
                        error.set(e.to_string());
                    }
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = input;
            busy.set(false);
        }
    };

    let switch_to = move |next: AuthView| {
        view_mode.set(next);
        info.set(String::new());
        error.set(String::new());
    };

    view! {
        <div class="auth-card">
            <h1>{move || view_mode.get().heading()}</h1>
            <form class="auth-form" on:submit=on_submit>
                <Show when=move || view_mode.get().needs_email()>
                    <label for="email">"Email address"</label>
                    <input
                        id="email"
                        class="auth-input"
                        type="email"
                        placeholder="Your email address"
                        autocomplete="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                </Show>
                <Show when=move || view_mode.get().needs_password()>
                    <label for="password">"Password"</label>
                    <input
                        id="password"
                        class="auth-input"
                        type="password"
                        placeholder="Your password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </Show>
                <button class="button" type="submit" disabled=move || busy.get()>
                    {move || {
                        let mode = view_mode.get();
                        if busy.get() { mode.busy_label() } else { mode.submit_label() }
                    }}
                </button>
            </form>
            <div class="auth-links">
                {move || {
                    view_mode
                        .get()
                        .links()
                        .iter()
                        .map(|&(target, label)| {
                            view! {
                                <button class="auth-link" type="button" on:click=move |_| switch_to(target)>
                                    {label}
                                </button>
                            }
                        })
                        .collect_view()
                }}
            </div>
            <Show when=move || !info.get().is_empty()>
                <p class="auth-message">{move || info.get()}</p>
            </Show>
            <Show when=move || !error.get().is_empty()>
                <p class="auth-message auth-message--error">{move || error.get()}</p>
            </Show>
        </div>
    }
}
