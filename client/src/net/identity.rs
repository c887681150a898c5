//! Identity-provider client: auth-state notifications plus the provider's
//! hosted REST endpoints (password sign-in, sign-up, magic link, password
//! recovery, sign-out).
//!
//! ARCHITECTURE
//! ============
//! Listeners register through [`IdentityClient::on_auth_state_change`] and
//! receive every notification the client emits. Each successful sign-in
//! persists the session under the provider's storage key before notifying,
//! so the token is readable from storage by the time listeners run.
//!
//! TRADE-OFFS
//! ==========
//! The registry sits behind `Arc<Mutex<_>>` because Leptos context values
//! must be `Send + Sync`, even though the browser runs one thread. Listeners
//! are cloned out of the lock before dispatch so a listener may subscribe
//! or unsubscribe while being notified.
//!
//! ERROR HANDLING
//! ==============
//! Provider calls return [`IdentityError`]. Outside the browser they fail
//! with [`IdentityError::Unavailable`].

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use url::form_urlencoded;

use super::types::{AuthChangeEvent, Session, StoredToken, User};
use crate::config::ProviderConfig;
use crate::util::{browser, storage};

/// Callback invoked for each auth-state notification.
pub type AuthListener = Arc<dyn Fn(AuthChangeEvent, Option<&Session>) + Send + Sync>;

#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("identity provider unreachable: {0}")]
    Transport(String),
    #[error("identity provider returned {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("unexpected identity provider response: {0}")]
    Decode(String),
    #[error("no active session")]
    NoSession,
    #[error("identity provider is only reachable from the browser")]
    Unavailable,
}

/// Result of a sign-up request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The provider auto-confirmed the account and returned a session.
    SignedIn(Session),
    /// The provider sent a confirmation email; no session yet.
    ConfirmationSent,
}

/// Operations the sign-out flow needs from an identity provider.
pub trait AuthProvider {
    /// End the current session with the provider.
    fn sign_out(&self) -> impl Future<Output = Result<(), IdentityError>>;
}

// =============================================================================
// LISTENER REGISTRY
// =============================================================================

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(u64, AuthListener)>,
}

/// Handle returned by [`IdentityClient::on_auth_state_change`].
///
/// The listener stays registered until [`Subscription::unsubscribe`] is
/// called; dropping the handle does not unregister it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<ListenerRegistry>>,
}

impl Subscription {
    /// Remove the listener. Calling this more than once is harmless.
    pub fn unsubscribe(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        lock_registry(&registry).listeners.retain(|(id, _)| *id != self.id);
    }
}

/// Lock the registry, recovering from a listener that panicked mid-dispatch.
fn lock_registry(registry: &Mutex<ListenerRegistry>) -> MutexGuard<'_, ListenerRegistry> {
    match registry.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Client for the hosted identity provider.
#[derive(Clone)]
pub struct IdentityClient {
    config: ProviderConfig,
    registry: Arc<Mutex<ListenerRegistry>>,
}

impl IdentityClient {
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        Self { config, registry: Arc::new(Mutex::new(ListenerRegistry::default())) }
    }

    /// Register `listener` for every subsequent auth-state notification.
    pub fn on_auth_state_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn(AuthChangeEvent, Option<&Session>) + Send + Sync + 'static,
    {
        let mut registry = lock_registry(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(listener)));
        Subscription { id, registry: Arc::downgrade(&self.registry) }
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self) -> usize {
        lock_registry(&self.registry).listeners.len()
    }

    /// Notify every registered listener.
    pub(crate) fn emit(&self, event: AuthChangeEvent, session: Option<&Session>) {
        let listeners: Vec<AuthListener> =
            lock_registry(&self.registry).listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
        log::debug!("auth state change: {event}");
        for listener in listeners {
            listener(event, session);
        }
    }

    // -------------------------------------------------------------------------
    // Persisted session
    // -------------------------------------------------------------------------

    /// Session persisted by a previous sign-in, if it still parses.
    #[must_use]
    pub fn stored_session(&self) -> Option<Session> {
        storage::load_json(&self.config.storage_key())
    }

    fn persist(&self, session: &Session) {
        storage::save_json(&self.config.storage_key(), session);
    }

    #[cfg(feature = "csr")]
    fn sign_in_with_session(&self, session: &Session) {
        self.persist(session);
        self.emit(AuthChangeEvent::SignedIn, Some(session));
    }

    /// Restore any existing session and announce it.
    ///
    /// A provider redirect carrying tokens in the URL fragment takes
    /// precedence over the stored session; a recovery redirect is announced
    /// as `PASSWORD_RECOVERY`. Without either, listeners get
    /// `INITIAL_SESSION` with no session.
    pub async fn initialize(&self) {
        let fragment = browser::location_hash().map(|hash| parse_fragment(&hash));
        match &fragment {
            Some(FragmentOutcome::Session(_)) => browser::clear_location_hash(),
            Some(FragmentOutcome::Error(description)) => {
                browser::clear_location_hash();
                log::warn!("identity provider redirect failed: {description}");
            }
            Some(FragmentOutcome::Empty) | None => {}
        }

        let (event, session) = match startup_event(fragment, self.stored_session()) {
            Startup::Announce(event, session) => (event, session),
            Startup::Redirect(fragment, stored) => {
                let event = fragment.event();
                match self.fetch_user(&fragment.access_token).await {
                    Ok(user) => {
                        let session = fragment.into_session(user);
                        self.persist(&session);
                        (event, Some(session))
                    }
                    Err(e) => {
                        log::warn!("could not load user for redirect session: {e}");
                        stored_event(stored)
                    }
                }
            }
        };
        self.emit(event, session.as_ref());
    }

    // -------------------------------------------------------------------------
    // Provider operations
    // -------------------------------------------------------------------------

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unreachable, rejects the
    /// credentials, or answers with an unexpected body.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        #[cfg(feature = "csr")]
        {
            let payload = serde_json::json!({ "email": email, "password": password });
            let resp = self.post(&token_endpoint(&self.config.url()), Some(&payload), None).await?;
            let session: Session = resp.json().await.map_err(|e| IdentityError::Decode(e.to_string()))?;
            self.sign_in_with_session(&session);
            Ok(session)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (email, password);
            Err(IdentityError::Unavailable)
        }
    }

    /// Create an account with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unreachable or rejects the sign-up.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, IdentityError> {
        #[cfg(feature = "csr")]
        {
            let payload = serde_json::json!({ "email": email, "password": password });
            let url = signup_endpoint(&self.config.url(), browser::app_root_url().as_deref());
            let resp = self.post(&url, Some(&payload), None).await?;
            let body: serde_json::Value = resp.json().await.map_err(|e| IdentityError::Decode(e.to_string()))?;
            let outcome = parse_sign_up(body)?;
            if let SignUpOutcome::SignedIn(session) = &outcome {
                self.sign_in_with_session(session);
            }
            Ok(outcome)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (email, password);
            Err(IdentityError::Unavailable)
        }
    }

    /// Email a one-time sign-in link that redirects back to the app root.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unreachable or rejects the request.
    pub async fn sign_in_with_otp(&self, email: &str) -> Result<(), IdentityError> {
        #[cfg(feature = "csr")]
        {
            let payload = serde_json::json!({ "email": email, "create_user": true });
            let url = otp_endpoint(&self.config.url(), browser::app_root_url().as_deref());
            self.post(&url, Some(&payload), None).await?;
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = email;
            Err(IdentityError::Unavailable)
        }
    }

    /// Email a password-reset link that redirects back to the app root.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unreachable or rejects the request.
    pub async fn reset_password_for_email(&self, email: &str) -> Result<(), IdentityError> {
        #[cfg(feature = "csr")]
        {
            let payload = serde_json::json!({ "email": email });
            let url = recover_endpoint(&self.config.url(), browser::app_root_url().as_deref());
            self.post(&url, Some(&payload), None).await?;
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = email;
            Err(IdentityError::Unavailable)
        }
    }

    /// Set a new password for the signed-in user, typically after a recovery
    /// redirect. Emits `USER_UPDATED` with the refreshed session.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NoSession`] when nothing is stored, or an
    /// error if the provider is unreachable or rejects the password.
    pub async fn update_password(&self, password: &str) -> Result<User, IdentityError> {
        let Some(mut session) = self.stored_session() else {
            return Err(IdentityError::NoSession);
        };
        #[cfg(feature = "csr")]
        {
            let payload = serde_json::json!({ "password": password });
            let request = gloo_net::http::Request::put(&user_endpoint(&self.config.url()));
            let resp = self.send(request, Some(&payload), Some(&session.access_token)).await?;
            let user: User = resp.json().await.map_err(|e| IdentityError::Decode(e.to_string()))?;
            session.user = user.clone();
            self.persist(&session);
            self.emit(AuthChangeEvent::UserUpdated, Some(&session));
            Ok(user)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (password, &mut session);
            Err(IdentityError::Unavailable)
        }
    }

    /// End the session with the provider and forget it locally.
    ///
    /// The stored session is removed and `SIGNED_OUT` is emitted even when
    /// the provider call fails; the provider error is still returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider logout call fails.
    pub async fn sign_out(&self) -> Result<(), IdentityError> {
        let key = self.config.storage_key();
        let token = storage::load_json::<StoredToken>(&key).and_then(|t| t.access_token);
        let result = match token {
            Some(token) => self.logout(&token).await,
            None => Ok(()),
        };
        storage::remove(&key);
        self.emit(AuthChangeEvent::SignedOut, None);
        result
    }

    async fn logout(&self, access_token: &str) -> Result<(), IdentityError> {
        #[cfg(feature = "csr")]
        {
            match self.post(&logout_endpoint(&self.config.url()), None, Some(access_token)).await {
                // Already expired or revoked on the provider side.
                Err(IdentityError::Provider { status: 401 | 403 | 404, .. }) | Ok(_) => Ok(()),
                Err(e) => Err(e),
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = access_token;
            Err(IdentityError::Unavailable)
        }
    }

    async fn fetch_user(&self, access_token: &str) -> Result<User, IdentityError> {
        #[cfg(feature = "csr")]
        {
            let resp = gloo_net::http::Request::get(&user_endpoint(&self.config.url()))
                .header("apikey", &self.config.anon_key)
                .header("Authorization", &format!("Bearer {access_token}"))
                .send()
                .await
                .map_err(|e| IdentityError::Transport(e.to_string()))?;
            if !resp.ok() {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                return Err(IdentityError::Provider { status, message: provider_error_message(&body) });
            }
            resp.json::<User>().await.map_err(|e| IdentityError::Decode(e.to_string()))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = access_token;
            Err(IdentityError::Unavailable)
        }
    }

    #[cfg(feature = "csr")]
    async fn post(
        &self,
        url: &str,
        payload: Option<&serde_json::Value>,
        bearer: Option<&str>,
    ) -> Result<gloo_net::http::Response, IdentityError> {
        self.send(gloo_net::http::Request::post(url), payload, bearer).await
    }

    #[cfg(feature = "csr")]
    async fn send(
        &self,
        builder: gloo_net::http::RequestBuilder,
        payload: Option<&serde_json::Value>,
        bearer: Option<&str>,
    ) -> Result<gloo_net::http::Response, IdentityError> {
        let mut builder = builder.header("apikey", &self.config.anon_key);
        if let Some(token) = bearer {
            builder = builder.header("Authorization", &format!("Bearer {token}"));
        }
        let sent = match payload {
            Some(payload) => {
                builder
                    .json(payload)
                    .map_err(|e| IdentityError::Transport(e.to_string()))?
                    .send()
                    .await
            }
            None => builder.send().await,
        };
        let resp = sent.map_err(|e| IdentityError::Transport(e.to_string()))?;
        if !resp.ok() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(IdentityError::Provider { status, message: provider_error_message(&body) });
        }
        Ok(resp)
    }
}

impl AuthProvider for IdentityClient {
    fn sign_out(&self) -> impl Future<Output = Result<(), IdentityError>> {
        IdentityClient::sign_out(self)
    }
}

/// Sign out through `provider`, then reload the page.
///
/// The reload happens whatever the provider answers; the fresh page load
/// finds no stored session and lands on the logged-out view.
pub async fn sign_out_and_reload<P, R>(provider: &P, reload: R)
where
    P: AuthProvider,
    R: FnOnce(),
{
    if let Err(e) = provider.sign_out().await {
        log::warn!("sign-out failed: {e}");
    }
    reload();
}

// =============================================================================
// ENDPOINTS
// =============================================================================

fn with_redirect(url: String, redirect_to: Option<&str>) -> String {
    match redirect_to {
        Some(target) => {
            let encoded: String = form_urlencoded::byte_serialize(target.as_bytes()).collect();
            format!("{url}?redirect_to={encoded}")
        }
        None => url,
    }
}

pub(crate) fn token_endpoint(base: &str) -> String {
    format!("{base}/auth/v1/token?grant_type=password")
}

pub(crate) fn signup_endpoint(base: &str, redirect_to: Option<&str>) -> String {
    with_redirect(format!("{base}/auth/v1/signup"), redirect_to)
}

pub(crate) fn otp_endpoint(base: &str, redirect_to: Option<&str>) -> String {
    with_redirect(format!("{base}/auth/v1/otp"), redirect_to)
}

pub(crate) fn recover_endpoint(base: &str, redirect_to: Option<&str>) -> String {
    with_redirect(format!("{base}/auth/v1/recover"), redirect_to)
}

pub(crate) fn logout_endpoint(base: &str) -> String {
    format!("{base}/auth/v1/logout")
}

pub(crate) fn user_endpoint(base: &str) -> String {
    format!("{base}/auth/v1/user")
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

/// Pull a human-readable message out of a provider error body.
pub(crate) fn provider_error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let field = parsed.as_ref().and_then(|value| {
        ["error_description", "msg", "message", "error"]
            .iter()
            .find_map(|key| value.get(*key).and_then(serde_json::Value::as_str))
    });
    match field {
        Some(message) => message.to_owned(),
        None if body.trim().is_empty() => "request failed".to_owned(),
        None => body.trim().to_owned(),
    }
}

/// Interpret a sign-up response: a body with `access_token` is a session,
/// anything else means a confirmation email went out.
pub(crate) fn parse_sign_up(body: serde_json::Value) -> Result<SignUpOutcome, IdentityError> {
    if body.get("access_token").is_some() {
        let session = serde_json::from_value(body).map_err(|e| IdentityError::Decode(e.to_string()))?;
        Ok(SignUpOutcome::SignedIn(session))
    } else {
        Ok(SignUpOutcome::ConfirmationSent)
    }
}

/// Tokens delivered in the URL fragment after a provider redirect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FragmentSession {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: Option<u64>,
    pub expires_at: Option<i64>,
    pub refresh_token: Option<String>,
    /// Redirect kind from the `type` parameter (`magiclink`, `signup`,
    /// `recovery`, ...).
    pub kind: Option<String>,
}

impl FragmentSession {
    /// Event announced once the redirect session is restored.
    pub(crate) fn event(&self) -> AuthChangeEvent {
        match self.kind.as_deref() {
            Some("recovery") => AuthChangeEvent::PasswordRecovery,
            _ => AuthChangeEvent::SignedIn,
        }
    }

    pub(crate) fn into_session(self, user: User) -> Session {
        Session {
            access_token: self.access_token,
            token_type: self.token_type,
            expires_in: self.expires_in,
            expires_at: self.expires_at,
            refresh_token: self.refresh_token,
            user,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FragmentOutcome {
    Empty,
    Session(FragmentSession),
    Error(String),
}

/// Parse a `#access_token=...&refresh_token=...` style fragment.
pub(crate) fn parse_fragment(hash: &str) -> FragmentOutcome {
    let raw = hash.strip_prefix('#').unwrap_or(hash);
    let mut access_token = None;
    let mut token_type = None;
    let mut expires_in = None;
    let mut expires_at = None;
    let mut refresh_token = None;
    let mut kind = None;
    let mut error = None;
    let mut error_description = None;

    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        match key.as_ref() {
            "access_token" => access_token = Some(value.into_owned()),
            "token_type" => token_type = Some(value.into_owned()),
            "expires_in" => expires_in = value.parse().ok(),
            "expires_at" => expires_at = value.parse().ok(),
            "refresh_token" => refresh_token = Some(value.into_owned()),
            "type" => kind = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "error_description" => error_description = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(description) = error_description.or(error) {
        return FragmentOutcome::Error(description);
    }
    match access_token.filter(|t| !t.is_empty()) {
        Some(access_token) => FragmentOutcome::Session(FragmentSession {
            access_token,
            token_type: token_type.unwrap_or_else(|| "bearer".to_owned()),
            expires_in,
            expires_at,
            refresh_token,
            kind,
        }),
        None => FragmentOutcome::Empty,
    }
}

// =============================================================================
// STARTUP
// =============================================================================

/// What [`IdentityClient::initialize`] does with the page it starts on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Startup {
    /// Restore the redirect session; the stored session is the fallback if
    /// the user lookup fails.
    Redirect(FragmentSession, Option<Session>),
    /// Announce without any provider call.
    Announce(AuthChangeEvent, Option<Session>),
}

/// Choose between a redirect fragment and the stored session.
pub(crate) fn startup_event(fragment: Option<FragmentOutcome>, stored: Option<Session>) -> Startup {
    match fragment {
        Some(FragmentOutcome::Session(fragment)) => Startup::Redirect(fragment, stored),
        Some(FragmentOutcome::Error(_) | FragmentOutcome::Empty) | None => {
            let (event, session) = stored_event(stored);
            Startup::Announce(event, session)
        }
    }
}

pub(crate) fn stored_event(stored: Option<Session>) -> (AuthChangeEvent, Option<Session>) {
    match stored {
        Some(session) => (AuthChangeEvent::SignedIn, Some(session)),
        None => (AuthChangeEvent::InitialSession, None),
    }
}
