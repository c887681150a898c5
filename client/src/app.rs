//! Root application component: session binding and view selection.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};

use crate::config::AppConfig;
use crate::net::identity::IdentityClient;
use crate::pages::{login::LoginPage, secret::SecretPage};
use crate::state::auth::{AuthState, ViewState};
use crate::util::auth::install_session_binder;

/// Root application component.
///
/// Provides the configuration and identity client as context, binds the
/// identity client's notifications to the auth state, and kicks off session
/// restoration.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = AppConfig::from_build_env();
    config.warn_if_incomplete();
    let identity = IdentityClient::new(config.provider.clone());

    let auth = RwSignal::new(AuthState::default());
    let subscription = install_session_binder(&identity, auth);
    on_cleanup(move || subscription.unsubscribe());
    // Re-render only when the view flips, not on every repeated SIGNED_IN.
    let view_state = Memo::new(move |_| auth.with(AuthState::view));

    provide_context(config);
    provide_context(identity.clone());

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        identity.initialize().await;
    });

    view! {
        <Title text="Secret Portal"/>
        <main class="app">
            {move || match view_state.get() {
                ViewState::LoggedIn => view! { <SecretPage/> }.into_any(),
                ViewState::LoggedOut => view! { <LoginPage/> }.into_any(),
            }}
        </main>
    }
}
