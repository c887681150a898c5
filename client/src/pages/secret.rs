//! Logged-in view: shows the backend's secret payload and a sign-out button.
//!
//! SYSTEM CONTEXT
//! ==============
//! The secret request fires once per mount with the token currently in
//! storage. Sign-out goes through the identity provider and then reloads
//! the page instead of clearing UI state by hand.

use leptos::prelude::*;

use crate::config::AppConfig;
use crate::net::api::{SecretRequest, render_secret};
#[cfg(feature = "csr")]
use crate::net::identity::{IdentityClient, sign_out_and_reload};

#[component]
pub fn SecretPage() -> impl IntoView {
    let config = expect_context::<AppConfig>();
    #[cfg(feature = "csr")]
    let identity = expect_context::<IdentityClient>();

    let secret = RwSignal::new(None::<serde_json::Value>);
    let signing_out = RwSignal::new(false);

    let request = SecretRequest::from_storage(&config);
    if request.authorization.is_none() {
        log::warn!("no stored access token; calling {} without Authorization", request.url);
    }
    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        match request.send().await {
            Ok(data) => secret.set(Some(data)),
            Err(e) => log::warn!("{e}"),
        }
    });
    #[cfg(not(feature = "csr"))]
    let _ = request;

    let on_sign_out = move |_| {
        if signing_out.get() {
            return;
        }
        signing_out.set(true);
        #[cfg(feature = "csr")]
        {
            let identity = identity.clone();
            leptos::task::spawn_local(async move {
                sign_out_and_reload(&identity, crate::util::browser::reload).await;
            });
        }
    };

    view! {
        <section class="secret">
            <div class="secret__data">{move || render_secret(secret.get().as_ref())}</div>
            <button class="button" on:click=on_sign_out disabled=move || signing_out.get()>
                "Sign out"
            </button>
        </section>
    }
}
