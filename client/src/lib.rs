//! # client
//!
//! Leptos + WASM single-page front-end for the secret portal.
//!
//! Authentication is delegated to a hosted identity provider. The app binds
//! the provider's auth-state notifications to a two-state view (logged out /
//! logged in) and, once logged in, makes one authenticated request to the
//! backend `/secret` endpoint.
//!
//! Browser-only code is gated behind the `csr` feature; everything else
//! compiles natively so it can be unit-tested without a browser.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;
