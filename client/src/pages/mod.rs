//! Page modules for the two top-level views.
//!
//! ARCHITECTURE
//! ============
//! `login` is rendered while no user is bound, `secret` once a `SIGNED_IN`
//! notification has arrived. The root component chooses between them.

pub mod login;
pub mod secret;
