//! Networking modules for the identity provider and the protected backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `identity` talks to the hosted identity provider and fans out auth-state
//! notifications, `api` issues the authenticated backend request, and
//! `types` defines the provider's wire schema.

pub mod api;
pub mod identity;
pub mod types;
