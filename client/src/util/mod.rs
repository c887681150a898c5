//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from page and state
//! logic so the latter stay testable off-browser.

pub mod auth;
pub mod browser;
pub mod storage;
