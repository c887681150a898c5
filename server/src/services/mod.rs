//! Domain services behind the HTTP routes.

pub mod token;
