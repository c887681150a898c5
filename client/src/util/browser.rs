//! Window location helpers: reload, redirect target, URL fragment access.

/// Perform a full page reload.
pub fn reload() {
    #[cfg(feature = "csr")]
    {
        if let Some(window) = web_sys::window() {
            if window.location().reload().is_err() {
                log::warn!("page reload failed");
            }
        }
    }
}

/// The app's root URL (`<origin>/`), used as the provider's `redirect_to`.
pub fn app_root_url() -> Option<String> {
    #[cfg(feature = "csr")]
    {
        let origin = web_sys::window()?.location().origin().ok()?;
        Some(format!("{origin}/"))
    }
    #[cfg(not(feature = "csr"))]
    {
        None
    }
}

/// Current URL fragment including the leading `#`, if non-empty.
pub fn location_hash() -> Option<String> {
    #[cfg(feature = "csr")]
    {
        let hash = web_sys::window()?.location().hash().ok()?;
        (!hash.is_empty()).then_some(hash)
    }
    #[cfg(not(feature = "csr"))]
    {
        None
    }
}

/// Drop the URL fragment without adding a history entry, so tokens from a
/// provider redirect do not linger in the address bar.
pub fn clear_location_hash() {
    #[cfg(feature = "csr")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        let location = window.location();
        let (Ok(path), Ok(search)) = (location.pathname(), location.search()) else {
            return;
        };
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&format!("{path}{search}")));
        }
    }
}
