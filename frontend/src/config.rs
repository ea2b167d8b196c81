use web_sys::window;

pub const API_PREFIX: &str = "/api";

pub fn get_api_base_url() -> String {
    if let Some(window) = window() {
        if let Ok(host) = window.location().host() {
            // Same origin as the page, so the app works behind any domain.
            let protocol = window.location().protocol().unwrap_or_else(|_| "http:".to_string());
            return format!("{}//{}{}", protocol, host, API_PREFIX);
        }
    }

    // Default to 127.0.0.1 for development
    format!("http://127.0.0.1:3000{}", API_PREFIX)
}

pub fn get_asset_url(path: &str) -> String {
    if path.starts_with("http") {
        path.to_string()
    } else {
        format!("{}{}", get_api_base_url(), path)
    }
}
