//! Start-up configuration: the query string and the optional named-layout
//! fetch.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Window;

/// Value of `key` in a `?a=b&c=d` search string, percent-decoded.
pub fn query_param(search: &str, key: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| {
            percent_encoding::percent_decode_str(v)
                .decode_utf8()
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| v.to_string())
        })
}

/// Fetch `layouts/<name>.json` as text. The host page may prefix assets via
/// `window.__BASE_URL`; root-relative and relative paths serve as fallbacks.
pub async fn fetch_layout_json(window: &Window, name: &str) -> Option<String> {
    let rel = format!("layouts/{name}.json");
    let based = format!("{}{rel}", base_url());
    let rooted = format!("/{rel}");
    for url in [based.as_str(), rooted.as_str(), rel.as_str()] {
        if let Some(text) = fetch_text(window, url).await {
            return Some(text);
        }
    }
    None
}

async fn fetch_text(window: &Window, url: &str) -> Option<String> {
    let resp = JsFuture::from(window.fetch_with_str(url)).await.ok()?;
    let resp: web_sys::Response = resp.dyn_into().ok()?;
    if !resp.ok() {
        return None;
    }
    let text = JsFuture::from(resp.text().ok()?).await.ok()?;
    text.as_string()
}

fn base_url() -> String {
    let base = web_sys::window()
        .and_then(|w| js_sys::Reflect::get(&w, &JsValue::from_str("__BASE_URL")).ok())
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| "/".to_string());
    if base.ends_with('/') {
        base
    } else {
        format!("{base}/")
    }
}
