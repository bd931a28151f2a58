use trace_engine::{build_catalog, Catalog, LetterKey, LoadError, SourceError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, Window};

fn describe(err: JsValue) -> SourceError {
    SourceError::Other(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

async fn read_text(pending: js_sys::Promise) -> Result<String, SourceError> {
    let resp: Response = JsFuture::from(pending).await.map_err(describe)?.dyn_into().map_err(describe)?;
    if resp.status() == 404 {
        return Err(SourceError::NotFound);
    }
    if !resp.ok() {
        return Err(SourceError::Other(format!("HTTP {}", resp.status())));
    }
    let text = JsFuture::from(resp.text().map_err(describe)?).await.map_err(describe)?;
    text.as_string()
        .ok_or_else(|| SourceError::Other("response body is not text".to_string()))
}

/// Fetch `<base_url>/<KEY>.json` for every key and build the catalog.
///
/// All requests are issued before any is awaited so they run concurrently.
pub async fn fetch_catalog(window: &Window, base_url: &str, keys: &[LetterKey]) -> Result<Catalog, LoadError> {
    let base = base_url.trim_end_matches('/');
    let requests: Vec<(LetterKey, js_sys::Promise)> = keys
        .iter()
        .map(|&key| (key, window.fetch_with_str(&format!("{base}/{key}.json"))))
        .collect();

    let mut fetched = Vec::with_capacity(requests.len());
    for (key, pending) in requests {
        fetched.push((key, read_text(pending).await));
    }
    build_catalog(fetched)
}
