//! Gemini over the browser's `fetch`

use chronosnap_common::{GeminiClient, HttpRequest, HttpResponse, Transport};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// [`Transport`] backed by `window.fetch`
pub struct FetchTransport;

impl Transport for FetchTransport {
    async fn post_json(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&request.body));

        let fetch_request = Request::new_with_str_and_init(&request.url, &opts).map_err(js_error)?;
        fetch_request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_error)?;

        let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
        let resp_value = JsFuture::from(window.fetch_with_request(&fetch_request))
            .await
            .map_err(js_error)?;
        let resp: Response = resp_value.dyn_into().map_err(js_error)?;

        let status = resp.status();
        let body = JsFuture::from(resp.text().map_err(js_error)?)
            .await
            .map_err(js_error)?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}

/// Client for the key currently entered in settings
pub fn client(api_key: &str) -> Result<GeminiClient<FetchTransport>, String> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(MISSING_API_KEY.to_string());
    }
    Ok(GeminiClient::new(FetchTransport, api_key))
}

pub const MISSING_API_KEY: &str = "Enter your Gemini API key in Settings first.";

// fetch rejections are TypeErrors without the URL, so the key does not leak here
fn js_error(value: JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| "network request failed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key() {
        assert_eq!(client("").err().as_deref(), Some(MISSING_API_KEY));
        assert_eq!(client("   ").err().as_deref(), Some(MISSING_API_KEY));
    }

    #[test]
    fn test_client_with_key() {
        assert!(client(" key ").is_ok());
    }
}
