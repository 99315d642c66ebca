// src/core/net.rs
//
// Blocking HTTPS GET returning the response body. One request at a time; callers
// pace themselves.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use crate::config::consts::{API_KEY_HEADER, REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::source::SourceError;

pub fn build_client(api_key: &str) -> Result<Client, SourceError> {
    let mut headers = HeaderMap::new();
    let key = HeaderValue::from_str(api_key)
        .map_err(|_| SourceError::Transport(s!("API key is not a valid header value")))?;
    let name = HeaderName::from_bytes(API_KEY_HEADER.as_bytes())
        .map_err(|e| SourceError::Transport(e.to_string()))?;
    headers.insert(name, key);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| SourceError::Transport(e.to_string()))
}

/// GET `url?params` and return the body text.
/// Non-2xx responses carry the body text for the log.
pub fn get_body(
    client: &Client,
    url: &str,
    params: &[(&str, String)],
) -> Result<String, SourceError> {
    let resp = client
        .get(url)
        .query(params)
        .send()
        .map_err(SourceError::from_reqwest)?;

    let status = resp.status();
    let body = resp.text().map_err(SourceError::from_reqwest)?;
    if !status.is_success() {
        return Err(SourceError::HttpStatus { status: status.as_u16(), body: clip(&body, 200) });
    }
    Ok(body)
}

fn clip(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((i, _)) => join!(&s[..i], "…"),
        None => s.to_string(),
    }
}
