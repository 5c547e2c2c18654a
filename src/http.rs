use std::thread;
use std::time::Duration;

use reqwest::header::{CONTENT_LENGTH, HeaderMap};

/// Retries after the first attempt when the received body length does not
/// match the declared Content-Length.
const MAX_LENGTH_RETRIES: u32 = 5;

pub fn http_client() -> anyhow::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent(format!("newshauler/{}", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {}", e))
}

/// GET a URL and verify the body against the declared Content-Length,
/// repeating the whole request on mismatch. After the retry budget is spent
/// the last-fetched bytes are returned as-is; a short body is the caller's
/// problem, a transport error is not swallowed.
pub fn fetch_checked(client: &reqwest::blocking::Client, url: &str) -> anyhow::Result<Vec<u8>> {
    let mut attempt = 0;
    loop {
        let response = client.get(url).send()?;
        let declared = declared_length(response.headers());
        let body = response.bytes()?;
        if body.len() as u64 == declared || attempt >= MAX_LENGTH_RETRIES {
            return Ok(body.to_vec());
        }
        attempt += 1;
        thread::sleep(backoff_delay(attempt));
    }
}

/// Declared Content-Length, 0 when the header is absent or unparseable.
fn declared_length(headers: &HeaderMap) -> u64 {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

fn backoff_delay(attempt: u32) -> Duration {
    let millis = 100u64.checked_shl(attempt - 1).unwrap_or(u64::MAX);
    Duration::from_millis(millis.min(2_000))
}
