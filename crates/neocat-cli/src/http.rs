//! Real NeoWs transport. Credentials and URL construction live here, never
//! in the core.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use neocat_core::{PageResponse, PageSource, TransportError};

/// Paginated browse client over reqwest.
#[derive(Debug, Clone)]
pub struct NeoWsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl NeoWsClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("neocat/0.1.0")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout,
        }
    }

    fn page_url(&self, cursor: u32) -> String {
        format!(
            "{}?api_key={}&page={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            cursor
        )
    }
}

impl PageSource for NeoWsClient {
    fn fetch_page<'a>(
        &'a self,
        cursor: u32,
    ) -> Pin<Box<dyn Future<Output = Result<PageResponse, TransportError>> + Send + 'a>> {
        Box::pin(async move {
            let response = self
                .client
                .get(self.page_url(cursor))
                .timeout(self.timeout)
                .send()
                .await
                .map_err(|err| {
                    if err.is_timeout() {
                        TransportError::new(format!("request timeout: {err}"))
                    } else if err.is_connect() {
                        TransportError::new(format!("connection failed: {err}"))
                    } else {
                        TransportError::new(format!("request failed: {err}"))
                    }
                })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|err| TransportError::new(format!("failed to read response body: {err}")))?;

            Ok(PageResponse { status, body })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_carries_the_cursor_and_encoded_key() {
        let client = NeoWsClient::new(
            "https://api.nasa.gov/neo/rest/v1/neo/browse",
            "key with spaces",
            Duration::from_secs(30),
        );

        assert_eq!(
            client.page_url(7),
            "https://api.nasa.gov/neo/rest/v1/neo/browse?api_key=key%20with%20spaces&page=7"
        );
    }
}
