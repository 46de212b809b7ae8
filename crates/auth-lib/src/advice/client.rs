use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{event, instrument, Level};

/// Thin JSON-over-HTTP wrapper around `reqwest`
#[derive(Clone)]
pub struct Client {
    client: reqwest::Client,
}

impl Client {
    /// Build a client with default headers and an optional request timeout
    pub fn with_headers(headers: HeaderMap, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Client {
            client: builder.build()?,
        })
    }

    /// POST `request` as JSON and decode the JSON response body
    #[instrument(level = "debug", skip(self, request))]
    pub async fn post<U, S, T>(&self, url: U, request: &S) -> anyhow::Result<T>
    where
        U: reqwest::IntoUrl + std::fmt::Debug,
        S: Serialize + Sized,
        T: DeserializeOwned,
    {
        let response = self.client.post(url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Request failed with status: {} - {}",
                status,
                body
            ));
        }
        let text = response.text().await?;
        event!(Level::TRACE, response = %text);

        Ok(serde_json::from_str::<T>(&text)?)
    }
}
