//! JSON GET helper used by the source fetchers

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::FetchError;
use crate::external::retry::{with_retry, RetryPolicy};

/// HTTP client plus the retry policy applied to every call
#[derive(Clone)]
pub struct UpstreamHttp {
    client: Client,
    retry: RetryPolicy,
}

impl UpstreamHttp {
    pub fn new(timeout: Duration, retry: RetryPolicy) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("tripcast/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, retry })
    }

    /// GET `url` and decode the JSON body.
    ///
    /// The request and the body read are retried together per the policy, so a
    /// connection dropped mid-body counts as a transport failure. A non-2xx
    /// status or an undecodable body fails immediately.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let (status, body) = with_retry(&self.retry, || async move {
            let response = self.client.get(url).query(query).send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        })
        .await?;

        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Join a configured base URL and a path without doubling slashes
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
