use anyhow::{bail, Context, Result};
use reqwest::{redirect::Policy, Client};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Client for the collector that publishes the raw directory document.
#[derive(Clone)]
pub struct CollectorClient {
    http: Client,
    url: Url,
}

impl CollectorClient {
    pub fn new(url: Url, user_agent: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .redirect(Policy::limited(8))
            .timeout(timeout)
            .build()
            .context("building collector http client")?;

        Ok(Self { http, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetches and decodes the collector document, failing on transport
    /// errors, non-2xx statuses and bodies that are not JSON.
    pub async fn try_fetch(&self) -> Result<Value> {
        let res = self.http.get(self.url.clone()).send().await?;
        let status = res.status();
        if !status.is_success() {
            bail!("collector answered http status {}", status.as_u16());
        }
        let body = res.bytes().await.context("reading collector body")?;
        debug!(bytes = body.len(), "collector body received");
        serde_json::from_slice(&body).context("decoding collector body")
    }

    /// Like [`try_fetch`](Self::try_fetch), but any failure is logged and
    /// degrades to `null`, which collects into an empty directory.
    pub async fn fetch_document(&self) -> Value {
        match self.try_fetch().await {
            Ok(doc) => doc,
            Err(e) => {
                error!(error=?e, url=%self.url, "collector fetch failed");
                Value::Null
            }
        }
    }
}
