//! Implements the `Source` trait by downloading the CSV over HTTP.

use crate::source::{Source, SourceId};
use crate::Result;
use anyhow::{bail, Context};
use tracing::{debug, trace};
use url::Url;

pub(super) struct HttpSource {
    id: SourceId,
    url: Url,
    client: reqwest::Client,
}

impl HttpSource {
    pub(super) fn new(url: Url) -> Self {
        Self {
            id: SourceId::Url(url.clone()),
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl Source for HttpSource {
    fn id(&self) -> &SourceId {
        &self.id
    }

    async fn fetch(&mut self) -> Result<Vec<u8>> {
        debug!("Fetching {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to send the request to {}", self.url))?;

        if !response.status().is_success() {
            let status = response.status();
            bail!("Fetching {} failed with status {status}", self.url);
        }

        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read the response body from {}", self.url))?;
        trace!("Received {} bytes", body.len());
        Ok(body.to_vec())
    }
}
