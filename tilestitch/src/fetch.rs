//! The tile retrieval collaborator.
//!
//! The pipeline only needs `fetch(url) -> bytes | failure`; an empty body is
//! the valid "missing tile" result, not an error. The HTTP implementation
//! maps 404/204 responses to that empty body and treats every other
//! non-success status as a failure. There are no per-tile retries: a flaky
//! transport is wrapped by the caller, not papered over here.

use anyhow::{Result, bail};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Retrieves tile resources by URL.
#[async_trait]
pub trait TileFetcher: Send + Sync {
	/// Retrieves a resource. A zero-length body means "missing tile".
	async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// A [`TileFetcher`] backed by a shared `reqwest` client.
pub struct HttpFetcher {
	client: Client,
}

impl HttpFetcher {
	pub fn new() -> Result<HttpFetcher> {
		let client = Client::builder()
			.tcp_keepalive(Duration::from_secs(600))
			.user_agent(concat!("tilestitch/", env!("CARGO_PKG_VERSION")))
			.build()?;
		Ok(HttpFetcher { client })
	}
}

#[async_trait]
impl TileFetcher for HttpFetcher {
	async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
		let response = self.client.get(url).send().await?;
		match response.status() {
			StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => Ok(Vec::new()),
			status if status.is_success() => Ok(response.bytes().await?.to_vec()),
			status => bail!("HTTP request failed with status {status}"),
		}
	}
}
