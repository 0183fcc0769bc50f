use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{BoxFuture, Error, Result, SearchEngine};

pub struct ElasticClient {
	client: Client,
	url: String,
}
impl ElasticClient {
	pub fn new(cfg: &planfeed_config::Elastic) -> Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(crate::default_headers(cfg.api_key.as_deref())?)
			.build()?;

		Ok(Self { client, url: cfg.url.trim_end_matches('/').to_string() })
	}

	pub fn search_url(&self, index: &str) -> String {
		format!("{}/{index}/_search", self.url)
	}

	async fn execute(&self, index: &str, body: &Value) -> Result<Value> {
		let url = self.search_url(index);

		tracing::debug!(%url, "Executing search request.");

		let res = self.client.post(url).json(body).send().await?;
		let status = res.status();

		if !status.is_success() {
			let body = res.text().await.unwrap_or_default();

			return Err(Error::Status { status: status.as_u16(), body });
		}

		let json: Value = res.json().await?;

		if !json.is_object() {
			return Err(Error::InvalidResponse {
				message: "Search response must be a JSON object.".to_string(),
			});
		}

		Ok(json)
	}
}

impl SearchEngine for ElasticClient {
	fn search<'a>(&'a self, index: &'a str, body: &'a Value) -> BoxFuture<'a, Result<Value>> {
		Box::pin(self.execute(index, body))
	}
}
