pub mod elastic;

mod error;

pub use elastic::ElasticClient;
pub use error::{Error, Result};

use std::{future::Future, pin::Pin};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Executes a structured query body against one index and returns the raw response document.
pub trait SearchEngine
where
	Self: Send + Sync,
{
	fn search<'a>(&'a self, index: &'a str, body: &'a Value) -> BoxFuture<'a, Result<Value>>;
}

pub fn default_headers(api_key: Option<&str>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

	if let Some(key) = api_key {
		headers.insert(AUTHORIZATION, format!("ApiKey {key}").parse()?);
	}

	Ok(headers)
}
