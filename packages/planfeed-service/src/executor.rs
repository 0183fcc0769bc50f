use std::{collections::HashMap, sync::Arc};

use serde_json::Value;

use planfeed_engine::SearchEngine;

use crate::{
	Error, Result,
	bucket::DayBucket,
	dates,
	hooks::{self, FetchHooks},
	item::{Collection, EventItem, Item, PlanningItem},
	query::{
		EVENTS_HITS_AGG, HISTOGRAM_AGG, PLANNING_HITS_AGG, PLANNING_NESTED_AGG,
		PLANNING_PARENT_AGG,
	},
};

/// Maps collection names to engine indices, defaulting to a shared index.
#[derive(Debug, Clone)]
pub struct IndexResolver {
	default_index: String,
	indexes: HashMap<String, String>,
}
impl IndexResolver {
	pub fn new(default_index: impl Into<String>, indexes: HashMap<String, String>) -> Self {
		Self { default_index: default_index.into(), indexes }
	}

	pub fn from_config(cfg: &planfeed_config::Elastic) -> Self {
		Self::new(cfg.index.clone(), cfg.indexes.clone())
	}

	pub fn resolve(&self, collection: Collection) -> &str {
		self.indexes.get(collection.as_str()).map(String::as_str).unwrap_or(&self.default_index)
	}
}

/// Runs day-bucketed queries and turns their histogram buckets into [`DayBucket`]s.
#[derive(Clone)]
pub struct BucketExecutor {
	engine: Arc<dyn SearchEngine>,
	indexes: IndexResolver,
	hooks: FetchHooks,
}
impl BucketExecutor {
	pub fn new(engine: Arc<dyn SearchEngine>, indexes: IndexResolver, hooks: FetchHooks) -> Self {
		Self { engine, indexes, hooks }
	}

	pub async fn events_by_day(&self, query: &Value) -> Result<Vec<DayBucket>> {
		let response = self.execute(Collection::Events, query).await?;
		let Some(histogram) = response.get("aggregations").and_then(|aggs| aggs.get(HISTOGRAM_AGG))
		else {
			return Ok(missing_aggregation(Collection::Events));
		};
		let mut days = Vec::new();

		for raw in buckets(histogram) {
			let key = bucket_key(raw)?;
			let items = hits(raw.get(EVENTS_HITS_AGG))
				.iter()
				.map(|hit| EventItem::from_hit(hit).map(Item::Event))
				.collect::<Result<Vec<_>>>()?;
			let mut bucket = DayBucket { id: key.to_string(), total: doc_count(raw), items };

			self.hooks.fetched(Collection::Events, &mut bucket);

			for item in bucket.items.iter_mut() {
				hooks::decorate_links(item);
			}

			days.push(bucket);
		}

		tracing::info!(collection = %Collection::Events, days = days.len(), "Fetched day buckets.");

		Ok(days)
	}

	pub async fn planning_by_day(&self, query: &Value) -> Result<Vec<DayBucket>> {
		let response = self.execute(Collection::Planning, query).await?;
		let Some(histogram) = response
			.get("aggregations")
			.and_then(|aggs| aggs.get(PLANNING_NESTED_AGG))
			.and_then(|nested| nested.get(HISTOGRAM_AGG))
		else {
			return Ok(missing_aggregation(Collection::Planning));
		};
		let mut days = Vec::new();

		for raw in buckets(histogram) {
			let key = bucket_key(raw)?;
			let day = dates::parse_day(key)?;
			let parent =
				raw.get(PLANNING_PARENT_AGG).and_then(|parent| parent.get(PLANNING_HITS_AGG));
			let mut items = hits(parent)
				.iter()
				.map(|hit| PlanningItem::from_hit(hit, day).map(Item::Planning))
				.collect::<Result<Vec<_>>>()?;

			for item in items.iter_mut() {
				hooks::decorate_links(item);
			}

			let mut bucket = DayBucket { id: key.to_string(), total: doc_count(raw), items };

			self.hooks.fetched(Collection::Planning, &mut bucket);

			days.push(bucket);
		}

		tracing::info!(
			collection = %Collection::Planning,
			days = days.len(),
			"Fetched day buckets."
		);

		Ok(days)
	}

	async fn execute(&self, collection: Collection, query: &Value) -> Result<Value> {
		let index = self.indexes.resolve(collection);

		tracing::debug!(%collection, index, %query, "Running day-bucketed query.");

		self.engine.search(index, query).await.map_err(|err| {
			tracing::warn!(%collection, index, error = %err, "Search engine query failed.");

			Error::from(err)
		})
	}
}

fn missing_aggregation(collection: Collection) -> Vec<DayBucket> {
	tracing::warn!(%collection, "Search response carries no day histogram.");

	Vec::new()
}

fn buckets(histogram: &Value) -> &[Value] {
	histogram.get("buckets").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default()
}

fn bucket_key(raw: &Value) -> Result<&str> {
	raw.get("key_as_string").and_then(Value::as_str).ok_or_else(|| Error::InvalidResponse {
		message: "Histogram bucket is missing key_as_string.".to_string(),
	})
}

fn doc_count(raw: &Value) -> u64 {
	raw.get("doc_count").and_then(Value::as_u64).unwrap_or_default()
}

fn hits(top_hits: Option<&Value>) -> &[Value] {
	top_hits
		.and_then(|top| top.get("hits"))
		.and_then(|hits| hits.get("hits"))
		.and_then(Value::as_array)
		.map(Vec::as_slice)
		.unwrap_or_default()
}
