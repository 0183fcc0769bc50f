pub mod bucket;
pub mod dates;
pub mod executor;
pub mod filter;
pub mod hooks;
pub mod item;
pub mod merge;
pub mod query;
pub mod request;

mod error;

pub use bucket::DayBucket;
pub use error::{Error, Result};
pub use executor::{BucketExecutor, IndexResolver};
pub use filter::DateWindow;
pub use hooks::{FetchHooks, FetchObserver};
pub use item::{Collection, EventItem, Item, PlanningItem};
pub use request::SearchRequest;

use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;

use planfeed_config::{Config, DefaultTimezone};
use planfeed_engine::{ElasticClient, SearchEngine};

use crate::query::QueryContext;

/// Day entries in the list-cursor envelope.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
	#[serde(rename = "_items")]
	pub items: Vec<DayBucket>,
	#[serde(rename = "_meta")]
	pub meta: SearchMeta,
}
impl SearchResponse {
	pub fn new(items: Vec<DayBucket>) -> Self {
		let total = items.len() as u64;

		Self { items, meta: SearchMeta { total } }
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchMeta {
	pub total: u64,
}

pub struct PlanningSearchService {
	pub cfg: Config,
	default_timezone: DefaultTimezone,
	executor: BucketExecutor,
}
impl PlanningSearchService {
	pub fn new(cfg: Config) -> Result<Self> {
		let engine = ElasticClient::new(&cfg.elastic)?;

		Self::with_engine(cfg, Arc::new(engine), FetchHooks::default())
	}

	pub fn with_engine(
		cfg: Config,
		engine: Arc<dyn SearchEngine>,
		hooks: FetchHooks,
	) -> Result<Self> {
		let default_timezone =
			cfg.search.default_timezone.parse::<DefaultTimezone>().map_err(|reason| {
				Error::Config { message: format!("search.default_timezone {reason}.") }
			})?;
		let executor = BucketExecutor::new(engine, IndexResolver::from_config(&cfg.elastic), hooks);

		Ok(Self { cfg, default_timezone, executor })
	}

	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		self.search_at(req, OffsetDateTime::now_utc()).await
	}

	/// Runs the search with `now` standing in for the clock when the request has no `from`.
	pub async fn search_at(
		&self,
		req: SearchRequest,
		now: OffsetDateTime,
	) -> Result<SearchResponse> {
		let window = self.window(&req, now)?;
		let ctx = QueryContext {
			window: &window,
			filter_fields: &self.cfg.search.filter_fields,
			max_hits_per_day: self.cfg.search.max_hits_per_day,
		};
		let events_query = query::events_query(&req, &ctx)?;
		let planning_query = query::planning_query(&req, &ctx)?;
		let (events, planning) = tokio::try_join!(
			self.executor.events_by_day(&events_query),
			self.executor.planning_by_day(&planning_query)
		)?;
		let days = merge::merge(events, planning);

		tracing::info!(
			from = %window.from,
			to = %window.to,
			time_zone = %window.time_zone,
			days = days.len(),
			"Merged events and planning by day."
		);

		Ok(SearchResponse::new(days))
	}

	pub fn window(&self, req: &SearchRequest, now: OffsetDateTime) -> Result<DateWindow> {
		Ok(DateWindow::resolve(
			req.from_bound()?,
			req.to_bound()?,
			req.timezone(),
			now,
			self.cfg.search.window_days,
			self.default_timezone,
		))
	}
}
