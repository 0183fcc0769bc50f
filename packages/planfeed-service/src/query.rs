use serde_json::{Value, json};

use crate::{
	Result,
	filter::{self, DateWindow},
	request::SearchRequest,
};

pub const EVENTS_DATE_FIELD: &str = "dates.start";
pub const EVENTS_END_FIELD: &str = "dates.end";
pub const PLANNING_SCHEDULE_PATH: &str = "_planning_schedule";
pub const PLANNING_SCHEDULE_FIELD: &str = "_planning_schedule.scheduled";
pub const COVERAGES_PATH: &str = "coverages";
pub const SLUGLINE_FIELD: &str = "slugline";
pub const COVERAGE_SLUGLINE_FIELD: &str = "coverages.slugline";
pub const EVENT_ITEM_FIELD: &str = "event_item";

/// Aggregation names shared by the builders and the bucket extraction.
pub const HISTOGRAM_AGG: &str = "date_histogram";
pub const EVENTS_HITS_AGG: &str = "by_date";
pub const PLANNING_NESTED_AGG: &str = "planning_date";
pub const PLANNING_PARENT_AGG: &str = "by_date";
pub const PLANNING_HITS_AGG: &str = "plannings";

const HISTOGRAM_KEY_FORMAT: &str = "yyyy-MM-dd";

/// Per-request inputs that do not come from the query string.
#[derive(Debug, Clone, Copy)]
pub struct QueryContext<'a> {
	pub window: &'a DateWindow,
	pub filter_fields: &'a [String],
	pub max_hits_per_day: u32,
}

/// Aggregation-only query bucketing events by the day of `dates.start`.
pub fn events_query(req: &SearchRequest, ctx: &QueryContext<'_>) -> Result<Value> {
	let mut must = vec![filter::date_range_filter(EVENTS_DATE_FIELD, ctx.window)?];

	must.extend(term_filters(req, ctx));

	if let Some(slugline) = req.slugline() {
		must.push(slugline_query(SLUGLINE_FIELD, slugline));
	}

	let sort = json!([
		{ EVENTS_DATE_FIELD: { "order": "asc" } },
		{ EVENTS_END_FIELD: { "order": "asc" } }
	]);

	Ok(json!({
		"size": 0,
		"query": { "bool": { "must": must } },
		"aggs": {
			HISTOGRAM_AGG: {
				"date_histogram": day_histogram(EVENTS_DATE_FIELD),
				"aggs": { EVENTS_HITS_AGG: top_hits(ctx.max_hits_per_day, sort) }
			}
		}
	}))
}

/// Aggregation-only query bucketing planning items by the days of their scheduled coverages.
///
/// Items linked to an event are excluded; they surface through the event instead.
pub fn planning_query(req: &SearchRequest, ctx: &QueryContext<'_>) -> Result<Value> {
	let mut must = vec![nested(
		PLANNING_SCHEDULE_PATH,
		filter::date_range_filter(PLANNING_SCHEDULE_FIELD, ctx.window)?,
	)];

	must.extend(term_filters(req, ctx));

	let must_not = vec![json!({
		"constant_score": { "filter": { "exists": { "field": EVENT_ITEM_FIELD } } }
	})];
	let mut bool_query = json!({ "must": must, "must_not": must_not });

	if let Some(slugline) = req.slugline() {
		bool_query["should"] = json!([
			slugline_query(SLUGLINE_FIELD, slugline),
			nested(COVERAGES_PATH, slugline_query(COVERAGE_SLUGLINE_FIELD, slugline)),
		]);
		bool_query["minimum_should_match"] = json!(1);
	}

	let parent_hits = json!({
		"reverse_nested": {},
		"aggs": {
			PLANNING_HITS_AGG: top_hits(
				ctx.max_hits_per_day,
				json!([{ PLANNING_SCHEDULE_FIELD: { "order": "asc" } }]),
			)
		}
	});
	let histogram = json!({
		"date_histogram": day_histogram(PLANNING_SCHEDULE_FIELD),
		"aggs": { PLANNING_PARENT_AGG: parent_hits }
	});

	Ok(json!({
		"size": 0,
		"query": { "bool": bool_query },
		"aggs": {
			PLANNING_NESTED_AGG: {
				"nested": { "path": PLANNING_SCHEDULE_PATH },
				"aggs": { HISTOGRAM_AGG: histogram }
			}
		}
	}))
}

fn term_filters(req: &SearchRequest, ctx: &QueryContext<'_>) -> Vec<Value> {
	ctx.filter_fields.iter().filter_map(|field| filter::term_filter(field, &req.args)).collect()
}

fn top_hits(size: u32, sort: Value) -> Value {
	json!({ "top_hits": { "sort": sort, "size": size } })
}

fn day_histogram(field: &str) -> Value {
	json!({ "field": field, "calendar_interval": "day", "format": HISTOGRAM_KEY_FORMAT })
}

fn slugline_query(field: &str, slugline: &str) -> Value {
	json!({
		"query_string": {
			"query": slugline,
			"fields": [field],
			"default_operator": "AND"
		}
	})
}

fn nested(path: &str, query: Value) -> Value {
	json!({ "nested": { "path": path, "query": { "bool": { "must": [query] } } } })
}
