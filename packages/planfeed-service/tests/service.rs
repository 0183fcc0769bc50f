use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
	time::Duration,
};

use serde_json::{Value, json};
use time::macros::datetime;

use planfeed_config::{Config, Elastic, Search, Service};
use planfeed_service::{
	Collection, DayBucket, Error, FetchHooks, FetchObserver, Item, PlanningSearchService,
	SearchRequest,
};
use planfeed_testkit::{ScriptedEngine, events_response, hit, planning_response};

const EVENTS_INDEX: &str = "superdesk_events";
const PLANNING_INDEX: &str = "superdesk_planning";

fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		elastic: Elastic {
			url: "http://127.0.0.1:9200".to_string(),
			index: "superdesk".to_string(),
			timeout_ms: 1_000,
			api_key: None,
			indexes: HashMap::from([
				("events".to_string(), EVENTS_INDEX.to_string()),
				("planning".to_string(), PLANNING_INDEX.to_string()),
			]),
		},
		search: Search { default_timezone: "Europe/Prague".to_string(), ..Default::default() },
	}
}

fn service(engine: Arc<ScriptedEngine>) -> PlanningSearchService {
	PlanningSearchService::with_engine(test_config(), engine, FetchHooks::default())
		.expect("Failed to build service.")
}

fn event_hit(id: &str, start: &str) -> Value {
	hit(id, json!({ "name": id, "dates": { "start": start, "end": start } }))
}

fn planning_hit(id: &str, planning_date: &str, scheduled: &[&str]) -> Value {
	let coverages: Vec<Value> =
		scheduled.iter().map(|at| json!({ "planning": { "scheduled": at } })).collect();

	hit(id, json!({ "slugline": id, "_planning_date": planning_date, "coverages": coverages }))
}

fn ids(bucket: &DayBucket) -> Vec<&str> {
	bucket.items.iter().map(Item::id).collect()
}

#[derive(Default)]
struct RecordingObserver {
	buckets: Mutex<Vec<(Collection, String, u64)>>,
	items: Mutex<Vec<String>>,
}
impl FetchObserver for RecordingObserver {
	fn on_fetched_bucket(&self, collection: Collection, bucket: &mut DayBucket) {
		self.buckets.lock().unwrap_or_else(|err| err.into_inner()).push((
			collection,
			bucket.id.clone(),
			bucket.total,
		));
	}

	fn on_fetched_item(&self, _collection: Collection, item: &mut Item) {
		self.items.lock().unwrap_or_else(|err| err.into_inner()).push(item.id().to_string());
	}
}

#[tokio::test]
async fn merges_events_and_planning_per_day() {
	let engine = Arc::new(
		ScriptedEngine::new()
			.respond(
				EVENTS_INDEX,
				events_response(vec![("2024-01-02", vec![event_hit(
					"E1",
					"2024-01-02T09:00:00+0000",
				)])]),
			)
			.respond(
				PLANNING_INDEX,
				planning_response(vec![
					("2024-01-02", vec![planning_hit("P1", "2024-01-02T14:00:00+0000", &[
						"2024-01-02T14:00:00+0000",
						"2024-01-03T10:00:00+0000",
					])]),
					("2024-01-03", vec![planning_hit("P1", "2024-01-02T14:00:00+0000", &[
						"2024-01-02T14:00:00+0000",
						"2024-01-03T10:00:00+0000",
					])]),
				]),
			),
	);
	let response = service(engine.clone())
		.search(SearchRequest {
			from: Some("2024-01-01T00:00:00Z".to_string()),
			..Default::default()
		})
		.await
		.expect("Search failed.");

	assert_eq!(response.meta.total, 2);

	let first = &response.items[0];

	assert_eq!(first.id, "2024-01-02");
	assert_eq!(ids(first), vec!["E1", "P1"]);
	assert_eq!(first.total, 2);

	let second = &response.items[1];

	assert_eq!(second.id, "2024-01-03");
	assert_eq!(ids(second), vec!["P1"]);

	let body = serde_json::to_value(&response).expect("Response must serialize.");

	assert_eq!(body["_meta"]["total"], 2);
	assert_eq!(body["_items"][0]["items"][0]["_type"], "events");
	assert_eq!(body["_items"][0]["items"][0]["_links"]["self"]["href"], "events/E1");
	assert_eq!(body["_items"][0]["items"][1]["_links"]["self"]["href"], "planning/P1");
	assert_eq!(body["_items"][0]["items"][1]["day"], "2024-01-02T00:00:00Z");
	assert_eq!(body["_items"][1]["items"][0]["day"], "2024-01-03T00:00:00Z");
}

#[tokio::test]
async fn queries_target_mapped_indices_with_filters() {
	let engine = Arc::new(ScriptedEngine::new());
	let req = SearchRequest {
		from: Some("2024-01-02".to_string()),
		to: Some("2024-01-04".to_string()),
		timezone: Some("+05:00".to_string()),
		slugline: Some("flood".to_string()),
		..Default::default()
	}
	.with_arg("anpa_category", r#"["a","b"]"#)
	.with_arg("pubstatus", "usable")
	.with_arg("fulltext", "ignored");

	service(engine.clone()).search(req).await.expect("Search failed.");

	let queries = engine.queries();

	assert_eq!(queries.len(), 2);

	let events = engine.query_for(EVENTS_INDEX).expect("events index must be queried");
	let must = events["query"]["bool"]["must"].as_array().expect("must is a list");

	assert_eq!(
		must[0]["range"]["dates.start"],
		json!({ "gte": "2024-01-02", "lte": "2024-01-04", "time_zone": "+05:00" })
	);
	assert!(must.contains(&json!({ "terms": { "anpa_category": ["a", "b"] } })));
	assert!(must.contains(&json!({ "terms": { "pubstatus": ["usable"] } })));
	assert!(!events.to_string().contains("fulltext"));

	let planning = engine.query_for(PLANNING_INDEX).expect("planning index must be queried");

	assert_eq!(
		planning["query"]["bool"]["must_not"][0]["constant_score"]["filter"]["exists"]["field"],
		"event_item"
	);
	assert_eq!(planning["query"]["bool"]["should"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn window_defaults_to_a_week_from_now() {
	let engine = Arc::new(ScriptedEngine::new());
	let now = datetime!(2024-07-10 22:30 UTC);

	service(engine.clone())
		.search_at(SearchRequest::default(), now)
		.await
		.expect("Search failed.");

	let events = engine.query_for(EVENTS_INDEX).expect("events index must be queried");

	assert_eq!(
		events["query"]["bool"]["must"][0]["range"]["dates.start"],
		json!({ "gte": "2024-07-10", "lte": "2024-07-17", "time_zone": "+02:00" })
	);
}

#[tokio::test]
async fn fixed_offset_default_timezone_is_sent_as_is() {
	let engine = Arc::new(ScriptedEngine::new());
	let mut cfg = test_config();

	cfg.search.default_timezone = "+02:00".to_string();

	let service = PlanningSearchService::with_engine(cfg, engine.clone(), FetchHooks::default())
		.expect("Fixed offset must be accepted.");

	service
		.search_at(SearchRequest::default(), datetime!(2024-01-10 22:30 UTC))
		.await
		.expect("Search failed.");

	let planning = engine.query_for(PLANNING_INDEX).expect("planning index must be queried");

	assert_eq!(
		planning["query"]["bool"]["must"][0]["nested"]["query"]["bool"]["must"][0]["range"]
			["_planning_schedule.scheduled"]["time_zone"],
		"+02:00"
	);
}

#[tokio::test]
async fn missing_aggregations_yield_empty_feed() {
	let engine = Arc::new(
		ScriptedEngine::new()
			.respond(EVENTS_INDEX, json!({ "hits": { "total": 0, "hits": [] } }))
			.respond(PLANNING_INDEX, json!({ "aggregations": {} })),
	);
	let response =
		service(engine).search(SearchRequest::default()).await.expect("Search failed.");

	assert!(response.items.is_empty());
	assert_eq!(response.meta.total, 0);
}

#[tokio::test]
async fn planning_only_day_has_no_event_items() {
	let engine = Arc::new(
		ScriptedEngine::new()
			.respond(
				EVENTS_INDEX,
				events_response(vec![("2024-01-02", vec![event_hit(
					"E1",
					"2024-01-02T09:00:00+0000",
				)])]),
			)
			.respond(
				PLANNING_INDEX,
				planning_response(vec![("2024-01-05", vec![
					planning_hit("P2", "2024-01-05T12:00:00+0000", &[]),
					planning_hit("P1", "2024-01-05T08:00:00+0000", &[]),
				])]),
			),
	);
	let response =
		service(engine).search(SearchRequest::default()).await.expect("Search failed.");
	let day = response.items.iter().find(|day| day.id == "2024-01-05").expect("planning day");

	assert_eq!(ids(day), vec!["P1", "P2"]);
	assert!(day.items.iter().all(|item| item.collection() == Collection::Planning));
}

#[tokio::test]
async fn engine_failure_aborts_the_request() {
	let engine = Arc::new(
		ScriptedEngine::new().hang(EVENTS_INDEX).fail(PLANNING_INDEX, 503, "unavailable"),
	);
	let result = tokio::time::timeout(
		Duration::from_secs(5),
		service(engine.clone()).search(SearchRequest::default()),
	)
	.await
	.expect("Failure must not wait for the other query.");
	let err = result.expect_err("Expected engine error.");

	assert!(matches!(err, Error::Engine { ref message } if message.contains("503")));
	assert_eq!(engine.completed(), 1);
}

#[tokio::test]
async fn malformed_bucket_key_is_fatal() {
	let engine = Arc::new(ScriptedEngine::new().respond(
		PLANNING_INDEX,
		planning_response(vec![("01/02/2024", vec![planning_hit(
			"P1",
			"2024-01-02T08:00:00+0000",
			&[],
		)])]),
	));
	let err = service(engine)
		.search(SearchRequest::default())
		.await
		.expect_err("Expected invalid response.");

	assert!(matches!(err, Error::InvalidResponse { .. }));
}

#[tokio::test]
async fn invalid_bounds_are_rejected_before_querying() {
	let engine = Arc::new(ScriptedEngine::new());
	let err = service(engine.clone())
		.search(SearchRequest { from: Some("yesterday".to_string()), ..Default::default() })
		.await
		.expect_err("Expected invalid request.");

	assert!(matches!(err, Error::InvalidRequest { .. }));
	assert!(engine.queries().is_empty());
}

#[tokio::test]
async fn observers_see_source_buckets_before_merge() {
	let engine = Arc::new(
		ScriptedEngine::new()
			.respond(
				EVENTS_INDEX,
				events_response(vec![("2024-01-02", vec![event_hit(
					"E1",
					"2024-01-02T09:00:00+0000",
				)])]),
			)
			.respond(
				PLANNING_INDEX,
				planning_response(vec![("2024-01-02", vec![planning_hit(
					"P1",
					"2024-01-02T14:00:00+0000",
					&[],
				)])]),
			),
	);
	let global = Arc::new(RecordingObserver::default());
	let planning_only = Arc::new(RecordingObserver::default());
	let mut hooks = FetchHooks::default();

	hooks.register(global.clone()).register_for(Collection::Planning, planning_only.clone());

	let service = PlanningSearchService::with_engine(test_config(), engine, hooks)
		.expect("Failed to build service.");

	service.search(SearchRequest::default()).await.expect("Search failed.");

	let mut seen = global.buckets.lock().expect("observer lock").clone();

	seen.sort();

	assert_eq!(seen, vec![
		(Collection::Events, "2024-01-02".to_string(), 1),
		(Collection::Planning, "2024-01-02".to_string(), 1),
	]);
	assert_eq!(*planning_only.items.lock().expect("observer lock"), vec!["P1".to_string()]);
}

#[test]
fn unknown_default_timezone_is_a_config_error() {
	let mut cfg = test_config();

	cfg.search.default_timezone = "Nowhere/Special".to_string();

	let result = PlanningSearchService::with_engine(
		cfg,
		Arc::new(ScriptedEngine::new()),
		FetchHooks::default(),
	);

	assert!(matches!(result, Err(Error::Config { .. })));
}
