use std::{
	collections::HashMap,
	future,
	sync::{
		Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use serde_json::{Value, json};

use planfeed_engine::{BoxFuture, Error, Result, SearchEngine};

#[derive(Debug, Clone)]
enum Script {
	Respond(Value),
	Fail { status: u16, body: String },
	Hang,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
	pub index: String,
	pub body: Value,
}

/// In-memory engine answering per index with scripted responses and recording every query.
///
/// Indices without a script answer with an empty object, i.e. no aggregations.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
	scripts: Mutex<HashMap<String, Script>>,
	queries: Mutex<Vec<RecordedQuery>>,
	completed: AtomicUsize,
}
impl ScriptedEngine {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn respond(self, index: &str, response: Value) -> Self {
		self.script(index, Script::Respond(response))
	}

	pub fn fail(self, index: &str, status: u16, body: &str) -> Self {
		self.script(index, Script::Fail { status, body: body.to_string() })
	}

	/// Never answers queries against `index`.
	pub fn hang(self, index: &str) -> Self {
		self.script(index, Script::Hang)
	}

	pub fn queries(&self) -> Vec<RecordedQuery> {
		self.queries.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn query_for(&self, index: &str) -> Option<Value> {
		self.queries().into_iter().find(|query| query.index == index).map(|query| query.body)
	}

	/// Number of queries that ran to completion, failures included.
	pub fn completed(&self) -> usize {
		self.completed.load(Ordering::SeqCst)
	}

	fn script(self, index: &str, script: Script) -> Self {
		self.scripts
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.insert(index.to_string(), script);

		self
	}
}
impl SearchEngine for ScriptedEngine {
	fn search<'a>(&'a self, index: &'a str, body: &'a Value) -> BoxFuture<'a, Result<Value>> {
		self.queries
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.push(RecordedQuery { index: index.to_string(), body: body.clone() });

		let script = self.scripts.lock().unwrap_or_else(|err| err.into_inner()).get(index).cloned();

		Box::pin(async move {
			let result = match script {
				Some(Script::Respond(response)) => Ok(response),
				Some(Script::Fail { status, body }) => Err(Error::Status { status, body }),
				Some(Script::Hang) => future::pending().await,
				None => Ok(json!({})),
			};

			self.completed.fetch_add(1, Ordering::SeqCst);

			result
		})
	}
}

/// A top hit as the engine returns it.
pub fn hit(id: &str, source: Value) -> Value {
	json!({ "_id": id, "_source": source })
}

/// Response of the events day-histogram query; each bucket is `(day, hits)`.
pub fn events_response(buckets: Vec<(&str, Vec<Value>)>) -> Value {
	let buckets: Vec<Value> = buckets
		.into_iter()
		.map(|(day, hits)| {
			json!({
				"key_as_string": day,
				"doc_count": hits.len(),
				"by_date": { "hits": { "total": hits.len(), "hits": hits } }
			})
		})
		.collect();

	json!({
		"hits": { "total": 0, "hits": [] },
		"aggregations": { "date_histogram": { "buckets": buckets } }
	})
}

/// Response of the nested planning day-histogram query; each bucket is `(day, hits)`.
pub fn planning_response(buckets: Vec<(&str, Vec<Value>)>) -> Value {
	let buckets: Vec<Value> = buckets
		.into_iter()
		.map(|(day, hits)| {
			json!({
				"key_as_string": day,
				"doc_count": hits.len(),
				"by_date": {
					"doc_count": hits.len(),
					"plannings": { "hits": { "total": hits.len(), "hits": hits } }
				}
			})
		})
		.collect();

	json!({
		"hits": { "total": 0, "hits": [] },
		"aggregations": {
			"planning_date": { "doc_count": 0, "date_histogram": { "buckets": buckets } }
		}
	})
}
