use std::collections::HashMap;

use serde::Deserialize;

pub const DEFAULT_FILTER_FIELDS: [&str; 4] = ["anpa_category", "subject", "state", "pubstatus"];
pub const MAX_HITS_PER_DAY_LIMIT: u32 = 9_999;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub elastic: Elastic,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Elastic {
	pub url: String,
	/// Index used for every collection without an entry in `indexes`.
	pub index: String,
	pub timeout_ms: u64,
	pub api_key: Option<String>,
	/// Optional. Map keys are collection names, e.g. "events" or "planning".
	#[serde(default)]
	pub indexes: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Search {
	/// IANA name or `±HH:MM` offset sent when a request carries no timezone.
	pub default_timezone: String,
	pub window_days: u32,
	pub max_hits_per_day: u32,
	pub filter_fields: Vec<String>,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			default_timezone: "UTC".to_string(),
			window_days: 7,
			max_hits_per_day: MAX_HITS_PER_DAY_LIMIT,
			filter_fields: DEFAULT_FILTER_FIELDS.iter().map(|field| field.to_string()).collect(),
		}
	}
}
