use std::collections::HashMap;

use serde_json::{Value, json};
use time::{Duration, OffsetDateTime};

use planfeed_config::DefaultTimezone;

use crate::{Result, dates};

/// Inclusive date window of a search, with the time zone the engine evaluates it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
	pub from: OffsetDateTime,
	pub to: OffsetDateTime,
	pub time_zone: String,
}
impl DateWindow {
	/// Fills absent bounds: `from` defaults to `now`, `to` to `from + window_days`. Without a
	/// request timezone the offset of `default_timezone` at `from` is used.
	pub fn resolve(
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
		timezone: Option<&str>,
		now: OffsetDateTime,
		window_days: u32,
		default_timezone: DefaultTimezone,
	) -> Self {
		let from = from.unwrap_or(now);
		let to = to.unwrap_or_else(|| from + Duration::days(i64::from(window_days)));
		let time_zone = match timezone {
			Some(tz) => tz.to_string(),
			None => dates::timezone_offset(default_timezone, from),
		};

		Self { from, to, time_zone }
	}
}

pub fn date_range_filter(field: &str, window: &DateWindow) -> Result<Value> {
	let gte = dates::format_day(window.from)?;
	let lte = dates::format_day(window.to)?;

	Ok(json!({ "range": { field: { "gte": gte, "lte": lte, "time_zone": window.time_zone } } }))
}

/// Builds a `terms` predicate for `argument`, or nothing when the argument is absent or empty.
///
/// The raw value is read as JSON first; a value that is not valid JSON is taken verbatim as the
/// single term.
pub fn term_filter(argument: &str, args: &HashMap<String, String>) -> Option<Value> {
	let raw = args.get(argument).filter(|raw| !raw.is_empty())?;
	let parsed = match serde_json::from_str::<Value>(raw) {
		Ok(value) => value,
		Err(_) => Value::String(raw.clone()),
	};

	if is_empty_value(&parsed) {
		return None;
	}

	let values = match parsed {
		Value::Array(values) => values,
		scalar => vec![scalar],
	};

	Some(json!({ "terms": { argument: values } }))
}

fn is_empty_value(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(flag) => !flag,
		Value::Number(number) => number.as_f64() == Some(0.0),
		Value::String(text) => text.is_empty(),
		Value::Array(values) => values.is_empty(),
		Value::Object(fields) => fields.is_empty(),
	}
}
