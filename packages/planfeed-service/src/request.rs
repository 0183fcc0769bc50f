use std::collections::HashMap;

use serde::Deserialize;
use time::OffsetDateTime;

use crate::{Result, dates};

/// Query-string arguments of a day-bucketed search.
///
/// Filter fields such as `anpa_category` stay in `args` as raw strings; each may be a scalar or a
/// JSON-encoded list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
	pub from: Option<String>,
	pub to: Option<String>,
	pub timezone: Option<String>,
	pub slugline: Option<String>,
	#[serde(flatten)]
	pub args: HashMap<String, String>,
}
impl SearchRequest {
	pub fn with_arg(mut self, name: &str, value: &str) -> Self {
		self.args.insert(name.to_string(), value.to_string());

		self
	}

	pub fn from_bound(&self) -> Result<Option<OffsetDateTime>> {
		parse_bound("from", self.from.as_deref())
	}

	pub fn to_bound(&self) -> Result<Option<OffsetDateTime>> {
		parse_bound("to", self.to.as_deref())
	}

	pub fn timezone(&self) -> Option<&str> {
		non_blank(self.timezone.as_deref())
	}

	pub fn slugline(&self) -> Option<&str> {
		non_blank(self.slugline.as_deref())
	}
}

fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<OffsetDateTime>> {
	non_blank(raw).map(|value| dates::parse_request_bound(name, value)).transpose()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|value| !value.is_empty())
}
