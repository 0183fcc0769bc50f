use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{Error, Result, dates};

pub const ID_FIELD: &str = "_id";
pub const TYPE_FIELD: &str = "_type";
pub const DAY_FIELD: &str = "day";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
	Events,
	Planning,
}
impl Collection {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Events => "events",
			Self::Planning => "planning",
		}
	}

	pub fn title(self) -> &'static str {
		match self {
			Self::Events => "Event",
			Self::Planning => "Planning",
		}
	}
}
impl Display for Collection {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A document from one of the two collections, serialized as the document itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
	Event(EventItem),
	Planning(PlanningItem),
}
impl Item {
	pub fn collection(&self) -> Collection {
		match self {
			Self::Event(_) => Collection::Events,
			Self::Planning(_) => Collection::Planning,
		}
	}

	pub fn id(&self) -> &str {
		self.doc().get(ID_FIELD).and_then(Value::as_str).unwrap_or_default()
	}

	pub fn doc(&self) -> &Map<String, Value> {
		match self {
			Self::Event(item) => &item.doc,
			Self::Planning(item) => &item.doc,
		}
	}

	pub fn doc_mut(&mut self) -> &mut Map<String, Value> {
		match self {
			Self::Event(item) => &mut item.doc,
			Self::Planning(item) => &mut item.doc,
		}
	}

	/// Timestamp that orders this item among the other items of its day.
	pub fn selection_date(&self) -> Option<OffsetDateTime> {
		match self {
			Self::Event(item) => item.start(),
			Self::Planning(item) => item.selection_date(item.day),
		}
	}
}
impl Serialize for Item {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		self.doc().serialize(serializer)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventItem {
	pub doc: Map<String, Value>,
}
impl EventItem {
	pub fn from_hit(hit: &Value) -> Result<Self> {
		Ok(Self { doc: document_from_hit(Collection::Events, hit)? })
	}

	pub fn start(&self) -> Option<OffsetDateTime> {
		doc_timestamp(&self.doc, &["dates", "start"])
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanningItem {
	/// Day bucket the item was fetched under, UTC midnight.
	pub day: OffsetDateTime,
	pub doc: Map<String, Value>,
}
impl PlanningItem {
	/// Builds the item and annotates its document with the bucket `day`.
	pub fn from_hit(hit: &Value, day: OffsetDateTime) -> Result<Self> {
		let mut doc = document_from_hit(Collection::Planning, hit)?;
		let formatted = day.format(&Rfc3339).map_err(|err| Error::InvalidResponse {
			message: format!("Bucket day cannot be formatted: {err}."),
		})?;

		doc.insert(DAY_FIELD.to_string(), Value::String(formatted));

		Ok(Self { day, doc })
	}

	pub fn planning_date(&self) -> Option<OffsetDateTime> {
		doc_timestamp(&self.doc, &["_planning_date"])
	}

	pub fn coverage_dates(&self) -> Vec<OffsetDateTime> {
		let Some(coverages) = self.doc.get("coverages").and_then(Value::as_array) else {
			return Vec::new();
		};

		coverages
			.iter()
			.filter_map(|coverage| coverage.get("planning")?.get("scheduled")?.as_str())
			.filter_map(|raw| parse_logged(raw, "coverages.planning.scheduled"))
			.collect()
	}

	/// First of the coverage and planning dates strictly after `bucket_day`, falling back to
	/// `_planning_date` when none is later.
	pub fn selection_date(&self, bucket_day: OffsetDateTime) -> Option<OffsetDateTime> {
		let planning_date = self.planning_date();
		let mut candidates = self.coverage_dates();

		candidates.extend(planning_date);
		candidates.sort();

		candidates.into_iter().find(|date| *date > bucket_day).or(planning_date)
	}
}

fn document_from_hit(collection: Collection, hit: &Value) -> Result<Map<String, Value>> {
	let id = hit.get(ID_FIELD).and_then(Value::as_str).ok_or_else(|| Error::InvalidResponse {
		message: format!("{collection} hit is missing {ID_FIELD}."),
	})?;
	let mut doc = match hit.get("_source") {
		Some(Value::Object(source)) => source.clone(),
		Some(Value::Null) | None => Map::new(),
		Some(_) => {
			return Err(Error::InvalidResponse {
				message: format!("{collection} hit {id} has a non-object _source."),
			});
		},
	};

	doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
	doc.insert(TYPE_FIELD.to_string(), Value::String(collection.as_str().to_string()));

	Ok(doc)
}

fn doc_timestamp(doc: &Map<String, Value>, path: &[&str]) -> Option<OffsetDateTime> {
	let (first, rest) = path.split_first()?;
	let mut value = doc.get(*first)?;

	for key in rest {
		value = value.get(*key)?;
	}

	parse_logged(value.as_str()?, &path.join("."))
}

fn parse_logged(raw: &str, field: &str) -> Option<OffsetDateTime> {
	let parsed = dates::parse_timestamp(raw);

	if parsed.is_none() {
		tracing::warn!(field, value = raw, "Ignoring unparseable document date.");
	}

	parsed
}
