use serde::Serialize;

use crate::item::Item;

/// Items of one calendar day, keyed `yyyy-MM-dd`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBucket {
	pub id: String,
	pub total: u64,
	pub items: Vec<Item>,
}
impl DayBucket {
	/// A bucket whose total is its item count.
	pub fn new(id: impl Into<String>, items: Vec<Item>) -> Self {
		Self { id: id.into(), total: items.len() as u64, items }
	}
}
