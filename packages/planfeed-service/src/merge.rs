use std::collections::{BTreeSet, HashMap};

use crate::{bucket::DayBucket, item::Item};

/// Combines the events and planning day lists into one list per day, ascending by day key.
///
/// Each day holds the events followed by the planning items of that day, resorted by selection
/// date; `total` is recounted after the merge.
pub fn merge(events: Vec<DayBucket>, planning: Vec<DayBucket>) -> Vec<DayBucket> {
	let mut events = by_day(events);
	let mut planning = by_day(planning);
	let days: BTreeSet<String> = events.keys().chain(planning.keys()).cloned().collect();

	days.into_iter()
		.map(|day| {
			let mut items = events.remove(&day).unwrap_or_default();

			items.extend(planning.remove(&day).unwrap_or_default());

			sort_items(&mut items);

			DayBucket::new(day, items)
		})
		.collect()
}

/// Stable ascending sort by selection date; items without one go last.
pub fn sort_items(items: &mut [Item]) {
	items.sort_by_cached_key(|item| {
		let date = item.selection_date();

		(date.is_none(), date)
	});
}

fn by_day(buckets: Vec<DayBucket>) -> HashMap<String, Vec<Item>> {
	buckets.into_iter().map(|bucket| (bucket.id, bucket.items)).collect()
}
