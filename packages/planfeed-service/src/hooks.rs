use std::{collections::HashMap, sync::Arc};

use serde_json::{Value, json};

use crate::{
	bucket::DayBucket,
	item::{Collection, Item},
};

pub const LINKS_FIELD: &str = "_links";

/// Observer of fetched day buckets. Both callbacks default to doing nothing.
pub trait FetchObserver
where
	Self: Send + Sync,
{
	fn on_fetched_bucket(&self, _collection: Collection, _bucket: &mut DayBucket) {}

	fn on_fetched_item(&self, _collection: Collection, _item: &mut Item) {}
}

/// Observers registered for every collection or for one collection only.
#[derive(Clone, Default)]
pub struct FetchHooks {
	global: Vec<Arc<dyn FetchObserver>>,
	by_collection: HashMap<Collection, Vec<Arc<dyn FetchObserver>>>,
}
impl FetchHooks {
	pub fn register(&mut self, observer: Arc<dyn FetchObserver>) -> &mut Self {
		self.global.push(observer);

		self
	}

	pub fn register_for(
		&mut self,
		collection: Collection,
		observer: Arc<dyn FetchObserver>,
	) -> &mut Self {
		self.by_collection.entry(collection).or_default().push(observer);

		self
	}

	/// Runs the bucket callback of every observer, then the item callback for each item.
	/// Global observers run before per-collection ones.
	pub fn fetched(&self, collection: Collection, bucket: &mut DayBucket) {
		let scoped = self.by_collection.get(&collection).map(Vec::as_slice).unwrap_or_default();

		for observer in self.global.iter().chain(scoped) {
			observer.on_fetched_bucket(collection, bucket);

			for item in bucket.items.iter_mut() {
				observer.on_fetched_item(collection, item);
			}
		}
	}
}

/// Adds `_links.self` pointing at the item's resource.
pub fn decorate_links(item: &mut Item) {
	let collection = item.collection();
	let link = json!({ "title": collection.title(), "href": format!("{collection}/{}", item.id()) });
	let doc = item.doc_mut();

	match doc.get_mut(LINKS_FIELD) {
		Some(Value::Object(existing)) => {
			existing.insert("self".to_string(), link);
		},
		_ => {
			doc.insert(LINKS_FIELD.to_string(), json!({ "self": link }));
		},
	}
}
