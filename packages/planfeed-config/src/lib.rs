mod error;
mod timezone;
mod types;

pub use error::{Error, Result};
pub use timezone::DefaultTimezone;
pub use types::{Config, DEFAULT_FILTER_FIELDS, Elastic, MAX_HITS_PER_DAY_LIMIT, Search, Service};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("elastic.url", &cfg.elastic.url),
		("elastic.index", &cfg.elastic.index),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.elastic.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "elastic.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (collection, index) in &cfg.elastic.indexes {
		if index.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("elastic.indexes.{collection} must be non-empty."),
			});
		}
	}

	if cfg.search.window_days == 0 {
		return Err(Error::Validation {
			message: "search.window_days must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_hits_per_day == 0 || cfg.search.max_hits_per_day > MAX_HITS_PER_DAY_LIMIT {
		return Err(Error::Validation {
			message: format!(
				"search.max_hits_per_day must be in the range 1-{MAX_HITS_PER_DAY_LIMIT}."
			),
		});
	}
	if let Err(reason) = cfg.search.default_timezone.parse::<DefaultTimezone>() {
		return Err(Error::Validation { message: format!("search.default_timezone {reason}.") });
	}
	if cfg.search.filter_fields.iter().any(|field| field.trim().is_empty()) {
		return Err(Error::Validation {
			message: "search.filter_fields entries must be non-empty.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.elastic.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.elastic.api_key = None;
	}

	let trimmed = cfg.elastic.url.trim_end_matches('/').len();

	cfg.elastic.url.truncate(trimmed);
}
