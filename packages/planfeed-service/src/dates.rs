use time::{
	Date, OffsetDateTime, format_description::BorrowedFormatItem,
	format_description::well_known::Rfc3339, macros::format_description,
};

use planfeed_config::DefaultTimezone;

use crate::{Error, Result};

/// Literal format of range bounds and histogram keys, `yyyy-MM-dd` on the engine side.
pub const DAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const COMPACT_OFFSET_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
	"[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory][offset_minute]"
);

pub fn format_day(ts: OffsetDateTime) -> Result<String> {
	ts.date().format(DAY_FORMAT).map_err(|err| Error::InvalidRequest {
		message: format!("Date {ts} cannot be rendered as yyyy-MM-dd: {err}."),
	})
}

/// Parses a histogram bucket key into UTC midnight of that day.
pub fn parse_day(key: &str) -> Result<OffsetDateTime> {
	let date = Date::parse(key, DAY_FORMAT).map_err(|err| Error::InvalidResponse {
		message: format!("Bucket key '{key}' is not a yyyy-MM-dd date: {err}."),
	})?;

	Ok(date.midnight().assume_utc())
}

/// Parses a document timestamp, either RFC 3339 or `yyyy-MM-ddTHH:mm:ss+HHMM`.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
	OffsetDateTime::parse(raw, &Rfc3339)
		.or_else(|_| OffsetDateTime::parse(raw, COMPACT_OFFSET_FORMAT))
		.ok()
}

/// Parses a request bound, accepting RFC 3339 or a bare date (UTC midnight).
pub fn parse_request_bound(name: &str, raw: &str) -> Result<OffsetDateTime> {
	if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
		return Ok(ts);
	}

	Date::parse(raw, DAY_FORMAT).map(|date| date.midnight().assume_utc()).map_err(|_| {
		Error::InvalidRequest {
			message: format!("{name} must be an RFC 3339 timestamp or a yyyy-MM-dd date."),
		}
	})
}

/// Renders the UTC offset of `tz` at `at` as `±HH:MM`.
pub fn timezone_offset(tz: DefaultTimezone, at: OffsetDateTime) -> String {
	let utc = chrono::DateTime::from_timestamp(at.unix_timestamp(), 0).unwrap_or_default();
	let seconds = tz.utc_offset_seconds(&utc.naive_utc());
	let sign = if seconds < 0 { '-' } else { '+' };
	let minutes = seconds.unsigned_abs() / 60;

	format!("{sign}{:02}:{:02}", minutes / 60, minutes % 60)
}
