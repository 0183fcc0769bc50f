use std::str::FromStr;

use chrono::{FixedOffset, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

/// Timezone of `search.default_timezone`: an IANA name or a fixed `±HH:MM` offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultTimezone {
	Named(Tz),
	Fixed(FixedOffset),
}
impl DefaultTimezone {
	/// Seconds east of UTC at the given UTC instant.
	pub fn utc_offset_seconds(self, utc: &NaiveDateTime) -> i32 {
		match self {
			Self::Named(tz) => tz.offset_from_utc_datetime(utc).fix().local_minus_utc(),
			Self::Fixed(offset) => offset.local_minus_utc(),
		}
	}
}
impl FromStr for DefaultTimezone {
	type Err = String;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		if let Ok(tz) = raw.parse::<Tz>() {
			return Ok(Self::Named(tz));
		}
		if raw.starts_with(['+', '-'])
			&& let Ok(offset) = raw.parse::<FixedOffset>()
		{
			return Ok(Self::Fixed(offset));
		}

		Err(format!("'{raw}' is neither an IANA timezone nor a ±HH:MM offset"))
	}
}
