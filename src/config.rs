//! Application settings shared through Leptos context.

use std::ops::RangeInclusive;

use crate::components::force_graph::SimulationConfig;

/// Where datasets live and which years can be selected.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	/// Directory (relative to the page) holding `<year>.json` files.
	pub data_base_url: String,
	/// Years offered in the selector. Static, since the data directory
	/// cannot be listed from the browser.
	pub years: RangeInclusive<u16>,
	pub initial_year: u16,
	pub simulation: SimulationConfig,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			data_base_url: "data".into(),
			years: 1986..=2025,
			initial_year: 1990,
			simulation: SimulationConfig::default(),
		}
	}
}

impl AppConfig {
	/// Parses a `?year=` value, falling back to the initial year when it is
	/// missing, malformed or out of range.
	pub fn year_or_initial(&self, raw: Option<&str>) -> u16 {
		raw.and_then(|s| s.trim().parse::<u16>().ok())
			.filter(|y| self.years.contains(y))
			.unwrap_or(self.initial_year)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn query_year_falls_back_to_initial() {
		let config = AppConfig::default();
		assert_eq!(config.year_or_initial(Some("2003")), 2003);
		assert_eq!(config.year_or_initial(Some(" 1986 ")), 1986);
		assert_eq!(config.year_or_initial(Some("1985")), 1990);
		assert_eq!(config.year_or_initial(Some("soon")), 1990);
		assert_eq!(config.year_or_initial(None), 1990);
	}
}
