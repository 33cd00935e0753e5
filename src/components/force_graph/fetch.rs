use log::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::error::LoadError;
use super::types::GraphData;

pub fn dataset_url(base: &str, year: u16) -> String {
	format!("{}/{year}.json", base.trim_end_matches('/'))
}

/// Fetches and parses `<base>/<year>.json`.
pub async fn fetch_year(base: &str, year: u16) -> Result<GraphData, LoadError> {
	let window = web_sys::window().ok_or(LoadError::NoWindow)?;
	let url = dataset_url(base, year);
	debug!("fetching {url}");

	let response: Response = JsFuture::from(window.fetch_with_str(&url))
		.await
		.map_err(LoadError::network)?
		.dyn_into()
		.map_err(LoadError::network)?;
	if !response.ok() {
		return Err(LoadError::Status {
			url,
			status: response.status(),
		});
	}

	let text = JsFuture::from(response.text().map_err(LoadError::network)?)
		.await
		.map_err(LoadError::network)?
		.as_string()
		.ok_or_else(|| LoadError::Network(format!("{url} returned a non-text body")))?;
	GraphData::from_json(&text)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn url_joins_base_and_year() {
		assert_eq!(dataset_url("data", 1990), "data/1990.json");
		assert_eq!(dataset_url("/static/data/", 2025), "/static/data/2025.json");
	}
}
