use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Errors raised while fetching or building a yearly dataset.
///
/// All of them are per-load failures: the session keeps whatever graph it
/// was showing before.
#[derive(Debug, Error)]
pub enum LoadError {
	/// A link names a node id that is not in the node set.
	#[error("link {link} references unknown {endpoint} node `{id}`")]
	UnknownEndpoint {
		link: usize,
		endpoint: Endpoint,
		id: String,
	},

	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),

	#[error("invalid dataset JSON: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("request for {url} failed with HTTP {status}")]
	Status { url: String, status: u16 },

	#[error("network error: {0}")]
	Network(String),

	#[error("no browser window available")]
	NoWindow,
}

impl LoadError {
	/// Wraps a rejected JS promise or failed cast.
	pub fn network(value: JsValue) -> Self {
		LoadError::Network(js_message(&value))
	}
}

/// Which side of a link failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
	Source,
	Target,
}

impl std::fmt::Display for Endpoint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Endpoint::Source => f.write_str("source"),
			Endpoint::Target => f.write_str("target"),
		}
	}
}

fn js_message(value: &JsValue) -> String {
	if let Some(err) = value.dyn_ref::<js_sys::Error>() {
		return String::from(err.message());
	}
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
