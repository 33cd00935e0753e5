use serde::Deserialize;

use super::error::LoadError;

/// One paper in a yearly dataset.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GraphNode {
	pub id: String,
	#[serde(default)]
	pub citations: f64,
}

/// A citation between two papers, by id.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
}

/// The JSON document stored per year: `{ "nodes": [..], "links": [..] }`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

impl GraphData {
	pub fn from_json(text: &str) -> Result<Self, LoadError> {
		Ok(serde_json::from_str(text)?)
	}
}
