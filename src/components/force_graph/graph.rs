use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::f64::consts::PI;

use super::error::{Endpoint, LoadError};
use super::types::{GraphLink, GraphNode};

const INITIAL_RADIUS: f64 = 10.0;

/// A paper together with its layout state.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub citations: f64,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned coordinates. A pinned axis ignores all computed forces.
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

impl Node {
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// A link resolved to indices into the node table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
	pub source: usize,
	pub target: usize,
}

/// Nodes and resolved links for one dataset.
///
/// Links never copy node state; endpoint positions are always read through
/// the node table, so whatever the solver writes is what a link sees.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<Node>,
	links: Vec<Link>,
	index: HashMap<String, usize>,
	degree: Vec<usize>,
}

impl Graph {
	/// Builds a graph from raw dataset records, placing nodes on a
	/// phyllotaxis spiral around `center`.
	///
	/// Fails when a node id repeats or a link endpoint is not in `nodes`.
	pub fn load(
		nodes: Vec<GraphNode>,
		links: Vec<GraphLink>,
		center: (f64, f64),
	) -> Result<Self, LoadError> {
		let initial_angle = PI * (3.0 - 5f64.sqrt());
		let mut index = HashMap::with_capacity(nodes.len());
		let mut table = Vec::with_capacity(nodes.len());

		for (i, node) in nodes.into_iter().enumerate() {
			match index.entry(node.id.clone()) {
				Entry::Occupied(_) => return Err(LoadError::DuplicateNode(node.id)),
				Entry::Vacant(slot) => {
					slot.insert(i);
				}
			}
			let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
			let angle = i as f64 * initial_angle;
			table.push(Node {
				id: node.id,
				citations: node.citations.max(0.0),
				x: center.0 + radius * angle.cos(),
				y: center.1 + radius * angle.sin(),
				vx: 0.0,
				vy: 0.0,
				fx: None,
				fy: None,
			});
		}

		let resolve = |link: usize, endpoint: Endpoint, id: String| -> Result<usize, LoadError> {
			index
				.get(&id)
				.copied()
				.ok_or(LoadError::UnknownEndpoint { link, endpoint, id })
		};

		let mut degree = vec![0; table.len()];
		let mut resolved = Vec::with_capacity(links.len());
		for (i, link) in links.into_iter().enumerate() {
			let source = resolve(i, Endpoint::Source, link.source)?;
			let target = resolve(i, Endpoint::Target, link.target)?;
			degree[source] += 1;
			degree[target] += 1;
			resolved.push(Link { source, target });
		}

		Ok(Self {
			nodes: table,
			links: resolved,
			index,
			degree,
		})
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn node(&self, idx: usize) -> Option<&Node> {
		self.nodes.get(idx)
	}

	pub fn node_mut(&mut self, idx: usize) -> Option<&mut Node> {
		self.nodes.get_mut(idx)
	}

	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Number of link ends attached to the node; self-links count twice.
	pub fn degree(&self, idx: usize) -> usize {
		self.degree.get(idx).copied().unwrap_or(0)
	}

	/// Current positions of a link's source and target.
	pub fn link_endpoints(&self, link: &Link) -> ((f64, f64), (f64, f64)) {
		let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
		((s.x, s.y), (t.x, t.y))
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
