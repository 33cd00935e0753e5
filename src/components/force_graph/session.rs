use log::{info, warn};

use super::error::LoadError;
use super::graph::Graph;
use super::render::{Frame, RenderSink};
use super::scale::node_radius;
use super::simulation::{Simulation, SimulationConfig};
use super::types::GraphData;
use super::viewport::ViewTransform;

/// Handle for one in-flight dataset request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
	generation: u64,
	year: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
	/// The dataset replaced the previous graph.
	Installed { nodes: usize, links: usize },
	/// A newer request was issued after this one; the result was dropped.
	Stale,
}

/// One canvas's worth of state: the layout for the current dataset and the
/// pan/zoom transform, which outlives dataset switches.
pub struct Session {
	config: SimulationConfig,
	simulation: Option<Simulation>,
	transform: ViewTransform,
	width: f64,
	height: f64,
	year: Option<u16>,
	hovered: Option<usize>,
	generation: u64,
	dirty: bool,
}

impl Session {
	pub fn new(config: SimulationConfig, width: f64, height: f64) -> Self {
		Self {
			config,
			simulation: None,
			transform: ViewTransform::default(),
			width,
			height,
			year: None,
			hovered: None,
			generation: 0,
			dirty: true,
		}
	}

	pub fn simulation(&self) -> Option<&Simulation> {
		self.simulation.as_ref()
	}

	pub fn simulation_mut(&mut self) -> Option<&mut Simulation> {
		self.simulation.as_mut()
	}

	pub fn transform(&self) -> &ViewTransform {
		&self.transform
	}

	/// Mutable access to the pan/zoom transform; marks the view for redraw.
	pub fn transform_mut(&mut self) -> &mut ViewTransform {
		self.dirty = true;
		&mut self.transform
	}

	pub fn year(&self) -> Option<u16> {
		self.year
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	pub fn set_hovered(&mut self, node: Option<usize>) {
		if self.hovered != node {
			self.hovered = node;
			self.dirty = true;
		}
	}

	fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		let (cx, cy) = self.center();
		if let Some(sim) = self.simulation.as_mut() {
			sim.set_center(cx, cy);
		}
		self.dirty = true;
	}

	/// Registers a new request. Any ticket issued earlier becomes stale.
	pub fn begin_load(&mut self, year: u16) -> LoadTicket {
		self.generation += 1;
		LoadTicket {
			generation: self.generation,
			year,
		}
	}

	/// Applies the result of a request started with [`Session::begin_load`].
	///
	/// Stale results are dropped. Errors leave the current graph in place.
	pub fn finish_load(
		&mut self,
		ticket: LoadTicket,
		result: Result<GraphData, LoadError>,
	) -> Result<LoadOutcome, LoadError> {
		if ticket.generation != self.generation {
			warn!("dropping stale dataset for {}", ticket.year);
			return Ok(LoadOutcome::Stale);
		}
		self.switch_dataset(ticket.year, result?)
	}

	/// Replaces the current graph with `data`.
	///
	/// The graph is validated before anything is torn down, so a malformed
	/// dataset leaves the previous layout running. On success the old
	/// solver is stopped before the new one is installed. The view
	/// transform is kept.
	pub fn switch_dataset(&mut self, year: u16, data: GraphData) -> Result<LoadOutcome, LoadError> {
		let graph = Graph::load(data.nodes, data.links, self.center())?;
		let (nodes, links) = (graph.len(), graph.links().len());

		if let Some(mut old) = self.simulation.take() {
			old.stop();
		}
		self.simulation = Some(Simulation::new(graph, self.config.clone(), self.center()));
		self.year = Some(year);
		self.hovered = None;
		self.dirty = true;
		info!("loaded {year}: {nodes} nodes, {links} links");
		Ok(LoadOutcome::Installed { nodes, links })
	}

	/// Topmost node whose circle contains the screen point.
	pub fn node_at(&self, screen: (f64, f64)) -> Option<usize> {
		let graph = self.simulation.as_ref()?.graph();
		let (wx, wy) = self.transform.invert(screen);
		graph.nodes().iter().enumerate().rev().find_map(|(i, n)| {
			let r = node_radius(n.citations);
			let (dx, dy) = (n.x - wx, n.y - wy);
			(dx * dx + dy * dy <= r * r).then_some(i)
		})
	}

	/// Runs one animation frame: a solver tick if the layout is live, then a
	/// redraw when anything changed. Returns whether the sink was drawn.
	pub fn advance(&mut self, sink: &mut dyn RenderSink) -> bool {
		let ticked = self.simulation.as_mut().is_some_and(Simulation::tick);
		if !(ticked || self.dirty) {
			return false;
		}
		self.dirty = false;
		let Some(sim) = self.simulation.as_ref() else {
			return false;
		};
		sink.draw(&Frame {
			graph: sim.graph(),
			transform: &self.transform,
			hovered: self.hovered,
			width: self.width,
			height: self.height,
		});
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::render::{Circle, Segment};
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	#[derive(Default)]
	struct Recorder {
		frames: usize,
		circles: Vec<Circle>,
		lines: Vec<Segment>,
		node_positions: Vec<(f64, f64)>,
	}

	impl RenderSink for Recorder {
		fn draw(&mut self, frame: &Frame<'_>) {
			self.frames += 1;
			self.circles = frame.circles().collect();
			self.lines = frame.lines().collect();
			self.node_positions = frame.graph.nodes().iter().map(|n| (n.x, n.y)).collect();
		}
	}

	fn dataset(nodes: &[(&str, f64)], links: &[(&str, &str)]) -> GraphData {
		GraphData {
			nodes: nodes
				.iter()
				.map(|&(id, citations)| GraphNode {
					id: id.into(),
					citations,
				})
				.collect(),
			links: links
				.iter()
				.map(|&(s, t)| GraphLink {
					source: s.into(),
					target: t.into(),
				})
				.collect(),
		}
	}

	fn two_papers() -> GraphData {
		dataset(&[("A", 4.0), ("B", 9.0)], &[("A", "B")])
	}

	#[test]
	fn two_node_dataset_renders_two_circles_and_a_line() {
		let mut session = Session::new(SimulationConfig::default(), 800.0, 600.0);
		let outcome = session.switch_dataset(1990, two_papers()).unwrap();
		assert_eq!(outcome, LoadOutcome::Installed { nodes: 2, links: 1 });

		let mut sink = Recorder::default();
		assert!(session.advance(&mut sink));
		assert_eq!(sink.circles.len(), 2);
		assert_eq!(sink.lines.len(), 1);
		assert_eq!(sink.circles[0].radius, 3.0);
		assert_eq!(sink.circles[1].radius, 3.0);
	}

	#[test]
	fn rendered_link_endpoints_match_node_positions_every_tick() {
		let mut session = Session::new(SimulationConfig::default(), 800.0, 600.0);
		session
			.switch_dataset(
				2001,
				dataset(
					&[("A", 1.0), ("B", 2.0), ("C", 3.0)],
					&[("A", "B"), ("B", "C"), ("C", "A")],
				),
			)
			.unwrap();
		let mut sink = Recorder::default();
		for _ in 0..25 {
			session.advance(&mut sink);
			let p = &sink.node_positions;
			let expected = [(0, 1), (1, 2), (2, 0)];
			for (seg, (s, t)) in sink.lines.iter().zip(expected) {
				assert_eq!((seg.x1, seg.y1), p[s]);
				assert_eq!((seg.x2, seg.y2), p[t]);
			}
		}
	}

	#[test]
	fn bad_dataset_keeps_previous_graph() {
		let mut session = Session::new(SimulationConfig::default(), 800.0, 600.0);
		session.switch_dataset(1990, two_papers()).unwrap();
		let mut sink = Recorder::default();
		session.advance(&mut sink);
		let frames = sink.frames;

		let err = session
			.switch_dataset(1991, dataset(&[("A", 1.0)], &[("A", "Z")]))
			.unwrap_err();
		assert!(matches!(err, LoadError::UnknownEndpoint { ref id, .. } if id == "Z"));
		assert_eq!(session.year(), Some(1990));
		let sim = session.simulation().unwrap();
		assert_eq!(sim.graph().len(), 2);
		assert!(sim.is_running());
		assert_eq!(sink.frames, frames);
	}

	#[test]
	fn switching_years_keeps_the_viewport() {
		let mut session = Session::new(SimulationConfig::default(), 800.0, 600.0);
		session.switch_dataset(1990, two_papers()).unwrap();
		session.transform_mut().scale_about((100.0, 100.0), 2.0);
		session.transform_mut().translate_by(15.0, -5.0);
		let before = *session.transform();
		session
			.switch_dataset(1995, dataset(&[("X", 0.0)], &[]))
			.unwrap();
		assert_eq!(*session.transform(), before);
		assert_eq!(session.year(), Some(1995));
	}

	#[test]
	fn stale_loads_are_dropped() {
		let mut session = Session::new(SimulationConfig::default(), 800.0, 600.0);
		let first = session.begin_load(1990);
		let second = session.begin_load(1991);
		assert_eq!(
			session.finish_load(second, Ok(two_papers())).unwrap(),
			LoadOutcome::Installed { nodes: 2, links: 1 }
		);
		assert_eq!(
			session
				.finish_load(first, Ok(dataset(&[("late", 1.0)], &[])))
				.unwrap(),
			LoadOutcome::Stale
		);
		assert_eq!(session.year(), Some(1991));
		assert_eq!(session.simulation().unwrap().graph().len(), 2);
	}

	#[test]
	fn failed_fetch_is_reported_and_changes_nothing() {
		let mut session = Session::new(SimulationConfig::default(), 800.0, 600.0);
		session.switch_dataset(1990, two_papers()).unwrap();
		let ticket = session.begin_load(1992);
		let err = session
			.finish_load(ticket, Err(LoadError::Network("offline".into())))
			.unwrap_err();
		assert!(matches!(err, LoadError::Network(_)));
		assert_eq!(session.year(), Some(1990));
	}

	#[test]
	fn idle_session_draws_only_when_dirty() {
		let mut session = Session::new(SimulationConfig::default(), 800.0, 600.0);
		session.switch_dataset(1990, two_papers()).unwrap();
		let mut sink = Recorder::default();
		while session.simulation().unwrap().is_running() {
			session.advance(&mut sink);
		}
		assert!(!session.advance(&mut sink));
		session.transform_mut().translate_by(1.0, 0.0);
		assert!(session.advance(&mut sink));
		assert!(!session.advance(&mut sink));
	}

	#[test]
	fn hit_test_uses_inverse_transform() {
		let mut session = Session::new(SimulationConfig::default(), 800.0, 600.0);
		session.switch_dataset(1990, two_papers()).unwrap();
		session.transform_mut().scale_about((0.0, 0.0), 2.0);
		session.transform_mut().translate_by(40.0, 10.0);
		let b = session.simulation().unwrap().graph().node(1).unwrap().clone();
		let screen = session.transform().apply((b.x, b.y));
		assert_eq!(session.node_at(screen), Some(1));
		assert_eq!(session.node_at((-500.0, -500.0)), None);
	}

	#[test]
	fn empty_session_has_nothing_to_draw() {
		let mut session = Session::new(SimulationConfig::default(), 800.0, 600.0);
		let mut sink = Recorder::default();
		assert!(!session.advance(&mut sink));
		assert_eq!(session.node_at((400.0, 300.0)), None);
	}
}
