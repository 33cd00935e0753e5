use log::debug;

use super::forces::{CenterForce, Lcg, LinkForce, ManyBodyForce};
use super::graph::Graph;

/// Tunables for the force solver.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
	pub link_distance: f64,
	pub link_iterations: usize,
	pub charge_strength: f64,
	/// Barnes–Hut opening angle.
	pub theta: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	pub velocity_decay: f64,
	/// Alpha a drag interaction reheats the layout to.
	pub reheat_alpha: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			link_distance: 80.0,
			link_iterations: 1,
			charge_strength: -120.0,
			theta: 0.9,
			alpha_min,
			// Cools from 1 to alpha_min in 300 ticks.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			reheat_alpha: 0.3,
		}
	}
}

/// Force-directed layout over a [`Graph`].
pub struct Simulation {
	graph: Graph,
	config: SimulationConfig,
	link: LinkForce,
	charge: ManyBodyForce,
	center: CenterForce,
	alpha: f64,
	alpha_target: f64,
	running: bool,
	rng: Lcg,
}

impl Simulation {
	pub fn new(graph: Graph, config: SimulationConfig, center: (f64, f64)) -> Self {
		let mut link = LinkForce::new(config.link_distance, config.link_iterations);
		link.initialize(&graph);
		Self {
			charge: ManyBodyForce::new(config.charge_strength, config.theta),
			center: CenterForce::new(center.0, center.1),
			link,
			graph,
			config,
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
			rng: Lcg::default(),
		}
	}

	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha;
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Cooled below `alpha_min`; ticking would change nothing visible.
	pub fn is_idle(&self) -> bool {
		self.alpha < self.config.alpha_min
	}

	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center.x = x;
		self.center.y = y;
	}

	pub fn stop(&mut self) {
		self.running = false;
	}

	pub fn restart(&mut self) {
		self.running = true;
	}

	/// Raises the layout energy so the whole graph responds to a drag.
	pub fn reheat(&mut self) {
		let target = self.config.reheat_alpha;
		self.alpha_target = target;
		if self.alpha < target {
			self.alpha = target;
		}
		debug!("reheating layout to alpha {target}");
		self.restart();
	}

	/// Lets alpha decay back toward zero without snapping it.
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
	}

	/// Advances one step if the solver is running. Returns whether a step
	/// happened; the solver stops itself once it has cooled.
	pub fn tick(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.step();
		if self.is_idle() {
			self.running = false;
			debug!("layout converged with {} nodes", self.graph.len());
		}
		true
	}

	/// One integration step, regardless of the running flag.
	pub fn step(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		let alpha = self.alpha;

		self.link.apply(&mut self.graph, alpha, &mut self.rng);
		self.charge.apply(&mut self.graph, alpha, &mut self.rng);
		self.center.apply(&mut self.graph);

		let keep = 1.0 - self.config.velocity_decay;
		for node in self.graph.nodes_mut() {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= keep;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= keep;
					node.y += node.vy;
				}
			}
		}
	}

	/// Fixes a node at `(x, y)` until [`Simulation::unpin`].
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.graph.node_mut(idx) {
			node.fx = Some(x);
			node.fy = Some(y);
		}
	}

	pub fn unpin(&mut self, idx: usize) {
		if let Some(node) = self.graph.node_mut(idx) {
			node.fx = None;
			node.fy = None;
		}
	}

	pub fn pinned_count(&self) -> usize {
		self.graph.nodes().iter().filter(|n| n.is_pinned()).count()
	}
}
