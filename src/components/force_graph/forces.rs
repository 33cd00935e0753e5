//! The three forces combined by the simulation on every tick.
//!
//! Each force writes velocity deltas (or, for centering, a rigid shift of
//! positions) into the graph's node table, scaled by the current alpha.

use super::graph::Graph;
use super::quadtree::{QuadTree, Visit};

/// Deterministic linear congruential generator, used only to break ties
/// between coincident nodes.
#[derive(Clone, Debug)]
pub struct Lcg(u32);

impl Default for Lcg {
	fn default() -> Self {
		Lcg(1)
	}
}

impl Lcg {
	pub fn next_f64(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		self.0 as f64 / 4_294_967_296.0
	}

	/// A displacement small enough not to be visible but non-zero.
	pub fn jiggle(&mut self) -> f64 {
		(self.next_f64() - 0.5) * 1e-6
	}
}

/// Spring force pulling each linked pair toward `distance`.
#[derive(Clone, Debug)]
pub struct LinkForce {
	pub distance: f64,
	pub iterations: usize,
	strengths: Vec<f64>,
	biases: Vec<f64>,
}

impl LinkForce {
	pub fn new(distance: f64, iterations: usize) -> Self {
		Self {
			distance,
			iterations: iterations.max(1),
			strengths: Vec::new(),
			biases: Vec::new(),
		}
	}

	/// Precomputes per-link stiffness from node degrees. Must be called
	/// whenever the graph's links change.
	pub fn initialize(&mut self, graph: &Graph) {
		(self.strengths, self.biases) = graph
			.links()
			.iter()
			.map(|l| {
				let (ds, dt) = (graph.degree(l.source) as f64, graph.degree(l.target) as f64);
				(1.0 / ds.min(dt), ds / (ds + dt))
			})
			.unzip();
	}

	pub fn apply(&self, graph: &mut Graph, alpha: f64, rng: &mut Lcg) {
		for _ in 0..self.iterations {
			for i in 0..graph.links().len() {
				let link = graph.links()[i];
				let nodes = graph.nodes_mut();
				let (s, t) = (&nodes[link.source], &nodes[link.target]);
				let mut x = t.x + t.vx - s.x - s.vx;
				let mut y = t.y + t.vy - s.y - s.vy;
				if x == 0.0 {
					x = rng.jiggle();
				}
				if y == 0.0 {
					y = rng.jiggle();
				}
				let mut l = (x * x + y * y).sqrt();
				l = (l - self.distance) / l * alpha * self.strengths[i];
				x *= l;
				y *= l;

				let b = self.biases[i];
				let t = &mut nodes[link.target];
				t.vx -= x * b;
				t.vy -= y * b;
				let s = &mut nodes[link.source];
				s.vx += x * (1.0 - b);
				s.vy += y * (1.0 - b);
			}
		}
	}
}

/// N-body repulsion (negative strength) approximated with Barnes–Hut.
#[derive(Clone, Debug)]
pub struct ManyBodyForce {
	pub strength: f64,
	pub theta2: f64,
	pub distance_min2: f64,
}

impl ManyBodyForce {
	pub fn new(strength: f64, theta: f64) -> Self {
		Self {
			strength,
			theta2: theta * theta,
			distance_min2: 1.0,
		}
	}

	pub fn apply(&self, graph: &mut Graph, alpha: f64, rng: &mut Lcg) {
		if graph.is_empty() {
			return;
		}
		let points: Vec<(f64, f64)> = graph.nodes().iter().map(|n| (n.x, n.y)).collect();
		let charges = vec![self.strength; points.len()];
		let tree = QuadTree::build(&points, &charges);

		for (i, &(xi, yi)) in points.iter().enumerate() {
			let (mut dvx, mut dvy) = (0.0, 0.0);
			tree.visit(|visit| match visit {
				Visit::Cell(cell) => {
					let (mut dx, mut dy) = (cell.cx - xi, cell.cy - yi);
					let w = cell.size();
					let mut l = dx * dx + dy * dy;
					// A cell holding the node itself is never summarised.
					if cell.contains(xi, yi) || w * w / self.theta2 >= l {
						return false;
					}
					if dx == 0.0 {
						dx = rng.jiggle();
						l += dx * dx;
					}
					if dy == 0.0 {
						dy = rng.jiggle();
						l += dy * dy;
					}
					if l < self.distance_min2 {
						l = (self.distance_min2 * l).sqrt();
					}
					dvx += dx * cell.charge * alpha / l;
					dvy += dy * cell.charge * alpha / l;
					true
				}
				Visit::Points(members) => {
					for &j in members {
						if j == i {
							continue;
						}
						let (xj, yj) = points[j];
						let (mut dx, mut dy) = (xj - xi, yj - yi);
						if dx == 0.0 {
							dx = rng.jiggle();
						}
						if dy == 0.0 {
							dy = rng.jiggle();
						}
						let mut l = dx * dx + dy * dy;
						if l < self.distance_min2 {
							l = (self.distance_min2 * l).sqrt();
						}
						let w = charges[j] * alpha / l;
						dvx += dx * w;
						dvy += dy * w;
					}
					true
				}
			});
			let node = &mut graph.nodes_mut()[i];
			node.vx += dvx;
			node.vy += dvy;
		}
	}
}

/// Translates every node so that the mean position sits on `(x, y)`.
#[derive(Clone, Debug)]
pub struct CenterForce {
	pub x: f64,
	pub y: f64,
	pub strength: f64,
}

impl CenterForce {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y, strength: 1.0 }
	}

	pub fn apply(&self, graph: &mut Graph) {
		let n = graph.len();
		if n == 0 {
			return;
		}
		let (sx, sy) = graph
			.nodes()
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (sx, sy) = (
			(sx / n as f64 - self.x) * self.strength,
			(sy / n as f64 - self.y) * self.strength,
		);
		for node in graph.nodes_mut() {
			node.x -= sx;
			node.y -= sy;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	fn graph(positions: &[(f64, f64)], links: &[(usize, usize)]) -> Graph {
		let nodes = (0..positions.len())
			.map(|i| GraphNode {
				id: i.to_string(),
				citations: 0.0,
			})
			.collect();
		let links = links
			.iter()
			.map(|&(s, t)| GraphLink {
				source: s.to_string(),
				target: t.to_string(),
			})
			.collect();
		let mut g = Graph::load(nodes, links, (0.0, 0.0)).unwrap();
		for (node, &(x, y)) in g.nodes_mut().iter_mut().zip(positions) {
			node.x = x;
			node.y = y;
		}
		g
	}

	/// Direct O(n²) sum of the same repulsion, for comparison.
	fn brute_force(g: &Graph, strength: f64, alpha: f64) -> Vec<(f64, f64)> {
		let nodes = g.nodes();
		nodes
			.iter()
			.enumerate()
			.map(|(i, a)| {
				let mut v = (0.0, 0.0);
				for (j, b) in nodes.iter().enumerate() {
					if i == j {
						continue;
					}
					let (dx, dy) = (b.x - a.x, b.y - a.y);
					let l = (dx * dx + dy * dy).max(1.0);
					v.0 += dx * strength * alpha / l;
					v.1 += dy * strength * alpha / l;
				}
				v
			})
			.collect()
	}

	#[test]
	fn stretched_link_pulls_endpoints_together() {
		let mut g = graph(&[(0.0, 0.0), (200.0, 0.0)], &[(0, 1)]);
		let mut force = LinkForce::new(80.0, 1);
		force.initialize(&g);
		force.apply(&mut g, 1.0, &mut Lcg::default());
		let (a, b) = (&g.nodes()[0], &g.nodes()[1]);
		assert!(a.vx > 0.0);
		assert!(b.vx < 0.0);
		// Equal degrees split the correction evenly: (200 - 80) / 2 each.
		assert!((a.vx - 60.0).abs() < 1e-9);
		assert!((b.vx + 60.0).abs() < 1e-9);
	}

	#[test]
	fn extra_iterations_refine_toward_link_distance() {
		let mut g = graph(&[(0.0, 0.0), (200.0, 0.0)], &[(0, 1)]);
		let mut force = LinkForce::new(80.0, 2);
		force.initialize(&g);
		force.apply(&mut g, 1.0, &mut Lcg::default());
		let (a, b) = (&g.nodes()[0], &g.nodes()[1]);
		// The second pass sees the first pass's velocities and has nothing left to correct.
		let predicted = (b.x + b.vx) - (a.x + a.vx);
		assert!((predicted - 80.0).abs() < 1e-6, "predicted separation {predicted}");
		assert_eq!(g.links().len(), 1);
	}

	#[test]
	fn compressed_link_pushes_endpoints_apart() {
		let mut g = graph(&[(0.0, 0.0), (10.0, 0.0)], &[(0, 1)]);
		let mut force = LinkForce::new(80.0, 1);
		force.initialize(&g);
		force.apply(&mut g, 0.5, &mut Lcg::default());
		assert!(g.nodes()[0].vx < 0.0);
		assert!(g.nodes()[1].vx > 0.0);
	}

	#[test]
	fn repulsion_pushes_nodes_apart() {
		let mut g = graph(&[(0.0, 0.0), (10.0, 0.0)], &[]);
		ManyBodyForce::new(-120.0, 0.9).apply(&mut g, 1.0, &mut Lcg::default());
		assert!(g.nodes()[0].vx < 0.0);
		assert!(g.nodes()[1].vx > 0.0);
		assert!((g.nodes()[0].vx + g.nodes()[1].vx).abs() < 1e-9);
	}

	#[test]
	fn barnes_hut_tracks_the_exact_sum() {
		let positions: Vec<_> = (0..200)
			.map(|i| {
				let a = i as f64 * 2.399963;
				let r = 10.0 * (0.5 + i as f64).sqrt();
				(r * a.cos(), r * a.sin())
			})
			.collect();
		let mut g = graph(&positions, &[]);
		let exact = brute_force(&g, -120.0, 1.0);
		ManyBodyForce::new(-120.0, 0.9).apply(&mut g, 1.0, &mut Lcg::default());
		let (mut err, mut mag) = (0.0, 0.0);
		for (node, &(ex, ey)) in g.nodes().iter().zip(&exact) {
			err += (node.vx - ex).powi(2) + (node.vy - ey).powi(2);
			mag += ex * ex + ey * ey;
		}
		let rel = (err / mag).sqrt();
		assert!(rel < 0.15, "approximation drifted by {rel}");
	}

	#[test]
	fn coincident_nodes_still_separate() {
		let mut g = graph(&[(5.0, 5.0), (5.0, 5.0)], &[]);
		ManyBodyForce::new(-120.0, 0.9).apply(&mut g, 1.0, &mut Lcg::default());
		let (a, b) = (&g.nodes()[0], &g.nodes()[1]);
		assert!(a.vx != 0.0 || a.vy != 0.0);
		assert!(a.vx.is_finite() && b.vy.is_finite());
	}

	#[test]
	fn centering_moves_mean_to_target() {
		let mut g = graph(&[(0.0, 0.0), (10.0, 20.0), (-4.0, 7.0)], &[]);
		CenterForce::new(300.0, 200.0).apply(&mut g);
		let n = g.len() as f64;
		let mx = g.nodes().iter().map(|n| n.x).sum::<f64>() / n;
		let my = g.nodes().iter().map(|n| n.y).sum::<f64>() / n;
		assert!((mx - 300.0).abs() < 1e-9);
		assert!((my - 200.0).abs() < 1e-9);
	}

	#[test]
	fn lcg_is_deterministic_and_bounded() {
		let (mut a, mut b) = (Lcg::default(), Lcg::default());
		for _ in 0..100 {
			let (x, y) = (a.jiggle(), b.jiggle());
			assert_eq!(x, y);
			assert!(x.abs() <= 5e-7);
		}
	}
}
