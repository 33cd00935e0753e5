//! Barnes–Hut quadtree used by the many-body force.
//!
//! Cells are kept in a flat arena. Each cell accumulates the summed charge
//! of the points below it and their charge-weighted centroid, so a distant
//! cell can stand in for all of its points.

/// Cells smaller than this stop subdividing; nearly coincident points share a leaf.
const MIN_CELL_SIZE: f64 = 1e-6;

#[derive(Clone, Debug)]
enum Contents {
	Empty,
	Leaf(Vec<usize>),
	Internal([usize; 4]),
}

#[derive(Clone, Debug)]
pub struct Cell {
	x0: f64,
	y0: f64,
	size: f64,
	contents: Contents,
	/// Sum of point charges.
	pub charge: f64,
	/// Charge-weighted centroid.
	pub cx: f64,
	pub cy: f64,
}

impl Cell {
	fn new(x0: f64, y0: f64, size: f64) -> Self {
		Self {
			x0,
			y0,
			size,
			contents: Contents::Empty,
			charge: 0.0,
			cx: 0.0,
			cy: 0.0,
		}
	}

	pub fn size(&self) -> f64 {
		self.size
	}

	pub fn contains(&self, x: f64, y: f64) -> bool {
		x >= self.x0 && x < self.x0 + self.size && y >= self.y0 && y < self.y0 + self.size
	}

	fn quadrant(&self, x: f64, y: f64) -> usize {
		let half = self.size / 2.0;
		let right = x >= self.x0 + half;
		let bottom = y >= self.y0 + half;
		(bottom as usize) << 1 | right as usize
	}
}

/// What the visitor sees at each cell.
pub enum Visit<'a> {
	/// A cell that may be summarised by its centroid and charge.
	Cell(&'a Cell),
	/// The points of a leaf, for exact pairwise interaction.
	Points(&'a [usize]),
}

#[derive(Clone, Debug)]
pub struct QuadTree {
	cells: Vec<Cell>,
}

impl QuadTree {
	/// Builds a tree over `points`, with `charges[i]` the charge of point `i`.
	pub fn build(points: &[(f64, f64)], charges: &[f64]) -> Self {
		let Some(&(fx, fy)) = points.first() else {
			return Self {
				cells: vec![Cell::new(0.0, 0.0, 1.0)],
			};
		};

		let (mut min_x, mut min_y, mut max_x, mut max_y) = (fx, fy, fx, fy);
		for &(x, y) in points {
			min_x = min_x.min(x);
			min_y = min_y.min(y);
			max_x = max_x.max(x);
			max_y = max_y.max(y);
		}
		// Square bounds, slightly padded so max_x/max_y fall inside the root.
		let size = (max_x - min_x).max(max_y - min_y).max(1.0) * (1.0 + 1e-9) + 1e-9;

		let mut tree = Self {
			cells: vec![Cell::new(min_x, min_y, size)],
		};
		for (idx, &(x, y)) in points.iter().enumerate() {
			tree.insert(0, idx, x, y, points);
		}
		tree.accumulate(0, points, charges);
		tree
	}

	pub fn root(&self) -> &Cell {
		&self.cells[0]
	}

	fn insert(&mut self, root: usize, idx: usize, x: f64, y: f64, points: &[(f64, f64)]) {
		let mut cell = root;
		loop {
			let size = self.cells[cell].size;
			let quadrant = self.cells[cell].quadrant(x, y);
			match &mut self.cells[cell].contents {
				Contents::Empty => {
					self.cells[cell].contents = Contents::Leaf(vec![idx]);
					return;
				}
				Contents::Internal(children) => cell = children[quadrant],
				Contents::Leaf(members) => {
					let (lx, ly) = points[members[0]];
					if (lx == x && ly == y) || size < MIN_CELL_SIZE {
						members.push(idx);
						return;
					}
					let members = std::mem::take(members);
					self.split(cell);
					for m in members {
						let (mx, my) = points[m];
						let q = self.cells[cell].quadrant(mx, my);
						let child = self.child(cell, q);
						self.place(child, m);
					}
					// Retry the new point against the freshly split cell.
				}
			}
		}
	}

	fn split(&mut self, cell: usize) {
		let Cell { x0, y0, size, .. } = self.cells[cell];
		let half = size / 2.0;
		let base = self.cells.len();
		self.cells.push(Cell::new(x0, y0, half));
		self.cells.push(Cell::new(x0 + half, y0, half));
		self.cells.push(Cell::new(x0, y0 + half, half));
		self.cells.push(Cell::new(x0 + half, y0 + half, half));
		self.cells[cell].contents = Contents::Internal([base, base + 1, base + 2, base + 3]);
	}

	fn child(&self, cell: usize, quadrant: usize) -> usize {
		match &self.cells[cell].contents {
			Contents::Internal(children) => children[quadrant],
			_ => unreachable!("child() on a cell that was just split"),
		}
	}

	/// Moves an existing leaf member into a freshly created child. The
	/// members of one leaf are all coincident, so they land together.
	fn place(&mut self, cell: usize, idx: usize) {
		match &mut self.cells[cell].contents {
			Contents::Leaf(members) => members.push(idx),
			contents => *contents = Contents::Leaf(vec![idx]),
		}
	}

	fn accumulate(&mut self, cell: usize, points: &[(f64, f64)], charges: &[f64]) {
		let (mut charge, mut weight, mut sx, mut sy) = (0.0, 0.0, 0.0, 0.0);
		match self.cells[cell].contents.clone() {
			Contents::Empty => {}
			Contents::Leaf(members) => {
				for m in members {
					let (x, y) = points[m];
					let c = charges[m];
					charge += c;
					weight += c.abs();
					sx += c.abs() * x;
					sy += c.abs() * y;
				}
			}
			Contents::Internal(children) => {
				for child in children {
					self.accumulate(child, points, charges);
					let c = &self.cells[child];
					charge += c.charge;
					let w = c.charge.abs();
					weight += w;
					sx += w * c.cx;
					sy += w * c.cy;
				}
			}
		}
		let target = &mut self.cells[cell];
		target.charge = charge;
		if weight > 0.0 {
			target.cx = sx / weight;
			target.cy = sy / weight;
		}
	}

	/// Depth-first traversal. The callback returns `true` to skip a cell's
	/// children; leaves are reported as [`Visit::Points`] only when the cell
	/// itself was not accepted.
	pub fn visit(&self, mut f: impl FnMut(Visit<'_>) -> bool) {
		let mut stack = vec![0usize];
		while let Some(idx) = stack.pop() {
			let cell = &self.cells[idx];
			if matches!(cell.contents, Contents::Empty) {
				continue;
			}
			if f(Visit::Cell(cell)) {
				continue;
			}
			match &cell.contents {
				Contents::Empty => {}
				Contents::Leaf(members) => {
					f(Visit::Points(members));
				}
				Contents::Internal(children) => stack.extend(children.iter().rev()),
			}
		}
	}
}
