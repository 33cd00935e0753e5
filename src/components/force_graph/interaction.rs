//! Pointer gestures: panning the view or dragging a node, never both.

use super::session::Session;

/// Wheel delta units, as reported by `WheelEvent.deltaMode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeltaMode {
	Pixel,
	Line,
	Page,
}

impl DeltaMode {
	pub fn from_dom(mode: u32) -> Self {
		match mode {
			1 => DeltaMode::Line,
			2 => DeltaMode::Page,
			_ => DeltaMode::Pixel,
		}
	}

	fn factor(self) -> f64 {
		match self {
			DeltaMode::Pixel => 0.002,
			DeltaMode::Line => 0.05,
			DeltaMode::Page => 1.0,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
	#[default]
	Idle,
	Panning {
		last: (f64, f64),
	},
	Dragging {
		node: usize,
		/// Node position minus pointer position, in layout space.
		offset: (f64, f64),
	},
}

/// What the host should do with the originating DOM event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerOutcome {
	/// The event started a node drag and must not reach the pan handler.
	Consumed,
	Passthrough,
}

#[derive(Clone, Debug, Default)]
pub struct InteractionController {
	gesture: Gesture,
}

impl InteractionController {
	pub fn gesture(&self) -> Gesture {
		self.gesture
	}

	/// A drag or pan is in progress.
	pub fn is_active(&self) -> bool {
		self.gesture != Gesture::Idle
	}

	pub fn is_dragging(&self) -> bool {
		matches!(self.gesture, Gesture::Dragging { .. })
	}

	pub fn pointer_down(&mut self, session: &mut Session, screen: (f64, f64)) -> PointerOutcome {
		if self.gesture != Gesture::Idle {
			return PointerOutcome::Passthrough;
		}
		let (wx, wy) = session.transform().invert(screen);
		let hit = session.node_at(screen);
		let Some((node, sim)) = hit.zip(session.simulation_mut()) else {
			self.gesture = Gesture::Panning { last: screen };
			return PointerOutcome::Passthrough;
		};
		let Some((nx, ny)) = sim.graph().node(node).map(|n| (n.x, n.y)) else {
			return PointerOutcome::Passthrough;
		};
		sim.pin(node, nx, ny);
		sim.reheat();
		session.set_hovered(None);
		self.gesture = Gesture::Dragging {
			node,
			offset: (nx - wx, ny - wy),
		};
		PointerOutcome::Consumed
	}

	pub fn pointer_move(&mut self, session: &mut Session, screen: (f64, f64)) {
		match self.gesture {
			Gesture::Idle => {
				let hovered = session.node_at(screen);
				session.set_hovered(hovered);
			}
			Gesture::Panning { last } => {
				session
					.transform_mut()
					.translate_by(screen.0 - last.0, screen.1 - last.1);
				self.gesture = Gesture::Panning { last: screen };
			}
			Gesture::Dragging { node, offset } => {
				let (wx, wy) = session.transform().invert(screen);
				if let Some(sim) = session.simulation_mut() {
					sim.pin(node, wx + offset.0, wy + offset.1);
				}
			}
		}
	}

	pub fn pointer_up(&mut self, session: &mut Session) {
		if let Gesture::Dragging { node, .. } = self.gesture {
			if let Some(sim) = session.simulation_mut() {
				sim.unpin(node);
				if sim.pinned_count() == 0 {
					sim.cool();
				}
			}
		}
		self.gesture = Gesture::Idle;
	}

	/// The pointer left the canvas. Only hover is cleared; a drag or pan keeps
	/// going until [`InteractionController::pointer_up`], wherever it happens.
	pub fn pointer_leave(&mut self, session: &mut Session) {
		session.set_hovered(None);
	}

	/// Zooms about the pointer by `2^(-delta · unit)`.
	pub fn wheel(&mut self, session: &mut Session, screen: (f64, f64), delta_y: f64, mode: DeltaMode) {
		let factor = (-delta_y * mode.factor()).exp2();
		session.transform_mut().scale_about(screen, factor);
	}

	/// Zooms in 2x about the pointer, whether or not a node is under it.
	pub fn double_click(&mut self, session: &mut Session, screen: (f64, f64)) {
		if self.gesture == Gesture::Idle {
			session.transform_mut().scale_about(screen, 2.0);
		}
	}

	/// Drops any gesture tied to the previous dataset's nodes.
	pub fn reset(&mut self) {
		self.gesture = Gesture::Idle;
	}
}
