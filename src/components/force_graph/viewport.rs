/// Smallest allowed zoom factor.
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed zoom factor.
pub const MAX_SCALE: f64 = 4.0;

/// Pan/zoom transform applied to the whole scene: `screen = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn apply(&self, (wx, wy): (f64, f64)) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	/// Maps a screen point back into layout space.
	pub fn invert(&self, (sx, sy): (f64, f64)) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn translate_by(&mut self, dx: f64, dy: f64) {
		self.x += dx;
		self.y += dy;
	}

	/// Multiplies the scale by `factor`, keeping `anchor` (screen space)
	/// fixed. The scale saturates at [`MIN_SCALE`] and [`MAX_SCALE`].
	pub fn scale_about(&mut self, anchor: (f64, f64), factor: f64) {
		let world = self.invert(anchor);
		self.set_scale(self.k * factor);
		self.x = anchor.0 - world.0 * self.k;
		self.y = anchor.1 - world.1 * self.k;
	}

	pub fn set_scale(&mut self, k: f64) {
		self.k = if k.is_nan() {
			self.k
		} else {
			k.clamp(MIN_SCALE, MAX_SCALE)
		};
	}
}
