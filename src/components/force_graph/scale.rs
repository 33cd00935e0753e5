//! Node size and color as functions of citation count.

use std::fmt;

/// Citation count mapped to the top of the color ramp. Counts above it
/// saturate. This is a fixed policy, not derived from the data.
pub const COLOR_SCALE_MAX_CITATIONS: f64 = 60.0;

/// Smallest drawn node radius.
pub const MIN_RADIUS: f64 = 3.0;

/// Viridis sampled at t = k/8 for k in 0..=8.
const VIRIDIS: [Rgb; 9] = [
	Rgb(68, 1, 84),
	Rgb(71, 45, 123),
	Rgb(59, 82, 139),
	Rgb(44, 114, 142),
	Rgb(33, 145, 140),
	Rgb(40, 174, 128),
	Rgb(94, 201, 98),
	Rgb(173, 220, 48),
	Rgb(253, 231, 37),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
	}
}

pub fn node_radius(citations: f64) -> f64 {
	citations.max(0.0).sqrt().max(MIN_RADIUS)
}

pub fn node_color(citations: f64) -> Rgb {
	viridis(citations / COLOR_SCALE_MAX_CITATIONS)
}

/// Piecewise-linear viridis; `t` is clamped to `[0, 1]`.
pub fn viridis(t: f64) -> Rgb {
	let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
	let scaled = t * (VIRIDIS.len() - 1) as f64;
	let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
	let f = scaled - i as f64;
	let (a, b) = (VIRIDIS[i], VIRIDIS[i + 1]);
	let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * f).round() as u8;
	Rgb(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn radius_has_a_floor_of_three() {
		assert_eq!(node_radius(0.0), 3.0);
		assert_eq!(node_radius(4.0), 3.0);
		assert_eq!(node_radius(9.0), 3.0);
		assert_eq!(node_radius(25.0), 5.0);
		assert_eq!(node_radius(-1.0), 3.0);
	}

	#[test]
	fn color_ramp_endpoints() {
		assert_eq!(node_color(0.0), Rgb(68, 1, 84));
		assert_eq!(node_color(60.0), Rgb(253, 231, 37));
		assert_eq!(node_color(600.0), Rgb(253, 231, 37));
		assert_eq!(node_color(30.0), Rgb(33, 145, 140));
	}

	#[test]
	fn stops_match_viridis_at_eighths() {
		assert_eq!(viridis(0.5).to_string(), "#21918c");
		assert_eq!(viridis(0.75).to_string(), "#5ec962");
		assert_eq!(viridis(0.875).to_string(), "#addc30");
		assert_eq!(node_color(45.0).to_string(), "#5ec962");
	}

	#[test]
	fn color_interpolates_between_stops() {
		let Rgb(r, g, b) = viridis(1.0 / 16.0);
		assert_eq!((r, g, b), (70, 23, 104));
	}

	#[test]
	fn formats_as_css_hex() {
		assert_eq!(Rgb(253, 231, 37).to_string(), "#fde725");
	}
}
