use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::graph::Graph;
use super::scale::{Rgb, node_color, node_radius};
use super::viewport::ViewTransform;

const BACKGROUND: &str = "#ffffff";
const LINK_COLOR: &str = "#333333";
const LINK_OPACITY: f64 = 0.4;
const TOOLTIP_FONT_PX: f64 = 12.0;

/// A node as drawn: layout-space center, radius and fill.
#[derive(Clone, Debug, PartialEq)]
pub struct Circle {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub color: Rgb,
}

/// A link as drawn, between its endpoints' current positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
}

/// Everything a sink needs to draw one frame.
pub struct Frame<'a> {
	pub graph: &'a Graph,
	pub transform: &'a ViewTransform,
	pub hovered: Option<usize>,
	pub width: f64,
	pub height: f64,
}

impl Frame<'_> {
	pub fn circles(&self) -> impl Iterator<Item = Circle> + '_ {
		self.graph.nodes().iter().map(|n| Circle {
			x: n.x,
			y: n.y,
			radius: node_radius(n.citations),
			color: node_color(n.citations),
		})
	}

	pub fn lines(&self) -> impl Iterator<Item = Segment> + '_ {
		self.graph.links().iter().map(|l| {
			let ((x1, y1), (x2, y2)) = self.graph.link_endpoints(l);
			Segment { x1, y1, x2, y2 }
		})
	}
}

/// Consumer of layout frames, redrawn after every solver tick.
pub trait RenderSink {
	fn draw(&mut self, frame: &Frame<'_>);
}

/// Draws frames onto a 2D canvas.
pub struct CanvasSink {
	ctx: CanvasRenderingContext2d,
}

impl CanvasSink {
	pub fn new(ctx: CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}
}

impl RenderSink for CanvasSink {
	fn draw(&mut self, frame: &Frame<'_>) {
		let ctx = &self.ctx;
		let t = frame.transform;
		ctx.set_fill_style_str(BACKGROUND);
		ctx.fill_rect(0.0, 0.0, frame.width, frame.height);
		ctx.save();
		let _ = ctx.translate(t.x, t.y);
		let _ = ctx.scale(t.k, t.k);
		draw_links(frame, ctx);
		draw_nodes(frame, ctx);
		ctx.restore();
		draw_tooltip(frame, ctx);
	}
}

fn draw_links(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d) {
	ctx.set_global_alpha(LINK_OPACITY);
	ctx.set_stroke_style_str(LINK_COLOR);
	ctx.set_line_width(1.0 / frame.transform.k);
	ctx.begin_path();
	for s in frame.lines() {
		ctx.move_to(s.x1, s.y1);
		ctx.line_to(s.x2, s.y2);
	}
	ctx.stroke();
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d) {
	for c in frame.circles() {
		ctx.begin_path();
		let _ = ctx.arc(c.x, c.y, c.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&c.color.to_string());
		ctx.fill();
	}
}

/// Screen-space label for the hovered node, in place of an SVG `<title>`.
fn draw_tooltip(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d) {
	let Some(node) = frame.hovered.and_then(|i| frame.graph.node(i)) else {
		return;
	};
	let (sx, sy) = frame.transform.apply((node.x, node.y));
	let offset = node_radius(node.citations) * frame.transform.k + 6.0;
	let lines = [
		format!("ID: {}", node.id),
		format!("Citations: {}", node.citations),
	];

	ctx.set_font(&format!("{TOOLTIP_FONT_PX}px sans-serif"));
	let width = lines
		.iter()
		.filter_map(|l| ctx.measure_text(l).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max);
	let (x, y) = (sx + offset, sy + offset);
	let line_height = TOOLTIP_FONT_PX + 4.0;

	ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
	ctx.fill_rect(x - 4.0, y - 4.0, width + 8.0, line_height * lines.len() as f64 + 4.0);
	ctx.set_stroke_style_str(LINK_COLOR);
	ctx.set_line_width(1.0);
	ctx.stroke_rect(x - 4.0, y - 4.0, width + 8.0, line_height * lines.len() as f64 + 4.0);
	ctx.set_fill_style_str("#111111");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x, y + TOOLTIP_FONT_PX + line_height * i as f64);
	}
}
