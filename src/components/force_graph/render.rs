//! Canvas rendering for the graph.
//!
//! Draws in three passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edges with arrowheads, then nodes and labels (world space, camera applied)
//! 3. Title and zoom indicator overlays (screen space)
//!
//! Edges or nodes without simulation state are skipped rather than failing
//! the frame.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::selection::Selection;
use super::state::{GraphState, NodeSnapshot, Snapshot, node_color};
use super::theme::{Color, Theme};
use super::types::GraphNode;
use super::vector::{Vec2, intersection};

/// Renders the complete graph to the canvas.
pub fn render(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	selection: &impl Selection,
) {
	let snapshot = state.snapshot();
	let camera = snapshot.camera;

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(camera.pan.x, camera.pan.y);
	let _ = ctx.scale(camera.zoom, camera.zoom);

	draw_edges(state, &snapshot, ctx, theme);
	for node in &state.props.nodes {
		if let Some(s) = snapshot.nodes.get(&node.id) {
			let selected = selection.is_selected(&state.element_key, &node.id);
			draw_node(ctx, node, s, selected, theme);
		}
	}

	ctx.restore();

	draw_overlays(state, ctx, theme);
}

fn draw_background(state: &GraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_fill_style_str(&theme.background.color.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	ctx.set_stroke_style_str(&theme.background.border.to_css());
	ctx.set_line_width(1.0);
	ctx.stroke_rect(0.5, 0.5, state.width - 1.0, state.height - 1.0);
}

fn draw_edges(
	state: &GraphState,
	snapshot: &Snapshot,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
) {
	let style = &theme.edge;
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	for edge in &state.props.edges {
		let (Some(u), Some(v)) = (snapshot.nodes.get(&edge.source), snapshot.nodes.get(&edge.target))
		else {
			continue;
		};
		if u.position == v.position {
			continue;
		}

		let end = intersection(u.position, v.position, v.radius + style.target_gap);

		ctx.set_stroke_style_str(&style.color.to_css());
		ctx.set_line_width(style.width);
		ctx.begin_path();
		ctx.move_to(u.position.x, u.position.y);
		ctx.line_to(end.x, end.y);
		ctx.stroke();

		draw_arrowhead(ctx, u.position, end, style.arrow_size, style.arrow_color);
	}
}

/// Filled triangle with its tip at `tip`, pointing along `from -> tip`.
fn draw_arrowhead(ctx: &CanvasRenderingContext2d, from: Vec2, tip: Vec2, size: f64, color: Color) {
	let dir = (tip - from).normalize();
	if dir == Vec2::ZERO {
		return;
	}
	let back = tip - dir * size;
	let side = Vec2::new(-dir.y, dir.x) * (size * 0.5);

	ctx.set_fill_style_str(&color.to_css());
	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(back.x + side.x, back.y + side.y);
	ctx.line_to(back.x - side.x, back.y - side.y);
	ctx.close_path();
	ctx.fill();
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &GraphNode,
	s: &NodeSnapshot,
	selected: bool,
	theme: &Theme,
) {
	let style = &theme.node;
	let (x, y, r) = (s.position.x, s.position.y, s.radius);
	let color = node_color(node);

	ctx.begin_path();
	let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&style.fill.to_css());
	ctx.fill();

	// Colors the canvas can't parse (e.g. CSS variables) still get a stroke.
	if let Some(tint) = Color::parse(&color) {
		let alpha = if selected {
			style.selected_tint_alpha
		} else {
			style.tint_alpha
		};
		ctx.set_fill_style_str(&tint.with_alpha(alpha * tint.a).to_css());
		ctx.fill();
	}

	if selected {
		ctx.set_stroke_style_str(&style.selected_stroke.to_css());
		ctx.set_line_width(style.selected_stroke_width);
	} else {
		ctx.set_stroke_style_str(&color);
		ctx.set_line_width(style.stroke_width);
	}
	ctx.stroke();

	if let Some(label) = node.label.as_deref().filter(|l| !l.is_empty()) {
		draw_label(ctx, label, x, y, theme);
	}
}

/// Centered label pill.
fn draw_label(ctx: &CanvasRenderingContext2d, label: &str, x: f64, y: f64, theme: &Theme) {
	let style = &theme.label;
	ctx.set_font(&style.font);
	let text_width = ctx
		.measure_text(label)
		.map(|m| m.width())
		.unwrap_or(label.chars().count() as f64 * 7.0);
	let (w, h) = (text_width + style.padding * 2.0, style.height);
	let (left, top) = (x - w / 2.0, y - h / 2.0);

	ctx.begin_path();
	ctx.rect(left, top, w, h);
	ctx.set_fill_style_str(&style.background.to_css());
	ctx.fill();
	ctx.set_stroke_style_str(&style.border.to_css());
	ctx.set_line_width(1.0);
	ctx.stroke();

	ctx.set_fill_style_str(&style.text.to_css());
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(label, x, y);
}

fn draw_overlays(state: &GraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let style = &theme.overlay;

	if let Some(title) = state.props.title.as_deref().filter(|t| !t.is_empty()) {
		ctx.set_font(&style.title_font);
		ctx.set_text_align("left");
		ctx.set_text_baseline("middle");
		let width = ctx
			.measure_text(title)
			.map(|m| m.width())
			.unwrap_or(title.chars().count() as f64 * 8.0);

		ctx.set_fill_style_str(&style.background.to_css());
		ctx.fill_rect(16.0, 16.0, width + 16.0, 26.0);
		ctx.set_stroke_style_str(&theme.background.border.to_css());
		ctx.stroke_rect(16.0, 16.0, width + 16.0, 26.0);
		ctx.set_fill_style_str(&style.text.to_css());
		let _ = ctx.fill_text(title, 24.0, 29.0);
	}

	ctx.set_font(&style.hint_font);
	ctx.set_text_align("right");
	ctx.set_text_baseline("bottom");
	ctx.set_fill_style_str(&style.muted.to_css());
	let _ = ctx.fill_text(
		&format!("Zoom: {}%", state.camera().zoom_percent()),
		state.width - 10.0,
		state.height - 10.0,
	);
}
