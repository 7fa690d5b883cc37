use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::components::canvas;
use crate::graph::engine::{Emphasis, Frame, NodeSprite};

const BACKGROUND: &str = "#1a1a2e";
const CONNECT_COLOR: &str = "#FFB74D";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(frame: &Frame, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, frame.viewport.width, frame.viewport.height);
	ctx.save();
	let _ = ctx.translate(frame.transform.x, frame.transform.y);
	let _ = ctx.scale(frame.transform.k, frame.transform.k);
	draw_edges(frame, ctx);
	for node in &frame.nodes {
		draw_node(frame, node, ctx);
	}
	let k = frame.transform.k.max(0.5);
	for node in &frame.nodes {
		if let Some(text) = &node.tooltip {
			let lift = node.radius * (1.0 + 0.2 * ease_out_cubic(frame.highlight));
			canvas::draw_tooltip(ctx, text, node.center.x, node.center.y - lift, k);
		}
	}
	ctx.restore();
}

fn draw_edges(frame: &Frame, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(frame.highlight);
	for edge in &frame.edges {
		// t=0: every edge at 0.6; t=1: highlighted at 0.9, dimmed at 0.15.
		let (alpha, width) = match edge.emphasis {
			Emphasis::Normal => (0.6, edge.width),
			Emphasis::Highlighted => (0.6 + 0.3 * t, edge.width * (1.0 + 0.5 * t)),
			Emphasis::Dimmed => (0.6 - 0.45 * t, edge.width * (1.0 - 0.3 * t)),
		};
		ctx.set_stroke_style_str(&format!("rgba(150, 160, 180, {alpha})"));
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(edge.from.x, edge.from.y);
		ctx.line_to(edge.to.x, edge.to.y);
		ctx.stroke();
	}
}

fn draw_node(frame: &Frame, node: &NodeSprite, ctx: &CanvasRenderingContext2d) {
	let (t, k) = (ease_out_cubic(frame.highlight), frame.transform.k);
	let (x, y) = (node.center.x, node.center.y);
	let (alpha, radius) = match node.emphasis {
		Emphasis::Dimmed => (1.0 - 0.7 * t, node.radius * (1.0 - 0.15 * t)),
		_ if node.hovered => (1.0, node.radius * (1.0 + 0.2 * t)),
		_ => (1.0, node.radius),
	};

	if node.hovered || node.selected {
		let glow_radius = radius * (1.4 + 0.6 * t);
		let glow = if node.selected { 0.35 } else { 0.35 * t };
		if glow > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius)
			{
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {glow})"));
				let _ = gradient
					.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", glow * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}
	}

	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&node.color);
	ctx.fill();
	ctx.set_stroke_style_str("#fff");
	let outline = if node.selected { 3.0 } else { 1.5 };
	ctx.set_line_width(outline / k.max(0.5));
	ctx.stroke();

	if node.connecting {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(4.0 / k),
			&JsValue::from_f64(3.0 / k),
		));
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + 5.0 / k, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(CONNECT_COLOR);
		ctx.set_line_width(2.0 / k);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}

	let font = 10.0 / k.max(0.5);
	ctx.set_text_align("center");
	ctx.set_fill_style_str("white");
	ctx.set_font(&format!("bold {font}px sans-serif"));
	let _ = ctx.fill_text(&node.label, x, y + radius + font * 1.2);
	ctx.set_fill_style_str("#ccc");
	ctx.set_font(&format!("{}px sans-serif", font * 0.8));
	let _ = ctx.fill_text(&format!("{}", node.score), x, y + radius + font * 2.3);
	ctx.set_global_alpha(1.0);
}
