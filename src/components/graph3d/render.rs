use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use crate::components::canvas;
use crate::graph::engine::Emphasis;
use crate::graph::scene3d::{Frame3d, SphereSprite};

const BACKGROUND: &str = "#0f172a";
const RING_COLOR: &str = "#7DE3F4";
const CONNECT_COLOR: &str = "#FFB74D";

pub fn render(frame: &Frame3d, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, frame.viewport.width, frame.viewport.height);

	for arc in &frame.arcs {
		let (alpha, scale) = match arc.emphasis {
			Emphasis::Normal => (0.5, 1.0),
			Emphasis::Highlighted => (0.9, 1.6),
			Emphasis::Dimmed => (0.15, 0.8),
		};
		let Some((first, rest)) = arc.points.split_first() else {
			continue;
		};
		ctx.set_stroke_style_str(&format!("rgba(148, 163, 184, {alpha})"));
		ctx.set_line_width(arc.width * scale);
		ctx.begin_path();
		ctx.move_to(first.x, first.y);
		for p in rest {
			ctx.line_to(p.x, p.y);
		}
		ctx.stroke();
	}

	for sphere in &frame.spheres {
		draw_sphere(sphere, frame.pulse, ctx);
	}
	for sphere in &frame.spheres {
		if let Some(text) = &sphere.tooltip {
			canvas::draw_tooltip(ctx, text, sphere.screen.x, sphere.screen.y - sphere.radius, 1.0);
		}
	}
}

fn draw_sphere(sphere: &SphereSprite, pulse: f64, ctx: &CanvasRenderingContext2d) {
	let (x, y) = (sphere.screen.x, sphere.screen.y);
	let radius = if sphere.selected {
		sphere.radius * pulse
	} else if sphere.hovered {
		sphere.radius * 1.15
	} else {
		sphere.radius
	};
	ctx.set_global_alpha(if sphere.emphasis == Emphasis::Dimmed { 0.35 } else { 1.0 });

	// Shade with a radial gradient whose bright spot faces the light.
	let (hx, hy) = (x + sphere.light.x * 0.6, y + sphere.light.y * 0.6);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	match ctx.create_radial_gradient(hx, hy, radius * 0.1, x, y, radius) {
		Ok(gradient) => {
			let _ = gradient.add_color_stop(0.0, "rgba(255, 255, 255, 0.9)");
			let _ = gradient.add_color_stop(0.35, &sphere.color);
			let _ = gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0.85)");
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Err(_) => ctx.set_fill_style_str(&sphere.color),
	}
	ctx.fill();

	if sphere.selected {
		ctx.begin_path();
		let _ = ctx.ellipse(
			x,
			y + radius * 0.2,
			radius * 1.5 * pulse,
			radius * 0.5 * pulse,
			0.0,
			0.0,
			2.0 * PI,
		);
		ctx.set_stroke_style_str(RING_COLOR);
		ctx.set_line_width(2.5);
		ctx.stroke();
	}
	if sphere.connecting {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + 6.0, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(CONNECT_COLOR);
		ctx.set_line_width(2.0);
		ctx.stroke();
	}

	if !sphere.hovered && (sphere.selected || radius > 12.0) {
		ctx.set_text_align("center");
		ctx.set_fill_style_str("white");
		ctx.set_font("11px sans-serif");
		let _ = ctx.fill_text(&sphere.label, x, y - radius - 6.0);
	}
	ctx.set_global_alpha(1.0);
}
