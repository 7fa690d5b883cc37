//! Browser glue shared by the 2D and 3D canvases.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent, ResizeObserver,
};

use crate::graph::Point;

/// Seconds per animation frame assumed by the easing code.
pub const FRAME_DT: f64 = 0.016;

pub fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

pub fn client_point(ev: &MouseEvent) -> Point {
	Point::new(ev.client_x() as f64, ev.client_y() as f64)
}

/// Canvas top-left in client coordinates.
pub fn canvas_origin(canvas: &HtmlCanvasElement) -> Point {
	let rect = canvas.get_bounding_client_rect();
	Point::new(rect.left(), rect.top())
}

/// Size the canvas should take. May be zero before the container is laid
/// out; the engines substitute their fallback size.
pub fn measure(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		let window = web_sys::window();
		let side = |v: Option<Result<JsValue, JsValue>>| {
			v.and_then(Result::ok)
				.and_then(|v| v.as_f64())
				.unwrap_or(0.0)
		};
		return (
			side(window.as_ref().map(|w| w.inner_width())),
			side(window.as_ref().map(|w| w.inner_height())),
		);
	}
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| parent.as_ref().map_or(0.0, |p| p.client_width() as f64)),
		height.unwrap_or_else(|| parent.as_ref().map_or(0.0, |p| p.client_height() as f64)),
	)
}

/// Boxed label centered above `(x, top)`. `k` is the current zoom; the box
/// keeps a constant on-screen size.
pub fn draw_tooltip(ctx: &CanvasRenderingContext2d, text: &str, x: f64, top: f64, k: f64) {
	let font = 12.0 / k;
	let pad = 6.0 / k;
	ctx.set_font(&format!("{font}px sans-serif"));
	let text_width = ctx
		.measure_text(text)
		.map_or(text.chars().count() as f64 * font * 0.6, |m| m.width());
	let (w, h) = (text_width + pad * 2.0, font + pad * 2.0);
	let (left, y) = (x - w / 2.0, top - h - 8.0 / k);

	ctx.set_fill_style_str("rgba(0, 0, 0, 0.8)");
	ctx.fill_rect(left, y, w, h);
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.6)");
	ctx.set_line_width(1.0 / k);
	ctx.stroke_rect(left, y, w, h);
	ctx.set_fill_style_str("white");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(text, x, y + h / 2.0);
	ctx.set_text_baseline("alphabetic");
}

/// Live `ResizeObserver` on a canvas container. Must be disconnected
/// explicitly; the callback lives as long as this handle.
pub struct ContainerObserver {
	observer: ResizeObserver,
	_callback: Closure<dyn FnMut(JsValue)>,
}

impl ContainerObserver {
	pub fn disconnect(self) {
		self.observer.disconnect();
	}
}

/// Calls `on_resize` whenever `target` changes size, including layout
/// changes that never fire a window `resize`.
pub fn observe_resize(
	target: &Element,
	mut on_resize: impl FnMut() + 'static,
) -> Option<ContainerObserver> {
	let callback = Closure::<dyn FnMut(JsValue)>::new(move |_entries: JsValue| on_resize());
	let observer = ResizeObserver::new(callback.as_ref().unchecked_ref()).ok()?;
	observer.observe(target);
	Some(ContainerObserver {
		observer,
		_callback: callback,
	})
}

/// Key presses inside form controls belong to the form.
pub fn is_typing(ev: &KeyboardEvent) -> bool {
	ev.target()
		.and_then(|target| target.dyn_into::<Element>().ok())
		.is_some_and(|el| matches!(el.tag_name().as_str(), "INPUT" | "SELECT" | "TEXTAREA"))
}

/// Calls `frame` on every animation frame until `alive` is cleared, then
/// calls `teardown` once.
pub fn start_animation(
	alive: Arc<AtomicBool>,
	mut frame: impl FnMut() + 'static,
	teardown: impl FnOnce() + 'static,
) {
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let animate_inner = animate.clone();
	let mut teardown = Some(teardown);
	*animate.borrow_mut() = Some(Closure::new(move || {
		if !alive.load(Ordering::Relaxed) {
			if let Some(teardown) = teardown.take() {
				teardown();
			}
			return;
		}
		frame();
		if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	}));
	if let (Some(window), Some(cb)) = (web_sys::window(), animate.borrow().as_ref()) {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}
