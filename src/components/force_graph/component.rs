use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::ev;
use leptos::prelude::*;
use log::warn;
use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

use super::render;
use crate::components::canvas::{self, FRAME_DT};
use crate::graph::{GraphConfig, GraphData, GraphEngine, Intent, LayoutKind, NodeId, Point};

/// 2D network canvas. Owns a [`GraphEngine`] for its lifetime and reports
/// selection, connection and removal requests through `on_intent`.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] layout: Signal<LayoutKind>,
	#[prop(into)] connecting: Signal<bool>,
	#[prop(into)] selected: Signal<Option<NodeId>>,
	on_intent: Callback<Intent>,
	#[prop(optional)] config: GraphConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let engine: Rc<RefCell<Option<GraphEngine>>> = Rc::new(RefCell::new(None));
	let alive = Arc::new(AtomicBool::new(true));
	let forward = move |intents: Vec<Intent>| {
		for intent in intents {
			on_intent.run(intent);
		}
	};
	let origin = move || {
		canvas_ref.get_untracked().map(|canvas| {
			let canvas: HtmlCanvasElement = canvas.into();
			canvas::canvas_origin(&canvas)
		})
	};

	// Canvas size follows its container, which also changes when side
	// panels open or close.
	let engine_resize = engine.clone();
	let remeasure = move || {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = canvas::measure(&canvas, fullscreen, width, height);
		if let Some(ref mut engine) = *engine_resize.borrow_mut() {
			engine.resize(w, h);
			let viewport = engine.viewport();
			canvas.set_width(viewport.width as u32);
			canvas.set_height(viewport.height as u32);
		}
	};

	let (engine_init, alive_init) = (engine.clone(), alive.clone());
	let remeasure_init = remeasure.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		if engine_init.borrow().is_some() {
			return;
		}
		let Some(ctx) = canvas::context_2d(&canvas) else {
			warn!("2D canvas context unavailable");
			return;
		};

		let (w, h) = canvas::measure(&canvas, fullscreen, width, height);
		let mut created = GraphEngine::create(
			data.get_untracked(),
			layout.get_untracked(),
			config.clone(),
			w,
			h,
		);
		created.set_selected(selected.get_untracked());
		created.set_connect_mode(connecting.get_untracked());
		let viewport = created.viewport();
		canvas.set_width(viewport.width as u32);
		canvas.set_height(viewport.height as u32);
		*engine_init.borrow_mut() = Some(created);

		let observer = canvas
			.parent_element()
			.and_then(|parent| canvas::observe_resize(&parent, remeasure_init.clone()));
		let (engine_anim, engine_drop) = (engine_init.clone(), engine_init.clone());
		canvas::start_animation(
			alive_init.clone(),
			move || {
				if let Some(ref mut engine) = *engine_anim.borrow_mut() {
					engine.tick(FRAME_DT);
					render::render(&engine.frame(), &ctx);
				}
			},
			move || {
				if let Some(observer) = observer {
					observer.disconnect();
				}
				if let Some(engine) = engine_drop.borrow_mut().take() {
					engine.destroy();
				}
			},
		);
	});

	// Mirror owner state into the engine. Echoed intents are dropped.
	let engine_data = engine.clone();
	Effect::new(move |_| {
		let view = data.get();
		if let Some(ref mut engine) = *engine_data.borrow_mut() {
			engine.update(view);
		}
	});
	let engine_layout = engine.clone();
	Effect::new(move |_| {
		let kind = layout.get();
		if let Some(ref mut engine) = *engine_layout.borrow_mut() {
			engine.set_layout(kind);
		}
	});
	let engine_connect = engine.clone();
	Effect::new(move |_| {
		let on = connecting.get();
		if let Some(ref mut engine) = *engine_connect.borrow_mut() {
			engine.set_connect_mode(on);
		}
	});
	let engine_selected = engine.clone();
	Effect::new(move |_| {
		let id = selected.get();
		if let Some(ref mut engine) = *engine_selected.borrow_mut() {
			engine.set_selected(id);
		}
	});

	let resize = window_event_listener(ev::resize, move |_| remeasure());

	let engine_keys = engine.clone();
	let keys = window_event_listener(ev::keydown, move |ev: KeyboardEvent| {
		if canvas::is_typing(&ev) {
			return;
		}
		let intents = match ev.key().as_str() {
			"Escape" => engine_keys.borrow_mut().as_mut().map(GraphEngine::escape),
			"Delete" | "Backspace" => engine_keys
				.borrow_mut()
				.as_mut()
				.map(GraphEngine::delete_selected),
			_ => None,
		};
		forward(intents.unwrap_or_default());
	});

	on_cleanup(move || {
		alive.store(false, Ordering::Relaxed);
		resize.remove();
		keys.remove();
	});

	let engine_md = engine.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(origin) = origin() else {
			return;
		};
		if let Some(ref mut engine) = *engine_md.borrow_mut() {
			engine.pointer_down(canvas::client_point(&ev), origin);
		}
	};

	let engine_mm = engine.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(origin) = origin() else {
			return;
		};
		if let Some(ref mut engine) = *engine_mm.borrow_mut() {
			engine.pointer_move(canvas::client_point(&ev), origin);
		}
	};

	let engine_mu = engine.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut engine) = *engine_mu.borrow_mut() {
			engine.pointer_up();
		}
	};

	let engine_ml = engine.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut engine) = *engine_ml.borrow_mut() {
			engine.pointer_leave();
		}
	};

	let engine_click = engine.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(origin) = origin() else {
			return;
		};
		let intents = engine_click
			.borrow_mut()
			.as_mut()
			.map(|engine| engine.click(canvas::client_point(&ev), origin));
		forward(intents.unwrap_or_default());
	};

	let engine_wh = engine;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(origin) = origin() else {
			return;
		};
		let client = Point::new(ev.client_x() as f64, ev.client_y() as f64);
		if let Some(ref mut engine) = *engine_wh.borrow_mut() {
			engine.wheel(client, origin, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:click=on_click
			on:wheel=on_wheel
			style=move || {
				let cursor = if connecting.get() { "crosshair" } else { "grab" };
				format!("position: absolute; top: 0; left: 0; display: block; cursor: {cursor};")
			}
		/>
	}
}
