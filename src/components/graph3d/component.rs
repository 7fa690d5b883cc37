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
use crate::graph::scene3d::CameraMove;
use crate::graph::{GraphConfig, GraphData, Intent, NodeId, Scene3d};

/// 3D network view. Drag a sphere to move it, drag the background to orbit,
/// shift-drag or right-drag to pan, scroll to zoom.
#[component]
pub fn Graph3dCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] connecting: Signal<bool>,
	#[prop(into)] selected: Signal<Option<NodeId>>,
	on_intent: Callback<Intent>,
	#[prop(optional)] config: GraphConfig,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let scene: Rc<RefCell<Option<Scene3d>>> = Rc::new(RefCell::new(None));
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

	let scene_resize = scene.clone();
	let remeasure = move || {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = canvas::measure(&canvas, false, width, height);
		if let Some(ref mut scene) = *scene_resize.borrow_mut() {
			scene.resize(w, h);
			let viewport = scene.viewport();
			canvas.set_width(viewport.width as u32);
			canvas.set_height(viewport.height as u32);
		}
	};

	let (scene_init, alive_init) = (scene.clone(), alive.clone());
	let remeasure_init = remeasure.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		if scene_init.borrow().is_some() {
			return;
		}
		let Some(ctx) = canvas::context_2d(&canvas) else {
			warn!("2D canvas context unavailable");
			return;
		};

		let (w, h) = canvas::measure(&canvas, false, width, height);
		let mut created = Scene3d::create(data.get_untracked(), config.clone(), w, h);
		created.set_selected(selected.get_untracked());
		created.set_connect_mode(connecting.get_untracked());
		let viewport = created.viewport();
		canvas.set_width(viewport.width as u32);
		canvas.set_height(viewport.height as u32);
		*scene_init.borrow_mut() = Some(created);

		let observer = canvas
			.parent_element()
			.and_then(|parent| canvas::observe_resize(&parent, remeasure_init.clone()));
		let (scene_anim, scene_drop) = (scene_init.clone(), scene_init.clone());
		canvas::start_animation(
			alive_init.clone(),
			move || {
				if let Some(ref mut scene) = *scene_anim.borrow_mut() {
					scene.tick(FRAME_DT);
					render::render(&scene.frame(), &ctx);
				}
			},
			move || {
				if let Some(observer) = observer {
					observer.disconnect();
				}
				if let Some(scene) = scene_drop.borrow_mut().take() {
					scene.destroy();
				}
			},
		);
	});

	let scene_data = scene.clone();
	Effect::new(move |_| {
		let view = data.get();
		if let Some(ref mut scene) = *scene_data.borrow_mut() {
			scene.update(view);
		}
	});
	let scene_connect = scene.clone();
	Effect::new(move |_| {
		let on = connecting.get();
		if let Some(ref mut scene) = *scene_connect.borrow_mut() {
			scene.set_connect_mode(on);
		}
	});
	let scene_selected = scene.clone();
	Effect::new(move |_| {
		let id = selected.get();
		if let Some(ref mut scene) = *scene_selected.borrow_mut() {
			scene.set_selected(id);
		}
	});

	let resize = window_event_listener(ev::resize, move |_| remeasure());

	let scene_keys = scene.clone();
	let keys = window_event_listener(ev::keydown, move |ev: KeyboardEvent| {
		if canvas::is_typing(&ev) {
			return;
		}
		let intents = match ev.key().as_str() {
			"Escape" => scene_keys.borrow_mut().as_mut().map(Scene3d::escape),
			"Delete" | "Backspace" => scene_keys.borrow_mut().as_mut().map(Scene3d::delete_selected),
			_ => None,
		};
		forward(intents.unwrap_or_default());
	});

	on_cleanup(move || {
		alive.store(false, Ordering::Relaxed);
		resize.remove();
		keys.remove();
	});

	let scene_md = scene.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(origin) = origin() else {
			return;
		};
		let mode = if ev.shift_key() || ev.button() == 2 {
			CameraMove::Pan
		} else {
			CameraMove::Rotate
		};
		if let Some(ref mut scene) = *scene_md.borrow_mut() {
			scene.pointer_down(canvas::client_point(&ev), origin, mode);
		}
	};

	let scene_mm = scene.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(origin) = origin() else {
			return;
		};
		if let Some(ref mut scene) = *scene_mm.borrow_mut() {
			scene.pointer_move(canvas::client_point(&ev), origin);
		}
	};

	let scene_mu = scene.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut scene) = *scene_mu.borrow_mut() {
			scene.pointer_up();
		}
	};

	let scene_ml = scene.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut scene) = *scene_ml.borrow_mut() {
			scene.pointer_leave();
		}
	};

	let scene_click = scene.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(origin) = origin() else {
			return;
		};
		let intents = scene_click
			.borrow_mut()
			.as_mut()
			.map(|scene| scene.click(canvas::client_point(&ev), origin));
		forward(intents.unwrap_or_default());
	};

	let scene_wh = scene;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut scene) = *scene_wh.borrow_mut() {
			scene.wheel(ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph3d-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:click=on_click
			on:wheel=on_wheel
			on:contextmenu=|ev: MouseEvent| ev.prevent_default()
			style=move || {
				let cursor = if connecting.get() { "crosshair" } else { "move" };
				format!("position: absolute; top: 0; left: 0; display: block; cursor: {cursor};")
			}
		/>
	}
}
