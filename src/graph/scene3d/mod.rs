//! 3D scene: spheres on an orbit camera, arcs between them, ray picking.
//!
//! Shares [`Interaction`] with the 2D engine. Local coordinates are canvas
//! pixels; a dragged sphere slides on the camera-facing plane through its
//! center and stays where it is dropped.

mod camera;

use std::collections::{HashMap, HashSet};

use glam::DVec3;
use log::info;

pub use camera::{OrbitCamera, Projected, Projector, Ray, arc};

use super::config::GraphConfig;
use super::engine::{Emphasis, Focus, neighbor_map};
use super::interaction::{Intent, Interaction};
use super::layout::stable_unit;
use super::style;
use super::surface::{Surface, Viewport};
use super::types::{GraphData, Node, NodeId, Point};

/// World units per pixel of 2D radius.
pub const SPHERE_SCALE: f64 = 1.0 / 80.0;
/// Height of an arc's midpoint above its chord, in world units.
pub const ARC_LIFT: f64 = 0.5;
/// Straight segments per arc.
pub const ARC_SEGMENTS: usize = 16;
/// Half extents of the box unplaced nodes are scattered in.
const SPREAD: DVec3 = DVec3::new(4.0, 3.0, 4.0);
const LIGHT: DVec3 = DVec3::new(10.0, 10.0, 10.0);
const PULSE_RATE: f64 = 2.0;
const PULSE_AMPLITUDE: f64 = 0.05;

/// What a background drag does to the camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMove {
	/// Left button.
	Rotate,
	/// Right button, or any button with shift.
	Pan,
}

#[derive(Clone, Debug)]
struct CameraDrag {
	last: Point,
	mode: CameraMove,
}

/// A shaded sphere in canvas pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereSprite {
	/// Node this sprite draws.
	pub id: NodeId,
	/// Center in canvas pixels.
	pub screen: Point,
	/// Projected radius in pixels.
	pub radius: f64,
	/// Offset of the specular highlight from the sphere center, in pixels.
	pub light: Point,
	/// CSS color.
	pub color: String,
	/// Already truncated to the label budget.
	pub label: String,
	/// Full label, present only while the sphere is hovered.
	pub tooltip: Option<String>,
	/// Under the pointer.
	pub hovered: bool,
	/// Currently selected.
	pub selected: bool,
	/// Source of a pending connect-mode link.
	pub connecting: bool,
	/// Highlight treatment.
	pub emphasis: Emphasis,
}

/// A link drawn as a lifted arc.
#[derive(Clone, Debug, PartialEq)]
pub struct ArcSprite {
	/// Screen polyline.
	pub points: Vec<Point>,
	/// Stroke width in pixels.
	pub width: f64,
	/// Highlight treatment.
	pub emphasis: Emphasis,
}

/// One frame of the 3D view, spheres sorted far to near.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame3d {
	/// Canvas size.
	pub viewport: Viewport,
	/// Scale factor applied to the selected sphere and its ring.
	pub pulse: f64,
	/// Links with both endpoints in front of the camera.
	pub arcs: Vec<ArcSprite>,
	/// Far to near.
	pub spheres: Vec<SphereSprite>,
}

/// Hit-test surface over projected spheres.
#[derive(Clone, Debug)]
pub struct SceneSurface {
	/// Canvas top-left in client coordinates.
	pub origin: Point,
	/// Projection used for picking.
	pub projector: Projector,
	spheres: Vec<(NodeId, DVec3, f64)>,
}

impl Surface for SceneSurface {
	fn to_local(&self, client: Point) -> Point {
		client - self.origin
	}

	fn hit_test(&self, local: Point) -> Option<NodeId> {
		let ray = self.projector.ray(local);
		self.spheres
			.iter()
			.filter_map(|(id, center, radius)| Some((ray.sphere_hit(*center, *radius)?, id)))
			.min_by(|a, b| a.0.total_cmp(&b.0))
			.map(|(_, id)| id.clone())
	}
}

fn world_position(node: &Node) -> DVec3 {
	match (node.x, node.y, node.z) {
		(Some(x), Some(y), Some(z)) => DVec3::new(x, y, z),
		_ => {
			let unit = DVec3::new(
				stable_unit(&node.id, 1),
				stable_unit(&node.id, 2),
				stable_unit(&node.id, 3),
			);
			(unit * 2.0 - DVec3::ONE) * SPREAD
		}
	}
}

/// 3D graph view: orbit camera, sphere picking and arc links over one data snapshot.
pub struct Scene3d {
	config: GraphConfig,
	data: GraphData,
	neighbors: HashMap<NodeId, HashSet<NodeId>>,
	positions: HashMap<NodeId, DVec3>,
	camera: OrbitCamera,
	viewport: Viewport,
	interaction: Interaction,
	/// Point on the plane a dragged sphere slides on.
	drag_plane: Option<DVec3>,
	camera_drag: Option<CameraDrag>,
	time: f64,
}

impl Scene3d {
	/// Places every node in world space and frames the camera.
	pub fn create(data: GraphData, config: GraphConfig, width: f64, height: f64) -> Self {
		let viewport = Viewport::measured(
			width,
			height,
			(config.fallback_width, config.fallback_height),
		);
		info!(
			"3D scene created: {} nodes, {} links",
			data.nodes.len(),
			data.links.len()
		);
		let mut scene = Self {
			config,
			data: GraphData::default(),
			neighbors: HashMap::new(),
			positions: HashMap::new(),
			camera: OrbitCamera::default(),
			viewport,
			interaction: Interaction::default(),
			drag_plane: None,
			camera_drag: None,
			time: 0.0,
		};
		scene.update(data);
		scene
	}

	/// New nodes get a position; existing nodes keep theirs.
	pub fn update(&mut self, data: GraphData) {
		let ids: HashSet<&NodeId> = data.nodes.iter().map(|node| &node.id).collect();
		self.positions.retain(|id, _| ids.contains(id));
		for node in &data.nodes {
			self.positions
				.entry(node.id.clone())
				.or_insert_with(|| world_position(node));
		}
		self.interaction.retain(|id| ids.contains(id));
		if self.interaction.drag().is_none() {
			self.drag_plane = None;
		}
		self.neighbors = neighbor_map(&data);
		self.data = data;
	}

	/// Drops the scene. Not usable afterwards.
	pub fn destroy(self) {
		info!("3D scene destroyed");
	}

	/// Adopts a new canvas size; the projection follows it.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport = Viewport::measured(
			width,
			height,
			(self.config.fallback_width, self.config.fallback_height),
		);
	}

	/// Advances the selection pulse.
	pub fn tick(&mut self, dt: f64) {
		self.time += dt;
	}

	/// Current camera.
	pub fn camera(&self) -> &OrbitCamera {
		&self.camera
	}

	/// Hover, selection and connect-mode state.
	pub fn interaction(&self) -> &Interaction {
		&self.interaction
	}

	/// Current canvas size.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// World position of a node.
	pub fn position(&self, id: &NodeId) -> Option<DVec3> {
		self.positions.get(id).copied()
	}

	fn sphere_radius(&self, node: &Node) -> f64 {
		style::node_radius(node.magnitude(), &self.config.style) * SPHERE_SCALE
	}

	/// Hit-test surface for the current camera.
	pub fn surface(&self, origin: Point) -> SceneSurface {
		let spheres = self
			.data
			.nodes
			.iter()
			.filter_map(|node| {
				let center = self.positions.get(&node.id)?;
				Some((node.id.clone(), *center, self.sphere_radius(node)))
			})
			.collect();
		SceneSurface {
			origin,
			projector: self.camera.projector(self.viewport),
			spheres,
		}
	}

	/// Press on a sphere starts a drag; on the background it moves the
	/// camera.
	pub fn pointer_down(&mut self, client: Point, origin: Point, mode: CameraMove) {
		let surface = self.surface(origin);
		let local = surface.to_local(client);
		let hit = surface.hit_test(local).and_then(|id| {
			let projected = surface.projector.project(self.position(&id)?)?;
			Some((id, projected.screen))
		});
		match hit {
			Some((id, screen)) => {
				let intents = self.interaction.pointer_down(id, local, screen);
				self.apply(intents);
			}
			None => self.camera_drag = Some(CameraDrag { last: local, mode }),
		}
	}

	/// Updates hover, drags a sphere or moves the camera.
	pub fn pointer_move(&mut self, client: Point, origin: Point) {
		let surface = self.surface(origin);
		let local = surface.to_local(client);
		if let Some(intent) = self.interaction.pointer_move(local) {
			self.apply(vec![intent]);
		} else if let Some(drag) = &mut self.camera_drag {
			let delta = local - drag.last;
			drag.last = local;
			match drag.mode {
				CameraMove::Rotate => self.camera.rotate(delta),
				CameraMove::Pan => self.camera.pan(delta),
			}
		} else {
			self.interaction.hover(surface.hit_test(local));
		}
	}

	/// Ends any sphere or camera drag.
	pub fn pointer_up(&mut self) {
		self.camera_drag = None;
		let release = self.interaction.pointer_up();
		self.apply(release.into_iter().collect());
	}

	/// Ends any drag and clears hover.
	pub fn pointer_leave(&mut self) {
		self.camera_drag = None;
		let release = self.interaction.pointer_leave();
		self.apply(release.into_iter().collect());
	}

	/// Resolves a click into selection and connect-mode intents.
	pub fn click(&mut self, client: Point, origin: Point) -> Vec<Intent> {
		let surface = self.surface(origin);
		let hit = surface.hit_test(surface.to_local(client));
		let intents = self.interaction.click(hit);
		self.apply(intents)
	}

	/// Dollies the camera.
	pub fn wheel(&mut self, delta_y: f64) {
		self.camera.zoom(delta_y);
	}

	/// Cancels connect mode, otherwise clears the selection.
	pub fn escape(&mut self) -> Vec<Intent> {
		let intents = self.interaction.escape();
		self.apply(intents)
	}

	/// Removes the selected node, if any.
	pub fn delete_selected(&mut self) -> Vec<Intent> {
		let intents = self.interaction.delete_selected();
		self.apply(intents)
	}

	/// Enters or leaves connect mode.
	pub fn set_connect_mode(&mut self, on: bool) -> Vec<Intent> {
		let intent = if on {
			self.interaction.enter_connect_mode()
		} else {
			self.interaction.cancel_connect_mode()
		};
		self.apply(intent.into_iter().collect())
	}

	/// Mirrors a selection made elsewhere.
	pub fn set_selected(&mut self, id: Option<NodeId>) {
		let id = id.filter(|id| self.positions.contains_key(id));
		self.interaction.set_selected(id);
	}

	fn apply(&mut self, intents: Vec<Intent>) -> Vec<Intent> {
		let mut outward = Vec::new();
		for intent in intents {
			match intent {
				Intent::Pin { node, .. } => self.drag_plane = self.position(&node),
				Intent::MoveTo { node, at } => {
					let Some(plane) = self.drag_plane else {
						continue;
					};
					let ray = self.camera.projector(self.viewport).ray(at);
					if let Some(world) = ray.plane_hit(plane, self.camera.forward()) {
						self.positions.insert(node, world);
					}
				}
				Intent::Release(_) => self.drag_plane = None,
				other => outward.push(other),
			}
		}
		outward
	}

	/// Describes the current state for the canvas renderer.
	pub fn frame(&self) -> Frame3d {
		let projector = self.camera.projector(self.viewport);
		let focus: Vec<NodeId> = self
			.interaction
			.hovered()
			.into_iter()
			.chain(self.interaction.selected())
			.cloned()
			.collect();
		let focus = Focus::new(&focus, &self.neighbors);

		let arcs = self
			.data
			.links
			.iter()
			.filter_map(|link| {
				let a = self.positions.get(&link.source)?;
				let b = self.positions.get(&link.target)?;
				let points = arc(*a, *b, ARC_LIFT, ARC_SEGMENTS)
					.into_iter()
					.map(|p| projector.project(p).map(|p| p.screen))
					.collect::<Option<Vec<_>>>()?;
				Some(ArcSprite {
					points,
					width: style::edge_width(link.value, &self.config.style),
					emphasis: focus.edge(link),
				})
			})
			.collect();

		let connecting = self.interaction.connect_mode().source();
		let mut spheres: Vec<(f64, SphereSprite)> = self
			.data
			.nodes
			.iter()
			.filter_map(|node| {
				let center = *self.positions.get(&node.id)?;
				let radius = self.sphere_radius(node);
				let projected = projector.project(center)?;
				let hovered = self.interaction.hovered() == Some(&node.id);
				let toward_light = (LIGHT - center).normalize_or_zero() * radius;
				let light = projector
					.project(center + toward_light)
					.map_or(Point::ZERO, |p| p.screen - projected.screen);
				Some((
					projected.depth,
					SphereSprite {
						screen: projected.screen,
						radius: radius * projected.scale,
						light,
						color: style::node_color(node).to_string(),
						label: style::truncate_label(&node.label, self.config.style.label_budget)
							.into_owned(),
						tooltip: hovered.then(|| node.label.clone()),
						hovered,
						selected: self.interaction.selected() == Some(&node.id),
						connecting: connecting == Some(&node.id),
						emphasis: focus.node(&node.id),
						id: node.id.clone(),
					},
				))
			})
			.collect();
		spheres.sort_by(|a, b| b.0.total_cmp(&a.0));

		Frame3d {
			viewport: self.viewport,
			pulse: 1.0 + (self.time * PULSE_RATE).sin() * PULSE_AMPLITUDE,
			arcs,
			spheres: spheres.into_iter().map(|(_, sprite)| sprite).collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::Link;

	const ORIGIN: Point = Point::new(0.0, 0.0);

	fn data() -> GraphData {
		let mut near = Node::new(1, "Near", 100.0);
		(near.x, near.y, near.z) = (Some(1.0), Some(1.0), Some(1.0));
		let mut far = Node::new(2, "Far", 100.0);
		(far.x, far.y, far.z) = (Some(-2.0), Some(0.0), Some(1.0));
		let mut low = Node::new(3, "Low", 5.0);
		(low.x, low.y, low.z) = (Some(3.0), Some(-3.0), Some(-3.0));
		GraphData {
			nodes: vec![near, far, low],
			links: vec![Link::new(1, 2), Link::new(1, "ghost")],
		}
	}

	fn scene() -> Scene3d {
		Scene3d::create(data(), GraphConfig::default(), 800.0, 600.0)
	}

	fn screen_of(scene: &Scene3d, id: i64) -> Point {
		let projector = scene.camera().projector(scene.viewport());
		projector
			.project(scene.position(&NodeId::Int(id)).unwrap())
			.unwrap()
			.screen
	}

	#[test]
	fn test_unplaced_nodes_scatter_inside_box() {
		let loose = GraphData {
			nodes: (0..20).map(|i| Node::new(i, "loose", 1.0)).collect(),
			links: vec![],
		};
		let scene = Scene3d::create(loose, GraphConfig::default(), 800.0, 600.0);
		for i in 0..20i64 {
			let p = scene.position(&NodeId::Int(i)).unwrap();
			assert!(p.abs().cmple(SPREAD).all());
		}
		assert_eq!(self::scene().position(&NodeId::Int(1)), Some(DVec3::ONE));
	}

	#[test]
	fn test_frame_sorts_far_to_near_and_skips_dangling() {
		let frame = scene().frame();
		assert_eq!(frame.arcs.len(), 1);
		assert_eq!(frame.arcs[0].points.len(), ARC_SEGMENTS + 1);
		let near = frame.spheres.iter().position(|s| s.id == NodeId::Int(1)).unwrap();
		let far = frame.spheres.iter().position(|s| s.id == NodeId::Int(2)).unwrap();
		assert!(far < near);
		// Same magnitude, nearer sphere looks bigger.
		assert!(frame.spheres[near].radius > frame.spheres[far].radius);
	}

	#[test]
	fn test_ray_pick_selects_nearest() {
		let mut scene = scene();
		let at = screen_of(&scene, 1);
		assert_eq!(
			scene.click(at, ORIGIN),
			vec![Intent::Selected(Some(NodeId::Int(1)))]
		);
		assert!(scene.frame().spheres.iter().any(|s| s.selected));
	}

	#[test]
	fn test_resize_recenters_projection() {
		let mut scene = scene();
		scene.resize(540.0, 600.0);
		assert_eq!(scene.viewport().width, 540.0);
		let target = scene.camera().target;
		let screen = scene
			.camera()
			.projector(scene.viewport())
			.project(target)
			.unwrap()
			.screen;
		assert!(screen.distance(Point::new(270.0, 300.0)) < 1e-6);
	}

	#[test]
	fn test_hover_exposes_full_label() {
		let mut named = Node::new(1, "A very long organisation name", 100.0);
		(named.x, named.y, named.z) = (Some(0.0), Some(0.0), Some(0.0));
		let mut scene = Scene3d::create(
			GraphData {
				nodes: vec![named],
				links: vec![],
			},
			GraphConfig::default(),
			800.0,
			600.0,
		);
		let at = screen_of(&scene, 1);
		scene.pointer_move(at, ORIGIN);
		let frame = scene.frame();
		assert_eq!(
			frame.spheres[0].tooltip.as_deref(),
			Some("A very long organisation name")
		);
		assert_ne!(frame.spheres[0].label, "A very long organisation name");
	}

	#[test]
	fn test_drag_slides_on_camera_plane() {
		let mut scene = scene();
		let start = screen_of(&scene, 1);
		scene.pointer_down(start, ORIGIN, CameraMove::Rotate);
		scene.pointer_move(start + Point::new(40.0, 0.0), ORIGIN);
		scene.pointer_up();
		let moved = scene.position(&NodeId::Int(1)).unwrap();
		assert_ne!(moved, DVec3::ONE);
		// Still on the plane through the old center facing the camera.
		let forward = scene.camera().forward();
		assert!((moved - DVec3::ONE).dot(forward).abs() < 1e-6);
		assert!(scene.interaction().drag().is_none());
	}

	#[test]
	fn test_background_drag_orbits_camera() {
		let mut scene = scene();
		let yaw = scene.camera().yaw;
		scene.pointer_down(Point::new(5.0, 5.0), ORIGIN, CameraMove::Rotate);
		scene.pointer_move(Point::new(55.0, 5.0), ORIGIN);
		scene.pointer_up();
		assert!(scene.camera().yaw != yaw);
	}

	#[test]
	fn test_connect_and_remove_intents() {
		let mut scene = scene();
		scene.set_connect_mode(true);
		let (a, b) = (screen_of(&scene, 1), screen_of(&scene, 2));
		assert!(scene.click(a, ORIGIN).is_empty());
		let intents = scene.click(b, ORIGIN);
		assert_eq!(
			intents[0],
			Intent::Connect {
				source: NodeId::Int(1),
				target: NodeId::Int(2)
			}
		);

		scene.set_selected(Some(NodeId::Int(2)));
		assert_eq!(scene.delete_selected()[0], Intent::Remove(NodeId::Int(2)));
	}

	#[test]
	fn test_pulse_stays_near_one() {
		let mut scene = scene();
		for _ in 0..100 {
			scene.tick(0.05);
			let pulse = scene.frame().pulse;
			assert!((0.95..=1.05).contains(&pulse));
		}
	}
}
