//! One 2D graph instance: layout, interaction and view state behind an
//! explicit `create` / `update` / `destroy` lifecycle.
//!
//! The engine owns a *view* of the graph (usually a filtered copy). It never
//! mutates the authoritative data; pointer handlers return outward
//! [`Intent`]s for the owner to apply, after which the owner calls
//! [`GraphEngine::update`] with the new view.

use std::collections::{HashMap, HashSet};

use log::{debug, info};

use super::config::GraphConfig;
use super::interaction::{Intent, Interaction};
use super::layout::{Layout, LayoutKind};
use super::style;
use super::surface::{NodeHit, PlanarSurface, Surface, ViewTransform, Viewport};
use super::types::{GraphData, Link, NodeId, Point};

/// Seconds of steady hover before the highlight starts to ease in.
const HOVER_DELAY: f64 = 0.08;
const EASE_IN_SPEED: f64 = 1.8;
const EASE_OUT_SPEED: f64 = 1.26;

/// How strongly a sprite is drawn against the current highlight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
	/// No hover or selection in effect.
	Normal,
	/// Hovered or selected node, or one of its neighbors.
	Highlighted,
	/// Outside the highlighted neighborhood.
	Dimmed,
}

/// A link drawn as a straight segment in layout coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSprite {
	/// Source endpoint.
	pub from: Point,
	/// Target endpoint.
	pub to: Point,
	/// Stroke width in layout units.
	pub width: f64,
	/// Highlight treatment.
	pub emphasis: Emphasis,
}

/// A node disc in layout coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSprite {
	/// Node this sprite draws.
	pub id: NodeId,
	/// Layout position.
	pub center: Point,
	/// Rendered radius in layout units.
	pub radius: f64,
	/// CSS color.
	pub color: String,
	/// Already truncated to the label budget.
	pub label: String,
	/// Full label, present only while the node is hovered.
	pub tooltip: Option<String>,
	/// Raw score, shown in the label.
	pub score: f64,
	/// Under the pointer.
	pub hovered: bool,
	/// Currently selected.
	pub selected: bool,
	/// Source of a pending connect-mode link.
	pub connecting: bool,
	/// Highlight treatment.
	pub emphasis: Emphasis,
}

/// Everything the canvas renderer needs for one frame, in draw order.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
	/// Canvas size.
	pub viewport: Viewport,
	/// Pan and zoom applied to every sprite.
	pub transform: ViewTransform,
	/// Eased hover/selection highlight in `[0, 1]`.
	pub highlight: f64,
	/// Links whose endpoints are both placed.
	pub edges: Vec<EdgeSprite>,
	/// Nodes in magnitude order, largest last.
	pub nodes: Vec<NodeSprite>,
}

#[derive(Clone, Debug)]
struct Pan {
	start: Point,
	transform_start: Point,
}

#[derive(Clone, Debug, Default)]
struct Highlight {
	t: f64,
	delay_t: f64,
	/// Focus kept while the highlight fades out.
	fading: Vec<NodeId>,
}

/// Undirected adjacency over links whose endpoints both exist.
pub(crate) fn neighbor_map(data: &GraphData) -> HashMap<NodeId, HashSet<NodeId>> {
	let ids: HashSet<&NodeId> = data.nodes.iter().map(|node| &node.id).collect();
	let mut neighbors: HashMap<NodeId, HashSet<NodeId>> = HashMap::new();
	for link in &data.links {
		if ids.contains(&link.source) && ids.contains(&link.target) {
			neighbors
				.entry(link.source.clone())
				.or_default()
				.insert(link.target.clone());
			neighbors
				.entry(link.target.clone())
				.or_default()
				.insert(link.source.clone());
		}
	}
	neighbors
}

/// Emphasis lookup for one frame: focused nodes, their neighbors and the
/// links touching them are highlighted, everything else dims.
pub(crate) struct Focus<'a> {
	focus: HashSet<&'a NodeId>,
	lit: HashSet<&'a NodeId>,
}

impl<'a> Focus<'a> {
	pub(crate) fn new(
		focus: &'a [NodeId],
		neighbors: &'a HashMap<NodeId, HashSet<NodeId>>,
	) -> Self {
		let lit = focus
			.iter()
			.flat_map(|id| std::iter::once(id).chain(neighbors.get(id).into_iter().flatten()))
			.collect();
		Self {
			focus: focus.iter().collect(),
			lit,
		}
	}

	fn emphasis(&self, on: bool) -> Emphasis {
		match (self.focus.is_empty(), on) {
			(true, _) => Emphasis::Normal,
			(false, true) => Emphasis::Highlighted,
			(false, false) => Emphasis::Dimmed,
		}
	}

	pub(crate) fn edge(&self, link: &Link) -> Emphasis {
		self.emphasis(self.focus.contains(&link.source) || self.focus.contains(&link.target))
	}

	pub(crate) fn node(&self, id: &NodeId) -> Emphasis {
		self.emphasis(self.lit.contains(id))
	}
}

/// 2D graph view: layout, pan/zoom and pointer interaction over one data snapshot.
pub struct GraphEngine {
	config: GraphConfig,
	data: GraphData,
	neighbors: HashMap<NodeId, HashSet<NodeId>>,
	layout: Layout,
	interaction: Interaction,
	viewport: Viewport,
	transform: ViewTransform,
	pan: Option<Pan>,
	highlight: Highlight,
}

impl GraphEngine {
	/// Builds the engine and seeds the layout with `data`.
	pub fn create(
		data: GraphData,
		kind: LayoutKind,
		config: GraphConfig,
		width: f64,
		height: f64,
	) -> Self {
		let viewport = Viewport::measured(
			width,
			height,
			(config.fallback_width, config.fallback_height),
		);
		info!(
			"Graph engine created: {} nodes, {} links, {:?} layout, {}x{}",
			data.nodes.len(),
			data.links.len(),
			kind,
			viewport.width,
			viewport.height
		);
		let layout = Layout::new(kind, &config, viewport.width, viewport.height);
		let mut engine = Self {
			config,
			data: GraphData::default(),
			neighbors: HashMap::new(),
			layout,
			interaction: Interaction::default(),
			viewport,
			transform: ViewTransform::default(),
			pan: None,
			highlight: Highlight::default(),
		};
		engine.update(data);
		engine
	}

	/// Adopts a new view of the data and lets the layout re-settle.
	pub fn update(&mut self, data: GraphData) {
		self.layout.sync(&data, &self.config);
		let ids: HashSet<&NodeId> = data.nodes.iter().map(|node| &node.id).collect();
		self.interaction.retain(|id| ids.contains(id));
		self.highlight.fading.retain(|id| ids.contains(id));
		self.neighbors = neighbor_map(&data);
		self.data = data;
	}

	/// Releases the layout. The engine is not usable afterwards.
	pub fn destroy(self) {
		info!("Graph engine destroyed");
	}

	/// Switches layout strategy, re-placing every node.
	pub fn set_layout(&mut self, kind: LayoutKind) {
		if self.layout.kind() == kind {
			return;
		}
		self.layout = Layout::new(kind, &self.config, self.viewport.width, self.viewport.height);
		self.layout.sync(&self.data, &self.config);
	}

	/// Adopts a new canvas size, recentering and reheating the layout. No-op when unchanged.
	pub fn resize(&mut self, width: f64, height: f64) {
		let viewport = Viewport::measured(
			width,
			height,
			(self.config.fallback_width, self.config.fallback_height),
		);
		if viewport == self.viewport {
			return;
		}
		debug!("Graph resized to {}x{}", viewport.width, viewport.height);
		self.viewport = viewport;
		self.layout.resize(viewport.width, viewport.height, &self.config);
	}

	/// Advances layout and highlight easing. Returns whether a redraw is
	/// needed.
	pub fn tick(&mut self, dt: f64) -> bool {
		let moved = self.layout.tick();
		let focused = !self.focus().is_empty();
		let before = self.highlight.t;
		let h = &mut self.highlight;
		if focused {
			h.delay_t = (h.delay_t + dt).min(HOVER_DELAY);
			if h.delay_t >= HOVER_DELAY {
				h.t += (1.0 - h.t) * (EASE_IN_SPEED * dt).min(1.0);
			}
		} else {
			h.delay_t = 0.0;
			h.t -= h.t * (EASE_OUT_SPEED * dt).min(1.0);
			if h.t < 0.01 {
				h.t = 0.0;
				h.fading.clear();
			}
		}
		moved || (h.t - before).abs() > 1e-6
	}

	/// Active placement strategy.
	pub fn layout(&self) -> &Layout {
		&self.layout
	}

	/// Hover, selection and connect-mode state.
	pub fn interaction(&self) -> &Interaction {
		&self.interaction
	}

	/// Current canvas size.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// Current pan and zoom.
	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Current layout position of a node.
	pub fn position(&self, id: &NodeId) -> Option<Point> {
		self.layout.position(id)
	}

	/// Hit-test surface for the current positions; `origin` is the canvas
	/// top-left in client coordinates.
	pub fn surface(&self, origin: Point) -> PlanarSurface {
		let targets = self
			.draw_order()
			.into_iter()
			.filter_map(|i| {
				let node = &self.data.nodes[i];
				Some(NodeHit {
					id: node.id.clone(),
					center: self.layout.position(&node.id)?,
					radius: style::node_radius(node.magnitude(), &self.config.style),
				})
			})
			.collect();
		PlanarSurface {
			origin,
			transform: self.transform,
			targets,
		}
	}

	/// Starts a node drag, or a pan when the press misses every node.
	pub fn pointer_down(&mut self, client: Point, origin: Point) {
		let surface = self.surface(origin);
		let local = surface.to_local(client);
		let hit = surface
			.hit_test(local)
			.and_then(|id| Some((self.layout.position(&id)?, id)));
		match hit {
			Some((node_pos, id)) => {
				let intents = self.interaction.pointer_down(id, local, node_pos);
				self.apply(intents);
			}
			None => {
				self.pan = Some(Pan {
					start: surface.to_canvas(client),
					transform_start: Point::new(self.transform.x, self.transform.y),
				});
			}
		}
	}

	/// Updates hover and moves whatever is being dragged.
	pub fn pointer_move(&mut self, client: Point, origin: Point) {
		let surface = self.surface(origin);
		let local = surface.to_local(client);
		if let Some(intent) = self.interaction.pointer_move(local) {
			self.apply(vec![intent]);
		} else if let Some(pan) = &self.pan {
			let delta = surface.to_canvas(client) - pan.start;
			self.transform.x = pan.transform_start.x + delta.x;
			self.transform.y = pan.transform_start.y + delta.y;
		} else {
			self.hover(surface.hit_test(local));
		}
	}

	/// Ends a drag or pan.
	pub fn pointer_up(&mut self) {
		self.pan = None;
		let release = self.interaction.pointer_up();
		self.apply(release.into_iter().collect());
	}

	/// Clears hover and ends any drag or pan.
	pub fn pointer_leave(&mut self) {
		self.pan = None;
		self.remember_focus();
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

	/// Zooms around the pointer.
	pub fn wheel(&mut self, client: Point, origin: Point, delta_y: f64) {
		self.transform.zoom_at(client - origin, delta_y);
	}

	/// Cancels connect mode, otherwise clears the selection.
	pub fn escape(&mut self) -> Vec<Intent> {
		self.remember_focus();
		let intents = self.interaction.escape();
		self.apply(intents)
	}

	/// Removes the selected node, if any.
	pub fn delete_selected(&mut self) -> Vec<Intent> {
		let intents = self.interaction.delete_selected();
		self.apply(intents)
	}

	/// Mirrors the owner's connect-mode toggle.
	pub fn set_connect_mode(&mut self, on: bool) -> Vec<Intent> {
		let intent = if on {
			self.interaction.enter_connect_mode()
		} else {
			self.interaction.cancel_connect_mode()
		};
		self.apply(intent.into_iter().collect())
	}

	/// Mirrors the owner's selection.
	pub fn set_selected(&mut self, id: Option<NodeId>) {
		let id = id.filter(|id| self.layout.position(id).is_some());
		if self.interaction.selected() != id.as_ref() {
			self.remember_focus();
			self.interaction.set_selected(id);
		}
	}

	fn hover(&mut self, id: Option<NodeId>) {
		let entering = self.interaction.hovered().is_none();
		let focus = self.focus();
		if self.interaction.hover(id) {
			if self.interaction.hovered().is_none() {
				self.highlight.fading = focus;
			} else if entering {
				self.highlight.delay_t = 0.0;
			}
		}
	}

	fn remember_focus(&mut self) {
		let focus = self.focus();
		if !focus.is_empty() {
			self.highlight.fading = focus;
		}
	}

	/// Applies layout intents and hands the rest back.
	fn apply(&mut self, intents: Vec<Intent>) -> Vec<Intent> {
		let mut outward = Vec::new();
		for intent in intents {
			match intent {
				Intent::Pin { node, at } => self.layout.begin_drag(&node, at, &self.config),
				Intent::MoveTo { node, at } => self.layout.drag_to(&node, at),
				Intent::Release(node) => self.layout.end_drag(&node),
				other => outward.push(other),
			}
		}
		outward
	}

	/// Hovered and selected nodes.
	fn focus(&self) -> Vec<NodeId> {
		self.interaction
			.hovered()
			.into_iter()
			.chain(self.interaction.selected())
			.cloned()
			.collect()
	}

	/// Node indices back to front: plain nodes, then hovered, then selected.
	fn draw_order(&self) -> Vec<usize> {
		let rank = |id: &NodeId| {
			if self.interaction.selected() == Some(id) {
				2
			} else if self.interaction.hovered() == Some(id) {
				1
			} else {
				0
			}
		};
		let mut order: Vec<usize> = (0..self.data.nodes.len()).collect();
		order.sort_by_key(|&i| rank(&self.data.nodes[i].id));
		order
	}

	/// Describes the current state for the canvas renderer.
	pub fn frame(&self) -> Frame {
		let mut focus = self.focus();
		if focus.is_empty() && self.highlight.t > 0.0 {
			focus = self.highlight.fading.clone();
		}
		let focus = Focus::new(&focus, &self.neighbors);

		let edges = self
			.data
			.links
			.iter()
			.filter_map(|link| {
				Some(EdgeSprite {
					from: self.layout.position(&link.source)?,
					to: self.layout.position(&link.target)?,
					width: style::edge_width(link.value, &self.config.style),
					emphasis: focus.edge(link),
				})
			})
			.collect();

		let connecting = self.interaction.connect_mode().source();
		let nodes = self
			.draw_order()
			.into_iter()
			.filter_map(|i| {
				let node = &self.data.nodes[i];
				let hovered = self.interaction.hovered() == Some(&node.id);
				Some(NodeSprite {
					center: self.layout.position(&node.id)?,
					radius: style::node_radius(node.magnitude(), &self.config.style),
					color: style::node_color(node).to_string(),
					label: style::truncate_label(&node.label, self.config.style.label_budget)
						.into_owned(),
					tooltip: hovered.then(|| node.label.clone()),
					score: node.score,
					hovered,
					selected: self.interaction.selected() == Some(&node.id),
					connecting: connecting == Some(&node.id),
					emphasis: focus.node(&node.id),
					id: node.id.clone(),
				})
			})
			.collect();

		Frame {
			viewport: self.viewport,
			transform: self.transform,
			highlight: self.highlight.t,
			edges,
			nodes,
		}
	}
}
