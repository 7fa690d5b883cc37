//! Hover, selection, drag and connect-mode lifecycle.
//!
//! The machine never touches graph data or positions itself. Every method
//! returns the [`Intent`]s the caller must apply: layout intents (`Pin`,
//! `MoveTo`, `Release`) go to the layout engine, the rest go up to whoever
//! owns the graph data.

use log::debug;

use super::types::{NodeId, Point};

/// Pointer travel (layout units) after which a press counts as a drag, not
/// a click.
pub const CLICK_SLOP: f64 = 3.0;

/// Two-step link authoring.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ConnectMode {
	/// Clicks select as usual.
	#[default]
	Off,
	/// Next node click picks the source.
	AwaitingSource,
	/// Next node click links the source to the clicked node.
	AwaitingTarget(NodeId),
}

impl ConnectMode {
	/// Whether a link is being authored.
	pub fn is_active(&self) -> bool {
		!matches!(self, ConnectMode::Off)
	}

	/// Chosen source while waiting for a target.
	pub fn source(&self) -> Option<&NodeId> {
		match self {
			ConnectMode::AwaitingTarget(id) => Some(id),
			_ => None,
		}
	}
}

/// A node being dragged.
#[derive(Clone, Debug, PartialEq)]
pub struct Drag {
	/// Dragged node.
	pub node: NodeId,
	/// Pointer minus node position at press time.
	pub offset: Point,
	origin: Point,
	travelled: f64,
}

/// Requested change emitted by interaction, applied by its owner.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
	/// Hold a node at a point.
	Pin { node: NodeId, at: Point },
	/// Move a held node.
	MoveTo { node: NodeId, at: Point },
	/// Let a held node go.
	Release(NodeId),
	/// Selection changed.
	Selected(Option<NodeId>),
	/// Add a link.
	Connect { source: NodeId, target: NodeId },
	/// Remove a node and its links.
	Remove(NodeId),
	/// Connect mode toggled.
	ConnectModeChanged(bool),
}

impl Intent {
	/// Layout intents are consumed by the engine; the rest leave it.
	pub fn is_layout(&self) -> bool {
		matches!(
			self,
			Intent::Pin { .. } | Intent::MoveTo { .. } | Intent::Release(_)
		)
	}
}

/// Hover, selection, drag and connect-mode state shared by the 2D and 3D views.
#[derive(Clone, Debug, Default)]
pub struct Interaction {
	hovered: Option<NodeId>,
	selected: Option<NodeId>,
	drag: Option<Drag>,
	connect: ConnectMode,
	suppress_click: bool,
}

impl Interaction {
	/// Node under the pointer.
	pub fn hovered(&self) -> Option<&NodeId> {
		self.hovered.as_ref()
	}

	/// Selected node.
	pub fn selected(&self) -> Option<&NodeId> {
		self.selected.as_ref()
	}

	/// Drag in progress, if any.
	pub fn drag(&self) -> Option<&Drag> {
		self.drag.as_ref()
	}

	/// Link authoring state.
	pub fn connect_mode(&self) -> &ConnectMode {
		&self.connect
	}

	/// Returns whether the hovered node changed. Ignored while dragging so
	/// the dragged node keeps its hover highlight.
	pub fn hover(&mut self, node: Option<NodeId>) -> bool {
		if self.drag.is_some() || self.hovered == node {
			return false;
		}
		self.hovered = node;
		true
	}

	/// Starts dragging `node`. A drag already in progress is released first.
	pub fn pointer_down(&mut self, node: NodeId, pointer: Point, node_pos: Point) -> Vec<Intent> {
		let mut intents = Vec::with_capacity(2);
		if let Some(previous) = self.drag.take() {
			intents.push(Intent::Release(previous.node));
		}
		self.suppress_click = false;
		self.hovered = Some(node.clone());
		intents.push(Intent::Pin {
			node: node.clone(),
			at: node_pos,
		});
		self.drag = Some(Drag {
			node,
			offset: pointer - node_pos,
			origin: pointer,
			travelled: 0.0,
		});
		intents
	}

	/// Follows the pointer while dragging.
	pub fn pointer_move(&mut self, pointer: Point) -> Option<Intent> {
		let drag = self.drag.as_mut()?;
		drag.travelled = drag.travelled.max(pointer.distance(drag.origin));
		Some(Intent::MoveTo {
			node: drag.node.clone(),
			at: pointer - drag.offset,
		})
	}

	/// Ends a drag, releasing the node.
	pub fn pointer_up(&mut self) -> Option<Intent> {
		let drag = self.drag.take()?;
		self.suppress_click = drag.travelled > CLICK_SLOP;
		Some(Intent::Release(drag.node))
	}

	/// Pointer left the surface: end any drag and clear hover.
	pub fn pointer_leave(&mut self) -> Option<Intent> {
		let release = self.pointer_up();
		self.suppress_click = false;
		self.hovered = None;
		release
	}

	/// Click on `hit` (or the background). Clicks that ended a drag are
	/// swallowed.
	pub fn click(&mut self, hit: Option<NodeId>) -> Vec<Intent> {
		if std::mem::take(&mut self.suppress_click) {
			return Vec::new();
		}
		match (std::mem::take(&mut self.connect), hit) {
			(ConnectMode::Off, Some(id)) => {
				self.selected = if self.selected.as_ref() == Some(&id) {
					None
				} else {
					Some(id)
				};
				vec![Intent::Selected(self.selected.clone())]
			}
			(ConnectMode::Off, None) => match self.selected.take() {
				Some(_) => vec![Intent::Selected(None)],
				None => Vec::new(),
			},
			(ConnectMode::AwaitingSource, Some(id)) => {
				debug!("Connect mode: source {id}");
				self.connect = ConnectMode::AwaitingTarget(id);
				Vec::new()
			}
			(ConnectMode::AwaitingTarget(source), Some(target)) if source != target => {
				debug!("Connect mode: linking {source} -> {target}");
				vec![
					Intent::Connect { source, target },
					Intent::ConnectModeChanged(false),
				]
			}
			// Same node twice, or a background click while connecting.
			(pending, _) => {
				self.connect = pending;
				Vec::new()
			}
		}
	}

	/// Starts link authoring; `None` when already active.
	pub fn enter_connect_mode(&mut self) -> Option<Intent> {
		if self.connect.is_active() {
			return None;
		}
		debug!("Connect mode entered");
		self.connect = ConnectMode::AwaitingSource;
		Some(Intent::ConnectModeChanged(true))
	}

	/// Leaves link authoring; `None` when already off.
	pub fn cancel_connect_mode(&mut self) -> Option<Intent> {
		if !self.connect.is_active() {
			return None;
		}
		debug!("Connect mode cancelled");
		self.connect = ConnectMode::Off;
		Some(Intent::ConnectModeChanged(false))
	}

	/// Clears hover, selection and any pending connection.
	pub fn escape(&mut self) -> Vec<Intent> {
		self.hovered = None;
		let mut intents = Vec::new();
		if self.selected.take().is_some() {
			intents.push(Intent::Selected(None));
		}
		intents.extend(self.cancel_connect_mode());
		intents
	}

	/// Emits removal of the selected node and clears the selection.
	pub fn delete_selected(&mut self) -> Vec<Intent> {
		match self.selected.take() {
			Some(id) => vec![Intent::Remove(id), Intent::Selected(None)],
			None => Vec::new(),
		}
	}

	/// Selection pushed in from outside (e.g. a closed detail panel).
	pub fn set_selected(&mut self, node: Option<NodeId>) {
		self.selected = node;
	}

	/// Forgets every reference to nodes that no longer exist.
	pub fn retain(&mut self, exists: impl Fn(&NodeId) -> bool) {
		if self.hovered.as_ref().is_some_and(|id| !exists(id)) {
			self.hovered = None;
		}
		if self.selected.as_ref().is_some_and(|id| !exists(id)) {
			self.selected = None;
		}
		if self.drag.as_ref().is_some_and(|drag| !exists(&drag.node)) {
			self.drag = None;
		}
		if self.connect.source().is_some_and(|id| !exists(id)) {
			self.connect = ConnectMode::AwaitingSource;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn id(i: i64) -> NodeId {
		NodeId::Int(i)
	}

	#[test]
	fn test_click_toggles_selection() {
		let mut ix = Interaction::default();
		assert_eq!(ix.click(Some(id(1))), vec![Intent::Selected(Some(id(1)))]);
		assert_eq!(ix.click(Some(id(2))), vec![Intent::Selected(Some(id(2)))]);
		assert_eq!(ix.click(Some(id(2))), vec![Intent::Selected(None)]);
		assert_eq!(ix.selected(), None);
		assert!(ix.click(None).is_empty());
	}

	#[test]
	fn test_drag_moves_by_offset() {
		let mut ix = Interaction::default();
		let intents = ix.pointer_down(id(1), Point::new(105.0, 100.0), Point::new(100.0, 100.0));
		assert_eq!(
			intents,
			vec![Intent::Pin {
				node: id(1),
				at: Point::new(100.0, 100.0)
			}]
		);
		assert_eq!(
			ix.pointer_move(Point::new(205.0, 150.0)),
			Some(Intent::MoveTo {
				node: id(1),
				at: Point::new(200.0, 150.0)
			})
		);
		assert_eq!(ix.pointer_up(), Some(Intent::Release(id(1))));
		assert!(ix.drag().is_none());
		assert_eq!(ix.pointer_move(Point::ZERO), None);
	}

	#[test]
	fn test_second_press_releases_first_drag() {
		let mut ix = Interaction::default();
		ix.pointer_down(id(1), Point::ZERO, Point::ZERO);
		let intents = ix.pointer_down(id(2), Point::ZERO, Point::ZERO);
		assert_eq!(intents[0], Intent::Release(id(1)));
		assert_eq!(ix.drag().map(|d| &d.node), Some(&id(2)));
	}

	#[test]
	fn test_drag_swallows_following_click() {
		let mut ix = Interaction::default();
		ix.pointer_down(id(1), Point::ZERO, Point::ZERO);
		ix.pointer_move(Point::new(40.0, 0.0));
		ix.pointer_up();
		assert!(ix.click(Some(id(1))).is_empty());
		assert_eq!(ix.selected(), None);

		ix.pointer_down(id(1), Point::ZERO, Point::ZERO);
		ix.pointer_move(Point::new(1.0, 0.0));
		ix.pointer_up();
		assert_eq!(ix.click(Some(id(1))), vec![Intent::Selected(Some(id(1)))]);
	}

	#[test]
	fn test_hover_does_not_cancel_drag() {
		let mut ix = Interaction::default();
		ix.pointer_down(id(1), Point::ZERO, Point::ZERO);
		assert!(!ix.hover(Some(id(2))));
		assert!(ix.drag().is_some());
		assert_eq!(ix.hovered(), Some(&id(1)));
	}

	#[test]
	fn test_connect_mode_round_trip() {
		let mut ix = Interaction::default();
		assert_eq!(ix.enter_connect_mode(), Some(Intent::ConnectModeChanged(true)));
		assert!(ix.click(Some(id(1))).is_empty());
		assert_eq!(ix.connect_mode(), &ConnectMode::AwaitingTarget(id(1)));
		// Self link is a no-op and keeps waiting.
		assert!(ix.click(Some(id(1))).is_empty());
		assert!(ix.connect_mode().is_active());
		assert_eq!(
			ix.click(Some(id(2))),
			vec![
				Intent::Connect {
					source: id(1),
					target: id(2)
				},
				Intent::ConnectModeChanged(false)
			]
		);
		assert_eq!(ix.connect_mode(), &ConnectMode::Off);
		assert_eq!(ix.selected(), None);
	}

	#[test]
	fn test_escape_clears_everything() {
		let mut ix = Interaction::default();
		ix.hover(Some(id(3)));
		ix.click(Some(id(1)));
		ix.enter_connect_mode();
		ix.click(Some(id(2)));
		assert_eq!(
			ix.escape(),
			vec![Intent::Selected(None), Intent::ConnectModeChanged(false)]
		);
		assert_eq!(ix.hovered(), None);
		assert_eq!(ix.selected(), None);
		assert!(!ix.connect_mode().is_active());
		assert!(ix.escape().is_empty());
	}

	#[test]
	fn test_delete_selected() {
		let mut ix = Interaction::default();
		assert!(ix.delete_selected().is_empty());
		ix.click(Some(id(4)));
		assert_eq!(
			ix.delete_selected(),
			vec![Intent::Remove(id(4)), Intent::Selected(None)]
		);
		assert_eq!(ix.selected(), None);
	}

	#[test]
	fn test_retain_prunes_missing_nodes() {
		let mut ix = Interaction::default();
		ix.click(Some(id(1)));
		ix.enter_connect_mode();
		ix.click(Some(id(1)));
		ix.pointer_down(id(1), Point::ZERO, Point::ZERO);
		ix.retain(|n| *n != id(1));
		assert_eq!(ix.selected(), None);
		assert_eq!(ix.hovered(), None);
		assert!(ix.drag().is_none());
		assert_eq!(ix.connect_mode(), &ConnectMode::AwaitingSource);
	}
}
