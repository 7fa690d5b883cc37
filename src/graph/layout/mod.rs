//! Node placement: physics simulation or fixed orbital rings.

mod orbital;
mod simulation;

use std::hash::{DefaultHasher, Hash, Hasher};

use serde::{Deserialize, Serialize};

pub use orbital::OrbitalLayout;
pub use simulation::{Body, ForceSimulation};

use super::config::GraphConfig;
use super::types::{GraphData, NodeId, Point};

/// Which placement strategy the 2D view uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutKind {
	/// Force-directed simulation.
	#[default]
	Force,
	/// Central node at the middle, the rest on a jittered ring.
	Orbital,
}

/// Uniform value in `[0, 1)` derived from the id, stable across runs.
pub(crate) fn stable_unit(id: &NodeId, salt: u64) -> f64 {
	let mut h = DefaultHasher::new();
	id.hash(&mut h);
	salt.hash(&mut h);
	(h.finish() >> 11) as f64 / (1u64 << 53) as f64
}

/// One of the two interchangeable placement strategies.
#[derive(Clone, Debug)]
pub enum Layout {
	/// See [`ForceSimulation`].
	Force(ForceSimulation),
	/// See [`OrbitalLayout`].
	Orbital(OrbitalLayout),
}

impl Layout {
	/// Empty layout of `kind` centered in a `width` by `height` canvas.
	pub fn new(kind: LayoutKind, config: &GraphConfig, width: f64, height: f64) -> Self {
		match kind {
			LayoutKind::Force => Layout::Force(ForceSimulation::new(
				config.force.clone(),
				Point::new(width / 2.0, height / 2.0),
			)),
			LayoutKind::Orbital => {
				Layout::Orbital(OrbitalLayout::new(config.orbital.clone(), width, height))
			}
		}
	}

	/// Which strategy this is.
	pub fn kind(&self) -> LayoutKind {
		match self {
			Layout::Force(_) => LayoutKind::Force,
			Layout::Orbital(_) => LayoutKind::Orbital,
		}
	}

	/// Adopts a new node/link set and lets the layout re-settle.
	pub fn sync(&mut self, data: &GraphData, config: &GraphConfig) {
		match self {
			Layout::Force(sim) => {
				sim.sync(data, &config.style);
				sim.reheat(config.force.reheat_alpha);
			}
			Layout::Orbital(orbital) => orbital.sync(data),
		}
	}

	/// Returns whether anything moved.
	pub fn tick(&mut self) -> bool {
		match self {
			Layout::Force(sim) => sim.tick(),
			Layout::Orbital(_) => false,
		}
	}

	/// True once nothing will move without new input.
	pub fn is_resting(&self) -> bool {
		match self {
			Layout::Force(sim) => sim.is_resting(),
			Layout::Orbital(_) => true,
		}
	}

	/// Current position of a node.
	pub fn position(&self, id: &NodeId) -> Option<Point> {
		match self {
			Layout::Force(sim) => sim.position(id),
			Layout::Orbital(orbital) => orbital.position(id),
		}
	}

	/// Recenters on a new canvas size.
	pub fn resize(&mut self, width: f64, height: f64, config: &GraphConfig) {
		match self {
			Layout::Force(sim) => {
				sim.set_center(Point::new(width / 2.0, height / 2.0));
				sim.reheat(config.force.reheat_alpha);
			}
			Layout::Orbital(orbital) => orbital.resize(width, height),
		}
	}

	/// Pins a node under the pointer.
	pub fn begin_drag(&mut self, id: &NodeId, at: Point, config: &GraphConfig) {
		match self {
			Layout::Force(sim) => {
				sim.set_alpha_target(config.force.drag_alpha_target);
				sim.pin(id, at);
			}
			Layout::Orbital(orbital) => orbital.place_at(id, at),
		}
	}

	/// Moves a pinned node.
	pub fn drag_to(&mut self, id: &NodeId, at: Point) {
		match self {
			Layout::Force(sim) => sim.pin(id, at),
			Layout::Orbital(orbital) => orbital.place_at(id, at),
		}
	}

	/// Force layout frees the node; orbital layout leaves it where dropped.
	pub fn end_drag(&mut self, id: &NodeId) {
		match self {
			Layout::Force(sim) => {
				sim.set_alpha_target(0.0);
				sim.release(id);
			}
			Layout::Orbital(_) => {}
		}
	}
}
