//! Deterministic ring placement around a central node.

use std::collections::HashMap;
use std::f64::consts::TAU;

use crate::graph::config::OrbitalConfig;
use crate::graph::model::central_node;
use crate::graph::types::{GraphData, NodeId, Point};

use super::stable_unit;

/// Deterministic hub-and-ring placement.
#[derive(Clone, Debug)]
pub struct OrbitalLayout {
	config: OrbitalConfig,
	center: Point,
	ring_radius: f64,
	order: Vec<NodeId>,
	hub: Option<NodeId>,
	positions: HashMap<NodeId, Point>,
	/// Drop positions left by drags; survive re-placement.
	placed: HashMap<NodeId, Point>,
}

impl OrbitalLayout {
	/// Empty layout centered in a `width` by `height` canvas.
	pub fn new(config: OrbitalConfig, width: f64, height: f64) -> Self {
		Self {
			ring_radius: width.min(height) * config.ring_ratio,
			center: Point::new(width / 2.0, height / 2.0),
			config,
			order: Vec::new(),
			hub: None,
			positions: HashMap::new(),
			placed: HashMap::new(),
		}
	}

	/// Re-places every node when the node list changed.
	pub fn sync(&mut self, data: &GraphData) {
		let order: Vec<NodeId> = data.nodes.iter().map(|node| node.id.clone()).collect();
		self.placed.retain(|id, _| order.contains(id));
		if order == self.order {
			return;
		}
		self.order = order;
		self.hub = central_node(&data.nodes).map(|node| node.id.clone());
		self.place();
	}

	fn place(&mut self) {
		self.positions.clear();
		let satellites: Vec<&NodeId> = self
			.order
			.iter()
			.filter(|id| Some(*id) != self.hub.as_ref())
			.collect();
		let count = satellites.len().max(1) as f64;
		for (i, id) in satellites.into_iter().enumerate() {
			let angle = TAU * i as f64 / count;
			let distance = self.ring_radius + (stable_unit(id, 0) - 0.5) * self.config.jitter;
			self.positions.insert(
				id.clone(),
				self.center + Point::new(angle.cos(), angle.sin()) * distance,
			);
		}
		if let Some(hub) = &self.hub {
			self.positions.insert(hub.clone(), self.center);
		}
	}

	/// Moves the hub to the new center and rescales the ring.
	pub fn resize(&mut self, width: f64, height: f64) {
		let center = Point::new(width / 2.0, height / 2.0);
		let shift = center - self.center;
		for point in self.placed.values_mut() {
			*point += shift;
		}
		self.center = center;
		self.ring_radius = width.min(height) * self.config.ring_ratio;
		self.place();
	}

	/// Placed position of a node.
	pub fn position(&self, id: &NodeId) -> Option<Point> {
		self.placed
			.get(id)
			.or_else(|| self.positions.get(id))
			.copied()
	}

	/// Moves a node by hand; it stays where it is dropped.
	pub fn place_at(&mut self, id: &NodeId, at: Point) {
		if self.positions.contains_key(id) {
			self.placed.insert(id.clone(), at);
		}
	}

	/// The node placed at the center.
	pub fn hub(&self) -> Option<&NodeId> {
		self.hub.as_ref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::Node;

	fn ring(n: i64) -> GraphData {
		let mut nodes = vec![Node::new("hub", "Hub", 5.0).with_category("main")];
		nodes.extend((0..n).map(|i| Node::new(i, format!("n{i}"), 50.0)));
		GraphData {
			nodes,
			links: vec![],
		}
	}

	#[test]
	fn test_hub_sits_at_center_and_others_on_ring() {
		let mut layout = OrbitalLayout::new(OrbitalConfig::default(), 800.0, 600.0);
		layout.sync(&ring(6));
		let center = Point::new(400.0, 300.0);
		assert_eq!(layout.position(&"hub".into()), Some(center));
		for i in 0..6i64 {
			let d = layout.position(&NodeId::Int(i)).unwrap().distance(center);
			assert!((d - 180.0).abs() <= 25.0, "ring distance {d}");
		}
	}

	#[test]
	fn test_angles_are_evenly_spaced() {
		let config = OrbitalConfig {
			jitter: 0.0,
			..OrbitalConfig::default()
		};
		let mut layout = OrbitalLayout::new(config, 800.0, 600.0);
		layout.sync(&ring(4));
		let p = layout.position(&NodeId::Int(1)).unwrap();
		assert!((p.x - 400.0).abs() < 1e-9);
		assert!((p.y - 480.0).abs() < 1e-9);
	}

	#[test]
	fn test_drop_position_survives_resync() {
		let mut layout = OrbitalLayout::new(OrbitalConfig::default(), 800.0, 600.0);
		layout.sync(&ring(3));
		let spot = Point::new(12.0, 34.0);
		layout.place_at(&NodeId::Int(0), spot);
		layout.sync(&ring(5));
		assert_eq!(layout.position(&NodeId::Int(0)), Some(spot));
		layout.sync(&ring(0));
		assert_eq!(layout.position(&NodeId::Int(0)), None);
	}

	#[test]
	fn test_is_deterministic() {
		let mut a = OrbitalLayout::new(OrbitalConfig::default(), 800.0, 600.0);
		let mut b = OrbitalLayout::new(OrbitalConfig::default(), 800.0, 600.0);
		a.sync(&ring(8));
		b.sync(&ring(8));
		for i in 0..8i64 {
			assert_eq!(a.position(&NodeId::Int(i)), b.position(&NodeId::Int(i)));
		}
	}
}
