use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Position on the 2D layout plane.
pub type Point = DVec2;

/// Stable node identifier. Data files use either strings or integers.
///
/// Ordering puts integers before strings, integers numerically and strings
/// lexicographically; ranking ties are broken with it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
	/// Numeric id.
	Int(i64),
	/// String id.
	Text(String),
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NodeId::Int(i) => write!(f, "{i}"),
			NodeId::Text(s) => f.write_str(s),
		}
	}
}

impl From<i64> for NodeId {
	fn from(value: i64) -> Self {
		NodeId::Int(value)
	}
}

impl From<i32> for NodeId {
	fn from(value: i32) -> Self {
		NodeId::Int(value.into())
	}
}

impl From<&str> for NodeId {
	fn from(value: &str) -> Self {
		NodeId::Text(value.to_string())
	}
}

impl From<String> for NodeId {
	fn from(value: String) -> Self {
		NodeId::Text(value)
	}
}

/// An actor in the influence network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Unique within a graph.
	pub id: NodeId,
	/// Display name; data files may call it `name`.
	#[serde(default, alias = "name")]
	pub label: String,
	/// Visual grouping only; drives the color lookup.
	#[serde(default, alias = "group", alias = "type")]
	pub category: Option<String>,
	/// Free-form region name.
	#[serde(default)]
	pub region: Option<String>,
	/// Base weight. Filtering uses it directly.
	#[serde(default)]
	pub score: f64,
	/// Explicit magnitude, preferred over `score` when present.
	#[serde(default)]
	pub influence: Option<f64>,
	/// Overrides the category color.
	#[serde(default)]
	pub color: Option<String>,
	/// Fixed layout position.
	#[serde(default)]
	pub x: Option<f64>,
	/// See `x`.
	#[serde(default)]
	pub y: Option<f64>,
	/// Depth used by the 3D scene.
	#[serde(default)]
	pub z: Option<f64>,
}

impl Node {
	/// Node with only the required fields.
	pub fn new(id: impl Into<NodeId>, label: impl Into<String>, score: f64) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			category: None,
			region: None,
			score,
			influence: None,
			color: None,
			x: None,
			y: None,
			z: None,
		}
	}

	/// Sets the category.
	pub fn with_category(mut self, category: impl Into<String>) -> Self {
		self.category = Some(category.into());
		self
	}

	/// Sets the region.
	pub fn with_region(mut self, region: impl Into<String>) -> Self {
		self.region = Some(region.into());
		self
	}

	/// Sets an explicit magnitude.
	pub fn with_influence(mut self, influence: f64) -> Self {
		self.influence = Some(influence);
		self
	}

	/// Fixes the node at a layout position.
	pub fn with_position(mut self, x: f64, y: f64) -> Self {
		self.x = Some(x);
		self.y = Some(y);
		self
	}

	/// Size and ranking magnitude: `influence` when present, else `score`.
	pub fn magnitude(&self) -> f64 {
		self.influence.unwrap_or(self.score).max(0.0)
	}

	/// True for the `main` category, which the orbital layout puts at the hub.
	pub fn is_central(&self) -> bool {
		self.category.as_deref() == Some("main")
	}

	/// Seed position from the data file, if both coordinates were given.
	pub fn seed_position(&self) -> Option<Point> {
		Some(Point::new(self.x?, self.y?))
	}
}

fn default_value() -> f64 {
	1.0
}

/// Weighted relationship between two nodes, referenced by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
	/// Id of the first endpoint.
	#[serde(alias = "from")]
	pub source: NodeId,
	/// Id of the second endpoint.
	#[serde(alias = "to")]
	pub target: NodeId,
	/// Link weight; drives stroke width and rest length.
	#[serde(default = "default_value", alias = "weight")]
	pub value: f64,
	/// Spring strength override.
	#[serde(default)]
	pub strength: Option<f64>,
}

impl Link {
	/// Link of default weight.
	pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			value: default_value(),
			strength: None,
		}
	}

	/// Sets the weight.
	pub fn with_value(mut self, value: f64) -> Self {
		self.value = value;
		self
	}

	/// Sets the spring strength.
	pub fn with_strength(mut self, strength: f64) -> Self {
		self.strength = Some(strength);
		self
	}

	/// Whether `id` is either endpoint.
	pub fn touches(&self, id: &NodeId) -> bool {
		&self.source == id || &self.target == id
	}
}

/// The `{ nodes, links }` document the dashboard loads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// Every node in the document.
	#[serde(default)]
	pub nodes: Vec<Node>,
	/// Data files may call this `edges`.
	#[serde(default, alias = "edges")]
	pub links: Vec<Link>,
}

impl GraphData {
	/// True when there are no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
