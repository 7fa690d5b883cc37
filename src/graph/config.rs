//! Tunables for layout, visual encoding and the dashboard shell.
//!
//! Every field has a default, so a partial JSON object deserializes into a
//! complete config.

use serde::{Deserialize, Serialize};

/// Force-directed layout tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
	/// Rest length of a link with `value == 0`.
	pub link_distance: f64,
	/// Extra rest length per unit of link value.
	pub link_distance_scale: f64,
	/// Spring strength for links that carry none.
	pub link_strength: f64,
	/// Many-body strength; negative repels.
	pub charge: f64,
	/// Added to the rendered radius to get the collision radius.
	pub collide_padding: f64,
	/// Alpha below which the simulation rests.
	pub alpha_min: f64,
	/// Per-tick fraction alpha moves toward its target.
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is dragged.
	pub drag_alpha_target: f64,
	/// Alpha restored on data change or resize.
	pub reheat_alpha: f64,
}

impl Default for ForceConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			link_distance: 100.0,
			link_distance_scale: 20.0,
			link_strength: 0.5,
			charge: -300.0,
			collide_padding: 10.0,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
			reheat_alpha: 0.3,
		}
	}
}

/// Orbital layout tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitalConfig {
	/// Ring radius as a fraction of the smaller canvas side.
	pub ring_ratio: f64,
	/// Total spread of the radial jitter.
	pub jitter: f64,
}

impl Default for OrbitalConfig {
	fn default() -> Self {
		Self {
			ring_ratio: 0.3,
			jitter: 50.0,
		}
	}
}

/// Radius and stroke encoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
	/// Smallest rendered radius.
	pub radius_floor: f64,
	/// Largest rendered radius.
	pub radius_ceiling: f64,
	/// Radius per square root of magnitude.
	pub radius_scale: f64,
	/// Stroke width per unit of link value.
	pub edge_width_scale: f64,
	/// Thinnest stroke.
	pub edge_width_floor: f64,
	/// Characters kept before a label is ellipsized.
	pub label_budget: usize,
}

impl Default for StyleConfig {
	fn default() -> Self {
		Self {
			radius_floor: 14.0,
			radius_ceiling: 32.0,
			radius_scale: 1.6,
			edge_width_scale: 2.0,
			edge_width_floor: 1.0,
			label_budget: 15,
		}
	}
}

/// Dashboard settings. Every field has a default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Force layout.
	pub force: ForceConfig,
	/// Orbital layout.
	pub orbital: OrbitalConfig,
	/// Node and link encoding.
	pub style: StyleConfig,
	/// Canvas size used while the container measures zero.
	pub fallback_width: f64,
	/// See `fallback_width`.
	pub fallback_height: f64,
	/// Rows shown in the ranking panel.
	pub ranking_size: usize,
	/// Where the initial document is fetched from.
	pub data_url: String,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			force: ForceConfig::default(),
			orbital: OrbitalConfig::default(),
			style: StyleConfig::default(),
			fallback_width: 800.0,
			fallback_height: 600.0,
			ranking_size: 10,
			data_url: "data/nodes.json".into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_partial_json_fills_defaults() {
		let config: GraphConfig =
			serde_json::from_str(r#"{ "force": { "charge": -120 }, "ranking_size": 5 }"#).unwrap();
		assert_eq!(config.force.charge, -120.0);
		assert_eq!(config.force.link_distance, 100.0);
		assert_eq!(config.ranking_size, 5);
		assert_eq!(config.style.label_budget, 15);
	}

	#[test]
	fn test_alpha_decay_reaches_min_in_300_ticks() {
		let force = ForceConfig::default();
		let mut alpha = 1.0;
		for _ in 0..300 {
			alpha += (0.0 - alpha) * force.alpha_decay;
		}
		assert!((alpha - force.alpha_min).abs() < 1e-9);
	}
}
