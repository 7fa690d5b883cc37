//! Visual encoding: color, radius, stroke width and label text.

use std::borrow::Cow;

use super::config::StyleConfig;
use super::types::Node;

/// Color for nodes without a known category.
pub const FALLBACK_COLOR: &str = "#9E9E9E";

const CATEGORY_COLORS: &[(&str, &str)] = &[
	("ONG", "#4CAF50"),
	("Influenceur", "#2196F3"),
	("Institution", "#FF9800"),
	("Fondation", "#9C27B0"),
	("Entreprise", "#F44336"),
	("finance", "#3B82F6"),
	("tech", "#06B6D4"),
	("government", "#F59E0B"),
	("ngo", "#10B981"),
	("research", "#8B5CF6"),
	("energy", "#EF4444"),
	("investment", "#84CC16"),
	("organization", "#2563EB"),
	("topic", "#10B981"),
	("influencer", "#F59E0B"),
	("main", "#7DE3F4"),
	("inactive", "#384356"),
];

/// Palette color for a category.
pub fn category_color(category: Option<&str>) -> &'static str {
	category
		.and_then(|c| CATEGORY_COLORS.iter().find(|(name, _)| *name == c))
		.map(|(_, color)| *color)
		.unwrap_or(FALLBACK_COLOR)
}

/// Explicit color first, then the category table, then gray.
pub fn node_color(node: &Node) -> &str {
	match node.color.as_deref() {
		Some(color) if !color.is_empty() => color,
		_ => category_color(node.category.as_deref()),
	}
}

/// Square-root scaled radius, clamped to the configured floor and ceiling.
pub fn node_radius(magnitude: f64, style: &StyleConfig) -> f64 {
	let scaled = style.radius_floor + magnitude.max(0.0).sqrt() * style.radius_scale;
	scaled.clamp(style.radius_floor, style.radius_ceiling.max(style.radius_floor))
}

/// Stroke width for a link value.
pub fn edge_width(value: f64, style: &StyleConfig) -> f64 {
	(value.max(0.0).sqrt() * style.edge_width_scale).max(style.edge_width_floor)
}

/// Shortens `label` to `budget` characters plus an ellipsis.
pub fn truncate_label(label: &str, budget: usize) -> Cow<'_, str> {
	match label.char_indices().nth(budget) {
		Some((cut, _)) => Cow::Owned(format!("{}...", &label[..cut])),
		None => Cow::Borrowed(label),
	}
}
