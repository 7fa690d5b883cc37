//! Pointer coordinate conversion and hit-testing, detached from the DOM.

use super::types::{NodeId, Point};

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 10.0;

/// Canvas size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Width in CSS pixels.
	pub width: f64,
	/// Height in CSS pixels.
	pub height: f64,
}

impl Viewport {
	/// Uses the fallback for any side the container has not laid out yet.
	pub fn measured(width: f64, height: f64, fallback: (f64, f64)) -> Self {
		let usable = |v: f64| v.is_finite() && v > 0.0;
		Self {
			width: if usable(width) { width } else { fallback.0 },
			height: if usable(height) { height } else { fallback.1 },
		}
	}

	/// Canvas midpoint.
	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}
}

/// Pan offset and zoom factor applied on top of layout coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal pan.
	pub x: f64,
	/// Vertical pan.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Inverse of `graph_to_screen`.
	pub fn screen_to_graph(&self, screen: Point) -> Point {
		(screen - Point::new(self.x, self.y)) / self.k
	}

	/// Applies zoom then pan.
	pub fn graph_to_screen(&self, graph: Point) -> Point {
		graph * self.k + Point::new(self.x, self.y)
	}

	/// Zooms one wheel notch, keeping the point under `anchor` fixed.
	pub fn zoom_at(&mut self, anchor: Point, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.k;
		self.x = anchor.x - (anchor.x - self.x) * ratio;
		self.y = anchor.y - (anchor.y - self.y) * ratio;
		self.k = new_k;
	}
}

/// What the interaction layer needs from a rendering surface.
pub trait Surface {
	/// Converts a client (page) position into the coordinates
	/// [`Surface::hit_test`] and the layout understand.
	fn to_local(&self, client: Point) -> Point;

	/// Topmost node under `local`, if any.
	fn hit_test(&self, local: Point) -> Option<NodeId>;
}

/// A node target in layout coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeHit {
	/// Node id.
	pub id: NodeId,
	/// Center in layout coordinates.
	pub center: Point,
	/// Hit radius in layout units.
	pub radius: f64,
}

/// Flat surface: local coordinates are layout coordinates.
#[derive(Clone, Debug)]
pub struct PlanarSurface {
	/// Canvas top-left in client coordinates.
	pub origin: Point,
	/// Pan and zoom used to map local points.
	pub transform: ViewTransform,
	/// In draw order; later entries are on top.
	pub targets: Vec<NodeHit>,
}

impl PlanarSurface {
	/// Client position relative to the canvas, before the view transform.
	pub fn to_canvas(&self, client: Point) -> Point {
		client - self.origin
	}
}

impl Surface for PlanarSurface {
	fn to_local(&self, client: Point) -> Point {
		self.transform.screen_to_graph(self.to_canvas(client))
	}

	fn hit_test(&self, local: Point) -> Option<NodeId> {
		self.targets
			.iter()
			.rev()
			.find(|hit| hit.center.distance_squared(local) <= hit.radius * hit.radius)
			.map(|hit| hit.id.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_zero_size_falls_back() {
		let fallback = (800.0, 600.0);
		assert_eq!(
			Viewport::measured(0.0, 0.0, fallback),
			Viewport {
				width: 800.0,
				height: 600.0
			}
		);
		assert_eq!(Viewport::measured(1024.0, f64::NAN, fallback).height, 600.0);
		assert_eq!(Viewport::measured(1024.0, 700.0, fallback).width, 1024.0);
	}

	#[test]
	fn test_zoom_keeps_anchor_fixed() {
		let mut t = ViewTransform::default();
		let anchor = Point::new(200.0, 100.0);
		let before = t.screen_to_graph(anchor);
		t.zoom_at(anchor, -1.0);
		assert!((t.k - 1.1).abs() < 1e-12);
		assert!(t.screen_to_graph(anchor).distance(before) < 1e-9);
		for _ in 0..100 {
			t.zoom_at(anchor, 1.0);
		}
		assert_eq!(t.k, MIN_ZOOM);
	}

	#[test]
	fn test_hit_test_prefers_topmost() {
		let surface = PlanarSurface {
			origin: Point::new(10.0, 20.0),
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 2.0,
			},
			targets: vec![
				NodeHit {
					id: "under".into(),
					center: Point::new(50.0, 50.0),
					radius: 20.0,
				},
				NodeHit {
					id: "over".into(),
					center: Point::new(60.0, 50.0),
					radius: 20.0,
				},
			],
		};
		let local = surface.to_local(Point::new(120.0, 120.0));
		assert_eq!(local, Point::new(55.0, 50.0));
		assert_eq!(surface.hit_test(local), Some("over".into()));
		assert_eq!(surface.hit_test(Point::new(31.0, 50.0)), Some("under".into()));
		assert_eq!(surface.hit_test(Point::new(500.0, 500.0)), None);
	}
}
