//! Orbit camera, projection and ray picking for the 3D view.

use std::f64::consts::FRAC_PI_2;

use glam::{DMat4, DVec3, DVec4};

use crate::graph::surface::Viewport;
use crate::graph::types::Point;

const ROTATE_SPEED: f64 = 0.005;
const PAN_SPEED: f64 = 0.0015;
const MIN_DISTANCE: f64 = 2.0;
const MAX_DISTANCE: f64 = 60.0;
const NEAR: f64 = 0.1;
const FAR: f64 = 1000.0;

/// Camera circling a target point; yaw around +Y, pitch above the XZ plane.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
	/// Point the camera orbits.
	pub target: DVec3,
	/// Angle around +Y in radians.
	pub yaw: f64,
	/// Elevation in radians.
	pub pitch: f64,
	/// Eye distance from the target.
	pub distance: f64,
	/// Vertical field of view in radians.
	pub fov_y: f64,
}

impl Default for OrbitCamera {
	/// Eye at (5, 5, 5) looking at the origin.
	fn default() -> Self {
		Self::looking_from(DVec3::splat(5.0), DVec3::ZERO)
	}
}

impl OrbitCamera {
	/// Camera at `eye` facing `target`.
	pub fn looking_from(eye: DVec3, target: DVec3) -> Self {
		let offset = eye - target;
		let distance = offset.length().max(MIN_DISTANCE);
		Self {
			target,
			yaw: offset.x.atan2(offset.z),
			pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
			distance,
			fov_y: 75f64.to_radians(),
		}
	}

	/// Eye position in world space.
	pub fn eye(&self) -> DVec3 {
		let (sy, cy) = self.yaw.sin_cos();
		let (sp, cp) = self.pitch.sin_cos();
		self.target + DVec3::new(cp * sy, sp, cp * cy) * self.distance
	}

	/// Unit vector from the eye toward the target.
	pub fn forward(&self) -> DVec3 {
		(self.target - self.eye()).normalize_or_zero()
	}

	/// Rotates by a pointer delta in pixels.
	pub fn rotate(&mut self, delta: Point) {
		let limit = FRAC_PI_2 - 0.01;
		self.yaw -= delta.x * ROTATE_SPEED;
		self.pitch = (self.pitch + delta.y * ROTATE_SPEED).clamp(-limit, limit);
	}

	/// Slides the target in the view plane by a pointer delta in pixels.
	pub fn pan(&mut self, delta: Point) {
		let forward = self.forward();
		let right = forward.cross(DVec3::Y).normalize_or_zero();
		let up = right.cross(forward);
		let scale = self.distance * PAN_SPEED;
		self.target += (-right * delta.x + up * delta.y) * scale;
	}

	/// One wheel notch; positive `delta_y` moves away.
	pub fn zoom(&mut self, delta_y: f64) {
		let factor = if delta_y > 0.0 { 1.1 } else { 0.9 };
		self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
	}

	/// World to view matrix.
	pub fn view(&self) -> DMat4 {
		DMat4::look_at_rh(self.eye(), self.target, DVec3::Y)
	}

	/// Projection for the given canvas size.
	pub fn projector(&self, viewport: Viewport) -> Projector {
		let aspect = viewport.width / viewport.height;
		let view_proj = DMat4::perspective_rh(self.fov_y, aspect, NEAR, FAR) * self.view();
		Projector {
			view_proj,
			inverse: view_proj.inverse(),
			eye: self.eye(),
			viewport,
			focal: viewport.height / 2.0 / (self.fov_y / 2.0).tan(),
		}
	}
}

/// A world point as seen on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	/// Canvas position in pixels.
	pub screen: Point,
	/// Distance along the view axis; larger is farther.
	pub depth: f64,
	/// Pixels per world unit at this depth.
	pub scale: f64,
}

/// A half-line in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
	/// Start point.
	pub origin: DVec3,
	/// Unit direction.
	pub dir: DVec3,
}

impl Ray {
	/// Distance to the nearest intersection in front of the origin.
	pub fn sphere_hit(&self, center: DVec3, radius: f64) -> Option<f64> {
		let oc = self.origin - center;
		let b = oc.dot(self.dir);
		let c = oc.length_squared() - radius * radius;
		let disc = b * b - c;
		if disc < 0.0 {
			return None;
		}
		let root = disc.sqrt();
		[-b - root, -b + root].into_iter().find(|t| *t >= 0.0)
	}

	/// Intersection with the plane through `point` with the given normal.
	pub fn plane_hit(&self, point: DVec3, normal: DVec3) -> Option<DVec3> {
		let denom = normal.dot(self.dir);
		if denom.abs() < 1e-9 {
			return None;
		}
		let t = (point - self.origin).dot(normal) / denom;
		(t >= 0.0).then(|| self.origin + self.dir * t)
	}
}

/// Frozen camera state for one frame.
#[derive(Clone, Copy, Debug)]
pub struct Projector {
	view_proj: DMat4,
	inverse: DMat4,
	eye: DVec3,
	viewport: Viewport,
	focal: f64,
}

impl Projector {
	/// `None` for points behind the camera.
	pub fn project(&self, world: DVec3) -> Option<Projected> {
		let clip = self.view_proj * DVec4::from((world, 1.0));
		if clip.w <= NEAR {
			return None;
		}
		let ndc = clip.truncate() / clip.w;
		Some(Projected {
			screen: Point::new(
				(ndc.x + 1.0) / 2.0 * self.viewport.width,
				(1.0 - ndc.y) / 2.0 * self.viewport.height,
			),
			depth: clip.w,
			scale: self.focal / clip.w,
		})
	}

	/// Ray from the eye through a canvas pixel.
	pub fn ray(&self, screen: Point) -> Ray {
		let ndc_x = screen.x / self.viewport.width * 2.0 - 1.0;
		let ndc_y = 1.0 - screen.y / self.viewport.height * 2.0;
		let far = self.inverse.project_point3(DVec3::new(ndc_x, ndc_y, 1.0));
		Ray {
			origin: self.eye,
			dir: (far - self.eye).normalize_or_zero(),
		}
	}
}

/// Quadratic Bezier from `a` to `b` whose midpoint is lifted by `lift`
/// along +Y.
pub fn arc(a: DVec3, b: DVec3, lift: f64, segments: usize) -> Vec<DVec3> {
	let control = (a + b) / 2.0 + DVec3::Y * (2.0 * lift);
	let segments = segments.max(1);
	(0..=segments)
		.map(|i| {
			let t = i as f64 / segments as f64;
			let u = 1.0 - t;
			a * (u * u) + control * (2.0 * u * t) + b * (t * t)
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn viewport() -> Viewport {
		Viewport {
			width: 800.0,
			height: 600.0,
		}
	}

	#[test]
	fn test_default_camera_sits_at_five_five_five() {
		let camera = OrbitCamera::default();
		assert!(camera.eye().distance(DVec3::splat(5.0)) < 1e-9);
	}

	#[test]
	fn test_target_projects_to_center() {
		let projector = OrbitCamera::default().projector(viewport());
		let p = projector.project(DVec3::ZERO).unwrap();
		assert!(p.screen.distance(Point::new(400.0, 300.0)) < 1e-6);
		assert!((p.depth - 75f64.sqrt()).abs() < 1e-6);
	}

	#[test]
	fn test_ray_through_projection_hits_sphere() {
		let projector = OrbitCamera::default().projector(viewport());
		let center = DVec3::new(1.0, -0.5, 0.3);
		let screen = projector.project(center).unwrap().screen;
		let ray = projector.ray(screen);
		assert!(ray.sphere_hit(center, 0.2).is_some());
		assert!(ray.sphere_hit(center + DVec3::X * 3.0, 0.2).is_none());
	}

	#[test]
	fn test_behind_camera_is_not_projected() {
		let projector = OrbitCamera::default().projector(viewport());
		assert!(projector.project(DVec3::splat(20.0)).is_none());
	}

	#[test]
	fn test_plane_hit() {
		let ray = Ray {
			origin: DVec3::new(0.0, 5.0, 0.0),
			dir: DVec3::NEG_Y,
		};
		assert_eq!(ray.plane_hit(DVec3::ZERO, DVec3::Y), Some(DVec3::ZERO));
		assert_eq!(ray.plane_hit(DVec3::ZERO, DVec3::X), None);
	}

	#[test]
	fn test_arc_passes_through_lifted_midpoint() {
		let (a, b) = (DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0));
		let points = arc(a, b, 0.5, 16);
		assert_eq!(points.len(), 17);
		assert_eq!(points[0], a);
		assert_eq!(points[16], b);
		assert!(points[8].distance(DVec3::new(1.0, 0.5, 0.0)) < 1e-12);
	}

	#[test]
	fn test_zoom_and_rotate_are_clamped() {
		let mut camera = OrbitCamera::default();
		for _ in 0..100 {
			camera.zoom(-1.0);
			camera.rotate(Point::new(0.0, 50.0));
		}
		assert_eq!(camera.distance, MIN_DISTANCE);
		assert!(camera.pitch < FRAC_PI_2);
	}
}
