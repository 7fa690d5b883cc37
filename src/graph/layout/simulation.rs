//! Velocity-Verlet force simulation with a decaying alpha.
//!
//! Each tick moves alpha toward its target, accumulates link, many-body,
//! centering and collision forces into velocities, then integrates. Pinned
//! bodies are reset to their pin after every tick but still push and pull on
//! the rest.
//!
//! ```ignore
//! let mut sim = ForceSimulation::new(ForceConfig::default(), center);
//! sim.sync(&data, &style);
//! // Each frame:
//! if sim.tick() {
//!     for body in sim.bodies() { draw(body.position) }
//! }
//! ```

use std::collections::HashMap;
use std::f64::consts::PI;

use log::debug;

use crate::graph::config::{ForceConfig, StyleConfig};
use crate::graph::style;
use crate::graph::types::{GraphData, NodeId, Point};

const INITIAL_RADIUS: f64 = 10.0;
const MIN_CHARGE_DISTANCE_SQ: f64 = 1.0;

/// A simulated node.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
	/// Node this body stands for.
	pub id: NodeId,
	/// Current layout position.
	pub position: Point,
	velocity: Point,
	/// Set while dragged; the solver never moves a pinned body.
	pin: Option<Point>,
	/// Collision radius: rendered radius plus padding.
	pub radius: f64,
}

impl Body {
	/// Whether a drag holds the body.
	pub fn is_pinned(&self) -> bool {
		self.pin.is_some()
	}
}

#[derive(Clone, Debug)]
struct Spring {
	source: usize,
	target: usize,
	distance: f64,
	strength: f64,
	/// Share of the correction applied to the target.
	bias: f64,
}

/// Linear congruential generator used for jiggle, so runs are repeatable.
#[derive(Clone, Debug)]
struct Lcg(u32);

impl Lcg {
	fn next(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		self.0 as f64 / 4_294_967_296.0
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

/// Link, charge, collision and centering forces integrated one tick at a time.
#[derive(Clone, Debug)]
pub struct ForceSimulation {
	bodies: Vec<Body>,
	index: HashMap<NodeId, usize>,
	springs: Vec<Spring>,
	config: ForceConfig,
	center: Point,
	alpha: f64,
	alpha_target: f64,
	rng: Lcg,
}

impl ForceSimulation {
	/// Empty simulation pulling toward `center`.
	pub fn new(config: ForceConfig, center: Point) -> Self {
		Self {
			bodies: Vec::new(),
			index: HashMap::new(),
			springs: Vec::new(),
			config,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			rng: Lcg(1),
		}
	}

	/// Rebuilds bodies and springs for `data`, keeping the position, velocity
	/// and pin of every node that was already simulated.
	pub fn sync(&mut self, data: &GraphData, style_config: &StyleConfig) {
		let mut previous: HashMap<NodeId, Body> = self
			.bodies
			.drain(..)
			.map(|body| (body.id.clone(), body))
			.collect();
		self.index.clear();

		for (i, node) in data.nodes.iter().enumerate() {
			if self.index.contains_key(&node.id) {
				continue;
			}
			let radius =
				style::node_radius(node.magnitude(), style_config) + self.config.collide_padding;
			let body = match previous.remove(&node.id) {
				Some(mut body) => {
					body.radius = radius;
					body
				}
				None => Body {
					id: node.id.clone(),
					position: node
						.seed_position()
						.unwrap_or_else(|| self.phyllotaxis(i)),
					velocity: Point::ZERO,
					pin: None,
					radius,
				},
			};
			self.index.insert(node.id.clone(), self.bodies.len());
			self.bodies.push(body);
		}

		let mut degree = vec![0usize; self.bodies.len()];
		let mut resolved = Vec::with_capacity(data.links.len());
		for link in &data.links {
			match (self.index.get(&link.source), self.index.get(&link.target)) {
				(Some(&s), Some(&t)) => {
					degree[s] += 1;
					degree[t] += 1;
					resolved.push((s, t, link));
				}
				_ => debug!(
					"Skipping link {} -> {}: endpoint not in view",
					link.source, link.target
				),
			}
		}
		self.springs = resolved
			.into_iter()
			.map(|(source, target, link)| Spring {
				source,
				target,
				distance: self.config.link_distance + link.value * self.config.link_distance_scale,
				strength: link.strength.unwrap_or(self.config.link_strength),
				bias: degree[source] as f64 / (degree[source] + degree[target]) as f64,
			})
			.collect();
	}

	fn phyllotaxis(&self, i: usize) -> Point {
		let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
		let angle = i as f64 * PI * (3.0 - 5f64.sqrt());
		self.center + Point::new(radius * angle.cos(), radius * angle.sin())
	}

	/// All bodies in data order.
	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	/// Current position of a body.
	pub fn position(&self, id: &NodeId) -> Option<Point> {
		self.index.get(id).map(|&i| self.bodies[i].position)
	}

	/// Current cooling factor.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Point the centering force pulls toward.
	pub fn center(&self) -> Point {
		self.center
	}

	/// Nothing moves until the next reheat.
	pub fn is_resting(&self) -> bool {
		self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min
	}

	/// Raises alpha to at least `alpha` so the layout visibly re-settles.
	pub fn reheat(&mut self, alpha: f64) {
		self.alpha = self.alpha.max(alpha);
	}

	/// Alpha the simulation decays toward.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Moves the centering target.
	pub fn set_center(&mut self, center: Point) {
		self.center = center;
	}

	/// Fixes a body at `at` until released.
	pub fn pin(&mut self, id: &NodeId, at: Point) {
		if let Some(&i) = self.index.get(id) {
			let body = &mut self.bodies[i];
			body.pin = Some(at);
			body.position = at;
			body.velocity = Point::ZERO;
		}
	}

	/// Lets a pinned body move again.
	pub fn release(&mut self, id: &NodeId) {
		if let Some(&i) = self.index.get(id) {
			self.bodies[i].pin = None;
		}
	}

	/// Advances one step. Returns `false` when resting.
	pub fn tick(&mut self) -> bool {
		if self.bodies.is_empty() || self.is_resting() {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		self.apply_links();
		self.apply_charge();
		self.apply_center();
		self.apply_collision();

		let keep = 1.0 - self.config.velocity_decay;
		for body in &mut self.bodies {
			match body.pin {
				Some(pin) => {
					body.position = pin;
					body.velocity = Point::ZERO;
				}
				None => {
					body.velocity *= keep;
					body.position += body.velocity;
				}
			}
		}
		true
	}

	fn apply_links(&mut self) {
		for spring in &self.springs {
			let (s, t) = (&self.bodies[spring.source], &self.bodies[spring.target]);
			let mut delta = (t.position + t.velocity) - (s.position + s.velocity);
			if delta.x == 0.0 {
				delta.x = self.rng.jiggle();
			}
			if delta.y == 0.0 {
				delta.y = self.rng.jiggle();
			}
			let length = delta.length();
			let correction =
				delta * ((length - spring.distance) / length * self.alpha * spring.strength);
			self.bodies[spring.target].velocity -= correction * spring.bias;
			self.bodies[spring.source].velocity += correction * (1.0 - spring.bias);
		}
	}

	fn apply_charge(&mut self) {
		let strength = self.config.charge * self.alpha;
		let n = self.bodies.len();
		for i in 0..n {
			let mut push = Point::ZERO;
			for j in 0..n {
				if i == j {
					continue;
				}
				let mut delta = self.bodies[j].position - self.bodies[i].position;
				if delta.x == 0.0 {
					delta.x = self.rng.jiggle();
				}
				if delta.y == 0.0 {
					delta.y = self.rng.jiggle();
				}
				let mut dist_sq = delta.length_squared();
				if dist_sq < MIN_CHARGE_DISTANCE_SQ {
					dist_sq = (MIN_CHARGE_DISTANCE_SQ * dist_sq).sqrt();
				}
				push += delta * (strength / dist_sq);
			}
			self.bodies[i].velocity += push;
		}
	}

	fn apply_center(&mut self) {
		let mean = self.bodies.iter().map(|b| b.position).sum::<Point>() / self.bodies.len() as f64;
		let shift = mean - self.center;
		for body in &mut self.bodies {
			body.position -= shift;
		}
	}

	fn apply_collision(&mut self) {
		let n = self.bodies.len();
		for i in 0..n {
			let ri = self.bodies[i].radius;
			let predicted = self.bodies[i].position + self.bodies[i].velocity;
			for j in (i + 1)..n {
				let rj = self.bodies[j].radius;
				let reach = ri + rj;
				let mut delta = predicted - self.bodies[j].position - self.bodies[j].velocity;
				let mut dist_sq = delta.length_squared();
				if dist_sq >= reach * reach {
					continue;
				}
				if delta.x == 0.0 {
					delta.x = self.rng.jiggle();
					dist_sq += delta.x * delta.x;
				}
				if delta.y == 0.0 {
					delta.y = self.rng.jiggle();
					dist_sq += delta.y * delta.y;
				}
				let dist = dist_sq.sqrt();
				let overlap = delta * ((reach - dist) / dist);
				let share = (rj * rj) / (ri * ri + rj * rj);
				self.bodies[i].velocity += overlap * share;
				self.bodies[j].velocity -= overlap * (1.0 - share);
			}
		}
	}
}
