use rand::Rng;
use rand::seq::SliceRandom;

use super::params::{NetworkParams, Range};

const FALLBACK_COLOR: &str = "#ffffff";

/// Index of a node in the simulation arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// Index of a connection in the simulation arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(pub usize);

fn sample(rng: &mut impl Rng, (min, max): Range) -> f64 {
	if max > min { rng.gen_range(min..=max) } else { min }
}

fn chance(rng: &mut impl Rng, p: f64) -> bool {
	rng.gen_bool(p.clamp(0.0, 1.0))
}

/// A point of the decorative graph.
#[derive(Clone, Debug)]
pub struct Node {
	/// Horizontal position in canvas pixels.
	pub x: f64,
	/// Vertical position in canvas pixels.
	pub y: f64,
	/// Resting radius.
	pub base_radius: f64,
	/// Drawn radius, `base_radius` plus the pointer bonus.
	pub radius: f64,
	/// Whether the node is lit.
	pub active: bool,
	/// Steps spent active since the last (re)activation.
	pub elapsed: f64,
	/// Steps after which an active node may decay.
	pub duration: f64,
	/// Current pulse ring radius, within `[0, pulse_max]`.
	pub pulse: f64,
	/// `1.0` while the pulse grows, `-1.0` while it shrinks.
	pub pulse_direction: f64,
	/// Pulse change per step.
	pub pulse_speed: f64,
	/// Fill color, fixed at creation.
	pub color: String,
	/// Incident connections.
	pub connections: Vec<ConnectionId>,
}

impl Node {
	/// Creates a node at `(x, y)` with randomized looks.
	pub fn new(x: f64, y: f64, params: &NetworkParams, rng: &mut impl Rng) -> Self {
		let base_radius = sample(rng, params.node_radius);
		let color = params
			.palette
			.choose(rng)
			.cloned()
			.unwrap_or_else(|| FALLBACK_COLOR.to_string());
		Self {
			x,
			y,
			base_radius,
			radius: base_radius,
			active: chance(rng, params.initial_active_probability),
			elapsed: 0.0,
			duration: sample(rng, params.activation_duration),
			pulse: rng.gen_range(0.0..=params.pulse_max.max(0.0)),
			pulse_direction: 1.0,
			pulse_speed: sample(rng, params.pulse_speed),
			color,
			connections: Vec::new(),
		}
	}

	/// Lights the node and restarts its activation timer.
	pub fn activate(&mut self) {
		self.active = true;
		self.elapsed = 0.0;
	}

	/// Euclidean distance to a point.
	pub fn distance_to(&self, x: f64, y: f64) -> f64 {
		((self.x - x).powi(2) + (self.y - y).powi(2)).sqrt()
	}

	/// Advances the node by one step.
	pub fn update(&mut self, pointer: Option<(f64, f64)>, params: &NetworkParams, rng: &mut impl Rng) {
		if self.active {
			self.elapsed += 1.0;
		}

		self.pulse += self.pulse_speed * self.pulse_direction;
		if self.pulse >= params.pulse_max {
			self.pulse = params.pulse_max;
			self.pulse_direction = -1.0;
		} else if self.pulse <= 0.0 {
			self.pulse = 0.0;
			self.pulse_direction = 1.0;
		}

		if self.active {
			if self.elapsed > self.duration && chance(rng, params.deactivate_probability) {
				self.active = false;
				self.elapsed = 0.0;
			}
		} else if chance(rng, params.self_activate_probability) {
			self.activate();
		}

		match pointer.map(|(px, py)| self.distance_to(px, py)) {
			Some(dist) if dist < params.pointer_radius => {
				self.activate();
				let proximity = 1.0 - dist / params.pointer_radius;
				self.radius = self.base_radius + params.pointer_growth.max(0.0) * proximity;
			}
			_ => self.radius = self.base_radius,
		}
	}
}

/// An edge between two nodes.
#[derive(Clone, Debug)]
pub struct Connection {
	/// Endpoint that emits packets.
	pub source: NodeId,
	/// Endpoint that receives packets.
	pub target: NodeId,
	/// Stroke width.
	pub width: f64,
	/// Recomputed every step from both endpoints.
	pub active: bool,
}

impl Connection {
	/// Creates an inactive connection, picking its traffic direction at random.
	pub fn new(a: NodeId, b: NodeId, params: &NetworkParams, rng: &mut impl Rng) -> Self {
		let (source, target) = if rng.gen_bool(0.5) { (a, b) } else { (b, a) };
		Self {
			source,
			target,
			width: sample(rng, params.link_width),
			active: false,
		}
	}

	/// The endpoint opposite `node`.
	pub fn other(&self, node: NodeId) -> NodeId {
		if self.source == node { self.target } else { self.source }
	}

	/// Refreshes the active flag and may emit a packet along the traffic direction.
	pub fn update(
		&mut self,
		id: ConnectionId,
		nodes: &[Node],
		params: &NetworkParams,
		rng: &mut impl Rng,
	) -> Option<DataPacket> {
		let (Some(source), Some(target)) = (nodes.get(self.source.0), nodes.get(self.target.0))
		else {
			self.active = false;
			return None;
		};
		self.active = source.active && target.active;
		if self.active && chance(rng, params.spawn_probability) {
			Some(DataPacket::new(self.source, self.target, id, &source.color, params, rng))
		} else {
			None
		}
	}
}

/// A marker travelling along a connection.
#[derive(Clone, Debug)]
pub struct DataPacket {
	/// Node the packet left from.
	pub start: NodeId,
	/// Node the packet is heading to.
	pub end: NodeId,
	/// Connection the packet travels on.
	pub via: ConnectionId,
	/// Inherited from the start node.
	pub color: String,
	/// Fraction of the path covered; never decreases.
	pub progress: f64,
	/// Progress gained per step.
	pub speed: f64,
	/// Drawn radius.
	pub size: f64,
	/// Set once, when progress reaches 1.
	pub completed: bool,
}

impl DataPacket {
	/// Creates a packet at the start of its path with randomized speed and size.
	pub fn new(
		start: NodeId,
		end: NodeId,
		via: ConnectionId,
		color: &str,
		params: &NetworkParams,
		rng: &mut impl Rng,
	) -> Self {
		Self {
			start,
			end,
			via,
			color: color.to_string(),
			progress: 0.0,
			speed: sample(rng, params.packet_speed).max(0.0),
			size: sample(rng, params.packet_size),
			completed: false,
		}
	}

	/// Moves the packet forward. Returns `true` on the step it arrives.
	pub fn advance(&mut self) -> bool {
		if self.completed {
			return false;
		}
		self.progress += self.speed.max(0.0);
		if self.progress >= 1.0 {
			self.completed = true;
			return true;
		}
		false
	}

	/// Interpolated position between two points.
	pub fn position(&self, from: (f64, f64), to: (f64, f64)) -> (f64, f64) {
		let t = self.progress.min(1.0);
		(from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	fn packet(progress: f64, speed: f64) -> DataPacket {
		DataPacket {
			start: NodeId(0),
			end: NodeId(1),
			via: ConnectionId(0),
			color: "#fff".into(),
			progress,
			speed,
			size: 2.0,
			completed: false,
		}
	}

	fn quiet_params() -> NetworkParams {
		NetworkParams {
			initial_active_probability: 0.0,
			deactivate_probability: 0.0,
			self_activate_probability: 0.0,
			..NetworkParams::default()
		}
	}

	#[test]
	fn packet_near_the_end_completes_in_one_step() {
		let mut p = packet(0.95, 0.1);
		assert!(p.advance());
		assert!(p.completed);
		assert!(p.progress >= 1.0);
	}

	#[test]
	fn completed_packet_stays_put() {
		let mut p = packet(0.95, 0.1);
		p.advance();
		let progress = p.progress;
		assert!(!p.advance());
		assert_eq!(p.progress, progress);
	}

	#[test]
	fn pulse_bounces_between_bounds() {
		let params = quiet_params();
		let mut rng = StdRng::seed_from_u64(3);
		let mut node = Node::new(0.0, 0.0, &params, &mut rng);
		node.pulse = params.pulse_max - 0.01;
		node.pulse_direction = 1.0;
		node.update(None, &params, &mut rng);
		assert_eq!(node.pulse, params.pulse_max);
		assert_eq!(node.pulse_direction, -1.0);

		node.pulse = 0.01;
		node.update(None, &params, &mut rng);
		assert_eq!(node.pulse, 0.0);
		assert_eq!(node.pulse_direction, 1.0);
	}

	#[test]
	fn active_node_never_decays_before_its_duration() {
		let params = NetworkParams {
			deactivate_probability: 1.0,
			..quiet_params()
		};
		let mut rng = StdRng::seed_from_u64(5);
		let mut node = Node::new(0.0, 0.0, &params, &mut rng);
		node.activate();
		node.duration = 10.0;
		for _ in 0..10 {
			node.update(None, &params, &mut rng);
			assert!(node.active);
		}
		node.update(None, &params, &mut rng);
		assert!(!node.active);
	}

	#[test]
	fn pointer_forces_activation_and_growth() {
		let params = quiet_params();
		let mut rng = StdRng::seed_from_u64(9);
		let mut node = Node::new(100.0, 100.0, &params, &mut rng);
		assert!(!node.active);

		node.update(Some((100.0, 100.0)), &params, &mut rng);
		assert!(node.active);
		assert!((node.radius - (node.base_radius + params.pointer_growth)).abs() < 1e-9);

		node.update(Some((1000.0, 1000.0)), &params, &mut rng);
		assert_eq!(node.radius, node.base_radius);
	}

	#[test]
	fn connection_spawns_from_its_source() {
		let params = NetworkParams {
			spawn_probability: 1.0,
			..quiet_params()
		};
		let mut rng = StdRng::seed_from_u64(11);
		let mut nodes = vec![
			Node::new(0.0, 0.0, &params, &mut rng),
			Node::new(50.0, 0.0, &params, &mut rng),
		];
		let mut link = Connection::new(NodeId(0), NodeId(1), &params, &mut rng);

		assert!(link.update(ConnectionId(0), &nodes, &params, &mut rng).is_none());
		assert!(!link.active);

		nodes.iter_mut().for_each(Node::activate);
		let spawned = link
			.update(ConnectionId(0), &nodes, &params, &mut rng)
			.expect("active link with certain spawn");
		assert!(link.active);
		assert_eq!(spawned.start, link.source);
		assert_eq!(spawned.end, link.target);
		assert_eq!(spawned.color, nodes[link.source.0].color);
	}

	proptest! {
		#![proptest_config(ProptestConfig::with_cases(100))]

		#[test]
		fn prop_radius_never_below_base(
			seed in any::<u64>(),
			pointer in proptest::option::of((-200.0f64..1000.0, -200.0f64..1000.0)),
			steps in 1usize..50,
		) {
			let params = NetworkParams::default();
			let mut rng = StdRng::seed_from_u64(seed);
			let mut node = Node::new(400.0, 300.0, &params, &mut rng);
			for _ in 0..steps {
				node.update(pointer, &params, &mut rng);
				prop_assert!(node.radius >= node.base_radius);
				prop_assert!((0.0..=params.pulse_max).contains(&node.pulse));
			}
		}

		#[test]
		fn prop_progress_is_monotonic_and_completes_once(
			start in 0.0f64..1.0,
			speed in 0.0001f64..0.5,
		) {
			let mut p = packet(start, speed);
			let mut last = p.progress;
			let mut arrivals = 0;
			for _ in 0..20_000 {
				if p.advance() {
					arrivals += 1;
				}
				prop_assert!(p.progress >= last);
				prop_assert_eq!(p.completed, p.progress >= 1.0);
				last = p.progress;
				if p.completed && arrivals > 0 {
					break;
				}
			}
			prop_assert_eq!(arrivals, 1);
			prop_assert!(!p.advance());
		}
	}
}
