use log::info;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::grid::{Grid, build_grid};
use super::params::NetworkParams;
use super::types::{Connection, ConnectionId, DataPacket, Node};

/// Everything the animation mutates between frames.
pub struct NetworkState {
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	/// Node arena.
	pub nodes: Vec<Node>,
	/// Connection arena.
	pub connections: Vec<Connection>,
	/// Packets still in flight.
	pub packets: Vec<DataPacket>,
	/// Latest pointer position in canvas pixels, if over the canvas.
	pub pointer: Option<(f64, f64)>,
	generation: u32,
	params: NetworkParams,
	rng: StdRng,
}

impl NetworkState {
	/// Builds the initial grid for a viewport from a fixed seed.
	pub fn new(width: f64, height: f64, params: NetworkParams, seed: u64) -> Self {
		let mut state = Self {
			width,
			height,
			nodes: Vec::new(),
			connections: Vec::new(),
			packets: Vec::new(),
			pointer: None,
			generation: 0,
			params,
			rng: StdRng::seed_from_u64(seed),
		};
		state.rebuild(width, height);
		state
	}

	/// Tuning in use.
	pub fn params(&self) -> &NetworkParams {
		&self.params
	}

	/// How many grids have been built, the initial one included.
	pub fn generation(&self) -> u32 {
		self.generation
	}

	/// Replaces every node, connection and packet with a fresh grid.
	pub fn rebuild(&mut self, width: f64, height: f64) {
		let Grid { nodes, connections } = build_grid(width, height, &self.params, &mut self.rng);
		self.width = width;
		self.height = height;
		self.nodes = nodes;
		self.connections = connections;
		self.packets.clear();
		self.generation += 1;
		info!(
			"network grid #{} built: {}x{}, {} nodes, {} connections",
			self.generation,
			width,
			height,
			self.nodes.len(),
			self.connections.len()
		);
	}

	/// Advances the simulation one frame: connections, then nodes, then packets.
	pub fn step(&mut self) {
		self.step_connections();
		self.step_nodes();
		self.step_packets();
	}

	fn step_connections(&mut self) {
		let Self {
			nodes,
			connections,
			packets,
			params,
			rng,
			..
		} = self;
		for (idx, link) in connections.iter_mut().enumerate() {
			if let Some(packet) = link.update(ConnectionId(idx), nodes, params, rng) {
				packets.push(packet);
			}
		}
	}

	fn step_nodes(&mut self) {
		let Self {
			nodes,
			pointer,
			params,
			rng,
			..
		} = self;
		for node in nodes.iter_mut() {
			node.update(*pointer, params, rng);
		}
	}

	fn step_packets(&mut self) {
		// Successors spawned below wait until the next frame to move.
		let in_flight = self.packets.len();
		for idx in 0..in_flight {
			if self.packets[idx].advance() {
				self.arrive(idx);
			}
		}
		self.packets.retain(|p| !p.completed);
	}

	fn arrive(&mut self, idx: usize) {
		let (start, end, via) = {
			let p = &self.packets[idx];
			(p.start, p.end, p.via)
		};
		let Some(dest) = self.nodes.get_mut(end.0) else {
			return;
		};
		dest.activate();

		if !self.rng.gen_bool(self.params.propagate_probability.clamp(0.0, 1.0)) {
			return;
		}
		let candidates: Vec<ConnectionId> = dest
			.connections
			.iter()
			.copied()
			.filter(|&c| c != via)
			.filter(|&c| {
				self.connections
					.get(c.0)
					.is_some_and(|link| link.other(end) != start)
			})
			.collect();
		let Some(&next) = candidates.choose(&mut self.rng) else {
			return;
		};
		let Some(link) = self.connections.get(next.0) else {
			return;
		};
		let packet = DataPacket::new(
			end,
			link.other(end),
			next,
			&self.nodes[end.0].color,
			&self.params,
			&mut self.rng,
		);
		self.packets.push(packet);
	}
}
