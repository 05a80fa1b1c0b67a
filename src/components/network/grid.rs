use rand::Rng;

use super::params::NetworkParams;
use super::types::{Connection, ConnectionId, Node, NodeId};

/// Nodes and connections covering one viewport.
#[derive(Clone, Debug, Default)]
pub struct Grid {
	/// Node arena; [`NodeId`] indexes into it.
	pub nodes: Vec<Node>,
	/// Connection arena; [`ConnectionId`] indexes into it.
	pub connections: Vec<Connection>,
}

/// Lays out a jittered grid of nodes over `width` x `height` and links pairs
/// whose distance falls inside the configured band.
pub fn build_grid(width: f64, height: f64, params: &NetworkParams, rng: &mut impl Rng) -> Grid {
	let mut grid = Grid::default();
	if !(width > 0.0 && height > 0.0) {
		return grid;
	}

	let (sx, sy) = params.spacing(width, height);
	if !(sx > 0.0 && sy > 0.0) {
		return grid;
	}
	let (cols, rows) = (
		(width / sx).ceil() as usize + 1,
		(height / sy).ceil() as usize + 1,
	);
	let skip = params.skip_probability.clamp(0.0, 1.0);

	for col in 0..cols {
		for row in 0..rows {
			if rng.gen_bool(skip) {
				continue;
			}
			let x = col as f64 * sx + (rng.gen_range(0.0..1.0) - 0.5) * sx;
			let y = row as f64 * sy + (rng.gen_range(0.0..1.0) - 0.5) * sy;
			grid.nodes.push(Node::new(x, y, params, rng));
		}
	}

	let (min, max) = params.link_band;
	let link = params.link_probability.clamp(0.0, 1.0);
	for i in 0..grid.nodes.len() {
		for j in (i + 1)..grid.nodes.len() {
			let (a, b) = (&grid.nodes[i], &grid.nodes[j]);
			let dist = a.distance_to(b.x, b.y);
			if dist < min || dist > max || !rng.gen_bool(link) {
				continue;
			}
			let id = ConnectionId(grid.connections.len());
			grid
				.connections
				.push(Connection::new(NodeId(i), NodeId(j), params, rng));
			grid.nodes[i].connections.push(id);
			grid.nodes[j].connections.push(id);
		}
	}

	grid
}
