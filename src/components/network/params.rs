/// A closed `(min, max)` sampling range.
pub type Range = (f64, f64);

const PALETTE: &[&str] = &["#6366f1", "#8b5cf6", "#3b82f6", "#06b6d4", "#10b981"];

/// Tuning knobs for the network animation.
///
/// Probabilities are per simulation step. Distances and radii are in canvas
/// pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkParams {
	/// Columns the grid aims for before the spacing cap kicks in.
	pub target_columns: f64,
	/// Rows the grid aims for before the spacing cap kicks in.
	pub target_rows: f64,
	/// Upper bound on grid spacing along either axis.
	pub max_spacing: f64,
	/// Chance of leaving a grid cell empty.
	pub skip_probability: f64,
	/// Distance band `(min, max)` within which two nodes may be linked.
	pub link_band: Range,
	/// Chance of linking an in-band pair.
	pub link_probability: f64,
	/// Chance of a node starting out active.
	pub initial_active_probability: f64,
	/// Base node radius.
	pub node_radius: Range,
	/// Steps a node stays active before it may decay.
	pub activation_duration: Range,
	/// Decay chance once past the activation duration.
	pub deactivate_probability: f64,
	/// Spontaneous activation chance for an inactive node.
	pub self_activate_probability: f64,
	/// Pulse ring radius upper bound.
	pub pulse_max: f64,
	/// Pulse radius change per step.
	pub pulse_speed: Range,
	/// Pointer distance below which a node is forced active.
	pub pointer_radius: f64,
	/// Extra radius granted to a node directly under the pointer.
	pub pointer_growth: f64,
	/// Connection stroke width.
	pub link_width: Range,
	/// Packet spawn chance on an active connection.
	pub spawn_probability: f64,
	/// Chance of an arriving packet continuing along another connection.
	pub propagate_probability: f64,
	/// Packet progress increment per step.
	pub packet_speed: Range,
	/// Packet radius.
	pub packet_size: Range,
	/// Node colors, picked once per node.
	pub palette: Vec<String>,
	/// Quiet period before a resize rebuilds the grid.
	pub resize_debounce_ms: i32,
	/// Minimum gap between two accepted pointer moves.
	pub pointer_throttle_ms: f64,
	/// Viewports narrower than this get the static background instead.
	pub mobile_breakpoint: f64,
}

impl Default for NetworkParams {
	fn default() -> Self {
		Self {
			target_columns: 15.0,
			target_rows: 10.0,
			max_spacing: 100.0,
			skip_probability: 0.3,
			link_band: (30.0, 110.0),
			link_probability: 0.3,
			initial_active_probability: 0.1,
			node_radius: (1.5, 3.0),
			activation_duration: (120.0, 360.0),
			deactivate_probability: 0.02,
			self_activate_probability: 0.001,
			pulse_max: 8.0,
			pulse_speed: (0.1, 0.3),
			pointer_radius: 120.0,
			pointer_growth: 3.0,
			link_width: (0.5, 1.5),
			spawn_probability: 0.01,
			propagate_probability: 0.7,
			packet_speed: (0.01, 0.03),
			packet_size: (1.5, 2.5),
			palette: PALETTE.iter().map(|c| c.to_string()).collect(),
			resize_debounce_ms: 250,
			pointer_throttle_ms: 16.0,
			mobile_breakpoint: 768.0,
		}
	}
}

impl NetworkParams {
	/// Grid spacing `(x, y)` for a viewport.
	pub fn spacing(&self, width: f64, height: f64) -> (f64, f64) {
		(
			(width / self.target_columns).min(self.max_spacing),
			(height / self.target_rows).min(self.max_spacing),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn spacing_is_capped() {
		let params = NetworkParams::default();
		assert_eq!(params.spacing(3000.0, 3000.0), (100.0, 100.0));
		let (sx, sy) = params.spacing(600.0, 400.0);
		assert!((sx - 40.0).abs() < 1e-9);
		assert!((sy - 40.0).abs() < 1e-9);
	}
}
