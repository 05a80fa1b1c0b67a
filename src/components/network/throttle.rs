/// Lets an event through at most once per interval.
#[derive(Clone, Debug)]
pub struct Throttle {
	interval_ms: f64,
	last_ms: Option<f64>,
}

impl Throttle {
	pub fn new(interval_ms: f64) -> Self {
		Self {
			interval_ms,
			last_ms: None,
		}
	}

	/// Returns `true` and records `now_ms` if the interval has elapsed.
	pub fn ready(&mut self, now_ms: f64) -> bool {
		match self.last_ms {
			Some(last) if now_ms - last < self.interval_ms => false,
			_ => {
				self.last_ms = Some(now_ms);
				true
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn first_event_always_passes() {
		assert!(Throttle::new(16.0).ready(0.0));
	}

	#[test]
	fn events_inside_the_interval_are_dropped() {
		let mut gate = Throttle::new(16.0);
		assert!(gate.ready(100.0));
		assert!(!gate.ready(105.0));
		assert!(!gate.ready(115.9));
		assert!(gate.ready(116.0));
		assert!(!gate.ready(120.0));
	}
}
