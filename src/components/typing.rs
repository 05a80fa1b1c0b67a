//! Hero subtitle that types, holds, and erases a rotating list of phrases.

use std::time::Duration;

use leptos::prelude::*;
use log::warn;

const START_DELAY: Duration = Duration::from_millis(1000);
const TYPE_DELAY: Duration = Duration::from_millis(150);
const ERASE_DELAY: Duration = Duration::from_millis(80);
const HOLD_DELAY: Duration = Duration::from_millis(1500);

/// Character-by-character phrase cycler.
#[derive(Clone, Debug, Default)]
pub struct TypingCycle {
	phrases: Vec<String>,
	phrase: usize,
	chars: usize,
	erasing: bool,
}

impl TypingCycle {
	/// Starts before the first character of the first phrase.
	pub fn new(phrases: Vec<String>) -> Self {
		Self {
			phrases,
			..Self::default()
		}
	}

	/// Moves one character forward or back and returns the delay before the
	/// next tick.
	pub fn tick(&mut self) -> Duration {
		let Some(len) = self.phrases.get(self.phrase).map(|p| p.chars().count()) else {
			return HOLD_DELAY;
		};

		let mut delay = if self.erasing {
			self.chars = self.chars.saturating_sub(1);
			ERASE_DELAY
		} else {
			self.chars = (self.chars + 1).min(len);
			TYPE_DELAY
		};

		if !self.erasing && self.chars == len {
			self.erasing = true;
			delay = HOLD_DELAY;
		} else if self.erasing && self.chars == 0 {
			self.erasing = false;
			self.phrase = (self.phrase + 1) % self.phrases.len();
		}
		delay
	}

	/// Text currently on screen.
	pub fn visible(&self) -> &str {
		let Some(phrase) = self.phrases.get(self.phrase) else {
			return "";
		};
		match phrase.char_indices().nth(self.chars) {
			Some((end, _)) => &phrase[..end],
			None => phrase,
		}
	}
}

fn schedule(
	cycle: StoredValue<TypingCycle>,
	text: WriteSignal<String>,
	timer: StoredValue<Option<TimeoutHandle>>,
	delay: Duration,
) {
	let next = move || {
		let Some(delay) = cycle.try_update_value(TypingCycle::tick) else {
			return;
		};
		text.set(cycle.with_value(|c| c.visible().to_string()));
		schedule(cycle, text, timer, delay);
	};
	match set_timeout_with_handle(next, delay) {
		Ok(handle) => timer.set_value(Some(handle)),
		Err(err) => warn!("typing effect stopped: {:?}", err),
	}
}

/// Types each phrase in turn, forever.
#[component]
pub fn TypingText(
	/// Phrases to cycle through.
	#[prop(into)]
	phrases: Vec<String>,
) -> impl IntoView {
	let (text, set_text) = signal(String::new());
	let cycle = StoredValue::new(TypingCycle::new(phrases));
	let timer = StoredValue::new(None::<TimeoutHandle>);

	schedule(cycle, set_text, timer, START_DELAY);
	on_cleanup(move || {
		timer.try_with_value(|t| {
			if let Some(t) = t {
				t.clear();
			}
		});
	});

	view! {
		<span class="typing-text">{text}</span>
		<span class="typing-caret" aria-hidden="true">"|"</span>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn cycle(phrases: &[&str]) -> TypingCycle {
		TypingCycle::new(phrases.iter().map(|p| p.to_string()).collect())
	}

	#[test]
	fn types_holds_erases_and_moves_on() {
		let mut c = cycle(&["ab", "xyz"]);
		assert_eq!(c.visible(), "");

		assert_eq!(c.tick(), TYPE_DELAY);
		assert_eq!(c.visible(), "a");
		assert_eq!(c.tick(), HOLD_DELAY);
		assert_eq!(c.visible(), "ab");

		assert_eq!(c.tick(), ERASE_DELAY);
		assert_eq!(c.visible(), "a");
		assert_eq!(c.tick(), ERASE_DELAY);
		assert_eq!(c.visible(), "");

		c.tick();
		assert_eq!(c.visible(), "x");
	}

	#[test]
	fn wraps_to_the_first_phrase() {
		let mut c = cycle(&["a"]);
		assert_eq!(c.tick(), HOLD_DELAY);
		assert_eq!(c.tick(), ERASE_DELAY);
		assert_eq!(c.visible(), "");
		c.tick();
		assert_eq!(c.visible(), "a");
	}

	#[test]
	fn slices_on_char_boundaries() {
		let mut c = cycle(&["héllo"]);
		c.tick();
		c.tick();
		assert_eq!(c.visible(), "hé");
	}

	#[test]
	fn empty_list_is_inert() {
		let mut c = cycle(&[]);
		assert_eq!(c.tick(), HOLD_DELAY);
		assert_eq!(c.visible(), "");
	}
}
