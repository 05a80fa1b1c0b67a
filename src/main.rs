use leptos::mount::mount_to_body;
use network_hero::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
