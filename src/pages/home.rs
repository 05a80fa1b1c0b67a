use leptos::prelude::*;

use crate::components::network::NetworkBackground;
use crate::components::typing::TypingText;

const ROLES: &[&str] = &[
	"Full Stack Developer",
	"Computer Science Student",
	"Machine Learning Enthusiast",
	"UI/UX Designer",
];

/// Hero section with the network background and rotating role subtitle.
#[component]
pub fn Home() -> impl IntoView {
	let roles: Vec<String> = ROLES.iter().map(|r| r.to_string()).collect();

	view! {
		<section id="hero" class="hero">
			<NetworkBackground />
			<div class="hero-overlay">
				<p class="hero-greeting">"Hello, I'm"</p>
				<h1>"Hussein Waliyu"</h1>
				<p class="hero-role">
					<TypingText phrases=roles />
				</p>
				<a class="hero-cta" href="#contact">"Get in touch"</a>
			</div>
		</section>
	}
}
