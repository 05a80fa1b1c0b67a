use leptos::prelude::*;
use log::warn;

use super::animation::{AnimationHandle, is_compact_viewport, mount, random_seed};
use super::params::NetworkParams;

/// Decorative node network drawn behind its parent.
///
/// The parent must be positioned. Narrow viewports get a static gradient
/// instead of the animation.
#[component]
pub fn NetworkBackground(
	/// Tuning; defaults to [`NetworkParams::default`].
	#[prop(optional)]
	params: Option<NetworkParams>,
	/// Fixed seed for a reproducible layout; random when absent.
	#[prop(optional)]
	seed: Option<u64>,
) -> impl IntoView {
	let params = params.unwrap_or_default();
	let compact = is_compact_viewport(params.mobile_breakpoint);
	let class = if compact {
		"network-layer network-layer--static"
	} else {
		"network-layer"
	};

	let container_ref = NodeRef::<leptos::html::Div>::new();
	let handle = StoredValue::new_local(None::<AnimationHandle>);

	Effect::new(move |_| {
		if compact {
			return;
		}
		let Some(container) = container_ref.get() else {
			return;
		};
		if handle.with_value(Option::is_some) {
			return;
		}
		match mount(&container, params.clone(), seed.unwrap_or_else(random_seed)) {
			Ok(running) => handle.set_value(Some(running)),
			Err(err) => warn!("network animation disabled: {}", err),
		}
	});

	on_cleanup(move || {
		let _ = handle.try_update_value(Option::take);
	});

	view! { <div node_ref=container_ref class=class aria-hidden="true"></div> }
}
