use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, info, warn};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent, Window};

use super::params::NetworkParams;
use super::render;
use super::state::NetworkState;
use super::throttle::Throttle;

const CANVAS_CLASS: &str = "network-canvas";
const CANVAS_STYLE: &[(&str, &str)] = &[
	("position", "absolute"),
	("inset", "0"),
	("z-index", "0"),
	("pointer-events", "none"),
];

/// Reasons the animation could not start.
#[derive(Debug, Error)]
pub enum MountError {
	/// Not running in a browser window.
	#[error("no global window")]
	NoWindow,
	/// The window has no document attached.
	#[error("window has no document")]
	NoDocument,
	/// `document.createElement("canvas")` failed.
	#[error("could not create canvas: {0}")]
	CreateCanvas(String),
	/// The canvas refused a 2D context.
	#[error("2d context unavailable")]
	NoContext,
	/// The canvas could not be appended to its container.
	#[error("could not attach canvas: {0}")]
	Attach(String),
	/// An event listener could not be registered.
	#[error("could not listen for `{event}`: {reason}")]
	Listen {
		/// DOM event name.
		event: &'static str,
		/// Host error text.
		reason: String,
	},
}

fn js_reason(err: JsValue) -> String {
	format!("{err:?}")
}

fn dimension(value: Result<JsValue, JsValue>) -> f64 {
	value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
}

fn viewport_size(window: &Window, container: &Element) -> (f64, f64) {
	let (w, h) = (
		container.client_width() as f64,
		container.client_height() as f64,
	);
	if w > 0.0 && h > 0.0 {
		return (w, h);
	}
	(dimension(window.inner_width()), dimension(window.inner_height()))
}

/// Whether the current viewport is narrower than `breakpoint`.
pub fn is_compact_viewport(breakpoint: f64) -> bool {
	web_sys::window()
		.map(|w| dimension(w.inner_width()))
		.is_some_and(|w| w > 0.0 && w < breakpoint)
}

/// A seed that differs between page loads.
pub fn random_seed() -> u64 {
	let now = js_sys::Date::now() as u64;
	let noise = (js_sys::Math::random() * u32::MAX as f64) as u64;
	now ^ (noise << 32)
}

struct Shared {
	window: Window,
	container: Element,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	state: RefCell<NetworkState>,
	pointer_gate: RefCell<Throttle>,
	last_client: Cell<Option<(f64, f64)>>,
	pointer_stale: Cell<bool>,
	resize_debounce_ms: i32,
	frame_id: Cell<Option<i32>>,
	resize_timer: Cell<Option<i32>>,
	animate: RefCell<Option<Closure<dyn FnMut()>>>,
	rebuild: RefCell<Option<Closure<dyn FnMut()>>>,
	on_resize: RefCell<Option<Closure<dyn FnMut()>>>,
	on_pointer: RefCell<Vec<(&'static str, Closure<dyn FnMut(MouseEvent)>)>>,
}

impl Shared {
	fn schedule_frame(&self) {
		let animate = self.animate.borrow();
		let Some(cb) = animate.as_ref() else {
			return;
		};
		match self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			Ok(id) => self.frame_id.set(Some(id)),
			Err(err) => warn!("animation frame not scheduled: {}", js_reason(err)),
		}
	}

	fn frame(&self) {
		self.frame_id.set(None);
		self.resolve_pointer();
		{
			let mut state = self.state.borrow_mut();
			state.step();
			render::render(&state, &self.ctx);
		}
		self.schedule_frame();
	}

	fn track_pointer(&self, ev: &MouseEvent) {
		self.last_client
			.set(Some((ev.client_x() as f64, ev.client_y() as f64)));
		self.pointer_stale.set(true);
		// Gated moves are picked up by the next frame.
		if self.pointer_gate.borrow_mut().ready(js_sys::Date::now()) {
			self.resolve_pointer();
		}
	}

	fn resolve_pointer(&self) {
		if !self.pointer_stale.replace(false) {
			return;
		}
		let Some((cx, cy)) = self.last_client.get() else {
			return;
		};
		let rect = self.canvas.get_bounding_client_rect();
		let (x, y) = (cx - rect.left(), cy - rect.top());
		let inside = x >= 0.0 && y >= 0.0 && x <= rect.width() && y <= rect.height();
		self.state.borrow_mut().pointer = inside.then_some((x, y));
	}

	fn release_pointer(&self, ev: &MouseEvent) {
		// Only when the pointer leaves the window altogether.
		if ev.related_target().is_none() {
			self.pointer_stale.set(false);
			self.last_client.set(None);
			self.state.borrow_mut().pointer = None;
		}
	}

	fn queue_rebuild(&self) {
		if let Some(id) = self.resize_timer.take() {
			self.window.clear_timeout_with_handle(id);
		}
		let rebuild = self.rebuild.borrow();
		let Some(cb) = rebuild.as_ref() else {
			return;
		};
		match self
			.window
			.set_timeout_with_callback_and_timeout_and_arguments_0(
				cb.as_ref().unchecked_ref(),
				self.resize_debounce_ms,
			) {
			Ok(id) => self.resize_timer.set(Some(id)),
			Err(err) => warn!("resize not scheduled: {}", js_reason(err)),
		}
	}

	fn rebuild_now(&self) {
		self.resize_timer.set(None);
		let (w, h) = viewport_size(&self.window, &self.container);
		debug!("viewport resized to {}x{}", w, h);
		self.canvas.set_width(w as u32);
		self.canvas.set_height(h as u32);
		self.state.borrow_mut().rebuild(w, h);
	}

	fn listen(&self, event: &'static str, cb: &js_sys::Function) -> Result<(), MountError> {
		self.window
			.add_event_listener_with_callback(event, cb)
			.map_err(|err| MountError::Listen {
				event,
				reason: js_reason(err),
			})
	}

	fn teardown(&self) -> bool {
		let was_running = self.animate.borrow().is_some();
		if let Some(id) = self.frame_id.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		if let Some(id) = self.resize_timer.take() {
			self.window.clear_timeout_with_handle(id);
		}
		if let Some(cb) = self.on_resize.borrow_mut().take() {
			let _ = self
				.window
				.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		for (event, cb) in self.on_pointer.borrow_mut().drain(..) {
			let _ = self
				.window
				.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
		}
		self.animate.borrow_mut().take();
		self.rebuild.borrow_mut().take();
		self.canvas.remove();
		was_running
	}
}

/// A running animation. Dropping it stops the loop and detaches the canvas.
pub struct AnimationHandle {
	shared: Rc<Shared>,
}

impl AnimationHandle {
	/// Id of the animation frame currently requested, if any.
	pub fn pending_frame(&self) -> Option<i32> {
		self.shared.frame_id.get()
	}

	/// The canvas drawn into.
	pub fn canvas(&self) -> &HtmlCanvasElement {
		&self.shared.canvas
	}

	/// Number of nodes in the current grid.
	pub fn node_count(&self) -> usize {
		self.shared.state.borrow().nodes.len()
	}

	/// How many grids have been built; resizes add one each.
	pub fn generation(&self) -> u32 {
		self.shared.state.borrow().generation()
	}

	/// Pointer position in canvas pixels as the simulation last saw it.
	pub fn pointer(&self) -> Option<(f64, f64)> {
		self.shared.state.borrow().pointer
	}

	/// Active flags of the nodes within `radius` of `(x, y)`.
	pub fn activity_near(&self, x: f64, y: f64, radius: f64) -> Vec<bool> {
		self.shared
			.state
			.borrow()
			.nodes
			.iter()
			.filter(|n| n.distance_to(x, y) <= radius)
			.map(|n| n.active)
			.collect()
	}

	/// Cancels the frame loop, removes every listener and detaches the canvas.
	/// Returns `false` if there was no running loop to stop, e.g. on a second call.
	pub fn stop(&self) -> bool {
		let stopped = self.shared.teardown();
		if stopped {
			info!("network animation stopped");
		}
		stopped
	}

	fn install(&self) -> Result<(), MountError> {
		let shared = &self.shared;

		let weak = Rc::downgrade(shared);
		*shared.rebuild.borrow_mut() = Some(Closure::new(move || {
			if let Some(s) = weak.upgrade() {
				s.rebuild_now();
			}
		}));

		let weak = Rc::downgrade(shared);
		let on_resize: Closure<dyn FnMut()> = Closure::new(move || {
			if let Some(s) = weak.upgrade() {
				s.queue_rebuild();
			}
		});
		shared.listen("resize", on_resize.as_ref().unchecked_ref())?;
		*shared.on_resize.borrow_mut() = Some(on_resize);

		let weak = Rc::downgrade(shared);
		let on_move: Closure<dyn FnMut(MouseEvent)> = Closure::new(move |ev: MouseEvent| {
			if let Some(s) = weak.upgrade() {
				s.track_pointer(&ev);
			}
		});
		let weak = Rc::downgrade(shared);
		let on_out: Closure<dyn FnMut(MouseEvent)> = Closure::new(move |ev: MouseEvent| {
			if let Some(s) = weak.upgrade() {
				s.release_pointer(&ev);
			}
		});
		for (event, cb) in [("mousemove", on_move), ("mouseout", on_out)] {
			shared.listen(event, cb.as_ref().unchecked_ref())?;
			shared.on_pointer.borrow_mut().push((event, cb));
		}

		// Installed last: a loop closure means every listener is in place.
		let weak = Rc::downgrade(shared);
		*shared.animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(s) = weak.upgrade() {
				s.frame();
			}
		}));
		shared.schedule_frame();
		Ok(())
	}
}

impl Drop for AnimationHandle {
	fn drop(&mut self) {
		self.stop();
	}
}

/// Creates a canvas inside `container`, builds the grid and starts the frame loop.
///
/// `container` must be positioned (not `static`) so the absolutely placed canvas
/// fills it.
pub fn mount(
	container: &Element,
	params: NetworkParams,
	seed: u64,
) -> Result<AnimationHandle, MountError> {
	let window = web_sys::window().ok_or(MountError::NoWindow)?;
	let document = window.document().ok_or(MountError::NoDocument)?;

	let canvas: HtmlCanvasElement = document
		.create_element("canvas")
		.map_err(|err| MountError::CreateCanvas(js_reason(err)))?
		.dyn_into()
		.map_err(|el: Element| MountError::CreateCanvas(js_reason(el.into())))?;
	canvas.set_class_name(CANVAS_CLASS);
	let style = canvas.style();
	for (name, value) in CANVAS_STYLE {
		let _ = style.set_property(name, value);
	}

	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.map_err(|_| MountError::NoContext)?
		.ok_or(MountError::NoContext)?
		.dyn_into()
		.map_err(|_| MountError::NoContext)?;

	let (width, height) = viewport_size(&window, container);
	canvas.set_width(width as u32);
	canvas.set_height(height as u32);
	container
		.append_child(&canvas)
		.map_err(|err| MountError::Attach(js_reason(err)))?;

	let resize_debounce_ms = params.resize_debounce_ms;
	let pointer_gate = Throttle::new(params.pointer_throttle_ms);
	let handle = AnimationHandle {
		shared: Rc::new(Shared {
			window,
			container: container.clone(),
			canvas,
			ctx,
			state: RefCell::new(NetworkState::new(width, height, params, seed)),
			pointer_gate: RefCell::new(pointer_gate),
			last_client: Cell::new(None),
			pointer_stale: Cell::new(false),
			resize_debounce_ms,
			frame_id: Cell::new(None),
			resize_timer: Cell::new(None),
			animate: RefCell::new(None),
			rebuild: RefCell::new(None),
			on_resize: RefCell::new(None),
			on_pointer: RefCell::new(Vec::new()),
		}),
	};
	// Any failure from here on drops the handle, which detaches the canvas.
	handle.install()?;
	info!("network animation started ({}x{}, seed {})", width, height, seed);
	Ok(handle)
}
