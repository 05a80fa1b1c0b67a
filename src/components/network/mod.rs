//! Decorative node network animated on a background canvas.

mod animation;
mod component;
mod grid;
mod params;
mod render;
mod state;
mod throttle;
mod types;

pub use animation::{AnimationHandle, MountError, mount};
pub use component::NetworkBackground;
pub use params::NetworkParams;
