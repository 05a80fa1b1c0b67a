use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::NetworkState;

const IDLE_LINK: &str = "rgba(148, 163, 184, 0.15)";

pub fn render(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	draw_connections(state, ctx);
	draw_nodes(state, ctx);
	draw_packets(state, ctx);
	ctx.set_global_alpha(1.0);
}

fn draw_connections(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	for link in &state.connections {
		let (Some(a), Some(b)) = (
			state.nodes.get(link.source.0),
			state.nodes.get(link.target.0),
		) else {
			continue;
		};
		if link.active {
			ctx.set_global_alpha(0.5);
			ctx.set_stroke_style_str(&a.color);
			ctx.set_line_width(link.width * 1.5);
		} else {
			ctx.set_global_alpha(1.0);
			ctx.set_stroke_style_str(IDLE_LINK);
			ctx.set_line_width(link.width);
		}
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
}

fn draw_nodes(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	let pulse_max = state.params().pulse_max;
	for node in &state.nodes {
		ctx.set_global_alpha(if node.active { 1.0 } else { 0.45 });
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.color);
		ctx.fill();

		if node.active && pulse_max > 0.0 {
			ctx.set_global_alpha(0.6 * (1.0 - node.pulse / pulse_max));
			ctx.begin_path();
			let _ = ctx.arc(node.x, node.y, node.radius + node.pulse, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&node.color);
			ctx.set_line_width(1.0);
			ctx.stroke();
		}
	}
}

fn draw_packets(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	ctx.set_global_alpha(1.0);
	for packet in &state.packets {
		let (Some(from), Some(to)) = (state.nodes.get(packet.start.0), state.nodes.get(packet.end.0))
		else {
			continue;
		};
		let (x, y) = packet.position((from.x, from.y), (to.x, to.y));
		ctx.set_shadow_color(&packet.color);
		ctx.set_shadow_blur(packet.size * 3.0);
		ctx.begin_path();
		let _ = ctx.arc(x, y, packet.size, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&packet.color);
		ctx.fill();
	}
	ctx.set_shadow_blur(0.0);
}
