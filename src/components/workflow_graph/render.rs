use std::collections::HashMap;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::GraphCanvasState;
use crate::workflow::RenderNode;

const BACKGROUND: &str = "#f5f6fa";
const EDGE_COLOR: &str = "#7f8fa6";
const NODE_FILL: &str = "#ffffff";
const NODE_BORDER: &str = "#c8cdd8";
const SELECTED_FILL: &str = "#e8e2fb";
const SELECTED_BORDER: &str = "#6b4ce6";
const HOVER_BORDER: &str = "#9a85ef";
const LABEL: &str = "#2f3542";
const LABEL_MUTED: &str = "#a4abb8";
const CORNER: f64 = 6.0;

pub fn render(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let arrow_size = 8.0 / k.max(0.5);
	let by_id: HashMap<&str, &RenderNode> = state
		.elements
		.nodes
		.iter()
		.map(|node| (node.id.as_str(), node))
		.collect();

	ctx.set_stroke_style_str(EDGE_COLOR);
	ctx.set_fill_style_str(EDGE_COLOR);
	ctx.set_line_width(1.5 / k.max(0.5));
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	for edge in &state.elements.edges {
		// containers have no box to attach to
		let (Some(src), Some(tgt)) = (by_id.get(edge.source.as_str()), by_id.get(edge.target.as_str())) else {
			continue;
		};
		let ((x1, y1), (x2, y2)) = (state.out_anchor(src), state.in_anchor(tgt));
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2 - ux * arrow_size, y2 - uy * arrow_size);
		ctx.stroke();

		let (back_x, back_y) = (x2 - ux * arrow_size, y2 - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(x2, y2);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
}

fn draw_nodes(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	let (w, h, k) = (state.layout.node_width, state.layout.node_height, state.transform.k);

	for (idx, node) in state.elements.nodes.iter().enumerate() {
		let (x, y) = (node.position.x, node.position.y);
		let hovered = state.hovered == Some(idx) && node.selectable;

		let (fill, border, width) = if node.selected {
			(SELECTED_FILL, SELECTED_BORDER, 2.0)
		} else if hovered {
			(NODE_FILL, HOVER_BORDER, 1.5)
		} else {
			(NODE_FILL, NODE_BORDER, 1.0)
		};

		rounded_rect(ctx, x, y, w, h, CORNER);
		ctx.set_fill_style_str(fill);
		ctx.fill();
		ctx.set_stroke_style_str(border);
		ctx.set_line_width(width / k.max(0.5));
		if !node.selectable {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(4.0),
				&JsValue::from_f64(3.0),
			));
		}
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		ctx.set_fill_style_str(if node.selectable { LABEL } else { LABEL_MUTED });
		ctx.set_font("12px sans-serif");
		let _ = ctx.fill_text_with_max_width(&node.label, x + 10.0, y + h / 2.0 + 4.0, w - 20.0);
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	ctx.line_to(x + w - r, y);
	ctx.quadratic_curve_to(x + w, y, x + w, y + r);
	ctx.line_to(x + w, y + h - r);
	ctx.quadratic_curve_to(x + w, y + h, x + w - r, y + h);
	ctx.line_to(x + r, y + h);
	ctx.quadratic_curve_to(x, y + h, x, y + h - r);
	ctx.line_to(x, y + r);
	ctx.quadratic_curve_to(x, y, x + r, y);
	ctx.close_path();
}
