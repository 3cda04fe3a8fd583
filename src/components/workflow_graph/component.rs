use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::{CLICK_SLOP, GraphCanvasState, PanState};
use crate::workflow::layout::LayoutConfig;
use crate::workflow::{GraphElements, RenderNode};

/// Canvas drawing of a laid-out workflow. Clicks on selectable nodes are
/// reported through `on_node_click`; everything else pans or zooms.
#[component]
pub fn WorkflowGraphCanvas(
	#[prop(into)] elements: Signal<GraphElements>,
	layout: LayoutConfig,
	on_node_click: Callback<RenderNode>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<GraphCanvasState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let stopped = Arc::new(AtomicBool::new(false));
	let (state_init, animate_init, resize_cb_init, stopped_init) =
		(state.clone(), animate.clone(), resize_cb.clone(), stopped.clone());

	let stopped_cleanup = stopped.clone();
	let resize_slot = StoredValue::new_local(resize_cb.clone());
	on_cleanup(move || {
		stopped_cleanup.store(true, Ordering::Relaxed);
		// the listener must not outlive its closure
		resize_slot.try_with_value(|slot| {
			if let (Some(cb), Some(window)) = (slot.borrow_mut().take(), web_sys::window()) {
				let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		});
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = canvas_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::error!("2d canvas context unavailable");
			return;
		};
		*state_init.borrow_mut() = Some(GraphCanvasState::new(
			elements.get_untracked(),
			layout.clone(),
			w,
			h,
		));

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = canvas_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner, stopped_anim) =
			(state_init.clone(), animate_init.clone(), stopped_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if stopped_anim.load(Ordering::Relaxed) {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.dirty {
					render::render(s, &ctx);
					s.dirty = false;
				}
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// selection and refetches rebuild the elements; redraw without refitting
	let state_elements = state.clone();
	Effect::new(move |_| {
		let elements = elements.get();
		if let Some(ref mut s) = *state_elements.borrow_mut() {
			s.set_elements(elements);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_coords(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pan = PanState {
				active: true,
				start_x: x,
				start_y: y,
				transform_start_x: s.transform.x,
				transform_start_y: s.transform.y,
				moved: false,
			};
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_coords(canvas_ref, &ev) else {
			return;
		};
		let cursor = {
			let mut guard = state_mm.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			if s.pan.active {
				let (dx, dy) = (x - s.pan.start_x, y - s.pan.start_y);
				if dx.abs() > CLICK_SLOP || dy.abs() > CLICK_SLOP {
					s.pan.moved = true;
				}
				if s.pan.moved {
					s.transform.x = s.pan.transform_start_x + dx;
					s.transform.y = s.pan.transform_start_y + dy;
					s.dirty = true;
				}
				"grabbing"
			} else {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
				if s.hovered_selectable() { "pointer" } else { "grab" }
			}
		};
		if let Some(canvas) = canvas_ref.get() {
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_coords(canvas_ref, &ev) else {
			return;
		};
		// release the borrow before handing the node out
		let clicked = {
			let mut guard = state_mu.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let was_click = s.pan.active && !s.pan.moved;
			s.pan.active = false;
			if was_click {
				s.node_at_position(x, y)
					.and_then(|idx| s.node(idx))
					.filter(|node| node.selectable)
					.cloned()
			} else {
				None
			}
		};
		if let Some(node) = clicked {
			on_node_click.run(node);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pan.active = false;
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_coords(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom_at(x, y, ev.delta_y() < 0.0);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="workflow-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; width: 100%; height: 100%; cursor: grab;"
		/>
	}
}

fn canvas_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|(w, h)| *w > 0.0 && *h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn local_coords(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}
