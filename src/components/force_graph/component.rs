//! Leptos component wrapping the graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, panning, and zooming. A `requestAnimationFrame`
//! loop steps the simulation and redraws whenever the state generation moves.
//! The loop stops scheduling itself once the layout is idle and is restarted by
//! input or new data.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::selection::SelectionSet;
use super::simulation::Phase;
use super::state::{DEFAULT_WIDTH, GraphState};
use super::theme::Theme;
use super::types::GraphProps;
use super::vector::Vec2;

/// Bundles graph state with the drawing surface and host-side selection.
struct GraphContext {
	state: GraphState,
	ctx: CanvasRenderingContext2d,
	theme: Theme,
	selection: SelectionSet,
	/// Generation of the last frame drawn.
	drawn: Option<u64>,
}

type Shared<T> = Rc<RefCell<Option<T>>>;

/// A self-rescheduling animation frame callback with at most one pending frame.
#[derive(Clone, Default)]
struct FrameLoop {
	callback: Shared<Closure<dyn FnMut()>>,
	handle: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
	/// Requests a frame unless one is already pending.
	fn schedule(&self) {
		if self.handle.get().is_some() {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(ref cb) = *self.callback.borrow() {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				self.handle.set(Some(id));
			}
		}
	}

	/// Cancels the pending frame and drops the callback, breaking the
	/// closure's reference back to this loop.
	fn cancel(&self) {
		if let (Some(id), Some(window)) = (self.handle.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		self.callback.borrow_mut().take();
	}
}

fn canvas_size(canvas: &HtmlCanvasElement) -> f64 {
	canvas
		.parent_element()
		.map(|p| p.client_width() as f64)
		.filter(|w| *w > 0.0)
		.unwrap_or(DEFAULT_WIDTH)
}

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Vec2 {
	let rect = canvas.get_bounding_client_rect();
	Vec2::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Renders an interactive force-directed graph on a canvas element.
///
/// Pass graph props via the reactive `data` signal. Width follows the parent
/// container; height comes from the props. New props rebuild the layout when
/// the node set or height changed. `element_key` scopes node selection.
#[component]
pub fn GraphCanvas(
	#[prop(into)] data: Signal<GraphProps>,
	#[prop(into, default = "graph".to_string())] element_key: String,
	#[prop(default = Theme::default())] theme: Theme,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Shared<GraphContext> = Rc::new(RefCell::new(None));
	let frames = FrameLoop::default();
	let resize_cb: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let (context_init, frames_init, resize_cb_init) =
		(context.clone(), frames.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let props = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if let Some(ref mut c) = *context_init.borrow_mut() {
			if c.state.set_props(&props) {
				canvas.set_height(c.state.height as u32);
				c.drawn = None;
			}
			frames_init.schedule();
			return;
		}

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("graph-layout: canvas 2d context unavailable");
			return;
		};

		let width = canvas_size(&canvas);
		let state = GraphState::new(&props, width, element_key.clone());
		canvas.set_width(width as u32);
		canvas.set_height(state.height as u32);

		*context_init.borrow_mut() = Some(GraphContext {
			state,
			ctx,
			theme: theme.clone(),
			selection: SelectionSet::default(),
			drawn: None,
		});

		let (context_resize, canvas_resize, frames_resize) =
			(context_init.clone(), canvas.clone(), frames_init.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let width = canvas_size(&canvas_resize);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				canvas_resize.set_width(width as u32);
				c.state.resize(width);
				// Resizing clears the canvas, force a redraw.
				c.drawn = None;
			}
			frames_resize.schedule();
		}));
		if let (Some(window), Some(cb)) = (web_sys::window(), resize_cb_init.borrow().as_ref()) {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, frames_anim) = (context_init.clone(), frames_init.clone());
		*frames_init.callback.borrow_mut() = Some(Closure::new(move || {
			frames_anim.handle.set(None);
			let mut keep_running = false;
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick();
				let generation = c.state.generation();
				if c.drawn != Some(generation) {
					render::render(&c.state, &c.ctx, &c.theme, &c.selection);
					c.drawn = Some(generation);
				}
				keep_running = c.state.sim.phase() == Phase::Settling;
			}
			if keep_running {
				frames_anim.schedule();
			}
		}));
		frames_init.schedule();
	});

	let teardown = StoredValue::new_local((frames.clone(), resize_cb.clone()));
	on_cleanup(move || {
		let _ = teardown.try_with_value(|(frames, resize_cb)| {
			frames.cancel();
			if let (Some(window), Some(cb)) = (web_sys::window(), resize_cb.borrow_mut().take()) {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		});
	});

	let (context_md, frames_md) = (context.clone(), frames.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let pos = pointer_position(&canvas, &ev);
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.pointer_down(pos);
		}
		frames_md.schedule();
	};

	let (context_mm, frames_mm) = (context.clone(), frames.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let pos = pointer_position(&canvas, &ev);
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.state.pointer_move(pos);
		}
		frames_mm.schedule();
	};

	let (context_mu, frames_mu) = (context.clone(), frames.clone());
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if let Some(id) = c.state.pointer_up(&mut c.selection) {
				debug!("graph-layout: toggled selection of {}", id);
			}
		}
		frames_mu.schedule();
	};

	let (context_ml, frames_ml) = (context.clone(), frames.clone());
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.pointer_leave();
		}
		frames_ml.schedule();
	};

	let (context_wh, frames_wh) = (context.clone(), frames.clone());
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		ev.stop_propagation();
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			c.state.wheel(ev.delta_y());
		}
		frames_wh.schedule();
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab; touch-action: none; user-select: none;"
		/>
	}
}
