use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::fetch::fetch_year;
use super::interaction::{DeltaMode, InteractionController, PointerOutcome};
use super::render::CanvasSink;
use super::session::{LoadOutcome, Session};
use crate::config::AppConfig;

/// Progress of the dataset shown on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadStatus {
	Loading(u16),
	Loaded { year: u16, nodes: usize, links: usize },
	Failed { year: u16, message: String },
}

fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn client_to_canvas(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	Some(client_to_canvas(&canvas, ev))
}

#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] year: Signal<u16>,
	#[prop(into)] on_status: Callback<LoadStatus>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let session = Rc::new(RefCell::new(Session::new(config.simulation.clone(), 0.0, 0.0)));
	let controller = Rc::new(RefCell::new(InteractionController::default()));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	// Gestures are tracked on the window so a drag or pan continues outside
	// the canvas and ends wherever the button is released.
	let window_move: Rc<RefCell<Option<Closure<dyn FnMut(MouseEvent)>>>> = Rc::new(RefCell::new(None));
	let window_up: Rc<RefCell<Option<Closure<dyn FnMut(MouseEvent)>>>> = Rc::new(RefCell::new(None));
	let (session_init, controller_init, animate_init, resize_cb_init) = (
		session.clone(),
		controller.clone(),
		animate.clone(),
		resize_cb.clone(),
	);
	let (window_move_init, window_up_init) = (window_move.clone(), window_up.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("no window; graph canvas disabled");
			return;
		};

		let (w, h) = if fullscreen {
			viewport_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		session_init.borrow_mut().resize(w, h);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					error!("2d context has an unexpected type");
					return;
				}
			},
			_ => {
				error!("canvas 2d context unavailable");
				return;
			}
		};
		let mut sink = CanvasSink::new(ctx);

		if fullscreen {
			let (session_resize, canvas_resize) = (session_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				session_resize.borrow_mut().resize(nw, nh);
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (session_wm, controller_wm, canvas_wm) =
			(session_init.clone(), controller_init.clone(), canvas.clone());
		*window_move_init.borrow_mut() = Some(Closure::new(move |ev: MouseEvent| {
			let mut controller = controller_wm.borrow_mut();
			if controller.is_active() {
				let point = client_to_canvas(&canvas_wm, &ev);
				controller.pointer_move(&mut session_wm.borrow_mut(), point);
			}
		}));
		if let Some(ref cb) = *window_move_init.borrow() {
			let _ = window.add_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
		}

		let (session_wu, controller_wu) = (session_init.clone(), controller_init.clone());
		*window_up_init.borrow_mut() = Some(Closure::new(move |_: MouseEvent| {
			let mut controller = controller_wu.borrow_mut();
			if controller.is_active() {
				controller.pointer_up(&mut session_wu.borrow_mut());
			}
		}));
		if let Some(ref cb) = *window_up_init.borrow() {
			let _ = window.add_event_listener_with_callback("mouseup", cb.as_ref().unchecked_ref());
		}

		let (session_anim, animate_inner) = (session_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			session_anim.borrow_mut().advance(&mut sink);
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (session_load, controller_load) = (session.clone(), controller.clone());
	Effect::new(move |_| {
		let year = year.get();
		let ticket = session_load.borrow_mut().begin_load(year);
		on_status.run(LoadStatus::Loading(year));

		let (session, controller, base) = (
			session_load.clone(),
			controller_load.clone(),
			config.data_base_url.clone(),
		);
		leptos::task::spawn_local(async move {
			let result = fetch_year(&base, year).await;
			let outcome = session.borrow_mut().finish_load(ticket, result);
			match outcome {
				Ok(LoadOutcome::Installed { nodes, links }) => {
					controller.borrow_mut().reset();
					on_status.run(LoadStatus::Loaded { year, nodes, links });
				}
				Ok(LoadOutcome::Stale) => {}
				Err(err) => {
					warn!("could not load {year}: {err}");
					on_status.run(LoadStatus::Failed {
						year,
						message: err.to_string(),
					});
				}
			}
		});
	});

	let (session_md, controller_md) = (session.clone(), controller.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some(point) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let outcome = controller_md
			.borrow_mut()
			.pointer_down(&mut session_md.borrow_mut(), point);
		if outcome == PointerOutcome::Consumed {
			ev.stop_propagation();
			ev.prevent_default();
		}
	};

	let (session_mm, controller_mm) = (session.clone(), controller.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let mut controller = controller_mm.borrow_mut();
		// Active gestures are fed by the window listener.
		if controller.is_active() {
			return;
		}
		if let Some(point) = canvas_point(canvas_ref, &ev) {
			controller.pointer_move(&mut session_mm.borrow_mut(), point);
		}
	};

	let (session_ml, controller_ml) = (session.clone(), controller.clone());
	let on_mouseleave = move |_: MouseEvent| {
		controller_ml
			.borrow_mut()
			.pointer_leave(&mut session_ml.borrow_mut());
	};

	let (session_wh, controller_wh) = (session.clone(), controller.clone());
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(point) = canvas_point(canvas_ref, &ev) {
			controller_wh.borrow_mut().wheel(
				&mut session_wh.borrow_mut(),
				point,
				ev.delta_y(),
				DeltaMode::from_dom(ev.delta_mode()),
			);
		}
	};

	let (session_dc, controller_dc) = (session.clone(), controller.clone());
	let on_dblclick = move |ev: MouseEvent| {
		if let Some(point) = canvas_point(canvas_ref, &ev) {
			controller_dc
				.borrow_mut()
				.double_click(&mut session_dc.borrow_mut(), point);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:dblclick=on_dblclick
			style="display: block; cursor: grab;"
		/>
	}
}
