//! graph-layout: interactive force-directed node-link graphs.
//!
//! This crate provides a WASM-based graph component that lays out nodes with
//! a small physics simulation and renders them on a canvas with pan, zoom,
//! drag, and click-to-select.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::force_graph::{GraphCanvas, GraphEdge, GraphNode, GraphProps, Theme};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("graph-layout: logging initialized");
}

/// Parses graph props, logging and returning `None` on malformed JSON.
pub fn parse_graph_props(json_text: &str) -> Option<GraphProps> {
	match serde_json::from_str::<GraphProps>(json_text) {
		Ok(props) => {
			info!(
				"graph-layout: loaded {} nodes, {} edges",
				props.nodes.len(),
				props.edges.len()
			);
			Some(props)
		}
		Err(e) => {
			warn!("graph-layout: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Load graph props from a script element with id="graph-data".
/// Expected format: JSON with { title?, nodes: [...], edges: [...], height? }
fn load_graph_props() -> Option<GraphProps> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;
	parse_graph_props(&json_text)
}

/// Reads an optional `data-theme` attribute from the graph-data element.
fn load_theme() -> Theme {
	web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id("graph-data"))
		.and_then(|e| e.get_attribute("data-theme"))
		.map(|name| Theme::by_name(&name))
		.unwrap_or_default()
}

/// Main application component.
/// Loads graph props from the DOM and renders the graph.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let props = load_graph_props().unwrap_or_default();
	let theme = load_theme();
	let props_signal = Signal::derive(move || props.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="graph-container">
			<GraphCanvas data=props_signal element_key="graph" theme=theme />
		</div>
	}
}
