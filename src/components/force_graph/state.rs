//! Graph state shared by the frame loop and the input handlers.
//!
//! Combines the layout simulation with camera/gesture tracking and the
//! sanitized props it was built from. Every mutation that should be visible
//! bumps a generation counter; the component redraws when it changes.

use std::collections::HashMap;

use log::info;

use super::interaction::{Camera, Interaction};
use super::selection::Selection;
use super::simulation::Simulation;
use super::theme::color_for_group;
use super::types::{GraphNode, GraphProps};
use super::vector::Vec2;

/// Default viewport width when the host container has no measurable width.
pub const DEFAULT_WIDTH: f64 = 800.0;

/// Where a node is drawn this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeSnapshot {
	/// World-space center.
	pub position: Vec2,
	/// Center after applying the camera.
	pub screen_position: Vec2,
	/// Radius in world units.
	pub radius: f64,
}

/// Per-frame output handed to the renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
	/// Drawn nodes by id.
	pub nodes: HashMap<String, NodeSnapshot>,
	/// Camera used for `screen_position`.
	pub camera: Camera,
}

/// Resolved stroke color for a node: explicit override, else its group color.
pub fn node_color(node: &GraphNode) -> String {
	node.color
		.clone()
		.filter(|c| !c.is_empty())
		.unwrap_or_else(|| color_for_group(node.group.as_deref()).to_css())
}

/// Core graph state. Created when the component mounts and rebuilt in place
/// whenever the node set or declared height changes.
pub struct GraphState {
	/// Sanitized props currently displayed.
	pub props: GraphProps,
	/// Layout simulation built from `props`.
	pub sim: Simulation,
	/// Camera and gesture tracking.
	pub interaction: Interaction,
	/// Key passed to the selection store alongside node ids.
	pub element_key: String,
	/// Viewport width in pixels.
	pub width: f64,
	/// Viewport height in pixels.
	pub height: f64,
	generation: u64,
}

impl GraphState {
	/// Sanitizes `props` and lays the nodes out on the initial ring.
	pub fn new(props: &GraphProps, width: f64, element_key: impl Into<String>) -> Self {
		let props = props.sanitized();
		let height = props.viewport_height();
		let sim = Simulation::new(&props.nodes, &props.edges, width, height);
		Self {
			props,
			sim,
			interaction: Interaction::default(),
			element_key: element_key.into(),
			width,
			height,
			generation: 0,
		}
	}

	/// Bumped by every visible change.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	fn bump(&mut self) {
		self.generation = self.generation.wrapping_add(1);
	}

	/// Applies new props. Rebuilds the simulation only when nodes or height
	/// changed; edge-only changes keep node positions and restart settling.
	/// The camera and any gesture in progress survive either way. Returns
	/// whether the layout was rebuilt.
	pub fn set_props(&mut self, props: &GraphProps) -> bool {
		let props = props.sanitized();
		let height = props.viewport_height();
		let rebuild = props.nodes != self.props.nodes || height != self.height;

		if rebuild {
			info!("graph-layout: node set changed, resetting layout");
			self.sim = Simulation::with_config(
				&props.nodes,
				&props.edges,
				self.width,
				height,
				self.sim.config().clone(),
			);
			self.height = height;
			self.interaction.reattach(&mut self.sim);
		} else if props.edges != self.props.edges {
			self.sim.set_edges(&props.edges);
		}
		self.props = props;
		self.bump();
		rebuild
	}

	/// Runs one simulation step. Returns `false` once the layout is idle.
	pub fn tick(&mut self) -> bool {
		let stepped = self.sim.step();
		if stepped {
			self.bump();
		}
		stepped
	}

	/// Tracks a new viewport width without moving nodes.
	pub fn resize(&mut self, width: f64) {
		if width == self.width {
			return;
		}
		self.width = width;
		self.sim.resize(width, self.height);
		self.bump();
	}

	/// Topmost node under a screen-space point.
	pub fn node_at(&self, screen: Vec2) -> Option<String> {
		let world = self.interaction.camera.screen_to_world(screen);
		self.sim.hit(world).map(str::to_string)
	}

	/// Starts a node drag or a pan.
	pub fn pointer_down(&mut self, screen: Vec2) {
		let hit = self.node_at(screen);
		self.interaction
			.pointer_down(screen, hit.as_deref(), &mut self.sim);
	}

	/// Continues the gesture in progress.
	pub fn pointer_move(&mut self, screen: Vec2) {
		if self.interaction.pointer_move(screen, &mut self.sim) {
			self.bump();
		}
	}

	/// Ends the gesture; a click on a node toggles it in `selection`.
	pub fn pointer_up(&mut self, selection: &mut impl Selection) -> Option<String> {
		let clicked = self.interaction.pointer_up(&mut self.sim);
		if let Some(id) = &clicked {
			selection.toggle_selection(&self.element_key, id);
		}
		self.bump();
		clicked
	}

	/// Ends the gesture without a click.
	pub fn pointer_leave(&mut self) {
		self.interaction.pointer_leave(&mut self.sim);
		self.bump();
	}

	/// Zooms one notch.
	pub fn wheel(&mut self, delta_y: f64) {
		if self.interaction.wheel(delta_y) {
			self.bump();
		}
	}

	/// Current pan and zoom.
	pub fn camera(&self) -> Camera {
		self.interaction.camera
	}

	/// Node positions and radii for this frame.
	pub fn snapshot(&self) -> Snapshot {
		let camera = self.camera();
		let nodes = self
			.sim
			.iter()
			.map(|(id, n)| {
				(
					id.to_string(),
					NodeSnapshot {
						position: n.position,
						screen_position: camera.world_to_screen(n.position),
						radius: n.radius,
					},
				)
			})
			.collect();
		Snapshot { nodes, camera }
	}
}

#[cfg(test)]
mod tests {
	use super::super::selection::SelectionSet;
	use super::super::types::GraphEdge;
	use super::*;

	fn props() -> GraphProps {
		GraphProps {
			nodes: ["a", "b", "c"]
				.into_iter()
				.map(|id| GraphNode {
					id: id.to_string(),
					..GraphNode::default()
				})
				.collect(),
			edges: vec![
				GraphEdge {
					source: "a".into(),
					target: "b".into(),
				},
				GraphEdge {
					source: "a".into(),
					target: "missing".into(),
				},
			],
			..GraphProps::default()
		}
	}

	#[test]
	fn builds_from_sanitized_props() {
		let state = GraphState::new(&props(), 800.0, "graph-1");
		assert_eq!(state.sim.len(), 3);
		assert_eq!(state.sim.edge_count(), 1);
		assert_eq!(state.props.edges.len(), 1);
		assert_eq!(state.height, 400.0);
	}

	#[test]
	fn dangling_edge_renders_nothing() {
		let props = GraphProps {
			nodes: vec![GraphNode {
				id: "a".into(),
				..GraphNode::default()
			}],
			edges: vec![GraphEdge {
				source: "a".into(),
				target: "missing".into(),
			}],
			..GraphProps::default()
		};
		let state = GraphState::new(&props, 800.0, "graph-1");
		assert!(state.props.edges.is_empty());
		assert_eq!(state.sim.edge_count(), 0);
	}

	#[test]
	fn ticks_bump_generation_until_idle() {
		let mut state = GraphState::new(&props(), 800.0, "graph-1");
		let mut ticks = 0;
		while state.tick() {
			ticks += 1;
		}
		assert_eq!(ticks, 301);
		assert_eq!(state.generation(), 301);
	}

	#[test]
	fn snapshot_applies_camera() {
		let mut state = GraphState::new(&props(), 800.0, "graph-1");
		state.interaction.camera.zoom = 2.0;
		state.interaction.camera.pan = Vec2::new(5.0, 5.0);

		let snap = state.snapshot();
		let a = snap.nodes["a"];
		assert_eq!(snap.nodes.len(), 3);
		assert_eq!(a.screen_position, a.position * 2.0 + Vec2::new(5.0, 5.0));
		assert_eq!(a.radius, 28.0);
		assert_eq!(snap.camera.zoom, 2.0);
	}

	#[test]
	fn click_on_node_toggles_selection() {
		let mut state = GraphState::new(&props(), 800.0, "graph-1");
		let mut selection = SelectionSet::default();
		let a = state.interaction.camera.world_to_screen(state.sim.get("a").unwrap().position);

		state.pointer_down(a);
		assert_eq!(state.pointer_up(&mut selection).as_deref(), Some("a"));
		assert!(selection.is_selected("graph-1", "a"));

		state.pointer_down(a);
		state.pointer_up(&mut selection);
		assert!(!selection.is_selected("graph-1", "a"));
	}

	#[test]
	fn background_press_pans_instead_of_selecting() {
		let mut state = GraphState::new(&props(), 800.0, "graph-1");
		let mut selection = SelectionSet::default();

		state.pointer_down(Vec2::new(5.0, 5.0));
		state.pointer_move(Vec2::new(25.0, 5.0));
		assert_eq!(state.pointer_up(&mut selection), None);
		assert_eq!(state.camera().pan, Vec2::new(20.0, 0.0));
		assert!(selection.is_empty());
	}

	#[test]
	fn props_change_resets_layout_but_keeps_camera() {
		let mut state = GraphState::new(&props(), 800.0, "graph-1");
		state.wheel(1.0);
		for _ in 0..50 {
			state.tick();
		}

		let mut same = props();
		same.title = Some("Renamed".into());
		assert!(!state.set_props(&same));
		assert_eq!(state.sim.iterations(), 50);

		let mut grown = props();
		grown.nodes.push(GraphNode {
			id: "d".into(),
			..GraphNode::default()
		});
		assert!(state.set_props(&grown));
		assert_eq!(state.sim.len(), 4);
		assert_eq!(state.sim.iterations(), 0);
		assert_eq!(state.camera().zoom, 0.9);

		let mut taller = grown.clone();
		taller.height = Some(600.0);
		assert!(state.set_props(&taller));
		assert_eq!(state.height, 600.0);
	}

	#[test]
	fn drag_survives_node_set_change() {
		let mut state = GraphState::new(&props(), 800.0, "graph-1");
		let a = state.interaction.camera.world_to_screen(state.sim.get("a").unwrap().position);
		state.pointer_down(a);
		assert_eq!(state.sim.pinned(), Some("a"));

		let mut grown = props();
		grown.nodes.push(GraphNode {
			id: "d".into(),
			..GraphNode::default()
		});
		assert!(state.set_props(&grown));

		assert_eq!(state.sim.pinned(), Some("a"));
		assert!(state.sim.is_held());
		let before = state.sim.get("a").unwrap().position;
		state.tick();
		assert_eq!(state.sim.get("a").unwrap().velocity, Vec2::ZERO);
		assert!(state.sim.get("a").unwrap().position.distance(before) < 66.0);
	}

	#[test]
	fn pan_survives_height_change() {
		let mut state = GraphState::new(&props(), 800.0, "graph-1");
		state.pointer_down(Vec2::new(5.0, 5.0));

		let mut taller = props();
		taller.height = Some(600.0);
		assert!(state.set_props(&taller));
		assert!(state.sim.is_held());
	}

	#[test]
	fn edge_only_change_keeps_layout() {
		let mut state = GraphState::new(&props(), 800.0, "graph-1");
		for _ in 0..200 {
			state.tick();
		}
		let before = state.sim.get("a").unwrap().position;

		let mut linked = props();
		linked.edges.push(GraphEdge {
			source: "b".into(),
			target: "c".into(),
		});
		assert!(!state.set_props(&linked));

		assert_eq!(state.sim.get("a").unwrap().position, before);
		assert_eq!(state.sim.edge_count(), 2);
		assert_eq!(state.sim.iterations(), 0);
		assert_eq!(state.props.edges.len(), 2);
	}

	#[test]
	fn resize_moves_center_not_nodes() {
		let mut state = GraphState::new(&props(), 800.0, "graph-1");
		let before = state.sim.get("a").unwrap().position;
		state.resize(1200.0);
		assert_eq!(state.sim.center(), Vec2::new(600.0, 200.0));
		assert_eq!(state.sim.get("a").unwrap().position, before);
	}

	#[test]
	fn explicit_color_wins_over_group() {
		let mut node = GraphNode {
			id: "a".into(),
			group: Some("teamA".into()),
			..GraphNode::default()
		};
		assert_eq!(node_color(&node), color_for_group(Some("teamA")).to_css());
		node.color = Some("#123456".into());
		assert_eq!(node_color(&node), "#123456");
	}
}
