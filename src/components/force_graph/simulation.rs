//! Simulation driver: kinematic state per node and the fixed-step integrator.
//!
//! State lives in a dense arena indexed by insertion order, with a side table
//! from node id to slot. The arena is rebuilt wholesale whenever the node set
//! changes. Each [`Simulation::step`] runs two passes over it: the force pass
//! (reads positions, writes accelerations and overlap corrections) and the
//! integration pass (writes velocities and positions).

use std::collections::HashMap;
use std::f64::consts::PI;

use log::{debug, info};

use super::forces::{self, ForceConfig};
use super::types::{GraphEdge, GraphNode};
use super::vector::Vec2;

/// Smallest node radius in world units.
pub const MIN_RADIUS: f64 = 28.0;
/// Largest node radius in world units.
pub const MAX_RADIUS: f64 = 60.0;
const BASE_RADIUS: f64 = 20.0;
/// Each label character adds this much before the label weight is applied.
const LABEL_CHAR_FACTOR: f64 = 2.0;
const LABEL_WEIGHT: f64 = 0.3;
/// Distance between neighbours on the initial ring, per node.
const RING_SPACING: f64 = 10.0;

/// Kinematic state of a single node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeState {
	/// World-space center.
	pub position: Vec2,
	/// World units per unit time.
	pub velocity: Vec2,
	/// Recomputed from scratch every tick.
	pub acceleration: Vec2,
	/// Always 1.
	pub mass: f64,
	/// Drawing and collision radius.
	pub radius: f64,
}

impl NodeState {
	/// A node at rest at `position`.
	pub fn new(position: Vec2, radius: f64) -> Self {
		Self {
			position,
			velocity: Vec2::ZERO,
			acceleration: Vec2::ZERO,
			mass: 1.0,
			radius,
		}
	}
}

/// Display radius derived from a node's weight and label length, clamped to
/// `[MIN_RADIUS, MAX_RADIUS]`.
pub fn node_radius(value: f64, label: Option<&str>) -> f64 {
	let label_factor = label.map_or(0, |l| l.chars().count()) as f64 * LABEL_CHAR_FACTOR;
	(BASE_RADIUS + value + label_factor * LABEL_WEIGHT).clamp(MIN_RADIUS, MAX_RADIUS)
}

/// Evenly spaced starting position on a ring around `center` whose radius
/// grows with the node count.
pub fn radial_position(index: usize, count: usize, center: Vec2) -> Vec2 {
	if count == 0 {
		return center;
	}
	let angle = index as f64 / count as f64 * PI * 2.0;
	let radius = count as f64 * RING_SPACING;
	center + Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Edge endpoints as arena slots. Edges naming unknown ids are dropped.
fn resolve_edges(index: &HashMap<String, usize>, edges: &[GraphEdge]) -> Vec<(usize, usize)> {
	edges
		.iter()
		.filter_map(|e| Some((*index.get(&e.source)?, *index.get(&e.target)?)))
		.collect()
}

/// Coarse lifecycle of the simulation loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Below the iteration cap, or held awake by an active gesture.
	Settling,
	/// Past the iteration cap with no gesture active. `step` is a no-op.
	Idle,
}

/// Owns the node arena and advances it one fixed timestep at a time.
///
/// `step` is synchronous and has no scheduling of its own: the host calls it
/// from whatever loop it has (animation frame, timer, or a plain `for` in tests).
#[derive(Clone, Debug)]
pub struct Simulation {
	config: ForceConfig,
	ids: Vec<String>,
	index: HashMap<String, usize>,
	nodes: Vec<NodeState>,
	edges: Vec<(usize, usize)>,
	center: Vec2,
	iterations: u32,
	pinned: Option<usize>,
	held: bool,
}

impl Simulation {
	/// Builds a simulation with the default [`ForceConfig`].
	pub fn new(nodes: &[GraphNode], edges: &[GraphEdge], width: f64, height: f64) -> Self {
		Self::with_config(nodes, edges, width, height, ForceConfig::default())
	}

	/// Places every node on the initial ring and resolves edges to arena slots.
	///
	/// Duplicate ids keep a single slot, overwritten by the last occurrence.
	/// Edges whose endpoints are not in `nodes` are dropped.
	pub fn with_config(
		nodes: &[GraphNode],
		edges: &[GraphEdge],
		width: f64,
		height: f64,
		config: ForceConfig,
	) -> Self {
		let center = Vec2::new(width / 2.0, height / 2.0);
		let count = nodes.len();
		let mut ids = Vec::with_capacity(count);
		let mut index = HashMap::with_capacity(count);
		let mut states = Vec::with_capacity(count);

		for (i, node) in nodes.iter().enumerate() {
			let state = NodeState::new(
				radial_position(i, count, center),
				node_radius(node.value.unwrap_or(0.0), node.label.as_deref()),
			);
			match index.get(&node.id).copied() {
				Some(slot) => states[slot] = state,
				None => {
					index.insert(node.id.clone(), states.len());
					ids.push(node.id.clone());
					states.push(state);
				}
			}
		}

		let edges = resolve_edges(&index, edges);

		info!(
			"graph-layout: simulation initialized with {} nodes, {} edges",
			states.len(),
			edges.len()
		);

		Self {
			config,
			ids,
			index,
			nodes: states,
			edges,
			center,
			iterations: 0,
			pinned: None,
			held: false,
		}
	}

	/// Force constants in use.
	pub fn config(&self) -> &ForceConfig {
		&self.config
	}

	/// Whether another `step` would do any work.
	pub fn phase(&self) -> Phase {
		if self.iterations > self.config.max_iterations && !self.held {
			Phase::Idle
		} else {
			Phase::Settling
		}
	}

	/// Ticks since the last reset.
	pub fn iterations(&self) -> u32 {
		self.iterations
	}

	/// Advances one tick. Returns `false` without touching state when idle.
	pub fn step(&mut self) -> bool {
		if self.phase() == Phase::Idle {
			return false;
		}

		for node in &mut self.nodes {
			node.acceleration = Vec2::ZERO;
		}

		forces::apply(&mut self.nodes, &self.edges, self.center, &self.config);

		let (dt, damping) = (self.config.dt, self.config.damping);
		for (slot, node) in self.nodes.iter_mut().enumerate() {
			if self.pinned == Some(slot) {
				continue;
			}
			node.velocity = (node.velocity + node.acceleration * dt) * damping;
			node.position += node.velocity * dt;
		}

		self.iterations += 1;
		if self.phase() == Phase::Idle {
			debug!("graph-layout: settled after {} iterations", self.iterations);
		}
		true
	}

	/// Replaces the edge set in place. Node state is kept and settling restarts.
	pub fn set_edges(&mut self, edges: &[GraphEdge]) {
		self.edges = resolve_edges(&self.index, edges);
		self.iterations = 0;
		debug!("graph-layout: edges replaced, {} resolved", self.edges.len());
	}

	/// Keeps the loop awake while a gesture is in progress.
	pub fn set_held(&mut self, held: bool) {
		self.held = held;
	}

	/// Whether a gesture is keeping the loop awake.
	pub fn is_held(&self) -> bool {
		self.held
	}

	/// Exempts `id` from integration. Unknown ids unpin.
	pub fn pin(&mut self, id: &str) {
		self.pinned = self.index.get(id).copied();
	}

	/// Returns the pinned node, if any, to integration.
	pub fn unpin(&mut self) {
		self.pinned = None;
	}

	/// Id of the node exempt from integration.
	pub fn pinned(&self) -> Option<&str> {
		self.pinned.map(|slot| self.ids[slot].as_str())
	}

	/// Moves a node directly, zeroes its velocity and restarts settling.
	/// Returns `false` if `id` has no state.
	pub fn drag_by(&mut self, id: &str, delta: Vec2) -> bool {
		let Some(&slot) = self.index.get(id) else {
			return false;
		};
		let node = &mut self.nodes[slot];
		node.position += delta;
		node.velocity = Vec2::ZERO;
		self.iterations = 0;
		true
	}

	/// Updates the centering target without disturbing node positions.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.center = Vec2::new(width / 2.0, height / 2.0);
	}

	/// Point the centering force pulls toward.
	pub fn center(&self) -> Vec2 {
		self.center
	}

	/// State of the node with `id`.
	pub fn get(&self, id: &str) -> Option<&NodeState> {
		self.index.get(id).map(|&slot| &self.nodes[slot])
	}

	/// Number of distinct nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether there are no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Number of resolved edges, parallel edges included.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Node ids with their state, in arena order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeState)> {
		self.ids.iter().map(String::as_str).zip(self.nodes.iter())
	}

	/// Topmost node whose circle contains `point` (world space).
	pub fn hit(&self, point: Vec2) -> Option<&str> {
		self.iter()
			.filter(|(_, n)| n.position.distance(point) <= n.radius)
			.last()
			.map(|(id, _)| id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.to_string(),
			..GraphNode::default()
		}
	}

	fn edge(source: &str, target: &str) -> GraphEdge {
		GraphEdge {
			source: source.to_string(),
			target: target.to_string(),
		}
	}

	fn run(sim: &mut Simulation, ticks: usize) {
		for _ in 0..ticks {
			sim.step();
		}
	}

	#[test]
	fn radius_is_clamped() {
		assert_eq!(node_radius(0.0, None), MIN_RADIUS);
		assert_eq!(node_radius(500.0, None), MAX_RADIUS);
		// 20 + 10 + 20 chars * 2 * 0.3
		assert!((node_radius(10.0, Some("abcdefghijklmnopqrst")) - 42.0).abs() < 1e-9);
	}

	#[test]
	fn nodes_start_on_a_ring() {
		let nodes: Vec<_> = ["a", "b", "c", "d"].into_iter().map(node).collect();
		let sim = Simulation::new(&nodes, &[], 800.0, 400.0);
		let center = Vec2::new(400.0, 200.0);

		assert_eq!(sim.len(), 4);
		for (_, state) in sim.iter() {
			assert!((state.position.distance(center) - 40.0).abs() < 1e-9);
			assert_eq!(state.velocity, Vec2::ZERO);
			assert_eq!(state.mass, 1.0);
		}
		let a = sim.get("a").unwrap();
		assert!((a.position.x - 440.0).abs() < 1e-9);
	}

	#[test]
	fn duplicate_ids_keep_one_state() {
		let mut second = node("a");
		second.value = Some(30.0);
		let sim = Simulation::new(&[node("a"), second], &[], 800.0, 400.0);
		assert_eq!(sim.len(), 1);
		assert_eq!(sim.get("a").unwrap().radius, 50.0);
	}

	#[test]
	fn edges_to_missing_nodes_are_dropped() {
		let sim = Simulation::new(&[node("a")], &[edge("a", "missing")], 800.0, 400.0);
		assert_eq!(sim.edge_count(), 0);
	}

	#[test]
	fn replacing_edges_keeps_positions() {
		let mut sim = Simulation::new(&[node("a"), node("b"), node("c")], &[], 800.0, 400.0);
		run(&mut sim, 200);
		let before: Vec<_> = sim.iter().map(|(_, n)| n.position).collect();

		sim.set_edges(&[edge("b", "c"), edge("a", "missing")]);

		assert_eq!(sim.edge_count(), 1);
		assert_eq!(sim.iterations(), 0);
		let after: Vec<_> = sim.iter().map(|(_, n)| n.position).collect();
		assert_eq!(after, before);
	}

	#[test]
	fn labelled_node_radius_counts_label() {
		let mut labelled = node("a");
		labelled.value = Some(10.0);
		labelled.label = Some("abcdefghij".into());
		let sim = Simulation::new(&[labelled], &[], 800.0, 400.0);
		// 20 + 10 + 10 chars * 2 * 0.3
		assert!((sim.get("a").unwrap().radius - 36.0).abs() < 1e-9);
	}

	#[test]
	fn empty_graph_steps_without_panicking() {
		let mut sim = Simulation::new(&[], &[], 800.0, 400.0);
		assert!(sim.is_empty());
		assert!(sim.step());
		assert_eq!(sim.hit(Vec2::ZERO), None);
	}

	#[test]
	fn goes_idle_after_iteration_cap() {
		let mut sim = Simulation::new(&[node("a"), node("b")], &[], 800.0, 400.0);
		let cap = sim.config().max_iterations as usize;

		for _ in 0..=cap {
			assert!(sim.step());
		}
		assert_eq!(sim.phase(), Phase::Idle);

		let before = sim.get("a").unwrap().clone();
		assert!(!sim.step());
		assert_eq!(sim.get("a").unwrap(), &before);
	}

	#[test]
	fn held_simulation_keeps_settling() {
		let mut sim = Simulation::new(&[node("a")], &[], 800.0, 400.0);
		run(&mut sim, 400);
		assert_eq!(sim.phase(), Phase::Idle);

		sim.set_held(true);
		assert_eq!(sim.phase(), Phase::Settling);
		assert!(sim.step());
		sim.set_held(false);
		assert_eq!(sim.phase(), Phase::Idle);
	}

	#[test]
	fn pinned_node_is_not_integrated() {
		let mut sim = Simulation::new(&[node("a"), node("b"), node("c")], &[], 800.0, 400.0);
		sim.pin("a");
		let before = sim.get("a").unwrap().position;
		let b_before = sim.get("b").unwrap().position;

		sim.step();

		assert_eq!(sim.pinned(), Some("a"));
		assert_eq!(sim.get("a").unwrap().velocity, Vec2::ZERO);
		assert_ne!(sim.get("b").unwrap().position, b_before);
		// Only the overlap correction may move a pinned node.
		let moved = sim.get("a").unwrap().position.distance(before);
		assert!(moved < 66.0);
	}

	#[test]
	fn drag_moves_node_and_restarts_settling() {
		let mut sim = Simulation::new(&[node("n1"), node("n2")], &[], 800.0, 400.0);
		run(&mut sim, 10);
		let before = sim.get("n1").unwrap().position;

		assert!(sim.drag_by("n1", Vec2::new(10.0, 10.0)));

		let after = sim.get("n1").unwrap();
		assert_eq!(after.position, before + Vec2::new(10.0, 10.0));
		assert_eq!(after.velocity, Vec2::ZERO);
		assert_eq!(sim.iterations(), 0);
		assert!(!sim.drag_by("missing", Vec2::new(1.0, 1.0)));
	}

	#[test]
	fn resize_keeps_positions() {
		let mut sim = Simulation::new(&[node("a")], &[], 800.0, 400.0);
		let before = sim.get("a").unwrap().position;
		sim.resize(1000.0, 500.0);
		assert_eq!(sim.center(), Vec2::new(500.0, 250.0));
		assert_eq!(sim.get("a").unwrap().position, before);
	}

	#[test]
	fn unconnected_nodes_stay_near_center() {
		let nodes: Vec<_> = (0..8).map(|i| node(&format!("n{i}"))).collect();
		let mut sim = Simulation::new(&nodes, &[], 800.0, 400.0);
		let center = sim.center();
		let initial_radius = 8.0 * 10.0;
		let cap = sim.config().max_iterations as usize;

		run(&mut sim, cap + 1);

		for (id, state) in sim.iter() {
			let d = state.position.distance(center);
			assert!(d < initial_radius * 5.0, "{id} drifted to {d}");
		}
	}

	#[test]
	fn single_spring_converges_to_rest_length() {
		let config = ForceConfig {
			center_pull: 0.0,
			repulsion: 0.0,
			max_iterations: 10_000,
			..ForceConfig::default()
		};
		for offset in [Vec2::ZERO, Vec2::new(300.0, 150.0)] {
			let mut sim = Simulation::with_config(
				&[node("a"), node("b")],
				&[edge("a", "b")],
				800.0,
				400.0,
				config.clone(),
			);
			sim.drag_by("b", offset);
			run(&mut sim, 5000);

			let d = sim.get("a").unwrap().position.distance(sim.get("b").unwrap().position);
			assert!((d - 120.0).abs() < 1.0, "separation {d} from offset {offset:?}");
		}
	}

	#[test]
	fn hit_returns_topmost_node() {
		let sim = Simulation::new(&[node("a"), node("b")], &[], 800.0, 400.0);
		let a = sim.get("a").unwrap().position;
		assert_eq!(sim.hit(a), Some("a"));
		assert_eq!(sim.hit(Vec2::new(-1000.0, -1000.0)), None);
	}
}
