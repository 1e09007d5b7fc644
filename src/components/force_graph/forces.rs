//! Per-tick force model.
//!
//! Computes accelerations for every node from four contributions:
//! - centering pull toward the viewport center
//! - inverse-square repulsion between every pair closer than the cutoff
//! - Hookean springs along edges
//!
//! Overlapping pairs are additionally pushed apart by a direct positional
//! correction rather than a force. Pair work is O(n²) per tick, which is fine
//! for graphs up to a few hundred nodes.

use super::simulation::NodeState;
use super::vector::Vec2;

/// Tuning constants for the force model and integrator.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceConfig {
	/// Fraction of the offset to the viewport center applied as acceleration.
	pub center_pull: f64,
	/// Base repulsion constant.
	pub repulsion: f64,
	/// Multiplier applied to `repulsion` for the pairwise inverse-square term.
	pub repulsion_scale: f64,
	/// Pairs farther apart than this do not repel.
	pub repulsion_cutoff: f64,
	/// Floor for pair distance, keeps the inverse-square term finite.
	pub min_distance: f64,
	/// Extra gap kept between node circles by the overlap correction.
	pub collision_margin: f64,
	/// Rest length of edge springs.
	pub spring_length: f64,
	/// Edge spring stiffness.
	pub spring_stiffness: f64,
	/// Velocity multiplier applied every tick.
	pub damping: f64,
	/// Fixed virtual timestep.
	pub dt: f64,
	/// Ticks after which the simulation idles unless a gesture is active.
	pub max_iterations: u32,
}

impl Default for ForceConfig {
	fn default() -> Self {
		Self {
			center_pull: 0.02,
			repulsion: 800.0,
			repulsion_scale: 5.0,
			repulsion_cutoff: 500.0,
			min_distance: 0.1,
			collision_margin: 10.0,
			spring_length: 120.0,
			spring_stiffness: 0.05,
			damping: 0.85,
			dt: 0.1,
			max_iterations: 300,
		}
	}
}

impl ForceConfig {
	/// Coefficient of the inverse-square repulsion term.
	pub fn repulsion_strength(&self) -> f64 {
		self.repulsion * self.repulsion_scale
	}
}

/// Returns mutable references to two distinct elements, `i < j`.
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
	debug_assert!(i < j);
	let (head, tail) = items.split_at_mut(j);
	(&mut head[i], &mut tail[0])
}

fn push(node: &mut NodeState, force: Vec2) {
	node.acceleration += force * (1.0 / node.mass);
}

/// Accumulates one tick of forces into `nodes[..].acceleration`.
///
/// Accelerations must already be zeroed by the caller. Overlap correction
/// writes `position` directly, so later pairs and springs in the same tick see
/// the corrected positions. Edges are `(source, target)` indices into `nodes`.
pub fn apply(nodes: &mut [NodeState], edges: &[(usize, usize)], center: Vec2, config: &ForceConfig) {
	let strength = config.repulsion_strength();

	for i in 0..nodes.len() {
		let pull = (center - nodes[i].position) * config.center_pull;
		push(&mut nodes[i], pull);

		for j in (i + 1)..nodes.len() {
			let (u, v) = pair_mut(nodes, i, j);
			let delta = u.position - v.position;
			let dist = delta.magnitude().max(config.min_distance);
			let dir = delta.normalize();

			if dist < config.repulsion_cutoff {
				let force = strength / (dist * dist);
				push(u, dir * force);
				push(v, dir * -force);
			}

			let min_dist = u.radius + v.radius + config.collision_margin;
			if dist < min_dist {
				let separate = dir * ((min_dist - dist) * 0.5);
				u.position += separate;
				v.position -= separate;
			}
		}
	}

	for &(source, target) in edges {
		if source == target || source >= nodes.len() || target >= nodes.len() {
			continue;
		}
		let delta = nodes[target].position - nodes[source].position;
		let dist = match delta.magnitude() {
			d if d == 0.0 => 1.0,
			d => d,
		};
		let force = (dist - config.spring_length) * config.spring_stiffness;
		let dir = delta.normalize();
		push(&mut nodes[source], dir * force);
		push(&mut nodes[target], dir * -force);
	}
}
