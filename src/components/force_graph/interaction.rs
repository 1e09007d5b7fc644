//! Pointer and wheel handling: camera pan/zoom and node dragging.
//!
//! Handlers only mutate state and report whether anything changed. The owner
//! bumps its generation counter and schedules a redraw when they return `true`.

use super::simulation::Simulation;
use super::vector::Vec2;

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 5.0;
/// Zoom multiplier for one wheel notch toward the user (scroll down).
pub const ZOOM_OUT_STEP: f64 = 0.9;
/// Zoom multiplier for one wheel notch away from the user (scroll up).
pub const ZOOM_IN_STEP: f64 = 1.1;
/// Total pointer travel (screen pixels) under which a node press counts as a click.
pub const CLICK_SLOP: f64 = 3.0;

/// Pan and zoom transform applied to the whole graph: `screen = world * zoom + pan`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	/// Screen-space offset, unbounded.
	pub pan: Vec2,
	/// Scale factor, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
	pub zoom: f64,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			pan: Vec2::ZERO,
			zoom: 1.0,
		}
	}
}

impl Camera {
	/// Maps a world point to canvas pixels.
	pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
		p * self.zoom + self.pan
	}

	/// Maps canvas pixels back to world space.
	pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
		(p - self.pan) * (1.0 / self.zoom)
	}

	/// Multiplies the zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
	pub fn zoom_by(&mut self, factor: f64) {
		self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
	}

	/// Zoom as a whole percentage, as shown in the zoom indicator.
	pub fn zoom_percent(&self) -> i64 {
		(self.zoom * 100.0).round() as i64
	}
}

/// The gesture currently in progress.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
	/// No gesture in progress.
	#[default]
	Idle,
	/// Background drag moving the camera.
	Panning,
	/// A node pinned to the pointer.
	Dragging {
		/// Id of the dragged node.
		node: String,
	},
}

/// Translates raw pointer input into camera and simulation mutations.
#[derive(Clone, Debug, Default)]
pub struct Interaction {
	/// Pan and zoom, mutated by wheel and background drags.
	pub camera: Camera,
	gesture: Gesture,
	last_pointer: Vec2,
	travel: f64,
}

impl Interaction {
	/// The gesture in progress.
	pub fn gesture(&self) -> &Gesture {
		&self.gesture
	}

	/// Positive `delta_y` (scroll down) zooms out, negative zooms in.
	pub fn wheel(&mut self, delta_y: f64) -> bool {
		if delta_y == 0.0 || delta_y.is_nan() {
			return false;
		}
		let factor = if delta_y > 0.0 { ZOOM_OUT_STEP } else { ZOOM_IN_STEP };
		let before = self.camera.zoom;
		self.camera.zoom_by(factor);
		self.camera.zoom != before
	}

	/// Starts a gesture at `screen`. A press on a node (`node` is `Some`) pins it
	/// and takes precedence over panning.
	pub fn pointer_down(&mut self, screen: Vec2, node: Option<&str>, sim: &mut Simulation) {
		self.last_pointer = screen;
		self.travel = 0.0;
		self.gesture = match node {
			Some(id) if sim.get(id).is_some() => {
				sim.pin(id);
				Gesture::Dragging {
					node: id.to_string(),
				}
			}
			_ => Gesture::Panning,
		};
		sim.set_held(true);
	}

	/// Pans the camera or drags the pinned node by the pointer delta.
	pub fn pointer_move(&mut self, screen: Vec2, sim: &mut Simulation) -> bool {
		if self.gesture == Gesture::Idle {
			return false;
		}
		let delta = screen - self.last_pointer;
		self.last_pointer = screen;
		self.travel += delta.magnitude();

		match &self.gesture {
			Gesture::Idle => false,
			Gesture::Panning => {
				self.camera.pan += delta;
				true
			}
			Gesture::Dragging { node } => sim.drag_by(node, delta * (1.0 / self.camera.zoom)),
		}
	}

	/// Ends the gesture. Returns the node id if the press was a click rather
	/// than a drag.
	pub fn pointer_up(&mut self, sim: &mut Simulation) -> Option<String> {
		let gesture = self.end(sim);
		match gesture {
			Gesture::Dragging { node } if self.travel <= CLICK_SLOP => Some(node),
			_ => None,
		}
	}

	/// Pointer left the surface: ends the gesture without a click.
	pub fn pointer_leave(&mut self, sim: &mut Simulation) {
		self.end(sim);
	}

	/// Re-applies the gesture in progress to a freshly built simulation. A drag
	/// whose node is gone ends without a click.
	pub fn reattach(&mut self, sim: &mut Simulation) {
		match &self.gesture {
			Gesture::Idle => {}
			Gesture::Panning => sim.set_held(true),
			Gesture::Dragging { node } if sim.get(node).is_some() => {
				sim.pin(node);
				sim.set_held(true);
			}
			Gesture::Dragging { .. } => {
				self.end(sim);
			}
		}
	}

	fn end(&mut self, sim: &mut Simulation) -> Gesture {
		sim.unpin();
		sim.set_held(false);
		std::mem::take(&mut self.gesture)
	}
}
