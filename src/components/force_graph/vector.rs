//! 2D vector primitives used by the layout engine.
//!
//! All operations are pure and total: degenerate inputs (zero-length vectors,
//! coincident points) resolve to well-defined values instead of NaN.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A point or direction in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
	/// Horizontal component.
	pub x: f64,
	/// Vertical component.
	pub y: f64,
}

impl Vec2 {
	/// The origin.
	pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

	/// Creates a vector from its components.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean length.
	pub fn magnitude(self) -> f64 {
		(self.x * self.x + self.y * self.y).sqrt()
	}

	/// Unit vector in the same direction, or [`Vec2::ZERO`] for a zero vector.
	pub fn normalize(self) -> Self {
		let m = self.magnitude();
		if m == 0.0 {
			Self::ZERO
		} else {
			Self::new(self.x / m, self.y / m)
		}
	}

	/// Multiplies both components by `s`.
	pub fn scale(self, s: f64) -> Self {
		Self::new(self.x * s, self.y * s)
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Vec2) -> f64 {
		(self - other).magnitude()
	}
}

impl Add for Vec2 {
	type Output = Vec2;

	fn add(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl AddAssign for Vec2 {
	fn add_assign(&mut self, rhs: Vec2) {
		self.x += rhs.x;
		self.y += rhs.y;
	}
}

impl Sub for Vec2 {
	type Output = Vec2;

	fn sub(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl SubAssign for Vec2 {
	fn sub_assign(&mut self, rhs: Vec2) {
		self.x -= rhs.x;
		self.y -= rhs.y;
	}
}

impl Mul<f64> for Vec2 {
	type Output = Vec2;

	fn mul(self, s: f64) -> Vec2 {
		self.scale(s)
	}
}

impl Neg for Vec2 {
	type Output = Vec2;

	fn neg(self) -> Vec2 {
		Vec2::new(-self.x, -self.y)
	}
}

/// Point on the segment `p1 -> p2` that lies `r2` units short of `p2`.
///
/// Edges use this to stop at the target node's circle so the arrowhead sits on
/// the boundary instead of the center. Coincident points are treated as a
/// segment of length 1.
pub fn intersection(p1: Vec2, p2: Vec2, r2: f64) -> Vec2 {
	let d = p2 - p1;
	let len = match d.magnitude() {
		l if l == 0.0 => 1.0,
		l => l,
	};
	Vec2::new(p2.x - d.x / len * r2, p2.y - d.y / len * r2)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn magnitude_of_3_4_is_5() {
		assert_eq!(Vec2::new(3.0, 4.0).magnitude(), 5.0);
	}

	#[test]
	fn arithmetic_operators() {
		let a = Vec2::new(1.0, 2.0);
		let b = Vec2::new(3.0, -1.0);
		assert_eq!(a + b, Vec2::new(4.0, 1.0));
		assert_eq!(a - b, Vec2::new(-2.0, 3.0));
		assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
		assert_eq!(-a, Vec2::new(-1.0, -2.0));

		let mut c = a;
		c += b;
		c -= a;
		assert_eq!(c, b);
	}

	#[test]
	fn normalize_zero_vector_is_zero() {
		assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
	}

	#[test]
	fn normalize_has_unit_length() {
		let n = Vec2::new(-6.0, 8.0).normalize();
		assert!((n.magnitude() - 1.0).abs() < 1e-12);
		assert!((n.x + 0.6).abs() < 1e-12);
		assert!((n.y - 0.8).abs() < 1e-12);
	}

	#[test]
	fn intersection_backs_off_from_target() {
		let p = intersection(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 4.0);
		assert_eq!(p, Vec2::new(6.0, 0.0));
	}

	#[test]
	fn intersection_with_coincident_points_is_finite() {
		let p = Vec2::new(5.0, 5.0);
		let q = intersection(p, p, 4.0);
		assert_eq!(q, p);
		assert!(q.x.is_finite() && q.y.is_finite());
	}
}
