use crate::field::{FieldElement, FieldError};
use crate::singular::{self, Singularity};
use num_bigint::BigUint;
use num_traits::Zero;
use std::fmt;

/// A point on a short Weierstrass curve: either the point at infinity
/// (the additive identity) or an affine coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Point {
	Infinity,
	Affine { x: FieldElement, y: FieldElement },
}

impl Point {
	pub fn is_infinity(&self) -> bool {
		matches!(self, Point::Infinity)
	}

	pub fn x(&self) -> Option<&FieldElement> {
		match self {
			Point::Infinity => None,
			Point::Affine { x, .. } => Some(x),
		}
	}

	pub fn y(&self) -> Option<&FieldElement> {
		match self {
			Point::Infinity => None,
			Point::Affine { y, .. } => Some(y),
		}
	}
}

impl fmt::Display for Point {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Point::Infinity => write!(f, "O"),
			Point::Affine { x, y } => write!(f, "({}, {})", x.value(), y.value()),
		}
	}
}

/// y^2 = x^3 + a2*x^2 + a4*x + a6 over GF(p), p prime. Degenerate
/// (singular) parameter sets are deliberately accepted; the curve is
/// classified once at construction and never re-examined.
///
/// Construction does not verify that p is prime, and points are never
/// validated against the curve equation: the attacks this library
/// exists for depend on constructing points no honest key generation
/// would produce. `is_on_curve` is available as an explicit check.
#[derive(Debug, Clone)]
pub struct Curve {
	p: BigUint,
	a2: FieldElement,
	a4: FieldElement,
	a6: FieldElement,
	singularity: Singularity,
}

impl Curve {
	pub fn new(p: BigUint, a2: BigUint, a4: BigUint, a6: BigUint) -> Self {
		let a2 = FieldElement::new(a2, &p);
		let a4 = FieldElement::new(a4, &p);
		let a6 = FieldElement::new(a6, &p);
		let singularity = singular::classify(&p, &a2, &a4, &a6);
		Curve { p, a2, a4, a6, singularity }
	}

	pub fn p(&self) -> &BigUint {
		&self.p
	}

	pub fn a2(&self) -> &FieldElement {
		&self.a2
	}

	pub fn a4(&self) -> &FieldElement {
		&self.a4
	}

	pub fn a6(&self) -> &FieldElement {
		&self.a6
	}

	pub fn singularity(&self) -> &Singularity {
		&self.singularity
	}

	pub fn infinity(&self) -> Point {
		Point::Infinity
	}

	/// Build an affine point without any on-curve check.
	pub fn affine(&self, x: BigUint, y: BigUint) -> Point {
		Point::Affine {
			x: FieldElement::new(x, &self.p),
			y: FieldElement::new(y, &self.p),
		}
	}

	/// The curve cubic f(x) = x^3 + a2*x^2 + a4*x + a6.
	pub fn rhs(&self, x: &FieldElement) -> FieldElement {
		x.add(&self.a2).mul(x).add(&self.a4).mul(x).add(&self.a6)
	}

	/// The degeneracy indicator 4*a4^3 + 27*a6^2. Zero means the curve
	/// is treated as singular.
	pub fn discriminant(&self) -> FieldElement {
		let four = FieldElement::from_u64(4, &self.p);
		let twenty_seven = FieldElement::from_u64(27, &self.p);
		let a4_cubed = self.a4.square().mul(&self.a4);
		four.mul(&a4_cubed).add(&twenty_seven.mul(&self.a6.square()))
	}

	pub fn is_on_curve(&self, point: &Point) -> bool {
		match point {
			Point::Infinity => true,
			Point::Affine { x, y } => y.square() == self.rhs(x),
		}
	}

	pub fn contains(&self, x: &BigUint, y: &BigUint) -> bool {
		self.is_on_curve(&self.affine(x.clone(), y.clone()))
	}

	pub fn negate(&self, point: &Point) -> Point {
		match point {
			Point::Infinity => Point::Infinity,
			Point::Affine { x, y } => Point::Affine {
				x: x.clone(),
				y: y.neg(),
			},
		}
	}

	/// Unified chord-and-tangent law. Zero slope denominators surface
	/// as NoModularInverse; on the curves this library accepts, they
	/// can occur away from the guarded y = 0 case, so the failure is
	/// reported instead of panicking.
	pub fn add(&self, p1: &Point, p2: &Point) -> Result<Point, FieldError> {
		let (x1, y1) = match p1 {
			Point::Infinity => return Ok(p2.clone()),
			Point::Affine { x, y } => (x, y),
		};
		let (x2, y2) = match p2 {
			Point::Infinity => return Ok(p1.clone()),
			Point::Affine { x, y } => (x, y),
		};

		let slope = if x1 == x2 {
			if y1 != y2 {
				// P + (-P) = O
				return Ok(Point::Infinity);
			}
			if y1.is_zero() {
				// Vertical tangent.
				return Ok(Point::Infinity);
			}
			// Tangent slope (3x^2 + 2*a2*x + a4) / (2y).
			let three = FieldElement::from_u64(3, &self.p);
			let two = FieldElement::from_u64(2, &self.p);
			let numerator = three
				.mul(&x1.square())
				.add(&two.mul(&self.a2).mul(x1))
				.add(&self.a4);
			numerator.div(&two.mul(y1))?
		} else {
			y2.sub(y1).div(&x2.sub(x1))?
		};

		let x3 = slope.square().sub(x1).sub(x2).sub(&self.a2);
		let y3 = slope.mul(&x1.sub(&x3)).sub(y1);
		Ok(Point::Affine { x: x3, y: y3 })
	}

	/// Double-and-add over the bits of k, least significant first.
	/// Not constant-time; these curves are victims, not products.
	pub fn scalar_mul(&self, k: &BigUint, point: &Point) -> Result<Point, FieldError> {
		let mut result = Point::Infinity;
		let mut addend = point.clone();
		let mut k = k.clone();
		while !k.is_zero() {
			if k.bit(0) {
				result = self.add(&result, &addend)?;
			}
			addend = self.add(&addend, &addend)?;
			k >>= 1;
		}
		Ok(result)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// y^2 = x^3 + 2x + 2 over F_17, a small non-singular curve.
	fn tiny_curve() -> Curve {
		Curve::new(
			BigUint::from(17u32),
			BigUint::zero(),
			BigUint::from(2u32),
			BigUint::from(2u32),
		)
	}

	#[test]
	fn identity_laws() {
		let curve = tiny_curve();
		let p = curve.affine(BigUint::from(5u32), BigUint::from(1u32));
		assert!(curve.is_on_curve(&p));
		assert_eq!(curve.add(&p, &curve.infinity()).unwrap(), p);
		assert_eq!(curve.add(&curve.infinity(), &p).unwrap(), p);
		assert!(curve.is_on_curve(&curve.infinity()));
	}

	#[test]
	fn inverse_law() {
		let curve = tiny_curve();
		let p = curve.affine(BigUint::from(5u32), BigUint::from(1u32));
		let minus_p = curve.negate(&p);
		assert!(curve.is_on_curve(&minus_p));
		assert!(curve.add(&p, &minus_p).unwrap().is_infinity());
	}

	#[test]
	fn doubling_matches_repeated_addition() {
		let curve = tiny_curve();
		let p = curve.affine(BigUint::from(5u32), BigUint::from(1u32));
		let doubled = curve.add(&p, &p).unwrap();
		assert!(curve.is_on_curve(&doubled));
		let tripled = curve.add(&doubled, &p).unwrap();
		assert_eq!(curve.scalar_mul(&BigUint::from(3u32), &p).unwrap(), tripled);
	}

	#[test]
	fn scalar_mul_distributes_over_scalar_addition() {
		let curve = tiny_curve();
		let p = curve.affine(BigUint::from(5u32), BigUint::from(1u32));
		for k1 in 0u32..8 {
			for k2 in 0u32..8 {
				let lhs = curve
					.scalar_mul(&BigUint::from(k1 + k2), &p)
					.unwrap();
				let a = curve.scalar_mul(&BigUint::from(k1), &p).unwrap();
				let b = curve.scalar_mul(&BigUint::from(k2), &p).unwrap();
				assert_eq!(lhs, curve.add(&a, &b).unwrap());
			}
		}
	}

	#[test]
	fn zero_scalar_gives_infinity() {
		let curve = tiny_curve();
		let p = curve.affine(BigUint::from(5u32), BigUint::from(1u32));
		assert!(curve.scalar_mul(&BigUint::zero(), &p).unwrap().is_infinity());
	}

	#[test]
	fn vertical_tangent_doubles_to_infinity() {
		// On y^2 = x^3 (mod 97) the point (0, 0) has a vertical tangent.
		let curve = Curve::new(
			BigUint::from(97u32),
			BigUint::zero(),
			BigUint::zero(),
			BigUint::zero(),
		);
		let p = curve.affine(BigUint::zero(), BigUint::zero());
		assert!(curve.add(&p, &p).unwrap().is_infinity());
	}

	#[test]
	fn off_curve_point_is_detected() {
		let curve = tiny_curve();
		let bogus = curve.affine(BigUint::from(1u32), BigUint::from(1u32));
		assert!(!curve.is_on_curve(&bogus));
		assert!(!curve.contains(&BigUint::from(1u32), &BigUint::from(1u32)));
	}

	#[test]
	fn addition_stays_on_curve_with_quadratic_term() {
		// y^2 = x^2 (x + 1) over the node demo field: the chord law must
		// account for a2 in both coordinates.
		let p = BigUint::from(4523215699003u64);
		let curve = Curve::new(p.clone(), BigUint::from(1u32), BigUint::zero(), BigUint::zero());
		let g = curve.affine(BigUint::from(8u32), BigUint::from(24u32));
		assert!(curve.is_on_curve(&g));
		let q = curve.scalar_mul(&BigUint::from(987654321u64), &g).unwrap();
		assert!(curve.is_on_curve(&q));
	}
}
