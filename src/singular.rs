use crate::field::FieldElement;
use num_bigint::BigUint;
use std::fmt;

/// Shape of the curve cubic x^3 + a2*x^2 + a4*x + a6 over GF(p).
///
/// A cusp is a triple root, a node a double root plus a distinct simple
/// root. Everything else with a vanishing discriminant (including
/// characteristic 2 and 3, where the formulas below do not apply) is
/// reported as UnknownSingular and admits no attack here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Singularity {
	NonSingular,
	Cusp { alpha: FieldElement },
	Node { alpha: FieldElement, beta: FieldElement },
	UnknownSingular,
}

impl fmt::Display for Singularity {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Singularity::NonSingular => write!(f, "non-singular"),
			Singularity::Cusp { alpha } => write!(f, "cusp at x = {}", alpha.value()),
			Singularity::Node { alpha, beta } => {
				write!(f, "node at x = {} (simple root {})", alpha.value(), beta.value())
			}
			Singularity::UnknownSingular => write!(f, "singular, unrecognized root pattern"),
		}
	}
}

// Polynomials over GF(p) as coefficient vectors, lowest degree first.
// Degrees never exceed 3 here.

fn degree(f: &[FieldElement]) -> Option<usize> {
	f.iter().rposition(|c| !c.is_zero())
}

fn eval(f: &[FieldElement], x: &FieldElement) -> FieldElement {
	let p = x.modulus();
	let mut acc = FieldElement::zero(p);
	for c in f.iter().rev() {
		acc = acc.mul(x).add(c);
	}
	acc
}

/// Remainder of f modulo g. The leading coefficient of g must be
/// invertible, which always holds for prime moduli.
fn rem(f: &[FieldElement], g: &[FieldElement]) -> Option<Vec<FieldElement>> {
	let dg = degree(g)?;
	let lead_inv = g[dg].inv().ok()?;
	let mut r = f.to_vec();
	while let Some(dr) = degree(&r) {
		if dr < dg {
			break;
		}
		let scale = r[dr].mul(&lead_inv);
		let shift = dr - dg;
		for i in 0..=dg {
			r[i + shift] = r[i + shift].sub(&scale.mul(&g[i]));
		}
	}
	Some(r)
}

/// Monic gcd of f and g.
fn gcd(f: &[FieldElement], g: &[FieldElement]) -> Option<Vec<FieldElement>> {
	let mut a = f.to_vec();
	let mut b = g.to_vec();
	while degree(&b).is_some() {
		let r = rem(&a, &b)?;
		a = b;
		b = r;
	}
	let da = degree(&a)?;
	let lead_inv = a[da].inv().ok()?;
	Some(a[..=da].iter().map(|c| c.mul(&lead_inv)).collect())
}

/// Classify the curve cubic. The degeneracy test is the simplified
/// discriminant 4*a4^3 + 27*a6^2 used by the demo servers; when it
/// vanishes, the repeated part of the cubic is extracted as
/// gcd(f, f') rather than by general root finding: a degree-2 gcd can
/// only be (x - alpha)^2 for a triple root alpha, a degree-1 gcd names
/// the double root directly, and a constant gcd means the cubic is
/// squarefree after all.
pub fn classify(p: &BigUint, a2: &FieldElement, a4: &FieldElement, a6: &FieldElement) -> Singularity {
	if *p <= BigUint::from(3u32) {
		return Singularity::UnknownSingular;
	}
	let four = FieldElement::from_u64(4, p);
	let twenty_seven = FieldElement::from_u64(27, p);
	let disc = four.mul(&a4.pow(&BigUint::from(3u32))).add(&twenty_seven.mul(&a6.square()));
	if !disc.is_zero() {
		return Singularity::NonSingular;
	}

	let one = FieldElement::one(p);
	let two = FieldElement::from_u64(2, p);
	let three = FieldElement::from_u64(3, p);
	// f(x) = x^3 + a2*x^2 + a4*x + a6, f'(x) = 3x^2 + 2*a2*x + a4
	let f = [a6.clone(), a4.clone(), a2.clone(), one.clone()];
	let f_prime = [a4.clone(), two.mul(a2), three.clone()];
	let g = match gcd(&f, &f_prime) {
		Some(g) => g,
		None => return Singularity::UnknownSingular,
	};

	match degree(&g) {
		Some(2) => {
			// Triple root; all three roots equal -a2/3.
			let alpha = match a2.neg().div(&three) {
				Ok(alpha) => alpha,
				Err(_) => return Singularity::UnknownSingular,
			};
			let expected_linear = two.mul(&alpha).neg();
			if g[1] == expected_linear && g[0] == alpha.square() && eval(&f, &alpha).is_zero() {
				Singularity::Cusp { alpha }
			} else {
				Singularity::UnknownSingular
			}
		}
		Some(1) => {
			// Monic linear gcd x + g[0]: double root alpha = -g[0].
			// The simple root follows from the root sum -a2.
			let alpha = g[0].neg();
			let beta = a2.neg().sub(&alpha).sub(&alpha);
			if beta != alpha && eval(&f, &beta).is_zero() {
				Singularity::Node { alpha, beta }
			} else {
				Singularity::UnknownSingular
			}
		}
		_ => Singularity::UnknownSingular,
	}
}
