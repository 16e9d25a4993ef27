use crate::curve::{Curve, Point};
use crate::dlp::{self, DlpOptions};
use crate::field::{FieldElement, FieldError};
use crate::singular::Singularity;
use crate::trace::TraceEvent;
use num_bigint::BigUint;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackError {
	/// The curve's singularity class has no known reduction.
	NotApplicable,
	/// The class is right but a required sub-condition fails, e.g. the
	/// node tangents only split over an extension field, or the
	/// discrete log could not be completed within its bounds.
	NoAttack,
	/// Modular division failed mid-computation; fatal, not retried.
	Field(FieldError),
}

impl fmt::Display for AttackError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			AttackError::NotApplicable => write!(f, "no attack applies to this curve"),
			AttackError::NoAttack => write!(f, "attack preconditions not met"),
			AttackError::Field(e) => write!(f, "field arithmetic failed: {}", e),
		}
	}
}

impl From<FieldError> for AttackError {
	fn from(e: FieldError) -> Self {
		AttackError::Field(e)
	}
}

/// A recovered discrete logarithm plus the trace of how it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Recovered {
	pub secret: BigUint,
	pub trace: Vec<TraceEvent>,
}

fn affine_coords(point: &Point) -> Result<(&FieldElement, &FieldElement), AttackError> {
	match point {
		Point::Infinity => Err(AttackError::NoAttack),
		Point::Affine { x, y } => Ok((x, y)),
	}
}

impl Curve {
	/// Solve Q = k*G on a cuspidal curve by mapping both points into
	/// the additive group of GF(p) via phi(x, y) = (x - alpha) / y,
	/// where k = phi(Q) / phi(G). A zero y-coordinate is a hard
	/// precondition violation and surfaces as a field error.
	pub fn cusp_attack(&self, g: &Point, q: &Point) -> Result<Recovered, AttackError> {
		let alpha = match self.singularity() {
			Singularity::Cusp { alpha } => alpha.clone(),
			_ => return Err(AttackError::NotApplicable),
		};
		let mut trace = vec![TraceEvent::Classified(self.singularity().clone())];

		let (gx, gy) = affine_coords(g)?;
		let (qx, qy) = affine_coords(q)?;
		let u = gx.sub(&alpha).div(gy)?;
		let v = qx.sub(&alpha).div(qy)?;
		trace.push(TraceEvent::CuspImage {
			u: u.value().clone(),
			v: v.value().clone(),
		});

		let k = v.div(&u)?;
		trace.push(TraceEvent::SecretRecovered {
			secret: k.value().clone(),
		});
		Ok(Recovered {
			secret: k.value().clone(),
			trace,
		})
	}

	/// Solve Q = k*G on a nodal curve by mapping both points into
	/// GF(p)* via psi(x, y) = (y + t(x - alpha)) / (y - t(x - alpha)),
	/// t = sqrt(alpha - beta), then solving psi(Q) = psi(G)^k with
	/// Pohlig-Hellman. Fails with NoAttack when alpha - beta is a
	/// non-residue (the tangents do not split over GF(p)) or when the
	/// discrete log does not complete within the configured bounds.
	/// The recovered exponent is reduced modulo ord(psi(G)).
	pub fn node_attack(&self, g: &Point, q: &Point, opts: &DlpOptions) -> Result<Recovered, AttackError> {
		let (alpha, beta) = match self.singularity() {
			Singularity::Node { alpha, beta } => (alpha.clone(), beta.clone()),
			_ => return Err(AttackError::NotApplicable),
		};
		let mut trace = vec![TraceEvent::Classified(self.singularity().clone())];

		let t = match alpha.sub(&beta).sqrt() {
			Some(t) if !t.is_zero() => t,
			_ => return Err(AttackError::NoAttack),
		};
		trace.push(TraceEvent::NodeTangent {
			t: t.value().clone(),
		});

		let (gx, gy) = affine_coords(g)?;
		let (qx, qy) = affine_coords(q)?;
		// psi is undefined at the singular point itself.
		if *gx == alpha || *qx == alpha {
			return Err(AttackError::NoAttack);
		}
		let psi = |x: &FieldElement, y: &FieldElement| -> Result<FieldElement, FieldError> {
			let shifted = t.mul(&x.sub(&alpha));
			y.add(&shifted).div(&y.sub(&shifted))
		};
		let u = psi(gx, gy)?;
		let v = psi(qx, qy)?;
		trace.push(TraceEvent::NodeImage {
			u: u.value().clone(),
			v: v.value().clone(),
		});

		let (secret, order) = dlp::discrete_log(u.value(), v.value(), self.p(), opts)
			.map_err(|_| AttackError::NoAttack)?;
		trace.push(TraceEvent::MultiplicativeOrder { order });
		trace.push(TraceEvent::SecretRecovered {
			secret: secret.clone(),
		});
		Ok(Recovered { secret, trace })
	}

	/// Dispatch on the curve's singularity class.
	pub fn attack(&self, g: &Point, q: &Point, opts: &DlpOptions) -> Result<Recovered, AttackError> {
		match self.singularity() {
			Singularity::Cusp { .. } => self.cusp_attack(g, q),
			Singularity::Node { .. } => self.node_attack(g, q, opts),
			Singularity::NonSingular | Singularity::UnknownSingular => {
				Err(AttackError::NotApplicable)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use num_traits::{Num, Zero};

	const SMOOTH_P: u64 = 4523215699003; // p - 1 = 2*3*7*11*13*17*19*29*37*41*53

	fn cusp_curve_97() -> Curve {
		Curve::new(
			BigUint::from(97u32),
			BigUint::zero(),
			BigUint::zero(),
			BigUint::zero(),
		)
	}

	// y^2 = (x - alpha)^2 (x + 2*alpha): a4 = -3*alpha^2, a6 = 2*alpha^3,
	// double root alpha, simple root -2*alpha, alpha - beta = 3*alpha.
	fn node_curve(alpha: u64) -> Curve {
		let p = BigUint::from(SMOOTH_P);
		let a4 = &p - 3 * alpha * alpha;
		let a6 = BigUint::from(2 * alpha * alpha * alpha);
		Curve::new(p, BigUint::zero(), a4, a6)
	}

	#[test]
	fn cusp_attack_round_trip() {
		let curve = cusp_curve_97();
		let g = curve.affine(BigUint::from(1u32), BigUint::from(1u32));
		assert!(curve.is_on_curve(&g));
		let k = BigUint::from(55u32);
		let q = curve.scalar_mul(&k, &g).unwrap();
		let recovered = curve.cusp_attack(&g, &q).unwrap();
		assert_eq!(recovered.secret, k);
		assert!(matches!(recovered.trace[0], TraceEvent::Classified(_)));
	}

	#[test]
	fn cusp_attack_round_trip_256_bit() {
		// The original demo's 256-bit prime; y^2 = x^3 with G = (1, 1).
		let p = BigUint::from_str_radix(
			"4368590184733545720227961182704359358435747188309319510520316493183539079703",
			10,
		)
		.unwrap();
		let curve = Curve::new(p.clone(), BigUint::zero(), BigUint::zero(), BigUint::zero());
		let g = curve.affine(BigUint::from(1u32), BigUint::from(1u32));
		let k = BigUint::from_str_radix("314159265358979323846264338327950288419", 10).unwrap();
		let q = curve.scalar_mul(&k, &g).unwrap();
		assert_eq!(curve.cusp_attack(&g, &q).unwrap().secret, k);
	}

	#[test]
	fn cusp_attack_rejects_zero_y() {
		let curve = cusp_curve_97();
		let g = curve.affine(BigUint::zero(), BigUint::zero());
		let q = curve.affine(BigUint::from(1u32), BigUint::from(1u32));
		assert_eq!(
			curve.cusp_attack(&g, &q),
			Err(AttackError::Field(FieldError::NoModularInverse))
		);
	}

	#[test]
	fn node_attack_round_trip() {
		// alpha = 2: alpha - beta = 6, a quadratic residue mod SMOOTH_P.
		let curve = node_curve(2);
		assert!(matches!(curve.singularity(), Singularity::Node { .. }));
		let g = curve.affine(BigUint::from(5u32), BigUint::from(9u32));
		assert!(curve.is_on_curve(&g));
		let k = BigUint::from(1234577u64);
		let q = curve.scalar_mul(&k, &g).unwrap();
		let recovered = curve.node_attack(&g, &q, &DlpOptions::default()).unwrap();
		assert_eq!(recovered.secret, k);
		// The recovered multiple reproduces Q.
		assert_eq!(curve.scalar_mul(&recovered.secret, &g).unwrap(), q);
	}

	#[test]
	fn node_attack_with_quadratic_term() {
		// The original node demo curve y^2 = x^3 + x^2, parametrized by
		// x = m^2 - 1, y = m*x.
		let p = BigUint::from(SMOOTH_P);
		let curve = Curve::new(p, BigUint::from(1u32), BigUint::zero(), BigUint::zero());
		let g = curve.affine(BigUint::from(8u32), BigUint::from(24u32));
		assert!(curve.is_on_curve(&g));
		let k = BigUint::from(987654321098u64);
		let q = curve.scalar_mul(&k, &g).unwrap();
		let recovered = curve.node_attack(&g, &q, &DlpOptions::default()).unwrap();
		assert_eq!(recovered.secret, k);
	}

	#[test]
	fn node_attack_fails_on_non_residue_tangent() {
		// alpha = 4: alpha - beta = 12, a non-residue mod SMOOTH_P.
		let curve = node_curve(4);
		assert!(matches!(curve.singularity(), Singularity::Node { .. }));
		let g = curve.affine(BigUint::from(5u32), BigUint::from(9u32));
		let q = curve.affine(BigUint::from(5u32), BigUint::from(9u32));
		assert_eq!(
			curve.node_attack(&g, &q, &DlpOptions::default()),
			Err(AttackError::NoAttack)
		);
	}

	#[test]
	fn dispatch_refuses_non_singular_curves() {
		let curve = Curve::new(
			BigUint::from(17u32),
			BigUint::zero(),
			BigUint::from(2u32),
			BigUint::from(2u32),
		);
		let g = curve.affine(BigUint::from(5u32), BigUint::from(1u32));
		let q = curve.scalar_mul(&BigUint::from(7u32), &g).unwrap();
		assert_eq!(
			curve.attack(&g, &q, &DlpOptions::default()),
			Err(AttackError::NotApplicable)
		);
	}

	#[test]
	fn dispatch_refuses_unknown_singularity() {
		// Squarefree cubic with vanishing simplified discriminant.
		let curve = Curve::new(
			BigUint::from(97u32),
			BigUint::from(1u32),
			BigUint::from(1u32),
			BigUint::from(5u32),
		);
		assert_eq!(*curve.singularity(), Singularity::UnknownSingular);
		let g = curve.affine(BigUint::from(1u32), BigUint::from(1u32));
		assert_eq!(
			curve.attack(&g, &g, &DlpOptions::default()),
			Err(AttackError::NotApplicable)
		);
	}

	#[test]
	fn attacks_reject_infinity_inputs() {
		let curve = cusp_curve_97();
		let g = curve.affine(BigUint::from(1u32), BigUint::from(1u32));
		assert_eq!(
			curve.cusp_attack(&curve.infinity(), &g),
			Err(AttackError::NoAttack)
		);
		assert_eq!(
			curve.cusp_attack(&g, &curve.infinity()),
			Err(AttackError::NoAttack)
		);
	}

	#[test]
	fn wrong_class_is_not_applicable() {
		let cusp = cusp_curve_97();
		let node = node_curve(2);
		let g = cusp.affine(BigUint::from(1u32), BigUint::from(1u32));
		assert_eq!(
			cusp.node_attack(&g, &g, &DlpOptions::default()),
			Err(AttackError::NotApplicable)
		);
		let h = node.affine(BigUint::from(5u32), BigUint::from(9u32));
		assert_eq!(node.cusp_attack(&h, &h), Err(AttackError::NotApplicable));
	}
}
