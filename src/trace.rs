use crate::singular::Singularity;
use num_bigint::BigUint;
use std::fmt;

/// Structured record of what an attack did, returned alongside the
/// recovered secret instead of being printed from inside the library.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
	Classified(Singularity),
	/// Images of the base point and the target under the cusp map
	/// phi(x, y) = (x - alpha) / y into (GF(p), +).
	CuspImage { u: BigUint, v: BigUint },
	/// Square root of alpha - beta, the tangent slope at the node.
	NodeTangent { t: BigUint },
	/// Images under psi(x, y) = (y + t(x - alpha)) / (y - t(x - alpha))
	/// into GF(p)*.
	NodeImage { u: BigUint, v: BigUint },
	MultiplicativeOrder { order: BigUint },
	SecretRecovered { secret: BigUint },
}

impl fmt::Display for TraceEvent {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			TraceEvent::Classified(s) => write!(f, "curve classified: {}", s),
			TraceEvent::CuspImage { u, v } => {
				write!(f, "cusp map into (GF(p), +): u = {}, v = {}", u, v)
			}
			TraceEvent::NodeTangent { t } => write!(f, "node tangent slope t = {}", t),
			TraceEvent::NodeImage { u, v } => {
				write!(f, "node map into GF(p)*: u = {}, v = {}", u, v)
			}
			TraceEvent::MultiplicativeOrder { order } => {
				write!(f, "solving v = u^k with ord(u) = {}", order)
			}
			TraceEvent::SecretRecovered { secret } => write!(f, "recovered k = {}", secret),
		}
	}
}
