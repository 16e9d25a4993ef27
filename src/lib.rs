//! Short Weierstrass curve arithmetic over GF(p) that deliberately
//! accepts singular (degenerate) curves, together with the classical
//! discrete-log reduction attacks those curves admit.
//!
//! Curves have the form y^2 = x^3 + a2*x^2 + a4*x + a6 (mod p). When
//! the defining cubic has a triple root the curve group is isomorphic
//! to (GF(p), +) and a single division recovers any secret scalar;
//! when it has a double root with rational tangents the group embeds
//! in GF(p)* and the scalar falls to Pohlig-Hellman. The [`dlp`]
//! module provides the multiplicative-group solvers independently.
//!
//! Nothing here validates its inputs the way a real cryptographic
//! library would: points are never checked against the curve equation
//! unless asked, because constructing dishonest points is the point.

pub mod attack;
pub mod curve;
pub mod dlp;
pub mod field;
pub mod singular;
pub mod trace;

pub use attack::{AttackError, Recovered};
pub use curve::{Curve, Point};
pub use dlp::{DlpError, DlpOptions};
pub use field::{FieldElement, FieldError};
pub use singular::Singularity;
pub use trace::TraceEvent;
