use crate::field::FieldElement;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, ToPrimitive, Zero};
use std::collections::HashMap;
use std::fmt;

/// Bounds for the discrete-log search. Both limits turn a runaway
/// computation into a typed failure instead of an unbounded loop.
#[derive(Debug, Clone)]
pub struct DlpOptions {
	/// Largest baby-step table BSGS may allocate.
	pub max_table_size: u64,
	/// Trial-division limit when factoring the group order.
	pub trial_division_bound: u64,
}

impl Default for DlpOptions {
	fn default() -> Self {
		DlpOptions {
			max_table_size: 1 << 22,
			trial_division_bound: 1 << 20,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DlpError {
	/// No exponent exists (the target is outside the subgroup).
	NotFound,
	/// The search would exceed the configured table bound.
	BoundExceeded,
	/// The order could not be fully factored within the bound.
	IncompleteFactorization,
}

impl fmt::Display for DlpError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			DlpError::NotFound => write!(f, "no discrete logarithm exists"),
			DlpError::BoundExceeded => write!(f, "discrete-log search bound exceeded"),
			DlpError::IncompleteFactorization => {
				write!(f, "group order not smooth enough to factor within bound")
			}
		}
	}
}

/// Miller-Rabin with random bases.
pub fn is_probable_prime(n: &BigUint, rounds: u32) -> bool {
	let two = BigUint::from(2u32);
	let three = BigUint::from(3u32);
	if *n < two {
		return false;
	}
	if *n == two || *n == three {
		return true;
	}
	if (n & BigUint::one()).is_zero() {
		return false;
	}

	let n_minus_one = n - 1u32;
	let mut d = n_minus_one.clone();
	let mut r = 0u32;
	while (&d & BigUint::one()).is_zero() {
		d >>= 1;
		r += 1;
	}

	let mut rng = rand::thread_rng();
	'witness: for _ in 0..rounds {
		let a = rng.gen_biguint_range(&two, &n_minus_one);
		let mut x = a.modpow(&d, n);
		if x.is_one() || x == n_minus_one {
			continue;
		}
		for _ in 0..r - 1 {
			x = x.modpow(&two, n);
			if x == n_minus_one {
				continue 'witness;
			}
		}
		return false;
	}
	true
}

/// Trial division up to the bound; a leftover cofactor is kept as a
/// factor only when it is (probably) prime.
pub fn factorize(n: &BigUint, bound: u64) -> Result<Vec<(BigUint, u32)>, DlpError> {
	let mut n = n.clone();
	let mut factors: Vec<(BigUint, u32)> = Vec::new();
	let mut divide_out = |n: &mut BigUint, d: u64| {
		let d = BigUint::from(d);
		let mut e = 0u32;
		while (&*n % &d).is_zero() {
			*n /= &d;
			e += 1;
		}
		if e > 0 {
			factors.push((d, e));
		}
	};

	divide_out(&mut n, 2);
	let mut d = 3u64;
	while d <= bound {
		if BigUint::from(d) * d > n {
			break;
		}
		divide_out(&mut n, d);
		d += 2;
	}

	if !n.is_one() {
		if !is_probable_prime(&n, 24) {
			return Err(DlpError::IncompleteFactorization);
		}
		factors.push((n, 1));
	}
	Ok(factors)
}

/// Order of g in GF(p)*, given the factorization of p - 1.
pub fn element_order(g: &BigUint, p: &BigUint, factors_of_p_minus_one: &[(BigUint, u32)]) -> BigUint {
	let mut order = p - 1u32;
	for (q, e) in factors_of_p_minus_one {
		for _ in 0..*e {
			let reduced = &order / q;
			if g.modpow(&reduced, p).is_one() {
				order = reduced;
			} else {
				break;
			}
		}
	}
	order
}

/// Baby-step giant-step for g^k = h (mod p) with k below `order`.
pub fn bsgs(
	g: &BigUint,
	h: &BigUint,
	p: &BigUint,
	order: &BigUint,
	max_table: u64,
) -> Result<BigUint, DlpError> {
	let m_big = order.sqrt() + 1u32;
	let m = match m_big.to_u64() {
		Some(m) if m <= max_table => m,
		_ => return Err(DlpError::BoundExceeded),
	};

	let mut table: HashMap<BigUint, u64> = HashMap::with_capacity(m as usize);
	let mut e = BigUint::one();
	for j in 0..m {
		table.entry(e.clone()).or_insert(j);
		e = e * g % p;
	}

	let g_inv = FieldElement::new(g.clone(), p)
		.inv()
		.map_err(|_| DlpError::NotFound)?;
	let giant = g_inv.value().modpow(&BigUint::from(m), p);
	let mut gamma = h % p;
	for i in 0..m {
		if let Some(j) = table.get(&gamma) {
			return Ok(BigUint::from(i) * m + *j);
		}
		gamma = gamma * &giant % p;
	}
	Err(DlpError::NotFound)
}

fn crt(residues: &[BigUint], moduli: &[BigUint]) -> Result<BigUint, DlpError> {
	let mut x = BigUint::zero();
	let mut m_acc = BigUint::one();
	for (r, m) in residues.iter().zip(moduli) {
		let m_inv = FieldElement::new(m_acc.clone(), m)
			.inv()
			.map_err(|_| DlpError::NotFound)?;
		// Lift x to the residue r modulo m.
		let delta = FieldElement::new(r.clone(), m).sub(&FieldElement::new(x.clone(), m));
		x += &m_acc * delta.mul(&m_inv).value();
		m_acc *= m;
	}
	Ok(x % m_acc)
}

/// Pohlig-Hellman over the prime-power factorization of the order of g,
/// solving each prime subgroup digit with BSGS and recombining by CRT.
pub fn pohlig_hellman(
	g: &BigUint,
	h: &BigUint,
	p: &BigUint,
	order: &BigUint,
	factors: &[(BigUint, u32)],
	opts: &DlpOptions,
) -> Result<BigUint, DlpError> {
	let mut residues = Vec::with_capacity(factors.len());
	let mut moduli = Vec::with_capacity(factors.len());
	for (q, e) in factors {
		let prime_power = q.pow(*e);
		let cofactor = order / &prime_power;
		let g_sub = g.modpow(&cofactor, p);
		let h_sub = h.modpow(&cofactor, p);
		// Element of exact order q, the base for every digit.
		let gamma = g_sub.modpow(&q.pow(e - 1), p);
		let g_sub_inv = FieldElement::new(g_sub.clone(), p)
			.inv()
			.map_err(|_| DlpError::NotFound)?;

		let mut x = BigUint::zero();
		for j in 0..*e {
			let shifted = &h_sub * g_sub_inv.value().modpow(&x, p) % p;
			let digit_target = shifted.modpow(&q.pow(e - 1 - j), p);
			let digit = bsgs(&gamma, &digit_target, p, q, opts.max_table_size)?;
			x += digit * q.pow(j);
		}
		residues.push(x);
		moduli.push(prime_power);
	}
	crt(&residues, &moduli)
}

/// General-purpose discrete log in GF(p)*: factor p - 1, reduce to the
/// order of g, then run Pohlig-Hellman. Returns the exponent together
/// with the order of g, since the exponent is only determined modulo
/// that order.
pub fn discrete_log(
	g: &BigUint,
	h: &BigUint,
	p: &BigUint,
	opts: &DlpOptions,
) -> Result<(BigUint, BigUint), DlpError> {
	let factors = factorize(&(p - 1u32), opts.trial_division_bound)?;
	let order = element_order(g, p, &factors);
	if !h.modpow(&order, p).is_one() {
		// h is outside the subgroup generated by g.
		return Err(DlpError::NotFound);
	}
	// Re-derive each factor's multiplicity within the reduced order.
	let mut order_factors = Vec::new();
	for (q, _) in &factors {
		let mut e = 0u32;
		let mut rest = order.clone();
		while (&rest % q).is_zero() {
			rest /= q;
			e += 1;
		}
		if e > 0 {
			order_factors.push((q.clone(), e));
		}
	}
	let k = pohlig_hellman(g, h, p, &order, &order_factors, opts)?;
	Ok((k, order))
}
