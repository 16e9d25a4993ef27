use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
	NoModularInverse,
}

impl fmt::Display for FieldError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			FieldError::NoModularInverse => write!(f, "element has no modular inverse"),
		}
	}
}

/// An element of GF(p), tagged with its modulus at construction time.
/// Binary operations on elements of different moduli are a programmer
/// error and panic.
#[derive(Debug, Clone)]
pub struct FieldElement {
	value: BigUint,
	modulus: BigUint,
}

impl FieldElement {
	pub fn new(value: BigUint, modulus: &BigUint) -> Self {
		FieldElement {
			value: value % modulus,
			modulus: modulus.clone(),
		}
	}

	pub fn from_u64(value: u64, modulus: &BigUint) -> Self {
		Self::new(BigUint::from(value), modulus)
	}

	pub fn zero(modulus: &BigUint) -> Self {
		Self::new(BigUint::zero(), modulus)
	}

	pub fn one(modulus: &BigUint) -> Self {
		Self::new(BigUint::one(), modulus)
	}

	pub fn value(&self) -> &BigUint {
		&self.value
	}

	pub fn modulus(&self) -> &BigUint {
		&self.modulus
	}

	pub fn is_zero(&self) -> bool {
		self.value.is_zero()
	}

	pub fn is_one(&self) -> bool {
		self.value.is_one()
	}

	fn check_same_field(&self, other: &Self) {
		if self.modulus != other.modulus {
			panic!("field elements belong to different moduli");
		}
	}

	pub fn add(&self, other: &Self) -> Self {
		self.check_same_field(other);
		Self::new(&self.value + &other.value, &self.modulus)
	}

	pub fn sub(&self, other: &Self) -> Self {
		self.check_same_field(other);
		self.add(&other.neg())
	}

	pub fn mul(&self, other: &Self) -> Self {
		self.check_same_field(other);
		Self::new(&self.value * &other.value, &self.modulus)
	}

	pub fn neg(&self) -> Self {
		if self.value.is_zero() {
			return self.clone();
		}
		FieldElement {
			value: &self.modulus - &self.value,
			modulus: self.modulus.clone(),
		}
	}

	pub fn square(&self) -> Self {
		self.mul(self)
	}

	pub fn pow(&self, exp: &BigUint) -> Self {
		FieldElement {
			value: self.value.modpow(exp, &self.modulus),
			modulus: self.modulus.clone(),
		}
	}

	/// Multiplicative inverse via the extended Euclidean algorithm.
	/// Zero and zero divisors (possible only for composite moduli,
	/// which callers must never supply) have no inverse.
	pub fn inv(&self) -> Result<Self, FieldError> {
		if self.value.is_zero() {
			return Err(FieldError::NoModularInverse);
		}
		let mut t = BigInt::zero();
		let mut new_t = BigInt::one();
		let mut r = BigInt::from(self.modulus.clone());
		let mut new_r = BigInt::from(self.value.clone());
		while !new_r.is_zero() {
			let quotient = &r / &new_r;
			let next_t = &t - &quotient * &new_t;
			t = new_t;
			new_t = next_t;
			let next_r = &r - &quotient * &new_r;
			r = new_r;
			new_r = next_r;
		}
		if r > BigInt::one() {
			return Err(FieldError::NoModularInverse);
		}
		if t.sign() == Sign::Minus {
			t += BigInt::from(self.modulus.clone());
		}
		let value = t.to_biguint().ok_or(FieldError::NoModularInverse)?;
		Ok(FieldElement {
			value,
			modulus: self.modulus.clone(),
		})
	}

	pub fn div(&self, other: &Self) -> Result<Self, FieldError> {
		Ok(self.mul(&other.inv()?))
	}

	/// Euler's criterion. False for zero and for non-residues.
	pub fn is_quadratic_residue(&self) -> bool {
		let exp = (&self.modulus - 1u32) >> 1;
		self.pow(&exp).is_one()
	}

	/// Square root via Tonelli-Shanks, with the p = 3 (mod 4) shortcut.
	/// Returns None when the element is a quadratic non-residue.
	pub fn sqrt(&self) -> Option<Self> {
		if self.value.is_zero() {
			return Some(self.clone());
		}
		if !self.is_quadratic_residue() {
			return None;
		}
		let p = &self.modulus;
		if p % 4u32 == BigUint::from(3u32) {
			let exp = (p + 1u32) >> 2;
			return Some(self.pow(&exp));
		}

		// Write p - 1 = q * 2^s with q odd.
		let one = BigUint::one();
		let mut q = p - &one;
		let mut s = 0u32;
		while (&q & &one).is_zero() {
			q >>= 1;
			s += 1;
		}
		let mut z = FieldElement::from_u64(2, p);
		while z.is_quadratic_residue() {
			z = z.add(&FieldElement::one(p));
		}

		let mut m = s;
		let mut c = z.pow(&q);
		let mut t = self.pow(&q);
		let mut r = self.pow(&((&q + &one) >> 1));
		while !t.is_one() {
			let mut i = 0u32;
			let mut probe = t.clone();
			while !probe.is_one() {
				probe = probe.square();
				i += 1;
			}
			let b = c.pow(&(BigUint::one() << (m - i - 1)));
			m = i;
			c = b.square();
			t = t.mul(&c);
			r = r.mul(&b);
		}
		Some(r)
	}
}

impl PartialEq for FieldElement {
	fn eq(&self, other: &Self) -> bool {
		self.check_same_field(other);
		self.value == other.value
	}
}

impl Eq for FieldElement {}

impl Add for &FieldElement {
	type Output = FieldElement;

	fn add(self, other: &FieldElement) -> FieldElement {
		FieldElement::add(self, other)
	}
}

impl Sub for &FieldElement {
	type Output = FieldElement;

	fn sub(self, other: &FieldElement) -> FieldElement {
		FieldElement::sub(self, other)
	}
}

impl Mul for &FieldElement {
	type Output = FieldElement;

	fn mul(self, other: &FieldElement) -> FieldElement {
		FieldElement::mul(self, other)
	}
}

impl Neg for &FieldElement {
	type Output = FieldElement;

	fn neg(self) -> FieldElement {
		FieldElement::neg(self)
	}
}

impl fmt::Display for FieldElement {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{} (mod {})", self.value, self.modulus)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn fe(v: u64, p: u64) -> FieldElement {
		FieldElement::from_u64(v, &BigUint::from(p))
	}

	#[test]
	fn arithmetic_mod_seven() {
		let a = fe(3, 7);
		let b = fe(5, 7);
		assert_eq!((&a + &b).value(), &BigUint::from(1u32));
		assert_eq!((&a - &b).value(), &BigUint::from(5u32));
		assert_eq!((&a * &b).value(), &BigUint::from(1u32));
		assert_eq!((-&a).value(), &BigUint::from(4u32));
	}

	#[test]
	fn inverse_and_division() {
		let a = fe(3, 7);
		let b = fe(5, 7);
		assert_eq!(a.inv().unwrap().value(), &BigUint::from(5u32));
		assert_eq!(a.div(&b).unwrap().value(), &BigUint::from(2u32));
		assert_eq!(fe(0, 7).inv(), Err(FieldError::NoModularInverse));
	}

	#[test]
	fn fermat_exponentiation() {
		let a = fe(2, 11);
		assert!(a.pow(&BigUint::from(10u32)).is_one());
		assert_eq!(a.pow(&BigUint::from(5u32)).value(), &BigUint::from(10u32));
	}

	#[test]
	fn sqrt_three_mod_four() {
		// 19 = 3 (mod 4); 5^2 = 6 (mod 19)
		let r = fe(6, 19).sqrt().unwrap();
		assert_eq!(r.square(), fe(6, 19));
	}

	#[test]
	fn sqrt_one_mod_four() {
		// 17 = 1 (mod 4), full Tonelli-Shanks path; 8^2 = 13 (mod 17)
		let r = fe(13, 17).sqrt().unwrap();
		assert_eq!(r.square(), fe(13, 17));
	}

	#[test]
	fn sqrt_of_non_residue() {
		assert!(fe(3, 17).sqrt().is_none());
		assert!(!fe(3, 17).is_quadratic_residue());
	}

	#[test]
	fn sqrt_of_zero() {
		assert!(fe(0, 17).sqrt().unwrap().is_zero());
	}

	#[test]
	#[should_panic(expected = "different moduli")]
	fn mixing_moduli_panics() {
		let _ = fe(1, 7).add(&fe(1, 11));
	}
}
