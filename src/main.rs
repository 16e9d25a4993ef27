use num_bigint::{BigUint, RandBigInt};
use num_traits::{Num, One, Zero};
use singular_curve_attacks::{dlp, Curve, DlpOptions, Singularity};

fn main() {
	let mut rng = rand::thread_rng();

	{ // Cusp attack: y^2 = x^3 over a 256-bit prime, base point (1, 1)
		let p = BigUint::from_str_radix(
			"4368590184733545720227961182704359358435747188309319510520316493183539079703",
			10,
		).unwrap();
		let curve = Curve::new(p.clone(), BigUint::zero(), BigUint::zero(), BigUint::zero());
		let g = curve.affine(BigUint::one(), BigUint::one());
		let secret = rng.gen_biguint_range(&BigUint::one(), &p);
		let public = curve.scalar_mul(&secret, &g).unwrap();

		println!("Cusp attack over GF({})", p);
		println!("  victim public key Q = {}", public);
		let recovered = curve.attack(&g, &public, &DlpOptions::default()).unwrap();
		for event in &recovered.trace {
			println!("  {}", event);
		}
		assert_eq!(recovered.secret, secret);
		println!("  secret confirmed: 0x{}", hex::encode(recovered.secret.to_bytes_be()));
	}

	{ // Node attack: y^2 = x^3 + x^2 over a prime with smooth p - 1
		let p = BigUint::from(4523215699003u64);
		let curve = Curve::new(p.clone(), BigUint::one(), BigUint::zero(), BigUint::zero());
		// x = m^2 - 1, y = m*x lies on y^2 = x^2 (x + 1); here m = 3.
		let g = curve.affine(BigUint::from(8u32), BigUint::from(24u32));
		let secret = rng.gen_biguint_range(&BigUint::one(), &(&p - 1u32));
		let public = curve.scalar_mul(&secret, &g).unwrap();

		println!("Node attack over GF({})", p);
		println!("  victim public key Q = {}", public);
		let recovered = curve.attack(&g, &public, &DlpOptions::default()).unwrap();
		for event in &recovered.trace {
			println!("  {}", event);
		}
		assert_eq!(recovered.secret, secret);
		println!("  secret confirmed: 0x{}", hex::encode(recovered.secret.to_bytes_be()));
	}

	{ // Classification: the reductions only exist for degenerate curves
		let cusp = Curve::new(BigUint::from(97u32), BigUint::zero(), BigUint::zero(), BigUint::zero());
		println!("y^2 = x^3 (mod 97) is a {}", cusp.singularity());

		let p256 = BigUint::from_str_radix(
			"ffffffff00000001000000000000000000000000ffffffffffffffffffffffff",
			16,
		).unwrap();
		let b = BigUint::from_str_radix(
			"41058363725152142129326129780047268409114441015993725554835256314039467401291",
			10,
		).unwrap();
		let nist = Curve::new(p256.clone(), BigUint::zero(), &p256 - 3u32, b);
		assert_eq!(*nist.singularity(), Singularity::NonSingular);
		println!("NIST P-256 is {} (no reduction exists)", nist.singularity());
	}

	{ // Pohlig-Hellman on its own: GF(8101)*, generator 6
		let p = BigUint::from(8101u32);
		let g = BigUint::from(6u32);
		let secret = BigUint::from(7531u32);
		let h = g.modpow(&secret, &p);
		let (k, order) = dlp::discrete_log(&g, &h, &p, &DlpOptions::default()).unwrap();
		assert_eq!(k, secret);
		println!("Pohlig-Hellman: log_6({}) = {} in GF(8101)* (order {})", h, k, order);
	}
}
