use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use rand::{CryptoRng, RngCore};

use crate::random::{random_exact_bits, random_max_bits};

/// Representative of `x` in [0, modulus), correct for negative `x`.
pub fn signed_mod(x: &BigInt, modulus: &BigUint) -> BigUint {
    let modulus = BigInt::from(modulus.clone());
    x.mod_floor(&modulus).magnitude().clone()
}

pub fn is_probable_prime(n: &BigUint) -> bool {
    is_prime::is_prime(&n.to_str_radix(10))
}

/// Draws integers of at most `bit_length` bits until one is prime.
/// Retry until success, no iteration cap.
pub fn random_prime<R>(rng: &mut R, bit_length: usize) -> BigUint
where
    R: CryptoRng + RngCore,
{
    let mut candidate = random_max_bits(rng, bit_length);
    while !is_probable_prime(&candidate) {
        candidate = random_max_bits(rng, bit_length);
    }
    candidate
}

/// Searches for a safe prime q with `bit_length` bits, walking downwards in
/// steps of 2 from a random odd starting point until both q and (q-1)/2 are
/// prime. Returns (q, (q-1)/2). `bit_length` must be at least 3.
pub fn safe_prime<R>(rng: &mut R, bit_length: usize) -> (BigUint, BigUint)
where
    R: CryptoRng + RngCore,
{
    // staying above the range bottom keeps q at exactly `bit_length` bits
    let floor = BigUint::from(1u32) << (bit_length - 1);

    loop {
        let mut q = random_exact_bits(rng, bit_length);
        if q.is_even() {
            q -= 1u32;
        }

        while q > floor {
            q -= 2u32;
            if !is_probable_prime(&q) {
                continue;
            }
            let sophie = (&q - 1u32) / 2u32;
            if is_probable_prime(&sophie) {
                return (q, sophie);
            }
        }
        // walked off the bottom of the range, start over with a fresh draw
    }
}

#[cfg(test)]
mod test {
    use num_bigint::{BigInt, BigUint};

    use crate::arith::{is_probable_prime, random_prime, safe_prime, signed_mod};

    #[test]
    fn signed_mod_negative_operands() {
        let modulus = BigUint::from(7u32);

        assert_eq!(signed_mod(&BigInt::from(-1), &modulus), BigUint::from(6u32));
        assert_eq!(signed_mod(&BigInt::from(-7), &modulus), BigUint::from(0u32));
        assert_eq!(
            signed_mod(&BigInt::from(-15), &modulus),
            BigUint::from(6u32)
        );
        assert_eq!(signed_mod(&BigInt::from(15), &modulus), BigUint::from(1u32));
        assert_eq!(signed_mod(&BigInt::from(0), &modulus), BigUint::from(0u32));
    }

    #[test]
    fn probable_prime_known_values() {
        assert!(is_probable_prime(&BigUint::from(2u32)));
        assert!(is_probable_prime(&BigUint::from(23u32)));
        assert!(is_probable_prime(&BigUint::from(15487469u64)));
        // largest prime below 2^64, past any trial-division shortcut
        assert!(is_probable_prime(&BigUint::from(18446744073709551557u64)));

        assert!(!is_probable_prime(&BigUint::from(24u32)));
        assert!(!is_probable_prime(&BigUint::from(15487467u64)));
    }

    #[test]
    fn random_primes_are_prime() {
        let mut rng = rand::rng();

        for _ in 0..=10 {
            assert!(is_probable_prime(&random_prime(&mut rng, 128)));
        }
    }

    #[test]
    fn safe_prime_pair() {
        let mut rng = rand::rng();
        let (q, sophie) = safe_prime(&mut rng, 32);

        assert!(is_probable_prime(&q));
        assert!(is_probable_prime(&sophie));
        assert_eq!(&sophie * 2u32 + 1u32, q);
    }
}
