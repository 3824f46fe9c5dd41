use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use sha2::{Digest, Sha256};

// Transcript values are absorbed as decimal expansions so the challenge
// depends only on the numeric value, not on byte width or padding.
pub fn absorb_uint(hasher: &mut Sha256, value: &BigUint) {
    hasher.update(value.to_str_radix(10).as_bytes());
}

pub fn challenge_from_transcript(hasher: Sha256, modulus: &BigUint) -> BigUint {
    let digest = hasher.finalize();

    BigUint::from_bytes_be(&digest[..]).mod_floor(modulus)
}

// Lagrange coefficient for position i over the contributing positions, kept
// as an exact signed numerator / denominator pair. The exponent group mod
// q - 1 is not a field, so division is left to the caller.
pub fn lagrange_coefficient(i: usize, positions: &[usize]) -> (BigInt, BigInt) {
    if !positions.contains(&i) {
        return (BigInt::zero(), BigInt::one());
    }

    let mut numerator = BigInt::one();
    let mut denominator = BigInt::one();

    for &j in positions {
        if j == i {
            continue;
        }
        numerator *= BigInt::from(j);
        denominator *= BigInt::from(j) - BigInt::from(i);
    }

    (numerator, denominator)
}

#[cfg(test)]
mod test {
    use num_bigint::{BigInt, BigUint};
    use num_traits::One;
    use sha2::{Digest, Sha256};

    use crate::utils::{absorb_uint, challenge_from_transcript, lagrange_coefficient};

    #[test]
    fn transcript_challenge_known_digest() {
        let mut hasher = Sha256::new();
        absorb_uint(
            &mut hasher,
            &BigUint::parse_bytes(b"43589072349864890574839", 10).unwrap(),
        );
        absorb_uint(
            &mut hasher,
            &BigUint::parse_bytes(b"14735247304952934566", 10).unwrap(),
        );

        assert_eq!(
            hex::encode(hasher.clone().finalize()),
            "e25e5b7edf4ea66e5238393fb4f183e0fc1593c69a522f9255a51bd0bc2b7ba7"
        );

        // wide enough that the reduction is the identity
        let wide = BigUint::one() << 256;
        assert_eq!(
            challenge_from_transcript(hasher, &wide),
            BigUint::parse_bytes(
                b"102389418883295205726805934198606438410316463205994911160958467170744727731111",
                10,
            )
            .unwrap()
        );
    }

    #[test]
    fn challenge_stays_below_modulus() {
        let mut hasher = Sha256::new();
        absorb_uint(&mut hasher, &BigUint::from(781234u64));

        let modulus = BigUint::from(15487468u64);
        assert!(challenge_from_transcript(hasher, &modulus) < modulus);
    }

    #[test]
    fn lagrange_signed_fraction() {
        let (numerator, denominator) = lagrange_coefficient(3, &[1, 3, 4]);

        assert_eq!(numerator, BigInt::from(4));
        assert_eq!(denominator, BigInt::from(-2));
    }

    #[test]
    fn lagrange_absent_position() {
        let (numerator, denominator) = lagrange_coefficient(2, &[1, 3, 4]);

        assert_eq!(numerator, BigInt::from(0));
        assert_eq!(denominator, BigInt::from(1));
    }
}
