use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// Uniform draw from [0, bound) by rejection sampling. `bound` must be nonzero.
pub fn random_below<R>(rng: &mut R, bound: &BigUint) -> BigUint
where
    R: CryptoRng + RngCore,
{
    let bits = bound.bits();
    let mut buf = vec![0u8; bits.div_ceil(8) as usize];
    let mask = 0xffu8 >> ((buf.len() as u64 * 8 - bits) as u32);

    loop {
        rng.fill_bytes(&mut buf);
        buf[0] &= mask;
        let candidate = BigUint::from_bytes_be(&buf);
        if &candidate < bound {
            buf.zeroize();
            return candidate;
        }
    }
}

/// Uniform draw from [0, 2^bits).
pub fn random_max_bits<R>(rng: &mut R, bits: usize) -> BigUint
where
    R: CryptoRng + RngCore,
{
    let mut buf = vec![0u8; bits.div_ceil(8)];
    rng.fill_bytes(&mut buf);
    if bits % 8 != 0 {
        buf[0] >>= 8 - bits % 8;
    }

    let value = BigUint::from_bytes_be(&buf);
    buf.zeroize();
    value
}

/// Uniform draw from [2^(bits-1), 2^bits). `bits` must be nonzero.
pub fn random_exact_bits<R>(rng: &mut R, bits: usize) -> BigUint
where
    R: CryptoRng + RngCore,
{
    let mut buf = vec![0u8; bits.div_ceil(8)];
    rng.fill_bytes(&mut buf);
    if bits % 8 != 0 {
        buf[0] >>= 8 - bits % 8;
    }
    buf[0] |= 1 << ((bits + 7) % 8);

    let value = BigUint::from_bytes_be(&buf);
    buf.zeroize();
    value
}

#[cfg(test)]
mod test {
    use num_bigint::BigUint;
    use num_traits::Zero;

    use crate::random::{random_below, random_exact_bits, random_max_bits};

    #[test]
    fn below_stays_below() {
        let mut rng = rand::rng();
        let bound = BigUint::from(15487469u64);

        for _ in 0..100 {
            assert!(random_below(&mut rng, &bound) < bound);
        }
    }

    #[test]
    fn below_tiny_bound() {
        let mut rng = rand::rng();
        let bound = BigUint::from(1u32);

        assert!(random_below(&mut rng, &bound).is_zero());
    }

    #[test]
    fn max_bits_width() {
        let mut rng = rand::rng();

        for bits in [1usize, 7, 8, 9, 64, 127] {
            assert!(random_max_bits(&mut rng, bits).bits() <= bits as u64);
        }
    }

    #[test]
    fn exact_bits_width() {
        let mut rng = rand::rng();

        for bits in [1usize, 7, 8, 9, 64, 127] {
            assert_eq!(random_exact_bits(&mut rng, bits).bits(), bits as u64);
        }
    }
}
