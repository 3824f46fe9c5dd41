use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

use crate::random::random_below;

#[derive(Clone)]
pub struct Polynomial {
    pub coefficients: Vec<BigUint>,
}

impl Polynomial {
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn from_coefficients(coefficients: Vec<BigUint>) -> Self {
        Self { coefficients }
    }

    pub fn sample<R>(degree: usize, modulus: &BigUint, rng: &mut R) -> Self
    where
        R: CryptoRng + RngCore,
    {
        Self {
            coefficients: (0..=degree).map(|_| random_below(rng, modulus)).collect(),
        }
    }

    // Horner evaluation over the exact integers; callers reduce where a
    // modulus applies
    pub fn evaluate(&self, x: usize) -> BigUint {
        let x = BigUint::from(x);

        self.coefficients
            .iter()
            .rev()
            .fold(BigUint::zero(), |acc, coefficient| acc * &x + coefficient)
    }
}
