use num_bigint::{BigInt, BigUint};
use rand::{CryptoRng, RngCore};

use crate::arith::signed_mod;
use crate::random::random_max_bits;

// Chaum-Pedersen proof of discrete logarithm equality: the prover knows
// alpha with h1 = g1^alpha and h2 = g2^alpha without revealing alpha.
// The challenge c is supplied by the verifier (or a Fiat-Shamir hash) after
// the announcement (a1, a2) has been fixed.
pub struct Dleq {
    pub g1: BigUint,
    pub h1: BigUint,
    pub g2: BigUint,
    pub h2: BigUint,
    pub w: BigUint,
    pub q: BigUint,
    pub alpha: BigUint,
    pub c: Option<BigUint>,
}

impl Dleq {
    pub fn new(
        g1: BigUint,
        h1: BigUint,
        g2: BigUint,
        h2: BigUint,
        q: BigUint,
        alpha: BigUint,
        w: BigUint,
    ) -> Self {
        Self {
            g1,
            h1,
            g2,
            h2,
            w,
            q,
            alpha,
            c: None,
        }
    }

    pub fn sample<R>(
        g1: BigUint,
        h1: BigUint,
        g2: BigUint,
        h2: BigUint,
        length: usize,
        q: BigUint,
        alpha: BigUint,
        rng: &mut R,
    ) -> Self
    where
        R: CryptoRng + RngCore,
    {
        let w = random_max_bits(rng, length) % &q;

        Self::new(g1, h1, g2, h2, q, alpha, w)
    }

    pub fn a1(&self) -> BigUint {
        self.g1.modpow(&self.w, &self.q)
    }

    pub fn a2(&self) -> BigUint {
        self.g2.modpow(&self.w, &self.q)
    }

    // w - alpha * c can go negative, so reduce over the signed integers into
    // the exponent group mod q - 1
    pub fn respond(&self, c: &BigUint) -> BigUint {
        let signed = BigInt::from(self.w.clone()) - BigInt::from(&self.alpha * c);

        signed_mod(&signed, &(&self.q - 1u32))
    }

    pub fn response(&self) -> Option<BigUint> {
        self.c.as_ref().map(|c| self.respond(c))
    }
}
