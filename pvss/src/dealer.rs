use std::collections::{BTreeMap, BTreeSet};

use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use common::{
    dleq::Dleq,
    error::{
        ErrorKind::{CountMismatch, InvalidParameterSet},
        Result,
    },
    polynomial::Polynomial,
    random::random_max_bits,
    utils::{absorb_uint, challenge_from_transcript},
};

use crate::instance::PvssInstance;

/// Everything the dealer publishes for one round: the polynomial commitments,
/// the encrypted shares keyed by recipient, and a single aggregated proof
/// that every share is consistent with the commitments. Anyone holding the
/// instance can verify the bundle without decrypting a share.
#[allow(non_snake_case)]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DistributionBundle {
    /// Commitments C_j = g^(a_j), one per polynomial coefficient.
    pub commitments: Vec<BigUint>,
    /// 1-based evaluation position of each recipient.
    pub positions: BTreeMap<BigUint, usize>,
    /// Encrypted shares Y_i = pk_i^p(i).
    pub shares: BTreeMap<BigUint, BigUint>,
    /// Recipients in transcript order. Verification replays the hash over
    /// this order, so it is part of the published bundle.
    pub public_keys: Vec<BigUint>,
    pub challenge: BigUint,
    pub responses: BTreeMap<BigUint, BigUint>,
    /// The secret XORed with the hash of G^p(0).
    pub U: BigUint,
}

pub struct Dealer {
    pub instance: PvssInstance,
}

impl Dealer {
    pub fn new(instance: PvssInstance) -> Self {
        Self { instance }
    }

    /// Splits `secret` into encrypted shares for `public_keys`, any
    /// `threshold` of which suffice to reconstruct it.
    pub fn distribute_secret<R>(
        &self,
        secret: &BigUint,
        public_keys: &[BigUint],
        threshold: usize,
        rng: &mut R,
    ) -> Result<DistributionBundle>
    where
        R: CryptoRng + RngCore,
    {
        let polynomial = Polynomial::sample(threshold.saturating_sub(1), &self.instance.q, rng);
        let w = random_max_bits(rng, self.instance.length) % &self.instance.q;

        self.distribute_with(secret, public_keys, threshold, &polynomial, w)
    }

    /// Deterministic core of `distribute_secret`: the sharing polynomial and
    /// the proof nonce `w` are supplied by the caller.
    pub fn distribute_with(
        &self,
        secret: &BigUint,
        public_keys: &[BigUint],
        threshold: usize,
        polynomial: &Polynomial,
        w: BigUint,
    ) -> Result<DistributionBundle> {
        if threshold == 0 || threshold > public_keys.len() {
            return Err(InvalidParameterSet(public_keys.len(), threshold).into());
        }
        if polynomial.len() != threshold {
            return Err(CountMismatch(
                polynomial.len(),
                "coefficients",
                threshold,
                "required coefficients",
            )
            .into());
        }
        let distinct: BTreeSet<&BigUint> = public_keys.iter().collect();
        if distinct.len() != public_keys.len() {
            return Err(CountMismatch(
                distinct.len(),
                "distinct public keys",
                public_keys.len(),
                "public keys",
            )
            .into());
        }

        let instance = &self.instance;
        let exponent_modulus = &instance.q - 1u32;

        let commitments: Vec<BigUint> = polynomial
            .coefficients
            .iter()
            .map(|coefficient| instance.g.modpow(coefficient, &instance.q))
            .collect();

        // One transcript binds every recipient to the same challenge. The
        // hash absorbs (X_i, Y_i, a1_i, a2_i) in recipient order.
        let mut positions = BTreeMap::new();
        let mut shares = BTreeMap::new();
        let mut proofs = Vec::with_capacity(public_keys.len());
        let mut hasher = Sha256::new();

        for (index, key) in public_keys.iter().enumerate() {
            let position = index + 1;
            let share = polynomial.evaluate(position) % &exponent_modulus;

            let x = instance.g.modpow(&share, &instance.q);
            let y = key.modpow(&share, &instance.q);
            let proof = Dleq::new(
                instance.g.clone(),
                x.clone(),
                key.clone(),
                y.clone(),
                instance.q.clone(),
                share,
                w.clone(),
            );

            absorb_uint(&mut hasher, &x);
            absorb_uint(&mut hasher, &y);
            absorb_uint(&mut hasher, &proof.a1());
            absorb_uint(&mut hasher, &proof.a2());

            positions.insert(key.clone(), position);
            shares.insert(key.clone(), y);
            proofs.push(proof);
        }

        let challenge = challenge_from_transcript(hasher, &exponent_modulus);
        let responses = public_keys
            .iter()
            .zip(&proofs)
            .map(|(key, proof)| (key.clone(), proof.respond(&challenge)))
            .collect();

        // U = sigma XOR H(G^p(0)); reconstruction recovers G^p(0) by
        // interpolation and strips the mask again
        let mut hasher = Sha256::new();
        let shared_value = instance
            .G
            .modpow(&(polynomial.evaluate(0) % &exponent_modulus), &instance.q);
        absorb_uint(&mut hasher, &shared_value);
        let mask = challenge_from_transcript(hasher, &instance.q);

        Ok(DistributionBundle {
            commitments,
            positions,
            shares,
            public_keys: public_keys.to_vec(),
            challenge,
            responses,
            U: secret ^ &mask,
        })
    }
}
