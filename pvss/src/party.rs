use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use common::{
    dleq::Dleq,
    error::{
        ErrorKind::{NonInvertibleKey, UnknownPublicKey},
        Result,
    },
    random::random_max_bits,
    utils::{absorb_uint, challenge_from_transcript},
};

use crate::dealer::DistributionBundle;
use crate::instance::PvssInstance;

/// A participant's decrypted share S_i = G^p(i), published together with a
/// proof that it really is the decryption of the encrypted share the dealer
/// addressed to `public_key`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShareBundle {
    pub public_key: BigUint,
    pub share: BigUint,
    pub challenge: BigUint,
    pub response: BigUint,
}

pub struct Party {
    pub instance: PvssInstance,
    pub private_key: BigUint,
    pub public_key: BigUint,
}

impl Party {
    pub fn new<R>(instance: PvssInstance, rng: &mut R) -> Self
    where
        R: CryptoRng + RngCore,
    {
        let private_key = instance.generate_private_key(rng);

        Self::from_private_key(instance, private_key)
    }

    pub fn from_private_key(instance: PvssInstance, private_key: BigUint) -> Self {
        let public_key = instance.public_key(&private_key);

        Self {
            instance,
            private_key,
            public_key,
        }
    }

    /// Decrypts this party's share from the distribution bundle and attaches
    /// a proof of correct decryption.
    pub fn extract_share<R>(
        &self,
        distribution: &DistributionBundle,
        rng: &mut R,
    ) -> Result<ShareBundle>
    where
        R: CryptoRng + RngCore,
    {
        let w = random_max_bits(rng, self.instance.length) % &self.instance.q;

        self.extract_share_with(distribution, w)
    }

    /// Deterministic core of `extract_share`: the proof nonce `w` is supplied
    /// by the caller.
    pub fn extract_share_with(
        &self,
        distribution: &DistributionBundle,
        w: BigUint,
    ) -> Result<ShareBundle> {
        let instance = &self.instance;
        let exponent_modulus = &instance.q - 1u32;

        let Some(encrypted_share) = distribution.shares.get(&self.public_key) else {
            return Err(UnknownPublicKey(self.public_key.to_string()).into());
        };

        // S = Y^(1/x): strips the key from Y = (G^p(i))^x
        let Some(inverse_key) = self.private_key.modinv(&exponent_modulus) else {
            return Err(NonInvertibleKey.into());
        };
        let share = encrypted_share.modpow(&inverse_key, &instance.q);

        // proof that log_G(pk) = log_S(Y), i.e. the same x links both pairs
        let proof = Dleq::new(
            instance.G.clone(),
            self.public_key.clone(),
            share.clone(),
            encrypted_share.clone(),
            instance.q.clone(),
            self.private_key.clone(),
            w,
        );

        let mut hasher = Sha256::new();
        absorb_uint(&mut hasher, &self.public_key);
        absorb_uint(&mut hasher, encrypted_share);
        absorb_uint(&mut hasher, &proof.a1());
        absorb_uint(&mut hasher, &proof.a2());
        let challenge = challenge_from_transcript(hasher, &exponent_modulus);

        Ok(ShareBundle {
            public_key: self.public_key.clone(),
            share,
            challenge: challenge.clone(),
            response: proof.respond(&challenge),
        })
    }
}
