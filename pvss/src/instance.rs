use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Signed};
use rand::{CryptoRng, RngCore};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::error;

use common::{
    arith::{is_probable_prime, safe_prime},
    error::{
        ErrorKind::{CompositeModulus, InsufficientShares, InvalidLength, UnknownPublicKey},
        Result,
    },
    random::random_below,
    utils::{absorb_uint, challenge_from_transcript, lagrange_coefficient},
};

use crate::dealer::DistributionBundle;
use crate::party::ShareBundle;

// RFC 3526 2048-bit MODP group modulus; (q-1)/2 is the matching Sophie
// Germain prime.
const RFC3526_MODP_2048: &[u8] = b"32317006071311007300338913926423828248817941241140239112842009751400741706634354222619689417363569347117901737909704191754605873209195028853758986185622153212175412514901774520270235796078236248884246189477587641105928646099411723245426622522193230540919037680524235519125679715870117001058055877651038861847280257976054903569732561526167081339361799541336476559160368317896729073178384589680639671900977202194168647225871031411336429319536193471636533209717077448227988588565369208645296636077250268955505928362751121174096972998068410554359584866583291642136218231078990999448652468262416972035911852507045361090559";

/// Domain parameters for one secret sharing round: a safe prime modulus `q`,
/// the commitment generator `g`, and the key/encryption generator `G`.
/// `length` is the bit width used for nonce and key generation. Instances are
/// immutable once built and freely shareable.
#[allow(non_snake_case)]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PvssInstance {
    pub length: usize,
    pub q: BigUint,
    pub g: BigUint,
    pub G: BigUint,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefectCause {
    DenominatorNotInvertible,
    FactorNotInvertible,
}

/// A share contribution that had to be skipped during reconstruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconstructionDefect {
    pub position: usize,
    pub cause: DefectCause,
}

/// Outcome of a reconstruction run. `secret` is the best-effort recovery over
/// every contribution that could be applied; a contribution whose Lagrange
/// denominator (mod q-1) or factor (mod q) had no inverse is skipped and
/// recorded in `defects`. A degraded run still yields a value, but it is not
/// the dealt secret unless the skipped contributions were redundant, so
/// callers must check `is_degraded` before trusting the result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconstruction {
    pub secret: BigUint,
    pub defects: Vec<ReconstructionDefect>,
}

impl Reconstruction {
    pub fn is_degraded(&self) -> bool {
        !self.defects.is_empty()
    }
}

impl PvssInstance {
    #[allow(non_snake_case)]
    pub fn new(length: usize, q: BigUint, g: BigUint, G: BigUint) -> Result<Self> {
        if length == 0 {
            return Err(InvalidLength(length).into());
        }
        if !is_probable_prime(&q) {
            return Err(CompositeModulus(q.to_string()).into());
        }

        Ok(Self { length, q, g, G })
    }

    /// Searches for a fresh safe prime of `length` bits. The Sophie Germain
    /// prime doubles as the commitment generator and `2` generates key pairs.
    /// The smallest safe prime, 5, has 3 bits, so shorter lengths are
    /// rejected before the search can stall.
    pub fn generate<R>(length: usize, rng: &mut R) -> Result<Self>
    where
        R: CryptoRng + RngCore,
    {
        if length < 3 {
            return Err(InvalidLength(length).into());
        }

        let (q, sophie) = safe_prime(rng, length);

        Ok(Self {
            length,
            q,
            g: sophie,
            G: BigUint::from(2u32),
        })
    }

    /// Draws a key below q, redrawing until it is coprime to q-1 so the
    /// exponent can be inverted during share extraction.
    pub fn generate_private_key<R>(&self, rng: &mut R) -> BigUint
    where
        R: CryptoRng + RngCore,
    {
        let exponent_modulus = &self.q - 1u32;
        let mut key = random_below(rng, &self.q);
        while !key.gcd(&exponent_modulus).is_one() {
            key = random_below(rng, &self.q);
        }

        key
    }

    pub fn public_key(&self, private_key: &BigUint) -> BigUint {
        self.G.modpow(private_key, &self.q)
    }

    /// Checks that the encrypted shares in a distribution bundle are mutually
    /// consistent with the polynomial commitments. One hash binds every
    /// participant to the single stored challenge, so any inconsistent share
    /// fails the whole bundle without revealing which share was bad.
    pub fn verify_distribution(&self, bundle: &DistributionBundle) -> bool {
        let exponent_modulus = &self.q - 1u32;
        let mut hasher = Sha256::new();

        for key in &bundle.public_keys {
            let (Some(position), Some(response), Some(share)) = (
                bundle.positions.get(key),
                bundle.responses.get(key),
                bundle.shares.get(key),
            ) else {
                return false;
            };
            let position = BigUint::from(*position);

            // X_i = prod C_j^(i^j), the committed polynomial evaluated in the
            // exponent, with the running power of i reduced mod q-1
            let mut x = BigUint::one();
            let mut exponent = BigUint::one();
            for commitment in &bundle.commitments {
                x = x * commitment.modpow(&exponent, &self.q) % &self.q;
                exponent = exponent * &position % &exponent_modulus;
            }

            let a1 =
                self.g.modpow(response, &self.q) * x.modpow(&bundle.challenge, &self.q) % &self.q;
            let a2 =
                key.modpow(response, &self.q) * share.modpow(&bundle.challenge, &self.q) % &self.q;

            absorb_uint(&mut hasher, &x);
            absorb_uint(&mut hasher, share);
            absorb_uint(&mut hasher, &a1);
            absorb_uint(&mut hasher, &a2);
        }

        challenge_from_transcript(hasher, &exponent_modulus) == bundle.challenge
    }

    /// Checks a participant's claim that `share` is the correct decryption of
    /// its encrypted share in the distribution bundle.
    pub fn verify_share(
        &self,
        bundle: &ShareBundle,
        distribution: &DistributionBundle,
        public_key: &BigUint,
    ) -> bool {
        match distribution.shares.get(public_key) {
            Some(encrypted_share) => self.verify_share_against(bundle, encrypted_share),
            None => false,
        }
    }

    pub fn verify_share_against(&self, bundle: &ShareBundle, encrypted_share: &BigUint) -> bool {
        let a1 = self.G.modpow(&bundle.response, &self.q)
            * bundle.public_key.modpow(&bundle.challenge, &self.q)
            % &self.q;
        let a2 = bundle.share.modpow(&bundle.response, &self.q)
            * encrypted_share.modpow(&bundle.challenge, &self.q)
            % &self.q;

        let mut hasher = Sha256::new();
        absorb_uint(&mut hasher, &bundle.public_key);
        absorb_uint(&mut hasher, encrypted_share);
        absorb_uint(&mut hasher, &a1);
        absorb_uint(&mut hasher, &a2);

        challenge_from_transcript(hasher, &(&self.q - 1u32)) == bundle.challenge
    }

    /// Recovers the secret from at least t decrypted shares by Lagrange
    /// interpolation in the exponent, then unmasks it with the hash of the
    /// interpolated group element.
    pub fn reconstruct(
        &self,
        share_bundles: &[ShareBundle],
        distribution: &DistributionBundle,
    ) -> Result<Reconstruction> {
        let shares = self.collect_shares(share_bundles, distribution)?;
        let positions: Vec<usize> = shares.keys().copied().collect();

        let mut accumulator = BigUint::one();
        let mut defects = Vec::new();

        for (position, share) in &shares {
            let (factor, defect) = self.share_factor(*position, share, &positions);
            accumulator = accumulator * factor % &self.q;
            if let Some(cause) = defect {
                defects.push(ReconstructionDefect {
                    position: *position,
                    cause,
                });
            }
        }

        Ok(Reconstruction {
            secret: self.unmask(&accumulator, &distribution.U),
            defects,
        })
    }

    /// Same contract as `reconstruct`, with the per-share work spread over a
    /// dedicated pool of `workers` threads. Only the multiply into the
    /// accumulator and the defect list are serialized.
    pub fn reconstruct_parallel(
        &self,
        share_bundles: &[ShareBundle],
        distribution: &DistributionBundle,
        workers: usize,
    ) -> Result<Reconstruction> {
        let shares = self.collect_shares(share_bundles, distribution)?;
        let positions: Vec<usize> = shares.keys().copied().collect();
        let shares: Vec<(usize, BigUint)> = shares.into_iter().collect();

        // num_threads(0) would mean "let rayon decide", not an explicit budget
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .build()?;

        let accumulator = Mutex::new((BigUint::one(), Vec::new()));
        pool.install(|| {
            shares.par_iter().for_each(|(position, share)| {
                let (factor, defect) = self.share_factor(*position, share, &positions);

                let mut guard = accumulator.lock().unwrap_or_else(PoisonError::into_inner);
                guard.0 = &guard.0 * factor % &self.q;
                if let Some(cause) = defect {
                    guard.1.push(ReconstructionDefect {
                        position: *position,
                        cause,
                    });
                }
            });
        });

        let (accumulated, mut defects) = accumulator
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        defects.sort_by_key(|defect| defect.position);

        Ok(Reconstruction {
            secret: self.unmask(&accumulated, &distribution.U),
            defects,
        })
    }

    fn collect_shares(
        &self,
        share_bundles: &[ShareBundle],
        distribution: &DistributionBundle,
    ) -> Result<BTreeMap<usize, BigUint>> {
        if share_bundles.len() < distribution.commitments.len() {
            return Err(
                InsufficientShares(share_bundles.len(), distribution.commitments.len()).into(),
            );
        }

        let mut shares = BTreeMap::new();
        for bundle in share_bundles {
            match distribution.positions.get(&bundle.public_key) {
                Some(position) => shares.insert(*position, bundle.share.clone()),
                None => return Err(UnknownPublicKey(bundle.public_key.to_string()).into()),
            };
        }

        Ok(shares)
    }

    // One share's multiplicative contribution to the reconstruction product.
    // A coefficient that cannot be applied contributes 1 and reports why.
    fn share_factor(
        &self,
        position: usize,
        share: &BigUint,
        positions: &[usize],
    ) -> (BigUint, Option<DefectCause>) {
        let exponent_modulus = &self.q - 1u32;
        let (numerator, denominator) = lagrange_coefficient(position, positions);
        let negative = (&numerator * &denominator).is_negative();
        let numerator = numerator.magnitude();
        let denominator = denominator.magnitude();

        let exponent = if numerator.is_multiple_of(denominator) {
            numerator / denominator
        } else {
            let gcd = numerator.gcd(denominator);
            let numerator = numerator / &gcd;
            let denominator = denominator / &gcd;
            match denominator.modinv(&exponent_modulus) {
                Some(inverse) => numerator * inverse % &exponent_modulus,
                None => {
                    error!(
                        "denominator of the Lagrange coefficient for position {position} has no inverse mod q-1, skipping share"
                    );
                    return (BigUint::one(), Some(DefectCause::DenominatorNotInvertible));
                }
            }
        };

        let factor = share.modpow(&exponent, &self.q);
        if !negative {
            return (factor, None);
        }

        // negative coefficient: S^(-lambda) = 1 / S^lambda
        match factor.modinv(&self.q) {
            Some(inverse) => (inverse, None),
            None => {
                error!(
                    "share factor for position {position} is negative and has no inverse mod q, skipping share"
                );
                (BigUint::one(), Some(DefectCause::FactorNotInvertible))
            }
        }
    }

    // sigma = H(G^s) XOR U, where the accumulator carries G^s
    fn unmask(&self, accumulator: &BigUint, mask: &BigUint) -> BigUint {
        let mut hasher = Sha256::new();
        absorb_uint(&mut hasher, accumulator);

        challenge_from_transcript(hasher, &self.q) ^ mask
    }
}

impl Default for PvssInstance {
    /// The 2048-bit safe prime group from RFC 3526, with `2` generating key
    /// pairs and the Sophie Germain prime as commitment generator.
    fn default() -> Self {
        let q = BigUint::parse_bytes(RFC3526_MODP_2048, 10).expect("RFC 3526 modulus parses");
        let g = (&q - 1u32) / 2u32;

        Self {
            length: 2048,
            q,
            g,
            G: BigUint::from(2u32),
        }
    }
}
