#![warn(missing_docs)]

//! Identifier space of the simulation: the set of integers modulo 2^m
//! together with a strategy for drawing fresh identifiers from it.
//!
//! Two derivations are supported. `UniformRandom` samples an integer
//! uniformly below 2^m. `HashOfEndpoint` mirrors the convention of real
//! Chord deployments: it synthesizes a random `ip:port` endpoint and
//! keeps the first m bits of its SHA-1 digest.
//!
//! Orthogonally to the derivation, identifiers can be drawn from OS
//! entropy (the default), from a seeded [Hc128Rng] when a run must be
//! reproducible, or replayed cyclically from a fixed list (fixtures).
//! None of the strategies guarantees uniqueness; the ring insertion
//! path is responsible for rejecting collisions.

use std::collections::VecDeque;
use std::sync::Mutex;

use num_bigint::BigUint;
use num_bigint::RandBigInt;
use rand::Rng;
use rand::SeedableRng;
use rand_hc::Hc128Rng;
use serde::Deserialize;
use serde::Serialize;
use sha1::Digest;
use sha1::Sha1;

use super::Id;
use crate::error::Error;
use crate::error::Result;

/// Bit width of a SHA-1 digest.
const SHA1_BITS: u32 = 160;

/// How fresh identifiers are derived from randomness.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpaceKind {
    /// Uniform sample from [0, 2^m).
    UniformRandom,
    /// First m bits of the SHA-1 digest of a synthetic `ip:port` seed.
    HashOfEndpoint,
}

enum Sampler {
    /// Fresh OS entropy on every draw.
    Entropy,
    /// Reproducible stream from a seeded generator.
    Seeded(Mutex<Hc128Rng>),
    /// Cyclic replay of a fixed identifier list.
    Replay(Mutex<VecDeque<Id>>),
}

/// The circular identifier space of width 2^m.
///
/// Stateless apart from the width parameter and the sampling strategy;
/// safe to share across concurrent query units.
pub struct IdSpace {
    bit_len: u32,
    width: BigUint,
    kind: SpaceKind,
    sampler: Sampler,
}

impl IdSpace {
    /// Space of width 2^m drawing identifiers from OS entropy.
    /// An entropy source failure aborts the process.
    pub fn new(kind: SpaceKind, bit_len: u32) -> Result<Self> {
        Self::build(kind, bit_len, Sampler::Entropy)
    }

    /// Space of width 2^m with a reproducible identifier stream.
    pub fn new_seeded(kind: SpaceKind, bit_len: u32, seed: u64) -> Result<Self> {
        let rng = Hc128Rng::seed_from_u64(seed);
        Self::build(kind, bit_len, Sampler::Seeded(Mutex::new(rng)))
    }

    /// Space of width 2^m replaying `ids` cyclically. Intended for
    /// fixtures that need full control over ring membership.
    pub fn replay(bit_len: u32, ids: impl IntoIterator<Item = Id>) -> Result<Self> {
        let ids: VecDeque<Id> = ids.into_iter().collect();
        assert!(!ids.is_empty(), "replay space needs at least one identifier");
        Self::build(SpaceKind::UniformRandom, bit_len, Sampler::Replay(Mutex::new(ids)))
    }

    fn build(kind: SpaceKind, bit_len: u32, sampler: Sampler) -> Result<Self> {
        if bit_len == 0 {
            return Err(Error::BitLengthZero);
        }
        Ok(Self {
            bit_len,
            width: BigUint::from(2u16).pow(bit_len),
            kind,
            sampler,
        })
    }

    /// Number of bits of the identifiers, m.
    pub fn bit_length(&self) -> u32 {
        self.bit_len
    }

    /// Number of positions on the ring, 2^m.
    pub fn width(&self) -> &BigUint {
        &self.width
    }

    /// The identifier derivation of this space.
    pub fn kind(&self) -> SpaceKind {
        self.kind
    }

    /// Draw a fresh identifier. Repeated draws are independent with
    /// high probability but uniqueness is not guaranteed.
    pub fn random(&self) -> Id {
        match &self.sampler {
            Sampler::Entropy => self.sample(&mut rand::thread_rng()),
            Sampler::Seeded(rng) => {
                let mut rng = rng.lock().expect("seeded sampler lock");
                self.sample(&mut *rng)
            }
            Sampler::Replay(ids) => {
                let mut ids = ids.lock().expect("replay sampler lock");
                let id = ids.pop_front().expect("replay space is never empty");
                ids.push_back(id.clone());
                id
            }
        }
    }

    /// Finger target i of `id`: (id + 2^i) mod 2^m, for i in [0, m).
    pub fn finger_target(&self, id: &Id, i: u32) -> Id {
        debug_assert!(i < self.bit_len);
        let offset = BigUint::from(2u16).pow(i);
        Id::from((&**id + offset) % &self.width)
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> Id {
        match self.kind {
            SpaceKind::UniformRandom => Id::from(rng.gen_biguint_below(&self.width)),
            SpaceKind::HashOfEndpoint => {
                let octets: [u8; 4] = rng.gen();
                let port: u16 = rng.gen();
                let endpoint = format!(
                    "{}.{}.{}.{}:{}",
                    octets[0], octets[1], octets[2], octets[3], port
                );
                self.digest_to_id(endpoint.as_bytes())
            }
        }
    }

    /// First m bits of the SHA-1 digest of `seed`, reduced mod 2^m for
    /// spaces wider than the digest.
    fn digest_to_id(&self, seed: &[u8]) -> Id {
        let mut hasher = Sha1::new();
        hasher.update(seed);
        let digest = BigUint::from_bytes_be(&hasher.finalize());
        if self.bit_len < SHA1_BITS {
            Id::from(digest >> (SHA1_BITS - self.bit_len))
        } else {
            Id::from(digest % &self.width)
        }
    }
}
