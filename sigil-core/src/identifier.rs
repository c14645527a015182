//! Local identifier generation
//!
//! Every identifier this service mints is a namespace plus a fixed-length
//! local name drawn from a lowercase-alphanumeric alphabet, so the result is
//! IRI-safe and resolvable under the service's own URN scheme.
//!
//! Three generation strategies exist, modeled as one tagged enum:
//!
//! - [`LocalId::random`]: a fresh code from a cryptographically strong RNG.
//!   No uniqueness check is performed against the store; with 36^12 possible
//!   codes the collision risk is accepted.
//! - [`LocalId::reproducible`]: a 32-bit checksum over the in-order
//!   concatenation of the seed parts, base-36 encoded and padded to the
//!   fixed length. Identical ordered seeds always yield the identical
//!   identifier, which is what makes blank-node resolution idempotent.
//! - [`LocalId::derived`]: a fingerprint of a prior identifier's local name,
//!   used when a foreign identifier is rewritten into the local namespace.

use crate::error::{Error, Result};
use crate::term::Iri;
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

/// Fixed length of every generated local name
pub const IDENTIFIER_LENGTH: usize = 12;

/// Alphabet for generated local names (IRI-safe)
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Padding character for checksum encodings shorter than the fixed length
const PAD: char = '-';

/// A locally minted identifier: namespace + fixed-length local name.
///
/// The variant records how the local name came to be; all variants share
/// the same length and alphabet contract.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocalId {
    /// Randomly generated, no reproducibility guarantee
    Random {
        /// Namespace the identifier resolves under
        namespace: Arc<str>,
        /// Fixed-length local name
        name: String,
    },
    /// Pure function of its seed content
    Reproducible {
        /// Namespace the identifier resolves under
        namespace: Arc<str>,
        /// Fixed-length local name
        name: String,
    },
    /// Fingerprint of a prior (foreign) identifier's local name
    Derived {
        /// Namespace the identifier resolves under
        namespace: Arc<str>,
        /// Fixed-length local name
        name: String,
    },
}

impl LocalId {
    /// Generate a random identifier in the given namespace.
    ///
    /// The local name is sampled from a cryptographically strong source.
    /// No collision check is made against any store.
    pub fn random(namespace: &str) -> Self {
        let mut rng = OsRng;
        let name = (0..IDENTIFIER_LENGTH)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        LocalId::Random {
            namespace: Arc::from(namespace),
            name,
        }
    }

    /// Generate a reproducible identifier from ordered seed parts.
    ///
    /// The parts are concatenated in the given order and checksummed;
    /// identical ordered seeds always produce the identical identifier.
    /// An empty seed list is a caller error.
    pub fn reproducible<S: AsRef<str>>(namespace: &str, seed_parts: &[S]) -> Result<Self> {
        if seed_parts.is_empty() {
            return Err(Error::EmptySeed);
        }
        let mut hasher = crc32fast::Hasher::new();
        for part in seed_parts {
            hasher.update(part.as_ref().as_bytes());
        }
        Ok(LocalId::Reproducible {
            namespace: Arc::from(namespace),
            name: fixed_width(encode_base36(hasher.finalize())),
        })
    }

    /// Derive an identifier from a prior identifier's local name.
    pub fn derived(namespace: &str, old_local_name: &str) -> Self {
        let digest = Sha256::digest(old_local_name.as_bytes());
        let mut name = hex::encode(digest);
        name.truncate(IDENTIFIER_LENGTH);
        LocalId::Derived {
            namespace: Arc::from(namespace),
            name,
        }
    }

    /// The namespace this identifier resolves under
    pub fn namespace(&self) -> &str {
        match self {
            LocalId::Random { namespace, .. }
            | LocalId::Reproducible { namespace, .. }
            | LocalId::Derived { namespace, .. } => namespace,
        }
    }

    /// The fixed-length local name
    pub fn local_name(&self) -> &str {
        match self {
            LocalId::Random { name, .. }
            | LocalId::Reproducible { name, .. }
            | LocalId::Derived { name, .. } => name,
        }
    }

    /// The full IRI (namespace + local name)
    pub fn iri(&self) -> Iri {
        Iri::new(format!("{}{}", self.namespace(), self.local_name()))
    }

    /// True if the IRI conforms to a locally minted identifier in the given
    /// namespace (namespace match plus fixed-length local name).
    pub fn conforms(iri: &Iri, namespace: &str) -> bool {
        iri.as_str().len() == namespace.len() + IDENTIFIER_LENGTH
            && iri.as_str().starts_with(namespace)
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.namespace(), self.local_name())
    }
}

/// Encode an unsigned 32-bit value in the restricted alphabet
fn encode_base36(value: u32) -> String {
    let base = ALPHABET.len() as u64;
    let mut value = value as u64;
    let mut digits = Vec::new();
    loop {
        digits.push(ALPHABET[(value % base) as usize]);
        value /= base;
        if value == 0 {
            break;
        }
    }
    digits.reverse();
    // digits are ASCII by construction
    String::from_utf8(digits).expect("alphabet is ASCII")
}

/// Pad or truncate an encoding to the fixed identifier length
fn fixed_width(mut encoded: String) -> String {
    encoded.truncate(IDENTIFIER_LENGTH);
    while encoded.len() < IDENTIFIER_LENGTH {
        encoded.push(PAD);
    }
    encoded
}
