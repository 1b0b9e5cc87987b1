//! Prime-field arithmetic and Karp-Rabin fingerprints.
//!
//! Everything the Breslauer-Galil engine hashes with lives here: a prime
//! field `Z_p` whose elements carry their multiplicative inverse alongside
//! the value, and rolling fingerprints over byte sequences with exact
//! prefix/suffix/concatenation composition.
//!
//! The field size `p` must stay below `2^32` so that a product of two
//! elements fits in a `u64` before reduction; every operation here relies on
//! that bound.

mod field;
mod fingerprint;

pub use field::{Field, FieldVal, Fp};
