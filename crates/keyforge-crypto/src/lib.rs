//! Cryptographic primitives for keyforge.
//!
//! The BLAKE2b implementation is from scratch; reference crates (blake2)
//! are dev-dependencies only.

#![forbid(unsafe_code)]

pub mod blake2b;
pub mod secure;

pub use blake2b::Blake2b;
pub use secure::SecretBytes;
