//! Argon2 memory-hard key derivation (RFC 9106).
//!
//! Implements the Argon2d (data-dependent) and Argon2i
//! (data-independent) variants. The memory matrix is filled slice by
//! slice, with lane segments dispatched across a bounded worker pool;
//! the tag is independent of the thread count.

mod address;
mod block;
mod compress;
mod engine;
mod fill;
mod initialize;
mod memory;
mod reference;
mod segment;
mod varhash;

pub use engine::{derive, Argon2};
pub use keyforge_core::{Addressing, Error, Params, Result};
