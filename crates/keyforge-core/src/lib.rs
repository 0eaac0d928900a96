//! Core types and cost parameters for the keyforge KDF engine.

#![forbid(unsafe_code)]

mod error;
mod params;

pub use error::Error;
pub use params::{Addressing, Params, SYNC_POINTS};

pub type Result<T> = std::result::Result<T, Error>;
