//! The engine facade: configuration, input buffers, and the derivation
//! lifecycle.

#![forbid(unsafe_code)]

use crate::fill::fill_memory;
use crate::initialize::{prehash, seed_blocks};
use crate::memory::{Layout, Memory};
use crate::varhash::blake2b_long;
use keyforge_core::{Error, Params, Result};
use keyforge_crypto::SecretBytes;
use std::fmt;
use zeroize::Zeroize;

/// Argon2 key-derivation engine (RFC 9106, Argon2d and Argon2i).
///
/// Owns the secret, salt, and associated data for its lifetime; all are
/// wiped on drop. Message bytes accumulate through [`Argon2::update`]
/// and are consumed by [`Argon2::finalize_into`].
pub struct Argon2 {
    params: Params,
    secret: SecretBytes,
    salt: SecretBytes,
    associated_data: SecretBytes,
    message: SecretBytes,
}

impl Argon2 {
    /// Create an engine. The salt must be at least 8 bytes; the secret
    /// and associated data may be empty.
    pub fn new(
        params: Params,
        secret: &[u8],
        salt: &[u8],
        associated_data: &[u8],
    ) -> Result<Self> {
        if salt.len() < Params::MIN_SALT_LENGTH {
            return Err(Error::SaltTooShort {
                got: salt.len(),
                min: Params::MIN_SALT_LENGTH,
            });
        }

        Ok(Self {
            params,
            secret: SecretBytes::from_slice(secret),
            salt: SecretBytes::from_slice(salt),
            associated_data: SecretBytes::from_slice(associated_data),
            message: SecretBytes::new(),
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Replace the cost parameters; validated on the next run. The
    /// secret, salt, and associated data are kept.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// Append message bytes.
    pub fn update(&mut self, data: &[u8]) {
        self.message.extend_from_slice(data);
    }

    /// Discard accumulated message bytes, keeping the configuration and
    /// the input buffers.
    pub fn reset(&mut self) {
        self.message.clear();
    }

    /// Run the derivation and write the tag into `out[..hash_length]`.
    ///
    /// Bytes past the tag are left untouched. The message accumulator
    /// is cleared afterwards, so consecutive runs hash independent
    /// messages; the arena is allocated per run and wiped when the run
    /// ends.
    pub fn finalize_into(&mut self, out: &mut [u8]) -> Result<()> {
        self.params.validate()?;
        let hash_length = self.params.hash_length();
        if out.len() < hash_length {
            return Err(Error::OutputTooSmall {
                got: out.len(),
                need: hash_length,
            });
        }

        let layout = Layout::new(&self.params);
        let mut memory = Memory::new(&layout);

        let mut h0 = prehash(
            &self.params,
            self.message.as_bytes(),
            self.salt.as_bytes(),
            self.secret.as_bytes(),
            self.associated_data.as_bytes(),
        );
        seed_blocks(&h0, &layout, &mut memory);
        h0.zeroize();

        fill_memory(&self.params, layout, &mut memory)?;
        extract_tag(&layout, &memory, &mut out[..hash_length]);

        self.message.clear();
        Ok(())
    }

    /// Run the derivation and return the tag.
    pub fn finalize(&mut self) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.params.hash_length()];
        self.finalize_into(&mut out)?;
        Ok(out)
    }
}

impl fmt::Debug for Argon2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argon2")
            .field("params", &self.params)
            .field("secret", &"<redacted>")
            .field("salt", &"<redacted>")
            .field("associated_data", &"<redacted>")
            .field("message", &"<redacted>")
            .finish()
    }
}

/// XOR the last block of every lane and extract the tag through H'.
fn extract_tag(layout: &Layout, memory: &Memory, out: &mut [u8]) {
    let blocks = memory.blocks();
    let mut acc = blocks[layout.index(0, layout.lane_length - 1)].clone();
    for lane in 1..layout.lanes {
        acc ^= &blocks[layout.index(lane, layout.lane_length - 1)];
    }

    let mut serialized = acc.store();
    blake2b_long(&serialized, out);
    serialized.zeroize();
    acc.zeroize();
}

/// One-shot derivation with the same validation as the engine.
pub fn derive(
    params: Params,
    secret: &[u8],
    salt: &[u8],
    associated_data: &[u8],
    message: &[u8],
    out: &mut [u8],
) -> Result<()> {
    let mut engine = Argon2::new(params, secret, salt, associated_data)?;
    engine.update(message);
    engine.finalize_into(out)
}
