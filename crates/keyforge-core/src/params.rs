//! Cost parameters for the Argon2 engine.

#![forbid(unsafe_code)]

use crate::{Error, Result};

/// Number of synchronization points (slices) per lane.
pub const SYNC_POINTS: u32 = 4;

/// Memory addressing mode.
///
/// The numeric values are part of the algorithm: they enter the prehash
/// and the Argon2i address-block input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Addressing {
    /// Data-dependent addressing (faster, leaks memory access patterns)
    Argon2d = 0,
    /// Data-independent addressing (resists cache-timing attacks)
    Argon2i = 1,
}

impl Addressing {
    /// Wire value used in the prehash and address-block input.
    pub fn flag(self) -> u32 {
        self as u32
    }
}

/// Cost parameters: memory, time, and parallelism.
///
/// Built with chained setters, validated once when the engine runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
    addressing: Addressing,
    hash_length: usize,
    memory_cost: u32,
    time_cost: u32,
    lanes: u32,
    threads: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            addressing: Addressing::Argon2i,
            hash_length: Self::DEFAULT_HASH_LENGTH,
            memory_cost: Self::DEFAULT_MEMORY_COST,
            time_cost: Self::DEFAULT_TIME_COST,
            lanes: 1,
            threads: 1,
        }
    }
}

impl Params {
    /// Minimum tag length in bytes.
    pub const MIN_HASH_LENGTH: usize = 4;

    /// Minimum salt length in bytes.
    pub const MIN_SALT_LENGTH: usize = 8;

    /// Default tag length in bytes.
    pub const DEFAULT_HASH_LENGTH: usize = 32;

    /// Default memory cost in KiB (19 MiB, RFC 9106 low-memory recommendation).
    pub const DEFAULT_MEMORY_COST: u32 = 19 * 1024;

    /// Default number of passes.
    pub const DEFAULT_TIME_COST: u32 = 2;

    pub fn new() -> Self {
        Self::default()
    }

    /// Set the addressing mode.
    pub fn set_addressing(mut self, addressing: Addressing) -> Self {
        self.addressing = addressing;
        self
    }

    /// Set the tag length in bytes.
    pub fn set_hash_length(mut self, hash_length: usize) -> Self {
        self.hash_length = hash_length;
        self
    }

    /// Set the memory cost in KiB.
    pub fn set_memory_cost(mut self, memory_cost: u32) -> Self {
        self.memory_cost = memory_cost;
        self
    }

    /// Set the number of passes over memory.
    pub fn set_time_cost(mut self, time_cost: u32) -> Self {
        self.time_cost = time_cost;
        self
    }

    /// Set the number of lanes (degree of parallelism in the block matrix).
    pub fn set_lanes(mut self, lanes: u32) -> Self {
        self.lanes = lanes;
        self
    }

    /// Set the number of worker threads. Capped at `lanes` when the
    /// memory is filled; the tag does not depend on this value.
    pub fn set_threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }

    pub fn addressing(&self) -> Addressing {
        self.addressing
    }

    pub fn hash_length(&self) -> usize {
        self.hash_length
    }

    pub fn memory_cost(&self) -> u32 {
        self.memory_cost
    }

    pub fn time_cost(&self) -> u32 {
        self.time_cost
    }

    pub fn lanes(&self) -> u32 {
        self.lanes
    }

    pub fn threads(&self) -> u32 {
        self.threads
    }

    /// Memory cost raised to the minimum of `2 * SYNC_POINTS * lanes` KiB.
    ///
    /// This is the value used everywhere, including the prehash, so a
    /// below-minimum request hashes identically to the minimum.
    pub fn normalized_memory_cost(&self) -> u32 {
        self.memory_cost.max(2 * SYNC_POINTS * self.lanes)
    }

    /// Check every parameter the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.lanes == 0 {
            return Err(Error::ZeroLanes);
        }
        if self.threads == 0 {
            return Err(Error::ZeroThreads);
        }
        if self.time_cost == 0 {
            return Err(Error::ZeroTimeCost);
        }
        if self.memory_cost == 0 {
            return Err(Error::ZeroMemoryCost);
        }
        if self.hash_length < Self::MIN_HASH_LENGTH {
            return Err(Error::HashLengthTooShort {
                got: self.hash_length,
                min: Self::MIN_HASH_LENGTH,
            });
        }
        Ok(())
    }
}
