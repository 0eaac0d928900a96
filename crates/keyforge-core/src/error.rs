use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("salt too short: got {got} bytes, minimum is {min}")]
    SaltTooShort { got: usize, min: usize },

    #[error("hash length {got} is below the minimum of {min} bytes")]
    HashLengthTooShort { got: usize, min: usize },

    #[error("lanes must be at least 1")]
    ZeroLanes,

    #[error("threads must be at least 1")]
    ZeroThreads,

    #[error("time cost must be at least 1 pass")]
    ZeroTimeCost,

    #[error("memory cost must be at least 1 KiB")]
    ZeroMemoryCost,

    #[error("output buffer too small: got {got} bytes, need {need}")]
    OutputTooSmall { got: usize, need: usize },

    #[error("worker pool unavailable: {0}")]
    WorkerPool(String),
}
