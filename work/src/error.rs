use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkError {
    #[error("mining cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },

    #[error("mining deadline exceeded after {attempts} attempts ({elapsed:?})")]
    DeadlineExceeded { attempts: u64, elapsed: Duration },

    #[error("no nonce in the u64 range satisfies difficulty {0}")]
    NonceSpaceExhausted(u8),

    #[error("invalid payload: {0}")]
    Payload(#[from] idseal_types::ValidationError),
}
