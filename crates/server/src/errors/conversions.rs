//! Error conversion utilities

use super::types::{RecoveryHint, StoreError};
use chainstore_common::{DecodeError, EncodeError};

impl From<DecodeError> for StoreError {
    fn from(error: DecodeError) -> Self {
        Self::Decode {
            source: error,
            recovery_hint: RecoveryHint::DiscardMessage,
        }
    }
}

impl From<EncodeError> for StoreError {
    fn from(error: EncodeError) -> Self {
        Self::Encode {
            source: error,
            recovery_hint: RecoveryHint::Manual {
                instructions: "Build messages through MessageFactory and keep fields under 4 GiB"
                    .to_string(),
            },
        }
    }
}
