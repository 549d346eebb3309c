//! Recovery utilities for store errors

use super::types::{RecoveryHint, StoreError};
use chainstore_common::FailureCode;

impl StoreError {
    /// Get the recovery hint for this error
    #[must_use]
    pub const fn recovery_hint(&self) -> &RecoveryHint {
        match self {
            Self::UnknownCache { recovery_hint, .. }
            | Self::CacheAlreadyExists { recovery_hint, .. }
            | Self::Decode { recovery_hint, .. }
            | Self::Encode { recovery_hint, .. }
            | Self::MessageTooLarge { recovery_hint, .. }
            | Self::Configuration { recovery_hint, .. }
            | Self::Io { recovery_hint, .. }
            | Self::Serialization { recovery_hint, .. } => recovery_hint,
        }
    }

    /// Errors caused by what the peer sent, recoverable per message
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownCache { .. } | Self::Decode { .. } | Self::MessageTooLarge { .. }
        )
    }

    /// Check if this error is transient and the same request may succeed later
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self.recovery_hint(), RecoveryHint::CreateCache { .. })
    }

    /// The failure code reported to the client when this error ends a request
    #[must_use]
    pub const fn failure_code(&self) -> FailureCode {
        match self {
            Self::UnknownCache { .. } => FailureCode::UnknownCache,
            Self::Decode { .. } => FailureCode::MalformedMessage,
            Self::MessageTooLarge { .. } => FailureCode::MessageTooLarge,
            _ => FailureCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainstore_common::{CacheId, DecodeError};

    #[test]
    fn test_unknown_cache_is_transient_client_error() {
        let cache_id = CacheId::new("users");
        let error = StoreError::UnknownCache {
            cache_id: cache_id.clone(),
            recovery_hint: RecoveryHint::CreateCache { cache_id },
        };
        assert!(error.is_client_error());
        assert!(error.is_transient());
        assert_eq!(error.failure_code(), FailureCode::UnknownCache);
    }

    #[test]
    fn test_decode_error_maps_to_malformed() {
        let error = StoreError::from(DecodeError::TrailingBytes { remaining: 2 });
        assert!(error.is_client_error());
        assert!(!error.is_transient());
        assert_eq!(error.failure_code(), FailureCode::MalformedMessage);
        assert_eq!(error.recovery_hint(), &RecoveryHint::DiscardMessage);
    }

    #[test]
    fn test_encode_error_is_internal_with_source() {
        let error = StoreError::from(chainstore_common::EncodeError::FieldTooLarge {
            field: "payload",
            len: usize::MAX,
            max: u64::from(u32::MAX),
        });
        assert!(!error.is_client_error());
        assert_eq!(error.failure_code(), FailureCode::Internal);
        assert!(std::error::Error::source(&error).is_some());
        assert!(error.to_string().starts_with("Failed to encode message"));
    }

    #[test]
    fn test_configuration_error_is_internal() {
        let error = StoreError::Configuration {
            message: "bad".to_string(),
            recovery_hint: RecoveryHint::UpdateConfiguration,
        };
        assert!(!error.is_client_error());
        assert_eq!(error.failure_code(), FailureCode::Internal);
    }
}
