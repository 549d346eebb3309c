//! Display implementations for store errors

use super::types::StoreError;
use std::fmt;

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCache { cache_id, .. } => {
                write!(f, "No store registered for cache '{cache_id}'")
            }
            Self::CacheAlreadyExists { cache_id, .. } => {
                write!(f, "A store for cache '{cache_id}' already exists")
            }
            Self::Decode { source, .. } => write!(f, "Failed to decode message: {source}"),
            Self::Encode { source, .. } => write!(f, "Failed to encode message: {source}"),
            Self::MessageTooLarge { size, limit, .. } => write!(
                f,
                "Message of {size} bytes exceeds the {limit} byte limit"
            ),
            Self::Configuration { message, .. } => {
                write!(f, "Store configuration error: {message}")
            }
            Self::Io {
                path,
                operation,
                source,
                ..
            } => write!(
                f,
                "I/O error during {} on '{}': {}",
                operation,
                path.display(),
                source
            ),
            Self::Serialization { path, source, .. } => write!(
                f,
                "Failed to parse configuration '{}': {}",
                path.display(),
                source
            ),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            Self::Encode { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}
