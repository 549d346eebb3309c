//! Operation messages exchanged between store clients and the server
//!
//! Operations form a closed set. Each variant carries the [`CacheId`] it
//! targets; every variant except [`ServerStoreOp::Clear`] also names a
//! [`Key`]. The numeric [`OperationKind`] discriminators are part of the
//! wire protocol and must never be renumbered.

use crate::chain::Chain;
use crate::payload::Payload;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Slot identifier within a cache
pub type Key = i64;

/// Name of the logical cache an operation targets
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheId(Arc<str>);

impl CacheId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CacheId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl Serialize for CacheId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl AsRef<str> for CacheId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Wire discriminator for each operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum OperationKind {
    Append = 0x01,
    Get = 0x02,
    GetAndAppend = 0x03,
    ReplaceAtHead = 0x04,
    Clear = 0x05,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::Append,
        OperationKind::Get,
        OperationKind::GetAndAppend,
        OperationKind::ReplaceAtHead,
        OperationKind::Clear,
    ];

    pub const fn discriminator(self) -> u8 {
        self as u8
    }

    pub const fn from_discriminator(tag: u8) -> Option<Self> {
        match tag {
            0x01 => Some(Self::Append),
            0x02 => Some(Self::Get),
            0x03 => Some(Self::GetAndAppend),
            0x04 => Some(Self::ReplaceAtHead),
            0x05 => Some(Self::Clear),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Get => "get",
            Self::GetAndAppend => "get_and_append",
            Self::ReplaceAtHead => "replace_at_head",
            Self::Clear => "clear",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single store operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ServerStoreOp {
    /// Append `payload` as the new tail of the key's chain
    Append {
        cache_id: CacheId,
        key: Key,
        payload: Payload,
    },
    /// Read the key's current chain
    Get { cache_id: CacheId, key: Key },
    /// Read the key's current chain, then append `payload`, as one step
    GetAndAppend {
        cache_id: CacheId,
        key: Key,
        payload: Payload,
    },
    /// Swap the key's chain for `update` if it still equals `expect`
    ///
    /// `expect` should be a chain the client previously observed through
    /// `Get` or `GetAndAppend`.
    ReplaceAtHead {
        cache_id: CacheId,
        key: Key,
        expect: Chain,
        update: Chain,
    },
    /// Drop every chain held by the cache
    Clear { cache_id: CacheId },
}

impl ServerStoreOp {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Append { .. } => OperationKind::Append,
            Self::Get { .. } => OperationKind::Get,
            Self::GetAndAppend { .. } => OperationKind::GetAndAppend,
            Self::ReplaceAtHead { .. } => OperationKind::ReplaceAtHead,
            Self::Clear { .. } => OperationKind::Clear,
        }
    }

    pub fn cache_id(&self) -> &CacheId {
        match self {
            Self::Append { cache_id, .. }
            | Self::Get { cache_id, .. }
            | Self::GetAndAppend { cache_id, .. }
            | Self::ReplaceAtHead { cache_id, .. }
            | Self::Clear { cache_id } => cache_id,
        }
    }

    /// The targeted key, `None` for cache-wide operations
    pub fn key(&self) -> Option<Key> {
        match self {
            Self::Append { key, .. }
            | Self::Get { key, .. }
            | Self::GetAndAppend { key, .. }
            | Self::ReplaceAtHead { key, .. } => Some(*key),
            Self::Clear { .. } => None,
        }
    }

    /// The single payload carried by append-style operations
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Self::Append { payload, .. } | Self::GetAndAppend { payload, .. } => Some(payload),
            _ => None,
        }
    }
}
