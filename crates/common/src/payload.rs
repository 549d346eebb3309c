//! Opaque binary values carried by chain elements and append operations

use bytes::Bytes;
use serde::{Serialize, Serializer};
use std::fmt;

/// Number of bytes shown by the `Debug` rendering before eliding the rest
const DEBUG_PREVIEW_BYTES: usize = 16;

/// An immutable, cheaply cloneable byte value.
///
/// The store never looks inside a payload. Clients serialize their own value
/// type into payload bytes and read it back out of returned chains.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Payload(Bytes);

impl Payload {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn empty() -> Self {
        Self(Bytes::new())
    }

    /// Encode a long as an 8-byte big-endian payload
    pub fn from_i64(value: i64) -> Self {
        Self(Bytes::copy_from_slice(&value.to_be_bytes()))
    }

    /// Read back a payload written by [`Payload::from_i64`]
    ///
    /// Returns `None` unless the payload is exactly eight bytes long.
    pub fn to_i64(&self) -> Option<i64> {
        let raw: [u8; 8] = self.as_bytes().try_into().ok()?;
        Some(i64::from_be_bytes(raw))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(bytes))
    }
}

impl From<&'static str> for Payload {
    fn from(text: &'static str) -> Self {
        Self(Bytes::from_static(text.as_bytes()))
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() <= DEBUG_PREVIEW_BYTES {
            write!(f, "Payload({})", hex::encode(&self.0))
        } else {
            write!(
                f,
                "Payload({}.. {} bytes)",
                hex::encode(&self.0[..DEBUG_PREVIEW_BYTES]),
                self.0.len()
            )
        }
    }
}

// Rendered as a hex string so decoded messages can be dumped as JSON
impl Serialize for Payload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}
