//! Replies produced by the server for each applied operation

use crate::chain::Chain;
use serde::Serialize;
use std::fmt;

/// Reason attached to a [`StoreResponse::Failure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FailureCode {
    /// The message named a cache with no registered store
    UnknownCache = 1,
    /// The message bytes could not be decoded
    MalformedMessage = 2,
    /// The message exceeded the configured size limit
    MessageTooLarge = 3,
    /// The server could not produce a reply
    Internal = 4,
}

impl FailureCode {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::UnknownCache),
            2 => Some(Self::MalformedMessage),
            3 => Some(Self::MessageTooLarge),
            4 => Some(Self::Internal),
            _ => None,
        }
    }
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::UnknownCache => "unknown cache",
            Self::MalformedMessage => "malformed message",
            Self::MessageTooLarge => "message too large",
            Self::Internal => "internal error",
        };
        f.write_str(label)
    }
}

/// Outcome of one operation as seen by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "response", rename_all = "snake_case")]
pub enum StoreResponse {
    /// The operation was applied (Append, successful ReplaceAtHead, Clear)
    Success,
    /// A chain snapshot: the current chain for Get, the pre-append chain for GetAndAppend
    Chain { chain: Chain },
    /// ReplaceAtHead found a chain different from the expected one; nothing changed
    CasConflict,
    /// The operation was not applied
    Failure { code: FailureCode, message: String },
}

impl StoreResponse {
    pub fn chain(chain: Chain) -> Self {
        Self::Chain { chain }
    }

    pub fn failure(code: FailureCode, message: impl Into<String>) -> Self {
        Self::Failure {
            code,
            message: message.into(),
        }
    }

    pub fn into_chain(self) -> Option<Chain> {
        match self {
            Self::Chain { chain } => Some(chain),
            _ => None,
        }
    }
}
