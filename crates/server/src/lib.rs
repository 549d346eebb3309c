//! Server side of chainstore
//!
//! A process owns one [`StoreRegistry`] holding a [`ServerStore`] per cache.
//! The [`ChainResolver`] applies decoded operations to those stores and the
//! [`StoreService`] wraps it with the wire codecs, so the hosting runtime
//! only ever passes whole messages in and gets whole replies back.
//!
//! Every operation on a single key is atomic: appends never lose elements,
//! and a replace-at-head either installs its update or reports a conflict
//! without touching the slot.

pub mod config;
pub mod errors;
pub mod registry;
pub mod resolver;
pub mod service;
pub mod store;

pub use config::{ConfigSource, LoadedConfig, ServerConfig, ServerConfigBuilder, ServerConfigLoader};
pub use errors::{RecoveryHint, Result, StoreError};
pub use registry::StoreRegistry;
pub use resolver::ChainResolver;
pub use service::{ServiceStats, StoreService};
pub use store::{ReplaceOutcome, ServerStore};
