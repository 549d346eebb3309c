//! Command line front end for chainstore
//!
//! `encode` builds a message from flags and prints its wire bytes as hex,
//! `decode` turns hex back into JSON and `replay` feeds a file of encoded
//! messages through an in-process store service.

pub mod commands;
pub mod input;

pub use commands::Commands;
