//! Tally SDK
//!
//! Wire objects exchanged with a Tally server, plus an optional HTTP client
//! (enable the `client` feature).

pub mod objects;

#[cfg(feature = "client")]
pub mod client;
