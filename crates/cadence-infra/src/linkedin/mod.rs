//! LinkedIn platform integration.

mod client;

pub use client::{LinkedinClient, LinkedinConfig};
