//! Digest traits and shared error types for the sha256-90r workspace.
//!
//! The [`Digest`] trait is the streaming contract every hasher in this
//! workspace implements: incremental updates, idempotent finalize, and
//! reset support.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod digest;
mod error;

pub use digest::Digest;
pub use error::SelfTestError;
