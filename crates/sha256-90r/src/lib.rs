//! SHA256-90R: an extended-round SHA-256 variant.
//!
//! Same wire format as SHA-256 — 64-byte blocks, 32-byte big-endian digest,
//! Merkle–Damgård padding — but the compression function runs 90 rounds over
//! a 90-word message schedule and constant table. The crate provides:
//!
//! - A streaming context ([`Sha256_90r`]) with a constant-time Secure mode
//!   (arithmetic-masked buffer and padding logic) and batched Accel/Fast
//!   modes.
//! - Capability-dispatched kernels: portable scalar, vectorized message
//!   expansion (SSE4.1/NEON), a SHA-NI hybrid, a 90-stage pipeline
//!   behavioral model, and a runtime-specializing dispatcher.
//! - Merkle tree hashing across a worker pool, plus a streaming tree hasher.
//!
//! # Quick start
//!
//! ```
//! use sha256_90r::{Mode, Sha256_90r};
//!
//! // One-shot (Secure mode).
//! let digest = sha256_90r::hash(b"abc");
//!
//! // Streaming.
//! let mut h = Sha256_90r::with_mode(Mode::Fast);
//! h.update(b"ab");
//! h.update(b"c");
//! assert_eq!(h.finalize(), digest);
//! ```
//!
//! Digests are bit-identical across every mode and backend; the mode only
//! changes the timing/side-channel posture, never the math.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod consts;
mod ct;
mod dispatch;
pub mod fpga;
mod hasher;
mod jit;
pub mod kernels;
#[cfg(feature = "std")]
pub mod parallel;
mod selftest;

pub use dispatch::{Backend, Mode, backend_available, backend_performance_estimate};
pub use hasher::Sha256_90r;
pub use jit::specialized_kernel_name;
pub use selftest::{KAT_DIGEST, KAT_INPUT, init, selftest};
pub use traits::{Digest, SelfTestError};

/// One-shot Secure-mode digest.
#[must_use]
pub fn hash(data: &[u8]) -> [u8; 32] {
  Sha256_90r::digest(data)
}

/// One-shot digest with an explicit mode.
#[must_use]
pub fn hash_with_mode(data: &[u8], mode: Mode) -> [u8; 32] {
  let mut h = Sha256_90r::with_mode(mode);
  h.update(data);
  h.finalize()
}

/// Digest a batch of messages sequentially.
///
/// No parallelism is implied; use [`parallel::tree_hash`] for pooled
/// hashing of one large input.
#[cfg(feature = "std")]
#[must_use]
pub fn batch(messages: &[&[u8]], mode: Mode) -> std::vec::Vec<[u8; 32]> {
  messages.iter().map(|msg| hash_with_mode(msg, mode)).collect()
}

/// Library version string.
#[must_use]
pub fn version() -> &'static str {
  env!("CARGO_PKG_VERSION")
}
