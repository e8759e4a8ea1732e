//! CPU capability detection for the sha256-90r workspace.
//!
//! This crate is the single source of truth for CPU feature detection.
//! Kernel dispatch asks one question here: "what instructions can I legally
//! run on this machine?"
//!
//! # Design
//!
//! 1. **One API**: kernels query [`caps()`] instead of doing ad-hoc detection.
//! 2. **Zero-cost when possible**: compile-time target features are folded in
//!    via `cfg!`.
//! 3. **Cached otherwise**: runtime detection runs once per process and is
//!    cached; subsequent calls are plain reads. Detection is idempotent and
//!    convergent, so concurrent first calls are harmless.
//! 4. **Miri-safe**: under Miri, always returns portable-only caps.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

pub use caps::Caps;

/// Get detected CPU capabilities.
///
/// This is the main entry point for capability-based dispatch.
///
/// # Caching
///
/// - With `std`: results are cached after one-time detection.
/// - Without `std`: compile-time target features only (no runtime probing).
#[inline]
#[must_use]
pub fn caps() -> Caps {
  detect::caps()
}

/// Set or clear a capabilities override.
///
/// When set, [`caps()`] returns the override instead of detecting. This is a
/// test hook for forcing specific dispatch paths; call it early, before the
/// code under test queries capabilities.
#[inline]
pub fn set_caps_override(value: Option<Caps>) {
  detect::set_caps_override(value);
}

/// Check if an override is currently set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  detect::has_override()
}
