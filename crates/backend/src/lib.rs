//! Kernel dispatch primitives for the sha256-90r workspace.
//!
//! Kernels are registered as an ordered list of [`Candidate`]s, best first.
//! [`select`] picks the first candidate whose capability requirements are
//! satisfied by the detected CPU; [`OnceCache`] caches the resolution so a
//! process pays for selection exactly once.
//!
//! ```ignore
//! use backend::{Candidate, OnceCache, Selected, select};
//!
//! static ACTIVE: OnceCache<Selected<TransformFn>> = OnceCache::new();
//!
//! fn active() -> Selected<TransformFn> {
//!     ACTIVE.get_or_init(|| select(platform::caps(), &[
//!         Candidate::new("x86_64/sha-ext", x86::SHA_EXT_READY, sha_ext_kernel),
//!         Candidate::new("portable", Caps::NONE, portable_kernel),
//!     ]))
//! }
//! ```
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod cache;
mod dispatch;

pub use cache::OnceCache;
pub use dispatch::{Candidate, Selected, select};
