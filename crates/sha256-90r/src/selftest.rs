//! Known-answer self-test gate.
//!
//! Context creation fails closed: the first constructor call in a process
//! runs the KAT, and a mismatch aborts rather than letting a corrupt build
//! emit digests.

use backend::OnceCache;
use traits::SelfTestError;

use crate::{
  ct,
  dispatch::{Backend, Mode},
  hasher::Sha256_90r,
};

/// Canonical self-test input.
pub const KAT_INPUT: &[u8] = b"abc";

/// `hash("abc")` for the 90-round variant.
pub const KAT_DIGEST: [u8; 32] = [
  0xff, 0xe9, 0x37, 0x27, 0x5b, 0xf4, 0xfc, 0x7d, 0xf5, 0x31, 0x46, 0xd8, 0xcf, 0x72, 0x5a, 0x66, 0x08, 0x10,
  0x11, 0xab, 0xc2, 0xe6, 0x8b, 0xdb, 0xf1, 0xfc, 0xa3, 0xe3, 0x7d, 0x0b, 0x82, 0xaa,
];

/// Run the known-answer self-test.
///
/// Hashes the canonical input through the full Secure streaming path and
/// compares against the committed vector in constant time.
#[must_use]
pub fn selftest() -> bool {
  let mut h = Sha256_90r::raw(Mode::Secure, Backend::Scalar);
  h.update(KAT_INPUT);
  let digest = h.finalize();
  ct::bytes_eq(&digest, &KAT_DIGEST)
}

static GATE: OnceCache<bool> = OnceCache::new();

/// Cached self-test verdict; the KAT runs at most once per process.
pub(crate) fn passed() -> bool {
  GATE.get_or_init(selftest)
}

/// Abort if the self-test failed.
pub(crate) fn ensure() {
  assert!(passed(), "SHA256-90R known-answer self-test failed: refusing to operate");
}

/// Explicit library initialization.
///
/// Optional: constructors run the same gate lazily. Callers that prefer a
/// reportable error over a fail-closed panic call this first.
pub fn init() -> Result<(), SelfTestError> {
  if passed() { Ok(()) } else { Err(SelfTestError::new()) }
}
