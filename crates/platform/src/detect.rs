//! Capability detection and caching.
//!
//! Detection runs at most a handful of times per process: the result is
//! published through an atomic and every later call is a single load.
//! Detection is idempotent and convergent, so a race between first callers
//! publishes the same value twice; no locking is needed (readers included).

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::caps::Caps;

static DETECTED: AtomicU64 = AtomicU64::new(0);
static DETECTED_VALID: AtomicBool = AtomicBool::new(false);

static OVERRIDE_BITS: AtomicU64 = AtomicU64::new(0);
static OVERRIDE_SET: AtomicBool = AtomicBool::new(false);

#[inline]
pub(crate) fn caps() -> Caps {
  if OVERRIDE_SET.load(Ordering::Acquire) {
    return Caps::from_bits(OVERRIDE_BITS.load(Ordering::Acquire));
  }

  if DETECTED_VALID.load(Ordering::Acquire) {
    return Caps::from_bits(DETECTED.load(Ordering::Acquire));
  }

  let detected = detect();
  DETECTED.store(detected.bits(), Ordering::Release);
  DETECTED_VALID.store(true, Ordering::Release);
  detected
}

pub(crate) fn set_caps_override(value: Option<Caps>) {
  match value {
    Some(caps) => {
      OVERRIDE_BITS.store(caps.bits(), Ordering::Release);
      OVERRIDE_SET.store(true, Ordering::Release);
    }
    None => OVERRIDE_SET.store(false, Ordering::Release),
  }
}

#[inline]
pub(crate) fn has_override() -> bool {
  OVERRIDE_SET.load(Ordering::Acquire)
}

/// Probe the running CPU.
///
/// Under Miri, SIMD intrinsics cannot be interpreted, so always report a
/// portable-only machine.
#[cfg(miri)]
fn detect() -> Caps {
  Caps::NONE
}

#[cfg(all(not(miri), target_arch = "x86_64"))]
fn detect() -> Caps {
  use crate::caps::x86;

  let mut caps = Caps::NONE;

  #[cfg(feature = "std")]
  {
    if std::arch::is_x86_feature_detected!("sse2") {
      caps = caps.union(x86::SSE2);
    }
    if std::arch::is_x86_feature_detected!("ssse3") {
      caps = caps.union(x86::SSSE3);
    }
    if std::arch::is_x86_feature_detected!("sse4.1") {
      caps = caps.union(x86::SSE41);
    }
    if std::arch::is_x86_feature_detected!("avx2") {
      caps = caps.union(x86::AVX2);
    }
    if std::arch::is_x86_feature_detected!("sha") {
      caps = caps.union(x86::SHA);
    }
  }

  #[cfg(not(feature = "std"))]
  {
    // Compile-time features only: no CPUID probing without std.
    if cfg!(target_feature = "sse2") {
      caps = caps.union(x86::SSE2);
    }
    if cfg!(target_feature = "ssse3") {
      caps = caps.union(x86::SSSE3);
    }
    if cfg!(target_feature = "sse4.1") {
      caps = caps.union(x86::SSE41);
    }
    if cfg!(target_feature = "avx2") {
      caps = caps.union(x86::AVX2);
    }
    if cfg!(target_feature = "sha") {
      caps = caps.union(x86::SHA);
    }
  }

  caps
}

#[cfg(all(not(miri), target_arch = "aarch64"))]
fn detect() -> Caps {
  use crate::caps::aarch64;

  let mut caps = Caps::NONE;

  #[cfg(feature = "std")]
  {
    if std::arch::is_aarch64_feature_detected!("neon") {
      caps = caps.union(aarch64::NEON);
    }
    if std::arch::is_aarch64_feature_detected!("sha2") {
      caps = caps.union(aarch64::SHA2);
    }
  }

  #[cfg(not(feature = "std"))]
  {
    if cfg!(target_feature = "neon") {
      caps = caps.union(aarch64::NEON);
    }
    if cfg!(target_feature = "sha2") {
      caps = caps.union(aarch64::SHA2);
    }
  }

  caps
}

#[cfg(all(not(miri), not(target_arch = "x86_64"), not(target_arch = "aarch64")))]
fn detect() -> Caps {
  Caps::NONE
}

#[cfg(test)]
mod tests {
  use super::*;

  // Single test: the override is process-global state, and parallel test
  // threads would otherwise observe each other's overrides.
  #[test]
  fn detection_and_override() {
    let real = caps();
    assert_eq!(caps(), real);

    set_caps_override(Some(Caps::NONE));
    assert!(has_override());
    assert_eq!(caps(), Caps::NONE);

    set_caps_override(None);
    assert!(!has_override());
    assert_eq!(caps(), real);
  }
}
