//! Error types shared across the workspace.
//!
//! Minimal, timing-safe error types. Individual crates define additional
//! errors where they need them.

use core::fmt;

/// A known-answer self-test failed.
///
/// Returned by library initialization when the built-in test vector does
/// not match. Intentionally opaque: a mismatch means the build is corrupt
/// and no detail about *how* it differs should leak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct SelfTestError;

impl SelfTestError {
  /// Create a new self-test error.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self
  }
}

impl Default for SelfTestError {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for SelfTestError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("known-answer self-test failed")
  }
}

impl core::error::Error for SelfTestError {}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::string::ToString;

  use super::*;

  #[test]
  fn display_message() {
    assert_eq!(SelfTestError::new().to_string(), "known-answer self-test failed");
  }

  #[test]
  fn is_copy_and_eq() {
    let e = SelfTestError::new();
    let e2 = e;
    assert_eq!(e, e2);
  }

  #[test]
  fn trait_bounds() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<SelfTestError>();
    assert_sync::<SelfTestError>();
  }

  #[test]
  fn size_is_zero() {
    assert_eq!(core::mem::size_of::<SelfTestError>(), 0);
  }
}
