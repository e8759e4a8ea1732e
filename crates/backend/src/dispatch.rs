//! Candidate lists and kernel selection.

use platform::Caps;

/// A candidate kernel with capability requirements.
///
/// Candidates are ordered from best to worst. The dispatcher selects the
/// first candidate whose requirements are satisfied by the detected
/// capabilities.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<F> {
  /// Human-readable name for diagnostics (e.g., "x86_64/sha-ext").
  pub name: &'static str,
  /// Required CPU capabilities. Must be a subset of detected caps.
  pub requires: Caps,
  /// The kernel function pointer.
  pub func: F,
}

impl<F> Candidate<F> {
  /// Create a new candidate.
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, requires: Caps, func: F) -> Self {
    Self { name, requires, func }
  }
}

/// The result of kernel selection: the chosen kernel's name and function.
#[derive(Clone, Copy, Debug)]
pub struct Selected<F> {
  /// Human-readable name of the selected kernel.
  pub name: &'static str,
  /// The selected kernel function.
  pub func: F,
}

impl<F> Selected<F> {
  /// Create a new selected result.
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, func: F) -> Self {
    Self { name, func }
  }
}

/// Select the best kernel from a candidate list.
///
/// Returns the first candidate whose `requires` is satisfied by `caps`.
/// The last candidate must be a portable fallback with `requires = Caps::NONE`.
///
/// # Panics
///
/// Panics if no candidate matches. A registry without a portable fallback is
/// an internal invariant violation, not a recoverable condition.
#[inline]
#[must_use]
pub fn select<F: Copy>(caps: Caps, candidates: &[Candidate<F>]) -> Selected<F> {
  for candidate in candidates {
    if caps.has(candidate.requires) {
      return Selected::new(candidate.name, candidate.func);
    }
  }
  panic!("no matching kernel: candidate list must end with a portable fallback");
}

#[cfg(test)]
mod tests {
  use platform::caps::x86;

  use super::*;

  type TestFn = fn() -> u32;

  fn portable() -> u32 {
    0xDEAD_BEEF
  }

  fn fast() -> u32 {
    0xCAFE_BABE
  }

  #[test]
  fn portable_fallback() {
    let candidates: &[Candidate<TestFn>] = &[
      Candidate::new("fast", x86::SSE41, fast),
      Candidate::new("portable", Caps::NONE, portable),
    ];

    let selected = select(Caps::NONE, candidates);
    assert_eq!(selected.name, "portable");
    assert_eq!((selected.func)(), 0xDEAD_BEEF);
  }

  #[test]
  fn best_match_wins() {
    let candidates: &[Candidate<TestFn>] = &[
      Candidate::new("fast", x86::SSE41, fast),
      Candidate::new("portable", Caps::NONE, portable),
    ];

    let selected = select(x86::SSE41, candidates);
    assert_eq!(selected.name, "fast");
    assert_eq!((selected.func)(), 0xCAFE_BABE);
  }

  #[test]
  fn skips_unavailable() {
    let candidates: &[Candidate<TestFn>] = &[
      Candidate::new("needs-sha", x86::SHA_EXT_READY, fast),
      Candidate::new("needs-sse41", x86::SSE41, fast),
      Candidate::new("portable", Caps::NONE, portable),
    ];

    let selected = select(x86::SSE41, candidates);
    assert_eq!(selected.name, "needs-sse41");
  }

  #[test]
  #[should_panic(expected = "portable fallback")]
  fn missing_fallback_panics() {
    let candidates: &[Candidate<TestFn>] = &[Candidate::new("fast", x86::SSE41, fast)];
    let _ = select(Caps::NONE, candidates);
  }
}
