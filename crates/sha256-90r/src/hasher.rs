//! Streaming hash context.
//!
//! The context owns the 8-word chaining state, a 64-byte pending buffer, and
//! a 64-bit bit counter, and drives the resolved kernel one block at a time.
//! Secure mode uses arithmetic-masked update/finalize logic: the
//! buffer-fill and padding-spill decisions never become data-dependent
//! branches. Accel/Fast use a conventional batched path that compresses full
//! blocks straight out of the caller's slice.
#![allow(clippy::indexing_slicing)] // Fixed-size block buffer and state words

use backend::Selected;
use traits::Digest;

use crate::{
  consts::{BLOCK_LEN, DIGEST_LEN, IV},
  ct,
  dispatch::{self, Backend, Mode},
  kernels::{CompressBlocksFn, KernelId, compress_blocks_fn},
  selftest,
};

/// Streaming SHA256-90R context.
///
/// Sensitive fields (chaining state, pending buffer, counters) are zeroized
/// on drop; the pending buffer may contain secret plaintext.
#[derive(Clone)]
pub struct Sha256_90r {
  state: [u32; 8],
  block: [u8; BLOCK_LEN],
  block_len: usize,
  bits: u64,
  mode: Mode,
  backend: Backend,
  kernel: Selected<CompressBlocksFn>,
}

impl Sha256_90r {
  /// Create a Secure-mode context.
  #[must_use]
  pub fn new() -> Self {
    Self::with_config(Mode::Secure, Backend::Auto)
  }

  /// Create a context with the given mode and automatic backend selection.
  #[must_use]
  pub fn with_mode(mode: Mode) -> Self {
    Self::with_config(mode, Backend::Auto)
  }

  /// Create a context with a specific backend.
  ///
  /// The backend request pairs with Accel mode: Secure mode pins the
  /// portable engine and would make the request meaningless.
  #[must_use]
  pub fn with_backend(backend: Backend) -> Self {
    Self::with_config(Mode::Accel, backend)
  }

  /// Create a context with an explicit mode/backend pair.
  ///
  /// # Panics
  ///
  /// Fails closed (panics) if the library's known-answer self-test does not
  /// pass; a mismatch means the build is corrupt.
  #[must_use]
  pub fn with_config(mode: Mode, backend: Backend) -> Self {
    selftest::ensure();
    Self::raw(mode, backend)
  }

  /// Construct without the self-test gate. The self-test itself hashes
  /// through this path.
  pub(crate) fn raw(mode: Mode, backend: Backend) -> Self {
    Self {
      state: IV,
      block: [0u8; BLOCK_LEN],
      block_len: 0,
      bits: 0,
      mode,
      backend,
      kernel: dispatch::resolve(mode, backend),
    }
  }

  /// Construct over one specific kernel, bypassing dispatch. Used by the
  /// kernel cross-verification machinery.
  pub(crate) fn with_kernel(id: KernelId) -> Self {
    selftest::ensure();
    Self {
      state: IV,
      block: [0u8; BLOCK_LEN],
      block_len: 0,
      bits: 0,
      mode: Mode::Fast,
      backend: Backend::Auto,
      kernel: Selected::new(id.as_str(), compress_blocks_fn(id)),
    }
  }

  /// The context's mode.
  #[inline]
  #[must_use]
  pub fn mode(&self) -> Mode {
    self.mode
  }

  /// The backend that was requested at creation.
  #[inline]
  #[must_use]
  pub fn requested_backend(&self) -> Backend {
    self.backend
  }

  /// Name of the kernel the context actually resolved to.
  #[inline]
  #[must_use]
  pub fn backend_name(&self) -> &'static str {
    self.kernel.name
  }

  /// Absorb `data` into the running hash.
  pub fn update(&mut self, data: &[u8]) {
    if data.is_empty() {
      return;
    }
    match self.mode {
      Mode::Secure => self.update_masked(data),
      Mode::Accel | Mode::Fast => self.update_batched(data),
    }
  }

  /// Finalize and return the 32-byte digest.
  ///
  /// Does not consume the context; further updates remain possible.
  #[must_use]
  pub fn finalize(&self) -> [u8; 32] {
    match self.mode {
      Mode::Secure => self.finalize_masked(),
      Mode::Accel | Mode::Fast => self.finalize_plain(),
    }
  }

  /// Reset to the initial state, keeping the mode/backend configuration.
  pub fn reset(&mut self) {
    self.state = IV;
    ct::wipe(&mut self.block);
    self.block_len = 0;
    self.bits = 0;
  }

  /// One-shot digest in Secure mode.
  #[inline]
  #[must_use]
  pub fn digest(data: &[u8]) -> [u8; 32] {
    let mut h = Self::new();
    h.update(data);
    h.finalize()
  }

  /// Constant-time absorb: every appended byte pays one compression, and the
  /// buffer-full decision is an arithmetic mask, never a branch.
  fn update_masked(&mut self, data: &[u8]) {
    for &byte in data {
      self.block[self.block_len] = byte;
      self.block_len += 1;

      let full = ct::eq_mask_usize(self.block_len, BLOCK_LEN);

      let mut candidate = self.state;
      (self.kernel.func)(&mut candidate, &self.block);

      let m32 = ct::mask_u32(full);
      for (word, cand) in self.state.iter_mut().zip(candidate.iter()) {
        *word = ct::select_u32(m32, *cand, *word);
      }
      self.bits = self.bits.wrapping_add(ct::select_u64(ct::mask_u64(full), 512, 0));
      self.block_len = ct::select_usize(full, 0, self.block_len);
    }
  }

  /// Throughput path: top up the pending buffer, then compress whole blocks
  /// directly from the input without copying.
  fn update_batched(&mut self, mut data: &[u8]) {
    if self.block_len != 0 {
      let take = core::cmp::min(BLOCK_LEN - self.block_len, data.len());
      self.block[self.block_len..self.block_len + take].copy_from_slice(&data[..take]);
      self.block_len += take;
      data = &data[take..];

      if self.block_len == BLOCK_LEN {
        let block = self.block;
        (self.kernel.func)(&mut self.state, &block);
        self.bits = self.bits.wrapping_add(512);
        self.block_len = 0;
      }
    }

    let full = data.len() - (data.len() % BLOCK_LEN);
    if full > 0 {
      (self.kernel.func)(&mut self.state, &data[..full]);
      self.bits = self.bits.wrapping_add((full as u64).wrapping_mul(8));
      data = &data[full..];
    }

    if !data.is_empty() {
      self.block[..data.len()].copy_from_slice(data);
      self.block_len = data.len();
    }
  }

  /// Branch-free padding: the spill compression runs unconditionally and an
  /// arithmetic mask decides whether it lands. Exactly two compressions for
  /// every finalize.
  fn finalize_masked(&self) -> [u8; 32] {
    let mut state = self.state;
    let len = self.block_len;
    let total_bits = self.bits.wrapping_add((len as u64).wrapping_mul(8));

    let mut padded = self.block;
    padded[len] = 0x80;
    padded[len + 1..].fill(0);

    // Would the length field overflow into a second block?
    let spill = ct::ge_mask_usize(len, 56);

    let mut spilled = state;
    (self.kernel.func)(&mut spilled, &padded);

    let m32 = ct::mask_u32(spill);
    for (word, cand) in state.iter_mut().zip(spilled.iter()) {
      *word = ct::select_u32(m32, *cand, *word);
    }

    // Final block: the padded block when it still has room, a zero block
    // when the padding spilled.
    let keep = !(spill as u8);
    let mut last = [0u8; BLOCK_LEN];
    for (dst, src) in last[..56].iter_mut().zip(padded[..56].iter()) {
      *dst = src & keep;
    }
    last[56..].copy_from_slice(&total_bits.to_be_bytes());
    (self.kernel.func)(&mut state, &last);

    serialize_state(&state)
  }

  fn finalize_plain(&self) -> [u8; 32] {
    let mut state = self.state;
    let mut block = self.block;
    let mut len = self.block_len;
    let total_bits = self.bits.wrapping_add((len as u64).wrapping_mul(8));

    block[len] = 0x80;
    len += 1;

    if len > 56 {
      block[len..].fill(0);
      (self.kernel.func)(&mut state, &block);
      block = [0u8; BLOCK_LEN];
      len = 0;
    }

    block[len..56].fill(0);
    block[56..].copy_from_slice(&total_bits.to_be_bytes());
    (self.kernel.func)(&mut state, &block);

    serialize_state(&state)
  }
}

/// Serialize the 8-word state as big-endian bytes.
pub(crate) fn serialize_state(state: &[u32; 8]) -> [u8; 32] {
  let mut out = [0u8; DIGEST_LEN];
  for (chunk, word) in out.chunks_exact_mut(4).zip(state.iter()) {
    chunk.copy_from_slice(&word.to_be_bytes());
  }
  out
}

impl Default for Sha256_90r {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Drop for Sha256_90r {
  fn drop(&mut self) {
    ct::wipe(&mut self.block);
    ct::wipe_u32(&mut self.state);
    // SAFETY: plain field writes through valid exclusive references; volatile
    // so the wipe of the counters survives dead-store elimination.
    #[allow(unsafe_code)]
    unsafe {
      core::ptr::write_volatile(&mut self.bits, 0);
      core::ptr::write_volatile(&mut self.block_len, 0);
    }
    core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
  }
}

impl Digest for Sha256_90r {
  const OUTPUT_SIZE: usize = DIGEST_LEN;
  type Output = [u8; 32];

  #[inline]
  fn new() -> Self {
    Self::default()
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    Self::update(self, data);
  }

  #[inline]
  fn finalize(&self) -> Self::Output {
    Self::finalize(self)
  }

  #[inline]
  fn reset(&mut self) {
    Self::reset(self);
  }
}
