//! Portable scalar round engine.
//!
//! This kernel is the correctness and security anchor: every other backend
//! must match it bit for bit. Control flow depends only on fixed round
//! indices and block counts, never on block content.
#![allow(clippy::indexing_slicing)] // Fixed-size state and schedule arrays

use crate::consts::{BLOCK_LEN, K, ROUNDS};

#[inline(always)]
const fn ch(x: u32, y: u32, z: u32) -> u32 {
  (x & y) ^ (!x & z)
}

#[inline(always)]
const fn maj(x: u32, y: u32, z: u32) -> u32 {
  (x & y) ^ (x & z) ^ (y & z)
}

#[inline(always)]
const fn big_sigma0(x: u32) -> u32 {
  x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

#[inline(always)]
const fn big_sigma1(x: u32) -> u32 {
  x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

#[inline(always)]
pub(crate) const fn small_sigma0(x: u32) -> u32 {
  x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline(always)]
pub(crate) const fn small_sigma1(x: u32) -> u32 {
  x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

/// One round of the compression function.
///
/// Shared by the scalar loop, the hybrid software tail, and the pipeline
/// model so the round body exists in exactly one place.
#[inline(always)]
pub(crate) fn round(vars: &mut [u32; 8], w: u32, k: u32) {
  let [a, b, c, d, e, f, g, h] = *vars;
  let t1 = h
    .wrapping_add(big_sigma1(e))
    .wrapping_add(ch(e, f, g))
    .wrapping_add(k)
    .wrapping_add(w);
  let t2 = big_sigma0(a).wrapping_add(maj(a, b, c));

  *vars = [
    t1.wrapping_add(t2),
    a,
    b,
    c,
    d.wrapping_add(t1),
    e,
    f,
    g,
  ];
}

/// Expand a 64-byte block into the 90-word message schedule.
///
/// `W[0..16]` are the big-endian words of the block; the remainder follows
/// `W[i] = σ1(W[i-2]) + W[i-7] + σ0(W[i-15]) + W[i-16]` (mod 2^32).
#[inline]
#[must_use]
pub(crate) fn expand_schedule(block: &[u8; BLOCK_LEN]) -> [u32; ROUNDS] {
  let mut w = [0u32; ROUNDS];
  let (words, _) = block.as_chunks::<4>();
  for (i, chunk) in words.iter().enumerate() {
    w[i] = u32::from_be_bytes(*chunk);
  }
  for i in 16..ROUNDS {
    w[i] = small_sigma1(w[i - 2])
      .wrapping_add(w[i - 7])
      .wrapping_add(small_sigma0(w[i - 15]))
      .wrapping_add(w[i - 16]);
  }
  w
}

/// Run the 90 rounds over a precomputed schedule and fold the result into
/// `state` (Davies–Meyer).
#[inline]
pub(crate) fn compress_schedule(state: &mut [u32; 8], w: &[u32; ROUNDS]) {
  let mut vars = *state;
  for i in 0..ROUNDS {
    round(&mut vars, w[i], K[i]);
  }
  for (s, v) in state.iter_mut().zip(vars.iter()) {
    *s = s.wrapping_add(*v);
  }
}

/// Compress a single 64-byte block.
#[inline]
pub(crate) fn compress_block(state: &mut [u32; 8], block: &[u8; BLOCK_LEN]) {
  let w = expand_schedule(block);
  compress_schedule(state, &w);
}

/// Compress a run of complete blocks.
///
/// `blocks.len()` must be a multiple of 64; anything else means the caller's
/// buffer accounting is corrupt.
pub(crate) fn compress_blocks(state: &mut [u32; 8], blocks: &[u8]) {
  debug_assert!(blocks.len() % BLOCK_LEN == 0, "partial block reached the kernel");
  let (chunks, rest) = blocks.as_chunks::<BLOCK_LEN>();
  assert!(rest.is_empty(), "partial block reached the kernel");
  for block in chunks {
    compress_block(state, block);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::consts::IV;

  #[test]
  fn schedule_prefix_is_block_words() {
    let mut block = [0u8; BLOCK_LEN];
    for (i, byte) in block.iter_mut().enumerate() {
      *byte = i as u8;
    }
    let w = expand_schedule(&block);
    assert_eq!(w[0], 0x0001_0203);
    assert_eq!(w[15], 0x3c3d_3e3f);
  }

  #[test]
  fn schedule_recurrence_holds() {
    let block = [0x5au8; BLOCK_LEN];
    let w = expand_schedule(&block);
    for i in 16..ROUNDS {
      let expected = small_sigma1(w[i - 2])
        .wrapping_add(w[i - 7])
        .wrapping_add(small_sigma0(w[i - 15]))
        .wrapping_add(w[i - 16]);
      assert_eq!(w[i], expected, "schedule word {i}");
    }
  }

  #[test]
  fn compression_changes_state() {
    let mut state = IV;
    compress_block(&mut state, &[0u8; BLOCK_LEN]);
    assert_ne!(state, IV);
  }

  #[test]
  fn davies_meyer_feedforward() {
    // The output must be input state + post-round vars, so compressing from
    // two different states with the same block never collides by accident.
    let block = [7u8; BLOCK_LEN];
    let mut a = IV;
    let mut b = [0u32; 8];
    compress_block(&mut a, &block);
    compress_block(&mut b, &block);
    assert_ne!(a, b);
  }

  #[test]
  #[should_panic(expected = "partial block")]
  fn partial_block_is_fatal() {
    let mut state = IV;
    compress_blocks(&mut state, &[0u8; 65]);
  }
}
