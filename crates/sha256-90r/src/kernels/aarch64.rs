//! aarch64 NEON kernel: vectorized message expansion.
#![allow(clippy::indexing_slicing)] // Fixed-size schedule and state arrays

use core::arch::aarch64::{
  uint32x4_t, vaddq_u32, veorq_u32, vld1q_u32, vorrq_u32, vshlq_n_u32, vshrq_n_u32, vst1q_u32,
};

use super::portable::{self, small_sigma1};
use crate::consts::{BLOCK_LEN, ROUNDS};

/// σ0 across four lanes.
#[inline]
#[target_feature(enable = "neon")]
fn small_sigma0_x4(x: uint32x4_t) -> uint32x4_t {
  let rotr7 = vorrq_u32(vshrq_n_u32::<7>(x), vshlq_n_u32::<25>(x));
  let rotr18 = vorrq_u32(vshrq_n_u32::<18>(x), vshlq_n_u32::<14>(x));
  let shr3 = vshrq_n_u32::<3>(x);
  veorq_u32(veorq_u32(rotr7, rotr18), shr3)
}

/// Expand the message schedule with the independent terms vectorized.
///
/// Same lane split as the x86_64 kernel: `σ0(W[i-15]) + W[i-16] + W[i-7]`
/// vectorizes across a 4-lane group, `σ1(W[i-2])` folds in per lane because
/// lanes 2 and 3 depend on lanes 0 and 1.
#[target_feature(enable = "neon")]
fn expand_schedule_neon(block: &[u8; BLOCK_LEN]) -> [u32; ROUNDS] {
  let mut w = [0u32; ROUNDS];
  let (words, _) = block.as_chunks::<4>();
  for (i, chunk) in words.iter().enumerate() {
    w[i] = u32::from_be_bytes(*chunk);
  }

  let mut i = 16;
  while i + 4 <= ROUNDS - 2 {
    // SAFETY: `i` ranges over 16..=84, so every 4-word load starting at
    // i-16, i-15, and i-7 stays inside the 90-word schedule.
    let w_im16 = unsafe { vld1q_u32(w.as_ptr().add(i - 16)) };
    let w_im15 = unsafe { vld1q_u32(w.as_ptr().add(i - 15)) };
    let w_im7 = unsafe { vld1q_u32(w.as_ptr().add(i - 7)) };

    let t = vaddq_u32(vaddq_u32(small_sigma0_x4(w_im15), w_im16), w_im7);

    let mut partial = [0u32; 4];
    // SAFETY: `partial` is a valid 4-word destination.
    unsafe { vst1q_u32(partial.as_mut_ptr(), t) };

    w[i] = partial[0].wrapping_add(small_sigma1(w[i - 2]));
    w[i + 1] = partial[1].wrapping_add(small_sigma1(w[i - 1]));
    w[i + 2] = partial[2].wrapping_add(small_sigma1(w[i]));
    w[i + 3] = partial[3].wrapping_add(small_sigma1(w[i + 1]));

    i += 4;
  }
  while i < ROUNDS {
    w[i] = small_sigma1(w[i - 2])
      .wrapping_add(w[i - 7])
      .wrapping_add(portable::small_sigma0(w[i - 15]))
      .wrapping_add(w[i - 16]);
    i += 1;
  }

  w
}

#[target_feature(enable = "neon")]
fn compress_blocks_neon_impl(state: &mut [u32; 8], blocks: &[u8]) {
  debug_assert!(blocks.len() % BLOCK_LEN == 0, "partial block reached the kernel");
  let (chunks, _) = blocks.as_chunks::<BLOCK_LEN>();
  for block in chunks {
    let w = expand_schedule_neon(block);
    portable::compress_schedule(state, &w);
  }
}

/// NEON kernel entry point.
pub(crate) fn compress_blocks_neon(state: &mut [u32; 8], blocks: &[u8]) {
  // SAFETY: dispatch only selects this kernel when NEON is detected.
  #[allow(unsafe_code)]
  unsafe {
    compress_blocks_neon_impl(state, blocks);
  }
}
