//! x86_64 kernels: vectorized message expansion and the SHA-NI hybrid.
#![allow(clippy::indexing_slicing)] // Fixed-size schedule and state arrays

use core::arch::x86_64::{
  __m128i, _mm_add_epi32, _mm_alignr_epi8, _mm_blend_epi16, _mm_loadu_si128, _mm_or_si128, _mm_set_epi32,
  _mm_sha256rnds2_epu32, _mm_shuffle_epi32, _mm_slli_epi32, _mm_srli_epi32, _mm_storeu_si128, _mm_xor_si128,
};

use super::portable::{self, small_sigma1};
use crate::consts::{BLOCK_LEN, HW_ROUNDS, K, ROUNDS};

// ─────────────────────────────────────────────────────────────────────────────
// Vectorized message expansion (SSE4.1 tier)
// ─────────────────────────────────────────────────────────────────────────────

/// σ0 across four lanes.
#[inline]
#[target_feature(enable = "sse2")]
fn small_sigma0_x4(x: __m128i) -> __m128i {
  let rotr7 = _mm_or_si128(_mm_srli_epi32(x, 7), _mm_slli_epi32(x, 25));
  let rotr18 = _mm_or_si128(_mm_srli_epi32(x, 18), _mm_slli_epi32(x, 14));
  let shr3 = _mm_srli_epi32(x, 3);
  _mm_xor_si128(_mm_xor_si128(rotr7, rotr18), shr3)
}

/// Expand the message schedule with the independent terms vectorized.
///
/// For a 4-lane group starting at `i`, the terms `σ0(W[i-15]) + W[i-16] +
/// W[i-7]` have no in-group dependency and vectorize cleanly. The
/// `σ1(W[i-2])` term does not: lanes 2 and 3 consume lanes 0 and 1 of the
/// same group, so it folds in per lane — the same split hardware
/// `sha256msg2` makes.
#[target_feature(enable = "sse2", enable = "sse4.1")]
fn expand_schedule_sse41(block: &[u8; BLOCK_LEN]) -> [u32; ROUNDS] {
  let mut w = [0u32; ROUNDS];
  let (words, _) = block.as_chunks::<4>();
  for (i, chunk) in words.iter().enumerate() {
    w[i] = u32::from_be_bytes(*chunk);
  }

  // 16..88 in 4-lane groups; the last two words run scalar below.
  let mut i = 16;
  while i + 4 <= ROUNDS - 2 {
    // SAFETY: `i` ranges over 16..=84, so every 4-word load starting at
    // i-16, i-15, and i-7 stays inside the 90-word schedule.
    let w_im16 = unsafe { _mm_loadu_si128(w.as_ptr().add(i - 16).cast::<__m128i>()) };
    let w_im15 = unsafe { _mm_loadu_si128(w.as_ptr().add(i - 15).cast::<__m128i>()) };
    let w_im7 = unsafe { _mm_loadu_si128(w.as_ptr().add(i - 7).cast::<__m128i>()) };

    let t = _mm_add_epi32(_mm_add_epi32(small_sigma0_x4(w_im15), w_im16), w_im7);

    let mut partial = [0u32; 4];
    // SAFETY: `partial` is a valid 16-byte destination.
    unsafe { _mm_storeu_si128(partial.as_mut_ptr().cast::<__m128i>(), t) };

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

#[target_feature(enable = "sse2", enable = "sse4.1")]
fn compress_blocks_sse41_impl(state: &mut [u32; 8], blocks: &[u8]) {
  debug_assert!(blocks.len() % BLOCK_LEN == 0, "partial block reached the kernel");
  let (chunks, _) = blocks.as_chunks::<BLOCK_LEN>();
  for block in chunks {
    let w = expand_schedule_sse41(block);
    portable::compress_schedule(state, &w);
  }
}

/// SSE4.1 kernel entry point.
pub(crate) fn compress_blocks_sse41(state: &mut [u32; 8], blocks: &[u8]) {
  // SAFETY: dispatch only selects this kernel when SSE4.1 is detected.
  #[allow(unsafe_code)]
  unsafe {
    compress_blocks_sse41_impl(state, blocks);
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// SHA-NI hybrid (sha extensions tier)
// ─────────────────────────────────────────────────────────────────────────────

/// Hybrid kernel: the first [`HW_ROUNDS`] rounds run on SHA256RNDS2 with the
/// precomputed schedule fed as explicit `W[i] + K[i]` pairs, the extension
/// rounds finish in software from the same schedule. Register layout and
/// entry/exit shuffles follow the canonical Intel sequence.
#[target_feature(enable = "sha", enable = "sse2", enable = "ssse3", enable = "sse4.1")]
fn compress_blocks_sha_ext_impl(state: &mut [u32; 8], blocks: &[u8]) {
  debug_assert!(blocks.len() % BLOCK_LEN == 0, "partial block reached the kernel");
  debug_assert!(HW_ROUNDS % 4 == 0 && HW_ROUNDS <= ROUNDS);

  let (chunks, _) = blocks.as_chunks::<BLOCK_LEN>();
  for block in chunks {
    let w = expand_schedule_sse41(block);

    // Pack {a..h} into the ABEF/CDGH layout SHA256RNDS2 expects.
    // SAFETY: loadu has no alignment requirement; the state array holds 8 words.
    let mut tmp = unsafe { _mm_loadu_si128(state.as_ptr().cast::<__m128i>()) };
    let mut cdgh = unsafe { _mm_loadu_si128(state.as_ptr().add(4).cast::<__m128i>()) };
    tmp = _mm_shuffle_epi32(tmp, 0xB1); // CDAB
    cdgh = _mm_shuffle_epi32(cdgh, 0x1B); // EFGH
    let mut abef = _mm_alignr_epi8(tmp, cdgh, 8); // ABEF
    cdgh = _mm_blend_epi16(cdgh, tmp, 0xF0); // CDGH

    let mut r = 0;
    while r < HW_ROUNDS {
      let mut wk = _mm_set_epi32(
        w[r + 3].wrapping_add(K[r + 3]) as i32,
        w[r + 2].wrapping_add(K[r + 2]) as i32,
        w[r + 1].wrapping_add(K[r + 1]) as i32,
        w[r].wrapping_add(K[r]) as i32,
      );
      cdgh = _mm_sha256rnds2_epu32(cdgh, abef, wk);
      wk = _mm_shuffle_epi32(wk, 0x0E);
      abef = _mm_sha256rnds2_epu32(abef, cdgh, wk);
      r += 4;
    }

    // Unpack back to {a..h} without the feed-forward add: the software tail
    // still has rounds to run.
    let t0 = _mm_shuffle_epi32(abef, 0x1B); // FEBA
    let t1 = _mm_shuffle_epi32(cdgh, 0xB1); // DCHG
    let abcd = _mm_blend_epi16(t0, t1, 0xF0);
    let efgh = _mm_alignr_epi8(t1, t0, 8);

    let mut vars = [0u32; 8];
    // SAFETY: `vars` is a valid 32-byte destination.
    unsafe {
      _mm_storeu_si128(vars.as_mut_ptr().cast::<__m128i>(), abcd);
      _mm_storeu_si128(vars.as_mut_ptr().add(4).cast::<__m128i>(), efgh);
    }

    for i in HW_ROUNDS..ROUNDS {
      portable::round(&mut vars, w[i], K[i]);
    }

    for (s, v) in state.iter_mut().zip(vars.iter()) {
      *s = s.wrapping_add(*v);
    }
  }
}

/// SHA-NI hybrid kernel entry point.
pub(crate) fn compress_blocks_sha_ext(state: &mut [u32; 8], blocks: &[u8]) {
  // SAFETY: dispatch only selects this kernel when the sha/ssse3/sse4.1
  // feature set is detected.
  #[allow(unsafe_code)]
  unsafe {
    compress_blocks_sha_ext_impl(state, blocks);
  }
}
