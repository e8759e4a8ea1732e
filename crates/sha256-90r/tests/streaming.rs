use sha256_90r::{Digest as _, Mode, Sha256_90r, hash_with_mode};

fn pattern(len: usize) -> Vec<u8> {
  (0..len)
    .map(|i| (i as u8).wrapping_mul(31).wrapping_add((i >> 8) as u8))
    .collect()
}

/// Padding boundaries: 55/56 straddle the single-vs-double padding-block
/// threshold, 63/64/65 the block boundary, 119/120 the two-block threshold.
const BOUNDARY_LENS: &[usize] = &[0, 1, 55, 56, 63, 64, 65, 119, 120, 1000];

#[test]
fn chunked_updates_match_one_shot() {
  for mode in [Mode::Secure, Mode::Accel, Mode::Fast] {
    for &len in BOUNDARY_LENS {
      let msg = pattern(len);
      let expected = hash_with_mode(&msg, mode);

      for &chunk in &[1usize, 7, 64, 65] {
        let mut h = Sha256_90r::with_mode(mode);
        for part in msg.chunks(chunk) {
          h.update(part);
        }
        assert_eq!(h.finalize(), expected, "mode={} len={len} chunk={chunk}", mode.as_str());
      }

      // Deterministic "random" split sequence.
      let mut h = Sha256_90r::with_mode(mode);
      let mut offset = 0usize;
      let mut step = 3usize;
      while offset < msg.len() {
        let end = usize::min(msg.len(), offset + step);
        h.update(&msg[offset..end]);
        offset = end;
        step = step.wrapping_mul(7).wrapping_add(1) % 97 + 1;
      }
      assert_eq!(h.finalize(), expected, "mode={} len={len} random-split", mode.as_str());
    }
  }
}

#[test]
fn modes_agree_on_boundary_lengths() {
  for &len in BOUNDARY_LENS {
    let msg = pattern(len);
    let secure = hash_with_mode(&msg, Mode::Secure);
    assert_eq!(hash_with_mode(&msg, Mode::Accel), secure, "len={len}");
    assert_eq!(hash_with_mode(&msg, Mode::Fast), secure, "len={len}");
  }
}

#[test]
fn boundary_digests_distinct() {
  // Every boundary length must produce a distinct digest for this pattern;
  // collisions here would point at padding mishandling.
  let digests: Vec<[u8; 32]> = BOUNDARY_LENS
    .iter()
    .map(|&len| hash_with_mode(&pattern(len), Mode::Fast))
    .collect();
  for (i, a) in digests.iter().enumerate() {
    for (j, b) in digests.iter().enumerate().skip(i + 1) {
      assert_ne!(a, b, "lens {} and {}", BOUNDARY_LENS[i], BOUNDARY_LENS[j]);
    }
  }
}

#[test]
fn million_byte_input() {
  let msg = vec![b'a'; 1_000_000];

  let fast = hash_with_mode(&msg, Mode::Fast);
  assert_eq!(hash_with_mode(&msg, Mode::Accel), fast);

  // Streaming in uneven pieces must agree with the one-shot digest.
  let mut h = Sha256_90r::with_mode(Mode::Fast);
  for part in msg.chunks(65_537) {
    h.update(part);
  }
  assert_eq!(h.finalize(), fast);
}

#[test]
fn empty_updates_are_noops() {
  for mode in [Mode::Secure, Mode::Fast] {
    let mut h = Sha256_90r::with_mode(mode);
    h.update(&[]);
    h.update(b"abc");
    h.update(&[]);
    assert_eq!(h.finalize(), hash_with_mode(b"abc", mode), "mode={}", mode.as_str());
  }
}

#[test]
fn update_vectored_matches_concat() {
  let mut a = Sha256_90r::with_mode(Mode::Fast);
  a.update_vectored(&[b"ab".as_slice(), b"".as_slice(), b"cdef".as_slice()]);

  let mut b = Sha256_90r::with_mode(Mode::Fast);
  b.update(b"abcdef");

  assert_eq!(a.finalize(), b.finalize());
}
