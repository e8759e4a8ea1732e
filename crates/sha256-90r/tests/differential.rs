//! Property tests: the independent kernel implementations act as oracles for
//! one another (no upstream reference exists for the 90-round variant).

use proptest::prelude::*;
use sha256_90r::{Mode, Sha256_90r, hash_with_mode, kernels::kernel_test};

proptest! {
  #[test]
  fn secure_matches_fast(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
    prop_assert_eq!(hash_with_mode(&data, Mode::Secure), hash_with_mode(&data, Mode::Fast));
  }

  #[test]
  fn kernels_agree(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
    prop_assert!(kernel_test::verify_kernels(&data).is_ok());
  }

  #[test]
  fn streaming_matches_one_shot(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
    let expected = hash_with_mode(&data, Mode::Fast);

    let mut h = Sha256_90r::with_mode(Mode::Fast);
    let mut i = 0usize;
    while i < data.len() {
      let step = (data[i] as usize % 97) + 1;
      let end = core::cmp::min(data.len(), i + step);
      h.update(&data[i..end]);
      i = end;
    }

    prop_assert_eq!(h.finalize(), expected);
  }

  #[test]
  fn avalanche_on_random_bit(
    data in proptest::collection::vec(any::<u8>(), 1..512),
    bit in any::<u16>(),
  ) {
    let baseline = hash_with_mode(&data, Mode::Fast);

    let mut flipped = data.clone();
    let bit = (bit as usize) % (data.len() * 8);
    flipped[bit / 8] ^= 1 << (bit % 8);

    prop_assert_ne!(hash_with_mode(&flipped, Mode::Fast), baseline);
  }
}
