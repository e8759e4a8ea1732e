//! Avalanche sanity: flipping any single input bit must change the digest.
//! Not a formal diffusion proof, just an empirical tripwire over every bit
//! position of a one-block and a two-block message.

use sha256_90r::{Mode, hash_with_mode};

fn check_all_bits(msg: &[u8]) {
  let baseline = hash_with_mode(msg, Mode::Fast);

  for bit in 0..msg.len() * 8 {
    let mut flipped = msg.to_vec();
    flipped[bit / 8] ^= 1 << (bit % 8);

    let digest = hash_with_mode(&flipped, Mode::Fast);
    assert_ne!(digest, baseline, "bit {bit} did not avalanche");

    // A flip should disturb many digest bits, not just one word.
    let differing: u32 = digest
      .iter()
      .zip(baseline.iter())
      .map(|(a, b)| (a ^ b).count_ones())
      .sum();
    assert!(differing >= 32, "bit {bit}: only {differing} digest bits changed");
  }
}

#[test]
fn one_block_message() {
  let msg: Vec<u8> = (0u8..64).collect();
  check_all_bits(&msg);
}

#[test]
fn two_block_message() {
  let msg: Vec<u8> = (0..96).map(|i| (i as u8).wrapping_mul(73)).collect();
  check_all_bits(&msg);
}
