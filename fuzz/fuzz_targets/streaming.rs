//! Streaming equivalence: any chunking of the input must produce the
//! one-shot digest, in every mode.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sha256_90r::{Mode, Sha256_90r, hash_with_mode};

fuzz_target!(|data: &[u8]| {
  // First byte drives the split sequence; the rest is the message.
  let Some((&knob, msg)) = data.split_first() else {
    return;
  };

  for mode in [Mode::Secure, Mode::Fast] {
    // The constant-time path costs one compression per byte; cap its input.
    if mode == Mode::Secure && msg.len() > 512 {
      continue;
    }

    let expected = hash_with_mode(msg, mode);

    let mut h = Sha256_90r::with_mode(mode);
    let mut offset = 0usize;
    let mut step = (knob as usize % 97) + 1;
    while offset < msg.len() {
      let end = usize::min(msg.len(), offset + step);
      h.update(&msg[offset..end]);
      offset = end;
      step = step.wrapping_mul(31).wrapping_add(knob as usize) % 127 + 1;
    }

    assert_eq!(h.finalize(), expected);
  }
});
