//! Tree-hash invariants: worker-count independence and streaming
//! equivalence for arbitrary inputs and chunk sizes.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sha256_90r::{
  Mode,
  parallel::{TreeHasher, tree_hash},
};

fuzz_target!(|data: &[u8]| {
  let Some((&knob, msg)) = data.split_first() else {
    return;
  };
  let chunk_size = (knob as usize % 256) + 1;

  let baseline = tree_hash(msg, chunk_size, 1, Mode::Fast).expect("valid config");
  for threads in [2usize, 4] {
    let root = tree_hash(msg, chunk_size, threads, Mode::Fast).expect("valid config");
    assert_eq!(root, baseline);
  }

  let mut streaming = TreeHasher::new(chunk_size, Mode::Fast).expect("valid config");
  streaming.update(msg);
  assert_eq!(streaming.finalize(), baseline);
});
