use sha256_90r::{
  Mode, hash_with_mode,
  parallel::{TreeHasher, tree_hash},
};

fn pattern(len: usize) -> Vec<u8> {
  (0..len).map(|i| (i as u8).wrapping_mul(89).wrapping_add((i >> 9) as u8)).collect()
}

#[test]
fn root_invariant_to_worker_count_large() {
  let data = pattern(300_000);

  for chunk_size in [1024usize, 4096, 65_536] {
    let baseline = tree_hash(&data, chunk_size, 1, Mode::Fast).unwrap();
    for threads in [2usize, 3, 4, 7, 16] {
      let root = tree_hash(&data, chunk_size, threads, Mode::Fast).unwrap();
      assert_eq!(root, baseline, "chunk={chunk_size} threads={threads}");
    }
  }
}

#[test]
fn root_depends_on_chunk_size() {
  let data = pattern(10_000);
  let a = tree_hash(&data, 1024, 4, Mode::Fast).unwrap();
  let b = tree_hash(&data, 2048, 4, Mode::Fast).unwrap();
  assert_ne!(a, b);
}

#[test]
fn sub_chunk_input_is_plain_digest() {
  // Inputs below one chunk never build internal nodes.
  let data = pattern(512);
  let root = tree_hash(&data, 1024, 4, Mode::Fast).unwrap();
  assert_eq!(root, hash_with_mode(&data, Mode::Fast));
}

#[test]
fn streaming_tree_matches_pooled() {
  let data = pattern(200_000);
  let expected = tree_hash(&data, 4096, 4, Mode::Fast).unwrap();

  let mut t = TreeHasher::new(4096, Mode::Fast).unwrap();
  for part in data.chunks(10_007) {
    t.update(part);
  }
  assert_eq!(t.finalize(), expected);
  assert_eq!(t.chunks_hashed(), 200_000 / 4096);
}

#[test]
fn streaming_tree_finalize_is_idempotent() {
  let data = pattern(9000);
  let mut t = TreeHasher::new(1024, Mode::Fast).unwrap();
  t.update(&data);

  let first = t.finalize();
  assert_eq!(t.finalize(), first);

  t.update(b"more");
  assert_ne!(t.finalize(), first);
}

#[test]
fn exact_chunk_multiple_has_no_partial_leaf() {
  let data = pattern(8 * 1024);
  let pooled = tree_hash(&data, 1024, 4, Mode::Fast).unwrap();

  let mut t = TreeHasher::new(1024, Mode::Fast).unwrap();
  t.update(&data);
  assert_eq!(t.chunks_hashed(), 8);
  assert_eq!(t.finalize(), pooled);
}

#[test]
fn tree_modes_agree() {
  // Tree structure is mode-independent because leaf digests are.
  let data = pattern(50_000);
  let fast = tree_hash(&data, 4096, 4, Mode::Fast).unwrap();
  let accel = tree_hash(&data, 4096, 4, Mode::Accel).unwrap();
  assert_eq!(fast, accel);
}
