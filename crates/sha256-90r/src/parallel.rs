//! Parallel and tree orchestration.
//!
//! Two distinct constructs live here:
//!
//! - **Tree hashing**: chunk the input, hash chunks independently across a
//!   fixed worker pool, combine chunk digests as a binary Merkle tree. The
//!   tree shape is fixed by index pairing, so the root never depends on how
//!   work was scheduled.
//! - **[`xor_fold_block_ranges`]**: a load-generation utility that XORs
//!   per-range compression results together. It is *not* a hash and does not
//!   commute with sequential hashing; see its documentation.
//!
//! Workers are plain scoped threads with no shared mutable state; the parent
//! blocks until every worker joins. Spawn failures and worker panics are
//! reported as [`ParallelError`], never swallowed.
#![allow(clippy::indexing_slicing)] // Chunk ranges are length-checked by construction

use std::{io, thread, vec::Vec};

use core::fmt;

use crate::{
  consts::BLOCK_LEN,
  dispatch::{self, Backend, Mode},
  hasher::Sha256_90r,
};

/// Worker cap for the block-range fold, matching the reference design.
pub const MAX_FOLD_WORKERS: usize = 4;

/// Errors from the orchestration layer.
#[derive(Debug)]
#[non_exhaustive]
pub enum ParallelError {
  /// A configuration value was unusable (zero chunk size, zero workers,
  /// ragged block run).
  InvalidConfig(&'static str),
  /// The OS refused to spawn a worker thread.
  Spawn(io::Error),
  /// A worker panicked; the first failure is reported.
  Worker(&'static str),
}

impl fmt::Display for ParallelError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::InvalidConfig(what) => write!(f, "invalid configuration: {what}"),
      Self::Spawn(err) => write!(f, "worker spawn failed: {err}"),
      Self::Worker(what) => write!(f, "worker failed: {what}"),
    }
  }
}

impl core::error::Error for ParallelError {
  fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
    match self {
      Self::Spawn(err) => Some(err),
      _ => None,
    }
  }
}

fn hash_chunk(mode: Mode, chunk: &[u8]) -> [u8; 32] {
  let mut h = Sha256_90r::with_mode(mode);
  h.update(chunk);
  h.finalize()
}

/// Merkle-tree hash of `data`.
///
/// The input is split into `chunk_size`-byte chunks; each chunk digest is a
/// leaf, and each internal node is `hash(left ‖ right)` with the last child
/// duplicated when a level has odd count. Up to `max_threads` workers hash
/// the leaves; the root is invariant to the worker count.
///
/// Empty input hashes to the digest of the empty message; a single chunk's
/// root is its leaf digest.
pub fn tree_hash(data: &[u8], chunk_size: usize, max_threads: usize, mode: Mode) -> Result<[u8; 32], ParallelError> {
  if chunk_size == 0 {
    return Err(ParallelError::InvalidConfig("chunk_size must be nonzero"));
  }
  if max_threads == 0 {
    return Err(ParallelError::InvalidConfig("max_threads must be nonzero"));
  }
  if data.is_empty() {
    return Ok(hash_chunk(mode, &[]));
  }

  let chunks: Vec<&[u8]> = data.chunks(chunk_size).collect();
  let leaves = hash_leaves(&chunks, max_threads, mode)?;
  Ok(combine_leaves(leaves, mode))
}

/// Hash every chunk, fanning contiguous index ranges across the pool.
///
/// Results are stitched back in range order, so the leaf sequence is
/// independent of scheduling.
fn hash_leaves(chunks: &[&[u8]], max_threads: usize, mode: Mode) -> Result<Vec<[u8; 32]>, ParallelError> {
  let workers = max_threads.min(chunks.len());
  if workers <= 1 {
    return Ok(chunks.iter().map(|chunk| hash_chunk(mode, chunk)).collect());
  }

  let per_worker = chunks.len().div_ceil(workers);
  let mut leaves = Vec::with_capacity(chunks.len());

  thread::scope(|scope| -> Result<(), ParallelError> {
    let mut handles = Vec::with_capacity(workers);
    for range in chunks.chunks(per_worker) {
      let handle = thread::Builder::new()
        .name("sha256-90r/leaf".into())
        .spawn_scoped(scope, move || {
          range.iter().map(|chunk| hash_chunk(mode, chunk)).collect::<Vec<_>>()
        })
        .map_err(ParallelError::Spawn)?;
      handles.push(handle);
    }
    for handle in handles {
      let digests = handle.join().map_err(|_| ParallelError::Worker("leaf worker panicked"))?;
      leaves.extend(digests);
    }
    Ok(())
  })?;

  Ok(leaves)
}

/// Pair leaves level by level until one root remains.
fn combine_leaves(mut level: Vec<[u8; 32]>, mode: Mode) -> [u8; 32] {
  debug_assert!(!level.is_empty());
  while level.len() > 1 {
    let mut next = Vec::with_capacity(level.len().div_ceil(2));
    for pair in level.chunks(2) {
      let left = &pair[0];
      // Odd count: the last child pairs with itself.
      let right = pair.get(1).unwrap_or(left);
      let mut h = Sha256_90r::with_mode(mode);
      h.update(left);
      h.update(right);
      next.push(h.finalize());
    }
    level = next;
  }
  // Length-1 invariant established by the loop.
  level[0]
}

/// Streaming tree hasher.
///
/// Buffers input into `chunk_size`-byte chunks, hashing each completed chunk
/// inline, and builds the same tree as [`tree_hash`] at finalize. Chunk
/// hashing here is sequential; use [`tree_hash`] for pooled one-shot
/// hashing.
pub struct TreeHasher {
  chunk_size: usize,
  mode: Mode,
  pending: Vec<u8>,
  leaves: Vec<[u8; 32]>,
}

impl TreeHasher {
  /// Create a streaming tree hasher with the given chunk size.
  pub fn new(chunk_size: usize, mode: Mode) -> Result<Self, ParallelError> {
    if chunk_size == 0 {
      return Err(ParallelError::InvalidConfig("chunk_size must be nonzero"));
    }
    Ok(Self {
      chunk_size,
      mode,
      pending: Vec::with_capacity(chunk_size),
      leaves: Vec::new(),
    })
  }

  /// Number of completed chunks so far.
  #[must_use]
  pub fn chunks_hashed(&self) -> usize {
    self.leaves.len()
  }

  /// Absorb more input, hashing every completed chunk.
  pub fn update(&mut self, mut data: &[u8]) {
    if !self.pending.is_empty() {
      let take = core::cmp::min(self.chunk_size - self.pending.len(), data.len());
      self.pending.extend_from_slice(&data[..take]);
      data = &data[take..];
      if self.pending.len() == self.chunk_size {
        let leaf = hash_chunk(self.mode, &self.pending);
        self.leaves.push(leaf);
        self.pending.clear();
      }
    }

    while data.len() >= self.chunk_size {
      let (chunk, rest) = data.split_at(self.chunk_size);
      self.leaves.push(hash_chunk(self.mode, chunk));
      data = rest;
    }

    if !data.is_empty() {
      self.pending.extend_from_slice(data);
    }
  }

  /// Compute the root digest.
  ///
  /// Does not consume the hasher; further updates remain possible.
  #[must_use]
  pub fn finalize(&self) -> [u8; 32] {
    let mut leaves = self.leaves.clone();
    if !self.pending.is_empty() {
      leaves.push(hash_chunk(self.mode, &self.pending));
    }
    match leaves.len() {
      0 => hash_chunk(self.mode, &[]),
      1 => leaves[0],
      _ => combine_leaves(leaves, self.mode),
    }
  }
}

/// XOR-fold a run of blocks across worker threads.
///
/// Every worker starts from the same state snapshot, sequentially compresses
/// its contiguous block range, and the per-worker final states are
/// XOR-combined into `state`. The XOR combine makes the result independent
/// of worker count and scheduling.
///
/// This is a load-generation/benchmarking utility, kept for exercising
/// kernels under concurrency. It is **not** a hash: the result does not
/// equal sequentially hashing the same blocks, and it must never be used
/// where a digest is expected.
///
/// `blocks.len()` must be a multiple of 64.
pub fn xor_fold_block_ranges(
  state: &mut [u32; 8],
  blocks: &[u8],
  max_threads: usize,
  mode: Mode,
) -> Result<(), ParallelError> {
  if max_threads == 0 {
    return Err(ParallelError::InvalidConfig("max_threads must be nonzero"));
  }
  if blocks.len() % BLOCK_LEN != 0 {
    return Err(ParallelError::InvalidConfig("block run must be a multiple of 64 bytes"));
  }
  if blocks.is_empty() {
    return Ok(());
  }

  let kernel = dispatch::resolve(mode, Backend::Auto);
  let num_blocks = blocks.len() / BLOCK_LEN;
  let workers = max_threads.min(MAX_FOLD_WORKERS).min(num_blocks);
  let per_worker = num_blocks.div_ceil(workers);

  let snapshot = *state;
  let mut combined = [0u32; 8];

  thread::scope(|scope| -> Result<(), ParallelError> {
    let mut handles = Vec::with_capacity(workers);
    for range in blocks.chunks(per_worker * BLOCK_LEN) {
      let handle = thread::Builder::new()
        .name("sha256-90r/fold".into())
        .spawn_scoped(scope, move || {
          let mut local = snapshot;
          (kernel.func)(&mut local, range);
          local
        })
        .map_err(ParallelError::Spawn)?;
      handles.push(handle);
    }
    for handle in handles {
      let local = handle.join().map_err(|_| ParallelError::Worker("fold worker panicked"))?;
      for (acc, word) in combined.iter_mut().zip(local.iter()) {
        *acc ^= *word;
      }
    }
    Ok(())
  })?;

  for (word, folded) in state.iter_mut().zip(combined.iter()) {
    *word ^= *folded;
  }
  Ok(())
}
