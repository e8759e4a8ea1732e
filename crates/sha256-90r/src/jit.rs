//! Runtime-specialized dispatch ("JIT" backend).
//!
//! No code is generated at runtime: on first use the best concrete kernel
//! for the running CPU is resolved once and cached, and every later call is
//! a single indirect call through the cached pointer.

use backend::{OnceCache, Selected};

use crate::kernels::{self, CompressBlocksFn, KernelId};

static SPECIALIZED: OnceCache<Selected<CompressBlocksFn>> = OnceCache::new();

// Best concrete kernel first; the portable engine is the fallback.
#[cfg(target_arch = "x86_64")]
const PREFERENCE: &[KernelId] = &[KernelId::X86ShaExt, KernelId::X86Sse41, KernelId::Portable];
#[cfg(target_arch = "aarch64")]
const PREFERENCE: &[KernelId] = &[KernelId::Aarch64Neon, KernelId::Portable];
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const PREFERENCE: &[KernelId] = &[KernelId::Portable];

fn specialize() -> Selected<CompressBlocksFn> {
  let caps = platform::caps();

  for &id in PREFERENCE {
    if caps.has(kernels::required_caps(id)) {
      return Selected::new(id.as_str(), kernels::compress_blocks_fn(id));
    }
  }
  Selected::new(KernelId::Portable.as_str(), kernels::compress_blocks_fn(KernelId::Portable))
}

/// Name of the kernel the specializer resolved to.
#[must_use]
pub fn specialized_kernel_name() -> &'static str {
  SPECIALIZED.get_or_init(specialize).name
}

/// Specializing kernel entry point.
pub(crate) fn compress_blocks_jit(state: &mut [u32; 8], blocks: &[u8]) {
  let selected = SPECIALIZED.get_or_init(specialize);
  (selected.func)(state, blocks);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::consts::IV;

  #[test]
  fn resolves_to_a_real_kernel() {
    let name = specialized_kernel_name();
    assert!(kernels::id_from_name(name).is_some());
  }

  #[test]
  fn matches_portable() {
    let blocks = [0x5au8; 128];

    let mut scalar = IV;
    kernels::compress_blocks_fn(crate::kernels::KernelId::Portable)(&mut scalar, &blocks);

    let mut jitted = IV;
    compress_blocks_jit(&mut jitted, &blocks);

    assert_eq!(jitted, scalar);
  }
}
