//! Mode and backend resolution.
//!
//! A context's `(Mode, Backend)` pair is resolved to a concrete kernel once,
//! at creation. Secure mode is the anchor: it always resolves to the
//! portable scalar engine no matter what was requested or detected.
//! Accel/Fast honor the requested backend when the CPU can run it and fall
//! back silently to scalar otherwise — fallback is a normal path, not an
//! error.

use backend::{Candidate, OnceCache, Selected, select};
use platform::Caps;

use crate::kernels::{self, CompressBlocksFn, KernelId};

/// Security/performance posture of a context. Immutable after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
  /// Constant-time streaming over the branch-free scalar engine.
  #[default]
  Secure,
  /// Hardware-accelerated kernels, conventional streaming.
  Accel,
  /// Maximum throughput; no side-channel posture.
  Fast,
}

impl Mode {
  #[inline]
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Secure => "secure",
      Self::Accel => "accel",
      Self::Fast => "fast",
    }
  }
}

/// Requested round-engine implementation. Immutable after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Backend {
  /// Pick the best available kernel for the mode.
  #[default]
  Auto,
  /// Portable scalar engine.
  Scalar,
  /// Vectorized message expansion (SSE4.1 / NEON).
  Simd,
  /// Hardware SHA extensions (hybrid: extension rounds stay in software).
  ShaExt,
  /// GPU offload. Kernels are unimplemented upstream; never available.
  Gpu,
  /// 90-stage pipeline behavioral model.
  Fpga,
  /// Runtime-specialized dispatch.
  Jit,
}

impl Backend {
  /// All selectable backends.
  pub const ALL: &'static [Backend] = &[
    Backend::Auto,
    Backend::Scalar,
    Backend::Simd,
    Backend::ShaExt,
    Backend::Gpu,
    Backend::Fpga,
    Backend::Jit,
  ];

  #[inline]
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Scalar => "scalar",
      Self::Simd => "simd",
      Self::ShaExt => "sha-ext",
      Self::Gpu => "gpu",
      Self::Fpga => "fpga",
      Self::Jit => "jit",
    }
  }
}

fn kernel(id: KernelId) -> Selected<CompressBlocksFn> {
  Selected::new(id.as_str(), kernels::compress_blocks_fn(id))
}

fn kernel_if_available(id: KernelId, caps: Caps) -> Option<Selected<CompressBlocksFn>> {
  caps.has(kernels::required_caps(id)).then(|| kernel(id))
}

/// The auto candidate list for Accel/Fast, best first.
fn auto_candidates() -> Selected<CompressBlocksFn> {
  static AUTO: OnceCache<Selected<CompressBlocksFn>> = OnceCache::new();
  AUTO.get_or_init(|| {
    let caps = platform::caps();

    #[cfg(target_arch = "x86_64")]
    {
      select(caps, &[
        Candidate::new(
          KernelId::X86ShaExt.as_str(),
          kernels::required_caps(KernelId::X86ShaExt),
          kernels::compress_blocks_fn(KernelId::X86ShaExt),
        ),
        Candidate::new(
          KernelId::X86Sse41.as_str(),
          kernels::required_caps(KernelId::X86Sse41),
          kernels::compress_blocks_fn(KernelId::X86Sse41),
        ),
        Candidate::new(
          KernelId::Portable.as_str(),
          Caps::NONE,
          kernels::compress_blocks_fn(KernelId::Portable),
        ),
      ])
    }

    #[cfg(target_arch = "aarch64")]
    {
      select(caps, &[
        Candidate::new(
          KernelId::Aarch64Neon.as_str(),
          kernels::required_caps(KernelId::Aarch64Neon),
          kernels::compress_blocks_fn(KernelId::Aarch64Neon),
        ),
        Candidate::new(
          KernelId::Portable.as_str(),
          Caps::NONE,
          kernels::compress_blocks_fn(KernelId::Portable),
        ),
      ])
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
      select(caps, &[Candidate::new(
        KernelId::Portable.as_str(),
        Caps::NONE,
        kernels::compress_blocks_fn(KernelId::Portable),
      )])
    }
  })
}

/// Resolve a `(mode, backend)` pair to a concrete kernel.
#[must_use]
pub(crate) fn resolve(mode: Mode, backend: Backend) -> Selected<CompressBlocksFn> {
  // Secure mode ignores the backend request entirely: the portable scalar
  // engine is the only kernel with the constant-time streaming contract.
  if mode == Mode::Secure {
    return kernel(KernelId::Portable);
  }

  let caps = platform::caps();
  match backend {
    Backend::Auto => auto_candidates(),
    Backend::Scalar | Backend::Gpu => kernel(KernelId::Portable),
    Backend::Simd => simd_kernel(caps).unwrap_or_else(|| kernel(KernelId::Portable)),
    Backend::ShaExt => sha_ext_kernel(caps)
      .or_else(|| simd_kernel(caps))
      .unwrap_or_else(|| kernel(KernelId::Portable)),
    Backend::Fpga => kernel(KernelId::FpgaPipeline),
    Backend::Jit => kernel(KernelId::Jit),
  }
}

fn simd_kernel(caps: Caps) -> Option<Selected<CompressBlocksFn>> {
  #[cfg(target_arch = "x86_64")]
  {
    kernel_if_available(KernelId::X86Sse41, caps)
  }
  #[cfg(target_arch = "aarch64")]
  {
    kernel_if_available(KernelId::Aarch64Neon, caps)
  }
  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    let _ = caps;
    None
  }
}

fn sha_ext_kernel(caps: Caps) -> Option<Selected<CompressBlocksFn>> {
  #[cfg(target_arch = "x86_64")]
  {
    kernel_if_available(KernelId::X86ShaExt, caps)
  }
  #[cfg(not(target_arch = "x86_64"))]
  {
    let _ = caps;
    None
  }
}

/// Whether a backend can run on this machine and build.
#[must_use]
pub fn backend_available(backend: Backend) -> bool {
  let caps = platform::caps();
  match backend {
    Backend::Auto | Backend::Scalar | Backend::Fpga | Backend::Jit => true,
    Backend::Simd => simd_kernel(caps).is_some(),
    Backend::ShaExt => sha_ext_kernel(caps).is_some(),
    // GPU kernels are unimplemented placeholders upstream.
    Backend::Gpu => false,
  }
}

/// Advisory throughput estimate in Gbit/s. Not measured; 0.0 when the
/// backend is unavailable.
#[must_use]
pub fn backend_performance_estimate(backend: Backend) -> f64 {
  if !backend_available(backend) {
    return 0.0;
  }
  match backend {
    Backend::Auto | Backend::Scalar => 2.7,
    Backend::Simd => 4.2,
    Backend::ShaExt => 5.6,
    Backend::Gpu => 50.0,
    Backend::Fpga => 12.8,
    Backend::Jit => 2.5,
  }
}
