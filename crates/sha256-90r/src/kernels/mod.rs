//! Kernel registry.
//!
//! Each kernel implements the uniform [`CompressBlocksFn`] contract: fold a
//! run of complete 64-byte blocks into the 8-word state, bit-identically to
//! the portable scalar engine.

#[cfg(target_arch = "aarch64")]
mod aarch64;
pub(crate) mod portable;
#[cfg(target_arch = "x86_64")]
mod x86_64;


use platform::Caps;

/// Uniform kernel signature: compress a run of complete blocks into `state`.
pub type CompressBlocksFn = fn(&mut [u32; 8], &[u8]);

/// Identifies one concrete implementation of the round engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum KernelId {
  /// Portable scalar engine (always available).
  Portable = 0,
  /// Vectorized message expansion, x86_64.
  #[cfg(target_arch = "x86_64")]
  X86Sse41 = 1,
  /// SHA-NI hybrid: hardware rounds 0..64, software extension rounds.
  #[cfg(target_arch = "x86_64")]
  X86ShaExt = 2,
  /// Vectorized message expansion, aarch64.
  #[cfg(target_arch = "aarch64")]
  Aarch64Neon = 3,
  /// 90-stage pipeline behavioral model.
  FpgaPipeline = 4,
  /// Runtime-specialized dispatch (resolves to the best concrete kernel once).
  Jit = 5,
}

/// Every kernel this build knows about.
#[cfg(target_arch = "x86_64")]
pub const ALL: &[KernelId] = &[
  KernelId::Portable,
  KernelId::X86Sse41,
  KernelId::X86ShaExt,
  KernelId::FpgaPipeline,
  KernelId::Jit,
];
#[cfg(target_arch = "aarch64")]
pub const ALL: &[KernelId] = &[
  KernelId::Portable,
  KernelId::Aarch64Neon,
  KernelId::FpgaPipeline,
  KernelId::Jit,
];
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub const ALL: &[KernelId] = &[KernelId::Portable, KernelId::FpgaPipeline, KernelId::Jit];

impl KernelId {
  #[inline]
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Portable => "portable",
      #[cfg(target_arch = "x86_64")]
      Self::X86Sse41 => "x86_64/sse41",
      #[cfg(target_arch = "x86_64")]
      Self::X86ShaExt => "x86_64/sha-ext",
      #[cfg(target_arch = "aarch64")]
      Self::Aarch64Neon => "aarch64/neon",
      Self::FpgaPipeline => "fpga-pipeline",
      Self::Jit => "jit",
    }
  }
}

/// CPU capabilities a kernel needs before dispatch may select it.
#[inline]
#[must_use]
pub const fn required_caps(id: KernelId) -> Caps {
  match id {
    KernelId::Portable => Caps::NONE,
    #[cfg(target_arch = "x86_64")]
    KernelId::X86Sse41 => platform::caps::x86::SIMD_READY,
    #[cfg(target_arch = "x86_64")]
    KernelId::X86ShaExt => platform::caps::x86::SHA_EXT_READY,
    #[cfg(target_arch = "aarch64")]
    KernelId::Aarch64Neon => platform::caps::aarch64::SIMD_READY,
    // Software models: no hardware requirements.
    KernelId::FpgaPipeline | KernelId::Jit => Caps::NONE,
  }
}

/// The function implementing a kernel.
#[must_use]
pub fn compress_blocks_fn(id: KernelId) -> CompressBlocksFn {
  match id {
    KernelId::Portable => portable::compress_blocks,
    #[cfg(target_arch = "x86_64")]
    KernelId::X86Sse41 => x86_64::compress_blocks_sse41,
    #[cfg(target_arch = "x86_64")]
    KernelId::X86ShaExt => x86_64::compress_blocks_sha_ext,
    #[cfg(target_arch = "aarch64")]
    KernelId::Aarch64Neon => aarch64::compress_blocks_neon,
    KernelId::FpgaPipeline => crate::fpga::compress_blocks_fpga,
    KernelId::Jit => crate::jit::compress_blocks_jit,
  }
}

#[must_use]
pub fn id_from_name(name: &str) -> Option<KernelId> {
  ALL.iter().copied().find(|id| id.as_str() == name)
}
