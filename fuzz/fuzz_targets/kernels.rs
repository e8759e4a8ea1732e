//! Kernel cross-verification: every kernel the CPU can run must agree.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sha256_90r::kernels::kernel_test;

fuzz_target!(|data: &[u8]| {
  // The pipeline model costs ~180x scalar per block; keep inputs bounded.
  if data.len() > 4096 {
    return;
  }
  kernel_test::verify_kernels(data).expect("kernels must agree");
});
