//! Lazy one-time caches for dispatch resolutions.

#[cfg(target_has_atomic = "8")]
use core::{cell::UnsafeCell, mem::MaybeUninit, sync::atomic::AtomicU8};

/// A process-wide cache holding one lazily computed `Copy` value.
///
/// Semantics match `std::sync::OnceLock::get_or_init` but the implementation
/// is an atomic state machine, so it works identically on `no_std` targets
/// with atomics. On the rare target without atomic support the value is
/// recomputed per call (single-threaded embedded, where that is acceptable).
pub struct OnceCache<T: Copy> {
  #[cfg(target_has_atomic = "8")]
  state: AtomicU8,
  #[cfg(target_has_atomic = "8")]
  value: UnsafeCell<MaybeUninit<T>>,

  #[cfg(not(target_has_atomic = "8"))]
  _marker: core::marker::PhantomData<*const T>,
}

// SAFETY: initialization is guarded by the atomic state machine; after the
// READY store with Release ordering, the value is never written again and
// readers synchronize through the Acquire load.
#[allow(unsafe_code)]
#[cfg(target_has_atomic = "8")]
unsafe impl<T: Copy + Send + Sync> Send for OnceCache<T> {}
#[allow(unsafe_code)]
#[cfg(target_has_atomic = "8")]
unsafe impl<T: Copy + Send + Sync> Sync for OnceCache<T> {}

// SAFETY: targets without atomics are single-threaded.
#[allow(unsafe_code)]
#[cfg(not(target_has_atomic = "8"))]
unsafe impl<T: Copy + Send + Sync> Send for OnceCache<T> {}
#[allow(unsafe_code)]
#[cfg(not(target_has_atomic = "8"))]
unsafe impl<T: Copy + Send + Sync> Sync for OnceCache<T> {}

impl<T: Copy> OnceCache<T> {
  #[cfg(target_has_atomic = "8")]
  const UNINIT: u8 = 0;
  #[cfg(target_has_atomic = "8")]
  const INITING: u8 = 1;
  #[cfg(target_has_atomic = "8")]
  const READY: u8 = 2;

  /// Create a new empty cache.
  #[must_use]
  pub const fn new() -> Self {
    Self {
      #[cfg(target_has_atomic = "8")]
      state: AtomicU8::new(Self::UNINIT),
      #[cfg(target_has_atomic = "8")]
      value: UnsafeCell::new(MaybeUninit::uninit()),

      #[cfg(not(target_has_atomic = "8"))]
      _marker: core::marker::PhantomData,
    }
  }

  /// Get the cached value, initializing with `f` if not yet set.
  ///
  /// The initializer runs at most once per process (on atomic targets);
  /// concurrent first callers spin until the winner publishes.
  #[inline]
  pub fn get_or_init(&self, f: impl FnOnce() -> T) -> T {
    #[cfg(target_has_atomic = "8")]
    {
      use core::sync::atomic::Ordering;

      if self.state.load(Ordering::Acquire) == Self::READY {
        // SAFETY: value is initialized once state is READY.
        #[allow(unsafe_code)]
        return unsafe { (*self.value.get()).assume_init() };
      }

      if self
        .state
        .compare_exchange(Self::UNINIT, Self::INITING, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
      {
        let value = f();
        // SAFETY: we hold exclusive access while in the INITING state.
        #[allow(unsafe_code)]
        unsafe {
          (*self.value.get()).write(value);
        }
        self.state.store(Self::READY, Ordering::Release);
        return value;
      }

      while self.state.load(Ordering::Acquire) != Self::READY {
        core::hint::spin_loop();
      }
      // SAFETY: value is initialized once state is READY.
      #[allow(unsafe_code)]
      unsafe {
        (*self.value.get()).assume_init()
      }
    }

    #[cfg(not(target_has_atomic = "8"))]
    {
      f()
    }
  }
}

impl<T: Copy> Default for OnceCache<T> {
  fn default() -> Self {
    Self::new()
  }
}
