//! GC-retrying allocation shim
//!
//! The four entry points the host runtime links against instead of the
//! standard allocator.  Each of allocate, zero-allocate, and resize
//! wraps its raw primitive with the same retry contract: one attempt,
//! one collection pass on failure, one more attempt, and whatever the
//! second attempt yields is the answer.  Release is a plain
//! pass-through.
//!
//! The collector is an injected capability rather than ambient global
//! state, so a host wires in its real garbage collector and tests wire
//! in a fake one.

use super::heap::{Address, RawAllocator};

/// The external garbage collector's reclamation entry point.
///
/// The shim only ever asks for at least one pass; nothing beyond "call
/// completed" is consumed from it.
pub trait Collector {
    fn collect(&mut self, min_passes: u32);
}

/// Allocation entry points with the one-collection-pass retry contract
pub struct ShimAllocator<A: RawAllocator, C: Collector> {
    raw: A,
    collector: C,
}

impl<A: RawAllocator, C: Collector> ShimAllocator<A, C> {
    pub fn new(raw: A, collector: C) -> Self {
        ShimAllocator { raw, collector }
    }

    /// Allocate `size` bytes.  `None` means the platform failed twice,
    /// with one collection pass in between.
    pub fn allocate(&mut self, size: usize) -> Option<Address> {
        if let Some(addr) = self.raw.raw_alloc(size) {
            return Some(addr);
        }
        self.collector.collect(1);
        self.raw.raw_alloc(size)
    }

    /// Allocate `count * elem_size` zero-filled bytes.
    ///
    /// The multiplication is checked: a product that does not fit in
    /// `usize` fails immediately, without a platform call and without a
    /// collection pass, since no reclamation can satisfy it.
    pub fn zero_allocate(&mut self, count: usize, elem_size: usize) -> Option<Address> {
        let size = count.checked_mul(elem_size)?;
        if let Some(addr) = self.raw.raw_zalloc(size) {
            return Some(addr);
        }
        self.collector.collect(1);
        self.raw.raw_zalloc(size)
    }

    /// Resize the block at `addr`, preserving contents up to the
    /// minimum of the old and new sizes.  The block may relocate.
    pub fn resize(&mut self, addr: Address, new_size: usize) -> Option<Address> {
        if let Some(new_addr) = self.raw.raw_resize(addr, new_size) {
            return Some(new_addr);
        }
        self.collector.collect(1);
        self.raw.raw_resize(addr, new_size)
    }

    /// Return `addr` to the platform allocator.  Never retries, never
    /// collects; double-release policy belongs to the platform.
    pub fn release(&mut self, addr: Address) {
        self.raw.raw_release(addr);
    }

    /// The wrapped raw allocator, for host bookkeeping.
    pub fn raw(&self) -> &A {
        &self.raw
    }

    pub fn raw_mut(&mut self) -> &mut A {
        &mut self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Raw allocator that fails a scripted number of times, then hands
    /// out sequential addresses.
    struct ScriptedAllocator {
        failures_left: u32,
        next: Address,
        calls: u32,
    }

    impl ScriptedAllocator {
        fn failing(times: u32) -> Self {
            ScriptedAllocator {
                failures_left: times,
                next: 0x1000,
                calls: 0,
            }
        }

        fn attempt(&mut self) -> Option<Address> {
            self.calls += 1;
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return None;
            }
            let addr = self.next;
            self.next += 0x10;
            Some(addr)
        }
    }

    impl RawAllocator for ScriptedAllocator {
        fn raw_alloc(&mut self, _size: usize) -> Option<Address> {
            self.attempt()
        }

        fn raw_zalloc(&mut self, _size: usize) -> Option<Address> {
            self.attempt()
        }

        fn raw_resize(&mut self, _addr: Address, _new_size: usize) -> Option<Address> {
            self.attempt()
        }

        fn raw_release(&mut self, _addr: Address) {}
    }

    type PassCount = std::rc::Rc<std::cell::Cell<u32>>;

    /// Collector that only counts how often it was asked to run.
    struct CountingCollector(PassCount);

    impl Collector for CountingCollector {
        fn collect(&mut self, min_passes: u32) {
            assert_eq!(min_passes, 1);
            self.0.set(self.0.get() + 1);
        }
    }

    fn counting_shim(
        failures: u32,
    ) -> (ShimAllocator<ScriptedAllocator, CountingCollector>, PassCount) {
        let passes: PassCount = Default::default();
        let shim = ShimAllocator::new(
            ScriptedAllocator::failing(failures),
            CountingCollector(passes.clone()),
        );
        (shim, passes)
    }

    #[test]
    fn test_first_attempt_success_skips_collection() {
        let (mut shim, passes) = counting_shim(0);
        assert!(shim.allocate(16).is_some());
        assert_eq!(passes.get(), 0);
        assert_eq!(shim.raw().calls, 1);
    }

    #[test]
    fn test_fail_once_retries_through_one_pass() {
        let (mut shim, passes) = counting_shim(1);
        assert!(shim.allocate(16).is_some());
        assert_eq!(passes.get(), 1);
        assert_eq!(shim.raw().calls, 2);
    }

    #[test]
    fn test_fail_twice_returns_failure_after_one_pass() {
        let (mut shim, passes) = counting_shim(2);
        assert!(shim.allocate(16).is_none());
        // Exactly one pass, not zero, not two; and no third attempt.
        assert_eq!(passes.get(), 1);
        assert_eq!(shim.raw().calls, 2);
    }

    #[test]
    fn test_zero_allocate_retry_contract() {
        let (mut shim, passes) = counting_shim(1);
        assert!(shim.zero_allocate(4, 8).is_some());
        assert_eq!(passes.get(), 1);
        assert_eq!(shim.raw().calls, 2);
    }

    #[test]
    fn test_zero_allocate_overflow_fails_without_platform_call() {
        let (mut shim, passes) = counting_shim(0);
        assert!(shim.zero_allocate(usize::MAX, 2).is_none());
        assert_eq!(passes.get(), 0);
        assert_eq!(shim.raw().calls, 0);
    }

    #[test]
    fn test_resize_retry_contract() {
        let (mut shim, passes) = counting_shim(2);
        assert!(shim.resize(0x1000, 64).is_none());
        assert_eq!(passes.get(), 1);
        assert_eq!(shim.raw().calls, 2);
    }

    #[test]
    fn test_release_never_collects() {
        let (mut shim, passes) = counting_shim(0);
        shim.release(0x1000);
        assert_eq!(passes.get(), 0);
        assert_eq!(shim.raw().calls, 0);
    }
}
