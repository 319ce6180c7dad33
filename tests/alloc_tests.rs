use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hostlibc::alloc::{Address, Collector, PlatformHeap, RawAllocator, ShimAllocator};

/// Collector that behaves like the real host GC: on a pass it releases
/// the blocks the host marked reclaimable, out of the same shared heap
/// the allocator draws from.
struct FakeGc {
    heap: Rc<RefCell<PlatformHeap>>,
    reclaimable: RefCell<Vec<Address>>,
    passes: Cell<u32>,
}

impl FakeGc {
    fn new(heap: Rc<RefCell<PlatformHeap>>) -> Rc<Self> {
        Rc::new(FakeGc {
            heap,
            reclaimable: RefCell::new(Vec::new()),
            passes: Cell::new(0),
        })
    }

    fn mark_reclaimable(&self, addr: Address) {
        self.reclaimable.borrow_mut().push(addr);
    }
}

/// Local handle the shim holds onto; the trait cannot go straight onto
/// `Rc<FakeGc>` from outside the crate that owns it.
struct GcHandle(Rc<FakeGc>);

impl Collector for GcHandle {
    fn collect(&mut self, min_passes: u32) {
        assert_eq!(min_passes, 1);
        self.0.passes.set(self.0.passes.get() + 1);
        for addr in self.0.reclaimable.borrow_mut().drain(..) {
            self.0.heap.borrow_mut().release(addr).unwrap();
        }
    }
}

fn shim_with_gc(
    capacity: usize,
) -> (
    ShimAllocator<Rc<RefCell<PlatformHeap>>, GcHandle>,
    Rc<RefCell<PlatformHeap>>,
    Rc<FakeGc>,
) {
    let heap = Rc::new(RefCell::new(PlatformHeap::new(capacity)));
    let gc = FakeGc::new(heap.clone());
    let shim = ShimAllocator::new(heap.clone(), GcHandle(gc.clone()));
    (shim, heap, gc)
}

#[test]
fn test_collection_rescues_exhausted_heap() {
    let (mut shim, heap, gc) = shim_with_gc(64);

    let hog = shim.allocate(48).expect("first allocation fits");
    gc.mark_reclaimable(hog);

    // 32 bytes no longer fit; one collection pass frees the hog and the
    // retry succeeds.
    let addr = shim.allocate(32).expect("retry after collection succeeds");
    assert_eq!(gc.passes.get(), 1);
    assert_eq!(heap.borrow().block_size(addr), Some(32));
    assert_eq!(heap.borrow().total_allocated(), 32);
}

#[test]
fn test_exhaustion_with_nothing_reclaimable_fails_once_collected() {
    let (mut shim, heap, gc) = shim_with_gc(64);

    let keep = shim.allocate(48).expect("first allocation fits");

    assert_eq!(shim.allocate(32), None);
    assert_eq!(gc.passes.get(), 1);
    // The caller observes request-local failure; existing state is
    // untouched.
    assert_eq!(heap.borrow().block_size(keep), Some(48));
    assert_eq!(heap.borrow().total_allocated(), 48);
}

#[test]
fn test_zero_allocate_is_zero_filled_through_retry() {
    let (mut shim, heap, gc) = shim_with_gc(64);

    let hog = shim.allocate(60).unwrap();
    gc.mark_reclaimable(hog);

    let addr = shim.zero_allocate(8, 4).expect("zalloc retried");
    assert_eq!(gc.passes.get(), 1);
    assert_eq!(heap.borrow().read(addr, 0, 32).unwrap(), &[0u8; 32]);
}

#[test]
fn test_resize_preserves_contents_through_retry() {
    let (mut shim, heap, gc) = shim_with_gc(64);

    let block = shim.allocate(16).unwrap();
    heap.borrow_mut().write(block, 0, b"0123456789abcdef").unwrap();

    let hog = shim.allocate(40).unwrap();
    gc.mark_reclaimable(hog);

    let grown = shim.resize(block, 48).expect("resize retried");
    assert_eq!(gc.passes.get(), 1);
    assert_eq!(heap.borrow().read(grown, 0, 16).unwrap(), b"0123456789abcdef");
}

#[test]
fn test_release_has_no_observable_side_effects() {
    let (mut shim, heap, gc) = shim_with_gc(64);

    let a = shim.allocate(16).unwrap();
    shim.release(a);
    assert_eq!(gc.passes.get(), 0);
    assert_eq!(heap.borrow().total_allocated(), 0);

    // Subsequent allocations are unaffected.
    let b = shim.allocate(16).unwrap();
    assert_eq!(gc.passes.get(), 0);
    assert_eq!(heap.borrow().block_size(b), Some(16));
}

#[test]
fn test_zero_allocate_overflow_never_reaches_collector() {
    let (mut shim, _heap, gc) = shim_with_gc(64);
    assert_eq!(shim.zero_allocate(usize::MAX / 2, 3), None);
    assert_eq!(gc.passes.get(), 0);
}

#[test]
fn test_shared_handle_allocator_sees_one_heap() {
    let heap = Rc::new(RefCell::new(PlatformHeap::new(128)));
    let mut handle_a = heap.clone();
    let mut handle_b = heap.clone();

    let a = handle_a.raw_alloc(32).unwrap();
    assert_eq!(heap.borrow().total_allocated(), 32);
    handle_b.raw_release(a);
    assert_eq!(heap.borrow().total_allocated(), 0);
}
