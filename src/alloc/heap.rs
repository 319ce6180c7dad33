//! Simulated platform heap
//!
//! On the device the four raw primitives are the platform SDK's
//! allocator, wrapped one-to-one by the shim layer.  This module defines
//! that seam as the [`RawAllocator`] trait and provides [`PlatformHeap`],
//! an in-process implementation with:
//! - A block table keyed by virtual address
//! - A byte-budget ceiling that makes allocation pressure reproducible
//! - Poison-fill for plain allocations, zero-fill for zeroed ones
//! - Content-preserving, relocating resize
//!
//! Failure at the [`RawAllocator`] boundary is absence-of-block, the
//! moral equivalent of a NULL return.  `PlatformHeap`'s inherent methods
//! return [`HeapError`] with context for diagnostics; the trait impl
//! flattens that to `None`.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Virtual address of a heap block.
pub type Address = u64;

/// Heap addresses start at the reference platform's user-DRAM base so
/// they are recognizable in diagnostics.
pub const HEAP_ADDRESS_START: Address = 0x3FFE_8000;

/// Fill pattern for plain (non-zeroed) allocations, so reads of memory
/// the caller never wrote are conspicuous.
pub const POISON_BYTE: u8 = 0xA5;

/// The platform's raw allocator primitives.
///
/// `None` is the failure indicator; the shim layer decides whether a
/// failure is worth a collection pass.  Double or invalid release is
/// this layer's own policy, not the shim's.
pub trait RawAllocator {
    fn raw_alloc(&mut self, size: usize) -> Option<Address>;
    fn raw_zalloc(&mut self, size: usize) -> Option<Address>;
    fn raw_resize(&mut self, addr: Address, new_size: usize) -> Option<Address>;
    fn raw_release(&mut self, addr: Address);
}

/// Errors from the simulated heap's inherent API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeapError {
    /// Byte budget exhausted
    OutOfMemory {
        requested: usize,
        allocated: usize,
        limit: usize,
    },

    /// Address does not name a live block (never allocated, or already
    /// released)
    InvalidBlock { address: Address },

    /// Access past the end of a block
    OutOfBounds {
        address: Address,
        offset: usize,
        len: usize,
        size: usize,
    },
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::OutOfMemory {
                requested,
                allocated,
                limit,
            } => {
                write!(
                    f,
                    "Out of memory: requested {} bytes, {} already allocated, limit is {}",
                    requested, allocated, limit
                )
            }
            HeapError::InvalidBlock { address } => {
                write!(f, "Invalid block: address 0x{:x} is not live", address)
            }
            HeapError::OutOfBounds {
                address,
                offset,
                len,
                size,
            } => {
                write!(
                    f,
                    "Out of bounds: {} bytes at offset {} in block 0x{:x} of size {}",
                    len, offset, address, size
                )
            }
        }
    }
}

impl std::error::Error for HeapError {}

#[derive(Debug, Clone)]
struct HeapBlock {
    data: Vec<u8>,
}

/// In-process stand-in for the device heap
#[derive(Debug, Clone)]
pub struct PlatformHeap {
    blocks: FxHashMap<Address, HeapBlock>,
    next_address: Address,
    total_allocated: usize,
    capacity: usize,
}

impl PlatformHeap {
    /// Create a heap with a byte-budget ceiling.
    pub fn new(capacity: usize) -> Self {
        PlatformHeap {
            blocks: FxHashMap::default(),
            next_address: HEAP_ADDRESS_START,
            total_allocated: 0,
            capacity,
        }
    }

    /// Allocate a poison-filled block.
    pub fn allocate(&mut self, size: usize) -> Result<Address, HeapError> {
        self.insert_block(size, POISON_BYTE)
    }

    /// Allocate a zero-filled block.
    pub fn zero_allocate(&mut self, size: usize) -> Result<Address, HeapError> {
        self.insert_block(size, 0)
    }

    /// Resize a block, relocating it and preserving contents up to
    /// `min(old, new)`.  On failure the original block is left intact.
    pub fn resize(&mut self, addr: Address, new_size: usize) -> Result<Address, HeapError> {
        let old = self
            .blocks
            .remove(&addr)
            .ok_or(HeapError::InvalidBlock { address: addr })?;
        let old_size = old.data.len();

        if new_size > self.capacity.saturating_sub(self.total_allocated - old_size) {
            let err = HeapError::OutOfMemory {
                requested: new_size,
                allocated: self.total_allocated,
                limit: self.capacity,
            };
            self.blocks.insert(addr, old);
            return Err(err);
        }

        let keep = old_size.min(new_size);
        let mut data = vec![POISON_BYTE; new_size];
        data[..keep].copy_from_slice(&old.data[..keep]);

        let new_addr = self.next_address;
        self.next_address += new_size.max(1) as Address;
        self.total_allocated = self.total_allocated - old_size + new_size;
        self.blocks.insert(new_addr, HeapBlock { data });
        Ok(new_addr)
    }

    /// Return a block to the heap.
    pub fn release(&mut self, addr: Address) -> Result<(), HeapError> {
        match self.blocks.remove(&addr) {
            Some(block) => {
                self.total_allocated -= block.data.len();
                Ok(())
            }
            None => Err(HeapError::InvalidBlock { address: addr }),
        }
    }

    /// Total live bytes.
    pub fn total_allocated(&self) -> usize {
        self.total_allocated
    }

    /// Byte-budget ceiling.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Size of a live block, if `addr` names one.
    pub fn block_size(&self, addr: Address) -> Option<usize> {
        self.blocks.get(&addr).map(|b| b.data.len())
    }

    /// Read bytes out of a live block.
    pub fn read(&self, addr: Address, offset: usize, len: usize) -> Result<&[u8], HeapError> {
        let block = self
            .blocks
            .get(&addr)
            .ok_or(HeapError::InvalidBlock { address: addr })?;
        // checked_add keeps an adversarial offset from wrapping the
        // bounds comparison.
        let end = match offset.checked_add(len) {
            Some(end) if end <= block.data.len() => end,
            _ => {
                return Err(HeapError::OutOfBounds {
                    address: addr,
                    offset,
                    len,
                    size: block.data.len(),
                })
            }
        };
        Ok(&block.data[offset..end])
    }

    /// Write bytes into a live block.
    pub fn write(&mut self, addr: Address, offset: usize, bytes: &[u8]) -> Result<(), HeapError> {
        let block = self
            .blocks
            .get_mut(&addr)
            .ok_or(HeapError::InvalidBlock { address: addr })?;
        let end = match offset.checked_add(bytes.len()) {
            Some(end) if end <= block.data.len() => end,
            _ => {
                return Err(HeapError::OutOfBounds {
                    address: addr,
                    offset,
                    len: bytes.len(),
                    size: block.data.len(),
                })
            }
        };
        block.data[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    fn insert_block(&mut self, size: usize, fill: u8) -> Result<Address, HeapError> {
        // Saturating arithmetic keeps absurd requests from overflowing
        // the budget check.
        if size > self.capacity.saturating_sub(self.total_allocated) {
            return Err(HeapError::OutOfMemory {
                requested: size,
                allocated: self.total_allocated,
                limit: self.capacity,
            });
        }
        let addr = self.next_address;
        // Zero-size blocks still get distinct addresses.
        self.next_address += size.max(1) as Address;
        self.blocks.insert(addr, HeapBlock { data: vec![fill; size] });
        self.total_allocated += size;
        Ok(addr)
    }
}

impl RawAllocator for PlatformHeap {
    fn raw_alloc(&mut self, size: usize) -> Option<Address> {
        self.allocate(size).ok()
    }

    fn raw_zalloc(&mut self, size: usize) -> Option<Address> {
        self.zero_allocate(size).ok()
    }

    fn raw_resize(&mut self, addr: Address, new_size: usize) -> Option<Address> {
        self.resize(addr, new_size).ok()
    }

    fn raw_release(&mut self, addr: Address) {
        // Invalid release is tolerated at the raw boundary, matching a
        // platform allocator that accepts free(NULL)-style calls.
        let _ = self.release(addr);
    }
}

// The target runs cooperative, single-threaded firmware: the host and
// its collector share one heap through a non-atomic handle.
impl RawAllocator for Rc<RefCell<PlatformHeap>> {
    fn raw_alloc(&mut self, size: usize) -> Option<Address> {
        self.borrow_mut().allocate(size).ok()
    }

    fn raw_zalloc(&mut self, size: usize) -> Option<Address> {
        self.borrow_mut().zero_allocate(size).ok()
    }

    fn raw_resize(&mut self, addr: Address, new_size: usize) -> Option<Address> {
        self.borrow_mut().resize(addr, new_size).ok()
    }

    fn raw_release(&mut self, addr: Address) {
        let _ = self.borrow_mut().release(addr);
    }
}
