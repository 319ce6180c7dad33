//! Allocation layer
//!
//! This module provides the dynamic-memory surface the host runtime
//! links against:
//! - [`heap`]: the [`heap::RawAllocator`] seam over the platform's raw
//!   allocator primitives, plus [`heap::PlatformHeap`], an in-process
//!   simulation of the device heap used in hosted builds and tests
//! - [`shim`]: the four GC-retrying entry points (allocate,
//!   zero-allocate, resize, release) wrapping any [`heap::RawAllocator`]
//!
//! # Retry contract
//!
//! Allocate, zero-allocate, and resize call the raw primitive once; on
//! failure they run exactly one collection pass through the injected
//! [`shim::Collector`] and retry exactly once more, returning whatever
//! the second attempt yields.  Release never retries and never collects.
//! Worst case is therefore two allocation attempts plus one collection
//! pass, keeping latency bounded under sustained memory pressure.
//!
//! # Ownership
//!
//! A returned [`heap::Address`] is owned by the caller, who is solely
//! responsible for eventually passing it to release.

pub mod heap;
pub mod shim;

pub use heap::{Address, HeapError, PlatformHeap, RawAllocator, HEAP_ADDRESS_START};
pub use shim::{Collector, ShimAllocator};
