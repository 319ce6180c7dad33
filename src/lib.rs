//! # Introduction
//!
//! `hostlibc` is the libc-replacement layer a memory-constrained embedded
//! scripting host needs when the platform toolchain cannot link the full
//! standard library.  Two constraints drive it: some standard math and
//! formatting routines live in a fast/cached code region the firmware
//! cannot afford to fill, and dynamic allocation failure must trigger a
//! garbage-collection retry instead of aborting the device.
//!
//! ## Call flow
//!
//! ```text
//! host runtime ──▶ alloc (GC-retrying shim) ──▶ platform raw allocator
//!       │                    │
//!       │                    └──▶ external collector (one pass on pressure)
//!       ├──▶ writer ──▶ host core formatter ──▶ convert::format_double
//!       └──▶ convert::parse_double (textual numeric literals)
//! ```
//!
//! 1. [`convert`] — string-to-double parsing and `%g`-style
//!    double-to-string formatting, built on power/log helpers that avoid
//!    the platform's restricted math primitives.
//! 2. [`alloc`] — allocate/zero-allocate/resize/release shims wrapping
//!    the platform's raw allocator, retrying exactly once through an
//!    injected garbage-collection callback on failure.
//! 3. [`writer`] — bounded and unbounded formatted-write entry points
//!    delegating to an externally supplied core formatter.
//! 4. [`errno`] — fixed error-code descriptions in place of the libc
//!    description table.
//! 5. [`fault`] — the never-returning fatal-abort shim.
//!
//! ## Error policy
//!
//! Everything recoverable travels as a return value: allocation failure
//! is absence-of-block, a malformed numeric literal simply stops the
//! parser at the first unrecognized byte.  Nothing here unwinds; the
//! target firmware has no unwinding support.

pub mod alloc;
pub mod convert;
pub mod errno;
pub mod fault;
pub mod writer;
