//! Fatal-abort shim
//!
//! The platform provides no standard abort.  On the device the shim
//! writes through a near-null address so the resulting hardware
//! exception drops an attached debugger at the faulting frame; hosted
//! builds substitute the process-abort primitive.  Either way the call
//! never returns, and callers reach for it only on conditions they have
//! already judged unrecoverable; nothing in this crate invokes it
//! internally.

/// Halt execution immediately.  Never returns.
pub fn fatal_abort() -> ! {
    std::process::abort()
}
