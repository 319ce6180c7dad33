//! Error-description shim
//!
//! The libc description table costs a couple of kilobytes of RAM the
//! platform cannot spare, and the host's own storage stack reports
//! error codes libc has no text for anyway.  So every code gets the
//! same fixed rendering, truncated to the width of the original's
//! static buffer.

/// Widest rendering the original static buffer could hold.
pub const MESSAGE_CAPACITY: usize = 14;

/// Render an error code as `err: <code>`, truncated to
/// [`MESSAGE_CAPACITY`] bytes.
pub fn describe(errnum: i32) -> String {
    let mut message = format!("err: {errnum}");
    message.truncate(MESSAGE_CAPACITY);
    message
}
