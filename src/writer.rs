//! Formatted-string writer shims
//!
//! The host supplies one core formatting routine; these entry points
//! only differ in how the output is bounded.  The original's unbounded
//! variant passed an effectively unlimited size sentinel into a raw
//! buffer; here both variants append into a growable buffer, and the
//! bounded one truncates afterwards while still reporting the byte
//! count the full rendering needs, so callers can detect truncation and
//! size a retry.
//!
//! This crate's only obligation to the core formatter is a correct
//! float-to-string conversion ([`crate::convert::format_double`]) when
//! it renders `%g`/`%f`/`%e`-class conversions.

/// One formatted argument, the stand-in for the C argument list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    Int(i64),
    Uint(u64),
    Double(f64),
    Str(&'a str),
    Char(u8),
}

/// The externally supplied core formatting routine.
pub trait CoreFormatter {
    /// Append the full rendering of `format` with `args` to `out` and
    /// return the number of bytes appended.
    fn format_into(&mut self, out: &mut String, format: &str, args: &[Arg<'_>]) -> usize;
}

/// Unbounded write: the buffer grows as needed.  Returns the number of
/// bytes appended.
pub fn write_formatted<F: CoreFormatter>(
    fmt: &mut F,
    out: &mut String,
    format: &str,
    args: &[Arg<'_>],
) -> usize {
    fmt.format_into(out, format, args)
}

/// Bounded write: at most `limit` bytes are appended to `out`.  Returns
/// the byte count the untruncated rendering needs, which exceeds `limit`
/// exactly when truncation happened.
pub fn write_formatted_bounded<F: CoreFormatter>(
    fmt: &mut F,
    out: &mut String,
    limit: usize,
    format: &str,
    args: &[Arg<'_>],
) -> usize {
    let start = out.len();
    let needed = fmt.format_into(out, format, args);
    if out.len() > start + limit {
        // Truncation must not split a UTF-8 sequence.
        let mut end = start + limit;
        while !out.is_char_boundary(end) {
            end -= 1;
        }
        out.truncate(end);
    }
    needed
}
