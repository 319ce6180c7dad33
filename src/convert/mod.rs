//! Numeric conversion layer
//!
//! This module provides the two conversions the host's printf emulation
//! and literal parser need:
//! - [`parse`]: string-to-double parser for textual numeric literals
//!   (hex, binary, octal, and decimal-with-fraction)
//! - [`format`]: `%g`-style double-to-string formatter
//! - [`math`]: power-of-ten and base-10 logarithm helpers derived from
//!   `exp`/`ln`, because the platform keeps `pow` and `log10` in a code
//!   region the firmware cannot afford
//!
//! # Numeric texture
//!
//! Neither direction is a shortest-round-trip converter.  The parser
//! accumulates digit-by-digit and loses precision to double rounding on
//! long inputs; the formatter extracts digits by flooring, never by
//! rounding to nearest.  Callers in the host depend on exactly this
//! behavior, so both sides keep it.

pub mod format;
pub mod math;
pub mod parse;

pub use format::{format_double, DEFAULT_PRECISION};
pub use parse::{parse_double, parse_double_str, ParsedDouble};
