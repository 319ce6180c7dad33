//! String-to-double parser
//!
//! Converts textual numeric literals the way the host's value-parsing
//! pathway expects: leading whitespace skipped, optional sign, then one
//! of four digit forms (`0x` hexadecimal, `0b` binary, bare-leading-`0`
//! octal, or decimal with an optional fraction).  No exponent notation.
//!
//! The parser never fails.  Any unrecognized byte ends the number, and
//! the best value accumulated so far is returned together with how many
//! bytes were consumed; callers needing strictness compare the consumed
//! count against the input length themselves.

/// Result of a [`parse_double`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedDouble {
    /// Parsed value; `0.0` when no digits were consumed.
    pub value: f64,
    /// Bytes consumed, pointing one byte past the last numeric character.
    pub consumed: usize,
}

/// Parse a double from the front of `input`.
///
/// The slice end plays the role of the C string's null terminator, and
/// the `consumed` count replaces the remainder out-pointer.
pub fn parse_double(input: &[u8]) -> ParsedDouble {
    Cursor::new(input).run()
}

/// Convenience wrapper for UTF-8 callers.
pub fn parse_double_str(input: &str) -> ParsedDouble {
    parse_double(input.as_bytes())
}

/// Read position into the input; advances monotonically, never rewinds.
struct Cursor<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a [u8]) -> Self {
        Cursor { input, position: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn run(mut self) -> ParsedDouble {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.advance();
        }

        // Only whitespace (or nothing): tolerant zero, not an error.
        if self.peek().is_none() {
            return ParsedDouble {
                value: 0.0,
                consumed: self.position,
            };
        }

        let mut sign = 1.0;
        match self.peek() {
            Some(b'-') => {
                sign = -1.0;
                self.advance();
            }
            Some(b'+') => self.advance(),
            _ => {}
        }

        let mut result = 0.0;
        // Fractional digits scale through one division at the end:
        // 225 / 100 is exact where repeated 0.1 multiplies are not.
        let mut divisor = 1.0;

        if self.peek() == Some(b'0') && matches!(self.peek_next(), Some(b'x') | Some(b'X')) {
            self.advance();
            self.advance();
            while let Some(d) = self.peek().and_then(hex_digit) {
                result = result * 16.0 + f64::from(d);
                self.advance();
            }
        } else if self.peek() == Some(b'0') && self.peek_next() == Some(b'b') {
            self.advance();
            self.advance();
            while let Some(c @ (b'0' | b'1')) = self.peek() {
                result = result * 2.0 + f64::from(c - b'0');
                self.advance();
            }
        } else if self.peek() == Some(b'0') {
            self.advance();
            while let Some(c @ b'0'..=b'7') = self.peek() {
                result = result * 8.0 + f64::from(c - b'0');
                self.advance();
            }
        } else {
            let mut decimals = false;
            while let Some(c) = self.peek() {
                if c == b'.' {
                    decimals = true;
                    self.advance();
                    continue;
                }
                if !c.is_ascii_digit() {
                    break;
                }
                result = result * 10.0 + f64::from(c - b'0');
                if decimals {
                    divisor *= 10.0;
                }
                self.advance();
            }
        }

        ParsedDouble {
            value: sign * (result / divisor),
            consumed: self.position,
        }
    }
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(10 + c - b'a'),
        b'A'..=b'F' => Some(10 + c - b'A'),
        _ => None,
    }
}
