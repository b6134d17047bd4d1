//! Line assembly for the serial receiver
//!
//! Bytes are collected up to the newline terminator. A line that does not fit
//! in [`MAX_FRAME_LEN`] keeps its first bytes and is flagged, so it can be
//! rejected as a whole once its terminator arrives.

use heapless::Vec;

use bitlink_protocol::{MAX_FRAME_LEN, TERMINATOR};

/// One completed line, without its terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Blank line, ignored
    Empty,
    Frame(&'a [u8]),
    /// Line longer than [`MAX_FRAME_LEN`], truncated
    Overlong(&'a [u8]),
}

impl<'a> Line<'a> {
    /// The received bytes, empty for a blank line
    pub fn bytes(&self) -> &'a [u8] {
        match self {
            Line::Empty => &[],
            Line::Frame(bytes) | Line::Overlong(bytes) => bytes,
        }
    }
}

/// Accumulates bytes until a terminator
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8, MAX_FRAME_LEN>,
    overflow: bool,
}

impl LineBuffer {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflow: false,
        }
    }

    /// Feed one byte; returns true when it completes a line
    ///
    /// After a completed line, read it with [`LineBuffer::line`] and then
    /// call [`LineBuffer::reset`] before feeding more bytes.
    pub fn push(&mut self, byte: u8) -> bool {
        if byte == TERMINATOR {
            return true;
        }
        if self.buf.push(byte).is_err() {
            self.overflow = true;
        }
        false
    }

    /// The line collected so far, with a trailing CR removed
    pub fn line(&self) -> Line<'_> {
        let bytes = match self.buf.last() {
            Some(b'\r') => &self.buf[..self.buf.len() - 1],
            _ => &self.buf[..],
        };
        if self.overflow {
            Line::Overlong(bytes)
        } else if bytes.is_empty() {
            Line::Empty
        } else {
            Line::Frame(bytes)
        }
    }

    pub fn reset(&mut self) {
        self.buf.clear();
        self.overflow = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(buffer: &mut LineBuffer, bytes: &[u8]) -> bool {
        bytes.iter().any(|&b| buffer.push(b))
    }

    #[test]
    fn test_terminator_completes_line() {
        let mut buffer = LineBuffer::new();
        assert!(!feed(&mut buffer, b"P|"));
        assert!(buffer.push(b'\n'));
        assert_eq!(buffer.line(), Line::Frame(b"P|"));
    }

    #[test]
    fn test_crlf_stripped() {
        let mut buffer = LineBuffer::new();
        assert!(feed(&mut buffer, b"P|\r\n"));
        assert_eq!(buffer.line(), Line::Frame(b"P|"));
    }

    #[test]
    fn test_blank_lines() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push(b'\n'));
        assert_eq!(buffer.line(), Line::Empty);
        assert!(feed(&mut buffer, b"\r\n"));
        assert_eq!(buffer.line(), Line::Empty);
        assert!(buffer.line().bytes().is_empty());
    }

    #[test]
    fn test_full_length_line_fits() {
        let mut buffer = LineBuffer::new();
        feed(&mut buffer, &[b'x'; MAX_FRAME_LEN]);
        assert_eq!(buffer.line(), Line::Frame(&[b'x'; MAX_FRAME_LEN]));
    }

    #[test]
    fn test_overlong_line_truncated() {
        let mut buffer = LineBuffer::new();
        feed(&mut buffer, &[b'x'; MAX_FRAME_LEN + 1]);
        assert_eq!(buffer.line(), Line::Overlong(&[b'x'; MAX_FRAME_LEN]));
    }

    #[test]
    fn test_reset_clears_overflow() {
        let mut buffer = LineBuffer::new();
        feed(&mut buffer, &[b'x'; MAX_FRAME_LEN + 10]);
        buffer.reset();
        feed(&mut buffer, b"S|");
        assert_eq!(buffer.line(), Line::Frame(b"S|"));
    }
}
