//! Frame buffer with independent read and write cursors.
//!
//! A [`Message`] is either a borrowed, read-only view over bytes owned by
//! someone else (inbound lines) or an owned, fixed-size buffer that can be
//! written until it is finalized (outbound events, and private copies handed
//! to deferred jobs).
//!
//! Invariant: `0 <= read <= write <= capacity <= MAX_FRAME_LEN`.
//!
//! Field layout:
//! - hex byte: two hex digits, MSB first, followed by `|`
//! - hex word: four hex digits, MSB first, followed by `|`
//! - string: hex length byte, raw characters, `|` (no separator after the length)
//! - image: five raw base-36 characters, `|`
//!
//! The end of the frame stands in for the separator of the last field.

use crate::ascii::{hex_pair, hex_value};
use crate::image::{Image, IMAGE_SIZE};

/// Largest frame the board accepts or produces (excluding the terminator)
pub const MAX_FRAME_LEN: usize = 128;

/// Field separator
pub const SEPARATOR: u8 = b'|';

/// Line terminator appended by [`Message::finalize`]
pub const TERMINATOR: u8 = b'\n';

/// Errors raised while reading fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Read cursor reached the end of the frame
    Exhausted,
    /// Field was not followed by a separator
    MissingSeparator,
    /// Literal byte did not match
    Mismatch,
    /// Character is not a hex digit
    InvalidDigit,
    /// String length prefix runs past the end of the frame
    LengthOverrun,
    /// Frame is too long to be copied into an owned buffer
    FrameTooLong,
}

/// Errors raised while writing fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteError {
    /// Borrowed views are read-only
    ReadOnly,
    /// Message was already finalized
    Finalized,
    /// Not enough room left for the field
    BufferFull,
}

enum Storage<'a> {
    Borrowed(&'a [u8]),
    Owned {
        // One extra byte holds the terminator
        bytes: [u8; MAX_FRAME_LEN + 1],
        finalized: bool,
    },
}

/// A protocol frame with read and write cursors
pub struct Message<'a> {
    storage: Storage<'a>,
    capacity: usize,
    read: usize,
    write: usize,
}

/// A message that owns its bytes and can outlive the frame it was copied from
pub type OwnedMessage = Message<'static>;

impl<'a> Message<'a> {
    /// Wrap externally owned bytes for reading
    ///
    /// Capacity and write cursor both equal `bytes.len()`.
    pub fn borrowed(bytes: &'a [u8]) -> Self {
        Self {
            storage: Storage::Borrowed(bytes),
            capacity: bytes.len(),
            read: 0,
            write: bytes.len(),
        }
    }

    /// Shallow copy: a new borrowed view over this message's bytes
    ///
    /// The view starts reading at the beginning and is valid only as long as
    /// `self` lives.
    pub fn view(&self) -> Message<'_> {
        Message::borrowed(self.as_bytes())
    }

    /// Deep copy into an owned buffer, read cursor rewound
    ///
    /// Fails with [`ParseError::FrameTooLong`] if the contents do not fit an
    /// owned buffer.
    pub fn deep_copy(&self) -> Result<OwnedMessage, ParseError> {
        let src = self.as_bytes();
        if src.len() > MAX_FRAME_LEN {
            return Err(ParseError::FrameTooLong);
        }
        let mut bytes = [0u8; MAX_FRAME_LEN + 1];
        bytes[..src.len()].copy_from_slice(src);
        Ok(Message {
            storage: Storage::Owned {
                bytes,
                finalized: false,
            },
            capacity: src.len(),
            read: 0,
            write: src.len(),
        })
    }

    /// Bytes written so far (the whole frame for borrowed views)
    pub fn as_bytes(&self) -> &[u8] {
        match &self.storage {
            Storage::Borrowed(bytes) => &bytes[..self.write],
            Storage::Owned { bytes, .. } => &bytes[..self.write],
        }
    }

    /// Underlying storage, including the terminator slot of owned buffers
    ///
    /// Use together with the length returned by [`Message::finalize`].
    pub fn byte_buffer(&self) -> &[u8] {
        match &self.storage {
            Storage::Borrowed(bytes) => bytes,
            Storage::Owned { bytes, .. } => &bytes[..=self.capacity],
        }
    }

    /// Finalized frame including the terminator, empty until finalized
    pub fn wire_bytes(&self) -> &[u8] {
        match &self.storage {
            Storage::Owned {
                bytes,
                finalized: true,
            } => &bytes[..=self.write],
            _ => &[],
        }
    }

    /// Number of bytes written
    pub fn len(&self) -> usize {
        self.write
    }

    /// Returns true if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.write == 0
    }

    /// Maximum number of content bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current read position
    pub fn position(&self) -> usize {
        self.read
    }

    /// Bytes left between the read and write cursors
    pub fn remaining(&self) -> usize {
        self.write - self.read
    }

    /// Returns true for owned buffers
    pub fn is_owned(&self) -> bool {
        matches!(self.storage, Storage::Owned { .. })
    }

    /// Returns true once [`Message::finalize`] has run on an owned buffer
    pub fn is_finalized(&self) -> bool {
        matches!(self.storage, Storage::Owned { finalized: true, .. })
    }

    /// Move the read cursor back to the start
    pub fn rewind(&mut self) {
        self.read = 0;
    }

    fn readable(&self) -> bool {
        self.read < self.write
    }

    fn byte_at(&self, index: usize) -> u8 {
        match &self.storage {
            Storage::Borrowed(bytes) => bytes[index],
            Storage::Owned { bytes, .. } => bytes[index],
        }
    }

    // ------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------

    /// Look at the next byte without consuming it
    pub fn peek_raw(&self) -> Option<u8> {
        if self.readable() {
            Some(self.byte_at(self.read))
        } else {
            None
        }
    }

    /// Read a single byte without expecting a separator
    pub fn read_raw(&mut self) -> Result<u8, ParseError> {
        let value = self.peek_raw().ok_or(ParseError::Exhausted)?;
        self.read += 1;
        Ok(value)
    }

    /// Consume a field separator
    ///
    /// The end of the frame also closes the last field, since the receiver
    /// strips the line terminator.
    pub fn consume_separator(&mut self) -> Result<(), ParseError> {
        match self.peek_raw() {
            Some(SEPARATOR) => {
                self.read += 1;
                Ok(())
            }
            Some(_) => Err(ParseError::MissingSeparator),
            None => Ok(()),
        }
    }

    /// Match a literal byte followed by a separator
    ///
    /// The read cursor is left untouched on failure.
    pub fn consume(&mut self, literal: u8) -> Result<(), ParseError> {
        let start = self.read;
        let result = match self.read_raw() {
            Ok(c) if c == literal => self.consume_separator(),
            Ok(_) => Err(ParseError::Mismatch),
            Err(e) => Err(e),
        };
        if result.is_err() {
            self.read = start;
        }
        result
    }

    /// Read a single raw character followed by a separator
    pub fn read_char(&mut self) -> Result<u8, ParseError> {
        let value = self.read_raw()?;
        self.consume_separator()?;
        Ok(value)
    }

    fn read_nibble(&mut self) -> Result<u8, ParseError> {
        let c = self.peek_raw().ok_or(ParseError::Exhausted)?;
        let value = hex_value(c).ok_or(ParseError::InvalidDigit)?;
        self.read += 1;
        Ok(value)
    }

    fn read_hex_byte_raw(&mut self) -> Result<u8, ParseError> {
        let hi = self.read_nibble()?;
        let lo = self.read_nibble()?;
        Ok((hi << 4) | lo)
    }

    /// Read a one-byte hex field
    pub fn read_u8(&mut self) -> Result<u8, ParseError> {
        let value = self.read_hex_byte_raw()?;
        self.consume_separator()?;
        Ok(value)
    }

    /// Read a two-byte hex field (MSB first)
    pub fn read_u16(&mut self) -> Result<u16, ParseError> {
        let hi = self.read_hex_byte_raw()?;
        let lo = self.read_hex_byte_raw()?;
        self.consume_separator()?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    /// Read a length-prefixed string
    ///
    /// The returned bytes are raw characters; the protocol does not promise
    /// UTF-8.
    pub fn read_str(&mut self) -> Result<&[u8], ParseError> {
        if !self.readable() {
            return Err(ParseError::Exhausted);
        }
        let len = self.read_hex_byte_raw()? as usize;
        if len > self.remaining() {
            return Err(ParseError::LengthOverrun);
        }
        let start = self.read;
        self.read += len;
        self.consume_separator()?;
        let bytes = match &self.storage {
            Storage::Borrowed(bytes) => &bytes[start..start + len],
            Storage::Owned { bytes, .. } => &bytes[start..start + len],
        };
        Ok(bytes)
    }

    /// Read a packed 5×5 image
    pub fn read_image(&mut self) -> Result<Image, ParseError> {
        if self.remaining() < IMAGE_SIZE {
            return Err(ParseError::Exhausted);
        }
        let mut rows = [0u8; IMAGE_SIZE];
        for row in rows.iter_mut() {
            *row = self.read_raw()?;
        }
        self.consume_separator()?;
        Ok(Image::from_packed_rows(&rows))
    }

    // ------------------------------------------------------------------
    // Writing
    // ------------------------------------------------------------------

    /// Check that `count` more bytes fit while keeping a slot for the
    /// closing separator
    pub fn writable(&self, count: usize) -> bool {
        match self.storage {
            Storage::Borrowed(_) => false,
            Storage::Owned { finalized, .. } => !finalized && self.write + count < self.capacity,
        }
    }

    fn write_check(&self, count: usize) -> Result<(), WriteError> {
        match self.storage {
            Storage::Borrowed(_) => Err(WriteError::ReadOnly),
            Storage::Owned {
                finalized: true, ..
            } => Err(WriteError::Finalized),
            Storage::Owned { .. } if self.writable(count) => Ok(()),
            Storage::Owned { .. } => Err(WriteError::BufferFull),
        }
    }

    fn put(&mut self, value: u8) {
        if let Storage::Owned { bytes, .. } = &mut self.storage {
            bytes[self.write] = value;
            self.write += 1;
        }
    }

    /// Write a single byte without a separator
    pub fn write_raw(&mut self, value: u8) -> Result<(), WriteError> {
        self.write_check(1)?;
        self.put(value);
        Ok(())
    }

    /// Close the current field
    ///
    /// The separator may use the last content slot but never the terminator
    /// slot.
    pub fn write_separator(&mut self) -> Result<(), WriteError> {
        match self.storage {
            Storage::Borrowed(_) => Err(WriteError::ReadOnly),
            Storage::Owned {
                finalized: true, ..
            } => Err(WriteError::Finalized),
            Storage::Owned { .. } if self.write < self.capacity => {
                self.put(SEPARATOR);
                Ok(())
            }
            Storage::Owned { .. } => Err(WriteError::BufferFull),
        }
    }

    /// Write a single character field
    pub fn write_char(&mut self, value: u8) -> Result<(), WriteError> {
        self.write_raw(value)?;
        self.write_separator()
    }

    fn write_hex_byte_raw(&mut self, value: u8) -> Result<(), WriteError> {
        self.write_check(2)?;
        for digit in hex_pair(value) {
            self.put(digit);
        }
        Ok(())
    }

    /// Write a one-byte hex field
    pub fn write_u8(&mut self, value: u8) -> Result<(), WriteError> {
        self.write_hex_byte_raw(value)?;
        self.write_separator()
    }

    /// Write a two-byte hex field (MSB first)
    pub fn write_u16(&mut self, value: u16) -> Result<(), WriteError> {
        self.write_check(4)?;
        let [hi, lo] = value.to_be_bytes();
        self.write_hex_byte_raw(hi)?;
        self.write_hex_byte_raw(lo)?;
        self.write_separator()
    }

    fn write_chars_raw(&mut self, value: &[u8], truncate: bool) -> Result<usize, WriteError> {
        let mut count = value.len();
        if !self.writable(count) {
            self.write_check(0)?;
            if !truncate {
                return Err(WriteError::BufferFull);
            }
            count = self.capacity.saturating_sub(self.write + 1);
        }
        for &c in &value[..count] {
            self.put(c);
        }
        Ok(count)
    }

    /// Write raw characters followed by a separator
    ///
    /// With `truncate`, only the characters that fit are written. Returns the
    /// number of characters written.
    pub fn write_chars(&mut self, value: &[u8], truncate: bool) -> Result<usize, WriteError> {
        let written = self.write_chars_raw(value, truncate)?;
        self.write_separator()?;
        Ok(written)
    }

    /// Write a length-prefixed string
    ///
    /// The length prefix always carries the intended length (capped at 255),
    /// even when `truncate` drops characters that do not fit. Readers must not
    /// assume the prefix equals the number of characters present.
    pub fn write_str(&mut self, value: &[u8], truncate: bool) -> Result<usize, WriteError> {
        let value = &value[..value.len().min(u8::MAX as usize)];
        self.write_hex_byte_raw(value.len() as u8)?;
        self.write_chars(value, truncate)
    }

    /// Terminate an owned message
    ///
    /// Appends `\n` at the write cursor and returns the number of bytes to
    /// transmit. Borrowed views are left alone and report 0.
    pub fn finalize(&mut self) -> usize {
        let write = self.write;
        match &mut self.storage {
            Storage::Borrowed(_) => 0,
            Storage::Owned { bytes, finalized } => {
                bytes[write] = TERMINATOR;
                *finalized = true;
                write + 1
            }
        }
    }
}

impl Message<'static> {
    /// Allocate an owned, zeroed buffer
    ///
    /// `capacity` is clamped to [`MAX_FRAME_LEN`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Storage::Owned {
                bytes: [0u8; MAX_FRAME_LEN + 1],
                finalized: false,
            },
            capacity: capacity.min(MAX_FRAME_LEN),
            read: 0,
            write: 0,
        }
    }
}

impl core::fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Message")
            .field("owned", &self.is_owned())
            .field("capacity", &self.capacity)
            .field("read", &self.read)
            .field("write", &self.write)
            .field("bytes", &self.as_bytes())
            .finish()
    }
}
