//! Bit-level I/O for the Huffman container.
//!
//! This module provides `BitReader` and `BitWriter` for reading and writing
//! fields of 1 to 32 bits over any byte stream.
//!
//! # Bit Ordering
//!
//! The container is MSB-first: the most significant bit of every field is
//! written first, and bits fill each byte starting from its most significant
//! bit. A field may straddle byte boundaries.
//!
//! # End of Stream
//!
//! [`BitReader::read_bits`] returns `Ok(None)` once the underlying stream
//! cannot supply the requested number of bits. `None` is the end-of-stream
//! sentinel; it is distinct from every valid field value, including zero.
//!
//! # Example
//!
//! ```
//! use oxihuff_core::bitstream::{BitReader, BitWriter};
//! use std::io::Cursor;
//!
//! let mut writer = BitWriter::new(Vec::new());
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bits(0xFACE, 16).unwrap();
//! let output = writer.finish().unwrap();
//!
//! let mut reader = BitReader::new(Cursor::new(output));
//! assert_eq!(reader.read_bits(3).unwrap(), Some(0b101));
//! assert_eq!(reader.read_bits(16).unwrap(), Some(0xFACE));
//! // Only the 5 zero padding bits remain.
//! assert_eq!(reader.read_bits(8).unwrap(), None);
//! ```

use crate::error::Result;
use std::io::{ErrorKind, Read, Write};

/// Widest field accepted by `read_bits`/`write_bits`.
pub const MAX_FIELD_BITS: u8 = 32;

#[inline]
fn low_mask(count: u8) -> u64 {
    (1u64 << count).wrapping_sub(1)
}

/// A bit-level reader that wraps any `Read` implementation.
///
/// Bytes are pulled from the underlying reader only when the internal buffer
/// cannot satisfy a request, at most four bytes at a time.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    /// Underlying reader.
    reader: R,
    /// Bit buffer (MSB-first, valid bits are the low `bits_in_buffer`).
    buffer: u64,
    /// Number of valid bits in buffer.
    bits_in_buffer: u8,
    /// Total bits consumed (for error reporting).
    total_bits_read: u64,
    /// Set once the underlying reader has returned end of file.
    exhausted: bool,
}

impl<R: Read> BitReader<R> {
    /// Create a new `BitReader` wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_read: 0,
            exhausted: false,
        }
    }

    /// Get a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Get a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consume this `BitReader` and return the underlying reader.
    ///
    /// Bits already buffered but not consumed are lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Get the total number of bits consumed so far.
    pub fn bits_read(&self) -> u64 {
        self.total_bits_read
    }

    /// Try to buffer at least `count` bits. Returns `false` at end of stream.
    fn fill_buffer(&mut self, count: u8) -> Result<bool> {
        debug_assert!(count <= MAX_FIELD_BITS);

        while self.bits_in_buffer < count {
            if self.exhausted {
                return Ok(false);
            }

            let bytes_needed = (count - self.bits_in_buffer).div_ceil(8) as usize;
            let mut temp_buf = [0u8; 4];
            match self.reader.read(&mut temp_buf[..bytes_needed]) {
                Ok(0) => {
                    self.exhausted = true;
                    return Ok(false);
                }
                Ok(n) => {
                    for &byte in &temp_buf[..n] {
                        self.buffer = (self.buffer << 8) | byte as u64;
                        self.bits_in_buffer += 8;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(true)
    }

    /// Read up to 32 bits from the stream, most significant bit first.
    ///
    /// # Returns
    ///
    /// `Some(value)` with the first bit read in the highest position of the
    /// `count`-bit field, or `None` if the stream ends before `count` bits are
    /// available.
    pub fn read_bits(&mut self, count: u8) -> Result<Option<u32>> {
        debug_assert!(count <= MAX_FIELD_BITS, "Cannot read more than 32 bits at once");

        if count == 0 {
            return Ok(Some(0));
        }

        if !self.fill_buffer(count)? {
            return Ok(None);
        }

        let shift = self.bits_in_buffer - count;
        let value = (self.buffer >> shift) & low_mask(count);

        self.bits_in_buffer = shift;
        self.buffer &= low_mask(shift);
        self.total_bits_read += count as u64;

        Ok(Some(value as u32))
    }

    /// Read a single bit, or `None` at end of stream.
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        Ok(self.read_bits(1)?.map(|bit| bit != 0))
    }
}

/// A bit-level writer that wraps any `Write` implementation.
///
/// Complete bytes are handed to the underlying writer as soon as they are
/// formed. [`BitWriter::finish`] pads the last partial byte with zero bits,
/// flushes, and gives the writer back; it consumes `self`, so the stream is
/// finished exactly once.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    /// Underlying writer.
    writer: W,
    /// Bit buffer (MSB-first, valid bits are the low `bits_in_buffer`).
    buffer: u64,
    /// Number of bits in buffer (always < 8 between calls).
    bits_in_buffer: u8,
    /// Total bits written, excluding padding.
    total_bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a new `BitWriter` wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_written: 0,
        }
    }

    /// Get a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Get a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Get the total number of bits written so far (padding excluded).
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Move every complete byte from the buffer to the writer.
    fn flush_bytes(&mut self) -> Result<()> {
        let mut bytes = [0u8; 5];
        let mut len = 0;

        while self.bits_in_buffer >= 8 {
            self.bits_in_buffer -= 8;
            bytes[len] = (self.buffer >> self.bits_in_buffer) as u8;
            len += 1;
        }
        self.buffer &= low_mask(self.bits_in_buffer);

        if len > 0 {
            self.writer.write_all(&bytes[..len])?;
        }
        Ok(())
    }

    /// Write the low `count` bits of `value`, most significant bit first.
    ///
    /// Bits of `value` above `count` are ignored.
    pub fn write_bits(&mut self, value: u32, count: u8) -> Result<()> {
        debug_assert!(count <= MAX_FIELD_BITS, "Cannot write more than 32 bits at once");

        if count == 0 {
            return Ok(());
        }

        let value = value as u64 & low_mask(count);
        self.buffer = (self.buffer << count) | value;
        self.bits_in_buffer += count;
        self.total_bits_written += count as u64;

        self.flush_bytes()
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.buffer = (self.buffer << 1) | bit as u64;
        self.bits_in_buffer += 1;
        self.total_bits_written += 1;

        if self.bits_in_buffer >= 8 {
            self.flush_bytes()?;
        }
        Ok(())
    }

    /// Pad the final partial byte with zero bits, flush, and return the
    /// underlying writer.
    pub fn finish(mut self) -> Result<W> {
        if self.bits_in_buffer > 0 {
            let padding = 8 - self.bits_in_buffer;
            let byte = (self.buffer << padding) as u8;
            self.writer.write_all(&[byte])?;
            self.buffer = 0;
            self.bits_in_buffer = 0;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    #[test]
    fn test_bitreader_basic() {
        // 0b10110101 = 0xB5
        let data = vec![0xB5];
        let mut reader = BitReader::new(Cursor::new(data));

        let bits: Vec<bool> = (0..8)
            .map(|_| reader.read_bit().unwrap().unwrap())
            .collect();
        assert_eq!(
            bits,
            vec![true, false, true, true, false, true, false, true]
        );
        assert_eq!(reader.read_bit().unwrap(), None);
    }

    #[test]
    fn test_bitreader_multi_byte() {
        let data = vec![0xFF, 0x00];
        let mut reader = BitReader::new(Cursor::new(data));

        assert_eq!(reader.read_bits(4).unwrap(), Some(0xF));
        assert_eq!(reader.read_bits(8).unwrap(), Some(0xF0)); // Crosses byte boundary
        assert_eq!(reader.read_bits(4).unwrap(), Some(0x0));
        assert_eq!(reader.bits_read(), 16);
    }

    #[test]
    fn test_bitreader_eof_sentinel() {
        let data = vec![0xAB];
        let mut reader = BitReader::new(Cursor::new(data));

        assert_eq!(reader.read_bits(12).unwrap(), None);
        assert_eq!(reader.bits_read(), 0);
    }

    #[test]
    fn test_bitreader_zero_is_not_eof() {
        let data = vec![0x00, 0x00, 0x00, 0x00];
        let mut reader = BitReader::new(Cursor::new(data));

        assert_eq!(reader.read_bits(32).unwrap(), Some(0));
        assert_eq!(reader.read_bits(1).unwrap(), None);
    }

    #[test]
    fn test_bitwriter_basic() {
        let mut writer = BitWriter::new(Vec::new());
        for bit in [true, false, true, true, false, true, false, true] {
            writer.write_bit(bit).unwrap();
        }
        assert_eq!(writer.finish().unwrap(), vec![0xB5]);
    }

    #[test]
    fn test_bitwriter_multi_bits() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0b101, 3).unwrap();
        writer.write_bits(0b11001, 5).unwrap();
        // 101 then 11001 -> 1011_1001
        assert_eq!(writer.finish().unwrap(), vec![0xB9]);
    }

    #[test]
    fn test_bitwriter_full_word() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0xFACE_8200, 32).unwrap();
        assert_eq!(writer.bits_written(), 32);
        assert_eq!(writer.finish().unwrap(), vec![0xFA, 0xCE, 0x82, 0x00]);
    }

    #[test]
    fn test_bitwriter_pads_with_zeros() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0b111, 3).unwrap();
        assert_eq!(writer.bits_written(), 3);
        assert_eq!(writer.finish().unwrap(), vec![0xE0]);
    }

    #[test]
    fn test_bitwriter_masks_high_bits() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0xFFFF_FF01, 8).unwrap();
        assert_eq!(writer.finish().unwrap(), vec![0x01]);
    }

    #[test]
    fn test_roundtrip() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0b101, 3).unwrap();
        writer.write_bits(0b1111, 4).unwrap();
        writer.write_bits(0x100, 9).unwrap();
        writer.write_bits(0xDEAD_BEEF, 32).unwrap();
        writer.write_bit(true).unwrap();
        let output = writer.finish().unwrap();
        assert_eq!(output.len(), 7);

        let mut reader = BitReader::new(Cursor::new(&output));
        assert_eq!(reader.read_bits(3).unwrap(), Some(0b101));
        assert_eq!(reader.read_bits(4).unwrap(), Some(0b1111));
        assert_eq!(reader.read_bits(9).unwrap(), Some(0x100));
        assert_eq!(reader.read_bits(32).unwrap(), Some(0xDEAD_BEEF));
        assert_eq!(reader.read_bit().unwrap(), Some(true));
    }

    /// Reader that fails with `Interrupted` before every successful read.
    struct Flaky {
        inner: Cursor<Vec<u8>>,
        interrupt: bool,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        let flaky = Flaky {
            inner: Cursor::new(vec![0x12, 0x34]),
            interrupt: false,
        };
        let mut reader = BitReader::new(flaky);
        assert_eq!(reader.read_bits(16).unwrap(), Some(0x1234));
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::ConnectionReset, "gone"))
        }
    }

    #[test]
    fn test_io_errors_propagate() {
        let mut reader = BitReader::new(Broken);
        let err = reader.read_bits(8).unwrap_err();
        assert!(matches!(err, crate::error::HuffError::Io(_)));
    }
}
