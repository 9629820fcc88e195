use crate::{MessageError, Result};
use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

/// An append-only wire buffer with a hard capacity.
///
/// A write either fits completely or is rejected with
/// [`MessageError::CapacityExceeded`], leaving the buffer untouched. Nothing
/// is ever written past `capacity`, and the buffer never grows beyond it.
#[derive(Debug)]
pub struct WireWriter {
    buf: BytesMut,
    capacity: usize,
}

impl WireWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.buf.len()
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(MessageError::CapacityExceeded {
                needed,
                len: self.buf.len(),
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    pub fn write_u8(&mut self, val: u8) -> Result<()> {
        self.ensure(1)?;
        self.buf.put_u8(val);
        Ok(())
    }

    /// Writes `val` in network byte order.
    pub fn write_u16(&mut self, val: u16) -> Result<()> {
        self.ensure(2)?;
        self.buf.put_u16(val);
        trace!("Wrote 2 bytes");
        Ok(())
    }

    pub fn write_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure(bytes.len())?;
        self.buf.put_slice(bytes);
        trace!("Wrote {} bytes", bytes.len());
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..]
    }

    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::setup;

    #[test]
    fn test_write_u16_is_big_endian() {
        setup();
        let mut w = WireWriter::with_capacity(4);
        w.write_u16(0x1234).unwrap();
        w.write_u8(0xff).unwrap();
        assert_eq!(w.as_slice(), &[0x12, 0x34, 0xff]);
        assert_eq!(w.remaining(), 1);
    }

    #[test]
    fn test_full_buffer_rejects_writes() {
        setup();
        let mut w = WireWriter::with_capacity(3);
        w.write_u16(7).unwrap();

        // Only one byte left - a short must not be half written.
        assert_eq!(
            w.write_u16(0xabcd),
            Err(MessageError::CapacityExceeded {
                needed: 2,
                len: 2,
                capacity: 3
            })
        );
        assert_eq!(w.len(), 2);

        w.write_u8(1).unwrap();
        assert!(w.write_u8(2).is_err());
        assert!(w.write_slice(&[]).is_ok());
        assert_eq!(w.freeze().as_ref(), &[0, 7, 1]);
    }

    #[test]
    fn test_slice_is_all_or_nothing() {
        setup();
        let mut w = WireWriter::with_capacity(4);
        w.write_u8(9).unwrap();
        assert!(w.write_slice(b"abcd").is_err());
        assert_eq!(w.as_slice(), &[9]);
        w.write_slice(b"abc").unwrap();
        assert_eq!(w.remaining(), 0);
    }
}
