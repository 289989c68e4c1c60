use crate::{DecodeError, Field, Result};

/// A cursor over a byte slice that refuses to advance past its end.
pub(crate) struct Reader<'b> {
    buffer: &'b [u8],
    offset: usize,
}

impl<'b> Reader<'b> {
    pub(crate) fn new(buffer: &'b [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Consume `len` octets belonging to `field`.
    pub(crate) fn take(&mut self, len: usize, field: Field) -> Result<&'b [u8]> {
        let truncated = DecodeError::Truncated {
            field,
            offset: self.offset,
        };

        let end = self.offset.checked_add(len).ok_or(truncated)?;
        let b = self.buffer.get(self.offset..end).ok_or(truncated)?;
        self.offset = end;

        Ok(b)
    }

    pub(crate) fn u8(&mut self, field: Field) -> Result<u8> {
        Ok(self.take(1, field)?[0])
    }

    pub(crate) fn u16(&mut self, field: Field) -> Result<u16> {
        let b = self.take(2, field)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub(crate) fn u32(&mut self, field: Field) -> Result<u32> {
        let b = self.take(4, field)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub(crate) fn u64(&mut self, field: Field) -> Result<u64> {
        let mut b = [0u8; 8];
        b.copy_from_slice(self.take(8, field)?);
        Ok(u64::from_le_bytes(b))
    }

    /// Consume everything that is left.
    pub(crate) fn rest(&mut self) -> &'b [u8] {
        let rest = self.buffer.get(self.offset..).unwrap_or(&[]);
        self.offset = self.buffer.len();
        rest
    }
}
