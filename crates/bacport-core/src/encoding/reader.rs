use crate::DecodeError;

/// Bounds-checked cursor over a received frame.
///
/// Every read checks the remaining input first; a short buffer surfaces as
/// [`DecodeError::UnexpectedEof`] instead of a panic or an out-of-bounds
/// read. Slices handed out borrow from the original buffer.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    rest: &'a [u8],
    consumed: usize,
}

impl<'a> Reader<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self {
            rest: buf,
            consumed: 0,
        }
    }

    /// Bytes consumed so far; the offset of the next unread byte.
    pub const fn position(&self) -> usize {
        self.consumed
    }

    pub const fn remaining(&self) -> usize {
        self.rest.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    pub fn peek_u8(&self) -> Result<u8, DecodeError> {
        match self.rest.first() {
            Some(b) => Ok(*b),
            None => Err(DecodeError::UnexpectedEof),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let byte = self.peek_u8()?;
        self.advance(1);
        Ok(byte)
    }

    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.rest.len() < len {
            return Err(DecodeError::UnexpectedEof);
        }
        let (head, _) = self.rest.split_at(len);
        self.advance(len);
        Ok(head)
    }

    /// Discards `len` bytes, checking they exist first.
    pub fn skip(&mut self, len: usize) -> Result<(), DecodeError> {
        self.read_exact(len).map(|_| ())
    }

    pub fn read_be_u16(&mut self) -> Result<u16, DecodeError> {
        let b = self.read_exact(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_be_u32(&mut self) -> Result<u32, DecodeError> {
        let b = self.read_exact(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_be_f32(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_bits(self.read_be_u32()?))
    }

    fn advance(&mut self, len: usize) {
        self.rest = &self.rest[len..];
        self.consumed += len;
    }
}

#[cfg(test)]
mod tests {
    use super::Reader;
    use crate::DecodeError;

    #[test]
    fn reads_track_position() {
        let mut r = Reader::new(&[0x81, 0x0A, 0x00, 0x0C]);
        assert_eq!(r.read_u8().unwrap(), 0x81);
        assert_eq!(r.read_u8().unwrap(), 0x0A);
        assert_eq!(r.read_be_u16().unwrap(), 0x000C);
        assert_eq!(r.position(), 4);
        assert!(r.is_empty());
    }

    #[test]
    fn short_input_is_an_error_not_a_panic() {
        let mut r = Reader::new(&[0x01]);
        assert_eq!(r.read_be_u16().unwrap_err(), DecodeError::UnexpectedEof);
        // A failed read consumes nothing.
        assert_eq!(r.read_u8().unwrap(), 0x01);
    }

    #[test]
    fn skip_is_bounds_checked() {
        let mut r = Reader::new(&[1, 2, 3]);
        r.skip(2).unwrap();
        assert_eq!(r.skip(2).unwrap_err(), DecodeError::UnexpectedEof);
        assert_eq!(r.remaining(), 1);
    }

    #[test]
    fn reads_real_big_endian() {
        let mut r = Reader::new(&[0x41, 0x20, 0x00, 0x00]);
        assert_eq!(r.read_be_f32().unwrap(), 10.0);
    }
}
