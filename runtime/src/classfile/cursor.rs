use byteorder::{BigEndian, ByteOrder};
use std::fmt::Display;

/// Big-endian read cursor over an immutable byte slice.
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    UnexpectedEof { wanted: usize, pos: usize, len: usize },
    SeekOutOfRange { to: usize, len: usize },
}

impl Display for CursorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CursorError::UnexpectedEof { wanted, pos, len } => write!(
                f,
                "unexpected end of stream: wanted {} byte(s) at offset {} of {}",
                wanted, pos, len
            ),
            CursorError::SeekOutOfRange { to, len } => {
                write!(f, "seek to {} is outside the stream of {} byte(s)", to, len)
            }
        }
    }
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CursorError> {
        if self.remaining() < n {
            return Err(CursorError::UnexpectedEof {
                wanted: n,
                pos: self.pos,
                len: self.data.len(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, CursorError> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, CursorError> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64, CursorError> {
        Ok(BigEndian::read_u64(self.take(8)?))
    }

    pub fn read_i32(&mut self) -> Result<i32, CursorError> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    pub fn read_i64(&mut self) -> Result<i64, CursorError> {
        Ok(BigEndian::read_i64(self.take(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32, CursorError> {
        Ok(BigEndian::read_f32(self.take(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64, CursorError> {
        Ok(BigEndian::read_f64(self.take(8)?))
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CursorError> {
        self.take(n)
    }

    /// Absolute positioning, restricted to `[0, len]`.
    pub fn seek(&mut self, to: usize) -> Result<(), CursorError> {
        if to > self.data.len() {
            return Err(CursorError::SeekOutOfRange {
                to,
                len: self.data.len(),
            });
        }
        self.pos = to;
        Ok(())
    }
}
