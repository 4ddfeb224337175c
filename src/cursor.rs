//! Bounds-checked reader over an immutable byte slice
//!
//! Every read either returns a value and advances, or returns `None` and
//! leaves the position untouched. Callers never do offset arithmetic on the
//! underlying slice themselves.

/// Forward-only cursor over a borrowed byte slice
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, pos: 0 }
    }

    /// Current offset from the start of the slice
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the position and the end of the slice
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Borrow the next `n` bytes without advancing
    pub fn peek(&self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        self.data.get(self.pos..end)
    }

    /// Borrow the next `n` bytes and advance past them
    pub fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let bytes = self.peek(n)?;
        self.pos += n;
        Some(bytes)
    }

    /// Advance `n` bytes
    pub fn skip(&mut self, n: usize) -> Option<()> {
        self.take(n).map(|_| ())
    }

    /// Read a fixed-size array
    pub fn array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Some(out)
    }

    pub fn u8(&mut self) -> Option<u8> {
        self.array::<1>().map(|b| b[0])
    }

    pub fn u16_le(&mut self) -> Option<u16> {
        self.array().map(u16::from_le_bytes)
    }

    pub fn u32_le(&mut self) -> Option<u32> {
        self.array().map(u32::from_le_bytes)
    }

    pub fn u32_be(&mut self) -> Option<u32> {
        self.array().map(u32::from_be_bytes)
    }
}
