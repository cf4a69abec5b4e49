//! Output sinks for the formatter.
//!
//! The formatter counts every byte it produces itself; a sink only decides
//! what physically happens to each byte. [`BoundedBuf`] implements the
//! `snprintf` contract over a caller slice, [`Discard`] measures, and with the
//! `alloc` feature a `Vec<u8>` grows without bound.

/// Destination for formatted bytes.
pub trait Sink {
    /// Accept one output byte. May drop it.
    fn put(&mut self, byte: u8);

    /// How many more bytes `put` will store, or `None` when unbounded.
    /// Runs of padding past this point are counted without being written.
    fn room(&self) -> Option<usize> {
        None
    }

    /// Called once when formatting completes.
    fn finish(&mut self) {}
}

/// Caller slice with `snprintf` semantics.
///
/// Content bytes are stored only while at least two bytes of room remain, so
/// the final byte is always free for the terminator written by
/// [`Sink::finish`]. An empty slice receives nothing at all.
#[derive(Debug)]
pub struct BoundedBuf<'a> {
    dst: &'a mut [u8],
    pos: usize,
}

impl<'a> BoundedBuf<'a> {
    #[must_use]
    pub fn new(dst: &'a mut [u8]) -> Self {
        Self { dst, pos: 0 }
    }

    /// Bytes physically stored so far, excluding the terminator.
    #[must_use]
    pub fn written(&self) -> usize {
        self.pos
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.dst.len() - self.pos
    }
}

impl Sink for BoundedBuf<'_> {
    #[inline]
    fn put(&mut self, byte: u8) {
        if self.remaining() >= 2 {
            self.dst[self.pos] = byte;
            self.pos += 1;
        }
    }

    fn room(&self) -> Option<usize> {
        Some(self.remaining().saturating_sub(1))
    }

    fn finish(&mut self) {
        if self.remaining() >= 1 {
            self.dst[self.pos] = 0;
        }
    }
}

/// Sink that stores nothing; the formatter's return value is the length.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl Sink for Discard {
    #[inline]
    fn put(&mut self, _byte: u8) {}

    fn room(&self) -> Option<usize> {
        Some(0)
    }
}

#[cfg(feature = "alloc")]
impl Sink for alloc::vec::Vec<u8> {
    #[inline]
    fn put(&mut self, byte: u8) {
        self.push(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_reserves_terminator() {
        let mut dst = [0xAA; 4];
        let mut buf = BoundedBuf::new(&mut dst);
        for b in b"hello" {
            buf.put(*b);
        }
        buf.finish();
        assert_eq!(buf.written(), 3);
        assert_eq!(&dst, b"hel\0");
    }

    #[test]
    fn bounded_single_byte_gets_only_terminator() {
        let mut dst = [0xAA; 1];
        let mut buf = BoundedBuf::new(&mut dst);
        buf.put(b'x');
        buf.finish();
        assert_eq!(dst, [0]);
    }

    #[test]
    fn bounded_empty_is_untouched() {
        let mut dst: [u8; 0] = [];
        let mut buf = BoundedBuf::new(&mut dst);
        buf.put(b'x');
        buf.finish();
        assert_eq!(buf.written(), 0);
    }

    #[test]
    fn room_tracks_storable_bytes() {
        let mut dst = [0u8; 3];
        let mut buf = BoundedBuf::new(&mut dst);
        assert_eq!(buf.room(), Some(2));
        buf.put(b'a');
        buf.put(b'b');
        assert_eq!(buf.room(), Some(0));
        assert_eq!(BoundedBuf::new(&mut []).room(), Some(0));
        assert_eq!(Discard.room(), Some(0));
    }
}
