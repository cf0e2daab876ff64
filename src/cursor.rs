//! Fixed-width reads over a seekable byte source.

use crate::error::{Error, Result};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::{self, Read, Seek, SeekFrom};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// Integer types that can be read with an explicit byte order.
pub trait FixedWidth: Sized {
    const WIDTH: u64;

    fn read_from<R: Read>(r: &mut R, endian: Endian) -> io::Result<Self>;
}

impl FixedWidth for u8 {
    const WIDTH: u64 = 1;

    fn read_from<R: Read>(r: &mut R, _endian: Endian) -> io::Result<Self> {
        r.read_u8()
    }
}

impl FixedWidth for i8 {
    const WIDTH: u64 = 1;

    fn read_from<R: Read>(r: &mut R, _endian: Endian) -> io::Result<Self> {
        r.read_i8()
    }
}

macro_rules! fixed_width {
    ($ty:ty, $width:expr, $read:ident) => {
        impl FixedWidth for $ty {
            const WIDTH: u64 = $width;

            fn read_from<R: Read>(r: &mut R, endian: Endian) -> io::Result<Self> {
                match endian {
                    Endian::Big => r.$read::<BigEndian>(),
                    Endian::Little => r.$read::<LittleEndian>(),
                }
            }
        }
    };
}

fixed_width!(u16, 2, read_u16);
fixed_width!(i16, 2, read_i16);
fixed_width!(u32, 4, read_u32);
fixed_width!(i32, 4, read_i32);
fixed_width!(u64, 8, read_u64);
fixed_width!(i64, 8, read_i64);

/// Reader wrapper that turns short reads into [`Error::UnexpectedEndOfStream`]
/// carrying the offset where the read started.
pub struct ByteCursor<R> {
    inner: R,
}

impl<R: Read + Seek> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Total stream length. The current position is left untouched.
    pub fn len(&mut self) -> Result<u64> {
        let pos = self.inner.stream_position()?;
        let len = self.inner.seek(SeekFrom::End(0))?;
        if pos != len {
            self.inner.seek(SeekFrom::Start(pos))?;
        }
        Ok(len)
    }

    pub fn read<T: FixedWidth>(&mut self, endian: Endian) -> Result<T> {
        let offset = self.position()?;
        T::read_from(&mut self.inner, endian).map_err(|e| short_read(e, offset, T::WIDTH))
    }

    pub fn read_at<T: FixedWidth>(&mut self, offset: u64, endian: Endian) -> Result<T> {
        self.seek_to(offset)?;
        self.read(endian)
    }

    /// Read `N` raw bytes. Byte arrays are opaque, so no reordering happens.
    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let offset = self.position()?;
        let mut buf = [0u8; N];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| short_read(e, offset, N as u64))?;
        Ok(buf)
    }
}

fn short_read(err: io::Error, offset: u64, wanted: u64) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::UnexpectedEndOfStream { offset, wanted }
    } else {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_both_byte_orders() {
        let mut c = ByteCursor::new(Cursor::new(vec![0x12, 0x34, 0x12, 0x34]));
        assert_eq!(c.read::<u16>(Endian::Big).unwrap(), 0x1234);
        assert_eq!(c.read::<u16>(Endian::Little).unwrap(), 0x3412);
        assert_eq!(c.position().unwrap(), 4);
    }

    #[test]
    fn signed_values_keep_their_sign() {
        let mut c = ByteCursor::new(Cursor::new(vec![0xff, 0xff, 0xff, 0xfe]));
        assert_eq!(c.read::<i32>(Endian::Big).unwrap(), -2);
    }

    #[test]
    fn short_read_reports_offset_and_width() {
        let mut c = ByteCursor::new(Cursor::new(vec![0u8; 6]));
        c.seek_to(4).unwrap();
        match c.read::<u32>(Endian::Big) {
            Err(Error::UnexpectedEndOfStream { offset, wanted }) => {
                assert_eq!(offset, 4);
                assert_eq!(wanted, 4);
            }
            other => panic!("expected UnexpectedEndOfStream, got {other:?}"),
        }
    }

    #[test]
    fn byte_arrays_are_not_reversed() {
        let mut c = ByteCursor::new(Cursor::new(b"xxmoov".to_vec()));
        assert_eq!(&c.read_bytes::<4>().unwrap(), b"xxmo");
        assert!(matches!(
            c.read_bytes::<4>(),
            Err(Error::UnexpectedEndOfStream { offset: 4, wanted: 4 })
        ));
    }

    #[test]
    fn len_preserves_position() {
        let mut c = ByteCursor::new(Cursor::new(vec![0u8; 10]));
        c.seek_to(3).unwrap();
        assert_eq!(c.len().unwrap(), 10);
        assert_eq!(c.position().unwrap(), 3);
        assert_eq!(c.read_at::<u8>(9, Endian::Big).unwrap(), 0);
    }
}
