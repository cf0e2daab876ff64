use std::fmt;

/// Size of the plain box header: 32-bit size followed by the 4CC.
pub const BOX_HEADER_SIZE: u64 = 8;

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const MOOV: FourCC = FourCC(*b"moov");
    pub const MVHD: FourCC = FourCC(*b"mvhd");

    pub fn as_str_lossy(&self) -> String {
        self.0.iter().map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect()
    }
}
impl fmt::Debug for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }
impl fmt::Display for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxHeader {
    pub start: u64,  // file offset of header start
    pub size: u32,   // total size including the 8-byte header
    pub typ: FourCC,
}

impl BoxHeader {
    /// Offset one past the last byte of this box.
    pub fn end(&self) -> u64 {
        self.start + self.size as u64
    }

    /// Offset of the first payload byte.
    pub fn payload_start(&self) -> u64 {
        self.start + BOX_HEADER_SIZE
    }

    pub fn payload_len(&self) -> u64 {
        (self.size as u64).saturating_sub(BOX_HEADER_SIZE)
    }
}

/// Byte range a walker scope iterates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    /// Top level: run until the end of the stream.
    ToEnd,
    /// Interior of a container box, ending at this absolute offset.
    Until(u64),
}
