//! Movie header box (`mvhd`), version 0 layout.
//!
//! Location: `moov/mvhd`

use crate::boxes::{BOX_HEADER_SIZE, BoxHeader};
use crate::cursor::{ByteCursor, Endian};
use crate::epoch;
use crate::error::{Error, Result};
use serde::Serialize;
use std::io::{Read, Seek};
use time::OffsetDateTime;

/// Payload length of a version 0 `mvhd`, version and flags included.
pub const MVHD_V0_PAYLOAD_LEN: u64 = 100;

/// Offset of the creation time from the start of the `mvhd` box.
pub const CREATION_TIME_OFFSET: u64 = BOX_HEADER_SIZE + 4;
/// Offset of the modification time from the start of the `mvhd` box.
pub const MODIFICATION_TIME_OFFSET: u64 = CREATION_TIME_OFFSET + 4;

/// 16.16 fixed-point number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Fixed16_16(pub i32);

impl Fixed16_16 {
    pub const ONE: Fixed16_16 = Fixed16_16(0x0001_0000);

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 65536.0
    }
}

/// 8.8 fixed-point number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Fixed8_8(pub i16);

impl Fixed8_8 {
    pub const ONE: Fixed8_8 = Fixed8_8(0x0100);

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 256.0
    }
}

/// Row-major 3x3 transformation matrix `[a b u; c d v; x y w]`.
///
/// `a b c d x y` are 16.16 fixed-point; the projective column `u v w` is kept raw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Matrix(pub [i32; 9]);

impl Matrix {
    pub const IDENTITY: Matrix = Matrix([0x0001_0000, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000]);

    pub fn a(&self) -> Fixed16_16 { Fixed16_16(self.0[0]) }
    pub fn b(&self) -> Fixed16_16 { Fixed16_16(self.0[1]) }
    pub fn c(&self) -> Fixed16_16 { Fixed16_16(self.0[3]) }
    pub fn d(&self) -> Fixed16_16 { Fixed16_16(self.0[4]) }
    pub fn x(&self) -> Fixed16_16 { Fixed16_16(self.0[6]) }
    pub fn y(&self) -> Fixed16_16 { Fixed16_16(self.0[7]) }

    /// The projective column `[u, v, w]`.
    pub fn projective(&self) -> [i32; 3] {
        [self.0[2], self.0[5], self.0[8]]
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Decoded `mvhd` payload.
///
/// Times are raw Mac-epoch seconds (since 1904-01-01 UTC); durations are in
/// `time_scale` units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieHeader {
    pub version: u8,
    pub flags: u32,
    pub creation_time: u32,
    pub modification_time: u32,
    /// Number of time units that pass in one second.
    pub time_scale: u32,
    pub duration: u32,
    pub preferred_rate: Fixed16_16,
    pub preferred_volume: Fixed8_8,
    pub matrix: Matrix,
    pub preview_time: u32,
    pub preview_duration: u32,
    pub poster_time: u32,
    pub selection_time: u32,
    pub selection_duration: u32,
    pub current_time: u32,
    pub next_track_id: u32,
}

impl MovieHeader {
    /// Decode the payload of `hdr`. `r` must sit right after the box header.
    pub fn decode<R: Read + Seek>(r: &mut ByteCursor<R>, hdr: &BoxHeader) -> Result<Self> {
        if hdr.payload_len() < 4 {
            return Err(Error::MalformedBox {
                offset: hdr.start,
                size: hdr.size as u64,
                reason: "mvhd too short for version and flags",
            });
        }
        let version = r.read::<u8>(Endian::Big)?;
        if version != 0 {
            return Err(Error::UnsupportedVersion { version });
        }
        if hdr.payload_len() < MVHD_V0_PAYLOAD_LEN {
            return Err(Error::MalformedBox {
                offset: hdr.start,
                size: hdr.size as u64,
                reason: "mvhd payload shorter than 100 bytes",
            });
        }

        let f = r.read_bytes::<3>()?;
        let flags = ((f[0] as u32) << 16) | ((f[1] as u32) << 8) | (f[2] as u32);

        let creation_time = r.read::<u32>(Endian::Big)?;
        let modification_time = r.read::<u32>(Endian::Big)?;
        let time_scale = r.read::<u32>(Endian::Big)?;
        let duration = r.read::<u32>(Endian::Big)?;
        let preferred_rate = Fixed16_16(r.read::<i32>(Endian::Big)?);
        let preferred_volume = Fixed8_8(r.read::<i16>(Endian::Big)?);
        let _reserved = r.read_bytes::<10>()?;

        let mut m = [0i32; 9];
        for v in m.iter_mut() {
            *v = r.read::<i32>(Endian::Big)?;
        }

        Ok(MovieHeader {
            version,
            flags,
            creation_time,
            modification_time,
            time_scale,
            duration,
            preferred_rate,
            preferred_volume,
            matrix: Matrix(m),
            preview_time: r.read::<u32>(Endian::Big)?,
            preview_duration: r.read::<u32>(Endian::Big)?,
            poster_time: r.read::<u32>(Endian::Big)?,
            selection_time: r.read::<u32>(Endian::Big)?,
            selection_duration: r.read::<u32>(Endian::Big)?,
            current_time: r.read::<u32>(Endian::Big)?,
            next_track_id: r.read::<u32>(Endian::Big)?,
        })
    }

    /// Creation time as a UTC datetime.
    pub fn created(&self) -> Result<OffsetDateTime> {
        epoch::mac_to_datetime(self.creation_time)
    }

    /// Modification time as a UTC datetime.
    pub fn modified(&self) -> Result<OffsetDateTime> {
        epoch::mac_to_datetime(self.modification_time)
    }

    /// Duration of the longest track in seconds, `None` for a zero time scale.
    pub fn duration_seconds(&self) -> Option<f64> {
        match self.time_scale {
            0 => None,
            ts => Some(self.duration as f64 / ts as f64),
        }
    }
}
