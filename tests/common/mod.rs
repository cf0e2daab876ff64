#![allow(dead_code)]

pub fn boxed(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&(8 + payload.len() as u32).to_be_bytes());
    v.extend_from_slice(tag);
    v.extend_from_slice(payload);
    v
}

/// 100-byte mvhd payload: timescale 1000, duration 5000, rate 1.0,
/// volume 1.0, identity matrix, next track id 2.
pub fn mvhd_payload(version: u8, created: u32, modified: u32) -> Vec<u8> {
    let mut p = vec![version, 0, 0, 0];
    p.extend_from_slice(&created.to_be_bytes());
    p.extend_from_slice(&modified.to_be_bytes());
    p.extend_from_slice(&1000u32.to_be_bytes());
    p.extend_from_slice(&5000u32.to_be_bytes());
    p.extend_from_slice(&0x0001_0000i32.to_be_bytes());
    p.extend_from_slice(&0x0100i16.to_be_bytes());
    p.extend_from_slice(&[0u8; 10]);
    for v in [0x0001_0000i32, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000] {
        p.extend_from_slice(&v.to_be_bytes());
    }
    for v in [0u32, 0, 0, 0, 0, 0, 2] {
        p.extend_from_slice(&v.to_be_bytes());
    }
    assert_eq!(p.len(), 100);
    p
}

/// `ftyp`, then `moov { mvhd, trak }`, then `skip` and `mdat`.
pub fn minimal_movie(created: u32, modified: u32) -> Vec<u8> {
    let mut moov = boxed(b"mvhd", &mvhd_payload(0, created, modified));
    moov.extend(boxed(b"trak", &[0u8; 24]));

    let mut v = boxed(b"ftyp", b"isom\0\0\x02\0isom");
    v.extend(boxed(b"moov", &moov));
    v.extend(boxed(b"skip", &[0xAAu8; 13]));
    v.extend(boxed(b"mdat", &[0x55u8; 64]));
    v
}

/// Offset of the mvhd box inside [`minimal_movie`].
pub const MINIMAL_MVHD_START: u64 = 20 + 8;
