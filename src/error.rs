use crate::boxes::FourCC;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unexpected end of stream: wanted {wanted} bytes at offset {offset}")]
    UnexpectedEndOfStream { offset: u64, wanted: u64 },
    #[error("malformed box at offset {offset} (size {size}): {reason}")]
    MalformedBox {
        offset: u64,
        size: u64,
        reason: &'static str,
    },
    #[error("unsupported mvhd version {version}")]
    UnsupportedVersion { version: u8 },
    #[error("no handler registered for box '{tag}'")]
    NoSuchHandler { tag: FourCC },
    #[error("cannot open {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no mvhd box found inside moov")]
    MissingMovieHeader,
    #[error("timestamp {unix} is outside the range a 32-bit movie header can store")]
    TimestampOutOfRange { unix: i64 },
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
