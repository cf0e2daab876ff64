use crate::boxes::BoxHeader;
use crate::cursor::ByteCursor;
use crate::epoch;
use crate::error::{Error, Result};
use crate::mvhd::{CREATION_TIME_OFFSET, MODIFICATION_TIME_OFFSET, MovieHeader};
use crate::parser::{parse_movie, read_box_header};
use byteorder::{BigEndian, WriteBytesExt};
use log::{debug, info};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Creation and modification time of a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub modified: OffsetDateTime,
}

/// A parsed MP4/QuickTime file.
///
/// The file is only held open while parsing or writing; in between, this keeps
/// the decoded movie header and where it lives.
#[derive(Debug, Clone)]
pub struct Mp4File {
    path: Option<PathBuf>,
    header: MovieHeader,
    mvhd_box: BoxHeader,
    metadata: Metadata,
}

impl Mp4File {
    /// Open and parse `path`. The handle is closed before this returns,
    /// whether parsing succeeded or not.
    ///
    /// ```no_run
    /// use metamovie::Mp4File;
    ///
    /// let file = Mp4File::open("video.mp4")?;
    /// println!("{:?}", file.metadata().created);
    /// # Ok::<(), metamovie::Error>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|source| Error::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mut file = Self::from_reader(BufReader::new(f))?;
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    /// Parse any seekable source. `reader` is consumed and dropped on return.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut cursor = ByteCursor::new(reader);
        cursor.seek_to(0)?;
        let state = parse_movie(&mut cursor)?;

        let (header, mvhd_box) = match (state.movie_header, state.mvhd_box) {
            (Some(header), Some(mvhd_box)) => (header, mvhd_box),
            _ => return Err(Error::MissingMovieHeader),
        };
        let metadata = Metadata {
            created: header.created()?,
            modified: header.modified()?,
        };
        debug!("parsed movie header @ {}: {:?}", mvhd_box.start, metadata);

        Ok(Mp4File { path: None, header, mvhd_box, metadata })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The movie header as decoded from the file. Not affected by `set_metadata`.
    pub fn movie_header(&self) -> &MovieHeader {
        &self.header
    }

    pub fn metadata(&self) -> Metadata {
        self.metadata
    }

    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata = metadata;
    }

    /// Patch the timestamps of the file this was opened from.
    pub fn write(&self) -> Result<()> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| Error::Io(std::io::Error::other("not opened from a path")))?;
        self.patch_path(path)
    }

    /// Copy the source file to `out`, then patch the copy. Writing to the
    /// source path itself is the same as [`Mp4File::write`].
    pub fn write_to<P: AsRef<Path>>(&self, out: P) -> Result<()> {
        let out = out.as_ref();
        if let Some(src) = self.path.as_deref() {
            let same = match (fs::canonicalize(src), fs::canonicalize(out)) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            };
            if !same {
                fs::copy(src, out).map_err(|source| Error::FileOpen {
                    path: out.to_path_buf(),
                    source,
                })?;
            }
        }
        self.patch_path(out)
    }

    /// Overwrite the two timestamp fields in `w`, which must hold the same
    /// bytes this file was parsed from. Box sizes never change.
    pub fn write_into<W: Write + Seek>(&self, w: &mut W) -> Result<()> {
        let created = epoch::datetime_to_mac(self.metadata.created)?;
        let modified = epoch::datetime_to_mac(self.metadata.modified)?;

        w.seek(SeekFrom::Start(self.mvhd_box.start + CREATION_TIME_OFFSET))?;
        w.write_u32::<BigEndian>(created)?;
        w.seek(SeekFrom::Start(self.mvhd_box.start + MODIFICATION_TIME_OFFSET))?;
        w.write_u32::<BigEndian>(modified)?;
        w.flush()?;
        Ok(())
    }

    fn patch_path(&self, path: &Path) -> Result<()> {
        let f = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| Error::FileOpen {
                path: path.to_path_buf(),
                source,
            })?;

        // refuse to patch a file whose mvhd moved since it was parsed
        let mut cursor = ByteCursor::new(f);
        cursor.seek_to(self.mvhd_box.start)?;
        let found = read_box_header(&mut cursor)?;
        if found != self.mvhd_box {
            return Err(Error::MalformedBox {
                offset: self.mvhd_box.start,
                size: found.size as u64,
                reason: "mvhd is no longer at the offset it was parsed from",
            });
        }

        let mut f = cursor.into_inner();
        self.write_into(&mut f)?;
        info!("updated movie header timestamps in {}", path.display());
        Ok(())
    }
}
