use crate::boxes::{BOX_HEADER_SIZE, BoxHeader, Extent, FourCC};
use crate::cursor::{ByteCursor, Endian};
use crate::error::{Error, Result};
use crate::mvhd::MovieHeader;
use crate::registry::{Matcher, Registry};
use log::{debug, trace, warn};
use std::io::{Read, Seek};

pub fn read_box_header<R: Read + Seek>(r: &mut ByteCursor<R>) -> Result<BoxHeader> {
    let start = r.position()?;
    let size = r.read::<u32>(Endian::Big)?;
    let typ = FourCC(r.read_bytes::<4>()?);
    Ok(BoxHeader { start, size, typ })
}

/// Iterate the sibling boxes of `extent`, dispatching each through `registry`.
///
/// After every handler the cursor is moved to the declared end of the box, so
/// a handler that reads too little or too much never shifts the next sibling.
/// Returns once the cursor sits exactly on the end of the extent.
pub fn walk<R: Read + Seek, S>(
    r: &mut ByteCursor<R>,
    extent: Extent,
    registry: &Registry<R, S>,
    state: &mut S,
) -> Result<()> {
    let (end, at_root) = match extent {
        Extent::ToEnd => (r.len()?, true),
        Extent::Until(end) => (end, false),
    };

    while r.position()? < end {
        let h = read_box_header(r)?;
        if (h.size as u64) < BOX_HEADER_SIZE {
            return Err(Error::MalformedBox {
                offset: h.start,
                size: h.size as u64,
                reason: "declared size is smaller than the box header",
            });
        }
        if h.end() > end {
            // past the end of the file is truncation, past a container is corruption
            return Err(if at_root {
                Error::UnexpectedEndOfStream { offset: end, wanted: h.end() - end }
            } else {
                Error::MalformedBox {
                    offset: h.start,
                    size: h.size as u64,
                    reason: "box extends past its container",
                }
            });
        }

        let handler = registry.dispatch(&h.typ)?;
        trace!("box '{}' @ {} size {} -> {}", h.typ, h.start, h.size, handler.name);
        (handler.action)(r, &h, state)?;

        let consumed = r.position()?;
        if consumed > h.end() {
            warn!(
                "handler '{}' read {} bytes past the end of '{}' @ {}",
                handler.name,
                consumed - h.end(),
                h.typ,
                h.start
            );
        }
        r.seek_to(h.end())?;
    }
    Ok(())
}

/// Registry scopes. Each container level gets its own handler table so a tag
/// is only interpreted where it is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Root,
    Movie,
}

impl Scope {
    pub fn registry<R: Read + Seek>(self) -> Registry<R, ParseState> {
        match self {
            Scope::Root => Registry::<R, ParseState>::builder()
                .handler("moov", Matcher::Tag(FourCC::MOOV), parse_moov::<R>)
                .build_with_skip(),
            Scope::Movie => Registry::<R, ParseState>::builder()
                .handler("mvhd", Matcher::Tag(FourCC::MVHD), parse_mvhd::<R>)
                .build_with_skip(),
        }
    }
}

/// Everything the handlers collect during one parse.
#[derive(Debug, Default)]
pub struct ParseState {
    pub movie_header: Option<MovieHeader>,
    /// Header of the `mvhd` box the movie header was decoded from.
    pub mvhd_box: Option<BoxHeader>,
}

fn parse_moov<R: Read + Seek>(r: &mut ByteCursor<R>, hdr: &BoxHeader, state: &mut ParseState) -> Result<()> {
    r.seek_to(hdr.payload_start())?;
    let registry = Scope::Movie.registry();
    walk(r, Extent::Until(hdr.end()), &registry, state)
}

fn parse_mvhd<R: Read + Seek>(r: &mut ByteCursor<R>, hdr: &BoxHeader, state: &mut ParseState) -> Result<()> {
    if state.movie_header.is_some() {
        warn!("ignoring additional mvhd @ {}", hdr.start);
        return Ok(());
    }
    let mvhd = MovieHeader::decode(r, hdr)?;
    debug!(
        "mvhd @ {}: created={} modified={} timescale={} duration={}",
        hdr.start, mvhd.creation_time, mvhd.modification_time, mvhd.time_scale, mvhd.duration
    );
    state.movie_header = Some(mvhd);
    state.mvhd_box = Some(*hdr);
    Ok(())
}

/// Walk a whole stream from its current position with the root scope.
pub fn parse_movie<R: Read + Seek>(r: &mut ByteCursor<R>) -> Result<ParseState> {
    let mut state = ParseState::default();
    let registry = Scope::Root.registry();
    walk(r, Extent::ToEnd, &registry, &mut state)?;
    Ok(state)
}
