pub mod boxes;
pub mod cursor;
pub mod epoch;
pub mod error;
pub mod file;
pub mod mvhd;
pub mod parser;
pub mod registry;

pub use boxes::{BoxHeader, Extent, FourCC};
pub use cursor::{ByteCursor, Endian};
pub use error::{Error, Result};
pub use file::{Metadata, Mp4File};
pub use mvhd::MovieHeader;
pub use parser::{Scope, parse_movie, read_box_header, walk};
pub use registry::{Matcher, Registry};
