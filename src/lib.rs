//! A library for building and inspecting g1a add-in packages, the
//! application format of the CASIO fx-9860G calculator family.
//!
//! A g1a file is a 512-byte header followed by the raw binary of the add-in.
//! The header holds the program's names, version, build date and a 30x19
//! monochrome menu icon, along with two copies of the file size and two
//! checksum bytes derived from it.  Part of the header is stored bit-inverted.
//!
//! # Example
//!
//! ```
//! use g1a::{G1aFile, HeaderRevision, PackageInfo};
//!
//! let mut info = PackageInfo::new("DEMO");
//! info.build_date = "2024.0101.1200".to_string();
//! let package = G1aFile::new(info, vec![0u8; 1000]);
//! let mut file = Vec::new();
//! package.write(&mut file, HeaderRevision::Standard).unwrap();
//! assert_eq!(file.len(), 1512);
//!
//! let package = G1aFile::read(file.as_slice(), HeaderRevision::Standard)
//!     .unwrap();
//! assert_eq!(package.info().program_name, "DEMO");
//! for row in package.info().icon.rows() {
//!     println!("{}", row);
//! }
//! ```

#![warn(missing_docs)]

mod bitmap;
mod bmpdepth;
mod diagnostics;
mod error;
mod header;
mod icon;
pub mod layout;
pub mod options;
mod package;
mod render;
mod text;

pub use crate::bitmap::{
    parse_header as parse_bmp_header, read_icon, BmpHeader, DecodedIcon,
    SourceBitmap,
};
pub use crate::diagnostics::{Field, Warning, WarningPolicy};
pub use crate::error::{Error, Result};
pub use crate::header::{
    EncodedHeader, PackageInfo, ParsedHeader, DEFAULT_INTERNAL_NAME,
    DEFAULT_VERSION, MAX_PAYLOAD_LEN,
};
pub use crate::icon::{
    MonoIcon, ICON_BLOCK_LEN, ICON_HEIGHT, ICON_LEN, ICON_ROW_LEN, ICON_WIDTH,
};
pub use crate::layout::{HeaderRevision, HEADER_LEN};
pub use crate::package::G1aFile;
pub use crate::render::{render_icon, IconRows};
