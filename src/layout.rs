//! The on-disk layout of the 512-byte package header.
//!
//! Every field is described by a [`Span`] (offset and width); the codec reads
//! and writes through these constants only, and [`LAYOUT`] lists them all in
//! order for display and validation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::ops::Range;

//===========================================================================//

/// The size of a package header, in bytes.  The payload starts right after.
pub const HEADER_LEN: usize = 0x200;

/// The signature every package header starts with.
pub const SIGNATURE: &[u8; 8] = b"USBPower";

/// The kind marker that designates an add-in application.
pub const KIND_ADDIN: u8 = 0xf3;

pub(crate) const FILLER: [u8; 5] = [0x00, 0x10, 0x00, 0x10, 0x00];
pub(crate) const SECONDARY: u8 = 0x01;

pub(crate) const CHECKSUM_A_OFFSET: u8 = 0x41;
pub(crate) const CHECKSUM_B_OFFSET: u8 = 0xb8;

//===========================================================================//

/// A byte range within the header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Span {
    /// The offset of the first byte.
    pub offset: usize,
    /// The width of the field, in bytes.
    pub len: usize,
}

impl Span {
    const fn new(offset: usize, len: usize) -> Span {
        Span { offset, len }
    }

    /// Returns the range of header bytes this span covers.
    pub fn range(&self) -> Range<usize> {
        self.offset..(self.offset + self.len)
    }
}

pub(crate) const SIGNATURE_SPAN: Span = Span::new(0x000, 8);
pub(crate) const KIND: Span = Span::new(0x008, 1);
pub(crate) const FILLER_SPAN: Span = Span::new(0x009, 5);
pub(crate) const CHECKSUM_A: Span = Span::new(0x00e, 1);
pub(crate) const SECONDARY_SPAN: Span = Span::new(0x00f, 1);
pub(crate) const TOTAL_SIZE_1: Span = Span::new(0x010, 4);
pub(crate) const CHECKSUM_B: Span = Span::new(0x014, 1);
pub(crate) const RESERVED_1: Span = Span::new(0x015, 9);
pub(crate) const OBJECT_COUNT: Span = Span::new(0x01e, 2);
pub(crate) const INTERNAL_NAME: Span = Span::new(0x020, 8);
pub(crate) const RESERVED_2: Span = Span::new(0x028, 3);
pub(crate) const ESTRIP_COUNT: Span = Span::new(0x02b, 1);
pub(crate) const RESERVED_3: Span = Span::new(0x02c, 4);
pub(crate) const VERSION: Span = Span::new(0x030, 10);
pub(crate) const RESERVED_4: Span = Span::new(0x03a, 2);
pub(crate) const BUILD_DATE: Span = Span::new(0x03c, 14);
pub(crate) const RESERVED_5: Span = Span::new(0x04a, 2);
pub(crate) const ICON: Span = Span::new(0x04c, 68);
pub(crate) const ESTRIPS: Span = Span::new(0x090, 320);
pub(crate) const RESERVED_6: Span = Span::new(0x1d0, 4);
pub(crate) const PROGRAM_NAME: Span = Span::new(0x1d4, 8);
pub(crate) const RESERVED_7: Span = Span::new(0x1dc, 20);
pub(crate) const TOTAL_SIZE_2: Span = Span::new(0x1f0, 4);
pub(crate) const RESERVED_8: Span = Span::new(0x1f4, 12);

// The checksums are derived from the least significant byte of the first
// big-endian size field.
pub(crate) const CHECKSUM_SOURCE: usize = TOTAL_SIZE_1.offset + 3;

//===========================================================================//

/// One row of the header layout table.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    /// Where the field lives.
    pub span: Span,
    /// A short human-readable description.
    pub description: &'static str,
}

const fn field(span: Span, description: &'static str) -> FieldSpec {
    FieldSpec { span, description }
}

/// Every field of the header, in offset order.
pub const LAYOUT: &[FieldSpec] = &[
    field(SIGNATURE_SPAN, "\"USBPower\""),
    field(KIND, "0xF3 (add-in)"),
    field(FILLER_SPAN, "{ 0x00, 0x10, 0x00, 0x10, 0x00 }"),
    field(CHECKSUM_A, "@0x13 + 0x41"),
    field(SECONDARY_SPAN, "0x01"),
    field(TOTAL_SIZE_1, "File size: unsigned int, big endian"),
    field(CHECKSUM_B, "@0x13 + 0xB8"),
    field(RESERVED_1, "-"),
    field(OBJECT_COUNT, "Number of objects (if MCS)"),
    field(INTERNAL_NAME, "Internal name '@APPNAME'"),
    field(RESERVED_2, "-"),
    field(ESTRIP_COUNT, "Number of eStrips"),
    field(RESERVED_3, "-"),
    field(VERSION, "Version 'MM.mm.pppp'"),
    field(RESERVED_4, "-"),
    field(BUILD_DATE, "Date 'yyyy.MMdd.hhmm'"),
    field(RESERVED_5, "-"),
    field(ICON, "30*17 icon"),
    field(ESTRIPS, "eStrips 1 to 4 (80 bytes each)"),
    field(RESERVED_6, "-"),
    field(PROGRAM_NAME, "Program name"),
    field(RESERVED_7, "-"),
    field(TOTAL_SIZE_2, "File size: unsigned int, big endian"),
    field(RESERVED_8, "-"),
];

//===========================================================================//

/// Which revision of the format the header follows.  Revisions differ only
/// in how many leading header bytes are stored bit-inverted.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum HeaderRevision {
    /// Inverts bytes 0x000 to 0x014.
    Early,
    /// Inverts bytes 0x000 to 0x01f.
    #[default]
    Standard,
    /// Inverts bytes 0x000 to 0x027.
    Extended,
}

impl HeaderRevision {
    /// Returns the number of leading bytes stored bit-inverted.
    pub fn inverted_len(&self) -> usize {
        match *self {
            HeaderRevision::Early => 0x15,
            HeaderRevision::Standard => 0x20,
            HeaderRevision::Extended => 0x28,
        }
    }

    /// Parses a revision name (`early`, `standard` or `extended`).
    pub fn from_name(name: &str) -> Option<HeaderRevision> {
        match name {
            "early" => Some(HeaderRevision::Early),
            "standard" => Some(HeaderRevision::Standard),
            "extended" => Some(HeaderRevision::Extended),
            _ => None,
        }
    }

    /// Flips every byte of the structural prefix in place.  Applying this
    /// twice restores the original bytes.
    pub(crate) fn invert_prefix(&self, header: &mut [u8]) {
        for byte in header[..self.inverted_len()].iter_mut() {
            *byte = !*byte;
        }
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{HeaderRevision, HEADER_LEN, LAYOUT};

    #[test]
    fn layout_covers_header_exactly() {
        let mut next = 0;
        for spec in LAYOUT.iter() {
            assert_eq!(
                spec.span.offset, next,
                "field {:?} should start at {:#05x}",
                spec.description, next
            );
            assert!(spec.span.len > 0);
            next = spec.span.range().end;
        }
        assert_eq!(next, HEADER_LEN);
    }

    #[test]
    fn inversion_is_symmetric() {
        let revisions = &[
            HeaderRevision::Early,
            HeaderRevision::Standard,
            HeaderRevision::Extended,
        ];
        for &revision in revisions.iter() {
            let original: Vec<u8> = (0..HEADER_LEN).map(|i| i as u8).collect();
            let mut header = original.clone();
            revision.invert_prefix(&mut header);
            let len = revision.inverted_len();
            assert_eq!(header[len - 1], !original[len - 1]);
            assert_eq!(&header[len..], &original[len..]);
            revision.invert_prefix(&mut header);
            assert_eq!(header, original);
        }
    }

    #[test]
    fn revision_names() {
        assert_eq!(HeaderRevision::from_name("early"),
                   Some(HeaderRevision::Early));
        assert_eq!(HeaderRevision::from_name("extended"),
                   Some(HeaderRevision::Extended));
        assert_eq!(HeaderRevision::from_name("0x20"), None);
        assert_eq!(HeaderRevision::default(), HeaderRevision::Standard);
    }
}

//===========================================================================//
