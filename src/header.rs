use crate::diagnostics::{Field, Warning};
use crate::error::{Error, Result};
use crate::icon::{MonoIcon, ICON_BLOCK_LEN};
use crate::layout::{self, HeaderRevision, Span, HEADER_LEN};
use crate::text::{matches_template, read_slot, write_slot};
use byteorder::{BigEndian, ByteOrder};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

/// The largest payload whose total size still fits the header's 32-bit size
/// fields.
pub const MAX_PAYLOAD_LEN: u32 = u32::MAX - HEADER_LEN as u32;

/// The default version string.
pub const DEFAULT_VERSION: &str = "00.00.0000";
/// The default internal name.
pub const DEFAULT_INTERNAL_NAME: &str = "@ADDIN";

//===========================================================================//

/// The descriptive content of a package header: names, version, date and
/// icon.  Sizes and checksums are derived when encoding.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct PackageInfo {
    /// The name shown in the calculator menu (at most 8 characters).
    pub program_name: String,
    /// The internal name, like `@ADDIN` (at most 8 characters).
    pub internal_name: String,
    /// The version, like `01.00.0000` (at most 10 characters).
    pub version: String,
    /// The build date, like `2024.0101.1200` (at most 14 characters).
    pub build_date: String,
    /// The menu icon.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub icon: MonoIcon,
}

/// A freshly encoded header.
#[derive(Clone)]
pub struct EncodedHeader {
    /// The on-disk header bytes.
    pub bytes: [u8; HEADER_LEN],
    /// The fields whose values were cut to fit their slot, in header order.
    pub truncated: Vec<Field>,
}

/// A header that passed validation.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ParsedHeader {
    /// The decoded text fields and icon.
    pub info: PackageInfo,
    /// The total file size recorded in the header (header plus payload).
    pub total_size: u32,
}

//===========================================================================//

impl PackageInfo {
    /// Creates header info with the given program name, the default version
    /// and internal name, no build date and a blank icon.
    pub fn new(program_name: &str) -> PackageInfo {
        PackageInfo {
            program_name: program_name.to_string(),
            internal_name: DEFAULT_INTERNAL_NAME.to_string(),
            version: DEFAULT_VERSION.to_string(),
            build_date: String::new(),
            icon: MonoIcon::blank(),
        }
    }

    /// Returns the value of a text field.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::ProgramName => &self.program_name,
            Field::InternalName => &self.internal_name,
            Field::Version => &self.version,
            Field::BuildDate => &self.build_date,
        }
    }

    /// Checks every text field for values that won't fit or that don't follow
    /// the field's advised format.  A field too long is not also checked for
    /// format.
    pub fn check(&self) -> Vec<Warning> {
        let fields = [
            Field::ProgramName,
            Field::Version,
            Field::BuildDate,
            Field::InternalName,
        ];
        let mut warnings = Vec::new();
        for &field in fields.iter() {
            let value = self.field(field);
            if value.len() > field.max_len() {
                warnings.push(Warning::FieldTooLong {
                    field,
                    value: value.to_string(),
                });
            } else if let Some((template, _)) = field.template() {
                if !matches_template(value, template) {
                    warnings.push(Warning::FieldFormat {
                        field,
                        value: value.to_string(),
                    });
                }
            }
        }
        warnings
    }

    /// Encodes a header for a payload of `payload_size` bytes.  Values too
    /// long for their slot are truncated and reported in the result.
    ///
    /// # Panics
    ///
    /// Panics if `payload_size` is greater than [`MAX_PAYLOAD_LEN`], since the
    /// total size would not fit the header.
    /// [`G1aFile::write`](crate::G1aFile::write) reports that case as
    /// [`Error::PayloadTooLarge`] instead.
    pub fn encode(
        &self,
        payload_size: u32,
        revision: HeaderRevision,
    ) -> EncodedHeader {
        assert!(
            payload_size <= MAX_PAYLOAD_LEN,
            "payload of {} bytes is too large for a g1a header",
            payload_size
        );
        let mut bytes = [0u8; HEADER_LEN];
        bytes[layout::SIGNATURE_SPAN.range()].copy_from_slice(layout::SIGNATURE);
        bytes[layout::KIND.offset] = layout::KIND_ADDIN;
        bytes[layout::FILLER_SPAN.range()].copy_from_slice(&layout::FILLER);
        bytes[layout::SECONDARY_SPAN.offset] = layout::SECONDARY;

        let slots = [
            (Field::InternalName, layout::INTERNAL_NAME),
            (Field::Version, layout::VERSION),
            (Field::BuildDate, layout::BUILD_DATE),
            (Field::ProgramName, layout::PROGRAM_NAME),
        ];
        let mut truncated = Vec::new();
        for &(field, span) in slots.iter() {
            if write_slot(&mut bytes[span.range()], self.field(field)) {
                truncated.push(field);
            }
        }
        bytes[layout::ICON.range()].copy_from_slice(&self.icon.header_block());

        let total_size = payload_size + HEADER_LEN as u32;
        BigEndian::write_u32(&mut bytes[layout::TOTAL_SIZE_1.range()], total_size);
        BigEndian::write_u32(&mut bytes[layout::TOTAL_SIZE_2.range()], total_size);
        let (checksum_a, checksum_b) =
            checksums(bytes[layout::CHECKSUM_SOURCE]);
        bytes[layout::CHECKSUM_A.offset] = checksum_a;
        bytes[layout::CHECKSUM_B.offset] = checksum_b;

        revision.invert_prefix(&mut bytes);
        EncodedHeader { bytes, truncated }
    }

    /// Validates and decodes an on-disk header.  `file_size` is the actual
    /// size of the whole file (header plus payload).  Checks the signature,
    /// the kind marker, the size fields and then the checksums, and reports
    /// only the first failure.
    pub fn decode(
        header: &[u8],
        file_size: u64,
        revision: HeaderRevision,
    ) -> Result<ParsedHeader> {
        if header.len() < HEADER_LEN {
            return Err(Error::TooShort(header.len() as u64));
        }
        if file_size < HEADER_LEN as u64 {
            return Err(Error::TooShort(file_size));
        }
        let mut bytes = [0u8; HEADER_LEN];
        bytes.copy_from_slice(&header[..HEADER_LEN]);
        revision.invert_prefix(&mut bytes);

        let signature = &bytes[layout::SIGNATURE_SPAN.range()];
        if signature != layout::SIGNATURE {
            return Err(Error::InvalidSignature(
                String::from_utf8_lossy(signature).into_owned(),
            ));
        }
        let kind = bytes[layout::KIND.offset];
        if kind != layout::KIND_ADDIN {
            return Err(Error::NotAnApplication(kind));
        }
        let first = read_u32(&bytes, layout::TOTAL_SIZE_1);
        let second = read_u32(&bytes, layout::TOTAL_SIZE_2);
        if u64::from(first) != file_size || u64::from(second) != file_size {
            return Err(Error::SizeMismatch { expected: file_size, first, second });
        }
        let expected = checksums(bytes[layout::CHECKSUM_SOURCE]);
        let found = (
            bytes[layout::CHECKSUM_A.offset],
            bytes[layout::CHECKSUM_B.offset],
        );
        if found != expected {
            return Err(Error::ChecksumMismatch { expected, found });
        }

        let mut block = [0u8; ICON_BLOCK_LEN];
        block.copy_from_slice(&bytes[layout::ICON.range()]);
        let info = PackageInfo {
            program_name: read_slot(&bytes[layout::PROGRAM_NAME.range()]),
            internal_name: read_slot(&bytes[layout::INTERNAL_NAME.range()]),
            version: read_slot(&bytes[layout::VERSION.range()]),
            build_date: read_slot(&bytes[layout::BUILD_DATE.range()]),
            icon: MonoIcon::from_header_block(&block),
        };
        log::debug!(
            "decoded header for {:?} ({} bytes total)",
            info.program_name,
            first
        );
        Ok(ParsedHeader { info, total_size: first })
    }
}

fn read_u32(bytes: &[u8], span: Span) -> u32 {
    BigEndian::read_u32(&bytes[span.range()])
}

/// Computes both checksum bytes from the low byte of the total size.
fn checksums(size_low_byte: u8) -> (u8, u8) {
    (
        size_low_byte.wrapping_add(layout::CHECKSUM_A_OFFSET),
        size_low_byte.wrapping_add(layout::CHECKSUM_B_OFFSET),
    )
}

//===========================================================================//


//===========================================================================//
