//! Decoding of add-in icons from BMP files.
//!
//! Only the classic file header fields are consulted: the two-byte magic, the
//! pixel array offset at byte 10, the width and height at bytes 18 and 22 and
//! the bits-per-pixel at byte 28 (all little-endian).  Pixels are always read
//! as a 30x19 grid, whatever size the file declares; grid pixels past the end
//! of the file are off.

use crate::bmpdepth::BmpDepth;
use crate::diagnostics::Warning;
use crate::error::{Error, Result};
use crate::icon::{MonoIcon, ICON_HEIGHT, ICON_LEN, ICON_ROW_LEN, ICON_WIDTH};
use byteorder::{ByteOrder, LittleEndian};
use std::fs::File;
use std::io::Read;
use std::path::Path;

//===========================================================================//

// The magic values of the BMP family (Windows bitmap and the OS/2 variants).
const BMP_SIGNATURES: &[&[u8; 2]] = &[b"BM", b"BA", b"CI", b"CP", b"IC", b"PT"];

// Offsets of the header fields that are read.
const PIXEL_OFFSET_AT: usize = 10;
const WIDTH_AT: usize = 18;
const HEIGHT_AT: usize = 22;
const DEPTH_AT: usize = 28;
const MIN_HEADER_LEN: usize = DEPTH_AT + 2;

// Channel sums at or above these are white.
const RGB_THRESHOLD: u32 = 384;
const RGB555_THRESHOLD: u32 = 23;
const RGB_WHITE: u32 = 3 * 255;

//===========================================================================//

/// The fields of a BMP file header that icon decoding relies on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BmpHeader {
    /// The declared width, in pixels.
    pub width: u32,
    /// The declared height, in pixels.
    pub height: u32,
    /// The number of bits per pixel: 1, 16, 24 or 32.
    pub bits_per_pixel: u16,
    /// Where the pixel array starts, from the start of the file.
    pub pixel_offset: u32,
}

/// Parses the header of a BMP file.  Fails if the magic value isn't one of
/// `BM`, `BA`, `CI`, `CP`, `IC` or `PT`, or if the depth is unsupported.
pub fn parse_header(data: &[u8]) -> Result<BmpHeader> {
    if data.len() < MIN_HEADER_LEN {
        return Err(Error::TruncatedBitmap {
            needed: MIN_HEADER_LEN as u64,
            available: data.len() as u64,
        });
    }
    let magic = [data[0], data[1]];
    if !BMP_SIGNATURES.contains(&&magic) {
        return Err(Error::InvalidBitmapSignature(magic));
    }
    let pixel_offset = LittleEndian::read_u32(&data[PIXEL_OFFSET_AT..]);
    let width = LittleEndian::read_u32(&data[WIDTH_AT..]);
    let height = LittleEndian::read_u32(&data[HEIGHT_AT..]);
    let bits_per_pixel = LittleEndian::read_u16(&data[DEPTH_AT..]);
    if BmpDepth::from_bits_per_pixel(bits_per_pixel).is_none() {
        return Err(Error::UnsupportedDepth(bits_per_pixel));
    }
    Ok(BmpHeader { width, height, bits_per_pixel, pixel_offset })
}

//===========================================================================//

/// A BMP file held in memory, ready for icon extraction.
pub struct SourceBitmap {
    header: BmpHeader,
    depth: BmpDepth,
    data: Vec<u8>,
}

impl SourceBitmap {
    /// Reads a whole BMP file into memory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<SourceBitmap> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::CannotOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let len = file.metadata()?.len();
        SourceBitmap::read(file, len)
    }

    /// Reads BMP data from `reader`, with `size_hint` bytes expected.
    pub fn read<R: Read>(mut reader: R, size_hint: u64) -> Result<SourceBitmap> {
        let mut data = Vec::new();
        let capacity =
            usize::try_from(size_hint).map_err(|_| Error::Allocation(size_hint))?;
        if data.try_reserve_exact(capacity).is_err() {
            return Err(Error::Allocation(size_hint));
        }
        reader.read_to_end(&mut data)?;
        SourceBitmap::from_bytes(data)
    }

    /// Parses BMP data already in memory.  Besides the header checks of
    /// [`parse_header`], fails if the pixel array would start past the end of
    /// the data.  A pixel array shorter than the 30x19 grid is accepted.
    pub fn from_bytes(data: Vec<u8>) -> Result<SourceBitmap> {
        let header = parse_header(&data)?;
        let depth = match BmpDepth::from_bits_per_pixel(header.bits_per_pixel)
        {
            Some(depth) => depth,
            None => return Err(Error::UnsupportedDepth(header.bits_per_pixel)),
        };
        if (data.len() as u64) < u64::from(header.pixel_offset) {
            return Err(Error::TruncatedBitmap {
                needed: u64::from(header.pixel_offset),
                available: data.len() as u64,
            });
        }
        log::debug!(
            "bitmap is {}x{} at {} bpp, pixels at {:#x}",
            header.width,
            header.height,
            header.bits_per_pixel,
            header.pixel_offset
        );
        Ok(SourceBitmap { header, depth, data })
    }

    /// Returns the parsed file header.
    pub fn header(&self) -> &BmpHeader {
        &self.header
    }

    /// Compares the declared size against the expected one.
    pub fn dimension_warnings(
        &self,
        expected_width: u32,
        expected_height: u32,
    ) -> Vec<Warning> {
        let mut warnings = Vec::new();
        if self.header.width != expected_width {
            warnings.push(Warning::IconWidth {
                found: self.header.width,
                expected: expected_width,
            });
        }
        if self.header.height != expected_height {
            warnings.push(Warning::IconHeight {
                found: self.header.height,
                expected: expected_height,
            });
        }
        warnings
    }

    /// Converts the bitmap to a monochrome icon.
    ///
    /// Direct-color pixels are black when the sum of their three channels is
    /// below half the maximum; anything that is not pure black or pure white
    /// raises [`Warning::IconNotMonochrome`].  16-bit bitmaps always raise
    /// [`Warning::IconPartiallySupported`].  In 1-bit bitmaps a set bit is
    /// black, whatever the color table says.  Pixels the data doesn't reach
    /// are white.
    pub fn extract_icon(self) -> (MonoIcon, Vec<Warning>) {
        let stride = self.depth.row_stride(ICON_WIDTH);
        let pixels = self
            .data
            .get((self.header.pixel_offset as usize)..)
            .unwrap_or(&[]);
        let mut packed = [0u8; ICON_LEN];
        let mut not_monochrome = false;
        // Rows are stored from the bottom up.
        for y in 0..(ICON_HEIGHT as usize) {
            let row = pixels.get((y * stride)..).unwrap_or(&[]);
            let row = &row[..stride.min(row.len())];
            let out = &mut packed[((ICON_HEIGHT as usize - 1 - y) * ICON_ROW_LEN)..]
                [..ICON_ROW_LEN];
            for x in 0..(ICON_WIDTH as usize) {
                let black = match self.depth {
                    BmpDepth::One => match row.get(x / 8) {
                        Some(&byte) => byte & (0x80 >> (x % 8)) != 0,
                        None => false,
                    },
                    BmpDepth::Sixteen => match row.get((2 * x)..(2 * x + 2)) {
                        Some(bytes) => {
                            let color = LittleEndian::read_u16(bytes);
                            let red = u32::from((color & 0x7c00) >> 10);
                            let green = u32::from((color & 0x03e0) >> 5);
                            let blue = u32::from(color & 0x001f);
                            red + green + blue < RGB555_THRESHOLD
                        }
                        None => false,
                    },
                    BmpDepth::TwentyFour => {
                        match row.get((3 * x)..(3 * x + 3)) {
                            Some(channels) => {
                                let sum = channel_sum(channels);
                                not_monochrome |= sum != 0 && sum != RGB_WHITE;
                                sum < RGB_THRESHOLD
                            }
                            None => false,
                        }
                    }
                    BmpDepth::ThirtyTwo => {
                        // The first byte of each pixel is padding or alpha.
                        match row.get((4 * x + 1)..(4 * x + 4)) {
                            Some(channels) => {
                                let sum = channel_sum(channels);
                                not_monochrome |= sum != 0 && sum != RGB_WHITE;
                                sum < RGB_THRESHOLD
                            }
                            None => false,
                        }
                    }
                };
                if black {
                    out[x / 8] |= 0x80 >> (x % 8);
                }
            }
        }
        let mut warnings = Vec::new();
        if self.depth == BmpDepth::Sixteen {
            warnings.push(Warning::IconPartiallySupported {
                depth: self.depth.bits_per_pixel(),
            });
        }
        if not_monochrome {
            warnings.push(Warning::IconNotMonochrome);
        }
        (MonoIcon::from_packed(packed), warnings)
    }
}

fn channel_sum(channels: &[u8]) -> u32 {
    channels.iter().map(|&value| u32::from(value)).sum()
}

//===========================================================================//

/// An icon decoded from a bitmap file, with everything worth warning about.
#[derive(Clone, Debug)]
pub struct DecodedIcon {
    /// The decoded icon.
    pub icon: MonoIcon,
    /// Size mismatches first, then conversion warnings.
    pub warnings: Vec<Warning>,
}

/// Reads a BMP file and converts it to a monochrome icon, warning if it isn't
/// `expected_width` by `expected_height` pixels.
pub fn read_icon<P: AsRef<Path>>(
    path: P,
    expected_width: u32,
    expected_height: u32,
) -> Result<DecodedIcon> {
    let bitmap = SourceBitmap::open(path)?;
    let mut warnings = bitmap.dimension_warnings(expected_width, expected_height);
    let (icon, extract_warnings) = bitmap.extract_icon();
    warnings.extend(extract_warnings);
    Ok(DecodedIcon { icon, warnings })
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{parse_header, SourceBitmap};
    use crate::diagnostics::Warning;
    use crate::error::Error;
    use byteorder::{LittleEndian, WriteBytesExt};

    const PIXEL_OFFSET: u32 = 54;

    // Builds a BITMAPINFOHEADER-style file around the given pixel rows (in
    // storage order, bottom row first).
    fn bmp(magic: &[u8; 2], width: u32, height: u32, depth: u16,
           pixels: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(magic);
        data.write_u32::<LittleEndian>(PIXEL_OFFSET + pixels.len() as u32)
            .unwrap();
        data.write_u32::<LittleEndian>(0).unwrap(); // reserved
        data.write_u32::<LittleEndian>(PIXEL_OFFSET).unwrap();
        data.write_u32::<LittleEndian>(40).unwrap();
        data.write_u32::<LittleEndian>(width).unwrap();
        data.write_u32::<LittleEndian>(height).unwrap();
        data.write_u16::<LittleEndian>(1).unwrap(); // planes
        data.write_u16::<LittleEndian>(depth).unwrap();
        data.resize(PIXEL_OFFSET as usize, 0);
        data.extend_from_slice(pixels);
        data
    }

    fn rgb24(pixel: impl Fn(usize, usize) -> [u8; 3]) -> Vec<u8> {
        let mut pixels = Vec::new();
        for y in 0..19 {
            for x in 0..30 {
                pixels.extend_from_slice(&pixel(x, y));
            }
            pixels.extend_from_slice(&[0, 0]);
        }
        pixels
    }

    #[test]
    fn accepts_every_bmp_family_signature() {
        for magic in [b"BM", b"BA", b"CI", b"CP", b"IC", b"PT"].iter() {
            let data = bmp(magic, 30, 19, 24, &[]);
            let header = parse_header(&data).unwrap();
            assert_eq!(header.width, 30);
            assert_eq!(header.height, 19);
            assert_eq!(header.bits_per_pixel, 24);
            assert_eq!(header.pixel_offset, PIXEL_OFFSET);
        }
    }

    #[test]
    fn rejects_unknown_signature() {
        let data = bmp(b"PN", 30, 19, 24, &[]);
        match parse_header(&data) {
            Err(Error::InvalidBitmapSignature(magic)) => {
                assert_eq!(&magic, b"PN")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn depth_support() {
        for &depth in [1u16, 16, 24, 32].iter() {
            assert!(parse_header(&bmp(b"BM", 30, 19, depth, &[])).is_ok());
        }
        for &depth in [4u16, 8].iter() {
            match parse_header(&bmp(b"BM", 30, 19, depth, &[])) {
                Err(Error::UnsupportedDepth(found)) => assert_eq!(found, depth),
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }

    #[test]
    fn rejects_truncated_files() {
        match parse_header(b"BM\0\0") {
            Err(Error::TruncatedBitmap { needed: 30, available: 4 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        let mut data = bmp(b"BM", 30, 19, 24, &[]);
        data.truncate(40);
        match SourceBitmap::from_bytes(data) {
            Err(Error::TruncatedBitmap { needed: 54, available: 40 }) => {}
            other => panic!("unexpected result: {:?}", other.err()),
        }
    }

    #[test]
    fn short_pixel_array_reads_as_white() {
        // 18 black rows: the missing topmost grid row stays off.
        let mut pixels = rgb24(|_, _| [0; 3]);
        pixels.truncate(92 * 18);
        let data = bmp(b"BM", 30, 18, 24, &pixels);
        let bitmap = SourceBitmap::from_bytes(data).unwrap();
        assert_eq!(
            bitmap.dimension_warnings(30, 19),
            vec![Warning::IconHeight { found: 18, expected: 19 }]
        );
        let (icon, warnings) = bitmap.extract_icon();
        assert!(warnings.is_empty());
        assert_eq!(&icon.as_bytes()[..4], &[0, 0, 0, 0]);
        for row in icon.as_bytes()[4..].chunks(4) {
            assert_eq!(row, &[0xff, 0xff, 0xff, 0xfc]);
        }
    }

    #[test]
    fn partial_row_reads_as_white() {
        // A 1-bit image whose data stops after the first byte of the bottom
        // row.
        let data = bmp(b"BM", 8, 1, 1, &[0xff]);
        let (icon, warnings) =
            SourceBitmap::from_bytes(data).unwrap().extract_icon();
        assert!(warnings.is_empty());
        assert_eq!(&icon.as_bytes()[72..], &[0xff, 0, 0, 0]);
        assert!(icon.as_bytes()[..72].iter().all(|&byte| byte == 0));
    }

    #[test]
    fn read_reports_failed_allocation() {
        match SourceBitmap::read(std::io::empty(), u64::MAX) {
            Err(Error::Allocation(size)) => assert_eq!(size, u64::MAX),
            other => panic!("unexpected result: {:?}", other.err()),
        }
    }

    #[test]
    fn dimension_mismatch_is_a_warning() {
        let data = bmp(b"BM", 32, 19, 24, &rgb24(|_, _| [255; 3]));
        let bitmap = SourceBitmap::from_bytes(data).unwrap();
        assert_eq!(
            bitmap.dimension_warnings(30, 19),
            vec![Warning::IconWidth { found: 32, expected: 30 }]
        );
        let (icon, warnings) = bitmap.extract_icon();
        assert!(warnings.is_empty());
        assert!(icon.as_bytes().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn rows_are_flipped() {
        // Black only in the bottom stored row, first column.
        let pixels = rgb24(|x, y| if x == 0 && y == 0 { [0; 3] } else { [255; 3] });
        let data = bmp(b"BM", 30, 19, 24, &pixels);
        let (icon, warnings) =
            SourceBitmap::from_bytes(data).unwrap().extract_icon();
        assert!(warnings.is_empty());
        assert!(icon.pixel(0, 18));
        assert!(!icon.pixel(0, 0));
        assert_eq!(icon.as_bytes()[72], 0x80);
    }

    #[test]
    fn threshold_at_half_intensity() {
        let pixels = rgb24(|x, _| match x {
            0 => [128, 128, 127], // 383
            1 => [128, 128, 128], // 384
            _ => [255; 3],
        });
        let data = bmp(b"BM", 30, 19, 24, &pixels);
        let (icon, warnings) =
            SourceBitmap::from_bytes(data).unwrap().extract_icon();
        assert!(icon.pixel(0, 7));
        assert!(!icon.pixel(1, 7));
        assert_eq!(warnings, vec![Warning::IconNotMonochrome]);
    }

    #[test]
    fn gray_raises_not_monochrome_once() {
        let pixels = rgb24(|_, _| [100, 150, 150]); // 400
        let data = bmp(b"BM", 30, 19, 24, &pixels);
        let (icon, warnings) =
            SourceBitmap::from_bytes(data).unwrap().extract_icon();
        assert_eq!(warnings, vec![Warning::IconNotMonochrome]);
        assert!(icon.as_bytes().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn thirty_two_bit_skips_leading_byte() {
        let mut pixels = Vec::new();
        for _ in 0..19 {
            for x in 0..30 {
                // The leading byte would make every pixel gray if counted.
                let value = if x % 2 == 0 { 0 } else { 255 };
                pixels.extend_from_slice(&[0x80, value, value, value]);
            }
        }
        let data = bmp(b"BM", 30, 19, 32, &pixels);
        let (icon, warnings) =
            SourceBitmap::from_bytes(data).unwrap().extract_icon();
        assert!(warnings.is_empty());
        for row in icon.as_bytes().chunks(4) {
            assert_eq!(row, &[0xaa, 0xaa, 0xaa, 0xa8]);
        }
    }

    #[test]
    fn one_bit_set_bits_are_black() {
        let mut pixels = Vec::new();
        for y in 0..19u8 {
            pixels.extend_from_slice(&[y, 0x00, 0x00, 0xff]);
        }
        let data = bmp(b"BM", 30, 19, 1, &pixels);
        let (icon, warnings) =
            SourceBitmap::from_bytes(data).unwrap().extract_icon();
        assert!(warnings.is_empty());
        let bytes = icon.as_bytes();
        for y in 0..19 {
            let row = &bytes[((18 - y) * 4)..][..4];
            assert_eq!(row, &[y as u8, 0x00, 0x00, 0xfc]);
        }
    }

    #[test]
    fn sixteen_bit_is_partially_supported() {
        let mut pixels = Vec::new();
        for _ in 0..19 {
            for x in 0..30 {
                // 7 + 7 + 8 = 22 is black; 8 + 7 + 8 = 23 is white.
                let color: u16 = if x == 0 {
                    (7 << 10) | (7 << 5) | 8
                } else {
                    (8 << 10) | (7 << 5) | 8
                };
                pixels.write_u16::<LittleEndian>(color).unwrap();
            }
        }
        let data = bmp(b"BM", 30, 19, 16, &pixels);
        let (icon, warnings) =
            SourceBitmap::from_bytes(data).unwrap().extract_icon();
        assert_eq!(warnings, vec![Warning::IconPartiallySupported { depth: 16 }]);
        for y in 0..19 {
            assert!(icon.pixel(0, y));
            assert!(!icon.pixel(1, y));
        }
    }
}

//===========================================================================//
