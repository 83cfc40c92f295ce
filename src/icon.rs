use crate::render::{render_icon, IconRows};

//===========================================================================//

/// The width of an add-in icon, in pixels.
pub const ICON_WIDTH: u32 = 30;
/// The height of an add-in icon, in pixels, border rows included.
pub const ICON_HEIGHT: u32 = 19;
/// The number of bytes per packed icon row.
pub const ICON_ROW_LEN: usize = 4;
/// The size of a full packed icon, in bytes.
pub const ICON_LEN: usize = ICON_ROW_LEN * ICON_HEIGHT as usize;
/// The size of the part of the icon stored in a package header (every row
/// but the first and last), in bytes.
pub const ICON_BLOCK_LEN: usize = ICON_LEN - 2 * ICON_ROW_LEN;

// The first and last rows are drawn by the calculator menu frame, not taken
// from the icon source.
const TOP_BORDER: [u8; ICON_ROW_LEN] = [0x00, 0x00, 0x00, 0x04];
const BOTTOM_BORDER: [u8; ICON_ROW_LEN] = [0x7f, 0xff, 0xff, 0xfc];

//===========================================================================//

/// A 30x19 monochrome icon, packed one bit per pixel, most significant bit
/// first, four bytes per row from top to bottom.  A set bit is a black pixel.
#[derive(Clone, Eq, PartialEq)]
pub struct MonoIcon {
    data: [u8; ICON_LEN],
}

impl MonoIcon {
    /// Creates an icon with an empty interior between the two border rows.
    pub fn blank() -> MonoIcon {
        MonoIcon::from_header_block(&[0; ICON_BLOCK_LEN])
    }

    /// Creates an icon from packed data for all 19 rows.  The two unused bits
    /// at the end of each row are cleared.
    pub fn from_packed(mut data: [u8; ICON_LEN]) -> MonoIcon {
        for row in data.chunks_mut(ICON_ROW_LEN) {
            row[ICON_ROW_LEN - 1] &= 0xfc;
        }
        MonoIcon { data }
    }

    /// Creates an icon from the 17 rows stored in a package header, adding
    /// the fixed border rows around them.
    pub fn from_header_block(block: &[u8; ICON_BLOCK_LEN]) -> MonoIcon {
        let mut data = [0u8; ICON_LEN];
        data[..ICON_ROW_LEN].copy_from_slice(&TOP_BORDER);
        data[ICON_ROW_LEN..(ICON_LEN - ICON_ROW_LEN)].copy_from_slice(block);
        data[(ICON_LEN - ICON_ROW_LEN)..].copy_from_slice(&BOTTOM_BORDER);
        MonoIcon::from_packed(data)
    }

    /// Returns the rows that get stored in a package header.
    pub fn header_block(&self) -> [u8; ICON_BLOCK_LEN] {
        let mut block = [0u8; ICON_BLOCK_LEN];
        block.copy_from_slice(&self.data[ICON_ROW_LEN..(ICON_LEN - ICON_ROW_LEN)]);
        block
    }

    /// Returns the packed data for all 19 rows.
    pub fn as_bytes(&self) -> &[u8; ICON_LEN] {
        &self.data
    }

    /// Returns true if the pixel at column `x`, row `y` (from the top) is
    /// black.  Panics if the coordinates are out of range.
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        let (index, mask) = MonoIcon::locate(x, y);
        self.data[index] & mask != 0
    }

    /// Sets the pixel at column `x`, row `y` to black (`true`) or white.
    /// Panics if the coordinates are out of range.
    pub fn set_pixel(&mut self, x: u32, y: u32, black: bool) {
        let (index, mask) = MonoIcon::locate(x, y);
        if black {
            self.data[index] |= mask;
        } else {
            self.data[index] &= !mask;
        }
    }

    fn locate(x: u32, y: u32) -> (usize, u8) {
        if x >= ICON_WIDTH || y >= ICON_HEIGHT {
            panic!(
                "Pixel ({}, {}) is outside of the {}x{} icon",
                x, y, ICON_WIDTH, ICON_HEIGHT
            );
        }
        let index = (y as usize) * ICON_ROW_LEN + (x as usize) / 8;
        (index, 0x80 >> (x % 8))
    }

    /// Renders the icon as text, two characters per pixel.
    pub fn rows(&self) -> IconRows<'_> {
        render_icon(&self.data, ICON_WIDTH, ICON_HEIGHT)
    }
}

impl Default for MonoIcon {
    fn default() -> MonoIcon {
        MonoIcon::blank()
    }
}

impl std::fmt::Debug for MonoIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "MonoIcon")?;
        for row in self.rows() {
            writeln!(f, "|{}|", row)?;
        }
        Ok(())
    }
}

//===========================================================================//


//===========================================================================//
