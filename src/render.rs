//! Text rendering of packed monochrome bitmaps, for dumps and debugging.

//===========================================================================//

const ON: char = '#';
const OFF: char = ' ';

/// Renders a packed 1-bit-per-pixel bitmap as text.  Rows are `(width + 7) /
/// 8` bytes each, most significant bit first, from top to bottom.  Each pixel
/// becomes two characters so the result looks roughly square in a monospaced
/// font.  Bits beyond the end of `data` render as white.
pub fn render_icon(data: &[u8], width: u32, height: u32) -> IconRows<'_> {
    IconRows { data, width, height, row: 0 }
}

/// An iterator over the text rows of a rendered bitmap.  Cloning it restarts
/// from the same position.
#[derive(Clone, Debug)]
pub struct IconRows<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    row: u32,
}

impl<'a> IconRows<'a> {
    fn render_row(&self, row: u32) -> String {
        let stride = ((self.width as usize) + 7) / 8;
        let start = (row as usize) * stride;
        let mut line = String::with_capacity(2 * self.width as usize);
        for col in 0..(self.width as usize) {
            let byte = self.data.get(start + col / 8).copied().unwrap_or(0);
            let glyph = if byte & (0x80 >> (col % 8)) != 0 { ON } else { OFF };
            line.push(glyph);
            line.push(glyph);
        }
        line
    }
}

impl<'a> Iterator for IconRows<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.row >= self.height {
            return None;
        }
        let line = self.render_row(self.row);
        self.row += 1;
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.height - self.row) as usize;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for IconRows<'a> {}

//===========================================================================//


//===========================================================================//
