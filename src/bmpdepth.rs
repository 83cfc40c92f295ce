//===========================================================================//

/// A color depth that icon bitmaps may use.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum BmpDepth {
    One,
    Sixteen,
    TwentyFour,
    ThirtyTwo,
}

impl BmpDepth {
    pub(crate) fn from_bits_per_pixel(
        bits_per_pixel: u16,
    ) -> Option<BmpDepth> {
        match bits_per_pixel {
            1 => Some(BmpDepth::One),
            16 => Some(BmpDepth::Sixteen),
            24 => Some(BmpDepth::TwentyFour),
            32 => Some(BmpDepth::ThirtyTwo),
            _ => None,
        }
    }

    pub(crate) fn bits_per_pixel(&self) -> u16 {
        match *self {
            BmpDepth::One => 1,
            BmpDepth::Sixteen => 16,
            BmpDepth::TwentyFour => 24,
            BmpDepth::ThirtyTwo => 32,
        }
    }

    /// Returns the size in bytes of one stored row `width` pixels wide,
    /// padding included (rows are padded to a multiple of four bytes).
    pub(crate) fn row_stride(&self, width: u32) -> usize {
        let row_data_size =
            ((width as usize) * (self.bits_per_pixel() as usize) + 7) / 8;
        ((row_data_size + 3) / 4) * 4
    }
}

//===========================================================================//


//===========================================================================//
