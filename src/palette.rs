//! Color table codec for bit depths of 8 and fewer.

use std::io::Read;

use crate::error::BmpError;
use crate::pel::pack_channels;
use crate::wire::ByteReader;

const MAX_ENTRIES: usize = 256;

/// Index-addressed truecolor lookup built from the on-disk RGBQUAD table.
///
/// The table always holds 256 slots; slots past the entry count stay black,
/// so an out-of-range palette index in the pixel plane resolves to black
/// rather than failing the decode.
#[derive(Clone, Debug)]
pub struct Palette {
    pels: [u32; MAX_ENTRIES],
    len: usize,
}

/// Default entry count implied by the bit depth when colors-used is zero.
fn nominal_entries(depth: u16) -> usize {
    match depth {
        1 => 2,
        2 => 4,
        4 => 16,
        8 => 256,
        // truecolor depths carry no color table
        _ => 0,
    }
}

impl Palette {
    pub(crate) fn empty() -> Self {
        Self {
            pels: [0; MAX_ENTRIES],
            len: 0,
        }
    }

    /// Read the color table that follows the info header. A nonzero
    /// colors-used count overrides the depth's nominal entry count.
    pub(crate) fn read<R: Read>(
        r: &mut ByteReader<R>,
        depth: u16,
        colors_used: u32,
    ) -> Result<Self, BmpError> {
        let entries = if colors_used != 0 {
            if colors_used as usize > MAX_ENTRIES {
                return Err(BmpError::InvalidHeader(format!(
                    "color table of {colors_used} entries exceeds the {MAX_ENTRIES}-entry maximum"
                )));
            }
            colors_used as usize
        } else {
            nominal_entries(depth)
        };

        let mut palette = Self::empty();
        for pel in palette.pels.iter_mut().take(entries) {
            let mut quad = [0u8; 4];
            r.read_exact(&mut quad)?;
            // on-disk entry order is (blue, green, red, reserved)
            let [blue, green, red, _reserved] = quad;
            *pel = pack_channels(red, green, blue);
        }
        palette.len = entries;
        Ok(palette)
    }

    /// Number of entries read from the file.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Truecolor pel for a palette index. Unfilled slots are black.
    #[inline]
    pub fn pel(&self, index: u8) -> u32 {
        self.pels[usize::from(index)]
    }
}
