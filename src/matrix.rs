//! The decoded truecolor pel matrix.

use crate::error::BmpError;
use crate::pel;

/// Row-major matrix of packed truecolor pels.
///
/// Row 0 is the visually topmost row regardless of how the source file
/// stored its scanlines. This is the sole artifact exchanged with
/// downstream consumers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pels: Vec<u32>,
}

impl Bitmap {
    /// Black matrix of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pels: vec![0; width as usize * height as usize],
        }
    }

    /// Wrap an existing row-major pel buffer. The buffer length must equal
    /// `width * height`.
    pub fn from_raw(width: u32, height: u32, pels: Vec<u32>) -> Result<Self, BmpError> {
        let needed = (width as usize)
            .checked_mul(height as usize)
            .ok_or(BmpError::DimensionsTooLarge { width, height })?;
        if pels.len() != needed {
            return Err(BmpError::BufferSizeMismatch {
                width,
                height,
                needed,
                actual: pels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The whole matrix as one row-major slice.
    pub fn pels(&self) -> &[u32] {
        &self.pels
    }

    /// Pel at (row, col). Panics when out of bounds, like slice indexing.
    #[inline]
    pub fn pel(&self, row: u32, col: u32) -> u32 {
        assert!(row < self.height && col < self.width);
        self.pels[row as usize * self.width as usize + col as usize]
    }

    #[inline]
    pub fn set_pel(&mut self, row: u32, col: u32, pel: u32) {
        assert!(row < self.height && col < self.width);
        self.pels[row as usize * self.width as usize + col as usize] = pel;
    }

    /// One row of pels, top row first.
    pub fn row(&self, row: u32) -> &[u32] {
        let w = self.width as usize;
        let start = row as usize * w;
        &self.pels[start..start + w]
    }

    pub(crate) fn row_mut(&mut self, row: u32) -> &mut [u32] {
        let w = self.width as usize;
        let start = row as usize * w;
        &mut self.pels[start..start + w]
    }

    /// Iterate rows from the top of the image down.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.pels.chunks_exact(self.width as usize)
    }

    /// Desaturated copy: every pel replaced by its luminance gray.
    pub fn to_grayscale(&self) -> Bitmap {
        Bitmap {
            width: self.width,
            height: self.height,
            pels: self.pels.iter().map(|&p| pel::to_grayscale(p)).collect(),
        }
    }

    /// The matrix as typed RGB pixels.
    #[cfg(feature = "rgb")]
    pub fn to_rgb(&self) -> Vec<rgb::RGB8> {
        self.pels
            .iter()
            .map(|&p| {
                let q = pel::unpack_channels(p);
                rgb::RGB8::new(q.red, q.green, q.blue)
            })
            .collect()
    }

    /// The matrix as an [`imgref::ImgVec`] of typed RGB pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<rgb::RGB8> {
        imgref::ImgVec::new(self.to_rgb(), self.width as usize, self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pel::pack_channels;

    #[test]
    fn from_raw_checks_length() {
        assert!(Bitmap::from_raw(2, 2, vec![0; 4]).is_ok());
        match Bitmap::from_raw(2, 2, vec![0; 5]) {
            Err(BmpError::BufferSizeMismatch {
                needed: 4,
                actual: 5,
                ..
            }) => {}
            other => panic!("expected BufferSizeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn row_major_addressing() {
        let mut bmp = Bitmap::new(3, 2);
        bmp.set_pel(1, 2, 0xABCDEF);
        assert_eq!(bmp.pel(1, 2), 0xABCDEF);
        assert_eq!(bmp.row(1), &[0, 0, 0xABCDEF]);
        assert_eq!(bmp.rows().count(), 2);
    }

    #[test]
    fn grayscale_maps_every_pel() {
        let bmp = Bitmap::from_raw(
            2,
            1,
            vec![pack_channels(30, 89, 11), pack_channels(255, 255, 255)],
        )
        .unwrap();
        let gray = bmp.to_grayscale();
        assert_eq!(
            gray.pels(),
            &[pack_channels(63, 63, 63), pack_channels(255, 255, 255)]
        );
    }
}
