//! # dibmat
//!
//! Windows bitmap (BMP/DIB) decoder and encoder built around a packed
//! truecolor pel matrix.
//!
//! Decoding accepts every uncompressed bit depth (1, 2, 4, 8, 16, 24, and
//! 32 bits per pel), expands palette indices through the color table, and
//! normalizes row order so that matrix row 0 is always the top of the
//! image, whether the file stored its scanlines bottom-up (the default) or
//! top-down (negative height). Encoding always produces a canonical
//! 32-bit truecolor file: no color table, no compression, pixel data at
//! byte 54, bottom-up rows.
//!
//! ## Non-Goals
//!
//! - Compressed variants (RLE4/RLE8, embedded JPEG or PNG)
//! - Bit depths outside the set above
//! - Color management / ICC profiles
//! - Encode targets other than 32-bit truecolor
//!
//! ## Usage
//!
//! ```no_run
//! let (header, image) = dibmat::decode("photo.bmp")?;
//! println!("{}x{} at {} bpp", header.width(), header.height(), header.depth());
//!
//! let gray = image.to_grayscale();
//! dibmat::encode(&gray, "photo-gray.bmp")?;
//! # Ok::<(), dibmat::BmpError>(())
//! ```
//!
//! Header values, palette, and matrix are produced fresh per call and
//! never shared between calls; decoding distinct files concurrently is
//! safe. There is no cancellation: each call runs to completion or fails
//! with a [`BmpError`].

#![forbid(unsafe_code)]

mod decode;
mod encode;
mod error;
mod header;
mod limits;
mod matrix;
mod palette;
pub mod pel;
mod wire;

pub use decode::{DecodeRequest, Strictness};
pub use encode::{encode, write_bmp};
pub use error::BmpError;
pub use header::{
    BMP_SIGNATURE, FILE_HEADER_SIZE, FileHeader, Header, INFO_HEADER_SIZE, InfoHeader,
    PIXEL_DATA_OFFSET,
};
pub use limits::Limits;
pub use matrix::Bitmap;
pub use palette::Palette;
pub use pel::{RgbQuad, pack_channels, to_grayscale, unpack_channels};
pub use wire::{swap16, swap32};

use std::io::Read;
use std::path::Path;

/// Decode the BMP file at `path` with default options.
///
/// Equivalent to [`DecodeRequest::new()`](DecodeRequest)`.decode_path(path)`.
pub fn decode(path: impl AsRef<Path>) -> Result<(Header, Bitmap), BmpError> {
    DecodeRequest::new().decode_path(path)
}

/// Decode a BMP byte stream with default options.
pub fn read_bmp<R: Read>(reader: R) -> Result<(Header, Bitmap), BmpError> {
    DecodeRequest::new().decode(reader)
}
