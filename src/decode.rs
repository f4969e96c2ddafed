//! BMP decoder: header parsing, color table, and per-depth scanline
//! expansion into the pel matrix.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::trace;

use crate::error::BmpError;
use crate::header::{BMP_SIGNATURE, FileHeader, Header, INFO_HEADER_SIZE, InfoHeader};
use crate::limits::Limits;
use crate::matrix::Bitmap;
use crate::palette::Palette;
use crate::pel::pack_channels;
use crate::wire::ByteReader;

/// Controls how strictly the decoder validates header fields.
///
/// Width, height, bit depth, and the compression code are always enforced;
/// strictness only governs the fields a permissive decoder can ignore
/// without mis-reading pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Reject files whose signature is not "BM", whose declared info header
    /// size is not 40, or whose plane count is not 1.
    Strict,

    /// Read those fields but do not enforce them.
    #[default]
    Permissive,
}

/// Configured decode operation.
///
/// ```no_run
/// use dibmat::{DecodeRequest, Limits, Strictness};
///
/// let limits = Limits { max_pixels: Some(64_000_000), ..Default::default() };
/// let (header, image) = DecodeRequest::new()
///     .with_strictness(Strictness::Strict)
///     .with_limits(limits)
///     .decode_path("photo.bmp")?;
/// # Ok::<(), dibmat::BmpError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DecodeRequest {
    strictness: Strictness,
    limits: Limits,
}

impl DecodeRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Decode the file at `path`. The file handle is scoped to this call.
    pub fn decode_path(&self, path: impl AsRef<Path>) -> Result<(Header, Bitmap), BmpError> {
        let file = File::open(path)?;
        self.decode(BufReader::new(file))
    }

    /// Decode a BMP byte stream, consumed sequentially.
    pub fn decode<R: Read>(&self, reader: R) -> Result<(Header, Bitmap), BmpError> {
        let mut r = ByteReader::new(reader);
        let header = self.read_header(&mut r)?;
        let (width, height, depth) = (header.width(), header.height(), header.depth());

        self.limits.check(width, height)?;

        let palette = if depth <= 8 {
            let palette = Palette::read(&mut r, depth, header.info.colors_used)?;
            trace!("color table: {} entries", palette.len());
            palette
        } else {
            Palette::empty()
        };

        let count = usize::try_from(u64::from(width) * u64::from(height))
            .map_err(|_| BmpError::DimensionsTooLarge { width, height })?;
        let mut bitmap = Bitmap::from_raw(width, height, vec![0u32; count])?;

        let decode_row = row_decoder::<R>(depth).ok_or(BmpError::UnsupportedDepth(depth))?;
        let dead = dead_bytes(depth, width);

        for scanline in 0..height {
            let dest = if header.top_down {
                scanline
            } else {
                height - 1 - scanline
            };
            decode_row(&mut r, &palette, bitmap.row_mut(dest))?;
            r.skip(dead)?;
        }

        Ok((header, bitmap))
    }

    fn read_header<R: Read>(&self, r: &mut ByteReader<R>) -> Result<Header, BmpError> {
        let file = FileHeader::read(r)?;
        let mut info = InfoHeader::read(r)?;

        if self.strictness == Strictness::Strict {
            if file.signature != BMP_SIGNATURE {
                return Err(BmpError::InvalidHeader(format!(
                    "signature 0x{:04X} is not \"BM\"",
                    file.signature
                )));
            }
            if info.header_size != INFO_HEADER_SIZE {
                return Err(BmpError::InvalidHeader(format!(
                    "info header size {} (expected {INFO_HEADER_SIZE})",
                    info.header_size
                )));
            }
            if info.planes != 1 {
                return Err(BmpError::InvalidHeader(format!(
                    "planes field is {}, expected 1",
                    info.planes
                )));
            }
        }

        if info.width <= 0 {
            return Err(BmpError::InvalidHeader(format!(
                "width {} is not positive",
                info.width
            )));
        }
        if info.height == 0 {
            return Err(BmpError::InvalidHeader("height is zero".into()));
        }
        if info.height == i32::MIN {
            return Err(BmpError::InvalidHeader("height out of range".into()));
        }
        if info.compression != 0 {
            return Err(BmpError::UnsupportedCompression(info.compression));
        }
        if !matches!(info.bit_count, 1 | 2 | 4 | 8 | 16 | 24 | 32) {
            return Err(BmpError::UnsupportedDepth(info.bit_count));
        }

        let top_down = info.height < 0;
        info.height = info.height.abs();

        trace!(
            "BMP header: {}x{} at {} bpp, top-down: {}",
            info.width, info.height, info.bit_count, top_down
        );

        Ok(Header {
            file,
            info,
            top_down,
        })
    }
}

type RowDecoder<R> = fn(&mut ByteReader<R>, &Palette, &mut [u32]) -> Result<(), BmpError>;

/// One scanline decoder per supported depth. Each reads exactly the
/// payload bytes of one row; the caller skips the dead bytes.
fn row_decoder<R: Read>(depth: u16) -> Option<RowDecoder<R>> {
    Some(match depth {
        1 => decode_row_1bpp,
        2 => decode_row_2bpp,
        4 => decode_row_4bpp,
        8 => decode_row_8bpp,
        16 => decode_row_16bpp,
        24 => decode_row_24bpp,
        32 => decode_row_32bpp,
        _ => return None,
    })
}

/// Scanline payload bytes before padding.
pub(crate) fn bytes_per_row(depth: u16, width: u32) -> u64 {
    (u64::from(width) * u64::from(depth)).div_ceil(8)
}

/// Trailing dead bytes that bring a scanline to a 4-byte boundary.
pub(crate) fn dead_bytes(depth: u16, width: u32) -> u64 {
    (4 - bytes_per_row(depth, width) % 4) % 4
}

// In every sub-byte depth the most significant bits of a byte hold the
// leftmost pel of that byte's run.

fn decode_row_1bpp<R: Read>(
    r: &mut ByteReader<R>,
    palette: &Palette,
    out: &mut [u32],
) -> Result<(), BmpError> {
    for chunk in out.chunks_mut(8) {
        let byte = r.u8()?;
        for (k, pel) in chunk.iter_mut().enumerate() {
            *pel = palette.pel((byte >> (7 - k)) & 0x01);
        }
    }
    Ok(())
}

fn decode_row_2bpp<R: Read>(
    r: &mut ByteReader<R>,
    palette: &Palette,
    out: &mut [u32],
) -> Result<(), BmpError> {
    for chunk in out.chunks_mut(4) {
        let byte = r.u8()?;
        for (k, pel) in chunk.iter_mut().enumerate() {
            *pel = palette.pel((byte >> ((3 - k) * 2)) & 0x03);
        }
    }
    Ok(())
}

fn decode_row_4bpp<R: Read>(
    r: &mut ByteReader<R>,
    palette: &Palette,
    out: &mut [u32],
) -> Result<(), BmpError> {
    for chunk in out.chunks_mut(2) {
        let byte = r.u8()?;
        for (k, pel) in chunk.iter_mut().enumerate() {
            *pel = palette.pel((byte >> ((1 - k) * 4)) & 0x0F);
        }
    }
    Ok(())
}

fn decode_row_8bpp<R: Read>(
    r: &mut ByteReader<R>,
    palette: &Palette,
    out: &mut [u32],
) -> Result<(), BmpError> {
    for pel in out.iter_mut() {
        *pel = palette.pel(r.u8()?);
    }
    Ok(())
}

fn decode_row_16bpp<R: Read>(
    r: &mut ByteReader<R>,
    _palette: &Palette,
    out: &mut [u32],
) -> Result<(), BmpError> {
    for pel in out.iter_mut() {
        let word = u32::from(r.u16()?);
        // 5-bit channels land in the 8-bit positions unscaled
        let blue = word & 0x1F;
        let green = (word >> 5) & 0x1F;
        let red = (word >> 10) & 0x1F;
        *pel = pack_channels(red as u8, green as u8, blue as u8);
    }
    Ok(())
}

fn decode_row_24bpp<R: Read>(
    r: &mut ByteReader<R>,
    _palette: &Palette,
    out: &mut [u32],
) -> Result<(), BmpError> {
    for pel in out.iter_mut() {
        let [blue, green, red] = r.bytes::<3>()?;
        *pel = pack_channels(red, green, blue);
    }
    Ok(())
}

fn decode_row_32bpp<R: Read>(
    r: &mut ByteReader<R>,
    _palette: &Palette,
    out: &mut [u32],
) -> Result<(), BmpError> {
    for pel in out.iter_mut() {
        let [blue, green, red, _reserved] = r.bytes::<4>()?;
        *pel = pack_channels(red, green, blue);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_rows_are_dword_aligned() {
        for depth in [1u16, 2, 4, 8, 16, 24, 32] {
            for width in 1..=64u32 {
                let total = bytes_per_row(depth, width) + dead_bytes(depth, width);
                assert_eq!(total % 4, 0, "depth {depth}, width {width}");
            }
        }
    }

    #[test]
    fn payload_bytes_per_depth() {
        assert_eq!(bytes_per_row(1, 9), 2);
        assert_eq!(bytes_per_row(2, 5), 2);
        assert_eq!(bytes_per_row(4, 5), 3);
        assert_eq!(bytes_per_row(8, 5), 5);
        assert_eq!(bytes_per_row(16, 5), 10);
        assert_eq!(bytes_per_row(24, 2), 6);
        assert_eq!(bytes_per_row(32, 3), 12);
        assert_eq!(dead_bytes(24, 2), 2);
        assert_eq!(dead_bytes(32, 3), 0);
    }

    #[test]
    fn dispatch_covers_supported_depths() {
        for depth in [1u16, 2, 4, 8, 16, 24, 32] {
            assert!(row_decoder::<&[u8]>(depth).is_some());
        }
        assert!(row_decoder::<&[u8]>(12).is_none());
    }
}
