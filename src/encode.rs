//! Canonical BMP encoder: always 32-bit truecolor, uncompressed,
//! bottom-up rows. Four bytes per pel means rows are already
//! DWORD-aligned, so no padding is written.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::trace;

use crate::error::BmpError;
use crate::header::Header;
use crate::matrix::Bitmap;
use crate::pel::unpack_channels;
use crate::wire::ByteWriter;

/// Encode the matrix to a file at `path`. The file handle is scoped to
/// this call.
pub fn encode(bitmap: &Bitmap, path: impl AsRef<Path>) -> Result<(), BmpError> {
    let file = File::create(path)?;
    write_bmp(bitmap, BufWriter::new(file))
}

/// Encode the matrix to any writer.
pub fn write_bmp<W: Write>(bitmap: &Bitmap, writer: W) -> Result<(), BmpError> {
    let (width, height) = (bitmap.width(), bitmap.height());
    if width == 0 || height == 0 {
        return Err(BmpError::InvalidHeader(format!(
            "cannot encode a {width}x{height} matrix"
        )));
    }

    let header = Header::canonical(width, height)?;
    trace!(
        "encoding {}x{} as 32-bit BMP, {} bytes",
        width, height, header.file.file_size
    );

    let mut w = ByteWriter::new(writer);
    header.write(&mut w)?;

    // Bottom-up: the first scanline written is the bottom matrix row.
    let mut scanline = Vec::with_capacity(width as usize * 4);
    for row in (0..height).rev() {
        scanline.clear();
        for &pel in bitmap.row(row) {
            let quad = unpack_channels(pel);
            scanline.extend_from_slice(&[quad.blue, quad.green, quad.red, 0]);
        }
        w.write_all(&scanline)?;
    }

    w.flush()
}
