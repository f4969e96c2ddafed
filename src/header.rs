//! The two fixed-size DIB headers and their wire codec.

use std::io::{Read, Write};

use crate::error::BmpError;
use crate::wire::{ByteReader, ByteWriter};

/// On-disk size of the BITMAPFILEHEADER.
pub const FILE_HEADER_SIZE: u32 = 14;
/// On-disk size of the BITMAPINFOHEADER.
pub const INFO_HEADER_SIZE: u32 = 40;
/// Pixel-data offset of a canonical truecolor file (no color table).
pub const PIXEL_DATA_OFFSET: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

/// "BM", as the little-endian WORD at the start of the file.
pub const BMP_SIGNATURE: u16 = 0x4D42;

/// Pels-per-meter written into canonical output (72 DPI).
const CANONICAL_PPM: i32 = 2835;

/// BITMAPFILEHEADER: 14 bytes on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileHeader {
    pub signature: u16,
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    /// Byte offset from the start of the file to the pixel data. Surfaced
    /// for inspection; decoding consumes the stream sequentially.
    pub pixel_offset: u32,
}

/// BITMAPINFOHEADER: 40 bytes on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InfoHeader {
    pub header_size: u32,
    pub width: i32,
    /// Always positive here; a negative on-disk value sets
    /// [`Header::top_down`] instead.
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    /// Declared pixel-data byte size. May be zero for uncompressed files and
    /// is not authoritative.
    pub image_size: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

/// Both headers plus the row-order flag derived from the height sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub file: FileHeader,
    pub info: InfoHeader,
    /// True when the raw height was negative: scanlines are stored top to
    /// bottom instead of the default bottom-up order.
    pub top_down: bool,
}

impl FileHeader {
    pub(crate) fn read<R: Read>(r: &mut ByteReader<R>) -> Result<Self, BmpError> {
        Ok(Self {
            signature: r.u16()?,
            file_size: r.u32()?,
            reserved1: r.u16()?,
            reserved2: r.u16()?,
            pixel_offset: r.u32()?,
        })
    }

    pub(crate) fn write<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), BmpError> {
        w.u16(self.signature)?;
        w.u32(self.file_size)?;
        w.u16(self.reserved1)?;
        w.u16(self.reserved2)?;
        w.u32(self.pixel_offset)
    }
}

impl InfoHeader {
    pub(crate) fn read<R: Read>(r: &mut ByteReader<R>) -> Result<Self, BmpError> {
        Ok(Self {
            header_size: r.u32()?,
            width: r.i32()?,
            height: r.i32()?,
            planes: r.u16()?,
            bit_count: r.u16()?,
            compression: r.u32()?,
            image_size: r.u32()?,
            x_pels_per_meter: r.i32()?,
            y_pels_per_meter: r.i32()?,
            colors_used: r.u32()?,
            colors_important: r.u32()?,
        })
    }

    pub(crate) fn write<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), BmpError> {
        w.u32(self.header_size)?;
        w.i32(self.width)?;
        w.i32(self.height)?;
        w.u16(self.planes)?;
        w.u16(self.bit_count)?;
        w.u32(self.compression)?;
        w.u32(self.image_size)?;
        w.i32(self.x_pels_per_meter)?;
        w.i32(self.y_pels_per_meter)?;
        w.u32(self.colors_used)?;
        w.u32(self.colors_important)
    }
}

impl Header {
    /// Image width in pels.
    pub fn width(&self) -> u32 {
        self.info.width as u32
    }

    /// Image height in pels (sign-normalized).
    pub fn height(&self) -> u32 {
        self.info.height as u32
    }

    /// Declared bits per pel.
    pub fn depth(&self) -> u16 {
        self.info.bit_count
    }

    /// Canonical header for 32-bit truecolor output: no color table, no
    /// compression, bottom-up rows, pixel data at byte 54.
    pub fn canonical(width: u32, height: u32) -> Result<Self, BmpError> {
        let image_size = width
            .checked_mul(4)
            .and_then(|row| row.checked_mul(height))
            .ok_or(BmpError::DimensionsTooLarge { width, height })?;
        let file_size = image_size
            .checked_add(PIXEL_DATA_OFFSET)
            .ok_or(BmpError::DimensionsTooLarge { width, height })?;

        Ok(Self {
            file: FileHeader {
                signature: BMP_SIGNATURE,
                file_size,
                reserved1: 0,
                reserved2: 0,
                pixel_offset: PIXEL_DATA_OFFSET,
            },
            info: InfoHeader {
                header_size: INFO_HEADER_SIZE,
                width: width as i32,
                height: height as i32,
                planes: 1,
                bit_count: 32,
                compression: 0,
                image_size,
                x_pels_per_meter: CANONICAL_PPM,
                y_pels_per_meter: CANONICAL_PPM,
                colors_used: 0,
                colors_important: 0,
            },
            top_down: false,
        })
    }

    pub(crate) fn write<W: Write>(&self, w: &mut ByteWriter<W>) -> Result<(), BmpError> {
        self.file.write(w)?;
        self.info.write(w)
    }
}
