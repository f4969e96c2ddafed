use std::io;

/// Errors from BMP decoding and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BmpError {
    #[error("unsupported bit depth: {0} bits per pel")]
    UnsupportedDepth(u16),

    #[error("compressed bitmaps are not supported (compression code {0})")]
    UnsupportedCompression(u32),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unexpected end of input at byte {offset}")]
    Truncated { offset: u64 },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("pel buffer holds {actual} pels, {width}x{height} needs {needed}")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        needed: usize,
        actual: usize,
    },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
