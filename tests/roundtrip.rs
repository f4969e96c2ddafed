//! Encode→decode round trips and canonical-output assertions.

use dibmat::{Bitmap, pack_channels, read_bmp, write_bmp};

fn checker(width: u32, height: u32) -> Bitmap {
    let mut bmp = Bitmap::new(width, height);
    for row in 0..height {
        for col in 0..width {
            let pel = if (row + col) % 2 == 0 {
                pack_channels(255, 0, 128)
            } else {
                pack_channels(0, 200, 50)
            };
            bmp.set_pel(row, col, pel);
        }
    }
    bmp
}

#[test]
fn bmp_roundtrip_preserves_the_matrix() {
    let original = checker(4, 3);

    let mut encoded = Vec::new();
    write_bmp(&original, &mut encoded).unwrap();
    assert_eq!(&encoded[0..2], b"BM");

    let (header, decoded) = read_bmp(&encoded[..]).unwrap();
    assert_eq!(header.width(), 4);
    assert_eq!(header.height(), 3);
    assert_eq!(header.depth(), 32);
    assert_eq!(decoded, original);
}

#[test]
fn encoded_header_is_canonical() {
    let bmp = checker(5, 3);
    let mut encoded = Vec::new();
    write_bmp(&bmp, &mut encoded).unwrap();

    let expected_size = 54 + 5 * 4 * 3;
    assert_eq!(encoded.len(), expected_size);
    // file size field
    assert_eq!(encoded[2..6], (expected_size as u32).to_le_bytes());
    // pixel-data offset
    assert_eq!(encoded[10..14], 54u32.to_le_bytes());
    // info header size, planes, bit count, compression
    assert_eq!(encoded[14..18], 40u32.to_le_bytes());
    assert_eq!(encoded[26..28], 1u16.to_le_bytes());
    assert_eq!(encoded[28..30], 32u16.to_le_bytes());
    assert_eq!(encoded[30..34], 0u32.to_le_bytes());
    // no color table
    assert_eq!(encoded[46..54], [0u8; 8]);
}

#[test]
fn rows_are_written_bottom_up() {
    let mut bmp = Bitmap::new(1, 2);
    bmp.set_pel(0, 0, pack_channels(1, 2, 3)); // top
    bmp.set_pel(1, 0, pack_channels(4, 5, 6)); // bottom

    let mut encoded = Vec::new();
    write_bmp(&bmp, &mut encoded).unwrap();

    // first scanline on disk is the bottom row, stored as (b, g, r, 0)
    assert_eq!(encoded[54..58], [6, 5, 4, 0]);
    assert_eq!(encoded[58..62], [3, 2, 1, 0]);
}

#[test]
fn reencoding_a_decoded_image_is_canonical() {
    // 24-bit source with padded rows; re-encode must come out 32-bit.
    let mut src = Vec::new();
    src.extend_from_slice(b"BM");
    src.extend_from_slice(&70u32.to_le_bytes());
    src.extend_from_slice(&[0; 4]);
    src.extend_from_slice(&54u32.to_le_bytes());
    src.extend_from_slice(&40u32.to_le_bytes());
    src.extend_from_slice(&2i32.to_le_bytes());
    src.extend_from_slice(&2i32.to_le_bytes());
    src.extend_from_slice(&1u16.to_le_bytes());
    src.extend_from_slice(&24u16.to_le_bytes());
    src.extend_from_slice(&[0; 24]); // compression through colors-important
    src.extend_from_slice(&[9, 8, 7, 6, 5, 4, 0, 0]); // bottom scanline + pad
    src.extend_from_slice(&[3, 2, 1, 0, 1, 2, 0, 0]); // top scanline + pad

    let (_, image) = read_bmp(&src[..]).unwrap();
    let mut reencoded = Vec::new();
    write_bmp(&image, &mut reencoded).unwrap();

    assert_eq!(reencoded.len(), 54 + 2 * 4 * 2);
    assert_eq!(reencoded[28..30], 32u16.to_le_bytes());

    let (_, twice) = read_bmp(&reencoded[..]).unwrap();
    assert_eq!(twice, image);
}

#[test]
fn grayscale_survives_a_roundtrip() {
    let gray = checker(3, 3).to_grayscale();
    let mut encoded = Vec::new();
    write_bmp(&gray, &mut encoded).unwrap();
    let (_, decoded) = read_bmp(&encoded[..]).unwrap();
    assert_eq!(decoded, gray);
}

#[test]
fn empty_matrix_cannot_be_encoded() {
    let bmp = Bitmap::new(0, 3);
    let mut out = Vec::new();
    match write_bmp(&bmp, &mut out) {
        Err(dibmat::BmpError::InvalidHeader(_)) => {}
        other => panic!("expected InvalidHeader, got {other:?}"),
    }
}

#[test]
fn path_api_roundtrip() {
    let path = std::env::temp_dir().join(format!("dibmat-roundtrip-{}.bmp", std::process::id()));
    let original = checker(6, 4);

    dibmat::encode(&original, &path).unwrap();
    let (header, decoded) = dibmat::decode(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(header.file.file_size as usize, 54 + 6 * 4 * 4);
    assert_eq!(decoded, original);
}
