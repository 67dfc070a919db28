//! PNG encoding for RGBA raster data.
//!
//! Classified emission rasters carry at most a dozen distinct colors, so
//! indexed PNG (color type 3) is the common case and produces far smaller
//! files. `encode_auto` falls back to RGBA PNG (color type 6) when the
//! image exceeds 256 unique colors.

use std::collections::HashMap;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use thiserror::Error;

/// Maximum palette entries for an indexed PNG.
const MAX_PALETTE_SIZE: usize = 256;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

#[derive(Debug, Error)]
pub enum PngError {
    #[error("Pixel buffer length {actual} does not match {width}x{height} RGBA")]
    BufferMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },

    #[error("Image dimensions must be non-zero")]
    EmptyImage,

    #[error("Deflate error: {0}")]
    Deflate(#[from] std::io::Error),
}

/// Encode RGBA pixels with automatic format selection.
pub fn encode_auto(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, PngError> {
    validate(pixels, width, height)?;

    match extract_palette(pixels) {
        Some((palette, indices)) => encode_indexed(width, height, &palette, &indices),
        None => encode_rgba(pixels, width, height),
    }
}

/// Encode as full-color RGBA PNG (color type 6).
pub fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, PngError> {
    validate(pixels, width, height)?;

    // Filter byte 0 (None) per scanline.
    let mut raw = Vec::with_capacity(height * (1 + width * 4));
    for row in pixels.chunks_exact(width * 4) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut out = Vec::new();
    out.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut out, b"IHDR", &ihdr(width, height, 6));
    write_chunk(&mut out, b"IDAT", &deflate(&raw)?);
    write_chunk(&mut out, b"IEND", &[]);
    Ok(out)
}

/// Encode as indexed PNG (color type 3) with a tRNS alpha table.
fn encode_indexed(
    width: usize,
    height: usize,
    palette: &[[u8; 4]],
    indices: &[u8],
) -> Result<Vec<u8>, PngError> {
    let mut plte = Vec::with_capacity(palette.len() * 3);
    let mut trns = Vec::with_capacity(palette.len());
    for color in palette {
        plte.extend_from_slice(&color[..3]);
        trns.push(color[3]);
    }
    // tRNS entries default to opaque; trailing 255s can be dropped.
    while trns.last() == Some(&255) {
        trns.pop();
    }

    let mut raw = Vec::with_capacity(height * (1 + width));
    for row in indices.chunks_exact(width) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut out = Vec::new();
    out.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut out, b"IHDR", &ihdr(width, height, 3));
    write_chunk(&mut out, b"PLTE", &plte);
    if !trns.is_empty() {
        write_chunk(&mut out, b"tRNS", &trns);
    }
    write_chunk(&mut out, b"IDAT", &deflate(&raw)?);
    write_chunk(&mut out, b"IEND", &[]);
    Ok(out)
}

fn validate(pixels: &[u8], width: usize, height: usize) -> Result<(), PngError> {
    if width == 0 || height == 0 {
        return Err(PngError::EmptyImage);
    }
    if pixels.len() != width * height * 4 {
        return Err(PngError::BufferMismatch {
            width,
            height,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Map pixels to a palette plus index buffer, or `None` when the image has
/// more than 256 unique colors.
fn extract_palette(pixels: &[u8]) -> Option<(Vec<[u8; 4]>, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<[u8; 4]> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let packed = u32::from_le_bytes([px[0], px[1], px[2], px[3]]);
        let index = match color_to_index.get(&packed) {
            Some(&i) => i,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let i = palette.len() as u8;
                palette.push([px[0], px[1], px[2], px[3]]);
                color_to_index.insert(packed, i);
                i
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

fn ihdr(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&(width as u32).to_be_bytes());
    data.extend_from_slice(&(height as u32).to_be_bytes());
    data.push(8); // bit depth
    data.push(color_type);
    data.push(0); // compression: deflate
    data.push(0); // filter method 0
    data.push(0); // no interlace
    data
}

fn deflate(raw: &[u8]) -> Result<Vec<u8>, PngError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raw)?;
    Ok(encoder.finish()?)
}

fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(kind);
    hasher.update(data);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
}
