//! Decoding of compressed precipitation grids.
//!
//! The radar service ships each grid as base64 text wrapping a zlib stream.
//! The inflated bytes are little-endian `u16` samples in row-major order.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use ndarray::Array2;
use std::io::Write;

use crate::error::{RadarError, Result};

/// Decode a base64 zlib blob into a flat sequence of samples
pub fn decode_grid(blob: &str) -> Result<Vec<u16>> {
    let compressed = STANDARD.decode(blob.trim())?;
    let raw = inflate(&compressed)?;

    if raw.len() % 2 != 0 {
        return Err(RadarError::Decode {
            message: format!("decompressed length {} is not a multiple of 2", raw.len()),
        });
    }

    Ok(raw
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Inflate a complete zlib stream, rejecting corrupt or truncated input
fn inflate(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut raw: Vec<u8> = Vec::with_capacity(compressed.len().max(64) * 4);

    loop {
        if raw.len() == raw.capacity() {
            raw.reserve(raw.capacity());
        }

        let (in_before, out_before) = (inflater.total_in(), inflater.total_out());
        let status = inflater
            .decompress_vec(
                &compressed[in_before as usize..],
                &mut raw,
                FlushDecompress::Finish,
            )
            .map_err(|e| RadarError::Decode {
                message: format!("inflate failed: {}", e),
            })?;

        if status == Status::StreamEnd {
            return Ok(raw);
        }

        let stalled = inflater.total_in() == in_before && inflater.total_out() == out_before;
        if stalled && raw.len() < raw.capacity() {
            return Err(RadarError::Decode {
                message: format!(
                    "zlib stream truncated after {} of {} bytes",
                    inflater.total_in(),
                    compressed.len()
                ),
            });
        }
    }
}

/// Decode a blob and shape it as a `height x width` grid
pub fn decode_grid_2d(blob: &str, width: usize, height: usize) -> Result<Array2<u16>> {
    let expected = width.checked_mul(height).ok_or_else(|| RadarError::Decode {
        message: format!("grid of {}x{} samples overflows", width, height),
    })?;
    let samples = decode_grid(blob)?;
    if samples.len() != expected {
        return Err(RadarError::Decode {
            message: format!(
                "grid has {} samples, expected {} ({}x{})",
                samples.len(),
                expected,
                width,
                height
            ),
        });
    }

    Array2::from_shape_vec((height, width), samples).map_err(|e| RadarError::Decode {
        message: format!("cannot shape grid: {}", e),
    })
}

/// Encode samples the way the radar service does
pub fn encode_grid(samples: &[u16]) -> Result<String> {
    let raw: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw)?;
    let compressed = encoder.finish()?;

    Ok(STANDARD.encode(compressed))
}
