//! `.an` container decompression
//!
//! An `.an` file carries no magic bytes or format field, so recovery
//! probes each framing MoonReader has been observed to produce, in a
//! fixed order, and falls back to treating the buffer as plain text.

use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use std::io::{self, Read};

/// Decompression strategies, probed in order. The table keeps the
/// cascade inspectable; extend it here if a future build ships yet
/// another framing.
const STRATEGIES: &[(&str, fn(&[u8]) -> io::Result<Vec<u8>>)] = &[
    ("deflate-raw", inflate_raw),
    ("zlib", inflate_zlib),
    ("gzip", inflate_gzip),
];

/// Recovers the text of an `.an` container.
///
/// Tries raw deflate, then zlib, then gzip; if none of those decode,
/// the buffer itself is taken as UTF-8 text. Payloads that are not
/// valid UTF-8 are decoded with replacement characters, so this
/// function cannot fail. Pure and deterministic for identical input.
pub fn decode_an_bytes(bytes: &[u8]) -> String {
    for (name, inflate) in STRATEGIES {
        match inflate(bytes) {
            Ok(payload) => {
                tracing::trace!(strategy = name, "decompressed .an container");
                return String::from_utf8_lossy(&payload).into_owned();
            }
            Err(err) => {
                tracing::trace!(strategy = name, %err, "decompression strategy failed");
            }
        }
    }
    String::from_utf8_lossy(bytes).into_owned()
}

fn inflate_raw(bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    DeflateDecoder::new(bytes).read_to_end(&mut out)?;
    Ok(out)
}

fn inflate_zlib(bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(bytes).read_to_end(&mut out)?;
    Ok(out)
}

fn inflate_gzip(bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut out)?;
    Ok(out)
}
